use std::path::{Path, PathBuf};

use crate::{APP_NAME, markdown};

/// Lifecycle of the document shown in one window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocState {
    /// Untitled, never loaded and nothing typed.
    Empty,
    Loaded,
    Edited,
}

/// The edit buffer of one window plus the baseline it is compared against.
///
/// `original` only moves on load, save-reload and revert. Keystrokes change
/// `buffer` alone.
#[derive(Clone, Debug, Default)]
pub struct Document {
    path: Option<PathBuf>,
    buffer: String,
    original: String,
    html: String,
    revision: u64,
}

/// Everything the window chrome needs, derived from the document on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentView {
    pub title: String,
    pub edited: bool,
    pub save_enabled: bool,
    pub revert_enabled: bool,
}

impl Document {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Rendered preview of the buffer as of the last [`Self::rerender`].
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Bumped every time the buffer is replaced or re-rendered; lets a view
    /// cache derived layout.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Mutable access for a text widget. Call [`Self::rerender`] afterwards.
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }

    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.buffer != self.original
    }

    #[must_use]
    pub fn state(&self) -> DocState {
        if self.is_edited() {
            DocState::Edited
        } else if self.path.is_none() && self.original.is_empty() {
            DocState::Empty
        } else {
            DocState::Loaded
        }
    }

    /// Replace the buffer and the baseline wholesale.
    pub fn load(&mut self, path: PathBuf, content: String) {
        self.path = Some(path);
        self.original.clone_from(&content);
        self.buffer = content;
        self.rerender();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.rerender();
    }

    pub fn revert(&mut self) {
        self.buffer.clone_from(&self.original);
        self.rerender();
    }

    pub fn rerender(&mut self) {
        self.html = markdown::to_html(&self.buffer);
        self.revision = self.revision.wrapping_add(1);
    }

    #[must_use]
    pub fn view(&self) -> DocumentView {
        let edited = self.is_edited();
        DocumentView {
            title: window_title(self.path(), edited),
            edited,
            save_enabled: edited,
            revert_enabled: edited,
        }
    }
}

/// `"<basename> - Fire Sale"`, with `" (Edited)"` appended while edited.
#[must_use]
pub fn window_title(path: Option<&Path>, edited: bool) -> String {
    let mut title = match path.and_then(Path::file_name) {
        Some(name) => format!("{} - {APP_NAME}", name.to_string_lossy()),
        None => APP_NAME.to_owned(),
    };
    if edited {
        title.push_str(" (Edited)");
    }
    title
}

pub const MEDIA_PLAIN_TEXT: &str = "text/plain";
pub const MEDIA_MARKDOWN: &str = "text/markdown";

/// Whether a dragged item's declared media type can be opened.
#[must_use]
pub fn is_supported_media_type(media_type: &str) -> bool {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();
    [MEDIA_PLAIN_TEXT, MEDIA_MARKDOWN]
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(essence))
}

/// The declared media type of a dropped item, falling back to a guess from
/// the extension when the platform did not declare one.
#[must_use]
pub fn media_type_for(path: Option<&Path>, declared: &str) -> String {
    if !declared.trim().is_empty() {
        return declared.trim().to_owned();
    }

    let ext = path
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let guessed = match ext.as_str() {
        "md" | "markdown" => MEDIA_MARKDOWN,
        "txt" => MEDIA_PLAIN_TEXT,
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    };
    guessed.to_owned()
}
