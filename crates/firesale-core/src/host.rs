//! The seam between the orchestration logic and the desktop toolkit.

use std::path::PathBuf;

/// Identity of one top-level editor window. Never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    #[must_use]
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Result of a dialog. Cancelling is a normal outcome, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogOutcome<T> {
    Cancelled,
    Chosen(T),
}

impl<T> DialogOutcome<T> {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl<T> From<Option<T>> for DialogOutcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Cancelled, Self::Chosen)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    pub const MARKDOWN_OPEN: Self = Self {
        name: "Markdown Files",
        extensions: &["md", "markdown", "txt"],
    };
    pub const MARKDOWN_SAVE: Self = Self {
        name: "Markdown Files",
        extensions: &["md", "markdown"],
    };
    pub const HTML: Self = Self {
        name: "HTML Files",
        extensions: &["html", "htm"],
    };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveDialog {
    pub title: &'static str,
    pub default_dir: Option<PathBuf>,
    pub filter: FileFilter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
}

/// A modal message box. The host returns the index of the chosen button, or
/// `cancel_id` when the box is dismissed without a choice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageBox {
    pub kind: MessageKind,
    pub title: String,
    pub message: String,
    pub detail: Option<String>,
    pub buttons: Vec<&'static str>,
    pub default_id: usize,
    pub cancel_id: usize,
}

impl MessageBox {
    /// Two-button confirmation where index 0 accepts and index 1 cancels.
    #[must_use]
    pub fn confirm(title: &str, message: &str, accept: &'static str) -> Self {
        Self {
            kind: MessageKind::Warning,
            title: title.to_owned(),
            message: message.to_owned(),
            detail: None,
            buttons: vec![accept, "Cancel"],
            default_id: 0,
            cancel_id: 1,
        }
    }

    #[must_use]
    pub fn alert(message: &str) -> Self {
        Self {
            kind: MessageKind::Info,
            title: crate::APP_NAME.to_owned(),
            message: message.to_owned(),
            detail: None,
            buttons: vec!["OK"],
            default_id: 0,
            cancel_id: 0,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Native dialogs, as provided by the desktop shell.
///
/// Every call is modal to `window` and returns once the user has answered,
/// so at most one dialog per window is ever in flight.
pub trait Dialogs {
    fn open_file(&mut self, window: WindowId, filter: &FileFilter) -> DialogOutcome<PathBuf>;
    fn save_file(&mut self, window: WindowId, dialog: &SaveDialog) -> DialogOutcome<PathBuf>;
    fn message_box(&mut self, window: WindowId, message: &MessageBox) -> usize;
}

/// Messages delivered to a window's document controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    FileOpened { path: PathBuf, content: String },
    FileChanged { path: PathBuf, content: String },
    SaveMarkdown,
    SaveHtml,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_outcome_from_option() {
        assert_eq!(DialogOutcome::from(Some(3)), DialogOutcome::Chosen(3));
        assert!(DialogOutcome::<u8>::from(None).is_cancelled());
    }

    #[test]
    fn confirm_box_has_accept_then_cancel() {
        let dialog = MessageBox::confirm("t", "m", "Yes");
        assert_eq!(dialog.buttons, vec!["Yes", "Cancel"]);
        assert_eq!(dialog.default_id, 0);
        assert_eq!(dialog.cancel_id, 1);
    }
}
