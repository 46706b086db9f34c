use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    DialogOutcome, FileError, WindowId, disk,
    host::{Dialogs, FileFilter, Notification, SaveDialog},
    recent::RecentDocuments,
    watch::{WatchBackend, WatchEvent},
};

struct ActiveWatch<H> {
    path: PathBuf,
    _handle: H,
}

/// Reads, writes and watches files on behalf of windows, and drives the
/// open/save dialogs. I/O is attempted exactly once; failures are logged and
/// handed back to the caller.
pub struct FileService<W: WatchBackend> {
    backend: W,
    watches: HashMap<WindowId, ActiveWatch<W::Handle>>,
    recent: RecentDocuments,
    documents_dir: Option<PathBuf>,
}

impl<W: WatchBackend> FileService<W> {
    pub fn new(backend: W) -> Self {
        Self {
            backend,
            watches: HashMap::new(),
            recent: RecentDocuments::default(),
            documents_dir: dirs::document_dir(),
        }
    }

    /// Override where save dialogs start.
    #[must_use]
    pub fn with_documents_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.documents_dir = dir;
        self
    }

    #[must_use]
    pub const fn recent(&self) -> &RecentDocuments {
        &self.recent
    }

    pub fn clear_recent(&mut self) {
        self.recent.clear();
    }

    pub fn prompt_open_file(
        &mut self,
        window: WindowId,
        dialogs: &mut dyn Dialogs,
    ) -> Result<Option<Notification>, FileError> {
        match dialogs.open_file(window, &FileFilter::MARKDOWN_OPEN) {
            DialogOutcome::Cancelled => Ok(None),
            DialogOutcome::Chosen(path) => self.load_file(window, path).map(Some),
        }
    }

    /// Read `path`, record it as recent, point the window's watch at it and
    /// produce the `file-opened` notification for the window.
    pub fn load_file(&mut self, window: WindowId, path: PathBuf) -> Result<Notification, FileError> {
        let content = disk::read_text(&path).inspect_err(|err| log::warn!("{err}"))?;
        self.recent.add(&path);
        self.watch_file(window, &path);
        log::info!("opened {} in window {}", path.display(), window.get());
        Ok(Notification::FileOpened { path, content })
    }

    pub fn prompt_save_as_html(
        &mut self,
        window: WindowId,
        html: &str,
        dialogs: &mut dyn Dialogs,
    ) -> Result<DialogOutcome<PathBuf>, FileError> {
        let dialog = SaveDialog {
            title: "Save HTML",
            default_dir: self.documents_dir.clone(),
            filter: FileFilter::HTML,
        };
        let DialogOutcome::Chosen(path) = dialogs.save_file(window, &dialog) else {
            return Ok(DialogOutcome::Cancelled);
        };

        disk::write_text(&path, html).inspect_err(|err| log::warn!("{err}"))?;
        log::info!("exported html to {}", path.display());
        Ok(DialogOutcome::Chosen(path))
    }

    /// Write markdown to `path`, asking for a location first when the
    /// document has never been saved, then reload it into the window.
    ///
    /// Returns `Ok(None)` when the save dialog was cancelled.
    pub fn save_markdown(
        &mut self,
        window: WindowId,
        path: Option<&Path>,
        content: &str,
        dialogs: &mut dyn Dialogs,
    ) -> Result<Option<Notification>, FileError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let dialog = SaveDialog {
                    title: "Save Markdown",
                    default_dir: self.documents_dir.clone(),
                    filter: FileFilter::MARKDOWN_SAVE,
                };
                let DialogOutcome::Chosen(path) = dialogs.save_file(window, &dialog) else {
                    return Ok(None);
                };
                path
            }
        };

        disk::write_text(&path, content).inspect_err(|err| log::warn!("{err}"))?;
        log::info!("saved {}", path.display());
        self.load_file(window, path).map(Some)
    }

    /// Start watching `path` for `window`, replacing any earlier watch of that
    /// window. A failed registration is logged and leaves the window unwatched.
    pub fn watch_file(&mut self, window: WindowId, path: &Path) -> bool {
        // Drop the old handle before registering so two never coexist.
        self.unwatch_file(window);

        match self.backend.watch(window, path) {
            Ok(handle) => {
                self.watches.insert(
                    window,
                    ActiveWatch {
                        path: path.to_path_buf(),
                        _handle: handle,
                    },
                );
                true
            }
            Err(err) => {
                log::warn!("cannot watch {}: {err}", path.display());
                false
            }
        }
    }

    pub fn unwatch_file(&mut self, window: WindowId) -> bool {
        self.watches.remove(&window).is_some()
    }

    #[must_use]
    pub fn watched_path(&self, window: WindowId) -> Option<&Path> {
        self.watches.get(&window).map(|watch| watch.path.as_path())
    }

    #[must_use]
    pub fn active_watches(&self) -> usize {
        self.watches.len()
    }

    /// Turn a raw change event into a `file-changed` notification, if it is
    /// still about the file the window is watching.
    pub fn file_changed(&self, event: &WatchEvent) -> Option<Notification> {
        if self.watched_path(event.window) != Some(event.path.as_path()) {
            log::debug!("dropping stale change event for {}", event.path.display());
            return None;
        }

        match disk::read_text(&event.path) {
            Ok(content) => Some(Notification::FileChanged {
                path: event.path.clone(),
                content,
            }),
            Err(err) => {
                // Mid-replace or deleted; a later event will carry the content.
                log::debug!("{err}");
                None
            }
        }
    }
}
