use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};

use crate::WindowId;

/// A change reported for the file a window is watching.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WatchEvent {
    pub window: WindowId,
    pub path: PathBuf,
}

/// Starts OS-level change notifications. Dropping the returned handle stops
/// the watch.
pub trait WatchBackend {
    type Handle;

    fn watch(&mut self, window: WindowId, path: &Path) -> notify::Result<Self::Handle>;
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// [`WatchBackend`] on top of `notify`, delivering events over a channel.
pub struct NotifyBackend {
    tx: Sender<WatchEvent>,
    waker: Option<Waker>,
}

/// Keeps a `notify` watcher alive for one (window, path) pair.
pub struct NotifyWatch {
    _watcher: RecommendedWatcher,
}

impl NotifyBackend {
    #[must_use]
    pub fn channel() -> (Self, Receiver<WatchEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx, waker: None }, rx)
    }

    /// Called from the watcher thread after each event is queued, so a UI can
    /// schedule a repaint and drain the channel.
    #[must_use]
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }
}

impl WatchBackend for NotifyBackend {
    type Handle = NotifyWatch;

    fn watch(&mut self, window: WindowId, path: &Path) -> notify::Result<NotifyWatch> {
        let target = path.to_path_buf();
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| target.clone());
        // Watch the directory rather than the file itself: editors that save
        // via rename replace the inode, which would silently end a file watch.
        let dir = match canonical.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let tx = self.tx.clone();
        let waker = self.waker.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    log::warn!("file watcher error: {err}");
                    return;
                }
            };
            if !is_content_change(&event.kind) {
                return;
            }
            if !event
                .paths
                .iter()
                .any(|changed| changed == &canonical || changed == &target)
            {
                return;
            }

            log::debug!("change reported for {}", target.display());
            let sent = tx.send(WatchEvent {
                window,
                path: target.clone(),
            });
            if sent.is_ok()
                && let Some(waker) = waker.as_ref()
            {
                waker();
            }
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(NotifyWatch { _watcher: watcher })
    }
}

const fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Any | EventKind::Create(_) | EventKind::Modify(_)
    )
}
