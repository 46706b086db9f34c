use std::{
    collections::{BTreeMap, VecDeque},
    path::PathBuf,
};

use crate::{
    WindowId,
    controller::DocumentController,
    file_service::FileService,
    host::{Dialogs, MessageBox, Notification},
    watch::WatchBackend,
};

/// How far a new window is cascaded from the focused one, in points.
pub const CASCADE_OFFSET: f32 = 10.0;

const CLOSE_TITLE: &str = "Quit with Unsaved Changes?";
const CLOSE_MESSAGE: &str = "Your changes will be lost if you do not save.";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn cascaded(self) -> Self {
        Self::new(self.x + CASCADE_OFFSET, self.y + CASCADE_OFFSET)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseDecision {
    Close,
    Cancel,
}

/// Everything one window owns.
#[derive(Debug, Default)]
pub struct WindowSlot {
    position: Option<Position>,
    visible: bool,
    controller: DocumentController,
    inbox: VecDeque<Notification>,
    pending_file: Option<PathBuf>,
}

impl WindowSlot {
    /// Where the window should be placed; `None` leaves it to the platform.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub const fn controller(&self) -> &DocumentController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut DocumentController {
        &mut self.controller
    }
}

/// Arena of open windows keyed by [`WindowId`].
#[derive(Debug, Default)]
pub struct WindowManager {
    windows: BTreeMap<WindowId, WindowSlot>,
    next_id: u64,
    focused: Option<WindowId>,
}

impl WindowManager {
    /// Allocate a hidden window, cascaded from the focused one if any. It is
    /// shown by [`Self::mark_ready`] once its first layout is done.
    pub fn create_window(&mut self) -> WindowId {
        self.next_id += 1;
        let id = WindowId::new(self.next_id);
        let position = self
            .focused
            .and_then(|focused| self.windows.get(&focused))
            .and_then(WindowSlot::position)
            .map(Position::cascaded);

        self.windows.insert(
            id,
            WindowSlot {
                position,
                ..WindowSlot::default()
            },
        );
        log::info!("created window {}", id.get());
        id
    }

    /// Like [`Self::create_window`], with a file to load once it is ready.
    pub fn create_window_for(&mut self, path: PathBuf) -> WindowId {
        let id = self.create_window();
        if let Some(slot) = self.windows.get_mut(&id) {
            slot.pending_file = Some(path);
        }
        id
    }

    /// The window finished its first layout: show it and hand back any file
    /// that was waiting for it.
    pub fn mark_ready(&mut self, id: WindowId) -> Option<PathBuf> {
        let slot = self.windows.get_mut(&id)?;
        slot.visible = true;
        slot.pending_file.take()
    }

    pub fn set_focused(&mut self, id: Option<WindowId>) {
        self.focused = id.filter(|id| self.windows.contains_key(id));
    }

    #[must_use]
    pub const fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    /// Record where the platform actually placed a window.
    pub fn set_position(&mut self, id: WindowId, position: Position) {
        if let Some(slot) = self.windows.get_mut(&id) {
            slot.position = Some(position);
        }
    }

    /// Gate a user-initiated close. Only an edited document asks first.
    pub fn request_close(&self, id: WindowId, dialogs: &mut dyn Dialogs) -> CloseDecision {
        let Some(slot) = self.windows.get(&id) else {
            return CloseDecision::Close;
        };
        if !slot.controller.document().is_edited() {
            return CloseDecision::Close;
        }

        let prompt = MessageBox::confirm(CLOSE_TITLE, CLOSE_MESSAGE, "Quit Anyway");
        if dialogs.message_box(id, &prompt) == prompt.default_id {
            CloseDecision::Close
        } else {
            CloseDecision::Cancel
        }
    }

    /// Remove a window and tear down everything it owns, its file watch included.
    pub fn destroy<W: WatchBackend>(&mut self, id: WindowId, files: &mut FileService<W>) -> bool {
        files.unwatch_file(id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        let removed = self.windows.remove(&id).is_some();
        if removed {
            log::info!("closed window {}", id.get());
        }
        removed
    }

    #[must_use]
    pub fn get(&self, id: WindowId) -> Option<&WindowSlot> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut WindowSlot> {
        self.windows.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    #[must_use]
    pub fn has_visible(&self) -> bool {
        self.windows.values().any(WindowSlot::is_visible)
    }

    /// Queue a notification for a window. Dropped if the window is gone.
    pub fn post(&mut self, id: WindowId, notification: Notification) -> bool {
        match self.windows.get_mut(&id) {
            Some(slot) => {
                slot.inbox.push_back(notification);
                true
            }
            None => false,
        }
    }

    pub(crate) fn next_notification(&mut self, id: WindowId) -> Option<Notification> {
        self.windows.get_mut(&id)?.inbox.pop_front()
    }
}
