//! Scripted stand-ins for the desktop shell.

use std::{
    cell::Cell,
    collections::VecDeque,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    DialogOutcome, WindowId,
    host::{Dialogs, FileFilter, MessageBox, SaveDialog},
    watch::WatchBackend,
};

pub(crate) type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Answers dialogs from queues and records what was asked.
#[derive(Default)]
pub(crate) struct ScriptedDialogs {
    pub(crate) answers: VecDeque<usize>,
    pub(crate) open_paths: VecDeque<PathBuf>,
    pub(crate) save_paths: VecDeque<PathBuf>,
    pub(crate) prompts: Vec<MessageBox>,
    pub(crate) open_filters: Vec<FileFilter>,
    pub(crate) save_dialogs: Vec<SaveDialog>,
}

impl ScriptedDialogs {
    pub(crate) fn answering(answers: impl IntoIterator<Item = usize>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub(crate) fn opening(mut self, path: impl Into<PathBuf>) -> Self {
        self.open_paths.push_back(path.into());
        self
    }

    pub(crate) fn saving_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_paths.push_back(path.into());
        self
    }
}

impl Dialogs for ScriptedDialogs {
    fn open_file(&mut self, _window: WindowId, filter: &FileFilter) -> DialogOutcome<PathBuf> {
        self.open_filters.push(*filter);
        self.open_paths.pop_front().into()
    }

    fn save_file(&mut self, _window: WindowId, dialog: &SaveDialog) -> DialogOutcome<PathBuf> {
        self.save_dialogs.push(dialog.clone());
        self.save_paths.pop_front().into()
    }

    fn message_box(&mut self, _window: WindowId, message: &MessageBox) -> usize {
        self.prompts.push(message.clone());
        self.answers.pop_front().unwrap_or(message.cancel_id)
    }
}

/// Counts live watch handles so tests can assert on exclusivity.
#[derive(Clone, Default)]
pub(crate) struct CountingWatches {
    live: Rc<Cell<usize>>,
    started: Rc<Cell<usize>>,
}

pub(crate) struct CountingHandle {
    live: Rc<Cell<usize>>,
}

impl Drop for CountingHandle {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

impl CountingWatches {
    pub(crate) fn live(&self) -> usize {
        self.live.get()
    }

    pub(crate) fn started(&self) -> usize {
        self.started.get()
    }
}

impl WatchBackend for CountingWatches {
    type Handle = CountingHandle;

    fn watch(&mut self, _window: WindowId, _path: &Path) -> notify::Result<CountingHandle> {
        self.live.set(self.live.get() + 1);
        self.started.set(self.started.get() + 1);
        Ok(CountingHandle {
            live: Rc::clone(&self.live),
        })
    }
}
