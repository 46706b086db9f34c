use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use crate::{
    FileError, WindowId,
    command::{Command, HostAction},
    controller::{DragFeedback, NoticeSource, Replace, UNSUPPORTED_DROP_MESSAGE},
    document::{self, DocumentView},
    file_service::FileService,
    host::{Dialogs, MessageBox, Notification},
    lifecycle::{self, AllClosed, Platform},
    registry::{CloseDecision, WindowManager},
    watch::{WatchBackend, WatchEvent},
};

/// Owns every window and the file service, and routes notifications between
/// them. The desktop shell calls in here for every user action.
pub struct Session<W: WatchBackend> {
    windows: WindowManager,
    files: FileService<W>,
    platform: Platform,
}

impl<W: WatchBackend> Session<W> {
    pub fn new(backend: W, platform: Platform) -> Self {
        Self {
            windows: WindowManager::default(),
            files: FileService::new(backend),
            platform,
        }
    }

    #[must_use]
    pub fn with_documents_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.files = self.files.with_documents_dir(dir);
        self
    }

    #[must_use]
    pub const fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowManager {
        &mut self.windows
    }

    #[must_use]
    pub const fn files(&self) -> &FileService<W> {
        &self.files
    }

    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Open one window per launch path, or a single empty window.
    pub fn launch(&mut self, paths: impl IntoIterator<Item = PathBuf>) -> Vec<WindowId> {
        let mut ids: Vec<_> = paths
            .into_iter()
            .map(|path| self.windows.create_window_for(path))
            .collect();
        if ids.is_empty() {
            ids.push(self.windows.create_window());
        }
        ids
    }

    pub fn create_window(&mut self) -> WindowId {
        self.windows.create_window()
    }

    /// A window finished its first layout. Shows it, then loads the file it
    /// was created for, if any.
    pub fn window_ready(&mut self, id: WindowId, dialogs: &mut dyn Dialogs) {
        if let Some(path) = self.windows.mark_ready(id) {
            self.open_in(id, path, dialogs);
        }
    }

    /// Load a known path into a window, as if picked from the open dialog.
    pub fn open_in(&mut self, id: WindowId, path: PathBuf, dialogs: &mut dyn Dialogs) {
        let result = self.files.load_file(id, path);
        if let Some(note) = self.report(id, NoticeSource::File, result) {
            self.windows.post(id, note);
            self.deliver(id, dialogs);
        }
    }

    /// User asked to close a window. Destroys it unless the user cancels.
    pub fn request_close(&mut self, id: WindowId, dialogs: &mut dyn Dialogs) -> CloseDecision {
        let decision = self.windows.request_close(id, dialogs);
        if decision == CloseDecision::Close {
            self.destroy(id);
        }
        decision
    }

    /// Close every window, asking about each edited one. Returns `false` and
    /// keeps the remaining windows if the user cancels any prompt.
    pub fn request_quit(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        let ids: Vec<_> = self.windows.ids().collect();
        for id in ids {
            if self.request_close(id, dialogs) == CloseDecision::Cancel {
                log::info!("quit cancelled from window {}", id.get());
                return false;
            }
        }
        true
    }

    pub fn destroy(&mut self, id: WindowId) -> bool {
        self.windows.destroy(id, &mut self.files)
    }

    /// Lifecycle decision once no windows remain; `None` while any are open.
    #[must_use]
    pub fn all_windows_closed(&self) -> Option<AllClosed> {
        self.windows
            .is_empty()
            .then(|| lifecycle::on_all_windows_closed(self.platform))
    }

    /// The app was re-activated. Opens a window if none is visible.
    pub fn activate(&mut self) -> Option<WindowId> {
        lifecycle::should_reopen_on_activate(self.windows.has_visible())
            .then(|| self.windows.create_window())
    }

    /// Keystroke hook for a window's editor.
    pub fn input(&mut self, id: WindowId) -> Option<DocumentView> {
        Some(self.windows.get_mut(id)?.controller_mut().input())
    }

    /// Run a menu, toolbar or shortcut command for `id`. Commands the toolkit
    /// must carry out itself are returned.
    pub fn dispatch(
        &mut self,
        id: WindowId,
        command: Command,
        dialogs: &mut dyn Dialogs,
    ) -> Option<HostAction> {
        if let Some(action) = command.host_action() {
            return Some(action);
        }
        let edited = self
            .windows
            .get(id)
            .is_some_and(|slot| slot.controller().document().is_edited());
        if command.needs_edits() && !edited {
            log::debug!("ignoring {command:?}: nothing to save or revert");
            return None;
        }

        match command {
            Command::NewWindow => {
                self.windows.create_window();
            }
            Command::OpenFile => {
                let result = self.files.prompt_open_file(id, dialogs);
                if let Some(Some(note)) = self.report(id, NoticeSource::File, result) {
                    self.windows.post(id, note);
                    self.deliver(id, dialogs);
                }
            }
            Command::OpenRecent(path) => self.open_in(id, path, dialogs),
            Command::ClearRecent => self.files.clear_recent(),
            Command::SaveMarkdown => {
                self.windows.post(id, Notification::SaveMarkdown);
                self.deliver(id, dialogs);
            }
            Command::SaveHtml => {
                self.windows.post(id, Notification::SaveHtml);
                self.deliver(id, dialogs);
            }
            Command::Revert => {
                if let Some(slot) = self.windows.get_mut(id) {
                    slot.controller_mut().revert();
                }
            }
            other => log::debug!("{other:?} has no session handler"),
        }
        None
    }

    pub fn drag_over(&mut self, id: WindowId, media_type: &str) -> DragFeedback {
        self.windows
            .get_mut(id)
            .map_or(DragFeedback::None, |slot| {
                slot.controller_mut().drag_over(media_type)
            })
    }

    pub fn drag_leave(&mut self, id: WindowId) {
        if let Some(slot) = self.windows.get_mut(id) {
            slot.controller_mut().drag_leave();
        }
    }

    /// A file was dropped on the editor. Supported types open exactly like
    /// File ▸ Open; anything else gets a blocking alert.
    pub fn drop_file(
        &mut self,
        id: WindowId,
        path: PathBuf,
        media_type: &str,
        dialogs: &mut dyn Dialogs,
    ) -> bool {
        self.drag_leave(id);
        if !document::is_supported_media_type(media_type) {
            log::info!("rejected drop of {} ({media_type})", path.display());
            dialogs.message_box(id, &MessageBox::alert(UNSUPPORTED_DROP_MESSAGE));
            return false;
        }

        self.open_in(id, path, dialogs);
        true
    }

    /// Feed a batch of watcher events in. Repeated events for the same file
    /// are handled once.
    pub fn poll_watch_events(
        &mut self,
        events: impl IntoIterator<Item = WatchEvent>,
        dialogs: &mut dyn Dialogs,
    ) {
        let mut seen = HashSet::new();
        for event in events {
            if !seen.insert(event.clone()) {
                continue;
            }
            if let Some(note) = self.files.file_changed(&event) {
                self.windows.post(event.window, note);
                self.deliver(event.window, dialogs);
            }
        }
    }

    /// Drain a window's inbox in order.
    pub fn deliver(&mut self, id: WindowId, dialogs: &mut dyn Dialogs) {
        while let Some(note) = self.windows.next_notification(id) {
            match note {
                Notification::FileOpened { path, content } => {
                    let Some(slot) = self.windows.get_mut(id) else {
                        return;
                    };
                    let controller = slot.controller_mut();
                    if controller.file_opened(id, path, content, dialogs) == Replace::Declined {
                        // Loading already re-pointed the watch at the refused file.
                        let current = controller.document().path().map(Path::to_path_buf);
                        match current {
                            Some(current) => {
                                self.files.watch_file(id, &current);
                            }
                            None => {
                                self.files.unwatch_file(id);
                            }
                        }
                    }
                }
                Notification::FileChanged { path, content } => {
                    if let Some(slot) = self.windows.get_mut(id) {
                        slot.controller_mut().file_changed(id, path, content, dialogs);
                    }
                }
                Notification::SaveMarkdown => {
                    let Some(slot) = self.windows.get(id) else {
                        return;
                    };
                    let (path, content) = slot.controller().save_request();
                    let (path, content) = (path.map(Path::to_path_buf), content.to_owned());
                    let result = self.files.save_markdown(id, path.as_deref(), &content, dialogs);
                    if let Some(Some(note)) = self.report(id, NoticeSource::File, result) {
                        self.windows.post(id, note);
                    }
                }
                Notification::SaveHtml => {
                    let Some(slot) = self.windows.get(id) else {
                        return;
                    };
                    let html = slot.controller().document().html().to_owned();
                    let result = self.files.prompt_save_as_html(id, &html, dialogs);
                    if let Some(chosen) = self.report(id, NoticeSource::Export, result)
                        && !chosen.is_cancelled()
                        && let Some(slot) = self.windows.get_mut(id)
                    {
                        slot.controller_mut().clear_notice_from(NoticeSource::Export);
                    }
                }
            }
        }
    }

    /// Surface a file error on the window without interrupting the user.
    fn report<T>(
        &mut self,
        id: WindowId,
        source: NoticeSource,
        result: Result<T, FileError>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                if let Some(slot) = self.windows.get_mut(id) {
                    slot.controller_mut().set_notice(source, err.to_string());
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        command::EditAction,
        testing::{CountingWatches, ScriptedDialogs, TestResult},
    };

    fn new_session(docs: &Path) -> (Session<CountingWatches>, CountingWatches) {
        let watches = CountingWatches::default();
        let session = Session::new(watches.clone(), Platform::Other)
            .with_documents_dir(Some(docs.to_path_buf()));
        (session, watches)
    }

    fn ready_window(session: &mut Session<CountingWatches>) -> WindowId {
        let id = session.create_window();
        session.window_ready(id, &mut ScriptedDialogs::default());
        id
    }

    fn type_text(
        session: &mut Session<CountingWatches>,
        id: WindowId,
        text: &str,
    ) -> Option<DocumentView> {
        if let Some(slot) = session.windows_mut().get_mut(id) {
            *slot.controller_mut().document_mut().buffer_mut() = text.to_owned();
        }
        session.input(id)
    }

    fn doc_of(session: &Session<CountingWatches>, id: WindowId) -> Option<&crate::document::Document> {
        session.windows().get(id).map(|slot| slot.controller().document())
    }

    #[test]
    fn edited_flag_matches_buffer_after_every_keystroke() -> TestResult {
        let dir = tempfile::tempdir()?;
        let (mut session, _) = new_session(dir.path());
        let id = ready_window(&mut session);

        for text in ["h", "he", "", "x"] {
            let view = type_text(&mut session, id, text);
            let doc = doc_of(&session, id);
            assert_eq!(
                view.map(|view| view.edited),
                doc.map(|doc| doc.buffer() != doc.original())
            );
        }
        Ok(())
    }

    #[test]
    fn save_fresh_document_then_reload_is_clean() -> TestResult {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("hello.md");
        let (mut session, watches) = new_session(dir.path());
        let id = ready_window(&mut session);
        type_text(&mut session, id, "hello");

        let mut dialogs = ScriptedDialogs::default().saving_to(&target);
        assert_eq!(session.dispatch(id, Command::SaveMarkdown, &mut dialogs), None);

        let doc = doc_of(&session, id);
        assert_eq!(doc.map(|d| d.original()), Some("hello"));
        assert_eq!(doc.map(|d| d.is_edited()), Some(false));
        assert_eq!(doc.and_then(|d| d.path()), Some(target.as_path()));
        assert!(dialogs.prompts.is_empty(), "reload after save must not prompt");
        assert_eq!(session.files().watched_path(id), Some(target.as_path()));
        assert_eq!(watches.live(), 1);
        assert_eq!(session.files().recent().iter().next(), Some(target.as_path()));
        Ok(())
    }

    #[test]
    fn failed_save_surfaces_a_notice_and_keeps_edits() -> TestResult {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("missing").join("a.md");
        let (mut session, _) = new_session(dir.path());
        let id = ready_window(&mut session);
        type_text(&mut session, id, "draft");

        let mut dialogs = ScriptedDialogs::default().saving_to(&target);
        session.dispatch(id, Command::SaveMarkdown, &mut dialogs);

        let slot = session.windows().get(id);
        assert!(slot.and_then(|s| s.controller().notice()).is_some());
        assert_eq!(slot.map(|s| s.controller().document().is_edited()), Some(true));
        assert!(dialogs.prompts.is_empty(), "failures are not modal");
        Ok(())
    }

    #[test]
    fn html_export_success_keeps_an_earlier_save_failure_visible() -> TestResult {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing").join("a.md");
        let export = dir.path().join("out.html");
        let (mut session, _) = new_session(dir.path());
        let id = ready_window(&mut session);
        type_text(&mut session, id, "draft");

        let mut dialogs = ScriptedDialogs::default().saving_to(&missing).saving_to(&export);
        session.dispatch(id, Command::SaveMarkdown, &mut dialogs);
        let failure = session
            .windows()
            .get(id)
            .and_then(|s| s.controller().notice())
            .map(str::to_owned);
        assert!(failure.is_some());

        session.dispatch(id, Command::SaveHtml, &mut dialogs);
        assert!(export.exists());
        let slot = session.windows().get(id);
        assert_eq!(slot.and_then(|s| s.controller().notice()), failure.as_deref());
        assert_eq!(slot.map(|s| s.controller().document().is_edited()), Some(true));
        Ok(())
    }

    #[test]
    fn html_export_success_clears_its_own_earlier_failure() -> TestResult {
        let dir = tempfile::tempdir()?;
        let bad = dir.path().join("missing").join("out.html");
        let good = dir.path().join("out.html");
        let (mut session, _) = new_session(dir.path());
        let id = ready_window(&mut session);
        type_text(&mut session, id, "# hi");

        let mut dialogs = ScriptedDialogs::default().saving_to(&bad).saving_to(&good);
        session.dispatch(id, Command::SaveHtml, &mut dialogs);
        assert!(session.windows().get(id).and_then(|s| s.controller().notice()).is_some());

        session.dispatch(id, Command::SaveHtml, &mut dialogs);
        assert_eq!(session.windows().get(id).and_then(|s| s.controller().notice()), None);
        Ok(())
    }

    #[test]
    fn dropping_an_image_alerts_and_leaves_buffer_alone() -> TestResult {
        let dir = tempfile::tempdir()?;
        let (mut session, watches) = new_session(dir.path());
        let id = ready_window(&mut session);
        type_text(&mut session, id, "keep me");

        let mut dialogs = ScriptedDialogs::default();
        assert_eq!(session.drag_over(id, "image/png"), DragFeedback::Reject);
        let opened = session.drop_file(id, dir.path().join("cat.png"), "image/png", &mut dialogs);

        assert!(!opened);
        assert_eq!(dialogs.prompts.len(), 1);
        assert_eq!(dialogs.prompts[0].message, UNSUPPORTED_DROP_MESSAGE);
        assert!(dialogs.open_filters.is_empty());
        assert_eq!(watches.started(), 0);
        assert_eq!(doc_of(&session, id).map(|d| d.buffer()), Some("keep me"));
        assert_eq!(
            session.windows().get(id).map(|s| s.controller().drag_feedback()),
            Some(DragFeedback::None)
        );
        Ok(())
    }

    #[test]
    fn dropping_markdown_opens_it() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("dropped.md");
        fs::write(&path, "# Dropped")?;
        let (mut session, _) = new_session(dir.path());
        let id = ready_window(&mut session);

        let mut dialogs = ScriptedDialogs::default();
        assert!(session.drop_file(id, path.clone(), "text/markdown", &mut dialogs));

        assert_eq!(doc_of(&session, id).and_then(|d| d.path()), Some(path.as_path()));
        assert_eq!(doc_of(&session, id).map(|d| d.html()), Some("<h1>Dropped</h1>\n"));
        Ok(())
    }

    #[test]
    fn close_gate_cancel_and_quit_anyway() -> TestResult {
        let dir = tempfile::tempdir()?;
        let (mut session, _) = new_session(dir.path());
        let id = ready_window(&mut session);
        type_text(&mut session, id, "unsaved");

        let mut cancel = ScriptedDialogs::answering([1]);
        assert_eq!(session.request_close(id, &mut cancel), CloseDecision::Cancel);
        assert!(session.windows().contains(id));
        assert_eq!(doc_of(&session, id).map(|d| d.is_edited()), Some(true));

        let mut quit = ScriptedDialogs::answering([0]);
        assert_eq!(session.request_close(id, &mut quit), CloseDecision::Close);
        assert!(!session.windows().contains(id));
        assert_eq!(session.all_windows_closed(), Some(AllClosed::Exit));
        Ok(())
    }

    #[test]
    fn opening_b_over_edited_a_prompts_first() -> TestResult {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        fs::write(&a, "A")?;
        fs::write(&b, "B")?;
        let (mut session, watches) = new_session(dir.path());
        let id = ready_window(&mut session);
        session.open_in(id, a.clone(), &mut ScriptedDialogs::default());
        type_text(&mut session, id, "A with edits");

        let mut decline = ScriptedDialogs::answering([1]).opening(&b);
        session.dispatch(id, Command::OpenFile, &mut decline);
        assert_eq!(decline.prompts.len(), 1);
        assert_eq!(doc_of(&session, id).and_then(|d| d.path()), Some(a.as_path()));
        assert_eq!(doc_of(&session, id).map(|d| d.buffer()), Some("A with edits"));
        assert_eq!(session.files().watched_path(id), Some(a.as_path()));
        assert_eq!(watches.live(), 1);

        let mut accept = ScriptedDialogs::answering([0]).opening(&b);
        session.dispatch(id, Command::OpenFile, &mut accept);
        let doc = doc_of(&session, id);
        assert_eq!(doc.and_then(|d| d.path()), Some(b.as_path()));
        assert_eq!(doc.map(|d| d.original()), Some("B"));
        assert_eq!(doc.map(|d| d.is_edited()), Some(false));
        assert_eq!(session.files().watched_path(id), Some(b.as_path()));
        Ok(())
    }

    #[test]
    fn watch_on_a_then_open_b_leaves_one_watch_on_b() -> TestResult {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        fs::write(&a, "A")?;
        fs::write(&b, "B")?;
        let (mut session, watches) = new_session(dir.path());
        let id = ready_window(&mut session);

        session.open_in(id, a, &mut ScriptedDialogs::default());
        session.open_in(id, b.clone(), &mut ScriptedDialogs::default());

        assert_eq!(watches.live(), 1);
        assert_eq!(session.files().active_watches(), 1);
        assert_eq!(session.files().watched_path(id), Some(b.as_path()));
        Ok(())
    }

    #[test]
    fn revert_restores_original() -> TestResult {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.md");
        fs::write(&a, "A")?;
        let (mut session, _) = new_session(dir.path());
        let id = ready_window(&mut session);
        session.open_in(id, a, &mut ScriptedDialogs::default());

        for typed in ["", "B", "A\nA"] {
            type_text(&mut session, id, typed);
            session.dispatch(id, Command::Revert, &mut ScriptedDialogs::default());
            let doc = doc_of(&session, id);
            assert_eq!(doc.map(|d| d.buffer()), Some("A"));
            assert_eq!(doc.map(|d| d.is_edited()), Some(false));
        }
        Ok(())
    }

    #[test]
    fn external_change_prompts_once_per_batch() -> TestResult {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.md");
        fs::write(&a, "A")?;
        let (mut session, _) = new_session(dir.path());
        let id = ready_window(&mut session);
        session.open_in(id, a.clone(), &mut ScriptedDialogs::default());
        fs::write(&a, "A from elsewhere")?;

        let event = WatchEvent {
            window: id,
            path: a,
        };
        let mut dialogs = ScriptedDialogs::answering([0]);
        session.poll_watch_events([event.clone(), event.clone(), event], &mut dialogs);

        assert_eq!(dialogs.prompts.len(), 1);
        assert_eq!(doc_of(&session, id).map(|d| d.buffer()), Some("A from elsewhere"));
        assert_eq!(doc_of(&session, id).map(|d| d.is_edited()), Some(false));
        Ok(())
    }

    #[test]
    fn own_save_does_not_look_like_an_external_change() -> TestResult {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.md");
        fs::write(&a, "A")?;
        let (mut session, _) = new_session(dir.path());
        let id = ready_window(&mut session);
        session.open_in(id, a.clone(), &mut ScriptedDialogs::default());
        type_text(&mut session, id, "A2");
        session.dispatch(id, Command::SaveMarkdown, &mut ScriptedDialogs::default());

        let mut dialogs = ScriptedDialogs::default();
        session.poll_watch_events([WatchEvent { window: id, path: a }], &mut dialogs);
        assert!(dialogs.prompts.is_empty());
        Ok(())
    }

    #[test]
    fn launch_paths_load_when_windows_are_ready() -> TestResult {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.md");
        fs::write(&a, "A")?;
        let (mut session, _) = new_session(dir.path());

        let ids = session.launch([a.clone()]);
        assert_eq!(ids.len(), 1);
        assert_eq!(doc_of(&session, ids[0]).and_then(|d| d.path()), None);

        session.window_ready(ids[0], &mut ScriptedDialogs::default());
        assert_eq!(doc_of(&session, ids[0]).and_then(|d| d.path()), Some(a.as_path()));

        let (mut empty, _) = new_session(dir.path());
        assert_eq!(empty.launch(Vec::new()).len(), 1);
        Ok(())
    }

    #[test]
    fn quit_stops_at_first_cancel() -> TestResult {
        let dir = tempfile::tempdir()?;
        let (mut session, _) = new_session(dir.path());
        let clean = ready_window(&mut session);
        let edited = ready_window(&mut session);
        type_text(&mut session, edited, "draft");

        let mut dialogs = ScriptedDialogs::answering([1]);
        assert!(!session.request_quit(&mut dialogs));
        assert!(!session.windows().contains(clean));
        assert!(session.windows().contains(edited));

        let mut dialogs = ScriptedDialogs::answering([0]);
        assert!(session.request_quit(&mut dialogs));
        assert!(session.windows().is_empty());
        Ok(())
    }

    #[test]
    fn resident_platform_reopens_on_activate() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut session = Session::new(CountingWatches::default(), Platform::MacOs)
            .with_documents_dir(Some(dir.path().to_path_buf()));
        let id = ready_window(&mut session);
        session.request_close(id, &mut ScriptedDialogs::default());

        assert_eq!(session.all_windows_closed(), Some(AllClosed::StayResident));
        assert!(session.activate().is_some());
        assert_eq!(session.all_windows_closed(), None);
        Ok(())
    }

    #[test]
    fn host_commands_are_handed_back() -> TestResult {
        let dir = tempfile::tempdir()?;
        let (mut session, _) = new_session(dir.path());
        let id = ready_window(&mut session);
        let mut dialogs = ScriptedDialogs::default();

        assert_eq!(
            session.dispatch(id, Command::Edit(EditAction::Undo), &mut dialogs),
            Some(HostAction::Edit(EditAction::Undo))
        );
        assert_eq!(
            session.dispatch(id, Command::CloseWindow, &mut dialogs),
            Some(HostAction::Close)
        );
        assert_eq!(session.dispatch(id, Command::NewWindow, &mut dialogs), None);
        assert_eq!(session.windows().len(), 2);
        Ok(())
    }

    #[test]
    fn save_html_writes_preview() -> TestResult {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("out.html");
        let (mut session, _) = new_session(dir.path());
        let id = ready_window(&mut session);
        type_text(&mut session, id, "# Out");

        let mut dialogs = ScriptedDialogs::default().saving_to(&target);
        session.dispatch(id, Command::SaveHtml, &mut dialogs);

        assert_eq!(fs::read_to_string(&target).ok().as_deref(), Some("<h1>Out</h1>\n"));
        assert_eq!(doc_of(&session, id).map(|d| d.is_edited()), Some(true));
        Ok(())
    }
}
