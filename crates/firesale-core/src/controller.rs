use std::path::{Path, PathBuf};

use crate::{
    WindowId,
    document::{self, Document, DocumentView},
    host::{Dialogs, MessageBox},
};

const OPEN_OVERWRITE_TITLE: &str = "Overwrite Current Unsaved Changes?";
const OPEN_OVERWRITE_MESSAGE: &str = "Opening a new file in this window will overwrite your unsaved changes. Open this file anyway?";
const CHANGED_TITLE: &str = "File Changed";
const CHANGED_MESSAGE: &str = "Another application has changed this file. Load changes?";
pub const UNSUPPORTED_DROP_MESSAGE: &str = "That file type is not supported";

/// Visual hint shown while something is dragged over the editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragFeedback {
    #[default]
    None,
    Accept,
    Reject,
}

/// The kind of operation a notice reports on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeSource {
    /// Opening, loading or saving the markdown file.
    File,
    /// Writing the HTML export.
    Export,
}

/// What became of an incoming content replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Replace {
    Applied,
    Declined,
    Ignored,
}

/// Per-window document state machine: owns the buffer, mediates between
/// notifications and the user.
#[derive(Debug, Default)]
pub struct DocumentController {
    doc: Document,
    drag: DragFeedback,
    notice: Option<(NoticeSource, String)>,
    declined_change: Option<(PathBuf, String)>,
}

impl DocumentController {
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    /// For binding a text widget to the buffer; follow edits with [`Self::input`].
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    #[must_use]
    pub fn view(&self) -> DocumentView {
        self.doc.view()
    }

    /// Keystroke hook: re-render the preview and recompute edited state.
    pub fn input(&mut self) -> DocumentView {
        self.doc.rerender();
        self.doc.view()
    }

    pub fn revert(&mut self) {
        self.doc.revert();
    }

    /// A file was opened into this window (menu, drop, launch or the reload
    /// after a save). Unsaved edits are only overwritten with consent.
    pub fn file_opened(
        &mut self,
        window: WindowId,
        path: PathBuf,
        content: String,
        dialogs: &mut dyn Dialogs,
    ) -> Replace {
        // Nothing is lost when the incoming text is what the user already has,
        // which is always the case for the reload that follows a save.
        if self.doc.is_edited() && self.doc.buffer() != content {
            let prompt = MessageBox::confirm(OPEN_OVERWRITE_TITLE, OPEN_OVERWRITE_MESSAGE, "Yes")
                .with_detail(path.display().to_string());
            if dialogs.message_box(window, &prompt) != prompt.default_id {
                log::info!("kept unsaved changes instead of opening {}", path.display());
                return Replace::Declined;
            }
        }

        self.load(path, content);
        Replace::Applied
    }

    /// The watched file changed on disk. Accepting reloads verbatim and
    /// drops any unsaved edits without a second warning.
    pub fn file_changed(
        &mut self,
        window: WindowId,
        path: PathBuf,
        content: String,
        dialogs: &mut dyn Dialogs,
    ) -> Replace {
        if self.doc.path() != Some(path.as_path()) {
            log::debug!("ignoring change for {}: not this window's file", path.display());
            return Replace::Ignored;
        }
        if content == self.doc.original() {
            return Replace::Ignored;
        }
        if self
            .declined_change
            .as_ref()
            .is_some_and(|(declined_path, declined)| *declined_path == path && *declined == content)
        {
            return Replace::Ignored;
        }

        let prompt = MessageBox::confirm(CHANGED_TITLE, CHANGED_MESSAGE, "Yes")
            .with_detail(path.display().to_string());
        if dialogs.message_box(window, &prompt) != prompt.default_id {
            self.declined_change = Some((path, content));
            return Replace::Declined;
        }

        self.load(path, content);
        Replace::Applied
    }

    /// Path (if any) and text a "Save Markdown" should write.
    #[must_use]
    pub fn save_request(&self) -> (Option<&Path>, &str) {
        (self.doc.path(), self.doc.buffer())
    }

    pub fn drag_over(&mut self, media_type: &str) -> DragFeedback {
        self.drag = if document::is_supported_media_type(media_type) {
            DragFeedback::Accept
        } else {
            DragFeedback::Reject
        };
        self.drag
    }

    pub fn drag_leave(&mut self) {
        self.drag = DragFeedback::None;
    }

    #[must_use]
    pub const fn drag_feedback(&self) -> DragFeedback {
        self.drag
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|(_, text)| text.as_str())
    }

    pub fn set_notice(&mut self, source: NoticeSource, notice: impl Into<String>) {
        self.notice = Some((source, notice.into()));
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Clear the notice only if an operation of `source` raised it; a later
    /// success of another kind says nothing about that failure.
    pub fn clear_notice_from(&mut self, source: NoticeSource) {
        if self.notice.as_ref().is_some_and(|(raised_by, _)| *raised_by == source) {
            self.notice = None;
        }
    }

    fn load(&mut self, path: PathBuf, content: String) {
        self.doc.load(path, content);
        self.declined_change = None;
        self.clear_notice_from(NoticeSource::File);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{document::DocState, testing::ScriptedDialogs};

    const WINDOW: WindowId = WindowId::new(1);

    fn loaded(path: &str, content: &str) -> DocumentController {
        let mut ctl = DocumentController::default();
        let mut dialogs = ScriptedDialogs::default();
        ctl.file_opened(WINDOW, PathBuf::from(path), content.to_owned(), &mut dialogs);
        ctl
    }

    fn type_text(ctl: &mut DocumentController, text: &str) -> DocumentView {
        *ctl.document_mut().buffer_mut() = text.to_owned();
        ctl.input()
    }

    #[test]
    fn open_into_clean_window_does_not_prompt() {
        let mut ctl = DocumentController::default();
        let mut dialogs = ScriptedDialogs::default();
        let got = ctl.file_opened(WINDOW, PathBuf::from("a.md"), "A".to_owned(), &mut dialogs);

        assert_eq!(got, Replace::Applied);
        assert!(dialogs.prompts.is_empty());
        assert_eq!(ctl.document().state(), DocState::Loaded);
        assert_eq!(ctl.view().title, "a.md - Fire Sale");
    }

    #[test]
    fn open_over_unsaved_edits_declined_keeps_everything() {
        let mut ctl = loaded("a.md", "A");
        type_text(&mut ctl, "A edited");

        let mut dialogs = ScriptedDialogs::answering([1]);
        let got = ctl.file_opened(WINDOW, PathBuf::from("b.md"), "B".to_owned(), &mut dialogs);

        assert_eq!(got, Replace::Declined);
        assert_eq!(dialogs.prompts.len(), 1);
        assert!(dialogs.prompts[0].message.contains("overwrite your unsaved changes"));
        assert_eq!(ctl.document().path(), Some(Path::new("a.md")));
        assert_eq!(ctl.document().buffer(), "A edited");
        assert!(ctl.document().is_edited());
    }

    #[test]
    fn open_over_unsaved_edits_accepted_replaces() {
        let mut ctl = loaded("a.md", "A");
        type_text(&mut ctl, "A edited");

        let mut dialogs = ScriptedDialogs::answering([0]);
        let got = ctl.file_opened(WINDOW, PathBuf::from("b.md"), "B".to_owned(), &mut dialogs);

        assert_eq!(got, Replace::Applied);
        assert_eq!(ctl.document().path(), Some(Path::new("b.md")));
        assert_eq!(ctl.document().original(), "B");
        assert!(!ctl.document().is_edited());
    }

    #[test]
    fn reload_of_identical_text_skips_prompt() {
        let mut ctl = DocumentController::default();
        type_text(&mut ctl, "hello");

        let mut dialogs = ScriptedDialogs::default();
        let got = ctl.file_opened(WINDOW, PathBuf::from("new.md"), "hello".to_owned(), &mut dialogs);

        assert_eq!(got, Replace::Applied);
        assert!(dialogs.prompts.is_empty());
        assert_eq!(ctl.document().original(), "hello");
        assert!(!ctl.document().is_edited());
    }

    #[test]
    fn external_change_prompts_and_reloads_verbatim() {
        let mut ctl = loaded("a.md", "A");
        type_text(&mut ctl, "local edits");

        let mut dialogs = ScriptedDialogs::answering([0]);
        let got = ctl.file_changed(WINDOW, PathBuf::from("a.md"), "A2".to_owned(), &mut dialogs);

        assert_eq!(got, Replace::Applied);
        assert_eq!(dialogs.prompts.len(), 1);
        assert_eq!(dialogs.prompts[0].message, CHANGED_MESSAGE);
        assert_eq!(ctl.document().buffer(), "A2");
        assert!(!ctl.document().is_edited());
    }

    #[test]
    fn external_change_declined_is_not_asked_again_for_same_content() {
        let mut ctl = loaded("a.md", "A");
        let mut dialogs = ScriptedDialogs::answering([1]);

        let first = ctl.file_changed(WINDOW, PathBuf::from("a.md"), "A2".to_owned(), &mut dialogs);
        let again = ctl.file_changed(WINDOW, PathBuf::from("a.md"), "A2".to_owned(), &mut dialogs);

        assert_eq!(first, Replace::Declined);
        assert_eq!(again, Replace::Ignored);
        assert_eq!(dialogs.prompts.len(), 1);
        assert_eq!(ctl.document().buffer(), "A");
    }

    #[test]
    fn external_change_matching_original_or_other_path_is_ignored() {
        let mut ctl = loaded("a.md", "A");
        let mut dialogs = ScriptedDialogs::default();

        let same = ctl.file_changed(WINDOW, PathBuf::from("a.md"), "A".to_owned(), &mut dialogs);
        let stale = ctl.file_changed(WINDOW, PathBuf::from("old.md"), "X".to_owned(), &mut dialogs);

        assert_eq!(same, Replace::Ignored);
        assert_eq!(stale, Replace::Ignored);
        assert!(dialogs.prompts.is_empty());
    }

    #[test]
    fn revert_clears_edits() {
        let mut ctl = loaded("a.md", "A");
        let view = type_text(&mut ctl, "changed");
        assert!(view.edited);
        assert_eq!(view.title, "a.md - Fire Sale (Edited)");

        ctl.revert();
        assert_eq!(ctl.document().buffer(), "A");
        assert!(!ctl.view().edited);
    }

    #[test]
    fn drag_feedback_follows_media_type() {
        let mut ctl = DocumentController::default();
        assert_eq!(ctl.drag_over("text/markdown"), DragFeedback::Accept);
        assert_eq!(ctl.drag_over("image/png"), DragFeedback::Reject);
        ctl.drag_leave();
        assert_eq!(ctl.drag_feedback(), DragFeedback::None);
    }

    #[test]
    fn notices_are_only_cleared_by_their_own_kind() {
        let mut ctl = DocumentController::default();
        ctl.set_notice(NoticeSource::File, "save failed");

        ctl.clear_notice_from(NoticeSource::Export);
        assert_eq!(ctl.notice(), Some("save failed"));

        ctl.clear_notice_from(NoticeSource::File);
        assert_eq!(ctl.notice(), None);
    }
}
