use std::path::PathBuf;

use firesale_core::{
    DialogOutcome, WindowId,
    host::{Dialogs, FileFilter, MessageBox, MessageKind, SaveDialog},
};
use rfd::{MessageButtons, MessageDialogResult, MessageLevel};

/// [`Dialogs`] backed by the platform's native pickers and message boxes.
///
/// rfd blocks until the user answers, which keeps each window to a single
/// dialog at a time.
#[derive(Debug, Default)]
pub(crate) struct NativeDialogs;

impl Dialogs for NativeDialogs {
    fn open_file(&mut self, window: WindowId, filter: &FileFilter) -> DialogOutcome<PathBuf> {
        log::debug!("open dialog for window {}", window.get());
        rfd::FileDialog::new()
            .set_title("Open File")
            .add_filter(filter.name, filter.extensions)
            .pick_file()
            .into()
    }

    fn save_file(&mut self, window: WindowId, dialog: &SaveDialog) -> DialogOutcome<PathBuf> {
        log::debug!("save dialog for window {}", window.get());
        let mut picker = rfd::FileDialog::new()
            .set_title(dialog.title)
            .add_filter(dialog.filter.name, dialog.filter.extensions);
        if let Some(dir) = dialog.default_dir.as_deref() {
            picker = picker.set_directory(dir);
        }
        picker.save_file().into()
    }

    fn message_box(&mut self, _window: WindowId, message: &MessageBox) -> usize {
        let description = match message.detail.as_deref() {
            Some(detail) => format!("{}\n\n{detail}", message.message),
            None => message.message.clone(),
        };

        let result = rfd::MessageDialog::new()
            .set_level(level(message.kind))
            .set_title(message.title.as_str())
            .set_description(description)
            .set_buttons(buttons(&message.buttons))
            .show();
        chosen_index(message, &result)
    }
}

const fn level(kind: MessageKind) -> MessageLevel {
    match kind {
        MessageKind::Info => MessageLevel::Info,
        MessageKind::Warning => MessageLevel::Warning,
    }
}

fn buttons(labels: &[&'static str]) -> MessageButtons {
    match labels {
        [ok] => MessageButtons::OkCustom((*ok).to_owned()),
        [ok, cancel] => MessageButtons::OkCancelCustom((*ok).to_owned(), (*cancel).to_owned()),
        [yes, no, cancel] => MessageButtons::YesNoCancelCustom(
            (*yes).to_owned(),
            (*no).to_owned(),
            (*cancel).to_owned(),
        ),
        _ => MessageButtons::Ok,
    }
}

/// Map whatever the native box reported back to a button index.
fn chosen_index(message: &MessageBox, result: &MessageDialogResult) -> usize {
    match result {
        MessageDialogResult::Custom(label) => message
            .buttons
            .iter()
            .position(|button| button == label)
            .unwrap_or(message.cancel_id),
        MessageDialogResult::Ok | MessageDialogResult::Yes => message.default_id,
        MessageDialogResult::No | MessageDialogResult::Cancel => message.cancel_id,
    }
}
