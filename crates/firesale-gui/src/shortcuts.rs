use eframe::egui::{self, Key, KeyboardShortcut, Modifiers};
use firesale_core::{
    command::{self, Accelerator, Command, MenuEntry},
    lifecycle::Platform,
};

/// Convert a menu accelerator to the egui shortcut it fires on.
pub(crate) fn to_shortcut(accelerator: Accelerator) -> Option<KeyboardShortcut> {
    let key = Key::from_name(&accelerator.key.to_ascii_uppercase().to_string())?;
    let mut modifiers = Modifiers::NONE;
    if accelerator.command {
        modifiers = modifiers | Modifiers::COMMAND;
    }
    if accelerator.shift {
        modifiers = modifiers | Modifiers::SHIFT;
    }
    if accelerator.alt {
        modifiers = modifiers | Modifiers::ALT;
    }
    Some(KeyboardShortcut::new(modifiers, key))
}

/// Shortcuts the app handles itself.
///
/// Edit commands are left to the focused text field, which already knows
/// them. Shortcuts with more modifiers come first so `Shift+Cmd+S` is not
/// taken by `Cmd+S`.
pub(crate) fn bindings(platform: Platform) -> Vec<(KeyboardShortcut, Command)> {
    let mut bindings: Vec<_> = command::menu_bar(platform)
        .into_iter()
        .flat_map(|menu| menu.entries)
        .filter_map(|entry| match entry {
            MenuEntry::Item(item) if !matches!(item.command, Command::Edit(_)) => {
                Some((to_shortcut(item.accelerator?)?, item.command))
            }
            _ => None,
        })
        .collect();
    bindings.sort_by_key(|(shortcut, _)| {
        std::cmp::Reverse(
            u8::from(shortcut.modifiers.shift)
                + u8::from(shortcut.modifiers.alt)
                + u8::from(shortcut.modifiers.command),
        )
    });
    bindings
}

/// Take this frame's matching key presses out of the input queue.
pub(crate) fn consume(ctx: &egui::Context, bindings: &[(KeyboardShortcut, Command)]) -> Vec<Command> {
    ctx.input_mut(|input| {
        bindings
            .iter()
            .filter(|(shortcut, _)| input.consume_shortcut(shortcut))
            .map(|(_, command)| command.clone())
            .collect()
    })
}
