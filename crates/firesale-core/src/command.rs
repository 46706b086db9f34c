//! The command surface: what menus, toolbar buttons and shortcuts can ask for.

use std::path::PathBuf;

use crate::{APP_NAME, WindowId, lifecycle::Platform};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    NewWindow,
    OpenFile,
    OpenRecent(PathBuf),
    ClearRecent,
    SaveMarkdown,
    SaveHtml,
    Revert,
    Edit(EditAction),
    Minimize,
    CloseWindow,
    About,
    VisitWebsite,
    Hide,
    HideOthers,
    ShowAll,
    BringAllToFront,
    /// Raise one window, picked from the Window menu.
    FocusWindow(WindowId),
    Quit,
}

/// Standard text-field operations, performed natively by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
}

/// Work the session hands back to the toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostAction {
    Edit(EditAction),
    Minimize,
    /// Ask to close the window; goes through the unsaved-changes gate.
    Close,
    Hide,
    HideOthers,
    ShowAll,
    BringAllToFront,
    Focus(WindowId),
    About,
    /// Open [`crate::WEBSITE`] in the default browser.
    OpenWebsite,
    Quit,
}

impl Command {
    /// Commands the host performs itself; `None` for document and file commands.
    #[must_use]
    pub const fn host_action(&self) -> Option<HostAction> {
        Some(match self {
            Self::Edit(action) => HostAction::Edit(*action),
            Self::Minimize => HostAction::Minimize,
            Self::CloseWindow => HostAction::Close,
            Self::About => HostAction::About,
            Self::VisitWebsite => HostAction::OpenWebsite,
            Self::Hide => HostAction::Hide,
            Self::HideOthers => HostAction::HideOthers,
            Self::ShowAll => HostAction::ShowAll,
            Self::BringAllToFront => HostAction::BringAllToFront,
            Self::FocusWindow(window) => HostAction::Focus(*window),
            Self::Quit => HostAction::Quit,
            Self::NewWindow
            | Self::OpenFile
            | Self::OpenRecent(_)
            | Self::ClearRecent
            | Self::SaveMarkdown
            | Self::SaveHtml
            | Self::Revert => return None,
        })
    }

    /// Only meaningful while the document has unsaved edits.
    #[must_use]
    pub const fn needs_edits(&self) -> bool {
        matches!(self, Self::SaveMarkdown | Self::Revert)
    }
}

/// A keyboard shortcut. `command` is Cmd on macOS and Ctrl elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Accelerator {
    pub command: bool,
    pub shift: bool,
    pub alt: bool,
    pub key: char,
}

impl Accelerator {
    #[must_use]
    pub const fn cmd(key: char) -> Self {
        Self {
            command: true,
            shift: false,
            alt: false,
            key,
        }
    }

    #[must_use]
    pub const fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub const fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    #[must_use]
    pub fn label(self, platform: Platform) -> String {
        let mut out = String::new();
        let mac = platform == Platform::MacOs;
        if self.shift {
            out.push_str("Shift+");
        }
        if self.alt {
            out.push_str(if mac { "Option+" } else { "Alt+" });
        }
        if self.command {
            out.push_str(if mac { "Cmd+" } else { "Ctrl+" });
        }
        out.push(self.key.to_ascii_uppercase());
        out
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub command: Command,
    pub accelerator: Option<Accelerator>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator,
    /// Expanded by the host into the recent-documents submenu.
    RecentDocuments,
    /// Expanded by the host into one entry per open window.
    WindowList,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Menu {
    pub label: String,
    pub entries: Vec<MenuEntry>,
}

fn item(label: impl Into<String>, command: Command, accelerator: Option<Accelerator>) -> MenuEntry {
    MenuEntry::Item(MenuItem {
        label: label.into(),
        command,
        accelerator,
    })
}

fn edit_items() -> [MenuEntry; 4] {
    [
        item("Cut", Command::Edit(EditAction::Cut), Some(Accelerator::cmd('x'))),
        item("Copy", Command::Edit(EditAction::Copy), Some(Accelerator::cmd('c'))),
        item("Paste", Command::Edit(EditAction::Paste), Some(Accelerator::cmd('v'))),
        item(
            "Select All",
            Command::Edit(EditAction::SelectAll),
            Some(Accelerator::cmd('a')),
        ),
    ]
}

/// The window menu bar, with the application menu first on macOS.
#[must_use]
pub fn menu_bar(platform: Platform) -> Vec<Menu> {
    let mut menus = Vec::with_capacity(5);

    if platform == Platform::MacOs {
        menus.push(Menu {
            label: APP_NAME.to_owned(),
            entries: vec![
                item(format!("About {APP_NAME}"), Command::About, None),
                MenuEntry::Separator,
                item(format!("Hide {APP_NAME}"), Command::Hide, Some(Accelerator::cmd('h'))),
                item(
                    "Hide Others",
                    Command::HideOthers,
                    Some(Accelerator::cmd('h').alt()),
                ),
                item("Show All", Command::ShowAll, None),
                MenuEntry::Separator,
                item(format!("Quit {APP_NAME}"), Command::Quit, Some(Accelerator::cmd('q'))),
            ],
        });
    }

    let mut file = vec![
        item("New Window", Command::NewWindow, Some(Accelerator::cmd('n'))),
        item("Open File…", Command::OpenFile, Some(Accelerator::cmd('o'))),
        MenuEntry::RecentDocuments,
        MenuEntry::Separator,
        item("Save Markdown", Command::SaveMarkdown, Some(Accelerator::cmd('s'))),
        item(
            "Save as HTML…",
            Command::SaveHtml,
            Some(Accelerator::cmd('s').shift()),
        ),
        item("Revert", Command::Revert, None),
    ];
    if platform != Platform::MacOs {
        file.push(MenuEntry::Separator);
        file.push(item("Quit", Command::Quit, Some(Accelerator::cmd('q'))));
    }
    menus.push(Menu {
        label: "File".to_owned(),
        entries: file,
    });

    let mut edit = vec![
        item("Undo", Command::Edit(EditAction::Undo), Some(Accelerator::cmd('z'))),
        item(
            "Redo",
            Command::Edit(EditAction::Redo),
            Some(Accelerator::cmd('z').shift()),
        ),
        MenuEntry::Separator,
    ];
    edit.extend(edit_items());
    menus.push(Menu {
        label: "Edit".to_owned(),
        entries: edit,
    });

    let mut window = vec![
        item("Minimize", Command::Minimize, Some(Accelerator::cmd('m'))),
        item("Close", Command::CloseWindow, Some(Accelerator::cmd('w'))),
    ];
    if platform == Platform::MacOs {
        window.push(MenuEntry::Separator);
        window.push(item("Bring All to Front", Command::BringAllToFront, None));
    }
    window.push(MenuEntry::Separator);
    window.push(MenuEntry::WindowList);
    menus.push(Menu {
        label: "Window".to_owned(),
        entries: window,
    });

    let mut help = vec![item("Visit Website", Command::VisitWebsite, None)];
    if platform != Platform::MacOs {
        help.push(MenuEntry::Separator);
        help.push(item(format!("About {APP_NAME}"), Command::About, None));
    }
    menus.push(Menu {
        label: "Help".to_owned(),
        entries: help,
    });

    menus
}

/// Right-click menu of the editor.
#[must_use]
pub fn context_menu() -> Vec<MenuEntry> {
    let mut entries = vec![
        item("Open File…", Command::OpenFile, None),
        MenuEntry::Separator,
    ];
    entries.extend(edit_items());
    entries
}

/// Find the menu command bound to `accelerator`.
#[must_use]
pub fn command_for_accelerator(platform: Platform, accelerator: Accelerator) -> Option<Command> {
    menu_bar(platform)
        .into_iter()
        .flat_map(|menu| menu.entries)
        .find_map(|entry| match entry {
            MenuEntry::Item(item) if item.accelerator == Some(accelerator) => Some(item.command),
            _ => None,
        })
}
