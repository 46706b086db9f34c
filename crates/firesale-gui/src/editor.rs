use std::path::PathBuf;

use eframe::egui;
use firesale_core::{
    APP_NAME, WindowId,
    command::{self, Command, EditAction, MenuEntry},
    controller::{DocumentController, DragFeedback},
    lifecycle::Platform,
    registry::Position,
};
use firesale_md::Preview;

/// Per-window UI state that has no place in the document model.
#[derive(Debug, Default)]
pub(crate) struct EditorState {
    preview: Preview,
    /// Where the window was asked to appear when first created.
    pub(crate) initial_position: Option<Position>,
    pub(crate) about_open: bool,
    pending_keys: Vec<egui::Event>,
    focus_editor: bool,
    /// Last edited state handed to the platform's unsaved-changes hint.
    edited_hint: Option<bool>,
}

impl EditorState {
    pub(crate) fn new(initial_position: Option<Position>) -> Self {
        Self {
            initial_position,
            ..Self::default()
        }
    }

    /// Track the edited state behind the window's unsaved-changes hint.
    /// Returns `true` when it flipped since the last call.
    pub(crate) fn sync_edited(&mut self, edited: bool) -> bool {
        let changed = self.edited_hint != Some(edited);
        self.edited_hint = Some(edited);
        changed
    }

    /// Undo, redo and select-all reach the text field as synthetic key
    /// presses on the next frame; clipboard actions go through the viewport.
    pub(crate) fn queue_edit(&mut self, ctx: &egui::Context, viewport: egui::ViewportId, action: EditAction) {
        self.focus_editor = true;
        let press = |key, modifiers| egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        };
        match action {
            EditAction::Undo => self
                .pending_keys
                .push(press(egui::Key::Z, egui::Modifiers::COMMAND)),
            EditAction::Redo => self.pending_keys.push(press(
                egui::Key::Z,
                egui::Modifiers::COMMAND | egui::Modifiers::SHIFT,
            )),
            EditAction::SelectAll => self
                .pending_keys
                .push(press(egui::Key::A, egui::Modifiers::COMMAND)),
            EditAction::Cut => ctx.send_viewport_cmd_to(viewport, egui::ViewportCommand::RequestCut),
            EditAction::Copy => ctx.send_viewport_cmd_to(viewport, egui::ViewportCommand::RequestCopy),
            EditAction::Paste => {
                ctx.send_viewport_cmd_to(viewport, egui::ViewportCommand::RequestPaste);
            }
        }
        ctx.request_repaint_of(viewport);
    }
}

/// App-wide data the menus show.
pub(crate) struct MenuContext<'a> {
    pub(crate) platform: Platform,
    pub(crate) recent: &'a [PathBuf],
    pub(crate) windows: &'a [(WindowId, String)],
}

/// What happened in one window this frame.
#[derive(Debug, Default)]
pub(crate) struct FrameOutput {
    pub(crate) commands: Vec<Command>,
    /// The text field changed; the session must re-render and re-derive.
    pub(crate) edited: bool,
}

pub(crate) fn editor_id(window: WindowId) -> egui::Id {
    egui::Id::new(("firesale-editor", window.get()))
}

/// Draw one editor window into its viewport.
pub(crate) fn show(
    ctx: &egui::Context,
    window: WindowId,
    state: &mut EditorState,
    controller: &mut DocumentController,
    menus: &MenuContext<'_>,
) -> FrameOutput {
    let mut out = FrameOutput::default();

    if !state.pending_keys.is_empty() {
        let mut keys = std::mem::take(&mut state.pending_keys);
        ctx.input_mut(|input| input.events.append(&mut keys));
    }
    if std::mem::take(&mut state.focus_editor) {
        ctx.memory_mut(|memory| memory.request_focus(editor_id(window)));
    }

    egui::TopBottomPanel::top(egui::Id::new(("menu", window.get()))).show(ctx, |ui| {
        egui::containers::menu::MenuBar::new().ui(ui, |ui| {
            for menu in command::menu_bar(menus.platform) {
                ui.menu_button(menu.label.as_str(), |ui| {
                    menu_entries(ui, &menu.entries, controller, menus, &mut out.commands);
                });
            }
        });
    });

    egui::TopBottomPanel::top(egui::Id::new(("toolbar", window.get()))).show(ctx, |ui| {
        toolbar(ui, controller, &mut out.commands);
    });

    egui::TopBottomPanel::bottom(egui::Id::new(("status", window.get()))).show(ctx, |ui| {
        status_bar(ui, controller);
    });

    let doc = controller.document();
    state.preview.sync(doc.revision(), doc.buffer());

    egui::SidePanel::right(egui::Id::new(("preview", window.get())))
        .resizable(true)
        .min_width(240.0)
        .default_width(480.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt(("preview-scroll", window.get()))
                .auto_shrink([false; 2])
                .show(ui, |ui| state.preview.show(ui));
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        let feedback = controller.drag_feedback();
        egui::ScrollArea::vertical()
            .id_salt(("editor-scroll", window.get()))
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                let editor = egui::TextEdit::multiline(controller.document_mut().buffer_mut())
                    .id(editor_id(window))
                    .desired_width(f32::INFINITY)
                    .desired_rows(30)
                    .font(egui::TextStyle::Monospace)
                    .frame(false)
                    .hint_text("Write some markdown…");
                let response = ui.add(editor);
                if response.changed() {
                    out.edited = true;
                }
                response.context_menu(|ui| {
                    menu_entries(ui, &command::context_menu(), controller, menus, &mut out.commands);
                });
            });
        paint_drag_feedback(ui, feedback);
    });

    if state.about_open {
        about(ctx, window, &mut state.about_open);
    }

    out
}

fn menu_entries(
    ui: &mut egui::Ui,
    entries: &[MenuEntry],
    controller: &DocumentController,
    menus: &MenuContext<'_>,
    commands: &mut Vec<Command>,
) {
    let edited = controller.document().is_edited();
    for entry in entries {
        match entry {
            MenuEntry::Item(item) => {
                let mut button = egui::Button::new(item.label.as_str());
                if let Some(accelerator) = item.accelerator {
                    button = button.shortcut_text(accelerator.label(menus.platform));
                }
                let enabled = !item.command.needs_edits() || edited;
                if ui.add_enabled(enabled, button).clicked() {
                    commands.push(item.command.clone());
                    ui.close();
                }
            }
            MenuEntry::Separator => {
                ui.separator();
            }
            MenuEntry::RecentDocuments => {
                ui.menu_button("Open Recent", |ui| {
                    if menus.recent.is_empty() {
                        ui.add_enabled(false, egui::Button::new("No Recent Documents"));
                        return;
                    }
                    for path in menus.recent {
                        let label = path
                            .file_name()
                            .unwrap_or(path.as_os_str())
                            .to_string_lossy()
                            .into_owned();
                        let response = ui.button(label).on_hover_text(path.display().to_string());
                        if response.clicked() {
                            commands.push(Command::OpenRecent(path.clone()));
                            ui.close();
                        }
                    }
                    ui.separator();
                    if ui.button("Clear Menu").clicked() {
                        commands.push(Command::ClearRecent);
                        ui.close();
                    }
                });
            }
            MenuEntry::WindowList => {
                for (id, title) in menus.windows {
                    if ui.button(title.as_str()).clicked() {
                        commands.push(Command::FocusWindow(*id));
                        ui.close();
                    }
                }
            }
        }
    }
}

fn toolbar(ui: &mut egui::Ui, controller: &DocumentController, commands: &mut Vec<Command>) {
    let view = controller.view();
    ui.horizontal(|ui| {
        if ui.button("Open File").clicked() {
            commands.push(Command::OpenFile);
        }
        if ui
            .add_enabled(view.save_enabled, egui::Button::new("Save File"))
            .clicked()
        {
            commands.push(Command::SaveMarkdown);
        }
        if ui
            .add_enabled(view.revert_enabled, egui::Button::new("Revert"))
            .clicked()
        {
            commands.push(Command::Revert);
        }
        ui.separator();
        if ui.button("Save HTML").clicked() {
            commands.push(Command::SaveHtml);
        }
    });
}

fn status_bar(ui: &mut egui::Ui, controller: &mut DocumentController) {
    let mut dismiss = false;

    ui.horizontal(|ui| {
        let doc = controller.document();
        match doc.path() {
            Some(path) => ui.label(path.display().to_string()),
            None => ui.weak("Untitled"),
        };

        if doc.is_edited() {
            ui.separator();
            ui.colored_label(ui.visuals().warn_fg_color, "Edited");
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if let Some(notice) = controller.notice() {
                if ui.button("x").clicked() {
                    dismiss = true;
                }
                ui.colored_label(ui.visuals().error_fg_color, notice);
            }
        });
    });

    if dismiss {
        controller.clear_notice();
    }
}

fn paint_drag_feedback(ui: &egui::Ui, feedback: DragFeedback) {
    let color = match feedback {
        DragFeedback::None => return,
        DragFeedback::Accept => ui.visuals().selection.bg_fill,
        DragFeedback::Reject => ui.visuals().error_fg_color,
    };
    let rect = ui.max_rect();
    let painter = ui.painter();
    painter.rect_filled(rect, 4.0, color.gamma_multiply(0.15));
    painter.rect_stroke(
        rect.shrink(2.0),
        4.0,
        egui::Stroke::new(3.0, color),
        egui::StrokeKind::Inside,
    );
}

fn about(ctx: &egui::Context, window: WindowId, open: &mut bool) {
    egui::Window::new(format!("About {APP_NAME}"))
        .id(egui::Id::new(("about", window.get())))
        .open(open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(APP_NAME);
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.add_space(6.0);
                ui.label("A markdown editor with a live HTML preview.");
            });
        });
}
