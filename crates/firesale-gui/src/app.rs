use std::{collections::HashMap, path::PathBuf, sync::mpsc::Receiver};

use eframe::egui;
use firesale_core::{
    APP_NAME, Session, WEBSITE, WindowId,
    command::{Command, HostAction},
    controller::DragFeedback,
    document,
    lifecycle::{AllClosed, Platform},
    registry::Position,
    watch::{NotifyBackend, WatchEvent},
};

use crate::{
    dialogs::NativeDialogs,
    editor::{self, EditorState, MenuContext},
    shortcuts,
};

const WINDOW_SIZE: [f32; 2] = [1100.0, 720.0];
const MIN_WINDOW_SIZE: [f32; 2] = [560.0, 320.0];

pub(crate) struct FireSaleApp {
    session: Session<NotifyBackend>,
    dialogs: NativeDialogs,
    watch_events: Receiver<WatchEvent>,
    editors: HashMap<WindowId, EditorState>,
    bindings: Vec<(egui::KeyboardShortcut, Command)>,
    launcher_visible: bool,
}

fn viewport_id(window: WindowId) -> egui::ViewportId {
    egui::ViewportId::from_hash_of(("firesale-window", window.get()))
}

/// What the viewport of one window reported back after drawing.
struct WindowFrame {
    output: editor::FrameOutput,
    close_requested: bool,
    focused: bool,
    outer_position: Option<egui::Pos2>,
    hovered: Option<String>,
    dropped: Vec<(PathBuf, String)>,
}

impl FireSaleApp {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, paths: Vec<PathBuf>) -> Self {
        let ctx = cc.egui_ctx.clone();
        let (backend, watch_events) = NotifyBackend::channel();
        let backend = backend.with_waker(move || ctx.request_repaint());

        let platform = Platform::current();
        let mut session = Session::new(backend, platform);
        session.launch(paths);

        Self {
            session,
            dialogs: NativeDialogs,
            watch_events,
            editors: HashMap::new(),
            bindings: shortcuts::bindings(platform),
            launcher_visible: false,
        }
    }

    fn poll_watches(&mut self) {
        let events: Vec<_> = self.watch_events.try_iter().collect();
        if !events.is_empty() {
            log::debug!("{} watch event(s)", events.len());
            self.session.poll_watch_events(events, &mut self.dialogs);
        }
    }

    fn show_window(&mut self, ctx: &egui::Context, window: WindowId, menus: &MenuContext<'_>) {
        let Some(slot) = self.session.windows().get(window) else {
            return;
        };
        let visible = slot.is_visible();
        let view = slot.controller().view();
        let state = self
            .editors
            .entry(window)
            .or_insert_with(|| EditorState::new(slot.position()));
        if state.sync_edited(view.edited) {
            // eframe has no viewport command for the native unsaved-changes
            // marker; the " (Edited)" title suffix carries it instead.
            log::debug!("window {} edited: {}", window.get(), view.edited);
        }
        let title = view.title;

        let mut builder = egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(MIN_WINDOW_SIZE)
            .with_drag_and_drop(true)
            .with_visible(visible);
        if let Some(position) = state.initial_position {
            builder = builder.with_position([position.x, position.y]);
        }

        let bindings = &self.bindings;
        let windows = self.session.windows_mut();
        let frame = ctx.show_viewport_immediate(viewport_id(window), builder, |ctx, _class| {
            let slot = windows.get_mut(window)?;
            let mut output = editor::show(ctx, window, state, slot.controller_mut(), menus);
            output.commands.extend(shortcuts::consume(ctx, bindings));

            let (close_requested, focused, outer_position, hovered, dropped) = ctx.input(|input| {
                let info = input.viewport();
                let hovered = input.raw.hovered_files.first().map(|file| {
                    document::media_type_for(file.path.as_deref(), &file.mime)
                });
                let dropped = input
                    .raw
                    .dropped_files
                    .iter()
                    .filter_map(|file| {
                        let path = file.path.clone()?;
                        let media = document::media_type_for(Some(&path), &file.mime);
                        Some((path, media))
                    })
                    .collect::<Vec<_>>();
                (
                    info.close_requested(),
                    info.focused.unwrap_or(false),
                    info.outer_rect.map(|rect| rect.min),
                    hovered,
                    dropped,
                )
            });
            if close_requested {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            }

            Some(WindowFrame {
                output,
                close_requested,
                focused,
                outer_position,
                hovered,
                dropped,
            })
        });
        let Some(frame) = frame else {
            return;
        };

        self.after_frame(ctx, window, visible, frame);
    }

    fn after_frame(&mut self, ctx: &egui::Context, window: WindowId, was_visible: bool, frame: WindowFrame) {
        if let Some(pos) = frame.outer_position {
            self.session
                .windows_mut()
                .set_position(window, Position::new(pos.x, pos.y));
        }
        if frame.focused {
            self.session.windows_mut().set_focused(Some(window));
        } else if self.session.windows().focused() == Some(window) {
            self.session.windows_mut().set_focused(None);
        }

        if !was_visible {
            // First layout done; show it and load any launch file.
            self.session.window_ready(window, &mut self.dialogs);
            ctx.request_repaint();
        }

        if frame.output.edited {
            self.session.input(window);
            refresh_title(ctx, window);
        }

        match frame.hovered {
            Some(media) => {
                self.session.drag_over(window, &media);
            }
            None => {
                let dragging = self
                    .session
                    .windows()
                    .get(window)
                    .is_some_and(|slot| slot.controller().drag_feedback() != DragFeedback::None);
                if dragging {
                    self.session.drag_leave(window);
                }
            }
        }
        for (path, media) in frame.dropped {
            self.session.drop_file(window, path, &media, &mut self.dialogs);
        }

        for command in frame.output.commands {
            if let Some(action) = self.session.dispatch(window, command, &mut self.dialogs) {
                self.perform(ctx, window, action);
            }
        }
        if frame.close_requested {
            self.perform(ctx, window, HostAction::Close);
        }
    }

    fn perform(&mut self, ctx: &egui::Context, window: WindowId, action: HostAction) {
        let others: Vec<_> = self
            .session
            .windows()
            .ids()
            .filter(|id| *id != window)
            .collect();

        match action {
            HostAction::Edit(edit) => {
                if let Some(state) = self.editors.get_mut(&window) {
                    state.queue_edit(ctx, viewport_id(window), edit);
                }
            }
            HostAction::Minimize => {
                ctx.send_viewport_cmd_to(viewport_id(window), egui::ViewportCommand::Minimized(true));
            }
            HostAction::Close => {
                self.session.request_close(window, &mut self.dialogs);
            }
            HostAction::Hide => {
                for id in others.iter().copied().chain([window]) {
                    ctx.send_viewport_cmd_to(viewport_id(id), egui::ViewportCommand::Minimized(true));
                }
            }
            HostAction::HideOthers => {
                for id in others {
                    ctx.send_viewport_cmd_to(viewport_id(id), egui::ViewportCommand::Minimized(true));
                }
            }
            HostAction::ShowAll => {
                for id in others.iter().copied().chain([window]) {
                    ctx.send_viewport_cmd_to(viewport_id(id), egui::ViewportCommand::Minimized(false));
                }
            }
            HostAction::BringAllToFront => {
                // The invoking window ends up on top.
                for id in others.iter().copied().chain([window]) {
                    raise(ctx, id);
                }
            }
            HostAction::Focus(target) => raise(ctx, target),
            HostAction::About => {
                if let Some(state) = self.editors.get_mut(&window) {
                    state.about_open = true;
                }
            }
            HostAction::OpenWebsite => ctx.open_url(egui::OpenUrl::new_tab(WEBSITE)),
            HostAction::Quit => self.quit(ctx),
        }
    }

    fn quit(&mut self, ctx: &egui::Context) {
        if self.session.request_quit(&mut self.dialogs) {
            log::info!("quitting");
            ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Close);
        }
    }

    /// The root viewport: invisible while windows are open, a small launcher
    /// when the app stays resident without any.
    fn show_root(&mut self, ctx: &egui::Context) {
        if ctx.input(|input| input.viewport().close_requested()) && !self.session.windows().is_empty() {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.quit(ctx);
        }

        let resident = self.session.all_windows_closed() == Some(AllClosed::StayResident);
        if resident != self.launcher_visible {
            self.launcher_visible = resident;
            ctx.send_viewport_cmd(egui::ViewportCommand::Visible(resident));
        }
        if !resident {
            return;
        }

        let mut open_file = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(16.0);
                ui.heading(APP_NAME);
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui.button("New Window").clicked() {
                        self.session.activate();
                    }
                    if ui.button("Open File…").clicked() {
                        open_file = true;
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        if open_file && let Some(window) = self.session.activate() {
            self.session.dispatch(window, Command::OpenFile, &mut self.dialogs);
        }
    }
}

/// Redraw a window whose title predates this frame's keystroke.
fn refresh_title(ctx: &egui::Context, window: WindowId) {
    ctx.request_repaint_of(viewport_id(window));
}

fn raise(ctx: &egui::Context, window: WindowId) {
    let viewport = viewport_id(window);
    ctx.send_viewport_cmd_to(viewport, egui::ViewportCommand::Minimized(false));
    ctx.send_viewport_cmd_to(viewport, egui::ViewportCommand::Focus);
}

impl eframe::App for FireSaleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_watches();

        let recent: Vec<PathBuf> = self
            .session
            .files()
            .recent()
            .iter()
            .map(PathBuf::from)
            .collect();
        let windows: Vec<(WindowId, String)> = self
            .session
            .windows()
            .ids()
            .filter_map(|id| {
                let slot = self.session.windows().get(id)?;
                slot.is_visible().then(|| (id, slot.controller().view().title))
            })
            .collect();
        let menus = MenuContext {
            platform: self.session.platform(),
            recent: &recent,
            windows: &windows,
        };

        let ids: Vec<_> = self.session.windows().ids().collect();
        for window in ids {
            self.show_window(ctx, window, &menus);
        }
        self.editors
            .retain(|id, _| self.session.windows().contains(*id));

        self.show_root(ctx);

        if self.session.all_windows_closed() == Some(AllClosed::Exit) {
            log::info!("last window closed");
            ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Close);
        }
    }
}
