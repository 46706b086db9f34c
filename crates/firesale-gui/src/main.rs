#![forbid(unsafe_code)]
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

#[cfg(target_arch = "wasm32")]
compile_error!("firesale is a native desktop app; web/wasm builds are not supported.");

use std::{ffi::OsString, path::PathBuf};

use eframe::egui;

mod app;
mod dialogs;
mod editor;
mod shortcuts;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct LaunchOptions {
    /// Files to open, one window each.
    paths: Vec<PathBuf>,
}

fn parse_launch_options<I, S>(args: I) -> LaunchOptions
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut paths = Vec::new();
    let mut only_paths = false;

    for arg in args {
        let arg = arg.into();
        if !only_paths && arg == "--" {
            only_paths = true;
            continue;
        }
        // Platform launchers pass their own switches (e.g. `-psn_…` on macOS).
        if !only_paths && arg.to_string_lossy().starts_with('-') {
            log::debug!("ignoring launch flag {}", arg.to_string_lossy());
            continue;
        }
        paths.push(PathBuf::from(arg));
    }

    LaunchOptions { paths }
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let launch_options = parse_launch_options(std::env::args_os().skip(1));
    log::info!(
        "starting {} {} with {} file(s)",
        firesale_core::APP_NAME,
        env!("CARGO_PKG_VERSION"),
        launch_options.paths.len()
    );

    // The root viewport only hosts the editor windows; it is shown as a small
    // launcher when the app stays resident with nothing open.
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(firesale_core::APP_NAME)
            .with_inner_size([320.0, 160.0])
            .with_resizable(false)
            .with_visible(false),
        ..Default::default()
    };
    eframe::run_native(
        firesale_core::APP_NAME,
        options,
        Box::new(move |cc| Ok(Box::new(app::FireSaleApp::new(cc, launch_options.paths)))),
    )
}
