#![forbid(unsafe_code)]

//! Window, document and file orchestration for `firesale` (GUI + CLI).
//!
//! Nothing in here knows about a GUI toolkit. The desktop shell implements
//! [`host::Dialogs`] and drives a [`session::Session`]; everything else
//! (edited state, save/open/revert, external change detection, window
//! lifecycle) happens in this crate.

pub mod command;
pub mod controller;
pub mod disk;
pub mod document;
pub mod error;
pub mod file_service;
pub mod host;
pub mod lifecycle;
pub mod markdown;
pub mod recent;
pub mod registry;
pub mod session;
pub mod watch;

/// Display name used in window titles and the application menu.
pub const APP_NAME: &str = "Fire Sale";

/// Project home page, opened from Help > Visit Website.
pub const WEBSITE: &str = env!("CARGO_PKG_REPOSITORY");

/// Hard cap on file sizes we will load into memory.
pub const MAX_FILE_BYTES: u64 = 64 * 1024 * 1024;

pub use error::FileError;
pub use host::{DialogOutcome, WindowId};
pub use session::Session;

#[cfg(test)]
pub(crate) mod testing;
