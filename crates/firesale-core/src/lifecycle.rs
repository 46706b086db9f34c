/// Which desktop conventions apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    /// Apps stay resident with no windows, have an application menu, and
    /// re-open a window when re-activated.
    MacOs,
    Other,
}

impl Platform {
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }

    #[must_use]
    pub const fn stays_resident(self) -> bool {
        matches!(self, Self::MacOs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllClosed {
    Exit,
    StayResident,
}

/// What to do once the last window is gone.
#[must_use]
pub const fn on_all_windows_closed(platform: Platform) -> AllClosed {
    if platform.stays_resident() {
        AllClosed::StayResident
    } else {
        AllClosed::Exit
    }
}

/// Whether re-activating the app should open a fresh window.
#[must_use]
pub const fn should_reopen_on_activate(has_visible_windows: bool) -> bool {
    !has_visible_windows
}
