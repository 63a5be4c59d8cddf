#![forbid(unsafe_code)]

//! Mobile navigation menu.

use crate::trace;

/// Open/closed flag mirrored onto the menu and its hamburger control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    #[must_use]
    pub const fn new() -> Self {
        Self { open: false }
    }

    /// Flip the menu. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        trace!(open = self.open, "nav menu toggled");
        self.open
    }

    /// Close after a navigation link was followed. Returns whether the menu
    /// was open.
    pub fn close(&mut self) -> bool {
        core::mem::replace(&mut self.open, false)
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }
}
