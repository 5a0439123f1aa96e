//! Interaction modes.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Viewing,
    Painting,
    Help,
    Processing,
}

/// Current mode plus the mode the help overlay covers.
///
/// Help can open over any mode. Transitions that happen while it is open
/// (a decode finishing, a new drop) change the covered mode, so closing help
/// lands in the right place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeState {
    help_open: bool,
    underlying: Mode,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            help_open: false,
            underlying: Mode::Viewing,
        }
    }
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Mode {
        if self.help_open {
            Mode::Help
        } else {
            self.underlying
        }
    }

    /// The mode beneath the help overlay (the current mode when help is closed).
    pub fn underlying(&self) -> Mode {
        self.underlying
    }

    /// Open or close help; returns the new current mode.
    pub fn toggle_help(&mut self) -> Mode {
        self.help_open = !self.help_open;
        self.current()
    }

    pub fn close_help(&mut self) {
        self.help_open = false;
    }

    /// Move the underlying mode. `Mode::Help` is ignored; use [`ModeState::toggle_help`].
    pub fn set(&mut self, mode: Mode) {
        if mode != Mode::Help {
            self.underlying = mode;
        }
    }
}
