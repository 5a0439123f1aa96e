//! Keyboard command surface and pointer events.
//!
//! The input source reports raw keys with modifier state; [`bind`] turns them
//! into [`Command`]s for the current mode.

use crate::view::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Backspace,
    Delete,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        meta: false,
    };

    pub fn step(&self) -> Step {
        Step::from_shift(self.shift)
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Everything a key press can ask the pipeline to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AdjustThreshold(i32),
    AdjustZoom(i32),
    AdjustBrush(i32),
    /// Pan by this many pan steps (negative is up).
    Pan(i32),
    TogglePaint,
    ToggleErase,
    ToggleHelp,
    ToggleUi,
    ToggleFit,
    Reset,
    Invert,
    ClearPaint,
    Export,
}

/// Map a key press to a command. `painting` selects the paint-mode bindings.
pub fn bind(key: Key, mods: Modifiers, painting: bool) -> Option<Command> {
    let step = mods.step().amount();
    let command = match key {
        Key::Up => Command::AdjustThreshold(step),
        Key::Down => Command::AdjustThreshold(-step),
        Key::Right if painting => Command::AdjustBrush(step),
        Key::Left if painting => Command::AdjustBrush(-step),
        Key::Right => Command::AdjustZoom(step),
        Key::Left => Command::AdjustZoom(-step),
        Key::Backspace | Key::Delete if painting => Command::ClearPaint,
        Key::Char('x') if painting => Command::ToggleErase,
        Key::Char('s') if mods.command() => Command::Export,
        Key::Char('p') => Command::TogglePaint,
        Key::Char('?') => Command::ToggleHelp,
        Key::Char('h' | 'H') => Command::ToggleUi,
        Key::Char('r') => Command::Reset,
        Key::Char('i') => Command::Invert,
        Key::Char('f') => Command::ToggleFit,
        Key::Char('>') => Command::Pan(1),
        Key::Char('<') => Command::Pan(-1),
        _ => return None,
    };
    Some(command)
}

/// Pointer input in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
}

/// Whether a dropped file's declared MIME type is an image.
///
/// Accepts `image/<subtype>` and the bare `image` category.
pub fn is_image_mime(mime: &str) -> bool {
    mime.split('/')
        .next()
        .is_some_and(|top| top.trim().eq_ignore_ascii_case("image"))
}
