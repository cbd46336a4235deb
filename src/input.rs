// Translated input events plus the held-input snapshot the frame update
// reads. minifb exposes input as pollable state rather than an event queue;
// the window shell diffs consecutive polls into these discrete events, and
// the pad consumes them without ever touching the backend.

use minifb::Key;

/// Mouse buttons the pad tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Left,
    Middle,
    Right,
}

/// One translated backend event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The window was closed.
    Quit,
    /// New client size in pixels.
    Resized { width: usize, height: usize },
    FocusGained,
    FocusLost,
    /// `ctrl` records whether a Ctrl key was held when this key went down.
    KeyDown { key: Key, ctrl: bool },
    KeyUp { key: Key },
    ButtonDown(Button),
    ButtonUp(Button),
    /// Absolute position plus the motion since the previous poll.
    MouseMotion { x: i32, y: i32, dx: i32, dy: i32 },
}

/// Currently-held keys/buttons and the latest mouse data. Starts zeroed;
/// written only by event translation, read-only everywhere else.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Color-cycle key held; the pen color advances every frame this is set.
    pub cycle: bool,
    pub mouse_left: bool,
    pub mouse_middle: bool,
    pub mouse_right: bool,
    /// Mouse position in window coordinates.
    pub x: i32,
    pub y: i32,
    /// Motion since the previous poll; stays zero on polls without a motion
    /// event.
    pub dx: i32,
    pub dy: i32,
}
