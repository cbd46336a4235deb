// The drawing pad state machine: event translation into held-input state,
// the once-per-frame pen update, and composing the canvas plus cursor
// overlay into a frame buffer. Pure state and pixels; the shell in window.rs
// feeds it events and presents what it composes, so everything here runs
// under tests without a window.

use minifb::Key;
use tracing::debug;

use crate::input::{Button, Event, InputState};
use crate::palette::Palette;
use crate::surface::Surface;

/// Side of the square cursor indicator drawn over the pen tip.
const CURSOR_SIZE: i32 = 5;

const WHITE: u32 = 0x00FF_FFFF;
const BLACK: u32 = 0x0000_0000;

pub struct Pad {
    pub input: InputState,
    /// Pen tip, kept inside [0, resx) x [0, resy) by the frame update.
    pub pen_x: i32,
    pub pen_y: i32,
    /// Index into the color ramp.
    pub pen_color: usize,
    /// Whether the pen leaves ink. Flipped per press of the toggle key.
    pub can_draw: bool,
    /// Persistent ink layer. A resize reallocates it and the old content is
    /// gone; the compositor redraws it onto the frame every iteration.
    pub canvas: Surface,
    pub quit: bool,
    /// Keyboard focus lost. A label only; the loop keeps running.
    pub paused: bool,
    pub fullscreen: bool,
    /// Terminal: once set the main loop exits without further draw calls.
    pub error: bool,
    resx: usize,
    resy: usize,
    palette: Palette,
    // Set by F11, consumed by the shell that owns the window.
    mode_switch: bool,
}

impl Pad {
    /// A fresh pad: pen centered, ink enabled, color at the start of the
    /// ramp, empty canvas.
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            input: InputState::default(),
            pen_x: width as i32 / 2,
            pen_y: height as i32 / 2,
            pen_color: 0,
            can_draw: true,
            canvas: Surface::new(width, height),
            quit: false,
            paused: false,
            fullscreen: false,
            error: false,
            resx: width,
            resy: height,
            palette: Palette::new(),
            mode_switch: false,
        }
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.resx, self.resy)
    }

    /// Adopt a new window size and reallocate the canvas to match. The old
    /// ink is discarded, not copied; this matches the visible behavior of
    /// the pad and is relied on by the resize tests.
    pub fn set_resolution(&mut self, width: usize, height: usize) {
        // A minimized window can report zero; keep the wrap modulo well-defined.
        self.resx = width.max(1);
        self.resy = height.max(1);
        self.canvas.resize(self.resx, self.resy);
    }

    /// True once per fullscreen request; the shell rebuilds the window and
    /// reports the new size back through `set_resolution`.
    pub fn take_mode_switch(&mut self) -> bool {
        std::mem::take(&mut self.mode_switch)
    }

    /// Apply one poll cycle's worth of translated events.
    pub fn handle_events(&mut self, events: &[Event]) {
        // Motion deltas are per-poll: a cycle with no motion event reports zero.
        self.input.dx = 0;
        self.input.dy = 0;
        for ev in events {
            self.handle_event(ev);
        }
    }

    fn handle_event(&mut self, ev: &Event) {
        match *ev {
            Event::Quit => {
                debug!("window closed, quit");
                self.quit = true;
            }
            Event::Resized { width, height } => {
                debug!(width, height, "window resized");
                self.set_resolution(width, height);
            }
            Event::FocusLost => {
                debug!("keyboard focus lost");
                self.paused = true;
            }
            Event::FocusGained => {
                debug!("keyboard focus gained");
                self.paused = false;
            }
            Event::KeyDown { key, ctrl } => self.handle_key_down(key, ctrl),
            Event::KeyUp { key } => self.handle_key_up(key),
            Event::ButtonDown(button) => self.set_button(button, true),
            Event::ButtonUp(button) => self.set_button(button, false),
            Event::MouseMotion { x, y, dx, dy } => {
                self.input.x = x;
                self.input.y = y;
                self.input.dx = dx;
                self.input.dy = dy;
            }
        }
    }

    fn handle_key_down(&mut self, key: Key, ctrl: bool) {
        match key {
            Key::Escape => {
                debug!("escape pressed, quit");
                self.quit = true;
            }
            Key::F11 => {
                debug!("toggle fullscreen");
                self.fullscreen = !self.fullscreen;
                self.mode_switch = true;
            }
            Key::Up => self.input.up = true,
            Key::Down => self.input.down = true,
            Key::Left => self.input.left = true,
            Key::Right => self.input.right = true,
            Key::C => self.input.cycle = true,
            // The clear happens here, during translation, not on the next
            // frame.
            Key::X if ctrl => self.canvas.fill(BLACK),
            // Edge-triggered: the shell suppresses OS key repeat, so holding
            // the key does not re-toggle.
            Key::P => self.can_draw = !self.can_draw,
            _ => {}
        }
    }

    fn handle_key_up(&mut self, key: Key) {
        match key {
            Key::Up => self.input.up = false,
            Key::Down => self.input.down = false,
            Key::Left => self.input.left = false,
            Key::Right => self.input.right = false,
            Key::C => self.input.cycle = false,
            _ => {}
        }
    }

    fn set_button(&mut self, button: Button, held: bool) {
        match button {
            Button::Left => self.input.mouse_left = held,
            Button::Middle => self.input.mouse_middle = held,
            Button::Right => self.input.mouse_right = held,
        }
    }

    /// Advance one frame: move the pen, cycle its color, plot into the
    /// canvas. Runs after event translation, before `compose`.
    pub fn update(&mut self) {
        // Looked up before the cycle advances: a pixel plotted this frame
        // uses the pre-advance color.
        let color = self.palette.color_at(self.pen_color);

        // Arrow movement; opposite keys cancel. True modulo wraps the pen
        // around the window edges instead of clamping.
        self.pen_x += self.input.right as i32 - self.input.left as i32;
        self.pen_x = self.pen_x.rem_euclid(self.resx as i32);
        self.pen_y += self.input.down as i32 - self.input.up as i32;
        self.pen_y = self.pen_y.rem_euclid(self.resy as i32);

        if self.input.cycle {
            self.pen_color = (self.pen_color + 1) % self.palette.len();
        }

        // Dragging repositions the pen and always suppresses drawing.
        if self.input.mouse_left {
            self.pen_x = self.input.x;
            self.pen_y = self.input.y;
        }

        if self.can_draw && !self.input.mouse_left {
            self.canvas.plot(self.pen_x, self.pen_y, color.pack());
        }
    }

    /// Composite the canvas and the cursor indicator into `frame`. The white
    /// square marks the pen tip on the frame only; it is never baked into
    /// the canvas.
    pub fn compose(&self, frame: &mut Surface) {
        frame.copy_from(&self.canvas);
        let half = CURSOR_SIZE / 2;
        frame.fill_rect(
            self.pen_x - half,
            self.pen_y - half,
            CURSOR_SIZE,
            CURSOR_SIZE,
            WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_down(key: Key) -> Event {
        Event::KeyDown { key, ctrl: false }
    }

    #[test]
    fn pen_wraps_with_true_modulo() {
        let mut pad = Pad::new(10, 8);
        pad.pen_x = 0;
        pad.pen_y = 0;
        pad.handle_events(&[key_down(Key::Left), key_down(Key::Up)]);
        pad.update();
        // Never negative: the pen re-enters from the opposite edge.
        assert_eq!((pad.pen_x, pad.pen_y), (9, 7));

        pad.handle_events(&[Event::KeyUp { key: Key::Left }, Event::KeyUp { key: Key::Up }]);
        pad.handle_events(&[key_down(Key::Right), key_down(Key::Down)]);
        pad.update();
        assert_eq!((pad.pen_x, pad.pen_y), (0, 0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut pad = Pad::new(10, 10);
        pad.handle_events(&[key_down(Key::Left), key_down(Key::Right)]);
        let before = (pad.pen_x, pad.pen_y);
        pad.update();
        assert_eq!((pad.pen_x, pad.pen_y), before);
    }

    #[test]
    fn pen_stays_in_range() {
        let combos = [
            &[key_down(Key::Left)][..],
            &[key_down(Key::Right)],
            &[key_down(Key::Up), key_down(Key::Right)],
            &[key_down(Key::Down), key_down(Key::Left)],
        ];
        for combo in combos {
            let mut pad = Pad::new(7, 5);
            pad.handle_events(combo);
            for _ in 0..40 {
                pad.update();
                assert!((0..7).contains(&pad.pen_x));
                assert!((0..5).contains(&pad.pen_y));
            }
        }
    }

    #[test]
    fn drag_overrides_arrows_and_suppresses_ink() {
        let mut pad = Pad::new(100, 100);
        pad.handle_events(&[
            key_down(Key::Right),
            Event::ButtonDown(Button::Left),
            Event::MouseMotion { x: 30, y: 40, dx: 5, dy: 5 },
        ]);
        pad.update();
        assert_eq!((pad.pen_x, pad.pen_y), (30, 40));
        assert_eq!(pad.canvas.pixel(30, 40), Some(0));

        // Release the drag: the pen draws again from where it was dropped.
        pad.handle_events(&[Event::ButtonUp(Button::Left)]);
        pad.update();
        assert_eq!((pad.pen_x, pad.pen_y), (31, 40));
        assert_ne!(pad.canvas.pixel(31, 40), Some(0));
    }

    #[test]
    fn pen_toggle_is_edge_triggered() {
        let mut pad = Pad::new(10, 10);
        assert!(pad.can_draw);
        pad.handle_events(&[key_down(Key::P)]);
        assert!(!pad.can_draw);
        // Holding the key produces no further KeyDown events, so frames
        // without events must not re-toggle.
        pad.handle_events(&[]);
        pad.update();
        assert!(!pad.can_draw);
        pad.handle_events(&[key_down(Key::P)]);
        assert!(pad.can_draw);
    }

    #[test]
    fn color_cycle_is_level_triggered() {
        let mut pad = Pad::new(10, 10);
        pad.handle_events(&[key_down(Key::C)]);
        for _ in 0..7 {
            pad.update();
        }
        assert_eq!(pad.pen_color, 7);

        pad.handle_events(&[Event::KeyUp { key: Key::C }]);
        pad.update();
        assert_eq!(pad.pen_color, 7);
    }

    #[test]
    fn ctrl_x_clears_canvas_immediately() {
        let mut pad = Pad::new(10, 10);
        pad.update();
        assert!(pad.canvas.pixels().iter().any(|&p| p != 0));

        pad.handle_events(&[Event::KeyDown { key: Key::X, ctrl: true }]);
        assert!(pad.canvas.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn x_without_ctrl_does_not_clear() {
        let mut pad = Pad::new(10, 10);
        pad.update();
        pad.handle_events(&[key_down(Key::X)]);
        assert!(pad.canvas.pixels().iter().any(|&p| p != 0));
    }

    #[test]
    fn resize_discards_ink() {
        let mut pad = Pad::new(10, 10);
        pad.update();
        assert!(pad.canvas.pixels().iter().any(|&p| p != 0));

        pad.handle_events(&[Event::Resized { width: 20, height: 5 }]);
        assert_eq!(pad.resolution(), (20, 5));
        assert_eq!(pad.canvas.size(), (20, 5));
        assert!(pad.canvas.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn motion_delta_resets_each_poll() {
        let mut pad = Pad::new(10, 10);
        pad.handle_events(&[Event::MouseMotion { x: 4, y: 4, dx: 2, dy: 3 }]);
        assert_eq!((pad.input.dx, pad.input.dy), (2, 3));

        pad.handle_events(&[]);
        assert_eq!((pad.input.dx, pad.input.dy), (0, 0));
        // Position sticks; only the delta is per-poll.
        assert_eq!((pad.input.x, pad.input.y), (4, 4));
    }

    #[test]
    fn fullscreen_request_is_consumed_once() {
        let mut pad = Pad::new(10, 10);
        assert!(!pad.take_mode_switch());
        pad.handle_events(&[key_down(Key::F11)]);
        assert!(pad.fullscreen);
        assert!(pad.take_mode_switch());
        assert!(!pad.take_mode_switch());
    }

    #[test]
    fn focus_toggles_paused_label() {
        let mut pad = Pad::new(10, 10);
        pad.handle_events(&[Event::FocusLost]);
        assert!(pad.paused);
        pad.handle_events(&[Event::FocusGained]);
        assert!(!pad.paused);
    }

    #[test]
    fn middle_and_right_buttons_are_tracked() {
        let mut pad = Pad::new(10, 10);
        pad.handle_events(&[Event::ButtonDown(Button::Middle), Event::ButtonDown(Button::Right)]);
        assert!(pad.input.mouse_middle);
        assert!(pad.input.mouse_right);
        pad.handle_events(&[Event::ButtonUp(Button::Middle)]);
        assert!(!pad.input.mouse_middle);
    }

    #[test]
    fn cursor_square_goes_on_frame_not_canvas() {
        let mut pad = Pad::new(20, 20);
        pad.can_draw = false;
        pad.update();

        let mut frame = Surface::new(20, 20);
        pad.compose(&mut frame);
        assert_eq!(frame.pixel(pad.pen_x, pad.pen_y), Some(WHITE));
        assert_eq!(frame.pixel(pad.pen_x - 2, pad.pen_y - 2), Some(WHITE));
        assert_eq!(pad.canvas.pixel(pad.pen_x, pad.pen_y), Some(0));
    }
}
