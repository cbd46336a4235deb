// The minifb window shell. minifb reports input as pollable state, so this
// wraps it behind the event contract the pad expects: every poll diffs the
// previous snapshot against the current one and emits discrete events.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use tracing::debug;

use crate::error::Error;
use crate::input::{Button, Event};
use crate::surface::Surface;

/// Present cadence, standing in for vsync.
const TARGET_FPS: usize = 60;

const BUTTON_MAP: [(MouseButton, Button); 3] = [
    (MouseButton::Left, Button::Left),
    (MouseButton::Middle, Button::Middle),
    (MouseButton::Right, Button::Right),
];

pub struct PadWindow {
    window: Window,
    title: String,
    // Previous-poll snapshots the event synthesis diffs against.
    last_size: (usize, usize),
    last_active: bool,
    last_mouse: (f32, f32),
    buttons: [bool; 3],
}

impl PadWindow {
    /// Open a resizable window and show it.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Self::open(title, width, height, false)?;
        let last_size = window.get_size();
        let last_active = window.is_active();
        let last_mouse = window.get_mouse_pos(MouseMode::Clamp).unwrap_or((0.0, 0.0));
        Ok(Self {
            window,
            title: title.to_owned(),
            last_size,
            last_active,
            last_mouse,
            buttons: [false; 3],
        })
    }

    fn open(title: &str, width: usize, height: usize, fullscreen: bool) -> Result<Window, Error> {
        let opts = WindowOptions {
            resize: !fullscreen,
            borderless: fullscreen,
            ..WindowOptions::default()
        };
        let mut window =
            Window::new(title, width, height, opts).map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(TARGET_FPS);
        Ok(window)
    }

    /// Client size in pixels.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Switch between windowed and fullscreen mode.
    ///
    /// minifb cannot switch a live window, so the window is rebuilt
    /// borderless at its current size (the resolution does not change, only
    /// the decoration). Returns the size the new window reports; the caller
    /// reallocates the canvas from it.
    pub fn set_fullscreen(&mut self, on: bool) -> Result<(usize, usize), Error> {
        debug!(fullscreen = on, "rebuilding window");
        let (width, height) = self.window.get_size();
        self.window = Self::open(&self.title, width, height, on)?;
        self.last_size = self.window.get_size();
        self.last_active = self.window.is_active();
        self.buttons = [false; 3];
        Ok(self.last_size)
    }

    /// Drain backend state into discrete events, oldest first. Non-blocking;
    /// an uneventful poll returns an empty vec.
    pub fn poll_events(&mut self) -> Vec<Event> {
        let mut events = Vec::new();

        if !self.window.is_open() {
            events.push(Event::Quit);
            return events;
        }

        let size = self.window.get_size();
        if size != self.last_size {
            self.last_size = size;
            events.push(Event::Resized {
                width: size.0,
                height: size.1,
            });
        }

        let active = self.window.is_active();
        if active != self.last_active {
            self.last_active = active;
            events.push(if active {
                Event::FocusGained
            } else {
                Event::FocusLost
            });
        }

        // KeyRepeat::No keeps OS key repeat out of the stream: a held key
        // produces exactly one KeyDown until it is released.
        let ctrl =
            self.window.is_key_down(Key::LeftCtrl) || self.window.is_key_down(Key::RightCtrl);
        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            events.push(Event::KeyDown { key, ctrl });
        }
        for key in self.window.get_keys_released() {
            events.push(Event::KeyUp { key });
        }

        for (i, (backend, button)) in BUTTON_MAP.iter().enumerate() {
            let held = self.window.get_mouse_down(*backend);
            if held != self.buttons[i] {
                self.buttons[i] = held;
                events.push(if held {
                    Event::ButtonDown(*button)
                } else {
                    Event::ButtonUp(*button)
                });
            }
        }

        if let Some(pos) = self.window.get_mouse_pos(MouseMode::Clamp) {
            if pos != self.last_mouse {
                events.push(Event::MouseMotion {
                    x: pos.0 as i32,
                    y: pos.1 as i32,
                    dx: (pos.0 - self.last_mouse.0) as i32,
                    dy: (pos.1 - self.last_mouse.1) as i32,
                });
                self.last_mouse = pos;
            }
        }

        events
    }

    /// Push the composed frame to the screen. The only place the loop may
    /// block: minifb paces this call to the target frame rate.
    pub fn present(&mut self, frame: &Surface) -> Result<(), Error> {
        let (width, height) = frame.size();
        self.window
            .update_with_buffer(frame.pixels(), width, height)
            .map_err(|e| Error::Present(e.to_string()))
    }
}
