// Draw Pad.
// • Arrow keys move the pen (and draw while the pen is down).
// • C cycles the pen color while held; P toggles the pen.
// • CTRL+X clears the canvas; F11 toggles fullscreen; ESC quits.
// • Hold Left Mouse: drag the pen to a new spot without drawing.

use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use drawpad::error::Error;
use drawpad::logging;
use drawpad::pad::Pad;
use drawpad::surface::Surface;
use drawpad::window::PadWindow;

const TITLE: &str = "Draw Pad";
const START_WIDTH: usize = 900;
const START_HEIGHT: usize = 600;

fn main() -> Result<(), Error> {
    logging::init();

    /* --- Window + pad setup ---
       A failure here is fatal: the error propagates out and the process
       exits non-zero. */
    let mut window = PadWindow::new(TITLE, START_WIDTH, START_HEIGHT)?;
    let (width, height) = window.size();
    let mut pad = Pad::new(width, height);
    info!(width, height, "draw pad ready");

    /* --- Compose target pushed to the window every frame ---
       The canvas inside the pad holds the persistent ink; this one is
       rebuilt from it each iteration. */
    let mut frame = Surface::new(width, height);

    /* --- FPS bookkeeping --- */
    let mut last_report = Instant::now();
    let mut frames: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while !pad.quit {
        /* 1) Drain backend events into the pad. */
        pad.handle_events(&window.poll_events());

        /* 2) A fullscreen request rebuilds the window; the reported size may
              change, and the canvas is reallocated either way. */
        if pad.take_mode_switch() {
            match window.set_fullscreen(pad.fullscreen) {
                Ok((w, h)) => pad.set_resolution(w, h),
                Err(e) => {
                    error!("fullscreen switch failed: {e}");
                    pad.error = true;
                }
            }
        }

        /* 3) Bail out as soon as the error flag is up; no draw calls after. */
        if pad.error {
            break;
        }

        /* 4) Advance the pen and the canvas, then compose canvas + cursor
              square into the frame. */
        pad.update();
        let (resx, resy) = pad.resolution();
        if frame.size() != (resx, resy) {
            frame.resize(resx, resy);
        }
        pad.compose(&mut frame);

        /* 5) Present. This is where the loop blocks on the frame cadence. */
        if let Err(e) = window.present(&frame) {
            error!("present failed: {e}");
            break;
        }

        /* 6) Restart the frame black for the next composite; the canvas
              already holds everything persistent. */
        frame.fill(0);

        frames += 1;
        if last_report.elapsed() >= Duration::from_secs(1) {
            debug!(fps = frames, "frame rate");
            frames = 0;
            last_report = Instant::now();
        }
    }

    info!("shutting down");
    Ok(())
}
