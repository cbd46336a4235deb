// Draw pad internals, exposed as a library so the state machine can be
// exercised by integration tests without opening a window.

pub mod error;
pub mod input;
pub mod logging;
pub mod pad;
pub mod palette;
pub mod surface;
pub mod window;
