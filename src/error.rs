// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String), // Creating (or rebuilding) the window failed
    Present(String),    // Pushing the frame buffer to the window failed
}

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::Present(s) => write!(f, "Present error: {s}"),
        }
    }
}

impl std::error::Error for Error {}
