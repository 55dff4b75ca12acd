use crate::error::FrontendError;

/// Receives the framebuffer whenever the driver decides it needs redrawing.
pub trait Display {
    /// `gfx` is 64x32 pixels, row-major
    fn draw(&mut self, gfx: &[bool]) -> Result<(), FrontendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    Continue,
    Quit,
}

/// Translates platform key events into the hex keypad mask.
pub trait Keypad {
    /// Apply any pending key events to `keys`. Called between cycles only.
    fn poll(&mut self, keys: &mut [bool; 16]) -> Result<Poll, FrontendError>;
}

/// Makes a short fixed tone each time the sound timer runs out.
pub trait Sound {
    fn beep(&mut self) -> Result<(), FrontendError>;
}

impl<S: Sound + ?Sized> Sound for Box<S> {
    fn beep(&mut self) -> Result<(), FrontendError> {
        (**self).beep()
    }
}

/// useful for headless runs and tests
pub struct Mute;

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), FrontendError> {
        Ok(())
    }
}
