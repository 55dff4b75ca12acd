//! SDL2 window, keyboard and audio for the interpreter.

use crate::error::FrontendError;
use crate::io::{Display, Keypad, Poll, Sound};
use crate::keymap::hex_key;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};
use sdl2::audio::{AudioQueue, AudioSpecDesired};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::WindowCanvas;
use sdl2::{EventPump, Sdl};
use tracing::debug;

const BEEP_FREQ: i32 = 44100;
const BEEP_PITCH: i32 = 440;
const BEEP_MS: i32 = 100;
const BEEP_VOLUME: i16 = 8000;

pub struct SdlDisplay {
    canvas: WindowCanvas,
    scale: u32,
}

impl SdlDisplay {
    pub fn new(sdl: &Sdl, scale: u32) -> Result<Self, FrontendError> {
        let video = sdl.video()?;
        let window = video
            .window(
                "CHIP-8",
                SCREEN_WIDTH as u32 * scale,
                SCREEN_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        canvas.set_draw_color(Color::RGB(0, 0, 0));
        canvas.clear();
        canvas.present();
        Ok(Self { canvas, scale })
    }
}

impl Display for SdlDisplay {
    fn draw(&mut self, gfx: &[bool]) -> Result<(), FrontendError> {
        self.canvas.set_draw_color(Color::RGB(0, 0, 0));
        self.canvas.clear();
        self.canvas.set_draw_color(Color::RGB(255, 255, 255));
        for (i, _) in gfx.iter().enumerate().filter(|&(_, &p)| p) {
            let x = (i % SCREEN_WIDTH) as i32 * self.scale as i32;
            let y = (i / SCREEN_WIDTH) as i32 * self.scale as i32;
            self.canvas
                .fill_rect(Rect::new(x, y, self.scale, self.scale))?;
        }
        self.canvas.present();
        Ok(())
    }
}

pub struct SdlKeypad {
    event_pump: EventPump,
}

impl SdlKeypad {
    pub fn new(sdl: &Sdl) -> Result<Self, FrontendError> {
        Ok(Self {
            event_pump: sdl.event_pump()?,
        })
    }
}

// SDL key names for letters and digits are the character itself
fn keycode_to_hex(keycode: Keycode) -> Option<u8> {
    let name = keycode.name();
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => hex_key(c),
        _ => None,
    }
}

impl Keypad for SdlKeypad {
    fn poll(&mut self, keys: &mut [bool; 16]) -> Result<Poll, FrontendError> {
        for e in self.event_pump.poll_iter() {
            match e {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return Ok(Poll::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => {
                    if let Some(hex) = keycode_to_hex(k) {
                        keys[hex as usize] = true;
                    }
                }
                Event::KeyUp {
                    keycode: Some(k), ..
                } => {
                    if let Some(hex) = keycode_to_hex(k) {
                        keys[hex as usize] = false;
                    }
                }
                _ => {}
            }
        }
        Ok(Poll::Continue)
    }
}

/// 440Hz square wave, queued fresh on every beep
pub struct SdlBeep {
    queue: AudioQueue<i16>,
    samples: Vec<i16>,
}

impl SdlBeep {
    pub fn new(sdl: &Sdl) -> Result<Self, FrontendError> {
        let audio = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(BEEP_FREQ),
            channels: Some(1),
            samples: Some(2048),
        };
        let queue: AudioQueue<i16> = audio.open_queue(None, &desired)?;
        let freq = queue.spec().freq;
        let half_period = (freq / BEEP_PITCH / 2).max(1);
        let samples = (0..freq * BEEP_MS / 1000)
            .map(|i| {
                if (i / half_period) % 2 == 1 {
                    BEEP_VOLUME
                } else {
                    -BEEP_VOLUME
                }
            })
            .collect();
        queue.resume();
        debug!(freq, "audio opened");
        Ok(Self { queue, samples })
    }
}

impl Sound for SdlBeep {
    fn beep(&mut self) -> Result<(), FrontendError> {
        self.queue.clear();
        if !self.queue.queue(&self.samples) {
            return Err(FrontendError::from(sdl2::get_error()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keycode_to_hex() {
        assert_eq!(keycode_to_hex(Keycode::Num4), Some(0xC));
        assert_eq!(keycode_to_hex(Keycode::Q), Some(0x4));
        assert_eq!(keycode_to_hex(Keycode::V), Some(0xF));
        assert_eq!(keycode_to_hex(Keycode::Space), None);
        assert_eq!(keycode_to_hex(Keycode::P), None);
    }
}
