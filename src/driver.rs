use crate::chip8::Chip8;
use crate::error::DriverError;
use crate::io::{Display, Keypad, Poll, Sound};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// instructions executed between two display refreshes
    pub cycles_per_frame: u32,
}

impl DriverConfig {
    pub fn from_rates(cycle_hz: u32, refresh_hz: u32) -> Self {
        let cycles_per_frame = if refresh_hz == 0 {
            1
        } else {
            (cycle_hz / refresh_hz).max(1)
        };
        Self { cycles_per_frame }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::from_rates(500, 60)
    }
}

/// Runs the interpreter one display frame at a time against a set of
/// collaborators. Pacing in wall-clock time is the caller's business.
pub struct Driver {
    chip8: Chip8,
    config: DriverConfig,
}

impl Driver {
    pub fn new(chip8: Chip8, config: DriverConfig) -> Self {
        Self { chip8, config }
    }

    pub fn chip8(&self) -> &Chip8 {
        &self.chip8
    }

    pub fn chip8_mut(&mut self) -> &mut Chip8 {
        &mut self.chip8
    }

    /// Poll keys, run a frame's worth of cycles, beep on any sound tick and
    /// redraw if the screen changed. Engine errors stop the frame and are
    /// returned to the caller.
    pub fn run_frame(
        &mut self,
        display: &mut impl Display,
        keypad: &mut impl Keypad,
        sound: &mut impl Sound,
    ) -> Result<Poll, DriverError> {
        if keypad.poll(self.chip8.keys_mut())? == Poll::Quit {
            return Ok(Poll::Quit);
        }

        let mut dirty = false;
        for _ in 0..self.config.cycles_per_frame {
            if let Err(e) = self.chip8.execute_cycle() {
                warn!(error = %e, "interpreter halted");
                return Err(e.into());
            }
            dirty |= self.chip8.draw_flag();
            if self.chip8.take_sound_tick() {
                sound.beep()?;
            }
        }

        if dirty {
            display.draw(self.chip8.gfx())?;
        }
        Ok(Poll::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, FrontendError};

    #[derive(Default)]
    struct Frames(Vec<Vec<bool>>);

    impl Display for Frames {
        fn draw(&mut self, gfx: &[bool]) -> Result<(), FrontendError> {
            self.0.push(gfx.to_vec());
            Ok(())
        }
    }

    struct Script(Vec<Option<usize>>);

    impl Keypad for Script {
        fn poll(&mut self, keys: &mut [bool; 16]) -> Result<Poll, FrontendError> {
            if self.0.is_empty() {
                return Ok(Poll::Quit);
            }
            *keys = [false; 16];
            if let Some(k) = self.0.remove(0) {
                keys[k] = true;
            }
            Ok(Poll::Continue)
        }
    }

    #[derive(Default)]
    struct Beeps(usize);

    impl Sound for Beeps {
        fn beep(&mut self) -> Result<(), FrontendError> {
            self.0 += 1;
            Ok(())
        }
    }

    fn driver(program: &[u8], cycles_per_frame: u32) -> Driver {
        let mut c = Chip8::with_seed(1);
        c.load_program(program).unwrap();
        Driver::new(c, DriverConfig { cycles_per_frame })
    }

    #[test]
    fn test_config_from_rates() {
        assert_eq!(DriverConfig::from_rates(600, 60).cycles_per_frame, 10);
        assert_eq!(DriverConfig::from_rates(30, 60).cycles_per_frame, 1);
        assert_eq!(DriverConfig::from_rates(500, 0).cycles_per_frame, 1);
    }

    #[test]
    fn test_redraw_only_when_dirty() {
        // draw glyph 0 then spin
        let mut d = driver(&[0xA0, 0x00, 0xD0, 0x05, 0x12, 0x04], 2);
        let mut frames = Frames::default();
        let mut keys = Script(vec![None, None]);
        let mut beeps = Beeps::default();
        assert_eq!(
            d.run_frame(&mut frames, &mut keys, &mut beeps).unwrap(),
            Poll::Continue
        );
        assert_eq!(frames.0.len(), 1);
        assert!(frames.0[0][0]);
        d.run_frame(&mut frames, &mut keys, &mut beeps).unwrap();
        assert_eq!(frames.0.len(), 1);
        assert_eq!(
            d.run_frame(&mut frames, &mut keys, &mut beeps).unwrap(),
            Poll::Quit
        );
    }

    #[test]
    fn test_beeps_when_sound_timer_expires() {
        // V0 = 3, ST = V0, spin
        let mut d = driver(&[0x60, 0x03, 0xF0, 0x18, 0x12, 0x04], 10);
        let mut beeps = Beeps::default();
        d.run_frame(&mut Frames::default(), &mut Script(vec![None]), &mut beeps)
            .unwrap();
        assert_eq!(beeps.0, 1);
    }

    #[test]
    fn test_key_wait_resumes_on_press() {
        let mut d = driver(&[0xF3, 0x0A, 0x12, 0x02], 4);
        let mut keys = Script(vec![None, Some(0xE)]);
        let mut frames = Frames::default();
        let mut beeps = Beeps::default();
        d.run_frame(&mut frames, &mut keys, &mut beeps).unwrap();
        assert!(d.chip8().is_waiting_for_key());
        assert_eq!(d.chip8().machine().pc(), 0x200);
        d.run_frame(&mut frames, &mut keys, &mut beeps).unwrap();
        assert_eq!(d.chip8().machine().v(3), 0xE);
        assert_eq!(d.chip8().machine().pc(), 0x202);
    }

    #[test]
    fn test_reset_between_frames() {
        let mut d = driver(&[0x60, 0x2A, 0x12, 0x02], 2);
        let mut frames = Frames::default();
        let mut beeps = Beeps::default();
        d.run_frame(&mut frames, &mut Script(vec![None]), &mut beeps)
            .unwrap();
        assert_eq!(d.chip8().machine().v(0), 0x2A);

        d.chip8_mut().initialize();
        d.chip8_mut().load_program(&[0x61, 0x07, 0x12, 0x02]).unwrap();
        d.run_frame(&mut frames, &mut Script(vec![None]), &mut beeps)
            .unwrap();
        assert_eq!(d.chip8().machine().v(0), 0);
        assert_eq!(d.chip8().machine().v(1), 0x07);
    }

    #[test]
    fn test_engine_error_surfaces() {
        let mut d = driver(&[0xFF, 0xFF], 3);
        let err = d
            .run_frame(
                &mut Frames::default(),
                &mut Script(vec![None]),
                &mut Beeps::default(),
            )
            .unwrap_err();
        match err {
            DriverError::Engine(EngineError::UnsupportedOpcode(0xFFFF)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
