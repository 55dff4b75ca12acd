//! CHIP-8 interpreter core.
//!
//! `Machine` holds the observable state, `Chip8` fetches, decodes and executes
//! one instruction per `execute_cycle`. Window, keyboard and audio live behind
//! the traits in `io` so the core runs headless.

pub mod chip8;
pub mod driver;
pub mod error;
pub mod io;
pub mod keymap;
pub mod machine;
pub mod opcode;

#[cfg(feature = "sdl")]
pub mod frontend;

pub use crate::chip8::Chip8;
pub use crate::driver::{Driver, DriverConfig};
pub use crate::error::{DriverError, EngineError, FrontendError, ProgramTooLarge, StackFaultKind};
pub use crate::machine::Machine;
pub use crate::opcode::Opcode;

pub const MEMORY_SIZE: usize = 4096;
/// programs are loaded here, and pc starts here
pub const PROGRAM_START: usize = 0x200;
pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
