use crate::error::ProgramTooLarge;
use crate::{MEMORY_SIZE, PROGRAM_START, SCREEN_HEIGHT, SCREEN_WIDTH};
use tracing::debug;

pub const FONT_SET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// bytes per font glyph
pub const FONT_GLYPH_LEN: u16 = 5;

pub const STACK_DEPTH: usize = 16;

pub const GFX_LEN: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// Everything a CHIP-8 program can observe: memory, registers, stack, timers,
/// framebuffer and keypad. Pure data; the engine in `chip8` mutates it.
#[derive(Clone)]
pub struct Machine {
    pub(crate) memory: [u8; MEMORY_SIZE],
    pub(crate) v: [u8; 16], // V0-VE general purpose, VF doubles as the flag register
    pub(crate) i: u16,      // index register
    pub(crate) pc: u16,
    pub(crate) stack: [u16; STACK_DEPTH],
    pub(crate) sp: usize, // number of occupied stack slots
    pub(crate) delay_timer: u8,
    pub(crate) sound_timer: u8,
    pub(crate) gfx: [bool; GFX_LEN], // row-major, index = x + y * 64
    pub(crate) key: [bool; 16],
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        let mut m = Self {
            memory: [0; MEMORY_SIZE],
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START as u16,
            stack: [0; STACK_DEPTH],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            gfx: [false; GFX_LEN],
            key: [false; 16],
        };
        m.initialize();
        m
    }

    /// Reset to a clean machine: everything zeroed, font at 0x000, pc at 0x200.
    pub fn initialize(&mut self) {
        self.memory = [0; MEMORY_SIZE];
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROGRAM_START as u16;
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.gfx = [false; GFX_LEN];
        self.key = [false; 16];

        // the COSMAC VIP interpreter lived below 0x200, so the font goes there
        self.memory[..FONT_SET.len()].copy_from_slice(&FONT_SET);
        debug!("machine initialized");
    }

    /// Copy a program in at 0x200. Nothing else is touched, so call
    /// `initialize` first for a clean run.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), ProgramTooLarge> {
        let max = MEMORY_SIZE - PROGRAM_START;
        if program.len() > max {
            return Err(ProgramTooLarge {
                len: program.len(),
                max,
            });
        }
        self.memory[PROGRAM_START..PROGRAM_START + program.len()].copy_from_slice(program);
        debug!(len = program.len(), "program loaded");
        Ok(())
    }

    /// memory address of the font glyph for a hex digit
    pub fn font_address(digit: u8) -> u16 {
        digit as u16 * FONT_GLYPH_LEN
    }

    pub(crate) fn read(&self, addr: usize) -> u8 {
        self.memory[addr % MEMORY_SIZE]
    }

    /// Writes past the end of memory or into the font are dropped.
    pub(crate) fn write(&mut self, addr: usize, val: u8) {
        if (FONT_SET.len()..MEMORY_SIZE).contains(&addr) {
            self.memory[addr] = val;
        }
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn v(&self, reg: usize) -> u8 {
        self.v[reg & 0xF]
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn set_v(&mut self, reg: usize, val: u8) {
        self.v[reg & 0xF] = val;
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn set_index(&mut self, i: u16) {
        self.i = i;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc % MEMORY_SIZE as u16;
    }

    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, t: u8) {
        self.delay_timer = t;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn set_sound_timer(&mut self, t: u8) {
        self.sound_timer = t;
    }

    pub fn gfx(&self) -> &[bool] {
        &self.gfx
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.gfx[(x % SCREEN_WIDTH) + (y % SCREEN_HEIGHT) * SCREEN_WIDTH]
    }

    pub fn keys(&self) -> &[bool; 16] {
        &self.key
    }

    pub fn keys_mut(&mut self) -> &mut [bool; 16] {
        &mut self.key
    }

    pub fn set_key(&mut self, key: usize, pressed: bool) {
        self.key[key & 0xF] = pressed;
    }

    pub fn clear_keys(&mut self) {
        self.key = [false; 16];
    }
}
