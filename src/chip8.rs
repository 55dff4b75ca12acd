use crate::error::{EngineError, StackFaultKind};
use crate::machine::{Machine, STACK_DEPTH};
use crate::opcode::Opcode;
use crate::{MEMORY_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

type OpcodeFn = fn(&mut Chip8, Opcode) -> Result<(), EngineError>;

pub struct Chip8 {
    // CHIP-8 VM
    machine: Machine,

    // emulator resources
    draw_flag: bool,
    sound_tick: bool,
    waiting_for_key: bool,
    rng: StdRng,
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8 {
    const OPCODE_FNS: [OpcodeFn; 16] = [
        Self::cls_ret, // 00**
        Self::jmp,     // 1NNN
        Self::call,    // 2NNN
        Self::eb,      // 3XNN
        Self::neb,     // 4XNN
        Self::er,      // 5XY0
        Self::ld,      // 6XNN
        Self::addb,    // 7XNN
        Self::alu,     // 8XY*
        Self::ner,     // 9XY0
        Self::si,      // ANNN
        Self::jmpo,    // BNNN
        Self::rng,     // CXNN
        Self::draw,    // DXYN
        Self::key,     // EX**
        Self::ex,      // FX**
    ];

    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Same machine, but CXNN draws from a reproducible sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            machine: Machine::new(),
            draw_flag: false,
            sound_tick: false,
            waiting_for_key: false,
            rng,
        }
    }

    /// Reset the machine; the RNG keeps its state.
    pub fn initialize(&mut self) {
        self.machine.initialize();
        self.draw_flag = false;
        self.sound_tick = false;
        self.waiting_for_key = false;
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<(), crate::ProgramTooLarge> {
        self.machine.load_program(program)
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn draw_flag(&self) -> bool {
        self.draw_flag
    }

    pub fn gfx(&self) -> &[bool] {
        self.machine.gfx()
    }

    pub fn delay_timer(&self) -> u8 {
        self.machine.delay_timer()
    }

    pub fn sound_timer(&self) -> u8 {
        self.machine.sound_timer()
    }

    /// True once per sound timer expiry; reading it clears it.
    pub fn take_sound_tick(&mut self) -> bool {
        std::mem::replace(&mut self.sound_tick, false)
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.waiting_for_key
    }

    pub fn set_key(&mut self, key: usize, pressed: bool) {
        self.machine.set_key(key, pressed);
    }

    pub fn clear_keys(&mut self) {
        self.machine.clear_keys();
    }

    pub fn keys_mut(&mut self) -> &mut [bool; 16] {
        self.machine.keys_mut()
    }

    /// Fetch, decode and execute the instruction at pc, then tick both timers.
    /// On error nothing about the machine has changed.
    pub fn execute_cycle(&mut self) -> Result<(), EngineError> {
        let pc = self.machine.pc as usize;
        // two-byte opcodes
        let opcode = Opcode::from_bytes(self.machine.read(pc), self.machine.read(pc + 1));
        trace!(pc = pc, opcode = %opcode, "execute");

        let f = Self::OPCODE_FNS[opcode.family()];
        f(self, opcode)?;
        self.draw_flag = opcode.0 == 0x00E0 || opcode.family() == 0xD;
        self.waiting_for_key &= opcode.family() == 0xF && opcode.nn() == 0x0A;

        if self.machine.delay_timer > 0 {
            self.machine.delay_timer -= 1;
        }
        if self.machine.sound_timer > 0 {
            if self.machine.sound_timer == 1 {
                debug!("sound tick");
                self.sound_tick = true;
            }
            self.machine.sound_timer -= 1;
        }

        #[cfg(debug_assertions)]
        trace!(
            v = ?self.machine.v,
            i = self.machine.i,
            pc = self.machine.pc,
            sp = self.machine.sp,
            "state"
        );
        Ok(())
    }

    fn advance(&mut self, by: u16) {
        self.machine.pc = (self.machine.pc + by) % MEMORY_SIZE as u16;
    }

    fn skip_if(&mut self, cond: bool) {
        self.advance(if cond { 4 } else { 2 });
    }

    fn cls_ret(&mut self, op: Opcode) -> Result<(), EngineError> {
        match op.0 {
            0x00E0 => {
                // clear screen
                self.machine.gfx = [false; SCREEN_WIDTH * SCREEN_HEIGHT];
                self.advance(2);
            }
            0x00EE => {
                // return from subroutine
                if self.machine.sp == 0 {
                    return Err(EngineError::StackFault {
                        kind: StackFaultKind::Underflow,
                        pc: self.machine.pc,
                    });
                }
                self.machine.sp -= 1;
                let sp = self.machine.sp;
                self.machine.pc = self.machine.stack[sp];
                self.machine.stack[sp] = 0;
                self.advance(2);
            }
            _ => return Err(EngineError::UnsupportedOpcode(op.0)),
        }
        Ok(())
    }

    fn jmp(&mut self, op: Opcode) -> Result<(), EngineError> {
        // 1NNN
        self.machine.pc = op.nnn();
        Ok(())
    }

    fn call(&mut self, op: Opcode) -> Result<(), EngineError> {
        // 2NNN
        // the return address pushed is the call itself; 00EE adds the 2
        if self.machine.sp >= STACK_DEPTH {
            return Err(EngineError::StackFault {
                kind: StackFaultKind::Overflow,
                pc: self.machine.pc,
            });
        }
        self.machine.stack[self.machine.sp] = self.machine.pc;
        self.machine.sp += 1;
        self.machine.pc = op.nnn();
        Ok(())
    }

    fn eb(&mut self, op: Opcode) -> Result<(), EngineError> {
        // 3XNN
        self.skip_if(self.machine.v[op.x()] == op.nn());
        Ok(())
    }

    fn neb(&mut self, op: Opcode) -> Result<(), EngineError> {
        // 4XNN
        self.skip_if(self.machine.v[op.x()] != op.nn());
        Ok(())
    }

    fn er(&mut self, op: Opcode) -> Result<(), EngineError> {
        // 5XY0
        if op.n() != 0 {
            return Err(EngineError::UnsupportedOpcode(op.0));
        }
        self.skip_if(self.machine.v[op.x()] == self.machine.v[op.y()]);
        Ok(())
    }

    fn ld(&mut self, op: Opcode) -> Result<(), EngineError> {
        // 6XNN
        self.machine.v[op.x()] = op.nn();
        self.advance(2);
        Ok(())
    }

    fn addb(&mut self, op: Opcode) -> Result<(), EngineError> {
        // 7XNN
        // no carry flag
        let x = op.x();
        self.machine.v[x] = self.machine.v[x].wrapping_add(op.nn());
        self.advance(2);
        Ok(())
    }

    fn alu(&mut self, op: Opcode) -> Result<(), EngineError> {
        let x = op.x();
        let y = op.y();
        let vx = self.machine.v[x];
        let vy = self.machine.v[y];
        // VF is written before VX so that VX wins when x == 0xF
        let (result, flag) = match op.n() {
            0x0 => (vy, None),
            0x1 => (vx | vy, None),
            0x2 => (vx & vy, None),
            0x3 => (vx ^ vy, None),
            0x4 => {
                let sum = vx as u16 + vy as u16;
                (sum as u8, Some((sum > 0xFF) as u8))
            }
            0x5 => (vx.wrapping_sub(vy), Some((vx >= vy) as u8)),
            0x6 => (vx >> 1, Some(vx & 0x1)),
            0x7 => (vy.wrapping_sub(vx), Some((vy >= vx) as u8)),
            0xE => (vx << 1, Some(vx >> 7)),
            _ => return Err(EngineError::UnsupportedOpcode(op.0)),
        };
        if let Some(flag) = flag {
            self.machine.v[0xF] = flag;
        }
        self.machine.v[x] = result;
        self.advance(2);
        Ok(())
    }

    fn ner(&mut self, op: Opcode) -> Result<(), EngineError> {
        // 9XY0
        if op.n() != 0 {
            return Err(EngineError::UnsupportedOpcode(op.0));
        }
        self.skip_if(self.machine.v[op.x()] != self.machine.v[op.y()]);
        Ok(())
    }

    fn si(&mut self, op: Opcode) -> Result<(), EngineError> {
        // ANNN
        self.machine.i = op.nnn();
        self.advance(2);
        Ok(())
    }

    fn jmpo(&mut self, op: Opcode) -> Result<(), EngineError> {
        // BNNN
        let target = op.nnn() + self.machine.v[0] as u16;
        self.machine.set_pc(target);
        Ok(())
    }

    fn rng(&mut self, op: Opcode) -> Result<(), EngineError> {
        // CXNN
        let r: u8 = self.rng.gen();
        self.machine.v[op.x()] = r & op.nn();
        self.advance(2);
        Ok(())
    }

    fn draw(&mut self, op: Opcode) -> Result<(), EngineError> {
        // DXYN
        // XOR an 8xN sprite from memory at I onto the screen at (VX, VY),
        // wrapping at the edges. VF = 1 if any lit pixel gets turned off.
        let vx = self.machine.v[op.x()] as usize;
        let vy = self.machine.v[op.y()] as usize;
        let height = op.n() as usize;
        let i = self.machine.i as usize;

        self.machine.v[0xF] = 0;
        for row in 0..height {
            let sprite = self.machine.read(i + row);
            for col in 0..8 {
                if sprite & (0x80 >> col) == 0 {
                    continue;
                }
                let offset =
                    (vx + col) % SCREEN_WIDTH + ((vy + row) % SCREEN_HEIGHT) * SCREEN_WIDTH;
                if self.machine.gfx[offset] {
                    self.machine.v[0xF] = 1;
                }
                self.machine.gfx[offset] ^= true;
            }
        }

        self.advance(2);
        Ok(())
    }

    fn key(&mut self, op: Opcode) -> Result<(), EngineError> {
        let pressed = self.machine.key[(self.machine.v[op.x()] & 0xF) as usize];
        match op.nn() {
            0x9E => self.skip_if(pressed),
            0xA1 => self.skip_if(!pressed),
            _ => return Err(EngineError::UnsupportedOpcode(op.0)),
        }
        Ok(())
    }

    fn ex(&mut self, op: Opcode) -> Result<(), EngineError> {
        let x = op.x();
        match op.nn() {
            0x07 => self.machine.v[x] = self.machine.delay_timer,
            0x0A => {
                // block until a key is down; timers keep running meanwhile
                match self.machine.key.iter().position(|&k| k) {
                    Some(k) => {
                        if self.waiting_for_key {
                            debug!(key = k, "key wait resolved");
                        }
                        self.waiting_for_key = false;
                        self.machine.v[x] = k as u8;
                    }
                    None => {
                        if !self.waiting_for_key {
                            debug!(pc = self.machine.pc, "waiting for key");
                        }
                        self.waiting_for_key = true;
                        return Ok(());
                    }
                }
            }
            0x15 => self.machine.delay_timer = self.machine.v[x],
            0x18 => self.machine.sound_timer = self.machine.v[x],
            0x1E => self.machine.i = self.machine.i.wrapping_add(self.machine.v[x] as u16),
            0x29 => self.machine.i = Machine::font_address(self.machine.v[x]),
            0x33 => {
                // 193 becomes [1, 9, 3] at I
                let vx = self.machine.v[x];
                let i = self.machine.i as usize;
                self.machine.write(i, vx / 100);
                self.machine.write(i + 1, (vx / 10) % 10);
                self.machine.write(i + 2, vx % 10);
            }
            0x55 => {
                let i = self.machine.i as usize;
                for offset in 0..=x {
                    self.machine.write(i + offset, self.machine.v[offset]);
                }
            }
            0x65 => {
                let i = self.machine.i as usize;
                for offset in 0..=x {
                    self.machine.v[offset] = self.machine.read(i + offset);
                }
            }
            _ => return Err(EngineError::UnsupportedOpcode(op.0)),
        }
        self.advance(2);
        Ok(())
    }
}
