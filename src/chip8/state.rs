use super::config::Quirks;
use super::display::Display;
use super::error::Fault;
use super::font::{self, MEMORY_SIZE, PROGRAM_START};

pub const REGISTER_COUNT: usize = 16;
pub const STACK_LEVELS: usize = 16;
pub const KEY_COUNT: usize = 16;
pub const RPL_FLAG_COUNT: usize = 8;
pub const VF: usize = 0xF;

/// Everything an instruction handler may touch.
pub struct State {
    pub memory: [u8; MEMORY_SIZE], // system memory
    pub v: [u8; REGISTER_COUNT],   // registers V0-VE (VF is flag for some instructions)
    pub i: u16,                    // address register
    pub pc: u16,                   // program counter
    pub stack: [u16; STACK_LEVELS],
    pub sp: usize, // stack pointer
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub keys: [bool; KEY_COUNT], // hex keypad state
    pub rpl: [u8; RPL_FLAG_COUNT], // HP-48 user flags
    pub display: Display,
    pub quirks: Quirks,
    pub exit_requested: bool,
}

impl State {
    pub fn new(quirks: Quirks, upscale_lores: bool) -> Self {
        let mut memory = [0; MEMORY_SIZE];
        font::install(&mut memory);

        Self {
            memory,
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            stack: [0; STACK_LEVELS],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            keys: [false; KEY_COUNT],
            rpl: [0; RPL_FLAG_COUNT],
            display: Display::new(upscale_lores),
            quirks,
            exit_requested: false,
        }
    }

    fn check_range(addr: usize, len: usize) -> Result<(), Fault> {
        let end = addr + len;
        if end > MEMORY_SIZE {
            // report the first address that falls outside
            return Err(Fault::AddressOutOfRange {
                addr: addr.max(MEMORY_SIZE),
            });
        }
        Ok(())
    }

    /// `len` bytes starting at `addr`.
    pub fn read(&self, addr: u16, len: usize) -> Result<&[u8], Fault> {
        let addr = usize::from(addr);
        Self::check_range(addr, len)?;
        Ok(&self.memory[addr..addr + len])
    }

    /// Writable window of `len` bytes at `addr`, checked as a whole so nothing
    /// is written when any part is out of range.
    pub fn write(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Fault> {
        let addr = usize::from(addr);
        Self::check_range(addr, len)?;
        Ok(&mut self.memory[addr..addr + len])
    }

    /// Big-endian instruction word at PC.
    pub fn fetch(&self) -> Result<u16, Fault> {
        let bytes = self.read(self.pc, 2)?;
        Ok(u16::from(bytes[0]) << 8 | u16::from(bytes[1]))
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Fault> {
        if self.sp >= STACK_LEVELS {
            return Err(Fault::StackOverflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    pub fn reg(&self, x: u8) -> u8 {
        self.v[usize::from(x)]
    }

    pub fn set_reg(&mut self, x: u8, value: u8) {
        self.v[usize::from(x)] = value;
    }

    /// Step over the next instruction when `condition` holds.
    pub fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc += 2;
        }
    }

    /// Lowest-numbered key currently down.
    pub fn first_pressed_key(&self) -> Option<u8> {
        self.keys.iter().position(|down| *down).map(|k| k as u8)
    }

    /// Keys are 0-F; anything larger reads as released.
    pub fn is_key_down(&self, key: u8) -> bool {
        self.keys.get(usize::from(key)).copied().unwrap_or(false)
    }

    pub fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }
}
