mod config;
mod display;
mod error;
mod execute;
mod font;
mod instruction;
mod random;
mod state;

use std::io::prelude::*;

use log::{debug, error, trace, warn};

pub use config::{Config, Quirks, Variant};
pub use display::{
    Framebuffer, Resolution, HIRES_HEIGHT, HIRES_WIDTH, LORES_HEIGHT, LORES_WIDTH, PIXEL_OFF,
    PIXEL_ON,
};
pub use error::{Fault, LoadError};
pub use font::{LARGE_FONT_ADDR, MEMORY_SIZE, PROGRAM_START, SMALL_FONT_ADDR};
pub use instruction::Instruction;
pub use random::ByteSource;
pub use state::{KEY_COUNT, RPL_FLAG_COUNT, STACK_LEVELS};

use execute::execute;
use state::State;

/// Where the interpreter is in its lifecycle. Only `Running` accepts cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No program loaded, or the last load failed.
    Idle,
    Running,
    /// The program executed 00FD.
    Exited,
    Faulted(Fault),
}

pub struct Chip8 {
    // CHIP-8 VM
    state: State,

    // emulator resources
    rng: ByteSource,
    variant: Variant,
    run_state: RunState,
    draw_flag: bool,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => ByteSource::seeded(seed),
            None => ByteSource::from_entropy(),
        };

        Self {
            state: State::new(config.quirks, config.upscale_lores),
            rng,
            variant: config.variant,
            run_state: RunState::Idle,
            draw_flag: false,
        }
    }

    /// Copy a raw program image to 0x200 and get ready to run it. Nothing is
    /// written if the image does not fit, but the interpreter drops back to
    /// `Idle` so a previously loaded program does not keep running.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        let start = PROGRAM_START as usize;
        let capacity = MEMORY_SIZE - start;
        if program.len() > capacity {
            self.run_state = RunState::Idle;
            return Err(LoadError::TooLarge {
                len: program.len(),
                capacity,
            });
        }

        self.state.memory[start..start + program.len()].copy_from_slice(program);
        self.state.pc = PROGRAM_START;
        self.run_state = RunState::Running;
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    pub fn load_program_from<R: Read>(&mut self, mut reader: R) -> Result<(), LoadError> {
        let mut program = Vec::new();
        if let Err(e) = reader.read_to_end(&mut program) {
            self.run_state = RunState::Idle;
            return Err(e.into());
        }
        self.load_program(&program)
    }

    /// Run one fetch, decode, execute and timer tick.
    ///
    /// A fault halts the interpreter; once halted (fault or exit) further
    /// calls do nothing.
    pub fn step(&mut self) -> Result<(), Fault> {
        match self.run_state {
            RunState::Idle => return Err(Fault::NotLoaded),
            RunState::Exited | RunState::Faulted(_) => return Ok(()),
            RunState::Running => {}
        }

        self.draw_flag = false;
        let outcome = self.emulate_cycle();
        self.state.tick_timers();

        if let Err(fault) = outcome {
            error!("halting: {}", fault);
            self.run_state = RunState::Faulted(fault);
            return Err(fault);
        }
        if self.state.exit_requested {
            self.run_state = RunState::Exited;
        }
        Ok(())
    }

    fn emulate_cycle(&mut self) -> Result<(), Fault> {
        let pc = self.state.pc;
        // two-byte opcodes
        let opcode = self.state.fetch()?;
        self.state.pc += 2;

        match Instruction::decode(opcode, self.variant) {
            Some(instruction) => {
                trace!("{:03X}: {:04X} {}", pc, opcode, instruction);
                self.draw_flag = instruction.redraws();
                execute(&mut self.state, &mut self.rng, instruction)
            }
            None => {
                warn!("unknown opcode {:04X} at {:03X}, skipped", opcode, pc);
                Ok(())
            }
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// True once the program exited or faulted; the host should stop stepping.
    pub fn is_halted(&self) -> bool {
        matches!(self.run_state, RunState::Exited | RunState::Faulted(_))
    }

    /// Whether the last cycle ran an instruction that may have changed the
    /// picture.
    pub fn draw_flag(&self) -> bool {
        self.draw_flag
    }

    /// The surface selected by the current resolution.
    pub fn display(&self) -> &Framebuffer {
        self.state.display.active()
    }

    pub fn surface(&self, resolution: Resolution) -> &Framebuffer {
        self.state.display.surface(resolution)
    }

    pub fn resolution(&self) -> Resolution {
        self.state.display.resolution()
    }

    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn clear_keys(&mut self) {
        self.state.keys = [false; KEY_COUNT];
    }

    pub fn press_key(&mut self, key: usize) {
        self.set_key(key, true);
    }

    pub fn release_key(&mut self, key: usize) {
        self.set_key(key, false);
    }

    pub fn set_key(&mut self, key: usize, down: bool) {
        match self.state.keys.get_mut(key) {
            Some(k) => *k = down,
            None => warn!("no key {:X} on the hex keypad", key),
        }
    }

    pub fn quirks(&self) -> Quirks {
        self.state.quirks
    }

    pub fn set_quirks(&mut self, quirks: Quirks) {
        self.state.quirks = quirks;
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn registers(&self) -> &[u8] {
        &self.state.v
    }

    pub fn index(&self) -> u16 {
        self.state.i
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn sp(&self) -> usize {
        self.state.sp
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn memory(&self) -> &[u8] {
        &self.state.memory
    }

    pub fn rpl_flags(&self) -> &[u8] {
        &self.state.rpl
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booted(program: &[u8]) -> Chip8 {
        let mut emu = Chip8::with_config(Config::default().with_seed(1));
        emu.load_program(program).unwrap();
        emu
    }

    #[test]
    fn step_before_load_is_rejected() {
        let mut emu = Chip8::new();
        assert_eq!(emu.step(), Err(Fault::NotLoaded));
        assert_eq!(emu.run_state(), RunState::Idle);
        assert_eq!(emu.pc(), 0x200);
    }

    #[test]
    fn load_copies_verbatim() {
        let emu = booted(&[0x12, 0x34, 0x56]);
        assert_eq!(emu.memory()[0x200..0x204], [0x12, 0x34, 0x56, 0x00]);
        assert_eq!(emu.run_state(), RunState::Running);
    }

    #[test]
    fn oversized_load_leaves_memory_alone() {
        let mut emu = Chip8::new();
        let program = vec![0xAA; MEMORY_SIZE - 0x200 + 1];
        match emu.load_program(&program) {
            Err(LoadError::TooLarge { len, capacity }) => {
                assert_eq!(len, 3585);
                assert_eq!(capacity, 3584);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(emu.memory()[0x200..].iter().all(|b| *b == 0));
        assert_eq!(emu.run_state(), RunState::Idle);
    }

    #[test]
    fn failed_reload_stops_previous_program() {
        let mut emu = booted(&[0x60, 0x01]);
        let program = vec![0xAA; MEMORY_SIZE];
        assert!(emu.load_program(&program).is_err());
        assert_eq!(emu.run_state(), RunState::Idle);
        assert_eq!(emu.step(), Err(Fault::NotLoaded));
        assert_eq!(emu.registers()[0], 0);
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "unplugged"))
        }
    }

    #[test]
    fn failed_read_stops_previous_program() {
        let mut emu = booted(&[0x60, 0x01]);
        assert!(matches!(
            emu.load_program_from(BrokenReader),
            Err(LoadError::Io(_))
        ));
        assert_eq!(emu.run_state(), RunState::Idle);
        assert_eq!(emu.memory()[0x200..0x202], [0x60, 0x01]);
    }

    #[test]
    fn full_size_load_fits() {
        let mut emu = Chip8::new();
        let program = vec![0xAA; MEMORY_SIZE - 0x200];
        emu.load_program(&program).unwrap();
        assert_eq!(emu.memory()[0xFFF], 0xAA);
    }

    #[test]
    fn load_from_reader() {
        let mut emu = Chip8::new();
        let mut prog: &[u8] = &[0x00, 0xE0]; // clear screen
        emu.load_program_from(&mut prog).unwrap();
        assert_eq!(emu.memory()[0x200..0x202], [0x00, 0xE0]);
    }

    #[test]
    fn cycle_advances_and_ticks() {
        let mut emu = booted(&[
            0x60, 0x05, // LD V0, 05
            0xF0, 0x15, // LD DT, V0
            0xF0, 0x18, // LD ST, V0
            0x70, 0xFF, // ADD V0, FF
        ]);
        emu.step().unwrap();
        assert_eq!((emu.pc(), emu.registers()[0]), (0x202, 5));
        emu.step().unwrap();
        assert_eq!(emu.delay_timer(), 4);
        emu.step().unwrap();
        assert_eq!((emu.delay_timer(), emu.sound_timer()), (3, 4));
        assert!(emu.sound_active());
        emu.step().unwrap();
        assert_eq!(emu.registers()[0], 4);
    }

    #[test]
    fn unknown_opcode_is_skipped_and_still_ticks() {
        let mut emu = booted(&[
            0x60, 0x03, // LD V0, 03
            0xF0, 0x15, // LD DT, V0
            0xFF, 0xFF, // unknown
            0x61, 0x01, // LD V1, 01
        ]);
        emu.step().unwrap();
        emu.step().unwrap();
        emu.step().unwrap();
        assert_eq!((emu.pc(), emu.delay_timer()), (0x206, 1));
        emu.step().unwrap();
        assert_eq!(emu.registers()[1], 1);
        assert_eq!(emu.run_state(), RunState::Running);
    }

    #[test]
    fn stack_overflow_halts() {
        // 0x200: CALL 200, recursing forever
        let mut emu = booted(&[0x22, 0x00]);
        for _ in 0..STACK_LEVELS {
            emu.step().unwrap();
        }
        assert_eq!(emu.sp(), 16);
        let fault = emu.step().unwrap_err();
        assert_eq!(fault, Fault::StackOverflow { pc: 0x200 });
        assert_eq!(emu.run_state(), RunState::Faulted(fault));
        assert!(emu.is_halted());
        assert_eq!(emu.step(), Ok(()));
        assert_eq!(emu.sp(), 16);
    }

    #[test]
    fn stack_underflow_halts() {
        let mut emu = booted(&[0x00, 0xEE]);
        assert_eq!(emu.step(), Err(Fault::StackUnderflow { pc: 0x200 }));
        assert!(emu.is_halted());
    }

    #[test]
    fn faulting_cycle_still_ticks_timers() {
        let mut emu = booted(&[
            0x60, 0x09, // LD V0, 09
            0xF0, 0x15, // LD DT, V0
            0x00, 0xEE, // RET with empty stack
        ]);
        emu.step().unwrap();
        emu.step().unwrap();
        assert!(emu.step().is_err());
        assert_eq!(emu.delay_timer(), 7);
    }

    #[test]
    fn running_off_memory_faults() {
        let mut emu = booted(&[0x1F, 0xFF]); // JP FFF
        emu.step().unwrap();
        assert_eq!(
            emu.step(),
            Err(Fault::AddressOutOfRange { addr: MEMORY_SIZE })
        );
    }

    #[test]
    fn exit_halts() {
        let mut emu = booted(&[0x00, 0xFD, 0x60, 0x01]);
        emu.step().unwrap();
        assert_eq!(emu.run_state(), RunState::Exited);
        emu.step().unwrap();
        assert_eq!(emu.pc(), 0x202);
        assert_eq!(emu.registers()[0], 0);
    }

    #[test]
    fn draw_flag_follows_display_opcodes() {
        let mut emu = booted(&[0x00, 0xE0, 0x60, 0x01]);
        emu.step().unwrap();
        assert!(emu.draw_flag());
        emu.step().unwrap();
        assert!(!emu.draw_flag());
    }

    #[test]
    fn hires_mode_switches_surface() {
        let mut emu = booted(&[0x00, 0xFF, 0x00, 0xFE]);
        assert_eq!(emu.display().width(), LORES_WIDTH);
        emu.step().unwrap();
        assert_eq!(emu.resolution(), Resolution::High);
        assert_eq!((emu.display().width(), emu.display().height()), (128, 64));
        emu.step().unwrap();
        assert_eq!(emu.display().height(), LORES_HEIGHT);
    }

    #[test]
    fn keypad_out_of_range_is_ignored() {
        let mut emu = Chip8::new();
        emu.press_key(3);
        emu.press_key(16);
        assert_eq!(emu.state.keys.iter().filter(|k| **k).count(), 1);
        emu.release_key(3);
        assert_eq!(emu.state.first_pressed_key(), None);
    }

    #[test]
    fn variant_decodes_through_step() {
        let config = Config::default().with_variant(Variant::Chip8E).with_seed(0);
        let mut emu = Chip8::with_config(config);
        emu.load_program(&[
            0x60, 0x09, // LD V0, 09
            0x61, 0x02, // LD V1, 02
            0x50, 0x11, // SGT V0, V1
            0x00, 0x00, // skipped
            0x90, 0x12, // DIV V0, V1
        ])
        .unwrap();
        for _ in 0..4 {
            emu.step().unwrap();
        }
        assert_eq!(emu.pc(), 0x20A);
        assert_eq!((emu.registers()[0], emu.registers()[0xF]), (4, 1));
    }
}
