//! CHIP-8 interpreter core with SuperChip extensions and the Chip8-X and
//! Chip8-E instruction overlays.
//!
//! The host owns the clock: call [`Chip8::step`] once per cycle, feed key
//! state in with [`Chip8::set_key`] and read the picture back from
//! [`Chip8::display`].

pub mod chip8;

pub use crate::chip8::{
    Chip8, Config, Fault, Framebuffer, Instruction, LoadError, Quirks, Resolution, RunState,
    Variant,
};
