use thiserror::Error;

/// Failure to place a program image into memory. Memory is untouched when
/// this is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("program is {len} bytes but only {capacity} bytes fit above 0x200")]
    TooLarge { len: usize, capacity: usize },
    #[error("failed to read program image")]
    Io(#[from] std::io::Error),
}

/// Condition that stops the guest program. Everything except `NotLoaded`
/// leaves the interpreter halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("call at {pc:#05X} with all 16 stack levels in use")]
    StackOverflow { pc: u16 },
    #[error("return at {pc:#05X} with an empty stack")]
    StackUnderflow { pc: u16 },
    #[error("memory access at {addr:#X} is outside 0x000-0xFFF")]
    AddressOutOfRange { addr: usize },
    #[error("no program loaded")]
    NotLoaded,
}
