use thiserror::Error;

/// Returned by `load_program` when the ROM would not fit between 0x200 and the
/// end of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("program is {len} bytes, at most {max} fit in memory")]
pub struct ProgramTooLarge {
    pub len: usize,
    pub max: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackFaultKind {
    /// call with all 16 stack slots in use
    Overflow,
    /// return with an empty stack
    Underflow,
}

/// Errors from a single `execute_cycle`. The machine is left exactly as it was
/// before the failing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unsupported opcode {0:#06X}")]
    UnsupportedOpcode(u16),

    #[error("stack {kind:?} at pc {pc:#05X}")]
    StackFault { kind: StackFaultKind, pc: u16 },
}

/// Failure reported by a display, keypad or sound collaborator. SDL hands back
/// plain strings, so that's all this carries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FrontendError(pub String);

impl From<String> for FrontendError {
    fn from(s: String) -> Self {
        FrontendError(s)
    }
}

impl From<&str> for FrontendError {
    fn from(s: &str) -> Self {
        FrontendError(s.to_owned())
    }
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("frontend: {0}")]
    Frontend(#[from] FrontendError),
}
