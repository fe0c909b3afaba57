use thiserror::Error;

/// Recoverable conditions raised while resolving operands or transferring
/// control. None of these leave the engine in an inconsistent state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The operand text matches none of `#$hex`, `#dec`, `#%bin`, `$hex`, `%bin`.
    #[error("unrecognized operand: {0:?}")]
    UnrecognizedOperand(String),
    /// A numeral parser was handed something that is not a numeral in its base.
    #[error("invalid base-{radix} numeral: {text:?}")]
    InvalidNumeral { text: String, radix: u32 },
    /// Nested `jmp`/`bne`/`beq` transfers exceeded the configured depth.
    #[error("call depth exceeded ({limit} nested routine transfers)")]
    CallDepthExceeded { limit: usize },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("byte {value} at offset {offset} has no color swatch")]
    UnmappedByte { value: u8, offset: usize },
    #[error("row width must be positive")]
    ZeroWidth,
    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),
}
