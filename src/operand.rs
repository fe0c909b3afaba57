use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::numeral::{clamp_byte, parse_binary, parse_decimal, parse_hex};

/// A resolved instruction operand.
///
/// Literal payloads are already clamped to a byte. Memory references keep
/// the raw (possibly negative or oversized) address; the engine clamps it
/// against the memory capacity when dereferencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// `#123`
    Literal(u8),
    /// `#$7F`
    HexLiteral(u8),
    /// `#%0101`
    BinaryLiteral(u8),
    /// `$10`: the byte stored at a hex address.
    HexMemoryRef(i64),
    /// `%10000`: the byte stored at a binary address.
    BinaryMemoryRef(i64),
}

impl Operand {
    /// Parse the textual addressing-mode grammar.
    ///
    /// ```text
    /// #$<hex>   immediate hex
    /// #%<bin>   immediate binary
    /// #<dec>    immediate decimal
    /// $<hex>    memory at hex address
    /// %<bin>    memory at binary address
    /// ```
    ///
    /// Text matching none of these shapes is `UnrecognizedOperand`; a
    /// recognized prefix followed by bad digits is `InvalidNumeral`.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let text = text.trim();
        if let Some(imm) = text.strip_prefix('#') {
            if let Some(hex) = imm.strip_prefix('$') {
                Ok(Operand::HexLiteral(clamp_byte(parse_hex(hex)?)))
            } else if let Some(bin) = imm.strip_prefix('%') {
                Ok(Operand::BinaryLiteral(clamp_byte(parse_binary(bin)?)))
            } else if imm.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
                Ok(Operand::Literal(clamp_byte(parse_decimal(imm)?)))
            } else {
                Err(EngineError::UnrecognizedOperand(text.to_string()))
            }
        } else if let Some(hex) = text.strip_prefix('$') {
            Ok(Operand::HexMemoryRef(parse_hex(hex)?))
        } else if let Some(bin) = text.strip_prefix('%') {
            Ok(Operand::BinaryMemoryRef(parse_binary(bin)?))
        } else {
            Err(EngineError::UnrecognizedOperand(text.to_string()))
        }
    }
}

impl FromStr for Operand {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operand::parse(s)
    }
}

impl From<u8> for Operand {
    fn from(value: u8) -> Self {
        Operand::Literal(value)
    }
}

/// Canonical text form. Negative addresses keep their sign.
impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Operand::Literal(v) => write!(f, "#{v}"),
            Operand::HexLiteral(v) => write!(f, "#${v:02X}"),
            Operand::BinaryLiteral(v) => write!(f, "#%{v:08b}"),
            Operand::HexMemoryRef(a) if a < 0 => write!(f, "$-{:X}", a.unsigned_abs()),
            Operand::HexMemoryRef(a) => write!(f, "${a:X}"),
            Operand::BinaryMemoryRef(a) if a < 0 => write!(f, "%-{:b}", a.unsigned_abs()),
            Operand::BinaryMemoryRef(a) => write!(f, "%{a:b}"),
        }
    }
}

/// Parse a store address: a bare hex numeral, `$hex`, or `%binary`.
///
/// Textual addresses are hex unless marked binary; decimal addresses go
/// through [`Engine::store`](crate::engine::Engine::store) as integers.
/// Unlike [`Operand::parse`] this never dereferences; the result is the
/// raw address, clamped later against the memory capacity.
pub fn parse_address(text: &str) -> Result<i64, EngineError> {
    let text = text.trim();
    if let Some(bin) = text.strip_prefix('%') {
        parse_binary(bin)
    } else if text.starts_with('#') || text.is_empty() {
        Err(EngineError::UnrecognizedOperand(text.to_string()))
    } else {
        parse_hex(text.strip_prefix('$').unwrap_or(text))
    }
}
