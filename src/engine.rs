use std::fmt;

use tracing::{debug, trace};

use crate::error::EngineError;
use crate::memory::{Memory, VIDEO_MEMORY};
use crate::numeral::clamp_byte;
use crate::operand::{Operand, parse_address};

/// Configuration for a new engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Memory capacity in bytes.
    pub memory_size: usize,
    /// Maximum nesting of `jmp`/`bne`/`beq` transfers before the engine
    /// reports `CallDepthExceeded`.
    pub max_call_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            memory_size: VIDEO_MEMORY,
            max_call_depth: 1 << 10,
        }
    }
}

/// The three general-purpose registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    A,
    X,
    Y,
}

/// Snapshot of the register file and zero flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub z: bool,
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "A = {}", self.a)?;
        writeln!(f, "X = {}", self.x)?;
        writeln!(f, "Y = {}", self.y)?;
        write!(f, "Z = {}", self.z as u8)
    }
}

/// A jump or branch target.
///
/// No return address is recorded. Transferring control runs the routine to
/// completion and then resumes the caller, so loops are written as routines
/// that branch back to themselves:
///
/// ```
/// use retrolang::engine::{Engine, EngineConfig};
/// use retrolang::error::EngineError;
///
/// fn countdown(cpu: &mut Engine) -> Result<(), EngineError> {
///     cpu.dex();
///     cpu.bne(&countdown)
/// }
///
/// let mut cpu = Engine::new(EngineConfig::default());
/// cpu.ldx("#3")?;
/// cpu.jmp(&countdown)?;
/// assert_eq!(cpu.registers().x, 0);
/// # Ok::<(), EngineError>(())
/// ```
pub trait Routine {
    fn run(&self, engine: &mut Engine) -> Result<(), EngineError>;
}

impl<F> Routine for F
where
    F: Fn(&mut Engine) -> Result<(), EngineError>,
{
    fn run(&self, engine: &mut Engine) -> Result<(), EngineError> {
        self(engine)
    }
}

/// Register/flag state machine bound to its own memory.
///
/// The zero flag is sticky: only `clz`, a compare, a wrapping increment, or
/// a decrement that lands on (or wraps from) zero assign it. Every other
/// instruction leaves it alone.
#[derive(Debug, Clone)]
pub struct Engine {
    memory: Memory,
    a: u8,
    x: u8,
    y: u8,
    z: bool,
    depth: usize,
    max_call_depth: usize,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_memory(Memory::new(config.memory_size), config.max_call_depth)
    }

    /// Build an engine around an existing memory image.
    pub fn with_memory(memory: Memory, max_call_depth: usize) -> Self {
        Self {
            memory,
            a: 0,
            x: 0,
            y: 0,
            z: false,
            depth: 0,
            max_call_depth,
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn registers(&self) -> Registers {
        Registers {
            a: self.a,
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }

    pub fn zero_flag(&self) -> bool {
        self.z
    }

    /// Current nesting of routine transfers (0 outside any routine).
    pub fn call_depth(&self) -> usize {
        self.depth
    }

    fn reg_mut(&mut self, reg: Register) -> &mut u8 {
        match reg {
            Register::A => &mut self.a,
            Register::X => &mut self.x,
            Register::Y => &mut self.y,
        }
    }

    pub fn get(&self, reg: Register) -> u8 {
        match reg {
            Register::A => self.a,
            Register::X => self.x,
            Register::Y => self.y,
        }
    }

    /// The byte an operand denotes: the literal itself or the memory cell
    /// it names.
    pub fn resolve(&self, operand: Operand) -> u8 {
        match operand {
            Operand::Literal(v) | Operand::HexLiteral(v) | Operand::BinaryLiteral(v) => v,
            Operand::HexMemoryRef(addr) | Operand::BinaryMemoryRef(addr) => self.memory.read(addr),
        }
    }

    // --- load / store ---

    pub fn load(&mut self, reg: Register, operand: Operand) {
        let value = self.resolve(operand);
        trace!(?reg, %operand, value, "load");
        *self.reg_mut(reg) = value;
    }

    /// Parse `text` and load it. The register is untouched on error.
    fn load_text(&mut self, reg: Register, text: &str) -> Result<(), EngineError> {
        let operand = Operand::parse(text).inspect_err(|e| debug!(?reg, %e, "load rejected"))?;
        self.load(reg, operand);
        Ok(())
    }

    pub fn lda(&mut self, operand: &str) -> Result<(), EngineError> {
        self.load_text(Register::A, operand)
    }

    pub fn ldx(&mut self, operand: &str) -> Result<(), EngineError> {
        self.load_text(Register::X, operand)
    }

    pub fn ldy(&mut self, operand: &str) -> Result<(), EngineError> {
        self.load_text(Register::Y, operand)
    }

    /// Write a register to `address`, clamped against the memory capacity.
    pub fn store(&mut self, reg: Register, address: i64) {
        let value = self.get(reg);
        trace!(?reg, address, value, "store");
        self.memory.write(address, value);
    }

    fn store_text(&mut self, reg: Register, address: &str) -> Result<(), EngineError> {
        let address = parse_address(address).inspect_err(|e| debug!(?reg, %e, "store rejected"))?;
        self.store(reg, address);
        Ok(())
    }

    pub fn sta(&mut self, address: &str) -> Result<(), EngineError> {
        self.store_text(Register::A, address)
    }

    pub fn stx(&mut self, address: &str) -> Result<(), EngineError> {
        self.store_text(Register::X, address)
    }

    pub fn sty(&mut self, address: &str) -> Result<(), EngineError> {
        self.store_text(Register::Y, address)
    }

    // --- increment / decrement (X and Y only) ---

    /// Add one. Wrapping past 255 sets Z; otherwise Z is left as is.
    fn increment(&mut self, reg: Register) {
        let (value, wrapped) = self.get(reg).overflowing_add(1);
        *self.reg_mut(reg) = value;
        if wrapped {
            self.z = true;
        }
        trace!(?reg, value, z = self.z, "increment");
    }

    /// Subtract one. Landing on 0 sets Z, and so does wrapping from 0 to
    /// 255. Z is never cleared here.
    fn decrement(&mut self, reg: Register) {
        let (value, wrapped) = self.get(reg).overflowing_sub(1);
        *self.reg_mut(reg) = value;
        if value == 0 || wrapped {
            self.z = true;
        }
        trace!(?reg, value, z = self.z, "decrement");
    }

    pub fn inx(&mut self) {
        self.increment(Register::X);
    }

    pub fn iny(&mut self) {
        self.increment(Register::Y);
    }

    pub fn dex(&mut self) {
        self.decrement(Register::X);
    }

    pub fn dey(&mut self) {
        self.decrement(Register::Y);
    }

    // --- compare ---

    /// Set Z iff `clamp_byte(value)` equals the register, clear it otherwise.
    pub fn compare(&mut self, reg: Register, value: i64) {
        let operand = clamp_byte(value);
        self.z = self.get(reg) == operand;
        trace!(?reg, operand, z = self.z, "compare");
    }

    pub fn cmp(&mut self, value: i64) {
        self.compare(Register::A, value);
    }

    pub fn cpx(&mut self, value: i64) {
        self.compare(Register::X, value);
    }

    pub fn cpy(&mut self, value: i64) {
        self.compare(Register::Y, value);
    }

    // --- transfer ---

    pub fn transfer(&mut self, from: Register, to: Register) {
        let value = self.get(from);
        *self.reg_mut(to) = value;
        trace!(?from, ?to, value, "transfer");
    }

    pub fn tax(&mut self) {
        self.transfer(Register::A, Register::X);
    }

    pub fn tay(&mut self) {
        self.transfer(Register::A, Register::Y);
    }

    pub fn txa(&mut self) {
        self.transfer(Register::X, Register::A);
    }

    pub fn tya(&mut self) {
        self.transfer(Register::Y, Register::A);
    }

    // --- flag ---

    pub fn clz(&mut self) {
        self.z = false;
    }

    // --- control transfer ---

    /// Run `routine` now and resume afterwards. Nesting deeper than the
    /// configured limit fails before the routine is entered.
    pub fn jmp<R: Routine + ?Sized>(&mut self, routine: &R) -> Result<(), EngineError> {
        if self.depth >= self.max_call_depth {
            debug!(depth = self.depth, "call depth exceeded");
            return Err(EngineError::CallDepthExceeded {
                limit: self.max_call_depth,
            });
        }
        self.depth += 1;
        trace!(depth = self.depth, "enter routine");
        let result = routine.run(self);
        self.depth -= 1;
        result
    }

    /// Branch if Z is clear.
    pub fn bne<R: Routine + ?Sized>(&mut self, routine: &R) -> Result<(), EngineError> {
        if !self.z { self.jmp(routine) } else { Ok(()) }
    }

    /// Branch if Z is set.
    pub fn beq<R: Routine + ?Sized>(&mut self, routine: &R) -> Result<(), EngineError> {
        if self.z { self.jmp(routine) } else { Ok(()) }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
