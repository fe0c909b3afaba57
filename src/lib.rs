pub mod error;
pub mod numeral;
pub mod memory;
pub mod operand;
pub mod engine;
pub mod renderer;
pub mod metrics;
pub mod driver;
