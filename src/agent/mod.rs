//! Monkeys and the transforms they apply to worry levels.

pub mod monkey;
pub mod types;

pub use monkey::Agent;
pub use types::{Operand, Operation, Transform};
