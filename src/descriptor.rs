//! Agent descriptors: the already-extracted fields a monkey is built from.
//!
//! Descriptors come either from the notes parser ([`crate::parser`]) or
//! inline from a YAML run configuration:
//!
//! ```yaml
//! agents:
//!   - index: 0
//!     starting_items: [79, 98]
//!     operation: multiply
//!     operand: 19
//!     test_divisor: 23
//!     target_if_divisible: 2
//!     target_if_not: 3
//! ```

use serde::{Deserialize, Serialize};

use crate::agent::{Operand, Operation};

/// Structurally complete description of one monkey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub index: usize,
    #[serde(default)]
    pub starting_items: Vec<u64>,
    pub operation: Operation,
    pub operand: Operand,
    pub test_divisor: u64,
    pub target_if_divisible: usize,
    pub target_if_not: usize,
}

/// Reasons a descriptor set cannot form a troop
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("a troop needs at least one monkey")]
    EmptyTroop,

    #[error("descriptor at position {position} declares index {index}; indices must match positions")]
    IndexMismatch { position: usize, index: usize },

    #[error("monkey {index} has a test divisor of zero")]
    ZeroDivisor { index: usize },

    #[error("monkey {index} throws to monkey {target}, but the troop only has {troop_size} monkeys")]
    TargetOutOfRange {
        index: usize,
        target: usize,
        troop_size: usize,
    },
}

impl AgentDescriptor {
    /// Check this descriptor as the `position`-th entry of a troop of `troop_size`
    pub fn validate(&self, position: usize, troop_size: usize) -> Result<(), DescriptorError> {
        if self.index != position {
            return Err(DescriptorError::IndexMismatch {
                position,
                index: self.index,
            });
        }

        if self.test_divisor == 0 {
            return Err(DescriptorError::ZeroDivisor { index: self.index });
        }

        for target in [self.target_if_divisible, self.target_if_not] {
            if target >= troop_size {
                return Err(DescriptorError::TargetOutOfRange {
                    index: self.index,
                    target,
                    troop_size,
                });
            }
        }

        Ok(())
    }

    /// True when either routing target is the monkey itself
    pub fn routes_to_self(&self) -> bool {
        self.target_if_divisible == self.index || self.target_if_not == self.index
    }
}

/// Validate a whole descriptor list before any monkey is built
pub fn validate_descriptors(descriptors: &[AgentDescriptor]) -> Result<(), DescriptorError> {
    if descriptors.is_empty() {
        return Err(DescriptorError::EmptyTroop);
    }

    for (position, descriptor) in descriptors.iter().enumerate() {
        descriptor.validate(position, descriptors.len())?;
        if descriptor.routes_to_self() {
            log::warn!(
                "Monkey {} routes items to itself; they will wait for the next round",
                descriptor.index
            );
        }
    }

    Ok(())
}
