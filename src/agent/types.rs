//! Transform types shared by descriptors and monkeys.

use std::fmt;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Arithmetic applied to a worry level during inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Multiply,
}

impl Operation {
    /// Symbol used in the notes format
    pub fn symbol(&self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Multiply => '*',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operation::Add),
            '*' => Some(Operation::Multiply),
            _ => None,
        }
    }
}

/// Right-hand side of an operation: a constant or the item's own value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OperandRepr", into = "OperandRepr")]
pub enum Operand {
    Literal(u64),
    /// `old`: the item's current worry level (doubling or squaring)
    SelfValue,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OperandRepr {
    Literal(u64),
    Word(String),
}

impl TryFrom<OperandRepr> for Operand {
    type Error = String;

    fn try_from(repr: OperandRepr) -> Result<Self, Self::Error> {
        match repr {
            OperandRepr::Literal(value) => Ok(Operand::Literal(value)),
            OperandRepr::Word(word) => match word.as_str() {
                "self" | "old" => Ok(Operand::SelfValue),
                other => other
                    .parse()
                    .map(Operand::Literal)
                    .map_err(|_| format!("invalid operand '{}', expected an integer or \"self\"", other)),
            },
        }
    }
}

impl From<Operand> for OperandRepr {
    fn from(operand: Operand) -> Self {
        match operand {
            Operand::Literal(value) => OperandRepr::Literal(value),
            Operand::SelfValue => OperandRepr::Word("self".to_string()),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => write!(f, "{}", value),
            Operand::SelfValue => write!(f, "old"),
        }
    }
}

/// An operation together with its operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transform {
    pub operation: Operation,
    pub operand: Operand,
}

impl Transform {
    pub fn new(operation: Operation, operand: Operand) -> Self {
        Self { operation, operand }
    }

    /// Apply the transform to a worry level
    pub fn apply(&self, value: BigUint) -> BigUint {
        match (self.operation, self.operand) {
            (Operation::Add, Operand::Literal(c)) => value + c,
            (Operation::Add, Operand::SelfValue) => &value + &value,
            (Operation::Multiply, Operand::Literal(c)) => value * c,
            (Operation::Multiply, Operand::SelfValue) => &value * &value,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "new = old {} {}", self.operation.symbol(), self.operand)
    }
}
