//! Relief policies: how worry levels are kept in check after each inspection.
//!
//! Two policies matter in practice:
//!
//! - **Divide by a constant** (classic "relief"): integer-divides the worry
//!   level, which changes divisibility outcomes and is only meant for short
//!   runs.
//! - **Reduce modulo the product of all divisors**: keeps magnitudes bounded
//!   for any number of rounds. Every test divisor divides the product, so
//!   `v % d == (v % product) % d` and no routing decision changes.
//!
//! The simulation itself only sees the [`ReliefPolicy`] trait. [`ReliefConfig`]
//! is the serializable selector used by configuration files and the CLI.

use std::fmt;
use std::num::{NonZeroU32, NonZeroU64};
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::troop::Troop;

/// Magnitude reduction applied to a worry level after its transform
pub trait ReliefPolicy {
    /// Reduce a freshly transformed worry level
    fn reduce(&self, value: BigUint) -> BigUint;

    /// Short human-readable description for logs and reports
    fn describe(&self) -> String;
}

/// Leaves worry levels untouched (unbounded growth)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoRelief;

impl ReliefPolicy for NoRelief {
    fn reduce(&self, value: BigUint) -> BigUint {
        value
    }

    fn describe(&self) -> String {
        "none".to_string()
    }
}

/// Integer-divides worry levels by a constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivideBy {
    divisor: BigUint,
}

impl DivideBy {
    pub fn new(divisor: NonZeroU32) -> Self {
        Self {
            divisor: BigUint::from(divisor.get()),
        }
    }
}

impl ReliefPolicy for DivideBy {
    fn reduce(&self, value: BigUint) -> BigUint {
        value / &self.divisor
    }

    fn describe(&self) -> String {
        format!("divide by {}", self.divisor)
    }
}

/// Reduces worry levels modulo the product of every test divisor in a troop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuloProduct {
    modulus: BigUint,
}

impl ModuloProduct {
    /// Build the policy from the divisors it has to preserve
    pub fn from_divisors<I>(divisors: I) -> Self
    where
        I: IntoIterator<Item = NonZeroU64>,
    {
        let modulus = divisors
            .into_iter()
            .fold(BigUint::one(), |acc, d| acc * d.get());
        Self { modulus }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }
}

impl ReliefPolicy for ModuloProduct {
    fn reduce(&self, value: BigUint) -> BigUint {
        value % &self.modulus
    }

    fn describe(&self) -> String {
        format!("reduce modulo {}", self.modulus)
    }
}

/// Serializable relief selection
///
/// ```yaml
/// relief:
///   policy: divide
///   divisor: 3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum ReliefConfig {
    /// No reduction at all
    None,
    /// Integer-divide by `divisor`
    Divide { divisor: u32 },
    /// Reduce modulo the product of the troop's divisors
    Modulus,
}

/// Errors produced while selecting a relief policy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReliefError {
    #[error("relief divisor must be positive")]
    ZeroDivisor,
    #[error("unknown relief policy '{0}' (expected none, modulus or divide:<n>)")]
    Unknown(String),
}

impl ReliefConfig {
    /// Build the concrete policy for `troop`
    pub fn build(&self, troop: &Troop) -> Result<Box<dyn ReliefPolicy>, ReliefError> {
        Ok(match *self {
            ReliefConfig::None => Box::new(NoRelief),
            ReliefConfig::Divide { divisor } => {
                let divisor = NonZeroU32::new(divisor).ok_or(ReliefError::ZeroDivisor)?;
                Box::new(DivideBy::new(divisor))
            }
            ReliefConfig::Modulus => Box::new(troop.modulus_relief()),
        })
    }
}

impl Default for ReliefConfig {
    fn default() -> Self {
        ReliefConfig::Modulus
    }
}

impl fmt::Display for ReliefConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReliefConfig::None => write!(f, "none"),
            ReliefConfig::Divide { divisor } => write!(f, "divide:{}", divisor),
            ReliefConfig::Modulus => write!(f, "modulus"),
        }
    }
}

/// Parses the CLI form: `none`, `modulus` or `divide:<n>`
impl FromStr for ReliefConfig {
    type Err = ReliefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "none" => return Ok(ReliefConfig::None),
            "modulus" | "mod" => return Ok(ReliefConfig::Modulus),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix("divide:") {
            let divisor: u32 = rest
                .trim()
                .parse()
                .map_err(|_| ReliefError::Unknown(s.to_string()))?;
            if divisor == 0 {
                return Err(ReliefError::ZeroDivisor);
            }
            return Ok(ReliefConfig::Divide { divisor });
        }

        Err(ReliefError::Unknown(s.to_string()))
    }
}
