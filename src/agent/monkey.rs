//! A single monkey: its item queue and its inspect-and-route rule.

use std::fmt;
use std::num::NonZeroU64;

use num_bigint::BigUint;
use num_traits::Zero;

use super::types::Transform;
use crate::descriptor::{AgentDescriptor, DescriptorError};
use crate::queue::{ItemQueue, QueueError};
use crate::relief::ReliefPolicy;

/// A stateful agent owning a queue of worry levels
///
/// After construction only the queue and the inspection counter change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    index: usize,
    queue: ItemQueue,
    transform: Transform,
    divisor: NonZeroU64,
    target_if_divisible: usize,
    target_if_not: usize,
    inspection_count: u64,
}

impl Agent {
    /// Build a monkey from its descriptor.
    ///
    /// Target ranges are checked by the troop, which knows its own size.
    pub fn from_descriptor(descriptor: &AgentDescriptor) -> Result<Self, DescriptorError> {
        let divisor = NonZeroU64::new(descriptor.test_divisor).ok_or(DescriptorError::ZeroDivisor {
            index: descriptor.index,
        })?;

        Ok(Self {
            index: descriptor.index,
            queue: descriptor
                .starting_items
                .iter()
                .map(|&item| BigUint::from(item))
                .collect(),
            transform: Transform::new(descriptor.operation, descriptor.operand),
            divisor,
            target_if_divisible: descriptor.target_if_divisible,
            target_if_not: descriptor.target_if_not,
            inspection_count: 0,
        })
    }

    /// Inspect the front item and decide where it goes.
    ///
    /// Returns the new worry level and the index of the receiving monkey.
    /// Delivery is left to the caller.
    pub fn inspect_one(&mut self, relief: &dyn ReliefPolicy) -> Result<(BigUint, usize), QueueError> {
        let item = self.queue.dequeue()?;
        let value = relief.reduce(self.transform.apply(item));
        self.inspection_count += 1;

        let target = if (&value % self.divisor.get()).is_zero() {
            self.target_if_divisible
        } else {
            self.target_if_not
        };

        log::trace!("Monkey {} throws {} to monkey {}", self.index, value, target);
        Ok((value, target))
    }

    /// Catch an item thrown by another monkey (or by itself)
    pub fn receive(&mut self, value: BigUint) {
        self.queue.enqueue(value);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn inspection_count(&self) -> u64 {
        self.inspection_count
    }

    pub fn queue_size(&self) -> usize {
        self.queue.size()
    }

    pub fn items(&self) -> impl Iterator<Item = &BigUint> {
        self.queue.iter()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn divisor(&self) -> NonZeroU64 {
        self.divisor
    }

    /// `(target_if_divisible, target_if_not)`
    pub fn targets(&self) -> (usize, usize) {
        (self.target_if_divisible, self.target_if_not)
    }

    pub fn routes_to_self(&self) -> bool {
        self.target_if_divisible == self.index || self.target_if_not == self.index
    }
}

/// Renders the monkey in the notes format, listing its current items
impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.items().map(|item| item.to_string()).collect();
        writeln!(f, "Monkey {}:", self.index)?;
        writeln!(f, "  Starting items: {}", items.join(", "))?;
        writeln!(f, "  Operation: {}", self.transform)?;
        writeln!(f, "  Test: divisible by {}", self.divisor)?;
        writeln!(f, "    If true: throw to monkey {}", self.target_if_divisible)?;
        write!(f, "    If false: throw to monkey {}", self.target_if_not)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Operand, Operation};
    use crate::relief::{DivideBy, NoRelief};
    use std::num::NonZeroU32;

    fn monkey_zero() -> Agent {
        Agent::from_descriptor(&AgentDescriptor {
            index: 0,
            starting_items: vec![79, 98],
            operation: Operation::Multiply,
            operand: Operand::Literal(19),
            test_divisor: 23,
            target_if_divisible: 2,
            target_if_not: 3,
        })
        .unwrap()
    }

    #[test]
    fn test_inspect_with_divide_relief() {
        let mut monkey = monkey_zero();
        let relief = DivideBy::new(NonZeroU32::new(3).unwrap());

        // 79 * 19 = 1501, / 3 = 500, not divisible by 23
        let (value, target) = monkey.inspect_one(&relief).unwrap();
        assert_eq!(value, BigUint::from(500u32));
        assert_eq!(target, 3);

        // 98 * 19 = 1862, / 3 = 620
        let (value, target) = monkey.inspect_one(&relief).unwrap();
        assert_eq!(value, BigUint::from(620u32));
        assert_eq!(target, 3);

        assert_eq!(monkey.inspection_count(), 2);
        assert_eq!(monkey.queue_size(), 0);
    }

    #[test]
    fn test_divisible_branch() {
        let mut monkey = monkey_zero();
        monkey.inspect_one(&NoRelief).unwrap();
        monkey.inspect_one(&NoRelief).unwrap();
        // 23 * 19 is divisible by 23
        monkey.receive(BigUint::from(23u32));
        let (value, target) = monkey.inspect_one(&NoRelief).unwrap();
        assert_eq!(value, BigUint::from(437u32));
        assert_eq!(target, 2);
    }

    #[test]
    fn test_inspect_empty_queue_fails_without_counting() {
        let mut monkey = monkey_zero();
        monkey.inspect_one(&NoRelief).unwrap();
        monkey.inspect_one(&NoRelief).unwrap();
        assert_eq!(monkey.inspect_one(&NoRelief), Err(QueueError::Empty));
        assert_eq!(monkey.inspection_count(), 2);
    }

    #[test]
    fn test_zero_divisor_rejected() {
        let result = Agent::from_descriptor(&AgentDescriptor {
            index: 4,
            starting_items: Vec::new(),
            operation: Operation::Add,
            operand: Operand::SelfValue,
            test_divisor: 0,
            target_if_divisible: 0,
            target_if_not: 1,
        });
        assert_eq!(result, Err(DescriptorError::ZeroDivisor { index: 4 }));
    }

    #[test]
    fn test_display() {
        let monkey = monkey_zero();
        let expected = "Monkey 0:\n  Starting items: 79, 98\n  Operation: new = old * 19\n  Test: divisible by 23\n    If true: throw to monkey 2\n    If false: throw to monkey 3";
        assert_eq!(monkey.to_string(), expected);
    }
}
