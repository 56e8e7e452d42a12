//! The troop: an ordered set of monkeys and the round scheduler that drives them.
//!
//! ## Round semantics
//!
//! Monkeys take turns in ascending index order. When a monkey's turn starts,
//! the troop snapshots how many items it holds and performs exactly that many
//! inspections. Each inspected item is delivered straight to its target's
//! queue, so:
//!
//! - an item thrown to a monkey that has not yet had its turn is inspected
//!   again in the same round;
//! - an item thrown to a monkey that already had its turn, including the
//!   thrower itself, waits for the next round.
//!
//! After each turn the top-2 leaderboard is recomputed.

pub mod leaderboard;

use num_bigint::BigUint;

use crate::agent::Agent;
use crate::descriptor::{validate_descriptors, AgentDescriptor, DescriptorError};
use crate::queue::QueueError;
use crate::relief::{ModuloProduct, ReliefPolicy};

pub use leaderboard::Leaderboard;

/// Ordered collection of monkeys; index = position = identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Troop {
    agents: Vec<Agent>,
    leaderboard: Leaderboard,
    rounds: u64,
}

impl Troop {
    /// Validate the descriptors and build every monkey
    pub fn from_descriptors(descriptors: &[AgentDescriptor]) -> Result<Self, DescriptorError> {
        validate_descriptors(descriptors)?;

        let agents = descriptors
            .iter()
            .map(Agent::from_descriptor)
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("Size of troop: {}", agents.len());
        Ok(Self {
            agents,
            leaderboard: Leaderboard::new(),
            rounds: 0,
        })
    }

    /// Run one full round under `relief`
    pub fn run_round(&mut self, relief: &dyn ReliefPolicy) -> Result<(), QueueError> {
        for i in 0..self.agents.len() {
            let pending = self.agents[i].queue_size();
            for _ in 0..pending {
                let (value, target) = self.agents[i].inspect_one(relief)?;
                self.agents[target].receive(value);
            }
            self.leaderboard.recompute(&self.agents);
        }

        self.rounds += 1;
        log::debug!("Round {} complete", self.rounds);
        Ok(())
    }

    /// Product of the two highest inspection counts
    pub fn business_level(&self) -> u128 {
        self.leaderboard.business_level(&self.agents)
    }

    /// `(index, inspection_count)` for every monkey in order
    pub fn inspection_counts(&self) -> Vec<(usize, u64)> {
        self.agents
            .iter()
            .map(|agent| (agent.index(), agent.inspection_count()))
            .collect()
    }

    /// Current leaders, highest count first
    pub fn leaders(&self) -> Option<[usize; 2]> {
        self.leaderboard.leaders()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn rounds_completed(&self) -> u64 {
        self.rounds
    }

    /// Number of items held across all queues
    pub fn total_items(&self) -> usize {
        self.agents.iter().map(Agent::queue_size).sum()
    }

    pub fn divisor_product(&self) -> BigUint {
        self.modulus_relief().modulus().clone()
    }

    /// Relief that reduces modulo the product of every divisor in the troop
    pub fn modulus_relief(&self) -> ModuloProduct {
        ModuloProduct::from_divisors(self.agents.iter().map(Agent::divisor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Operand, Operation};
    use crate::relief::NoRelief;

    fn adder(index: usize, items: Vec<u64>, divisor: u64, t: usize, f: usize) -> AgentDescriptor {
        AgentDescriptor {
            index,
            starting_items: items,
            operation: Operation::Add,
            operand: Operand::Literal(1),
            test_divisor: divisor,
            target_if_divisible: t,
            target_if_not: f,
        }
    }

    #[test]
    fn test_forward_throw_is_processed_same_round() {
        // Divisor 1: every item is divisible, so 0 -> 1 and 1 -> 0
        let mut troop =
            Troop::from_descriptors(&[adder(0, vec![5], 1, 1, 1), adder(1, vec![], 1, 0, 0)])
                .unwrap();

        troop.run_round(&NoRelief).unwrap();
        assert_eq!(troop.inspection_counts(), vec![(0, 1), (1, 1)]);
        // Item came back to monkey 0 after its turn and waits
        assert_eq!(troop.agents()[0].queue_size(), 1);
        assert_eq!(troop.agents()[1].queue_size(), 0);
        assert_eq!(troop.agents()[0].items().next(), Some(&BigUint::from(7u32)));

        troop.run_round(&NoRelief).unwrap();
        assert_eq!(troop.inspection_counts(), vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_backward_throw_waits_for_next_round() {
        // Monkey 1 throws to 0, monkey 0 keeps nothing for itself
        let mut troop =
            Troop::from_descriptors(&[adder(0, vec![], 1, 1, 1), adder(1, vec![2, 3], 1, 0, 0)])
                .unwrap();

        troop.run_round(&NoRelief).unwrap();
        assert_eq!(troop.inspection_counts(), vec![(0, 0), (1, 2)]);
        assert_eq!(troop.agents()[0].queue_size(), 2);
    }

    #[test]
    fn test_self_routing_drains_only_snapshot() {
        let mut troop = Troop::from_descriptors(&[adder(0, vec![1, 2, 3], 1, 0, 0)]).unwrap();

        troop.run_round(&NoRelief).unwrap();
        assert_eq!(troop.inspection_counts(), vec![(0, 3)]);
        assert_eq!(troop.agents()[0].queue_size(), 3);

        troop.run_round(&NoRelief).unwrap();
        assert_eq!(troop.inspection_counts(), vec![(0, 6)]);
        // Single monkey fills both leaderboard slots
        assert_eq!(troop.leaders(), Some([0, 0]));
        assert_eq!(troop.business_level(), 36);
    }

    #[test]
    fn test_leaderboard_ties_prefer_lowest_index() {
        // Three monkeys all inspect one item per round, passing it around
        let mut troop = Troop::from_descriptors(&[
            adder(0, vec![1], 1, 1, 1),
            adder(1, vec![], 1, 2, 2),
            adder(2, vec![], 1, 0, 0),
        ])
        .unwrap();

        assert_eq!(troop.leaders(), None);
        assert_eq!(troop.business_level(), 0);

        troop.run_round(&NoRelief).unwrap();
        assert_eq!(troop.inspection_counts(), vec![(0, 1), (1, 1), (2, 1)]);
        assert_eq!(troop.leaders(), Some([0, 1]));
        assert_eq!(troop.business_level(), 1);
    }

    #[test]
    fn test_leaderboard_tracks_top_two() {
        let mut troop = Troop::from_descriptors(&[
            adder(0, vec![], 1, 1, 1),
            adder(1, vec![1, 1], 1, 2, 2),
            adder(2, vec![1, 1, 1], 1, 1, 1),
        ])
        .unwrap();

        troop.run_round(&NoRelief).unwrap();
        // 1 drains 2 -> 2, then 2 drains 5 -> 1
        assert_eq!(troop.inspection_counts(), vec![(0, 0), (1, 2), (2, 5)]);
        assert_eq!(troop.leaders(), Some([2, 1]));
        assert_eq!(troop.business_level(), 10);
    }

    #[test]
    fn test_conservation_and_divisor_product() {
        let mut troop = Troop::from_descriptors(&[
            adder(0, vec![1, 2, 3], 2, 1, 2),
            adder(1, vec![4], 3, 2, 0),
            adder(2, vec![5, 6], 5, 0, 1),
        ])
        .unwrap();
        assert_eq!(troop.divisor_product(), BigUint::from(30u32));
        assert_eq!(troop.modulus_relief().modulus(), &BigUint::from(30u32));

        let relief = troop.modulus_relief();
        for _ in 0..50 {
            troop.run_round(&relief).unwrap();
            assert_eq!(troop.total_items(), 6);
        }
        assert_eq!(troop.rounds_completed(), 50);
    }

    #[test]
    fn test_invalid_descriptors_abort_construction() {
        let result = Troop::from_descriptors(&[adder(0, vec![1], 2, 0, 3)]);
        assert!(matches!(
            result,
            Err(DescriptorError::TargetOutOfRange { target: 3, .. })
        ));
        assert_eq!(Troop::from_descriptors(&[]), Err(DescriptorError::EmptyTroop));
    }
}
