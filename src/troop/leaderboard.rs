//! Top-2 inspection-count tracking.

use crate::agent::Agent;

/// The two monkeys with the highest inspection counts
///
/// Recomputed by a full scan, so ties always resolve to the lowest index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Leaderboard {
    slots: Option<[usize; 2]>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescan `agents` and refill both slots.
    ///
    /// A single-monkey troop puts that monkey in both slots.
    pub fn recompute(&mut self, agents: &[Agent]) {
        let Some(first) = top_excluding(agents, None) else {
            self.slots = None;
            return;
        };
        let second = top_excluding(agents, Some(first)).unwrap_or(first);
        self.slots = Some([first, second]);
    }

    /// Indices of the leaders, highest count first
    pub fn leaders(&self) -> Option<[usize; 2]> {
        self.slots
    }

    /// Product of the two leaders' counts, 0 before any monkey has had a turn
    pub fn business_level(&self, agents: &[Agent]) -> u128 {
        match self.slots {
            Some([a, b]) => {
                u128::from(agents[a].inspection_count()) * u128::from(agents[b].inspection_count())
            }
            None => 0,
        }
    }
}

fn top_excluding(agents: &[Agent], excluded: Option<usize>) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (i, agent) in agents.iter().enumerate() {
        if Some(i) == excluded {
            continue;
        }
        let count = agent.inspection_count();
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((i, count)),
        }
    }
    best.map(|(i, _)| i)
}
