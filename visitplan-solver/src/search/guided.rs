//! Guided local search penalties.
//!
//! Each arc carries a penalty counter. Whenever the local search settles in a
//! local optimum, the arcs of that optimum with the highest utility
//! `cost / (1 + penalty)` have their counters raised, which steers the next
//! descent away from them. Moves are scored on the augmented cost
//! `cost * SCALE + lambda * penalty`, kept in integers so scoring is exact.

use crate::model::{ProblemModel, arcs};

use super::Solution;

/// Fixed-point scale applied to true arc costs in augmented scores.
pub(crate) const SCALE: u64 = 1000;

/// Per-arc penalty counters over a dense node grid.
#[derive(Debug, Clone)]
pub(crate) struct PenaltyTable {
    nodes: usize,
    counts: Vec<u32>,
    lambda: u64,
}

impl PenaltyTable {
    pub(crate) fn new(nodes: usize) -> Self {
        Self {
            nodes,
            counts: vec![0; nodes.saturating_mul(nodes)],
            lambda: 0,
        }
    }

    fn slot(&self, from: usize, to: usize) -> Option<usize> {
        (to < self.nodes)
            .then(|| from.checked_mul(self.nodes)?.checked_add(to))
            .flatten()
    }

    /// Penalty counter of the arc `from → to`.
    pub(crate) fn count(&self, from: usize, to: usize) -> u32 {
        self.slot(from, to)
            .and_then(|slot| self.counts.get(slot))
            .copied()
            .unwrap_or(0)
    }

    /// Weight of one penalty unit in scaled cost units.
    #[cfg(test)]
    pub(crate) const fn lambda(&self) -> u64 {
        self.lambda
    }

    /// Fix the penalty weight from the first local optimum when not yet set.
    ///
    /// The weight is `factor` times the mean arc cost of `solution`, never
    /// below one scaled unit.
    pub(crate) fn calibrate(&mut self, model: &ProblemModel, solution: &Solution, factor: f64) {
        if self.lambda > 0 {
            return;
        }
        let arc_count = solution.arc_count();
        if arc_count == 0 {
            self.lambda = 1;
            return;
        }
        self.lambda = scaled_mean(solution.cost(model), arc_count, factor).max(1);
    }

    /// Augmented score of one route.
    pub(crate) fn augmented_route_cost(&self, model: &ProblemModel, route: &[usize]) -> u64 {
        arcs(route)
            .map(|(from, to)| {
                model
                    .arc_cost(from, to)
                    .saturating_mul(SCALE)
                    .saturating_add(self.lambda.saturating_mul(u64::from(self.count(from, to))))
            })
            .fold(0_u64, u64::saturating_add)
    }

    /// Raise the counters of the maximum-utility arcs of `solution`.
    ///
    /// Returns the number of arcs penalised.
    pub(crate) fn penalize(&mut self, model: &ProblemModel, solution: &Solution) -> usize {
        let mut best: Option<(u64, u32)> = None;
        let mut chosen: Vec<(usize, usize)> = Vec::new();
        for route in solution.routes() {
            for (from, to) in arcs(route) {
                let utility = (model.arc_cost(from, to), self.count(from, to));
                match best.map(|current| compare_utility(utility, current)) {
                    None | Some(std::cmp::Ordering::Greater) => {
                        best = Some(utility);
                        chosen.clear();
                        chosen.push((from, to));
                    }
                    Some(std::cmp::Ordering::Equal) => chosen.push((from, to)),
                    Some(std::cmp::Ordering::Less) => {}
                }
            }
        }
        chosen.sort_unstable();
        chosen.dedup();
        for (from, to) in &chosen {
            if let Some(slot) = self.slot(*from, *to)
                && let Some(count) = self.counts.get_mut(slot)
            {
                *count = count.saturating_add(1);
            }
        }
        chosen.len()
    }
}

/// Order two `(cost, penalty)` pairs by `cost / (1 + penalty)`.
fn compare_utility(left: (u64, u32), right: (u64, u32)) -> std::cmp::Ordering {
    let lhs = u128::from(left.0) * (u128::from(right.1) + 1);
    let rhs = u128::from(right.0) * (u128::from(left.1) + 1);
    lhs.cmp(&rhs)
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "penalty weight is a coarse heuristic derived once per search"
)]
fn scaled_mean(cost: u64, arc_count: usize, factor: f64) -> u64 {
    let mean = cost as f64 / arc_count as f64;
    let weight = (factor * mean * SCALE as f64).round();
    if weight.is_finite() && weight > 0.0 {
        weight.min(u64::MAX as f64) as u64
    } else {
        0
    }
}
