//! Construction followed by guided local search.
//!
//! The engine moves through explicit states: `Unsolved` → `Constructing` →
//! `Improving` → `Solved`, or `Infeasible` when construction cannot place
//! every stop. Improvement is bounded by a wall-clock deadline and an
//! optional iteration cap. The deadline is also checked inside each
//! neighbourhood scan, so a single scan over a large instance cannot outrun
//! it. The best solution on true cost is kept throughout, so the result never
//! regresses below the first solution.

mod construction;
mod guided;
mod moves;

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::model::{ProblemModel, arcs};

pub(crate) use construction::ConstructionFailure;
use guided::PenaltyTable;
use moves::Neighbourhood;

/// Stop sequences per vehicle, indexed like the request's vehicles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Solution {
    routes: Vec<Vec<usize>>,
}

impl Solution {
    pub(crate) const fn new(routes: Vec<Vec<usize>>) -> Self {
        Self { routes }
    }

    pub(crate) fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// Total true arc cost over all vehicles.
    pub(crate) fn cost(&self, model: &ProblemModel) -> u64 {
        self.routes.iter().map(|route| model.route_cost(route)).sum()
    }

    pub(crate) fn arc_count(&self) -> usize {
        self.routes.iter().map(|route| arcs(route).count()).sum()
    }

    fn replace(&mut self, vehicle: usize, route: Vec<usize>) {
        if let Some(slot) = self.routes.get_mut(vehicle) {
            *slot = route;
        }
    }
}

/// Lifecycle of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchState {
    Unsolved,
    Constructing,
    Improving,
    Solved,
    Infeasible,
}

/// Budget of the improvement phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SearchLimits {
    pub time_limit: Duration,
    pub max_iterations: Option<u64>,
    pub penalty_factor: f64,
}

/// Counters describing a finished search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SearchStats {
    pub construction_cost: u64,
    pub final_cost: u64,
    pub iterations: u64,
    pub penalty_rounds: u64,
}

/// A solved search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchOutcome {
    pub solution: Solution,
    pub stats: SearchStats,
}

/// Drives one search over a model.
pub(crate) struct SearchEngine<'a> {
    model: &'a ProblemModel,
    limits: SearchLimits,
    state: SearchState,
}

impl<'a> SearchEngine<'a> {
    pub(crate) const fn new(model: &'a ProblemModel, limits: SearchLimits) -> Self {
        Self {
            model,
            limits,
            state: SearchState::Unsolved,
        }
    }

    #[cfg(test)]
    pub(crate) const fn state(&self) -> SearchState {
        self.state
    }

    fn transition(&mut self, next: SearchState) {
        debug!("search state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run construction and improvement to completion.
    pub(crate) fn run(&mut self) -> Result<SearchOutcome, ConstructionFailure> {
        let started = Instant::now();
        let deadline = started.checked_add(self.limits.time_limit);

        self.transition(SearchState::Constructing);
        let initial = match construction::construct(self.model) {
            Ok(solution) => solution,
            Err(failure) => {
                self.transition(SearchState::Infeasible);
                return Err(failure);
            }
        };
        let construction_cost = initial.cost(self.model);
        info!(
            "initial solution covers {} stops at cost {construction_cost}",
            self.model.stop_count()
        );

        self.transition(SearchState::Improving);
        let mut stats = SearchStats {
            construction_cost,
            final_cost: construction_cost,
            ..SearchStats::default()
        };
        let best = self.improve(initial, deadline, &mut stats);
        stats.final_cost = best.cost(self.model);
        self.transition(SearchState::Solved);
        info!(
            "search finished after {} iterations and {} penalty rounds, cost {} -> {}",
            stats.iterations, stats.penalty_rounds, stats.construction_cost, stats.final_cost
        );
        Ok(SearchOutcome {
            solution: best,
            stats,
        })
    }

    fn budget_left(&self, deadline: Option<Instant>, iterations: u64) -> bool {
        let within_time = deadline.is_none_or(|limit| Instant::now() < limit);
        let within_count = self
            .limits
            .max_iterations
            .is_none_or(|cap| iterations < cap);
        within_time && within_count
    }

    fn improve(
        &self,
        initial: Solution,
        deadline: Option<Instant>,
        stats: &mut SearchStats,
    ) -> Solution {
        let mut penalties = PenaltyTable::new(self.model.node_count());
        let mut best_cost = initial.cost(self.model);
        let mut best = initial.clone();
        let mut current = initial;

        while self.budget_left(deadline, stats.iterations) {
            stats.iterations = stats.iterations.saturating_add(1);
            let scan = Neighbourhood::new(self.model, &penalties)
                .with_deadline(deadline)
                .scan(&current);
            if scan.interrupted && scan.best.is_none() {
                debug!("deadline reached during a scan; stopping");
                break;
            }
            if scan.feasible == 0 {
                debug!("neighbourhood is empty; stopping early");
                break;
            }
            if let Some(improvement) = scan.best {
                for (vehicle, route) in improvement.routes {
                    current.replace(vehicle, route);
                }
                let cost = current.cost(self.model);
                if cost < best_cost {
                    debug!("{:?} improved cost {best_cost} -> {cost}", improvement.kind);
                    best_cost = cost;
                    best.clone_from(&current);
                }
            } else {
                penalties.calibrate(self.model, &current, self.limits.penalty_factor);
                let penalised = penalties.penalize(self.model, &current);
                stats.penalty_rounds = stats.penalty_rounds.saturating_add(1);
                debug!(
                    "local optimum at cost {}; penalised {penalised} arcs",
                    current.cost(self.model)
                );
            }
        }
        best
    }
}
