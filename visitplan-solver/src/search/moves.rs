//! Neighbourhood scan for the improvement phase.
//!
//! Three move families are explored in a fixed order: relocating one stop
//! (within its route or into another), reversing a segment of one route, and
//! exchanging two stops between routes. Every candidate is checked for
//! feasibility and scored on the augmented cost; the strictly best improving
//! candidate wins and ties keep the first one scanned.
//!
//! A scan given a deadline checks the clock once per outer step and stops
//! early when it has passed, keeping whatever it found so far.

use std::time::Instant;

use super::Solution;
use super::guided::PenaltyTable;
use crate::model::ProblemModel;
use crate::schedule::is_feasible;

/// Family of a neighbourhood move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveKind {
    Relocate,
    TwoOpt,
    Exchange,
}

/// An improving move with the routes it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Improvement {
    pub kind: MoveKind,
    /// Change in augmented cost; always negative.
    pub delta: i128,
    /// Replacement routes keyed by vehicle index.
    pub routes: Vec<(usize, Vec<usize>)>,
}

/// Outcome of scanning the neighbourhood once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Scan {
    /// Best strictly improving move, if any.
    pub best: Option<Improvement>,
    /// Number of feasible candidates seen, improving or not.
    pub feasible: usize,
    /// Whether the deadline cut the scan short.
    pub interrupted: bool,
}

impl Scan {
    fn offer(&mut self, kind: MoveKind, delta: i128, routes: impl FnOnce() -> Vec<(usize, Vec<usize>)>) {
        self.feasible = self.feasible.saturating_add(1);
        if delta >= 0 || self.best.as_ref().is_some_and(|best| best.delta <= delta) {
            return;
        }
        self.best = Some(Improvement {
            kind,
            delta,
            routes: routes(),
        });
    }
}

/// Scans moves around a solution under the current penalties.
pub(crate) struct Neighbourhood<'a> {
    model: &'a ProblemModel,
    penalties: &'a PenaltyTable,
    deadline: Option<Instant>,
}

impl<'a> Neighbourhood<'a> {
    pub(crate) const fn new(model: &'a ProblemModel, penalties: &'a PenaltyTable) -> Self {
        Self {
            model,
            penalties,
            deadline: None,
        }
    }

    /// Stop scanning once `deadline` has passed.
    pub(crate) const fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Record and report whether the deadline has passed.
    fn expired(&self, scan: &mut Scan) -> bool {
        if self
            .deadline
            .is_some_and(|limit| Instant::now() >= limit)
        {
            scan.interrupted = true;
        }
        scan.interrupted
    }

    fn score(&self, route: &[usize]) -> i128 {
        i128::from(self.penalties.augmented_route_cost(self.model, route))
    }

    /// Scan all three move families.
    pub(crate) fn scan(&self, solution: &Solution) -> Scan {
        let scores: Vec<i128> = solution.routes().iter().map(|route| self.score(route)).collect();
        let mut scan = Scan::default();
        self.relocate(solution, &scores, &mut scan);
        if !scan.interrupted {
            self.two_opt(solution, &scores, &mut scan);
        }
        if !scan.interrupted {
            self.exchange(solution, &scores, &mut scan);
        }
        scan
    }

    fn relocate(&self, solution: &Solution, scores: &[i128], scan: &mut Scan) {
        let routes = solution.routes();
        for (from_vehicle, source) in routes.iter().enumerate() {
            let source_score = scores.get(from_vehicle).copied().unwrap_or_default();
            for index in 0..source.len() {
                if self.expired(scan) {
                    return;
                }
                let mut reduced = source.clone();
                let node = reduced.remove(index);
                let reduced_ok = is_feasible(self.model, from_vehicle, &reduced);
                let reduced_score = self.score(&reduced);
                for (to_vehicle, target) in routes.iter().enumerate() {
                    if to_vehicle == from_vehicle {
                        self.relocate_within(from_vehicle, &reduced, node, index, source_score, scan);
                        continue;
                    }
                    if !reduced_ok {
                        continue;
                    }
                    let target_score = scores.get(to_vehicle).copied().unwrap_or_default();
                    for position in 0..=target.len() {
                        let mut grown = target.clone();
                        grown.insert(position, node);
                        if !is_feasible(self.model, to_vehicle, &grown) {
                            continue;
                        }
                        let delta =
                            reduced_score + self.score(&grown) - source_score - target_score;
                        scan.offer(MoveKind::Relocate, delta, || {
                            vec![(from_vehicle, reduced.clone()), (to_vehicle, grown)]
                        });
                    }
                }
            }
        }
    }

    fn relocate_within(
        &self,
        vehicle: usize,
        reduced: &[usize],
        node: usize,
        original: usize,
        source_score: i128,
        scan: &mut Scan,
    ) {
        for position in (0..=reduced.len()).filter(|position| *position != original) {
            let mut moved = reduced.to_vec();
            moved.insert(position, node);
            if !is_feasible(self.model, vehicle, &moved) {
                continue;
            }
            let delta = self.score(&moved) - source_score;
            scan.offer(MoveKind::Relocate, delta, || vec![(vehicle, moved)]);
        }
    }

    fn two_opt(&self, solution: &Solution, scores: &[i128], scan: &mut Scan) {
        for (vehicle, route) in solution.routes().iter().enumerate() {
            let score = scores.get(vehicle).copied().unwrap_or_default();
            for start in 0..route.len() {
                if self.expired(scan) {
                    return;
                }
                for end in start.saturating_add(1)..route.len() {
                    let mut reversed = route.clone();
                    if let Some(segment) = reversed.get_mut(start..=end) {
                        segment.reverse();
                    }
                    if !is_feasible(self.model, vehicle, &reversed) {
                        continue;
                    }
                    let delta = self.score(&reversed) - score;
                    scan.offer(MoveKind::TwoOpt, delta, || vec![(vehicle, reversed)]);
                }
            }
        }
    }

    fn exchange(&self, solution: &Solution, scores: &[i128], scan: &mut Scan) {
        let routes = solution.routes();
        for (first_vehicle, first) in routes.iter().enumerate() {
            let first_score = scores.get(first_vehicle).copied().unwrap_or_default();
            for (second_vehicle, second) in routes.iter().enumerate().skip(first_vehicle + 1) {
                let second_score = scores.get(second_vehicle).copied().unwrap_or_default();
                for (i, first_node) in first.iter().enumerate() {
                    if self.expired(scan) {
                        return;
                    }
                    for (j, second_node) in second.iter().enumerate() {
                        let mut left = first.clone();
                        let mut right = second.clone();
                        if let (Some(a), Some(b)) = (left.get_mut(i), right.get_mut(j)) {
                            *a = *second_node;
                            *b = *first_node;
                        }
                        if !is_feasible(self.model, first_vehicle, &left)
                            || !is_feasible(self.model, second_vehicle, &right)
                        {
                            continue;
                        }
                        let delta = self.score(&left) + self.score(&right) - first_score - second_score;
                        scan.offer(MoveKind::Exchange, delta, || {
                            vec![(first_vehicle, left), (second_vehicle, right)]
                        });
                    }
                }
            }
        }
    }
}
