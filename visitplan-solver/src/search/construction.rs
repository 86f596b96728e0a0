//! First-solution construction.
//!
//! Each vehicle in turn grows a path from the depot by appending the
//! unassigned stop with the cheapest arc from its current end, as long as
//! the extended route stays feasible. Stops left over are then placed by
//! cheapest feasible insertion across all routes. Stops that still cannot be
//! placed make the problem infeasible.

use std::collections::BTreeSet;

use log::debug;

use super::Solution;
use crate::model::{DEPOT, ProblemModel};
use crate::schedule::is_feasible;

/// Why construction stopped without covering every stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConstructionFailure {
    /// Nodes that no vehicle can serve even when visiting them alone.
    Unreachable(Vec<usize>),
    /// Nodes that could not be inserted into any route.
    Unplaced(Vec<usize>),
}

/// Build an initial solution covering every stop.
pub(crate) fn construct(model: &ProblemModel) -> Result<Solution, ConstructionFailure> {
    let mut unassigned: BTreeSet<usize> = model.stop_nodes().collect();
    let mut routes = vec![Vec::new(); model.vehicle_count()];

    for (vehicle, route) in routes.iter_mut().enumerate() {
        extend_cheapest_arc(model, vehicle, route, &mut unassigned);
    }
    debug!(
        "cheapest-arc pass placed {} of {} stops",
        model.stop_count().saturating_sub(unassigned.len()),
        model.stop_count()
    );

    while !unassigned.is_empty() {
        let Some(best) = cheapest_insertion(model, &routes, &unassigned) else {
            return Err(classify_leftovers(model, unassigned));
        };
        if let Some(route) = routes.get_mut(best.vehicle) {
            route.insert(best.position, best.node);
        }
        unassigned.remove(&best.node);
    }

    Ok(Solution::new(routes))
}

fn extend_cheapest_arc(
    model: &ProblemModel,
    vehicle: usize,
    route: &mut Vec<usize>,
    unassigned: &mut BTreeSet<usize>,
) {
    loop {
        let last = route.last().copied().unwrap_or(DEPOT);
        let mut best: Option<(u64, usize)> = None;
        for &node in unassigned.iter() {
            let cost = model.arc_cost(last, node);
            if best.is_some_and(|(best_cost, _)| best_cost <= cost) {
                continue;
            }
            route.push(node);
            let feasible = is_feasible(model, vehicle, route);
            route.pop();
            if feasible {
                best = Some((cost, node));
            }
        }
        let Some((_, node)) = best else {
            return;
        };
        route.push(node);
        unassigned.remove(&node);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Insertion {
    delta: u64,
    node: usize,
    vehicle: usize,
    position: usize,
}

fn cheapest_insertion(
    model: &ProblemModel,
    routes: &[Vec<usize>],
    unassigned: &BTreeSet<usize>,
) -> Option<Insertion> {
    let mut best: Option<Insertion> = None;
    for &node in unassigned {
        for (vehicle, route) in routes.iter().enumerate() {
            let base = model.route_cost(route);
            for position in 0..=route.len() {
                let mut candidate = route.clone();
                candidate.insert(position, node);
                if !is_feasible(model, vehicle, &candidate) {
                    continue;
                }
                let insertion = Insertion {
                    delta: model.route_cost(&candidate).saturating_sub(base),
                    node,
                    vehicle,
                    position,
                };
                if best.is_none_or(|current| insertion < current) {
                    best = Some(insertion);
                }
            }
        }
    }
    best
}

fn classify_leftovers(model: &ProblemModel, leftovers: BTreeSet<usize>) -> ConstructionFailure {
    let unreachable: Vec<usize> = leftovers
        .iter()
        .copied()
        .filter(|node| (0..model.vehicle_count()).all(|vehicle| !is_feasible(model, vehicle, &[*node])))
        .collect();
    if unreachable.is_empty() {
        ConstructionFailure::Unplaced(leftovers.into_iter().collect())
    } else {
        ConstructionFailure::Unreachable(unreachable)
    }
}
