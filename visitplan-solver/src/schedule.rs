//! Time-window feasibility and earliest scheduling of one route.
//!
//! A route is evaluated along depot → stops → depot. The forward pass keeps
//! the interval of cumulative times each node can be reached at, given the
//! arc costs, the slack between consecutive nodes and the node windows. The
//! backward pass narrows each interval to the times from which the rest of
//! the route can still be completed. Taking the earliest time at every node
//! of the narrowed intervals then yields the schedule that minimises both
//! the start and end times of the vehicle.

use crate::model::{DEPOT, ProblemModel};

/// Closed interval of cumulative minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    /// Earliest permitted time.
    pub start: u64,
    /// Latest permitted time.
    pub end: u64,
}

impl Window {
    /// The interval containing no time.
    pub(crate) const EMPTY: Self = Self { start: 1, end: 0 };

    pub(crate) const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub(crate) const fn is_empty(self) -> bool {
        self.start > self.end
    }

    pub(crate) fn intersect(self, other: Self) -> Self {
        Self::new(self.start.max(other.start), self.end.min(other.end))
    }

    pub(crate) const fn contains(self, time: u64) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Earliest feasible cumulative times for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Schedule {
    /// Departure time from the depot.
    pub start: u64,
    /// Arrival time at each stop, aligned with the route.
    pub arrivals: Vec<u64>,
    /// Return time at the depot.
    pub end: u64,
}

/// Evaluate `route` for `vehicle`, returning its earliest schedule when the
/// route respects every window, the slack bound and the vehicle horizon.
///
/// An empty route is always feasible and starts and ends at zero.
pub(crate) fn earliest_schedule(
    model: &ProblemModel,
    vehicle: usize,
    route: &[usize],
) -> Option<Schedule> {
    if route.is_empty() {
        return Some(Schedule {
            start: 0,
            arrivals: Vec::new(),
            end: 0,
        });
    }
    let horizon = model.horizon(vehicle);
    let slack = model.slack();
    let path: Vec<usize> = std::iter::once(DEPOT)
        .chain(route.iter().copied())
        .chain(std::iter::once(DEPOT))
        .collect();
    let costs: Vec<u64> = path
        .windows(2)
        .filter_map(|pair| match pair {
            [a, b] => Some(model.arc_cost(*a, *b)),
            _ => None,
        })
        .collect();

    let mut reach = Vec::with_capacity(path.len());
    let mut current = model.window(DEPOT, horizon);
    if current.is_empty() {
        return None;
    }
    reach.push(current);
    for (node, cost) in path.iter().skip(1).zip(&costs) {
        let moved = Window::new(
            current.start.saturating_add(*cost),
            current.end.saturating_add(*cost).saturating_add(slack),
        );
        current = moved.intersect(model.window(*node, horizon));
        if current.is_empty() {
            return None;
        }
        reach.push(current);
    }

    // Backward pass, from the final depot visit towards the start.
    let mut narrowed = reach.clone();
    for index in (0..costs.len()).rev() {
        let (Some(cost), Some(next)) = (costs.get(index), narrowed.get(index + 1).copied()) else {
            return None;
        };
        let from_next = Window::new(
            next.start.saturating_sub(cost.saturating_add(slack)),
            next.end.checked_sub(*cost)?,
        );
        let slot = narrowed.get_mut(index)?;
        *slot = slot.intersect(from_next);
        if slot.is_empty() {
            return None;
        }
    }

    let mut times = Vec::with_capacity(path.len());
    let mut time = narrowed.first()?.start;
    times.push(time);
    for (window, cost) in narrowed.iter().skip(1).zip(&costs) {
        time = time.saturating_add(*cost).max(window.start);
        if !window.contains(time) {
            return None;
        }
        times.push(time);
    }

    let (&start, rest) = times.split_first()?;
    let (&end, arrivals) = rest.split_last()?;
    Some(Schedule {
        start,
        arrivals: arrivals.to_vec(),
        end,
    })
}

/// Whether `route` can be driven by `vehicle`.
pub(crate) fn is_feasible(model: &ProblemModel, vehicle: usize, route: &[usize]) -> bool {
    earliest_schedule(model, vehicle, route).is_some()
}
