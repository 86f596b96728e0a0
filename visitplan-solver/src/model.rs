//! Routing graph built from a request and its travel-time matrix.
//!
//! Node `0` is the depot shared by every vehicle; node `i` (for `i >= 1`) is
//! `request.stops[i - 1]`. Times are minutes on a single continuous axis
//! starting at Monday 00:00.

use visitplan_core::{MINUTES_PER_DAY, OptimizeRequest, TravelTimeMatrix};

use crate::schedule::Window;

/// Index of the depot node.
pub(crate) const DEPOT: usize = 0;

/// One node of the routing graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeSpec {
    /// Minutes spent on site, charged on departure.
    pub service: u64,
    /// Permitted cumulative time at the node.
    pub window: Window,
}

/// One vehicle of the routing graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VehicleSpec {
    /// Upper bound on every cumulative time along the vehicle's route. Never
    /// later than the end of the last working day.
    pub horizon: u64,
}

/// Tunables that shape the time dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModelParams {
    /// Maximum idle minutes between leaving one node and serving the next.
    pub slack: u64,
    /// Number of working days covered by the horizon.
    pub horizon_days: u32,
}

/// The constrained routing graph for one request.
#[derive(Debug, Clone)]
pub(crate) struct ProblemModel {
    nodes: Vec<NodeSpec>,
    vehicles: Vec<VehicleSpec>,
    travel: Vec<Vec<u64>>,
    slack: u64,
}

impl ProblemModel {
    /// Build the graph. The matrix must be indexed like `request.locations()`.
    pub(crate) fn new(
        request: &OptimizeRequest,
        matrix: &TravelTimeMatrix,
        params: ModelParams,
    ) -> Self {
        let depot = NodeSpec {
            service: 0,
            window: Window::new(0, u64::MAX),
        };
        let nodes = std::iter::once(depot)
            .chain(request.stops.iter().map(|stop| NodeSpec {
                service: u64::from(stop.service_minutes),
                window: Window::new(u64::from(stop.tw_start), u64::from(stop.tw_end)),
            }))
            .collect();
        let days = u64::from(params.horizon_days);
        let week_end = u64::from(MINUTES_PER_DAY).saturating_mul(days);
        let vehicles = request
            .vehicles
            .iter()
            .map(|vehicle| VehicleSpec {
                horizon: u64::from(vehicle.max_daily_minutes)
                    .saturating_mul(days)
                    .min(week_end),
            })
            .collect();
        let travel = matrix
            .rows()
            .iter()
            .map(|row| row.iter().copied().map(u64::from).collect())
            .collect();
        Self {
            nodes,
            vehicles,
            travel,
            slack: params.slack,
        }
    }

    /// Number of nodes including the depot.
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stop nodes.
    pub(crate) fn stop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Number of vehicles.
    pub(crate) fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Stop node indices in request order.
    pub(crate) fn stop_nodes(&self) -> std::ops::Range<usize> {
        1..self.nodes.len()
    }

    /// Allowed idle minutes between consecutive nodes.
    pub(crate) const fn slack(&self) -> u64 {
        self.slack
    }

    /// Horizon of `vehicle`, or zero for an unknown vehicle.
    pub(crate) fn horizon(&self, vehicle: usize) -> u64 {
        self.vehicles.get(vehicle).map_or(0, |spec| spec.horizon)
    }

    /// Window of `node` for a vehicle with the given horizon.
    pub(crate) fn window(&self, node: usize, horizon: u64) -> Window {
        let own = self
            .nodes
            .get(node)
            .map_or(Window::EMPTY, |spec| spec.window);
        own.intersect(Window::new(0, horizon))
    }

    /// Service minutes of `node`.
    pub(crate) fn service(&self, node: usize) -> u64 {
        self.nodes.get(node).map_or(0, |spec| spec.service)
    }

    /// Raw travel minutes from `from` to `to`.
    pub(crate) fn travel(&self, from: usize, to: usize) -> u64 {
        self.travel
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(u64::MAX)
    }

    /// Arc cost: travel plus the service time of the departure node.
    pub(crate) fn arc_cost(&self, from: usize, to: usize) -> u64 {
        self.travel(from, to).saturating_add(self.service(from))
    }

    /// Sum of arc costs along depot → `route` → depot; zero for an unused
    /// vehicle.
    pub(crate) fn route_cost(&self, route: &[usize]) -> u64 {
        arcs(route).map(|(a, b)| self.arc_cost(a, b)).sum()
    }
}

/// Arcs travelled by a route, including leaving and returning to the depot.
///
/// An empty route travels no arcs.
pub(crate) fn arcs(route: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let first = route.first().map(|node| (DEPOT, *node));
    let last = route.last().map(|node| (*node, DEPOT));
    first
        .into_iter()
        .chain(route.windows(2).filter_map(|pair| match pair {
            [a, b] => Some((*a, *b)),
            _ => None,
        }))
        .chain(last)
}
