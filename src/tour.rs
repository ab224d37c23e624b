//! Approximate traveling-salesperson tours.
//!
//! Tours are computed over the metric closure of the graph: the cost of going from one device to
//! another is the cost of the cheapest route between them, so graphs that aren't complete still
//! have a tour as long as they're connected. Consecutive devices of a tour may therefore not be
//! directly linked, [`Tour::walk`] expands the tour into the devices actually traversed.
//!
//! The heuristic is nearest-neighbour construction from every starting device followed by 2-opt
//! improvement. It gives no optimality guarantee.

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    graph::{Graph, GraphIndex},
    route::shortest_path,
};

/// A closed tour visiting every device once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tour {
    /// The devices in visiting order, the first device is repeated at the end.
    pub cycle: Vec<String>,
    /// The sum of the route costs between consecutive devices.
    pub cost: u64,
    /// The devices traversed when following the tour over the physical links.
    pub walk: Vec<String>,
}

/// Approximates a minimum cost tour over all devices.
///
/// The graph must be connected and contain at least three devices. The tour starts and ends at
/// the first device in canonical order.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use netscope::{device::DeviceKind, edge::Link, graph::Graph, tour::approximate_tour};
///
/// let devices: BTreeMap<String, DeviceKind> = ["A", "B", "C"]
///     .into_iter()
///     .map(|id| (id.to_owned(), DeviceKind::Router))
///     .collect();
/// let links = vec![Link::new("A", "B", 1), Link::new("B", "C", 2)];
/// let graph = Graph::from_registry(&devices, &links).unwrap();
///
/// let tour = approximate_tour(&graph).unwrap();
/// assert_eq!(tour.cycle, vec!["A", "B", "C", "A"]);
/// // C back to A goes through B.
/// assert_eq!(tour.cost, 6);
/// assert_eq!(tour.walk, vec!["A", "B", "C", "B", "A"]);
/// ```
pub fn approximate_tour(graph: &Graph) -> Result<Tour> {
    let n = graph.vertex_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }

    let components = graph.component_count();
    if n < 3 || components != 1 {
        return Err(Error::DisconnectedGraph {
            nodes: n,
            components,
        });
    }

    let distances = metric_closure(graph);

    let mut best = improved_tour(&distances, 0);
    let mut best_cost = cycle_cost(&distances, &best);

    for start in 1..n {
        let order = improved_tour(&distances, start);
        let cost = cycle_cost(&distances, &order);
        trace!(start, cost, "candidate tour");

        if cost < best_cost {
            best = order;
            best_cost = cost;
        }
    }

    // Rotate so the tour starts at the first device.
    if let Some(position) = best.iter().position(|i| *i == 0) {
        best.rotate_left(position);
    }

    let mut cycle: Vec<String> = best.iter().map(|i| graph.vertex(*i).to_owned()).collect();
    cycle.push(cycle[0].clone());

    let mut walk = vec![cycle[0].clone()];
    for (a, b) in cycle.iter().tuple_windows() {
        let route = shortest_path(graph, a, b)?;
        walk.extend(route.path.into_iter().skip(1));
    }

    debug!(cost = best_cost, devices = n, "approximated tour");

    Ok(Tour {
        cycle,
        cost: best_cost,
        walk,
    })
}

//
// Helpers
//

/// Returns the all-pairs route costs of a connected graph.
fn metric_closure(graph: &Graph) -> Vec<Vec<u64>> {
    let matrix = graph.distance_matrix();

    matrix
        .row_iter()
        .map(|row| row.iter().map(|d| *d as u64).collect())
        .collect()
}

/// Builds a nearest-neighbour tour from `start` then improves it with 2-opt.
fn improved_tour(distances: &[Vec<u64>], start: GraphIndex) -> Vec<GraphIndex> {
    let mut order = nearest_neighbour(distances, start);
    two_opt(distances, &mut order);

    order
}

/// Greedily visits the closest unvisited device, ties go to the lowest index.
fn nearest_neighbour(distances: &[Vec<u64>], start: GraphIndex) -> Vec<GraphIndex> {
    let n = distances.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let mut current = start;
    visited[current] = true;
    order.push(current);

    loop {
        let closest = (0..n)
            .filter(|j| !visited[*j])
            .min_by_key(|j| (distances[current][*j], *j));

        let Some(next) = closest else {
            break;
        };

        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Reverses tour segments while doing so shortens the tour.
fn two_opt(distances: &[Vec<u64>], order: &mut [GraphIndex]) {
    let n = order.len();
    if n < 4 {
        return;
    }

    let mut improved = true;
    while improved {
        improved = false;

        for i in 0..n - 1 {
            for j in i + 2..n {
                // These two edges share a device, swapping them changes nothing.
                if i == 0 && j == n - 1 {
                    continue;
                }

                let (a, b) = (order[i], order[i + 1]);
                let (c, d) = (order[j], order[(j + 1) % n]);

                let current = distances[a][b] + distances[c][d];
                let swapped = distances[a][c] + distances[b][d];

                if swapped < current {
                    order[i + 1..=j].reverse();
                    improved = true;
                }
            }
        }
    }
}

/// Returns the cost of the closed tour.
fn cycle_cost(distances: &[Vec<u64>], order: &[GraphIndex]) -> u64 {
    order
        .iter()
        .circular_tuple_windows()
        .map(|(a, b)| distances[*a][*b])
        .sum()
}
