//! Shortest routes and minimum spanning trees.

use std::{cmp::Reverse, collections::BinaryHeap};

use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    edge::Link,
    error::{Error, Result},
    graph::{Graph, GraphIndex},
};

/// A route through the graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Route {
    /// The devices visited, source first and target last.
    pub path: Vec<String>,
    /// The sum of the link weights along the path.
    pub cost: u64,
}

impl Route {
    /// Returns the number of hops (links traversed) in the route.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// A minimum spanning forest: one minimum spanning tree per connected component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpanningForest {
    /// The chosen links, in the order they were accepted: ascending `(weight, u, v)`.
    pub links: Vec<Link>,
    /// The sum of the chosen link weights.
    pub total_cost: u64,
    /// The number of trees in the forest (connected components of the graph).
    pub components: usize,
}

impl SpanningForest {
    /// Returns whether the forest is a single spanning tree, i.e. the graph was connected.
    pub fn is_tree(&self) -> bool {
        self.components == 1
    }
}

/// Computes the cheapest route from `source` to `target` (Dijkstra).
///
/// A route from a device to itself is the device alone, at no cost. When several routes share
/// the lowest cost the one found first when expanding devices in canonical order wins, so the
/// result is stable for a given graph.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use netscope::{device::DeviceKind, edge::Link, graph::Graph, route::shortest_path};
///
/// let devices: BTreeMap<String, DeviceKind> = ["A", "B", "C"]
///     .into_iter()
///     .map(|id| (id.to_owned(), DeviceKind::Router))
///     .collect();
/// let links = vec![
///     Link::new("A", "B", 5),
///     Link::new("B", "C", 5),
///     Link::new("A", "C", 5),
/// ];
/// let graph = Graph::from_registry(&devices, &links).unwrap();
///
/// let route = shortest_path(&graph, "A", "C").unwrap();
/// assert_eq!(route.path, vec!["A", "C"]);
/// assert_eq!(route.cost, 5);
/// ```
pub fn shortest_path(graph: &Graph, source: &str, target: &str) -> Result<Route> {
    if graph.vertex_count() == 0 {
        return Err(Error::EmptyGraph);
    }

    let s = graph
        .index_of(source)
        .ok_or_else(|| Error::UnknownDevice(source.to_owned()))?;
    let t = graph
        .index_of(target)
        .ok_or_else(|| Error::UnknownDevice(target.to_owned()))?;

    let (distances, previous) = dijkstra(graph, s);

    let cost = distances[t].ok_or_else(|| Error::no_path(source, target))?;

    // Walk the predecessors back from the target.
    let mut path = vec![t];
    let mut current = t;
    while let Some(p) = previous[current] {
        path.push(p);
        current = p;
    }
    path.reverse();

    let route = Route {
        path: path
            .into_iter()
            .map(|i| graph.vertex(i).to_owned())
            .collect(),
        cost,
    };

    debug!(source, target, cost, hops = route.hops(), "computed shortest path");

    Ok(route)
}

/// Computes a minimum spanning forest (Kruskal).
///
/// Links are considered in ascending `(weight, u, v)` order, with `u < v`, which makes the
/// chosen links deterministic when weights tie. A disconnected graph yields one tree per
/// component, an empty graph yields an empty forest.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use netscope::{device::DeviceKind, edge::Link, graph::Graph, route::minimum_spanning_tree};
///
/// let devices: BTreeMap<String, DeviceKind> = ["A", "B", "C"]
///     .into_iter()
///     .map(|id| (id.to_owned(), DeviceKind::Switch))
///     .collect();
/// let links = vec![
///     Link::new("A", "B", 5),
///     Link::new("B", "C", 5),
///     Link::new("A", "C", 5),
/// ];
/// let graph = Graph::from_registry(&devices, &links).unwrap();
///
/// let mst = minimum_spanning_tree(&graph);
/// assert!(mst.is_tree());
/// assert_eq!(mst.total_cost, 10);
/// assert_eq!(mst.links, vec![Link::new("A", "B", 5), Link::new("A", "C", 5)]);
/// ```
pub fn minimum_spanning_tree(graph: &Graph) -> SpanningForest {
    let mut candidates: Vec<(u32, &str, &str)> = graph
        .edges()
        .iter()
        .map(|(edge, weight)| (*weight, edge.source().as_str(), edge.target().as_str()))
        .collect();
    candidates.sort_unstable();

    let mut components = DisjointSet::new(graph.vertex_count());
    let mut links = vec![];
    let mut total_cost = 0;

    for (weight, u, v) in candidates {
        // Safety: edges only join devices of this graph.
        let (Some(i), Some(j)) = (graph.index_of(u), graph.index_of(v)) else {
            continue;
        };

        if components.union(i, j) {
            trace!(u, v, weight, "accepted spanning link");
            total_cost += u64::from(weight);
            links.push(Link::new(u, v, weight));
        }
    }

    let forest = SpanningForest {
        links,
        total_cost,
        components: components.count(),
    };

    debug!(
        total_cost = forest.total_cost,
        components = forest.components,
        "computed minimum spanning forest"
    );

    forest
}

//
// Helpers
//

/// Single source shortest path distances and predecessors from `source`, `None` for unreachable
/// devices.
pub(crate) fn dijkstra(
    graph: &Graph,
    source: GraphIndex,
) -> (Vec<Option<u64>>, Vec<Option<GraphIndex>>) {
    let n = graph.vertex_count();
    let adjacency = graph.adjacency();

    let mut distances: Vec<Option<u64>> = vec![None; n];
    let mut previous: Vec<Option<GraphIndex>> = vec![None; n];
    let mut settled = vec![false; n];

    // Min-heap on (distance, index), so equal distances pop in canonical order.
    let mut heap = BinaryHeap::new();
    distances[source] = Some(0);
    heap.push(Reverse((0u64, source)));

    while let Some(Reverse((distance, m))) = heap.pop() {
        if settled[m] {
            continue;
        }
        settled[m] = true;

        for (j, weight) in &adjacency[m] {
            if settled[*j] {
                continue;
            }

            let candidate = distance + u64::from(*weight);
            // Only replace on strict improvement to keep the first route found.
            if distances[*j].map_or(true, |d| candidate < d) {
                distances[*j] = Some(candidate);
                previous[*j] = Some(m);
                heap.push(Reverse((candidate, *j)));
            }
        }
    }

    (distances, previous)
}

/// Union-find over graph indices, with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
    count: usize,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            count: n,
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }

        x
    }

    /// Merges the sets containing `a` and `b`, returns false if they were already merged.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return false;
        }

        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }

        self.parent[b] = a;
        self.size[a] += self.size[b];
        self.count -= 1;

        true
    }

    /// Returns the number of disjoint sets.
    fn count(&self) -> usize {
        self.count
    }
}
