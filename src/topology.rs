//! Topology classification.
//!
//! The shape of a network is inferred from a handful of structural measurements (vertex count,
//! edge count, degree sequence and acyclicity). Several shapes can hold at once, e.g. a
//! three-device triangle is both a ring and a full mesh, so the checks run in a fixed order and
//! the first match wins:
//!
//! 1. star,
//! 2. full mesh,
//! 3. ring,
//! 4. bus,
//! 5. tree,
//! 6. hybrid (anything else, and graphs of fewer than two devices).

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::graph::Graph;

/// The recognised network topologies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Topology {
    Star,
    Ring,
    FullMesh,
    Bus,
    Tree,
    Hybrid,
}

impl Topology {
    /// Returns the human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Star => "Star Topology",
            Self::Ring => "Ring Topology",
            Self::FullMesh => "Full Mesh Topology",
            Self::Bus => "Bus Topology",
            Self::Tree => "Tree Topology",
            Self::Hybrid => "Hybrid Topology",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The detected topology and the measurements that justify it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub topology: Topology,
    pub reason: String,
}

impl Classification {
    fn new(topology: Topology, reason: String) -> Self {
        Self { topology, reason }
    }
}

/// Classifies the topology of a graph.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use netscope::{
///     device::DeviceKind,
///     edge::Link,
///     graph::Graph,
///     topology::{classify, Topology},
/// };
///
/// let devices = BTreeMap::from([
///     ("Hub".to_owned(), DeviceKind::Switch),
///     ("L1".to_owned(), DeviceKind::Pc),
///     ("L2".to_owned(), DeviceKind::Pc),
///     ("L3".to_owned(), DeviceKind::Pc),
/// ]);
/// let links = vec![
///     Link::new("Hub", "L1", 1),
///     Link::new("Hub", "L2", 1),
///     Link::new("Hub", "L3", 1),
/// ];
/// let graph = Graph::from_registry(&devices, &links).unwrap();
///
/// let classification = classify(&graph);
/// assert_eq!(classification.topology, Topology::Star);
/// assert_eq!(
///     classification.reason,
///     "One central node connected to all others: Hub (Switch) has degree 3 = N-1 and the \
///      other 3 devices have degree 1 (N=4, E=3)."
/// );
/// ```
pub fn classify(graph: &Graph) -> Classification {
    let n = graph.vertex_count();
    let e = graph.edge_count();
    let degrees = graph.degree_sequence();

    let classification = if n < 2 {
        Classification::new(
            Topology::Hybrid,
            format!("Too few devices to identify a topology (N={n}, E={e})."),
        )
    } else if let Some(hub) = star_hub(&degrees) {
        let id = graph.vertex(hub);
        let kind = graph
            .kind(id)
            .map(|kind| format!(" ({kind})"))
            .unwrap_or_default();

        Classification::new(
            Topology::Star,
            format!(
                "One central node connected to all others: {id}{kind} has degree {} = N-1 and \
                 the other {} devices have degree 1 (N={n}, E={e}).",
                n - 1,
                n - 1
            ),
        )
    } else if e == n * (n - 1) / 2 {
        Classification::new(
            Topology::FullMesh,
            format!(
                "Every node directly connected to all others: E={e} = N(N-1)/2 and every \
                 device has degree {} (N={n}).",
                n - 1
            ),
        )
    } else if n >= 3 && degrees.iter().all(|d| *d == 2) {
        Classification::new(
            Topology::Ring,
            format!(
                "Each node connected to exactly two neighbors: all {n} devices have degree 2 \
                 (N={n}, E={e})."
            ),
        )
    } else if graph.is_tree() && is_path(&degrees) {
        Classification::new(
            Topology::Bus,
            format!(
                "Linear connection with two end devices: acyclic and connected, 2 devices have \
                 degree 1 and the remaining {} have degree 2 (N={n}, E={e}).",
                n - 2
            ),
        )
    } else if graph.is_tree() {
        let max = degrees.iter().max().copied().unwrap_or_default();
        let leaves = degrees.iter().filter(|d| **d == 1).count();

        Classification::new(
            Topology::Tree,
            format!(
                "Hierarchical structure with no cycles: connected with E={e} = N-1, {leaves} \
                 leaf devices, max degree={max} (N={n})."
            ),
        )
    } else {
        let max = degrees.iter().max().copied().unwrap_or_default();
        let min = degrees.iter().min().copied().unwrap_or_default();

        Classification::new(
            Topology::Hybrid,
            format!(
                "Combination of multiple topology characteristics: N={n}, E={e}, degrees \
                 range {min}..={max}, {} component(s).",
                graph.component_count()
            ),
        )
    };

    debug!(topology = %classification.topology, n, e, "classified topology");

    classification
}

//
// Helpers
//

/// Returns the index of the hub if exactly one device has degree `N-1` and all the others have
/// degree 1.
fn star_hub(degrees: &[usize]) -> Option<usize> {
    let n = degrees.len();
    if n < 2 {
        return None;
    }

    let mut hubs = degrees.iter().enumerate().filter(|(_, d)| **d == n - 1);
    let leaves = degrees.iter().filter(|d| **d == 1).count();

    match (hubs.next(), hubs.next()) {
        (Some((hub, _)), None) if leaves == n - 1 => Some(hub),
        _ => None,
    }
}

/// Returns whether the degree sequence is that of a path: exactly two devices of degree 1 and
/// none above 2.
fn is_path(degrees: &[usize]) -> bool {
    degrees.iter().filter(|d| **d == 1).count() == 2 && degrees.iter().all(|d| *d <= 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn cycle(n: usize) -> Graph {
        let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let links: Vec<(String, String, u32)> = (0..n)
            .map(|i| (ids[i].clone(), ids[(i + 1) % n].clone(), 1))
            .collect();

        graph_from(&ids, &links)
    }

    fn complete(n: usize, weight: u32) -> Graph {
        let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let mut links = vec![];
        for i in 0..n {
            for j in i + 1..n {
                links.push((ids[i].clone(), ids[j].clone(), weight));
            }
        }

        graph_from(&ids, &links)
    }

    fn star(leaves: usize) -> Graph {
        let mut ids = vec!["hub".to_owned()];
        ids.extend((0..leaves).map(|i| format!("leaf{i}")));
        let links: Vec<(String, String, u32)> = (1..=leaves)
            .map(|i| ("hub".to_owned(), ids[i].clone(), 1))
            .collect();

        graph_from(&ids, &links)
    }

    fn graph_from(ids: &[String], links: &[(String, String, u32)]) -> Graph {
        use std::collections::BTreeMap;

        use crate::{device::DeviceKind, edge::Link};

        let devices: BTreeMap<String, DeviceKind> = ids
            .iter()
            .map(|id| (id.clone(), DeviceKind::Switch))
            .collect();
        let links: Vec<Link> = links
            .iter()
            .map(|(u, v, w)| Link::new(u.as_str(), v.as_str(), *w))
            .collect();

        Graph::from_registry(&devices, &links).unwrap()
    }

    #[test]
    fn empty() {
        let classification = classify(&Graph::new());

        assert_eq!(classification.topology, Topology::Hybrid);
        assert_eq!(
            classification.reason,
            "Too few devices to identify a topology (N=0, E=0)."
        );
    }

    #[test]
    fn single_device() {
        let graph = graph!(nodes: ["a"]);

        assert_eq!(classify(&graph).topology, Topology::Hybrid);
    }

    #[test]
    fn star_graphs() {
        for leaves in 2..8 {
            assert_eq!(classify(&star(leaves)).topology, Topology::Star);
        }
    }

    #[test]
    fn star_wins_over_bus() {
        // A three-device path has a hub of degree N-1.
        let graph = graph![("a", "b", 1), ("b", "c", 1)];
        let classification = classify(&graph);

        assert_eq!(classification.topology, Topology::Star);
        assert!(classification.reason.contains("b (Switch)"));
    }

    #[test]
    fn ring_graphs() {
        for n in 4..9 {
            let classification = classify(&cycle(n));

            assert_eq!(classification.topology, Topology::Ring);
            assert_eq!(
                classification.reason,
                format!(
                    "Each node connected to exactly two neighbors: all {n} devices have degree \
                     2 (N={n}, E={n})."
                )
            );
        }
    }

    #[test]
    fn full_mesh_wins_over_ring() {
        assert_eq!(classify(&cycle(3)).topology, Topology::FullMesh);
        assert_eq!(classify(&complete(3, 5)).topology, Topology::FullMesh);
    }

    #[test]
    fn two_disjoint_triangles_are_a_ring() {
        let graph = graph![
            ("a", "b", 1),
            ("b", "c", 1),
            ("c", "a", 1),
            ("d", "e", 1),
            ("e", "f", 1),
            ("f", "d", 1)
        ];

        assert_eq!(classify(&graph).topology, Topology::Ring);
    }

    #[test]
    fn full_mesh_graphs() {
        for n in 3..8 {
            let graph = complete(n, 7);

            assert_eq!(graph.edge_count(), n * (n - 1) / 2);
            assert_eq!(classify(&graph).topology, Topology::FullMesh);
        }
    }

    #[test]
    fn two_devices_are_a_full_mesh() {
        let classification = classify(&graph![("a", "b", 1)]);

        assert_eq!(classification.topology, Topology::FullMesh);
        assert_eq!(
            classification.reason,
            "Every node directly connected to all others: E=1 = N(N-1)/2 and every device has \
             degree 1 (N=2)."
        );
    }

    #[test]
    fn bus() {
        let graph = graph![("a", "b", 1), ("b", "c", 1), ("c", "d", 1), ("d", "e", 1)];
        let classification = classify(&graph);

        assert_eq!(classification.topology, Topology::Bus);
        assert_eq!(
            classification.reason,
            "Linear connection with two end devices: acyclic and connected, 2 devices have \
             degree 1 and the remaining 3 have degree 2 (N=5, E=4)."
        );
    }

    #[test]
    fn tree() {
        //      r
        //    /   \
        //   a     b
        //  / \   / \
        // c   d e   f
        let graph = graph![
            ("r", "a", 1),
            ("r", "b", 1),
            ("a", "c", 1),
            ("a", "d", 1),
            ("b", "e", 1),
            ("b", "f", 1)
        ];
        let classification = classify(&graph);

        assert_eq!(classification.topology, Topology::Tree);
        assert_eq!(
            classification.reason,
            "Hierarchical structure with no cycles: connected with E=6 = N-1, 4 leaf devices, \
             max degree=3 (N=7)."
        );
    }

    #[test]
    fn hybrid() {
        // A ring with a tail.
        let graph = graph![("a", "b", 1), ("b", "c", 1), ("c", "a", 1), ("c", "d", 1)];
        let classification = classify(&graph);

        assert_eq!(classification.topology, Topology::Hybrid);
        assert_eq!(
            classification.reason,
            "Combination of multiple topology characteristics: N=4, E=4, degrees range 1..=3, \
             1 component(s)."
        );
    }

    #[test]
    fn disconnected_forest_is_hybrid() {
        let graph = graph![("a", "b", 1), ("c", "d", 1), ("d", "e", 1)];

        assert_eq!(classify(&graph).topology, Topology::Hybrid);
    }

    #[test]
    fn label() {
        assert_eq!(Topology::FullMesh.to_string(), "Full Mesh Topology");
        assert_eq!(Topology::Hybrid.label(), "Hybrid Topology");
    }
}
