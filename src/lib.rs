//! Netscope is a small toolkit for analysing hand-built network topologies: a handful of PCs,
//! switches and routers joined by weighted links.
//!
//! # Basic usage
//!
//! Devices and links are registered in a [`Session`](session::Session), which builds a
//! [`Graph`](graph::Graph) snapshot on demand. The graph can then be classified, routed over,
//! spanned and toured, or all of it at once with [`Session::analyze`](session::Session::analyze).
//!
//! ```rust
//! use netscope::{
//!     device::DeviceKind,
//!     route::{minimum_spanning_tree, shortest_path},
//!     session::Session,
//!     topology::{classify, Topology},
//! };
//!
//! let mut session = Session::new();
//!
//! // A switch with three PCs attached.
//! session.add_device("S1", DeviceKind::Switch).unwrap();
//! for pc in ["PC1", "PC2", "PC3"] {
//!     session.add_device(pc, DeviceKind::Pc).unwrap();
//!     session.add_link("S1", pc, 1).unwrap();
//! }
//!
//! let graph = session.build_graph().unwrap();
//!
//! assert_eq!(classify(&graph).topology, Topology::Star);
//! assert_eq!(shortest_path(&graph, "PC1", "PC3").unwrap().cost, 2);
//! assert_eq!(minimum_spanning_tree(&graph).total_cost, 3);
//!
//! // The full report can be printed as a card...
//! println!("{}", session.analyze(Some(("PC1", "PC3"))).unwrap());
//! // ...outputs:
//! // Detected Topology              : Star Topology
//! // Topology Reason                : One central node connected to all others: ...
//! // Route                          : PC1 ➔ S1 ➔ PC3
//! // Route Cost                     : 2
//! // MST Cost                       : 3
//! // ...
//! ```

/// Builds a graph of switches from `(u, v, weight)` links, optionally with extra isolated
/// devices.
#[cfg(test)]
macro_rules! graph {
    (nodes: [$($node:expr),* $(,)?] $(; $(($u:expr, $v:expr, $w:expr)),* $(,)?)?) => {{
        let mut devices: std::collections::BTreeMap<String, $crate::device::DeviceKind> =
            std::collections::BTreeMap::new();
        let mut links: Vec<$crate::edge::Link> = Vec::new();

        $(
            devices.insert(String::from($node), $crate::device::DeviceKind::Switch);
        )*

        $($(
            devices
                .entry(String::from($u))
                .or_insert($crate::device::DeviceKind::Switch);
            devices
                .entry(String::from($v))
                .or_insert($crate::device::DeviceKind::Switch);
            links.push($crate::edge::Link::new($u, $v, $w));
        )*)?

        $crate::graph::Graph::from_registry(&devices, &links).unwrap()
    }};
    ($(($u:expr, $v:expr, $w:expr)),* $(,)?) => {
        graph!(nodes: []; $(($u, $v, $w)),*)
    };
}

pub mod config;
pub mod device;
pub mod edge;
pub mod error;
pub mod graph;
pub mod report;
pub mod route;
pub mod session;
pub mod topology;
pub mod tour;

pub use error::{Error, Result};
