//! A module for working with graphs.

use std::collections::{BTreeMap, VecDeque};

use nalgebra::DMatrix;
use tracing::{trace, warn};

use crate::{
    device::DeviceKind,
    edge::{Edge, Link},
    error::{Error, Result},
};

/// The position of a device in the graph's index.
pub type GraphIndex = usize;

/// An undirected, weighted graph of devices.
///
/// The graph is a snapshot: it's built from the registry of devices and links and never mutated
/// afterwards. Devices are indexed in ascending order of their id, this order is the canonical
/// ordering used to break ties in every analysis.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    /// The devices in the graph.
    devices: BTreeMap<String, DeviceKind>,
    /// The distinct edges in the graph and their effective weight.
    edges: BTreeMap<Edge<String>, u32>,
    /// A mapping of device ids to their indices, used by the matrices and the traversals.
    index: BTreeMap<String, GraphIndex>,
    /// The reverse of the index.
    ids: Vec<String>,
    /// Adjacency lists, `(neighbour, weight)` sorted by neighbour index.
    adjacency: Vec<Vec<(GraphIndex, u32)>>,
}

impl Graph {
    /// Creates an empty graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use netscope::graph::Graph;
    ///
    /// let graph = Graph::new();
    /// assert_eq!(graph.vertex_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from a registry of devices and the links between them.
    ///
    /// Every link endpoint must be a registered device, links can't loop back on a device and
    /// weights must be positive. When several links join the same pair of devices the link
    /// registered last wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// use netscope::{device::DeviceKind, edge::Link, graph::Graph};
    ///
    /// let devices = BTreeMap::from([
    ///     ("R1".to_owned(), DeviceKind::Router),
    ///     ("S1".to_owned(), DeviceKind::Switch),
    /// ]);
    /// let links = vec![Link::new("R1", "S1", 5), Link::new("S1", "R1", 7)];
    ///
    /// let graph = Graph::from_registry(&devices, &links).unwrap();
    /// assert_eq!(graph.edge_count(), 1);
    /// assert_eq!(graph.weight("R1", "S1"), Some(7));
    /// ```
    pub fn from_registry(devices: &BTreeMap<String, DeviceKind>, links: &[Link]) -> Result<Self> {
        let index: BTreeMap<String, GraphIndex> = devices
            .keys()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut edges = BTreeMap::new();
        for link in links {
            validate_link(devices, link)?;

            if let Some(previous) = edges.insert(link.edge(), link.weight) {
                warn!(
                    u = %link.u,
                    v = %link.v,
                    previous,
                    weight = link.weight,
                    "parallel link replaces the earlier weight"
                );
            }
        }

        let ids: Vec<String> = devices.keys().cloned().collect();
        let mut adjacency = vec![vec![]; index.len()];
        for (edge, weight) in &edges {
            // Safety: both endpoints were validated against the device registry.
            let i = index[edge.source()];
            let j = index[edge.target()];

            adjacency[i].push((j, *weight));
            adjacency[j].push((i, *weight));
        }

        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
        }

        trace!(
            vertices = index.len(),
            edges = edges.len(),
            "built graph from registry"
        );

        Ok(Self {
            devices: devices.clone(),
            edges,
            index,
            ids,
            adjacency,
        })
    }

    /// Returns the devices in the graph, ordered by id.
    pub fn devices(&self) -> &BTreeMap<String, DeviceKind> {
        &self.devices
    }

    /// Returns the kind of a device.
    pub fn kind(&self, id: &str) -> Option<DeviceKind> {
        self.devices.get(id).copied()
    }

    /// Returns the distinct edges in the graph with their effective weight.
    pub fn edges(&self) -> &BTreeMap<Edge<String>, u32> {
        &self.edges
    }

    /// Reads the edges back as links, in ascending edge order.
    pub fn links(&self) -> Vec<Link> {
        self.edges
            .iter()
            .map(|(edge, weight)| Link::new(edge.source(), edge.target(), *weight))
            .collect()
    }

    /// Checks if the graph contains a device.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the vertex count of the graph.
    pub fn vertex_count(&self) -> usize {
        self.index.len()
    }

    /// Returns the edge count of the graph, parallel links count once.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the weight of the edge between two devices, if there is one.
    pub fn weight(&self, u: &str, v: &str) -> Option<u32> {
        self.edges
            .get(&Edge::new(u.to_owned(), v.to_owned()))
            .copied()
    }

    /// Returns the ids of the devices directly linked to `id`, in canonical order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// use netscope::{device::DeviceKind, edge::Link, graph::Graph};
    ///
    /// let devices: BTreeMap<String, DeviceKind> = ["a", "b", "c"]
    ///     .into_iter()
    ///     .map(|id| (id.to_owned(), DeviceKind::Pc))
    ///     .collect();
    /// let links = vec![Link::new("b", "c", 1), Link::new("b", "a", 1)];
    /// let graph = Graph::from_registry(&devices, &links).unwrap();
    ///
    /// assert_eq!(graph.neighbours("b"), vec!["a", "c"]);
    /// assert!(graph.neighbours("z").is_empty());
    /// ```
    pub fn neighbours(&self, id: &str) -> Vec<&str> {
        match self.index_of(id) {
            Some(i) => self.adjacency[i]
                .iter()
                .map(|(j, _)| self.vertex(*j))
                .collect(),
            None => vec![],
        }
    }

    /// Returns the degree (number of distinct neighbours) of a device.
    pub fn degree(&self, id: &str) -> Option<usize> {
        self.index_of(id).map(|i| self.adjacency[i].len())
    }

    /// Returns the in-degree of a device in the directed view of the graph.
    ///
    /// Links carry no direction so this is the undirected degree.
    pub fn in_degree(&self, id: &str) -> Option<usize> {
        self.degree(id)
    }

    /// Returns the out-degree of a device in the directed view of the graph.
    ///
    /// Links carry no direction so this is the undirected degree.
    pub fn out_degree(&self, id: &str) -> Option<usize> {
        self.degree(id)
    }

    /// Returns the degrees of all devices, in canonical order.
    pub fn degree_sequence(&self) -> Vec<usize> {
        self.adjacency.iter().map(Vec::len).collect()
    }

    /// Returns a mapping of device ids to their degree.
    pub fn degree_centrality(&self) -> BTreeMap<&str, usize> {
        self.index
            .iter()
            .map(|(id, i)| (id.as_str(), self.adjacency[*i].len()))
            .collect()
    }

    /// Computes the density of the graph, the ratio of edges with respect to the maximum possible
    /// edges.
    ///
    /// The density is undefined (`NaN`) for graphs with fewer than two devices.
    pub fn density(&self) -> f64 {
        let vc = self.vertex_count() as f64;
        let ec = self.edge_count() as f64;

        // Calculate the total number of possible edges given a vertex count.
        let pec = vc * (vc - 1.0) / 2.0;
        ec / pec
    }

    /// Returns the connected components as lists of indices, each sorted, ordered by their
    /// smallest index.
    pub fn components(&self) -> Vec<Vec<GraphIndex>> {
        let n = self.vertex_count();
        let mut visited = vec![false; n];
        let mut components = vec![];

        for start in 0..n {
            if visited[start] {
                continue;
            }

            visited[start] = true;
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);

            while let Some(m) = queue.pop_front() {
                for (j, _) in &self.adjacency[m] {
                    if !visited[*j] {
                        visited[*j] = true;
                        component.push(*j);
                        queue.push_back(*j);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components
    }

    /// Returns the number of connected components.
    pub fn component_count(&self) -> usize {
        self.components().len()
    }

    /// Returns whether every device can reach every other device. The empty graph isn't
    /// connected.
    pub fn is_connected(&self) -> bool {
        self.vertex_count() > 0 && self.component_count() == 1
    }

    /// Returns whether the graph has no cycles.
    ///
    /// The graph has no loops or parallel edges, so it's a forest exactly when each component
    /// has one edge fewer than it has vertices.
    pub fn is_acyclic(&self) -> bool {
        self.edge_count() + self.component_count() == self.vertex_count()
    }

    /// Returns whether the graph is a tree: connected and acyclic.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// use netscope::{device::DeviceKind, edge::Link, graph::Graph};
    ///
    /// let devices: BTreeMap<String, DeviceKind> = ["a", "b", "c"]
    ///     .into_iter()
    ///     .map(|id| (id.to_owned(), DeviceKind::Switch))
    ///     .collect();
    ///
    /// let path = vec![Link::new("a", "b", 1), Link::new("b", "c", 1)];
    /// assert!(Graph::from_registry(&devices, &path).unwrap().is_tree());
    ///
    /// let triangle = vec![
    ///     Link::new("a", "b", 1),
    ///     Link::new("b", "c", 1),
    ///     Link::new("c", "a", 1),
    /// ];
    /// assert!(!Graph::from_registry(&devices, &triangle).unwrap().is_tree());
    /// ```
    pub fn is_tree(&self) -> bool {
        self.is_connected() && self.edge_count() + 1 == self.vertex_count()
    }

    /// Constructs the adjacency matrix for this graph, rows and columns follow the canonical
    /// order.
    pub fn adjacency_matrix(&self) -> DMatrix<f64> {
        let n = self.vertex_count();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        for (i, neighbours) in self.adjacency.iter().enumerate() {
            for (j, _) in neighbours {
                matrix[(i, *j)] = 1.0;
            }
        }

        matrix
    }

    /// Constructs the degree matrix for this graph.
    pub fn degree_matrix(&self) -> DMatrix<f64> {
        let adjacency_matrix = self.adjacency_matrix();
        let n = adjacency_matrix.nrows();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        for (i, row) in adjacency_matrix.row_iter().enumerate() {
            // The diagonal is the sum of edges in that row.
            matrix[(i, i)] = row.sum()
        }

        matrix
    }

    /// Constructs the weight matrix for this graph: the link weight between adjacent devices,
    /// `0` on the diagonal and infinity everywhere else.
    pub fn weight_matrix(&self) -> DMatrix<f64> {
        let n = self.vertex_count();
        let mut matrix = DMatrix::<f64>::from_element(n, n, f64::INFINITY);
        matrix.fill_diagonal(0.0);

        for (i, neighbours) in self.adjacency.iter().enumerate() {
            for (j, weight) in neighbours {
                matrix[(i, *j)] = f64::from(*weight);
            }
        }

        matrix
    }

    /// Computes the all-pairs shortest path distances (Floyd-Warshall). Unreachable pairs are
    /// infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// use netscope::{device::DeviceKind, edge::Link, graph::Graph};
    ///
    /// let devices: BTreeMap<String, DeviceKind> = ["a", "b", "c"]
    ///     .into_iter()
    ///     .map(|id| (id.to_owned(), DeviceKind::Router))
    ///     .collect();
    /// let links = vec![Link::new("a", "b", 2), Link::new("b", "c", 3)];
    /// let distances = Graph::from_registry(&devices, &links)
    ///     .unwrap()
    ///     .distance_matrix();
    ///
    /// assert_eq!(distances[(0, 2)], 5.0);
    /// ```
    pub fn distance_matrix(&self) -> DMatrix<f64> {
        let mut matrix = self.weight_matrix();
        let n = matrix.nrows();

        for k in 0..n {
            for i in 0..n {
                let ik = matrix[(i, k)];
                if ik.is_infinite() {
                    continue;
                }

                for j in 0..n {
                    let candidate = ik + matrix[(k, j)];
                    if candidate < matrix[(i, j)] {
                        matrix[(i, j)] = candidate;
                    }
                }
            }
        }

        matrix
    }

    //
    // Crate-internal
    //

    /// Returns the index of a device.
    pub(crate) fn index_of(&self, id: &str) -> Option<GraphIndex> {
        self.index.get(id).copied()
    }

    /// Returns the id of the device at `index`. Indices only ever come from this graph.
    pub(crate) fn vertex(&self, index: GraphIndex) -> &str {
        &self.ids[index]
    }

    /// Returns the device ids in canonical order.
    pub(crate) fn vertices(&self) -> Vec<&str> {
        self.ids.iter().map(String::as_str).collect()
    }

    /// Returns the adjacency lists, indexed by `GraphIndex`.
    pub(crate) fn adjacency(&self) -> &[Vec<(GraphIndex, u32)>] {
        &self.adjacency
    }
}

//
// Helpers
//

pub(crate) fn validate_link(devices: &BTreeMap<String, DeviceKind>, link: &Link) -> Result<()> {
    if link.u == link.v {
        return Err(Error::invalid_link(
            &link.u,
            &link.v,
            "self-links are not allowed",
        ));
    }

    if !devices.contains_key(&link.u) || !devices.contains_key(&link.v) {
        return Err(Error::invalid_link(
            &link.u,
            &link.v,
            "both endpoints must be registered devices",
        ));
    }

    if link.weight == 0 {
        return Err(Error::invalid_link(
            &link.u,
            &link.v,
            "the weight must be positive",
        ));
    }

    Ok(())
}
