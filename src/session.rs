//! The device and link registry of a user session.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::{
    device::DeviceKind,
    edge::Link,
    error::{Error, Result},
    graph::{validate_link, Graph},
    report::{assemble_report, degree_table, AnalysisReport},
    route::{minimum_spanning_tree, shortest_path},
    topology::classify,
    tour::approximate_tour,
};

/// The devices and links entered during a session.
///
/// Graphs and reports are derived from the registry on demand and never stored.
///
/// # Examples
///
/// ```
/// use netscope::{device::DeviceKind, session::Session, topology::Topology};
///
/// let mut session = Session::new();
/// session.add_device("A", DeviceKind::Router).unwrap();
/// session.add_device("B", DeviceKind::Router).unwrap();
/// session.add_device("C", DeviceKind::Router).unwrap();
/// session.add_link("A", "B", 5).unwrap();
/// session.add_link("B", "C", 5).unwrap();
/// session.add_link("A", "C", 5).unwrap();
///
/// let report = session.analyze(Some(("A", "C"))).unwrap();
/// assert_eq!(report.topology, Topology::FullMesh);
/// assert_eq!(report.route, "A ➔ C");
/// assert_eq!(report.mst_cost, "10");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Session {
    devices: BTreeMap<String, DeviceKind>,
    links: Vec<Link>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registered devices, ordered by id.
    pub fn devices(&self) -> &BTreeMap<String, DeviceKind> {
        &self.devices
    }

    /// Returns the registered links, in the order they were added.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Registers a new device. Ids are trimmed and must be unique.
    pub fn add_device(&mut self, id: &str, kind: DeviceKind) -> Result<()> {
        let id = normalize_id(id)?;

        if self.devices.contains_key(&id) {
            return Err(Error::DuplicateDevice(id));
        }

        debug!(%id, %kind, "added device");
        self.devices.insert(id, kind);

        Ok(())
    }

    /// Changes the kind of a registered device and returns the previous kind.
    pub fn update_device(&mut self, id: &str, kind: DeviceKind) -> Result<DeviceKind> {
        let id = normalize_id(id)?;

        match self.devices.get_mut(&id) {
            Some(current) => {
                let previous = std::mem::replace(current, kind);
                debug!(%id, %previous, %kind, "updated device");

                Ok(previous)
            }
            None => Err(Error::UnknownDevice(id)),
        }
    }

    /// Registers a device, replacing the kind of an existing one. Returns the previous kind if
    /// there was one.
    pub fn upsert_device(&mut self, id: &str, kind: DeviceKind) -> Result<Option<DeviceKind>> {
        let id = normalize_id(id)?;
        let previous = self.devices.insert(id.clone(), kind);

        if let Some(previous) = previous {
            warn!(%id, %previous, %kind, "device kind overwritten");
        }

        Ok(previous)
    }

    /// Registers a link between two devices.
    ///
    /// Both devices must already be registered, they must differ and the weight must be
    /// positive. Links between the same pair of devices can be added more than once, the last
    /// one determines the weight used in the analyses.
    pub fn add_link(&mut self, u: &str, v: &str, weight: u32) -> Result<()> {
        let link = Link::new(u.trim(), v.trim(), weight);
        validate_link(&self.devices, &link)?;

        debug!(u = %link.u, v = %link.v, weight, "added link");
        self.links.push(link);

        Ok(())
    }

    /// Removes every device and link.
    pub fn reset(&mut self) {
        info!(
            devices = self.devices.len(),
            links = self.links.len(),
            "reset session"
        );

        self.devices.clear();
        self.links.clear();
    }

    /// Builds a graph snapshot of the current registry.
    pub fn build_graph(&self) -> Result<Graph> {
        Graph::from_registry(&self.devices, &self.links)
    }

    /// Runs every analysis over the current registry and assembles the report.
    ///
    /// The route is only computed when requested, failing to find it is an error. The tour is
    /// left out of the report when the graph doesn't meet its preconditions.
    pub fn analyze(&self, route: Option<(&str, &str)>) -> Result<AnalysisReport> {
        let graph = self.build_graph()?;

        let classification = classify(&graph);
        let route = route
            .map(|(source, target)| shortest_path(&graph, source, target))
            .transpose()?;
        let forest = (graph.vertex_count() > 0).then(|| minimum_spanning_tree(&graph));

        let tour = match approximate_tour(&graph) {
            Ok(tour) => Some(tour),
            Err(err @ (Error::EmptyGraph | Error::DisconnectedGraph { .. })) => {
                debug!(%err, "tour skipped");
                None
            }
            Err(err) => return Err(err),
        };

        info!(
            topology = %classification.topology,
            devices = graph.vertex_count(),
            links = graph.edge_count(),
            "analysed topology"
        );

        Ok(assemble_report(
            &classification,
            route.as_ref(),
            forest.as_ref(),
            tour.as_ref(),
            degree_table(&graph),
        ))
    }
}

//
// Helpers
//

fn normalize_id(id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::InvalidDeviceId);
    }

    Ok(id.to_owned())
}
