//! Assembling the analyses into a single report.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    device::DeviceKind,
    graph::Graph,
    route::{Route, SpanningForest},
    topology::{Classification, Topology},
    tour::Tour,
};

/// Fixed commentary on why the analysed network is a good design.
pub const WHY_BEST: &str = "Ensures optimal routing via OSPF, minimized infrastructure cost \
                            using MST, and structurally matches detected topology.";

/// Fixed commentary comparing the analysed network with the other topologies.
pub const COMPARISON: &str = "Lower cost than Full Mesh, better scalability than Bus, and more \
                              reliable than Ring topology.";

/// Marker for an analysis that wasn't requested.
pub const NOT_COMPUTED: &str = "Not computed";

/// Marker for an analysis that doesn't apply to the graph.
pub const NOT_APPLICABLE: &str = "N/A";

const ROUTE_SEPARATOR: &str = " ➔ ";

/// The degree of a device, as listed in the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DegreeRow {
    #[serde(rename = "Device")]
    pub device: String,
    #[serde(rename = "Type")]
    pub kind: DeviceKind,
    #[serde(rename = "Degree")]
    pub degree: usize,
    #[serde(rename = "In-Degree")]
    pub in_degree: usize,
    #[serde(rename = "Out-Degree")]
    pub out_degree: usize,
}

/// Lists the degree of every device, in canonical order.
pub fn degree_table(graph: &Graph) -> Vec<DegreeRow> {
    graph
        .devices()
        .iter()
        .map(|(id, kind)| DegreeRow {
            device: id.clone(),
            kind: *kind,
            degree: graph.degree(id).unwrap_or_default(),
            in_degree: graph.in_degree(id).unwrap_or_default(),
            out_degree: graph.out_degree(id).unwrap_or_default(),
        })
        .collect()
}

/// The complete analysis of a topology, every field ready for display.
///
/// Analyses that weren't requested or don't apply are rendered as [`NOT_COMPUTED`] or
/// [`NOT_APPLICABLE`], never left empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    #[serde(skip)]
    pub topology: Topology,
    #[serde(rename = "Detected Topology")]
    pub detected_topology: String,
    #[serde(rename = "Topology Reason")]
    pub topology_reason: String,
    #[serde(rename = "Route")]
    pub route: String,
    #[serde(rename = "Route Cost")]
    pub route_cost: String,
    #[serde(rename = "MST Cost")]
    pub mst_cost: String,
    #[serde(rename = "Tour")]
    pub tour: String,
    #[serde(rename = "Tour Cost")]
    pub tour_cost: String,
    #[serde(rename = "Why This Network Is Best")]
    pub why_best: String,
    #[serde(rename = "Comparison with Other Networks")]
    pub comparison: String,
    #[serde(rename = "Degrees")]
    pub degrees: Vec<DegreeRow>,
}

impl AnalysisReport {
    /// Returns the labelled fields in display order, the degree table excluded.
    pub fn rows(&self) -> [(&'static str, &str); 9] {
        [
            ("Detected Topology", self.detected_topology.as_str()),
            ("Topology Reason", self.topology_reason.as_str()),
            ("Route", self.route.as_str()),
            ("Route Cost", self.route_cost.as_str()),
            ("MST Cost", self.mst_cost.as_str()),
            ("Tour", self.tour.as_str()),
            ("Tour Cost", self.tour_cost.as_str()),
            ("Why This Network Is Best", self.why_best.as_str()),
            ("Comparison with Other Networks", self.comparison.as_str()),
        ]
    }
}

/// Combines the analysis results into a report.
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
///     report::{assemble_report, degree_table, NOT_APPLICABLE, NOT_COMPUTED},
///     route::minimum_spanning_tree,
///     topology::classify,
/// };
///
/// let devices = BTreeMap::from([
///     ("PC1".to_owned(), DeviceKind::Pc),
///     ("S1".to_owned(), DeviceKind::Switch),
/// ]);
/// let graph = Graph::from_registry(&devices, &[Link::new("PC1", "S1", 4)]).unwrap();
///
/// let mst = minimum_spanning_tree(&graph);
/// let report = assemble_report(
///     &classify(&graph),
///     None,
///     Some(&mst),
///     None,
///     degree_table(&graph),
/// );
///
/// assert_eq!(report.route, NOT_COMPUTED);
/// assert_eq!(report.mst_cost, "4");
/// assert_eq!(report.tour, NOT_APPLICABLE);
/// ```
pub fn assemble_report(
    classification: &Classification,
    route: Option<&Route>,
    forest: Option<&SpanningForest>,
    tour: Option<&Tour>,
    degrees: Vec<DegreeRow>,
) -> AnalysisReport {
    let (route, route_cost) = match route {
        Some(route) => (route.path.join(ROUTE_SEPARATOR), route.cost.to_string()),
        None => (NOT_COMPUTED.to_owned(), NOT_APPLICABLE.to_owned()),
    };

    let mst_cost = match forest {
        Some(forest) if forest.links.is_empty() => NOT_APPLICABLE.to_owned(),
        Some(forest) if forest.is_tree() => forest.total_cost.to_string(),
        Some(forest) => format!(
            "{} (spanning forest, {} components)",
            forest.total_cost, forest.components
        ),
        None => NOT_APPLICABLE.to_owned(),
    };

    let (tour, tour_cost) = match tour {
        Some(tour) => (tour.cycle.join(ROUTE_SEPARATOR), tour.cost.to_string()),
        None => (NOT_APPLICABLE.to_owned(), NOT_APPLICABLE.to_owned()),
    };

    AnalysisReport {
        topology: classification.topology,
        detected_topology: classification.topology.label().to_owned(),
        topology_reason: classification.reason.clone(),
        route,
        route_cost,
        mst_cost,
        tour,
        tour_cost,
        why_best: WHY_BEST.to_owned(),
        comparison: COMPARISON.to_owned(),
        degrees,
    }
}

//
// Trait implementations
//

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let width = rows
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or_default();

        for (label, value) in rows {
            writeln!(f, "{label:<width$} : {value}")?;
        }

        if self.degrees.is_empty() {
            return Ok(());
        }

        let device_width = self
            .degrees
            .iter()
            .map(|row| row.device.chars().count())
            .chain(std::iter::once("Device".len()))
            .max()
            .unwrap_or_default();

        writeln!(f)?;
        writeln!(
            f,
            "{:<device_width$}  {:<6}  {:>6}  {:>3}  {:>3}",
            "Device", "Type", "Degree", "In", "Out"
        )?;

        let lines = self.degrees.iter().map(|row| {
            format!(
                "{:<device_width$}  {:<6}  {:>6}  {:>3}  {:>3}",
                row.device,
                row.kind.as_str(),
                row.degree,
                row.in_degree,
                row.out_degree
            )
        });

        write!(f, "{}", lines.format("\n"))?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{route::minimum_spanning_tree, topology::classify, tour::approximate_tour};

    #[test]
    fn empty_report() {
        let graph = Graph::new();
        let report = assemble_report(
            &classify(&graph),
            None,
            Some(&minimum_spanning_tree(&graph)),
            None,
            degree_table(&graph),
        );

        assert_eq!(report.topology, Topology::Hybrid);
        assert_eq!(report.route, NOT_COMPUTED);
        assert_eq!(report.route_cost, NOT_APPLICABLE);
        assert_eq!(report.mst_cost, NOT_APPLICABLE);
        assert_eq!(report.tour, NOT_APPLICABLE);
        assert_eq!(report.tour_cost, NOT_APPLICABLE);
        assert!(report.degrees.is_empty());
    }

    #[test]
    fn full_report() {
        let graph = graph![("A", "B", 5), ("B", "C", 5), ("A", "C", 5)];
        let route = Route {
            path: vec!["A".to_owned(), "C".to_owned()],
            cost: 5,
        };
        let mst = minimum_spanning_tree(&graph);
        let tour = approximate_tour(&graph).unwrap();

        let report = assemble_report(
            &classify(&graph),
            Some(&route),
            Some(&mst),
            Some(&tour),
            degree_table(&graph),
        );

        assert_eq!(report.detected_topology, "Full Mesh Topology");
        assert_eq!(report.route, "A ➔ C");
        assert_eq!(report.route_cost, "5");
        assert_eq!(report.mst_cost, "10");
        assert_eq!(report.tour, "A ➔ B ➔ C ➔ A");
        assert_eq!(report.tour_cost, "15");
        assert_eq!(report.why_best, WHY_BEST);
        assert_eq!(report.comparison, COMPARISON);
    }

    #[test]
    fn forest_cost() {
        let graph = graph![("a", "b", 2), ("c", "d", 3)];
        let report = assemble_report(
            &classify(&graph),
            None,
            Some(&minimum_spanning_tree(&graph)),
            None,
            vec![],
        );

        assert_eq!(report.mst_cost, "5 (spanning forest, 2 components)");
    }

    #[test]
    fn fixed_commentary() {
        assert_eq!(
            WHY_BEST,
            "Ensures optimal routing via OSPF, minimized infrastructure cost using MST, and \
             structurally matches detected topology."
        );
        assert_eq!(
            COMPARISON,
            "Lower cost than Full Mesh, better scalability than Bus, and more reliable than \
             Ring topology."
        );
    }

    #[test]
    fn degree_rows() {
        let graph = graph![("a", "b", 1), ("a", "c", 1)];
        let table = degree_table(&graph);

        assert_eq!(
            table[0],
            DegreeRow {
                device: "a".to_owned(),
                kind: DeviceKind::Switch,
                degree: 2,
                in_degree: 2,
                out_degree: 2,
            }
        );
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn serialize() {
        let graph = graph![("a", "b", 1)];
        let report = assemble_report(&classify(&graph), None, None, None, degree_table(&graph));

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["Detected Topology"], "Full Mesh Topology");
        assert_eq!(value["Route"], NOT_COMPUTED);
        assert_eq!(value["MST Cost"], NOT_APPLICABLE);
        assert_eq!(value["Degrees"][1]["Device"], "b");
        assert_eq!(value["Degrees"][1]["Type"], "Switch");
        assert!(value.get("topology").is_none());
    }

    #[test]
    fn display() {
        let graph = graph![("a", "b", 1)];
        let report = assemble_report(&classify(&graph), None, None, None, degree_table(&graph));

        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Detected Topology              : Full Mesh Topology");
        assert_eq!(lines[2], "Route                          : Not computed");
        assert_eq!(lines[10], "Device  Type    Degree   In  Out");
        assert_eq!(lines[11], "a       Switch       1    1    1");
        assert_eq!(lines.len(), 13);
    }
}
