//! Loading topologies from TOML files.
//!
//! ```toml
//! [[devices]]
//! id = "R1"
//! kind = "Router"
//!
//! [[devices]]
//! id = "S1"
//! kind = "Switch"
//!
//! [[links]]
//! u = "R1"
//! v = "S1"
//! weight = 10
//!
//! # Optional, the route to include in reports.
//! [route]
//! source = "R1"
//! target = "S1"
//! ```

use std::{fs, path::Path, str::FromStr};

use serde::Deserialize;
use tracing::debug;

use crate::{
    device::DeviceKind,
    edge::Link,
    error::{Error, Result},
    session::Session,
};

/// A device entry of a topology file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceEntry {
    pub id: String,
    pub kind: DeviceKind,
}

/// The pair of devices to route between.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSelection {
    pub source: String,
    pub target: String,
}

/// The contents of a topology file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopologyFile {
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
    #[serde(default)]
    pub links: Vec<Link>,
    pub route: Option<RouteSelection>,
}

impl TopologyFile {
    /// Reads and parses a topology file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|err| Error::Config {
            path: path.to_owned(),
            message: "couldn't read the file".to_owned(),
            source: Some(Box::new(err)),
        })?;

        let file: Self = toml::from_str(&contents).map_err(|err| Error::Config {
            path: path.to_owned(),
            message: err.message().to_owned(),
            source: Some(Box::new(err)),
        })?;

        debug!(
            path = %path.display(),
            devices = file.devices.len(),
            links = file.links.len(),
            "loaded topology file"
        );

        Ok(file)
    }

    /// Registers the devices and links in a new session, in file order.
    ///
    /// # Examples
    ///
    /// ```
    /// use netscope::config::TopologyFile;
    ///
    /// let file: TopologyFile = r#"
    ///     devices = [
    ///         { id = "PC1", kind = "PC" },
    ///         { id = "S1", kind = "Switch" },
    ///     ]
    ///     links = [{ u = "PC1", v = "S1", weight = 1 }]
    /// "#
    /// .parse()
    /// .unwrap();
    ///
    /// let session = file.to_session().unwrap();
    /// assert_eq!(session.devices().len(), 2);
    /// assert_eq!(session.links().len(), 1);
    /// ```
    pub fn to_session(&self) -> Result<Session> {
        let mut session = Session::new();

        for device in &self.devices {
            session.add_device(&device.id, device.kind)?;
        }

        for link in &self.links {
            session.add_link(&link.u, &link.v, link.weight)?;
        }

        Ok(session)
    }

    /// Returns the route selection as a pair of ids.
    pub fn route(&self) -> Option<(&str, &str)> {
        self.route
            .as_ref()
            .map(|route| (route.source.as_str(), route.target.as_str()))
    }
}

impl FromStr for TopologyFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|err| Error::Config {
            path: "<inline>".into(),
            message: err.message().to_owned(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const OFFICE: &str = r#"
        [[devices]]
        id = "R1"
        kind = "Router"

        [[devices]]
        id = "S1"
        kind = "Switch"

        [[devices]]
        id = "PC1"
        kind = "PC"

        [[links]]
        u = "R1"
        v = "S1"
        weight = 10

        [[links]]
        u = "S1"
        v = "PC1"
        weight = 1

        [route]
        source = "R1"
        target = "PC1"
    "#;

    #[test]
    fn parse() {
        let file: TopologyFile = OFFICE.parse().unwrap();

        assert_eq!(file.devices.len(), 3);
        assert_eq!(file.devices[2].kind, DeviceKind::Pc);
        assert_eq!(file.links[0], Link::new("R1", "S1", 10));
        assert_eq!(file.route(), Some(("R1", "PC1")));
    }

    #[test]
    fn to_session() {
        let file: TopologyFile = OFFICE.parse().unwrap();
        let session = file.to_session().unwrap();
        let report = session.analyze(file.route()).unwrap();

        assert_eq!(report.route, "R1 ➔ S1 ➔ PC1");
        assert_eq!(report.route_cost, "11");
    }

    #[test]
    fn empty_file() {
        let file: TopologyFile = "".parse().unwrap();

        assert_eq!(file, TopologyFile::default());
        assert!(file.to_session().unwrap().devices().is_empty());
    }

    #[test]
    fn duplicate_devices() {
        let file: TopologyFile = r#"
            devices = [{ id = "a", kind = "PC" }, { id = "a", kind = "Router" }]
        "#
        .parse()
        .unwrap();

        assert!(matches!(
            file.to_session(),
            Err(Error::DuplicateDevice(id)) if id == "a"
        ));
    }

    #[test]
    fn unknown_kind() {
        let result = r#"devices = [{ id = "a", kind = "Firewall" }]"#.parse::<TopologyFile>();

        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(OFFICE.as_bytes()).unwrap();

        let topology = TopologyFile::load(file.path()).unwrap();
        assert_eq!(topology.links.len(), 2);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        match TopologyFile::load(&path) {
            Err(Error::Config { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
