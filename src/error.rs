//! Error types returned by the registry and the analyses.

use std::path::PathBuf;

use thiserror::Error;

/// A convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while building or analysing a topology.
///
/// None of these are fatal: the caller decides how to surface them.
#[derive(Debug, Error)]
pub enum Error {
    /// A link references a device that doesn't exist, loops back on itself or carries a zero
    /// weight.
    #[error("invalid link {u} - {v}: {reason}")]
    InvalidLink {
        u: String,
        v: String,
        reason: &'static str,
    },

    /// The target can't be reached from the source.
    #[error("no path from {from} to {to}")]
    NoPath { from: String, to: String },

    /// The graph doesn't satisfy the precondition of a tour: at least three devices, all
    /// mutually reachable.
    #[error(
        "a tour needs a connected graph with at least 3 devices, got {nodes} device(s) in \
         {components} component(s)"
    )]
    DisconnectedGraph { nodes: usize, components: usize },

    /// The analysis was requested on a graph without devices.
    #[error("the topology has no devices")]
    EmptyGraph,

    /// The device id isn't registered.
    #[error("unknown device {0:?}")]
    UnknownDevice(String),

    /// The device id is already registered.
    #[error("device {0:?} already exists")]
    DuplicateDevice(String),

    /// Device ids must contain at least one non-whitespace character.
    #[error("device ids can't be empty")]
    InvalidDeviceId,

    /// An unrecognised device kind.
    #[error("unknown device kind {0:?}, expected one of PC, Switch, Router")]
    UnknownDeviceKind(String),

    /// The topology file couldn't be read or parsed.
    #[error("failed to load topology from {}: {message}", .path.display())]
    Config {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    pub(crate) fn invalid_link(u: &str, v: &str, reason: &'static str) -> Self {
        Self::InvalidLink {
            u: u.to_owned(),
            v: v.to_owned(),
            reason,
        }
    }

    pub(crate) fn no_path(from: &str, to: &str) -> Self {
        Self::NoPath {
            from: from.to_owned(),
            to: to.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_link_message() {
        let err = Error::invalid_link("a", "a", "self-links are not allowed");

        assert_eq!(
            err.to_string(),
            "invalid link a - a: self-links are not allowed"
        );
    }

    #[test]
    fn disconnected_graph_message() {
        let err = Error::DisconnectedGraph {
            nodes: 4,
            components: 2,
        };

        assert_eq!(
            err.to_string(),
            "a tour needs a connected graph with at least 3 devices, got 4 device(s) in 2 component(s)"
        );
    }
}
