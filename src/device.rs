//! A module for working with device kinds.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The role a device plays in the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeviceKind {
    #[serde(rename = "PC", alias = "pc", alias = "Pc")]
    Pc,
    #[serde(alias = "switch", alias = "SWITCH")]
    Switch,
    #[serde(alias = "router", alias = "ROUTER")]
    Router,
}

impl DeviceKind {
    /// Returns whether the device forwards traffic on behalf of others, i.e. it's a switch or a
    /// router.
    ///
    /// # Examples
    ///
    /// ```
    /// use netscope::device::DeviceKind;
    ///
    /// assert!(DeviceKind::Router.is_infrastructure());
    /// assert!(!DeviceKind::Pc.is_infrastructure());
    /// ```
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Switch | Self::Router)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Switch => "Switch",
            Self::Router => "Router",
        }
    }
}

//
// Trait implementations
//

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = Error;

    /// Parses a device kind, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use netscope::device::DeviceKind;
    ///
    /// assert_eq!("switch".parse::<DeviceKind>().unwrap(), DeviceKind::Switch);
    /// assert!("hub".parse::<DeviceKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pc" => Ok(Self::Pc),
            "switch" => Ok(Self::Switch),
            "router" => Ok(Self::Router),
            _ => Err(Error::UnknownDeviceKind(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str() {
        assert_eq!("PC".parse::<DeviceKind>().unwrap(), DeviceKind::Pc);
        assert_eq!(" Router ".parse::<DeviceKind>().unwrap(), DeviceKind::Router);
        assert!(matches!(
            "firewall".parse::<DeviceKind>(),
            Err(Error::UnknownDeviceKind(kind)) if kind == "firewall"
        ));
    }

    #[test]
    fn display() {
        assert_eq!(DeviceKind::Pc.to_string(), "PC");
        assert_eq!(DeviceKind::Switch.to_string(), "Switch");
    }

    #[test]
    fn serde() {
        let json = serde_json::to_string(&DeviceKind::Pc).unwrap();
        assert_eq!(json, "\"PC\"");

        let kind: DeviceKind = serde_json::from_str("\"router\"").unwrap();
        assert_eq!(kind, DeviceKind::Router);
    }
}
