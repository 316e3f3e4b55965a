//! Service kinds

use crate::LifecycleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a service within a data processing pipeline
///
/// Discriminants are the wire ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ServiceKind {
    /// Produces data, e.g. from a connector
    SourceService = 0,
    /// Turns input data into output data
    TransformationService = 1,
    /// Consumes data
    SinkService = 2,
    /// Observes data without taking part in the flow
    ProbeService = 3,
}

impl ServiceKind {
    /// All kinds in ordinal order
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::SourceService,
        ServiceKind::TransformationService,
        ServiceKind::SinkService,
        ServiceKind::ProbeService,
    ];

    /// Returns the wire ordinal
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Looks up a kind by wire ordinal
    pub fn from_ordinal(ordinal: u8) -> Result<Self, LifecycleError> {
        Self::ALL
            .get(usize::from(ordinal))
            .copied()
            .ok_or(LifecycleError::InvalidKindOrdinal(ordinal))
    }

    /// Returns the wire name
    pub const fn name(self) -> &'static str {
        match self {
            ServiceKind::SourceService => "SOURCE_SERVICE",
            ServiceKind::TransformationService => "TRANSFORMATION_SERVICE",
            ServiceKind::SinkService => "SINK_SERVICE",
            ServiceKind::ProbeService => "PROBE_SERVICE",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServiceKind {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| LifecycleError::UnknownKind(s.to_string()))
    }
}

impl TryFrom<u8> for ServiceKind {
    type Error = LifecycleError;

    fn try_from(ordinal: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(ordinal)
    }
}
