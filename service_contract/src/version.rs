//! Service versions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid service version '{0}'")]
pub struct VersionError(pub String);

/// Dotted numeric version of a service, e.g. `1.2.3`
///
/// At least one segment is required. Ordering compares segment by segment,
/// missing trailing segments count as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceVersion {
    segments: Vec<u32>,
}

impl ServiceVersion {
    /// Creates a version from its segments
    pub fn new(segments: impl Into<Vec<u32>>) -> Result<Self, VersionError> {
        let segments = segments.into();
        if segments.is_empty() {
            return Err(VersionError(String::new()));
        }
        Ok(Self { segments })
    }

    /// Returns the version segments
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    fn segment(&self, index: usize) -> u32 {
        self.segments.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for ServiceVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for ServiceVersion {}

impl PartialOrd for ServiceVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

impl fmt::Display for ServiceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for ServiceVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments = s
            .trim()
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionError(s.to_string()))?;
        Self::new(segments).map_err(|_| VersionError(s.to_string()))
    }
}

impl TryFrom<String> for ServiceVersion {
    type Error = VersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ServiceVersion> for String {
    fn from(version: ServiceVersion) -> Self {
        version.to_string()
    }
}
