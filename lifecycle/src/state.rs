//! Service lifecycle states

use crate::LifecycleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a service
///
/// Discriminants are the wire ordinals. The last value is spelled `UNKOWN`
/// on the wire and must stay that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ServiceState {
    /// Artifact is known and can be deployed
    Available = 0,
    /// Being deployed to its resource
    Deploying = 1,
    /// Deployed and created, not yet started
    Created = 2,
    /// Starting up
    Starting = 3,
    /// Running normally
    Running = 4,
    /// Failed, needs recovery or removal
    Failed = 5,
    /// Shutting down
    Stopping = 6,
    /// Stopped
    Stopped = 7,
    /// Going to sleep
    Passivating = 8,
    /// Sleeping, keeps its resources but does not process data
    Passivated = 9,
    /// Moving to another resource
    Migrating = 10,
    /// Waking up from passivation
    Activating = 11,
    /// Recovering from a failure
    Recovering = 12,
    /// Recovered from a failure
    Recovered = 13,
    /// Applying a configuration change
    Reconfiguring = 14,
    /// Being removed from its resource
    Undeploying = 15,
    /// State cannot be determined
    #[serde(rename = "UNKOWN")]
    Unknown = 16,
}

impl ServiceState {
    /// All states in ordinal order
    pub const ALL: [ServiceState; 17] = [
        ServiceState::Available,
        ServiceState::Deploying,
        ServiceState::Created,
        ServiceState::Starting,
        ServiceState::Running,
        ServiceState::Failed,
        ServiceState::Stopping,
        ServiceState::Stopped,
        ServiceState::Passivating,
        ServiceState::Passivated,
        ServiceState::Migrating,
        ServiceState::Activating,
        ServiceState::Recovering,
        ServiceState::Recovered,
        ServiceState::Reconfiguring,
        ServiceState::Undeploying,
        ServiceState::Unknown,
    ];

    /// Returns the wire ordinal
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Looks up a state by wire ordinal
    pub fn from_ordinal(ordinal: u8) -> Result<Self, LifecycleError> {
        Self::ALL
            .get(usize::from(ordinal))
            .copied()
            .ok_or(LifecycleError::InvalidStateOrdinal(ordinal))
    }

    /// Returns the wire name
    pub const fn name(self) -> &'static str {
        match self {
            ServiceState::Available => "AVAILABLE",
            ServiceState::Deploying => "DEPLOYING",
            ServiceState::Created => "CREATED",
            ServiceState::Starting => "STARTING",
            ServiceState::Running => "RUNNING",
            ServiceState::Failed => "FAILED",
            ServiceState::Stopping => "STOPPING",
            ServiceState::Stopped => "STOPPED",
            ServiceState::Passivating => "PASSIVATING",
            ServiceState::Passivated => "PASSIVATED",
            ServiceState::Migrating => "MIGRATING",
            ServiceState::Activating => "ACTIVATING",
            ServiceState::Recovering => "RECOVERING",
            ServiceState::Recovered => "RECOVERED",
            ServiceState::Reconfiguring => "RECONFIGURING",
            ServiceState::Undeploying => "UNDEPLOYING",
            ServiceState::Unknown => "UNKOWN",
        }
    }

    /// States a service may be created in by the deployment mechanism
    pub fn is_initial(self) -> bool {
        matches!(
            self,
            ServiceState::Created | ServiceState::Deploying | ServiceState::Available
        )
    }

    /// States after which only external removal follows
    pub fn is_terminal(self) -> bool {
        matches!(self, ServiceState::Stopped | ServiceState::Undeploying)
    }

    /// States that are passed through by adaptation operations
    pub fn is_transient(self) -> bool {
        !self.is_initial() && !self.is_terminal()
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServiceState {
    type Err = LifecycleError;

    /// Parses an exact wire name; lookup is case-sensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.name() == s)
            .ok_or_else(|| LifecycleError::UnknownState(s.to_string()))
    }
}

impl TryFrom<u8> for ServiceState {
    type Error = LifecycleError;

    fn try_from(ordinal: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_ordinals_are_positions() {
        for (index, state) in ServiceState::ALL.iter().enumerate() {
            assert_eq!(usize::from(state.ordinal()), index);
        }
    }

    #[test]
    fn test_state_roundtrip_by_name_and_ordinal() {
        for state in ServiceState::ALL {
            assert_eq!(state.name().parse::<ServiceState>(), Ok(state));
            assert_eq!(ServiceState::from_ordinal(state.ordinal()), Ok(state));
        }
    }

    #[test]
    fn test_unknown_keeps_wire_spelling() {
        assert_eq!(ServiceState::Unknown.name(), "UNKOWN");
        assert_eq!(ServiceState::Unknown.ordinal(), 16);
        assert!("UNKNOWN".parse::<ServiceState>().is_err());
        assert_eq!(
            serde_json::to_string(&ServiceState::Unknown).unwrap(),
            "\"UNKOWN\""
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(
            "running".parse::<ServiceState>(),
            Err(LifecycleError::UnknownState("running".to_string()))
        );
        assert_eq!(
            "NOT_A_STATE".parse::<ServiceState>(),
            Err(LifecycleError::UnknownState("NOT_A_STATE".to_string()))
        );
    }

    #[test]
    fn test_invalid_ordinal() {
        assert_eq!(
            ServiceState::from_ordinal(17),
            Err(LifecycleError::InvalidStateOrdinal(17))
        );
        assert!(ServiceState::try_from(255u8).is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        for state in ServiceState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.name()));
            let decoded: ServiceState = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, state);
        }
    }

    #[test]
    fn test_state_classification() {
        assert!(ServiceState::Created.is_initial());
        assert!(ServiceState::Deploying.is_initial());
        assert!(ServiceState::Available.is_initial());
        assert!(ServiceState::Stopped.is_terminal());
        assert!(ServiceState::Undeploying.is_terminal());
        assert!(ServiceState::Running.is_transient());
        assert!(ServiceState::Passivated.is_transient());
        assert!(!ServiceState::Stopped.is_transient());

        let classified = ServiceState::ALL
            .iter()
            .filter(|s| s.is_initial() || s.is_terminal() || s.is_transient())
            .count();
        assert_eq!(classified, ServiceState::ALL.len());
    }
}
