//! Wire contract tables and drift checks
//!
//! The tables below are the external platform's definition. They are
//! compared against the local enums at compile time (a mismatch fails the
//! build) and again by [`verify_alignment`], which an embedding process
//! calls at startup so that a stale build talking to a newer platform fails
//! fast.

use crate::{LifecycleError, ServiceKind, ServiceState};

/// External `(ordinal, name)` table for service states
pub const WIRE_STATES: [(u8, &str); 17] = [
    (0, "AVAILABLE"),
    (1, "DEPLOYING"),
    (2, "CREATED"),
    (3, "STARTING"),
    (4, "RUNNING"),
    (5, "FAILED"),
    (6, "STOPPING"),
    (7, "STOPPED"),
    (8, "PASSIVATING"),
    (9, "PASSIVATED"),
    (10, "MIGRATING"),
    (11, "ACTIVATING"),
    (12, "RECOVERING"),
    (13, "RECOVERED"),
    (14, "RECONFIGURING"),
    (15, "UNDEPLOYING"),
    (16, "UNKOWN"),
];

/// External `(ordinal, name)` table for service kinds
pub const WIRE_KINDS: [(u8, &str); 4] = [
    (0, "SOURCE_SERVICE"),
    (1, "TRANSFORMATION_SERVICE"),
    (2, "SINK_SERVICE"),
    (3, "PROBE_SERVICE"),
];

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = {
    let mut i = 0;
    while i < WIRE_STATES.len() {
        let (ordinal, name) = WIRE_STATES[i];
        assert!(ServiceState::ALL[i].ordinal() == ordinal);
        assert!(str_eq(ServiceState::ALL[i].name(), name));
        i += 1;
    }

    let mut i = 0;
    while i < WIRE_KINDS.len() {
        let (ordinal, name) = WIRE_KINDS[i];
        assert!(ServiceKind::ALL[i].ordinal() == ordinal);
        assert!(str_eq(ServiceKind::ALL[i].name(), name));
        i += 1;
    }
};

/// Checks that lookups by name and by ordinal agree with the wire tables
pub fn verify_alignment() -> Result<(), LifecycleError> {
    for (ordinal, name) in WIRE_STATES {
        let by_ordinal = ServiceState::from_ordinal(ordinal)?;
        if by_ordinal.name() != name {
            return Err(LifecycleError::AlignmentDrift {
                vocabulary: "ServiceState",
                ordinal,
                expected: name,
                found: by_ordinal.name().to_string(),
            });
        }
        let by_name: ServiceState = name.parse()?;
        if by_name.ordinal() != ordinal {
            return Err(LifecycleError::AlignmentDrift {
                vocabulary: "ServiceState",
                ordinal,
                expected: name,
                found: format!("ordinal {}", by_name.ordinal()),
            });
        }
    }

    for (ordinal, name) in WIRE_KINDS {
        let by_ordinal = ServiceKind::from_ordinal(ordinal)?;
        if by_ordinal.name() != name {
            return Err(LifecycleError::AlignmentDrift {
                vocabulary: "ServiceKind",
                ordinal,
                expected: name,
                found: by_ordinal.name().to_string(),
            });
        }
        let by_name: ServiceKind = name.parse()?;
        if by_name.ordinal() != ordinal {
            return Err(LifecycleError::AlignmentDrift {
                vocabulary: "ServiceKind",
                ordinal,
                expected: name,
                found: format!("ordinal {}", by_name.ordinal()),
            });
        }
    }

    Ok(())
}
