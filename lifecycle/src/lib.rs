//! # Lifecycle
//!
//! The shared lifecycle vocabulary of administrative services.
//!
//! ## Philosophy
//!
//! - **Frozen contract**: State and kind names and ordinals are defined by
//!   the platform on the other side of the wire. They are not ours to
//!   reorder, renumber or respell.
//! - **Fail fast on drift**: The expected wire table is kept next to the
//!   enums and checked both at compile time and by [`verify_alignment`].
//! - **No policy**: This crate does not decide which transitions are valid.
//!   That is the business of the concrete service or an outer orchestrator.
//!
//! ## Core Concepts
//!
//! - [`ServiceState`]: The 17 lifecycle states, ordinals 0 to 16
//! - [`ServiceKind`]: The 4 service kinds, ordinals 0 to 3
//! - [`WIRE_STATES`] / [`WIRE_KINDS`]: The external `(ordinal, name)` tables

pub mod alignment;
pub mod kind;
pub mod state;

pub use alignment::{verify_alignment, WIRE_KINDS, WIRE_STATES};
pub use kind::ServiceKind;
pub use state::ServiceState;

use thiserror::Error;

/// Errors related to the lifecycle vocabulary
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Unknown service state: '{0}'")]
    UnknownState(String),

    #[error("Unknown service kind: '{0}'")]
    UnknownKind(String),

    #[error("No service state with ordinal {0}")]
    InvalidStateOrdinal(u8),

    #[error("No service kind with ordinal {0}")]
    InvalidKindOrdinal(u8),

    /// The local enumeration no longer matches the external platform
    #[error("{vocabulary} drifted from the wire contract at ordinal {ordinal}: expected '{expected}', found '{found}'")]
    AlignmentDrift {
        vocabulary: &'static str,
        ordinal: u8,
        expected: &'static str,
        found: String,
    },
}
