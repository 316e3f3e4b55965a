//! Lifecycle vocabulary contract tests
//!
//! The remote platform understands states and kinds by name and by
//! ordinal. Both are frozen, including the historical `UNKOWN` spelling.

// ===== Golden Tables =====

pub const GOLDEN_STATES: [(u8, &str); 17] = [
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

pub const GOLDEN_KINDS: [(u8, &str); 4] = [
    (0, "SOURCE_SERVICE"),
    (1, "TRANSFORMATION_SERVICE"),
    (2, "SINK_SERVICE"),
    (3, "PROBE_SERVICE"),
];
