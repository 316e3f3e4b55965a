//! Registered names
//!
//! These names are shared with the platform on the other side of the
//! registry and must not change.

/// Name of the submodel services are mapped into
pub const NAME_SUBMODEL: &str = "service";

pub const NAME_PROP_ID: &str = "id";
pub const NAME_PROP_NAME: &str = "name";
pub const NAME_PROP_VERSION: &str = "version";
pub const NAME_PROP_DESCRIPTION: &str = "description";
pub const NAME_PROP_STATE: &str = "state";
pub const NAME_PROP_KIND: &str = "kind";
pub const NAME_PROP_DEPLOYABLE: &str = "deployable";

pub const NAME_OP_ACTIVATE: &str = "activate";
pub const NAME_OP_PASSIVATE: &str = "passivate";
pub const NAME_OP_MIGRATE: &str = "migrate";
pub const NAME_OP_UPDATE: &str = "update";
pub const NAME_OP_SWITCH: &str = "switchTo";
pub const NAME_OP_RECONF: &str = "reconfigure";
pub const NAME_OP_SET_STATE: &str = "setState";

/// All property names, in registration order
pub const PROPERTY_NAMES: [&str; 7] = [
    NAME_PROP_ID,
    NAME_PROP_NAME,
    NAME_PROP_VERSION,
    NAME_PROP_DESCRIPTION,
    NAME_PROP_STATE,
    NAME_PROP_KIND,
    NAME_PROP_DEPLOYABLE,
];

/// All operation names, in registration order
pub const OPERATION_NAMES: [&str; 7] = [
    NAME_OP_ACTIVATE,
    NAME_OP_PASSIVATE,
    NAME_OP_SET_STATE,
    NAME_OP_MIGRATE,
    NAME_OP_UPDATE,
    NAME_OP_SWITCH,
    NAME_OP_RECONF,
];
