//! # Service Mapper
//!
//! Exposes a service's metadata and lifecycle operations as remotely
//! addressable properties and operations of a shared submodel.
//!
//! ## Philosophy
//!
//! - **Stateless binding**: The mapper is a dispatch table rebuilt per
//!   service. All state lives in the service.
//! - **Validate at the boundary**: Remote parameters arrive untyped. Each
//!   operation checks its parameter vector against a schema before the
//!   typed contract is called.
//! - **Uniform outcome**: Every operation answers with an
//!   [`OperationResult`]. Rejected requests become failure envelopes;
//!   only contract defects escape as [`MapperError`].
//!
//! ## Flow
//!
//! ```text
//! registrar ──bind──▶ OperationMapper ──define_property/define_operation──▶ registrar
//! remote call ──▶ registrar ──▶ handler ──validate──▶ Service ──▶ OperationResult
//! ```

pub mod config;
pub mod decoder;
pub mod mapper;
pub mod names;
pub mod naming;
pub mod params;
pub mod registrar;
pub mod result;

pub use config::{ConfigError, MapperConfig};
pub use decoder::{DecodeError, JsonDecoder, StructuredDecoder};
pub use mapper::{map_service, MapperError, OperationMapper, ServiceMapping};
pub use names::*;
pub use naming::{IdentityQualifier, NameQualifier, NamingStrategy, ServiceIdPrefixQualifier};
pub use params::{ParamError, ParamKind, ParamSchema};
pub use registrar::{
    OperationHandler, PropertyGetter, PropertySetter, Registrar, RegistrarError, Unregister,
};
pub use result::{compose_result, OperationResult};
