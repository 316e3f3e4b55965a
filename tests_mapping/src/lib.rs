//! Mapping Test Utilities
//!
//! Shared helpers for end-to-end tests of the service mapping.
//!
//! ## Test Philosophy
//!
//! - **Remote view only**: Tests read properties and invoke operations by
//!   name, as the platform does
//! - **Deterministic failures**: Runtime faults come from a `FaultPlan`
//! - **Nothing half done**: After a failed operation the observable state
//!   equals the state before it

use core_types::ServiceId;
use lifecycle::{ServiceKind, ServiceState};
use service_contract::{
    Artifact, ManagedService, ParameterDescriptor, ParameterType, Service, ServiceInfo,
};
use service_mapper::{map_service, MapperConfig, ServiceMapping};
use sim_runtime::SimRuntime;
use std::sync::Arc;
use submodel_registry::SubmodelRegistry;

pub type SimService = ManagedService<SimRuntime>;

/// Installs a test-friendly subscriber once; `RUST_LOG` selects the level
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Location of a published artifact version of a service
pub fn artifact_location(id: &str, version: &str) -> String {
    format!("repo://{}/{}", id, version)
}

/// Descriptor accepted by the services built here
pub fn test_descriptor() -> ParameterDescriptor {
    ParameterDescriptor::new()
        .with_parameter("rate", ParameterType::Integer)
        .with_parameter("mode", ParameterType::String)
        .with_parameter("window", ParameterType::Structured)
}

/// Builds a transformation service that is running version 1.0 on `runtime`
pub fn build_running(id: &str, runtime: &SimRuntime) -> SimService {
    let location = artifact_location(id, "1.0");
    runtime.publish(location.clone());
    let artifact = Artifact::new(location);
    let service_id = ServiceId::new(id);
    runtime.boot(&service_id, artifact.clone());

    let info = ServiceInfo::new(
        service_id,
        "Transformer",
        "1.0".parse().expect("valid version"),
        ServiceKind::TransformationService,
    )
    .with_description("test transformer");
    let service = ManagedService::new(info, ServiceState::Available, runtime.clone())
        .expect("AVAILABLE is an initial state")
        .with_artifact(artifact)
        .with_descriptor(test_descriptor());
    service
        .set_state(ServiceState::Running)
        .expect("managed services accept any state");
    service
}

/// Same as [`build_running`], shared
pub fn running_service(id: &str, runtime: &SimRuntime) -> Arc<SimService> {
    Arc::new(build_running(id, runtime))
}

/// Binds one service into a fresh registry with the default configuration
pub fn bind(service: Arc<SimService>) -> (SubmodelRegistry, ServiceMapping) {
    let mut registry = SubmodelRegistry::default();
    let mapping = map_service(&mut registry, service, &MapperConfig::default())
        .expect("fresh registry accepts every name");
    (registry, mapping)
}
