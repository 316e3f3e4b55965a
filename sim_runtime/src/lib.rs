//! # Simulated Service Runtime
//!
//! A deterministic, in-process implementation of [`ServiceRuntime`].
//!
//! ## Purpose
//!
//! - Runs under `cargo test` without processes, containers or network
//! - Deterministic: faults are planned, never random
//! - Inspectable: every effect is recorded as a [`RuntimeEvent`]
//!
//! A [`SimRuntime`] is a handle. Clones share the same simulated world, so a
//! test keeps one clone for inspection and hands another to the service.

pub mod fault_injection;

pub use fault_injection::{FaultPlan, RuntimeAction, RuntimeFault};

use core_types::{ResourceId, ServiceId};
use fault_injection::FaultInjector;
use service_contract::{Artifact, ConfigValues, RuntimeError, ServiceRuntime};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// An effect performed by the simulated runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    Fetched { location: String },
    Started { service: ServiceId, location: String },
    Stopped { service: ServiceId },
    Suspended { service: ServiceId },
    Resumed { service: ServiceId },
    Relocated { service: ServiceId, resource: ResourceId },
    HandedOver { from: ServiceId, to: ServiceId },
    TargetStarted { target: ServiceId },
    Configured { service: ServiceId },
}

#[derive(Debug, Default)]
struct SimState {
    /// Artifact locations that can be fetched
    published: BTreeSet<String>,
    /// Resources that can be migrated to
    resources: BTreeSet<ResourceId>,
    running: BTreeMap<ServiceId, Artifact>,
    suspended: BTreeSet<ServiceId>,
    placement: BTreeMap<ServiceId, ResourceId>,
    configurations: BTreeMap<ServiceId, ConfigValues>,
    events: Vec<RuntimeEvent>,
    injector: FaultInjector,
}

impl SimState {
    fn check(&mut self, action: RuntimeAction) -> Result<(), RuntimeError> {
        if self.injector.should_fail(action) {
            debug!(action = action.name(), "injected runtime fault");
            return Err(RuntimeError::Failed {
                action: action.name(),
                reason: "injected fault".to_string(),
            });
        }
        Ok(())
    }

    fn record(&mut self, event: RuntimeEvent) {
        self.events.push(event);
    }
}

/// Simulated runtime handle
#[derive(Debug, Clone, Default)]
pub struct SimRuntime {
    state: Arc<Mutex<SimState>>,
}

impl SimRuntime {
    /// Creates an empty simulated world
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a fault plan, replacing any pending faults
    pub fn with_fault_plan(self, plan: FaultPlan) -> Self {
        self.lock().injector = FaultInjector::new(&plan);
        self
    }

    /// Makes an artifact available for fetching
    pub fn publish(&self, location: impl Into<String>) {
        self.lock().published.insert(location.into());
    }

    /// Makes a resource reachable for migration
    pub fn add_resource(&self, resource: ResourceId) {
        self.lock().resources.insert(resource);
    }

    /// Marks a service as already running an artifact
    pub fn boot(&self, service: &ServiceId, artifact: Artifact) {
        self.lock().running.insert(service.clone(), artifact);
    }

    /// Returns the artifact a service is running, if any
    pub fn running_artifact(&self, service: &ServiceId) -> Option<Artifact> {
        self.lock().running.get(service).cloned()
    }

    /// Checks whether a service is running
    pub fn is_running(&self, service: &ServiceId) -> bool {
        self.lock().running.contains_key(service)
    }

    /// Checks whether a service is suspended
    pub fn is_suspended(&self, service: &ServiceId) -> bool {
        self.lock().suspended.contains(service)
    }

    /// Returns the resource a service was migrated to
    pub fn placement(&self, service: &ServiceId) -> Option<ResourceId> {
        self.lock().placement.get(service).cloned()
    }

    /// Returns the configuration last applied to a service
    pub fn configuration(&self, service: &ServiceId) -> Option<ConfigValues> {
        self.lock().configurations.get(service).cloned()
    }

    /// Returns all recorded events in order
    pub fn events(&self) -> Vec<RuntimeEvent> {
        self.lock().events.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ServiceRuntime for SimRuntime {
    fn fetch(&mut self, location: &str) -> Result<Artifact, RuntimeError> {
        let mut state = self.lock();
        state.check(RuntimeAction::Fetch)?;
        if !state.published.contains(location) {
            return Err(RuntimeError::Fetch {
                location: location.to_string(),
                reason: "no artifact at location".to_string(),
            });
        }
        state.record(RuntimeEvent::Fetched {
            location: location.to_string(),
        });
        Ok(Artifact::new(location))
    }

    fn start(&mut self, service: &ServiceId, artifact: &Artifact) -> Result<(), RuntimeError> {
        let mut state = self.lock();
        state.check(RuntimeAction::Start)?;
        state.running.insert(service.clone(), artifact.clone());
        state.record(RuntimeEvent::Started {
            service: service.clone(),
            location: artifact.location.clone(),
        });
        Ok(())
    }

    fn stop(&mut self, service: &ServiceId) -> Result<(), RuntimeError> {
        let mut state = self.lock();
        state.check(RuntimeAction::Stop)?;
        state.running.remove(service);
        state.suspended.remove(service);
        state.record(RuntimeEvent::Stopped {
            service: service.clone(),
        });
        Ok(())
    }

    fn suspend(&mut self, service: &ServiceId) -> Result<(), RuntimeError> {
        let mut state = self.lock();
        state.check(RuntimeAction::Suspend)?;
        state.suspended.insert(service.clone());
        state.record(RuntimeEvent::Suspended {
            service: service.clone(),
        });
        Ok(())
    }

    fn resume(&mut self, service: &ServiceId) -> Result<(), RuntimeError> {
        let mut state = self.lock();
        state.check(RuntimeAction::Resume)?;
        state.suspended.remove(service);
        state.record(RuntimeEvent::Resumed {
            service: service.clone(),
        });
        Ok(())
    }

    fn relocate(
        &mut self,
        service: &ServiceId,
        resource: &ResourceId,
    ) -> Result<(), RuntimeError> {
        let mut state = self.lock();
        state.check(RuntimeAction::Relocate)?;
        if !state.resources.contains(resource) {
            return Err(RuntimeError::Unreachable(resource.clone()));
        }
        state.placement.insert(service.clone(), resource.clone());
        state.record(RuntimeEvent::Relocated {
            service: service.clone(),
            resource: resource.clone(),
        });
        Ok(())
    }

    fn handover(&mut self, from: &ServiceId, to: &ServiceId) -> Result<(), RuntimeError> {
        let mut state = self.lock();
        state.check(RuntimeAction::Handover)?;
        state.record(RuntimeEvent::HandedOver {
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    fn start_target(&mut self, target: &ServiceId) -> Result<(), RuntimeError> {
        let mut state = self.lock();
        state.check(RuntimeAction::StartTarget)?;
        state.record(RuntimeEvent::TargetStarted {
            target: target.clone(),
        });
        Ok(())
    }

    fn apply_configuration(
        &mut self,
        service: &ServiceId,
        values: &ConfigValues,
    ) -> Result<(), RuntimeError> {
        let mut state = self.lock();
        state.check(RuntimeAction::ApplyConfiguration)?;
        state.configurations.insert(service.clone(), values.clone());
        state.record(RuntimeEvent::Configured {
            service: service.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifecycle::{ServiceKind, ServiceState};
    use service_contract::{ManagedService, Service, ServiceInfo};

    fn service(runtime: SimRuntime) -> ManagedService<SimRuntime> {
        let info = ServiceInfo::new(
            ServiceId::new("sink"),
            "Sink",
            "1.0".parse().unwrap(),
            ServiceKind::SinkService,
        );
        ManagedService::new(info, ServiceState::Created, runtime).unwrap()
    }

    #[test]
    fn test_clones_share_state() {
        let runtime = SimRuntime::new();
        let mut handle = runtime.clone();
        runtime.publish("file:///a.jar");

        let artifact = handle.fetch("file:///a.jar").unwrap();
        handle.start(&ServiceId::new("svc"), &artifact).unwrap();

        assert!(runtime.is_running(&ServiceId::new("svc")));
        assert_eq!(runtime.events().len(), 2);
    }

    #[test]
    fn test_fetch_unpublished_fails() {
        let mut runtime = SimRuntime::new();
        let result = runtime.fetch("file:///missing.jar");
        assert!(matches!(result, Err(RuntimeError::Fetch { .. })));
        assert!(runtime.events().is_empty());
    }

    #[test]
    fn test_relocate_requires_known_resource() {
        let mut runtime = SimRuntime::new();
        let id = ServiceId::new("svc");
        assert_eq!(
            runtime.relocate(&id, &ResourceId::new("edge")),
            Err(RuntimeError::Unreachable(ResourceId::new("edge")))
        );

        runtime.add_resource(ResourceId::new("edge"));
        runtime.relocate(&id, &ResourceId::new("edge")).unwrap();
        assert_eq!(runtime.placement(&id), Some(ResourceId::new("edge")));
    }

    #[test]
    fn test_injected_fault() {
        let mut runtime = SimRuntime::new().with_fault_plan(FaultPlan::new().with_fault(
            RuntimeFault::FailNext {
                action: RuntimeAction::Suspend,
                count: 1,
            },
        ));
        let id = ServiceId::new("svc");

        assert!(runtime.suspend(&id).is_err());
        assert!(!runtime.is_suspended(&id));
        runtime.suspend(&id).unwrap();
        assert!(runtime.is_suspended(&id));
    }

    #[test]
    fn test_drives_managed_service() {
        let runtime = SimRuntime::new();
        let managed = service(runtime.clone());
        let id = managed.id().clone();
        runtime.boot(&id, Artifact::new("file:///v1.jar"));
        managed.set_state(ServiceState::Running).unwrap();

        managed.passivate().unwrap();
        assert!(runtime.is_suspended(&id));
        managed.activate().unwrap();
        assert!(!runtime.is_suspended(&id));

        assert_eq!(
            runtime.events(),
            vec![
                RuntimeEvent::Suspended {
                    service: id.clone()
                },
                RuntimeEvent::Resumed { service: id },
            ]
        );
    }

    #[test]
    fn test_apply_configuration_is_recorded() {
        let mut runtime = SimRuntime::new();
        let id = ServiceId::new("svc");
        let mut values = ConfigValues::new();
        values.insert("rate".to_string(), serde_json::json!(3));

        runtime.apply_configuration(&id, &values).unwrap();
        assert_eq!(runtime.configuration(&id), Some(values));
    }
}
