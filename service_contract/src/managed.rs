//! Reference service implementation enforcing the lifecycle

use crate::{
    Artifact, ConfigValues, ParameterDescriptor, Service, ServiceError, ServiceInfo,
    ServiceRuntime, ServiceVersion,
};
use core_types::{ResourceId, ServiceId};
use lifecycle::{ServiceKind, ServiceState};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Observer of state changes of a managed service
///
/// Called for every transition, including the transient states, while the
/// service's operation lock is held. Implementations must not call back into
/// mutating operations of the same service.
pub trait StateListener: Send + Sync {
    fn state_changed(&self, service: &ServiceId, from: ServiceState, to: ServiceState);
}

impl<F> StateListener for F
where
    F: Fn(&ServiceId, ServiceState, ServiceState) + Send + Sync,
{
    fn state_changed(&self, service: &ServiceId, from: ServiceState, to: ServiceState) {
        self(service, from, to)
    }
}

/// Lock-free holder of the current state
///
/// Readers never wait for an operation in progress; they observe either the
/// state before a transition or the one after it.
#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    fn new(state: ServiceState) -> Self {
        Self(AtomicU8::new(state.ordinal()))
    }

    fn load(&self) -> ServiceState {
        ServiceState::from_ordinal(self.0.load(Ordering::Acquire)).unwrap_or(ServiceState::Unknown)
    }

    fn swap(&self, state: ServiceState) -> ServiceState {
        ServiceState::from_ordinal(self.0.swap(state.ordinal(), Ordering::AcqRel))
            .unwrap_or(ServiceState::Unknown)
    }
}

/// Mutable part of a managed service, guarded by one mutex
struct Inner<R> {
    runtime: R,
    artifact: Option<Artifact>,
    configuration: ConfigValues,
}

/// A service that enforces lifecycle rules over a [`ServiceRuntime`]
///
/// Adaptation operations are only accepted from the states they make sense
/// in, pass through the corresponding transient state and restore the
/// previous state when the runtime reports a failure. All mutations hold
/// one lock for their whole duration.
pub struct ManagedService<R: ServiceRuntime> {
    info: ServiceInfo,
    state: StateCell,
    descriptor: ParameterDescriptor,
    handover_capable: bool,
    /// Interface-compatible services, with whether each supports handover
    switch_targets: BTreeMap<ServiceId, bool>,
    listener: Option<Arc<dyn StateListener>>,
    inner: Mutex<Inner<R>>,
}

impl<R: ServiceRuntime> ManagedService<R> {
    /// Creates a managed service in one of the initial states
    pub fn new(
        info: ServiceInfo,
        initial_state: ServiceState,
        runtime: R,
    ) -> Result<Self, ServiceError> {
        if !initial_state.is_initial() {
            return Err(ServiceError::InvalidInitialState(initial_state));
        }
        Ok(Self {
            info,
            state: StateCell::new(initial_state),
            descriptor: ParameterDescriptor::new(),
            handover_capable: false,
            switch_targets: BTreeMap::new(),
            listener: None,
            inner: Mutex::new(Inner {
                runtime,
                artifact: None,
                configuration: ConfigValues::new(),
            }),
        })
    }

    /// Sets the parameter descriptor used to validate `reconfigure`
    pub fn with_descriptor(mut self, descriptor: ParameterDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    /// Sets the currently installed artifact
    pub fn with_artifact(self, artifact: Artifact) -> Self {
        self.lock().artifact = Some(artifact);
        self
    }

    /// Marks this service as able to hand over in-flight work
    pub fn with_handover(mut self) -> Self {
        self.handover_capable = true;
        self
    }

    /// Declares an interface-compatible service this one may switch to
    pub fn with_switch_target(mut self, target: ServiceId, handover: bool) -> Self {
        self.switch_targets.insert(target, handover);
        self
    }

    /// Notifies `listener` of every state change
    pub fn with_listener(mut self, listener: Arc<dyn StateListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the metadata of the service
    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }

    /// Returns the parameter descriptor
    pub fn descriptor(&self) -> &ParameterDescriptor {
        &self.descriptor
    }

    /// Returns a snapshot of the applied configuration
    pub fn configuration(&self) -> ConfigValues {
        self.lock().configuration.clone()
    }

    /// Returns the installed artifact, if any
    pub fn artifact(&self) -> Option<Artifact> {
        self.lock().artifact.clone()
    }

    /// Runs a closure with exclusive access to the runtime
    pub fn with_runtime<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut self.lock().runtime)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, to: ServiceState) {
        let from = self.state.swap(to);
        debug!(service = %self.info.id, %from, %to, "state transition");
        if let Some(listener) = &self.listener {
            listener.state_changed(&self.info.id, from, to);
        }
    }

    /// Refuses to stop a running instance that could not be restarted
    fn require_artifact(
        &self,
        operation: &'static str,
        inner: &Inner<R>,
    ) -> Result<(), ServiceError> {
        if inner.artifact.is_some() {
            Ok(())
        } else {
            Err(self.failed(
                operation,
                ServiceError::NoArtifact {
                    service: self.info.id.clone(),
                    operation,
                },
            ))
        }
    }

    fn require_state(
        &self,
        operation: &'static str,
        allowed: &[ServiceState],
    ) -> Result<ServiceState, ServiceError> {
        let current = self.state.load();
        if allowed.contains(&current) {
            Ok(current)
        } else {
            Err(ServiceError::InvalidState {
                service: self.info.id.clone(),
                operation,
                state: current,
            })
        }
    }

    fn failed(&self, operation: &'static str, err: ServiceError) -> ServiceError {
        warn!(service = %self.info.id, operation, error = %err, "operation failed");
        err
    }

    /// Restarts the previous artifact after a failed replacement
    fn roll_back(&self, inner: &mut Inner<R>) {
        let restored = match &inner.artifact {
            Some(previous) => inner.runtime.start(&self.info.id, previous).is_ok(),
            None => false,
        };
        if restored {
            self.transition(ServiceState::Running);
        } else {
            self.transition(ServiceState::Failed);
        }
    }
}

impl<R: ServiceRuntime> Service for ManagedService<R> {
    fn id(&self) -> &ServiceId {
        &self.info.id
    }

    fn name(&self) -> &str {
        &self.info.name
    }

    fn version(&self) -> &ServiceVersion {
        &self.info.version
    }

    fn description(&self) -> &str {
        &self.info.description
    }

    fn state(&self) -> ServiceState {
        self.state.load()
    }

    fn is_deployable(&self) -> bool {
        self.info.deployable
    }

    fn kind(&self) -> ServiceKind {
        self.info.kind
    }

    fn set_state(&self, state: ServiceState) -> Result<(), ServiceError> {
        let _guard = self.lock();
        self.transition(state);
        Ok(())
    }

    fn migrate_service(&self, resource: &ResourceId) -> Result<(), ServiceError> {
        if resource.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "resource id must be given".to_string(),
            ));
        }
        if !self.info.deployable {
            return Err(ServiceError::NotDeployable(self.info.id.clone()));
        }

        let mut inner = self.lock();
        self.require_state("migrate", &[ServiceState::Running])?;

        self.transition(ServiceState::Migrating);
        let result = inner.runtime.relocate(&self.info.id, resource);
        self.transition(ServiceState::Running);
        result.map_err(|e| self.failed("migrate", ServiceError::runtime("migrate", e)))
    }

    fn update_service(&self, location: &str) -> Result<(), ServiceError> {
        if location.trim().is_empty() {
            return Err(ServiceError::InvalidArgument(
                "update location must be given".to_string(),
            ));
        }

        let mut inner = self.lock();
        let current = self.require_state(
            "update",
            &[
                ServiceState::Running,
                ServiceState::Available,
                ServiceState::Deploying,
                ServiceState::Created,
                ServiceState::Stopped,
                ServiceState::Failed,
            ],
        )?;

        // Nothing is stopped before the replacement is at hand.
        let replacement = inner
            .runtime
            .fetch(location)
            .map_err(|e| self.failed("update", ServiceError::runtime("update", e)))?;

        if current != ServiceState::Running {
            inner.artifact = Some(replacement);
            debug!(service = %self.info.id, location, "artifact replaced");
            return Ok(());
        }
        self.require_artifact("update", &inner)?;

        self.transition(ServiceState::Stopping);
        if let Err(e) = inner.runtime.stop(&self.info.id) {
            self.transition(ServiceState::Running);
            return Err(self.failed("update", ServiceError::runtime("update", e)));
        }

        self.transition(ServiceState::Starting);
        match inner.runtime.start(&self.info.id, &replacement) {
            Ok(()) => {
                inner.artifact = Some(replacement);
                self.transition(ServiceState::Running);
                Ok(())
            }
            Err(e) => {
                self.roll_back(&mut inner);
                Err(self.failed("update", ServiceError::runtime("update", e)))
            }
        }
    }

    fn switch_to_service(&self, target: &ServiceId) -> Result<(), ServiceError> {
        if target.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "target id must be given".to_string(),
            ));
        }
        if target == &self.info.id {
            return Ok(());
        }
        let target_handover = *self.switch_targets.get(target).ok_or_else(|| {
            ServiceError::Incompatible {
                service: self.info.id.clone(),
                target: target.clone(),
            }
        })?;

        let mut inner = self.lock();
        self.require_state("switch", &[ServiceState::Running])?;
        self.require_artifact("switch", &inner)?;

        self.transition(ServiceState::Stopping);
        if self.handover_capable && target_handover {
            if let Err(e) = inner.runtime.handover(&self.info.id, target) {
                self.transition(ServiceState::Running);
                return Err(self.failed("switchTo", ServiceError::runtime("switch", e)));
            }
        }
        if let Err(e) = inner.runtime.stop(&self.info.id) {
            self.transition(ServiceState::Running);
            return Err(self.failed("switchTo", ServiceError::runtime("switch", e)));
        }
        self.transition(ServiceState::Stopped);

        if let Err(e) = inner.runtime.start_target(target) {
            self.roll_back(&mut inner);
            return Err(self.failed("switchTo", ServiceError::runtime("switch", e)));
        }
        Ok(())
    }

    fn activate(&self) -> Result<(), ServiceError> {
        let mut inner = self.lock();
        self.require_state("activate", &[ServiceState::Passivated])?;

        self.transition(ServiceState::Activating);
        match inner.runtime.resume(&self.info.id) {
            Ok(()) => {
                self.transition(ServiceState::Running);
                Ok(())
            }
            Err(e) => {
                self.transition(ServiceState::Passivated);
                Err(self.failed("activate", ServiceError::runtime("activate", e)))
            }
        }
    }

    fn passivate(&self) -> Result<(), ServiceError> {
        let mut inner = self.lock();
        self.require_state("passivate", &[ServiceState::Running])?;

        self.transition(ServiceState::Passivating);
        match inner.runtime.suspend(&self.info.id) {
            Ok(()) => {
                self.transition(ServiceState::Passivated);
                Ok(())
            }
            Err(e) => {
                self.transition(ServiceState::Running);
                Err(self.failed("passivate", ServiceError::runtime("passivate", e)))
            }
        }
    }

    fn reconfigure(&self, values: &ConfigValues) -> Result<(), ServiceError> {
        self.descriptor
            .validate(values)
            .map_err(|e| self.failed("reconfigure", e.into()))?;
        if values.is_empty() {
            return Ok(());
        }

        let mut inner = self.lock();
        let previous = self.state.load();
        if previous.is_terminal() || previous == ServiceState::Unknown {
            return Err(ServiceError::InvalidState {
                service: self.info.id.clone(),
                operation: "reconfigure",
                state: previous,
            });
        }

        let mut merged = inner.configuration.clone();
        merged.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));

        self.transition(ServiceState::Reconfiguring);
        let result = inner.runtime.apply_configuration(&self.info.id, &merged);
        if result.is_ok() {
            inner.configuration = merged;
        }
        self.transition(previous);
        result.map_err(|e| self.failed("reconfigure", ServiceError::runtime("reconfigure", e)))
    }
}
