//! Service manager owning the registrar

use core_types::{ResourceId, ServiceId};
use lifecycle::ServiceState;
use service_contract::{ConfigValues, Service, ServiceError};
use service_mapper::{
    MapperConfig, MapperError, OperationMapper, RegistrarError, ServiceMapping, Unregister,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Service already deployed: {0}")]
    AlreadyDeployed(ServiceId),

    #[error("Service not found: {0}")]
    ServiceNotFound(ServiceId),

    #[error(transparent)]
    Mapper(#[from] MapperError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

struct Deployment {
    service: Arc<dyn Service>,
    mapping: ServiceMapping,
}

/// Deploys services into a registrar and forwards administrative calls
pub struct ServiceManager<G: Unregister> {
    registrar: G,
    mapper: OperationMapper,
    deployments: BTreeMap<ServiceId, Deployment>,
}

impl<G: Unregister> ServiceManager<G> {
    pub fn new(registrar: G, config: &MapperConfig) -> Self {
        Self::with_mapper(registrar, OperationMapper::new(config))
    }

    pub fn with_mapper(registrar: G, mapper: OperationMapper) -> Self {
        Self {
            registrar,
            mapper,
            deployments: BTreeMap::new(),
        }
    }

    /// Binds a service and records its mapping
    ///
    /// If the registrar refuses a name, the names already defined for this
    /// service are removed again before the error is returned.
    pub fn deploy(&mut self, service: Arc<dyn Service>) -> Result<ServiceMapping, ManagerError> {
        let id = service.id().clone();
        if self.deployments.contains_key(&id) {
            return Err(ManagerError::AlreadyDeployed(id));
        }

        let mapping = match self.mapper.bind(&mut self.registrar, Arc::clone(&service)) {
            Ok(mapping) => mapping,
            Err(err) => {
                if let MapperError::Registration { registered, .. } = &err {
                    self.forget(&id, registered);
                }
                return Err(err.into());
            }
        };

        info!(service = %id, names = mapping.names().len(), "service deployed");
        self.deployments.insert(
            id,
            Deployment {
                service,
                mapping: mapping.clone(),
            },
        );
        Ok(mapping)
    }

    /// Removes a service and all of its names
    pub fn undeploy(&mut self, id: &ServiceId) -> Result<Arc<dyn Service>, ManagerError> {
        let deployment = self
            .deployments
            .remove(id)
            .ok_or_else(|| ManagerError::ServiceNotFound(id.clone()))?;
        self.forget(id, &deployment.mapping.names());
        info!(service = %id, "service undeployed");
        Ok(deployment.service)
    }

    fn forget(&mut self, id: &ServiceId, names: &[String]) {
        for name in names {
            if let Err(err @ RegistrarError::UnknownName(_)) = self.registrar.unregister(name) {
                warn!(service = %id, error = %err, "name already gone");
            }
        }
    }

    /// Returns the state of a service, `UNKOWN` if it is not deployed
    pub fn state(&self, id: &ServiceId) -> ServiceState {
        self.deployments
            .get(id)
            .map(|deployment| deployment.service.state())
            .unwrap_or(ServiceState::Unknown)
    }

    /// Returns the ids of all deployed services in sorted order
    pub fn service_ids(&self) -> Vec<ServiceId> {
        self.deployments.keys().cloned().collect()
    }

    pub fn service(&self, id: &ServiceId) -> Option<Arc<dyn Service>> {
        self.deployments
            .get(id)
            .map(|deployment| Arc::clone(&deployment.service))
    }

    pub fn mapping(&self, id: &ServiceId) -> Option<&ServiceMapping> {
        self.deployments.get(id).map(|deployment| &deployment.mapping)
    }

    pub fn registrar(&self) -> &G {
        &self.registrar
    }

    pub fn count(&self) -> usize {
        self.deployments.len()
    }

    fn lookup(&self, id: &ServiceId) -> Result<&dyn Service, ManagerError> {
        self.deployments
            .get(id)
            .map(|deployment| deployment.service.as_ref())
            .ok_or_else(|| ManagerError::ServiceNotFound(id.clone()))
    }

    pub fn set_state(&self, id: &ServiceId, state: ServiceState) -> Result<(), ManagerError> {
        Ok(self.lookup(id)?.set_state(state)?)
    }

    pub fn activate(&self, id: &ServiceId) -> Result<(), ManagerError> {
        Ok(self.lookup(id)?.activate()?)
    }

    pub fn passivate(&self, id: &ServiceId) -> Result<(), ManagerError> {
        Ok(self.lookup(id)?.passivate()?)
    }

    pub fn migrate(&self, id: &ServiceId, resource: &ResourceId) -> Result<(), ManagerError> {
        Ok(self.lookup(id)?.migrate_service(resource)?)
    }

    pub fn update(&self, id: &ServiceId, location: &str) -> Result<(), ManagerError> {
        Ok(self.lookup(id)?.update_service(location)?)
    }

    /// Switches a service to another one; the target must be deployed too
    pub fn switch_to(&self, id: &ServiceId, target: &ServiceId) -> Result<(), ManagerError> {
        let service = self.lookup(id)?;
        if !self.deployments.contains_key(target) {
            return Err(ManagerError::ServiceNotFound(target.clone()));
        }
        Ok(service.switch_to_service(target)?)
    }

    pub fn reconfigure(&self, id: &ServiceId, values: &ConfigValues) -> Result<(), ManagerError> {
        Ok(self.lookup(id)?.reconfigure(values)?)
    }
}
