//! Binding of a service to a registrar

use crate::names::*;
use crate::params::{text, ParamError, ParamKind, ParamSchema};
use crate::{
    DecodeError, JsonDecoder, MapperConfig, NameQualifier, OperationHandler, OperationResult,
    PropertyGetter, Registrar, RegistrarError, StructuredDecoder,
};
use core_types::{ResourceId, ServiceId};
use lifecycle::{LifecycleError, ServiceState};
use serde_json::Value;
use service_contract::{ConfigValues, Service, ServiceError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that escape the mapper instead of becoming failure envelopes
#[derive(Debug, Error)]
pub enum MapperError {
    /// The service does not implement a registered operation
    #[error("Service '{service}' violates the contract on '{operation}': {source}")]
    Contract {
        service: ServiceId,
        operation: String,
        #[source]
        source: ServiceError,
    },

    /// The registrar refused a name; `registered` lists the names already
    /// defined for this service before the refusal
    #[error("Cannot register '{name}': {source}")]
    Registration {
        name: String,
        registered: Vec<String>,
        #[source]
        source: RegistrarError,
    },
}

/// Qualified names registered for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMapping {
    pub service: ServiceId,
    pub properties: Vec<String>,
    pub operations: Vec<String>,
}

impl ServiceMapping {
    fn new(service: ServiceId) -> Self {
        Self {
            service,
            properties: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Returns every registered name, properties first
    pub fn names(&self) -> Vec<String> {
        self.properties
            .iter()
            .chain(self.operations.iter())
            .cloned()
            .collect()
    }
}

/// Why an invocation did not succeed
enum Failure {
    /// The request itself was malformed
    Rejected(String),
    Service(ServiceError),
}

impl From<ParamError> for Failure {
    fn from(err: ParamError) -> Self {
        Failure::Rejected(err.to_string())
    }
}

impl From<LifecycleError> for Failure {
    fn from(err: LifecycleError) -> Self {
        Failure::Rejected(err.to_string())
    }
}

impl From<DecodeError> for Failure {
    fn from(err: DecodeError) -> Self {
        Failure::Rejected(err.to_string())
    }
}

impl From<ServiceError> for Failure {
    fn from(err: ServiceError) -> Self {
        Failure::Service(err)
    }
}

type Dispatch = fn(&dyn Service, &[Value], &dyn StructuredDecoder) -> Result<(), Failure>;

#[derive(Clone, Copy)]
struct OperationSpec {
    name: &'static str,
    schema: ParamSchema,
    dispatch: Dispatch,
}

const ONE_TEXT: &[ParamKind] = &[ParamKind::Text];

const OPERATIONS: [OperationSpec; 7] = [
    OperationSpec {
        name: NAME_OP_ACTIVATE,
        schema: ParamSchema::Ignored,
        dispatch: activate,
    },
    OperationSpec {
        name: NAME_OP_PASSIVATE,
        schema: ParamSchema::Ignored,
        dispatch: passivate,
    },
    OperationSpec {
        name: NAME_OP_SET_STATE,
        schema: ParamSchema::Exact(ONE_TEXT),
        dispatch: set_state,
    },
    OperationSpec {
        name: NAME_OP_MIGRATE,
        schema: ParamSchema::Exact(ONE_TEXT),
        dispatch: migrate,
    },
    OperationSpec {
        name: NAME_OP_UPDATE,
        schema: ParamSchema::Exact(ONE_TEXT),
        dispatch: update,
    },
    OperationSpec {
        name: NAME_OP_SWITCH,
        schema: ParamSchema::Exact(ONE_TEXT),
        dispatch: switch_to,
    },
    OperationSpec {
        name: NAME_OP_RECONF,
        schema: ParamSchema::Pairs,
        dispatch: reconfigure,
    },
];

fn activate(service: &dyn Service, _: &[Value], _: &dyn StructuredDecoder) -> Result<(), Failure> {
    Ok(service.activate()?)
}

fn passivate(
    service: &dyn Service,
    _: &[Value],
    _: &dyn StructuredDecoder,
) -> Result<(), Failure> {
    Ok(service.passivate()?)
}

fn set_state(
    service: &dyn Service,
    params: &[Value],
    _: &dyn StructuredDecoder,
) -> Result<(), Failure> {
    let state: ServiceState = text(&params[0]).parse()?;
    Ok(service.set_state(state)?)
}

fn migrate(
    service: &dyn Service,
    params: &[Value],
    _: &dyn StructuredDecoder,
) -> Result<(), Failure> {
    Ok(service.migrate_service(&ResourceId::new(text(&params[0])))?)
}

fn update(
    service: &dyn Service,
    params: &[Value],
    _: &dyn StructuredDecoder,
) -> Result<(), Failure> {
    Ok(service.update_service(&text(&params[0]))?)
}

fn switch_to(
    service: &dyn Service,
    params: &[Value],
    _: &dyn StructuredDecoder,
) -> Result<(), Failure> {
    Ok(service.switch_to_service(&ServiceId::new(text(&params[0])))?)
}

/// Decodes every `(name, value)` pair before the service sees any of them
///
/// String values are serialized text, so a string primitive must arrive
/// JSON-quoted (`"\"fast\""`); a bare `fast` fails to decode. Non-string
/// values are taken inline.
fn reconfigure(
    service: &dyn Service,
    params: &[Value],
    decoder: &dyn StructuredDecoder,
) -> Result<(), Failure> {
    let mut values = ConfigValues::new();
    for pair in params.chunks(2) {
        let name = text(&pair[0]);
        let value = match &pair[1] {
            Value::String(serialized) => decoder.decode(serialized)?,
            inline => inline.clone(),
        };
        values.insert(name, value);
    }
    Ok(service.reconfigure(&values)?)
}

/// Turns the outcome of an invocation into an envelope
///
/// Only contract defects escape as errors.
fn settle(
    service: &ServiceId,
    operation: &str,
    outcome: Result<(), Failure>,
) -> Result<OperationResult, MapperError> {
    match outcome {
        Ok(()) => {
            debug!(%service, operation, "operation succeeded");
            Ok(OperationResult::success())
        }
        Err(Failure::Rejected(message)) => {
            warn!(%service, operation, %message, "operation rejected");
            Ok(OperationResult::failure(message))
        }
        Err(Failure::Service(err)) if err.is_recoverable() => {
            warn!(%service, operation, error = %err, "operation failed");
            Ok(OperationResult::failure(err.to_string()))
        }
        Err(Failure::Service(err)) => {
            error!(%service, operation, error = %err, "service does not honour its contract");
            Err(MapperError::Contract {
                service: service.clone(),
                operation: operation.to_string(),
                source: err,
            })
        }
    }
}

fn property(service: &Arc<dyn Service>, read: fn(&dyn Service) -> String) -> PropertyGetter {
    let service = Arc::clone(service);
    Box::new(move || read(service.as_ref()))
}

/// Property names paired with their readers, in registration order
fn properties() -> [(&'static str, fn(&dyn Service) -> String); 7] {
    [
        (NAME_PROP_ID, |s| s.id().to_string()),
        (NAME_PROP_NAME, |s| s.name().to_string()),
        (NAME_PROP_VERSION, |s| s.version().to_string()),
        (NAME_PROP_DESCRIPTION, |s| s.description().to_string()),
        (NAME_PROP_STATE, |s| s.state().name().to_string()),
        (NAME_PROP_KIND, |s| s.kind().name().to_string()),
        (NAME_PROP_DEPLOYABLE, |s| s.is_deployable().to_string()),
    ]
}

/// Exposes services on a registrar
///
/// The mapper holds no per-service state; binding the same service twice
/// defines the same names twice.
#[derive(Clone)]
pub struct OperationMapper {
    qualifier: Arc<dyn NameQualifier>,
    decoder: Arc<dyn StructuredDecoder>,
}

impl OperationMapper {
    /// Creates a mapper decoding structured parameters as JSON
    pub fn new(config: &MapperConfig) -> Self {
        Self {
            qualifier: config.naming.qualifier(),
            decoder: Arc::new(JsonDecoder),
        }
    }

    /// Replaces the decoder used for serialized `reconfigure` values
    pub fn with_decoder(mut self, decoder: Arc<dyn StructuredDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Replaces the name qualifier
    pub fn with_qualifier(mut self, qualifier: Arc<dyn NameQualifier>) -> Self {
        self.qualifier = qualifier;
        self
    }

    /// Returns the registered name of a logical name for a service
    pub fn qualify(&self, name: &str, service: &ServiceId) -> String {
        self.qualifier.qualify(name, service)
    }

    /// Registers every property and operation of `service`
    ///
    /// Properties are read-only. On a registrar refusal the error lists the
    /// names defined so far so the caller can remove them.
    pub fn bind<G: Registrar + ?Sized>(
        &self,
        registrar: &mut G,
        service: Arc<dyn Service>,
    ) -> Result<ServiceMapping, MapperError> {
        let id = service.id().clone();
        let mut mapping = ServiceMapping::new(id.clone());

        for (logical, read) in properties() {
            let name = self.qualify(logical, &id);
            registrar
                .define_property(name.clone(), property(&service, read), None)
                .map_err(|source| MapperError::Registration {
                    name: name.clone(),
                    registered: mapping.names(),
                    source,
                })?;
            mapping.properties.push(name);
        }

        for operation in OPERATIONS {
            let name = self.qualify(operation.name, &id);
            registrar
                .define_operation(name.clone(), self.handler(&service, operation))
                .map_err(|source| MapperError::Registration {
                    name: name.clone(),
                    registered: mapping.names(),
                    source,
                })?;
            mapping.operations.push(name);
        }

        info!(
            service = %id,
            properties = mapping.properties.len(),
            operations = mapping.operations.len(),
            "service bound"
        );
        Ok(mapping)
    }

    fn handler(&self, service: &Arc<dyn Service>, operation: OperationSpec) -> OperationHandler {
        let service = Arc::clone(service);
        let decoder = Arc::clone(&self.decoder);
        Box::new(move |params: &[Value]| {
            let outcome = operation
                .schema
                .validate(operation.name, params)
                .map_err(Failure::from)
                .and_then(|()| (operation.dispatch)(service.as_ref(), params, decoder.as_ref()));
            settle(service.id(), operation.name, outcome)
        })
    }
}

impl Default for OperationMapper {
    fn default() -> Self {
        Self::new(&MapperConfig::default())
    }
}

/// Binds `service` to `registrar` with the given configuration
pub fn map_service<G: Registrar + ?Sized>(
    registrar: &mut G,
    service: Arc<dyn Service>,
    config: &MapperConfig,
) -> Result<ServiceMapping, MapperError> {
    OperationMapper::new(config).bind(registrar, service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NamingStrategy, PropertySetter};
    use lifecycle::ServiceKind;
    use serde_json::json;
    use service_contract::ServiceVersion;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct TestRegistrar {
        properties: HashMap<String, PropertyGetter>,
        operations: HashMap<String, OperationHandler>,
        order: Vec<String>,
        refuse: Option<String>,
    }

    impl TestRegistrar {
        fn read(&self, name: &str) -> String {
            (self.properties[name])()
        }

        fn invoke(&self, name: &str, params: &[Value]) -> Result<OperationResult, MapperError> {
            (self.operations[name])(params)
        }
    }

    impl Registrar for TestRegistrar {
        fn define_property(
            &mut self,
            name: String,
            getter: PropertyGetter,
            setter: Option<PropertySetter>,
        ) -> Result<(), RegistrarError> {
            assert!(setter.is_none());
            if self.refuse.as_deref() == Some(name.as_str()) {
                return Err(RegistrarError::DuplicateName(name));
            }
            self.order.push(name.clone());
            self.properties.insert(name, getter);
            Ok(())
        }

        fn define_operation(
            &mut self,
            name: String,
            handler: OperationHandler,
        ) -> Result<(), RegistrarError> {
            if self.refuse.as_deref() == Some(name.as_str()) {
                return Err(RegistrarError::DuplicateName(name));
            }
            self.order.push(name.clone());
            self.operations.insert(name, handler);
            Ok(())
        }
    }

    /// Records which contract method was called
    struct Recorder {
        id: ServiceId,
        version: ServiceVersion,
        state: Mutex<ServiceState>,
        calls: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn new(id: &str) -> Arc<Self> {
            Arc::new(Self {
                id: ServiceId::new(id),
                version: "1.4.2".parse().unwrap(),
                state: Mutex::new(ServiceState::Running),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Service for Recorder {
        fn id(&self) -> &ServiceId {
            &self.id
        }

        fn name(&self) -> &str {
            "recorder"
        }

        fn version(&self) -> &ServiceVersion {
            &self.version
        }

        fn description(&self) -> &str {
            "records calls"
        }

        fn state(&self) -> ServiceState {
            *self.state.lock().unwrap()
        }

        fn is_deployable(&self) -> bool {
            true
        }

        fn kind(&self) -> ServiceKind {
            ServiceKind::TransformationService
        }

        fn set_state(&self, state: ServiceState) -> Result<(), ServiceError> {
            self.record(format!("setState {}", state));
            *self.state.lock().unwrap() = state;
            Ok(())
        }

        fn migrate_service(&self, resource: &ResourceId) -> Result<(), ServiceError> {
            self.record(format!("migrate {}", resource));
            Ok(())
        }

        fn update_service(&self, location: &str) -> Result<(), ServiceError> {
            self.record(format!("update {}", location));
            Ok(())
        }

        fn switch_to_service(&self, target: &ServiceId) -> Result<(), ServiceError> {
            self.record(format!("switchTo {}", target));
            Ok(())
        }

        fn activate(&self) -> Result<(), ServiceError> {
            self.record("activate".to_string());
            Ok(())
        }

        fn passivate(&self) -> Result<(), ServiceError> {
            self.record("passivate".to_string());
            Err(ServiceError::InvalidArgument("busy".to_string()))
        }

        fn reconfigure(&self, values: &ConfigValues) -> Result<(), ServiceError> {
            self.record(format!("reconfigure {}", json!(values)));
            Ok(())
        }
    }

    fn bound(recorder: &Arc<Recorder>) -> (TestRegistrar, ServiceMapping) {
        let mut registrar = TestRegistrar::default();
        let service: Arc<dyn Service> = recorder.clone();
        let mapping = OperationMapper::default()
            .bind(&mut registrar, service)
            .unwrap();
        (registrar, mapping)
    }

    #[test]
    fn test_bind_registers_every_name_in_order() {
        let (registrar, mapping) = bound(&Recorder::new("svc"));

        assert_eq!(mapping.properties, PROPERTY_NAMES.to_vec());
        assert_eq!(mapping.operations, OPERATION_NAMES.to_vec());
        assert_eq!(registrar.order, mapping.names());
    }

    #[test]
    fn test_properties_are_stringified() {
        let (registrar, _) = bound(&Recorder::new("svc"));

        assert_eq!(registrar.read(NAME_PROP_ID), "svc");
        assert_eq!(registrar.read(NAME_PROP_NAME), "recorder");
        assert_eq!(registrar.read(NAME_PROP_VERSION), "1.4.2");
        assert_eq!(registrar.read(NAME_PROP_DESCRIPTION), "records calls");
        assert_eq!(registrar.read(NAME_PROP_STATE), "RUNNING");
        assert_eq!(registrar.read(NAME_PROP_KIND), "TRANSFORMATION_SERVICE");
        assert_eq!(registrar.read(NAME_PROP_DEPLOYABLE), "true");
    }

    #[test]
    fn test_each_operation_dispatches_to_its_own_method() {
        let recorder = Recorder::new("svc");
        let (registrar, _) = bound(&recorder);

        registrar.invoke(NAME_OP_MIGRATE, &[json!("edge-2")]).unwrap();
        registrar
            .invoke(NAME_OP_UPDATE, &[json!("http://repo/v2")])
            .unwrap();
        registrar.invoke(NAME_OP_SWITCH, &[json!("svc-b")]).unwrap();
        registrar.invoke(NAME_OP_ACTIVATE, &[]).unwrap();
        registrar
            .invoke(NAME_OP_SET_STATE, &[json!("STOPPED")])
            .unwrap();

        assert_eq!(
            recorder.calls(),
            vec![
                "migrate edge-2",
                "update http://repo/v2",
                "switchTo svc-b",
                "activate",
                "setState STOPPED",
            ]
        );
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let recorder = Recorder::new("svc");
        let (registrar, _) = bound(&recorder);

        let result = registrar
            .invoke(NAME_OP_SET_STATE, &[json!("NOT_A_STATE")])
            .unwrap();
        assert!(!result.success);
        assert!(!result.error_message.unwrap().is_empty());
        assert!(recorder.calls().is_empty());
        assert_eq!(registrar.read(NAME_PROP_STATE), "RUNNING");
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        let recorder = Recorder::new("svc");
        let (registrar, _) = bound(&recorder);

        let result = registrar.invoke(NAME_OP_UPDATE, &[]).unwrap();
        assert!(!result.success);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_recoverable_service_error_becomes_failure() {
        let (registrar, _) = bound(&Recorder::new("svc"));

        let result = registrar.invoke(NAME_OP_PASSIVATE, &[]).unwrap();
        assert_eq!(
            result,
            OperationResult::failure("Invalid argument: busy")
        );
    }

    #[test]
    fn test_reconfigure_decodes_serialized_values() {
        let recorder = Recorder::new("svc");
        let (registrar, _) = bound(&recorder);

        let result = registrar
            .invoke(
                NAME_OP_RECONF,
                &[json!("window"), json!("{\"size\": 3}"), json!("rate"), json!(5)],
            )
            .unwrap();
        assert!(result.success);
        assert_eq!(
            recorder.calls(),
            vec![r#"reconfigure {"rate":5,"window":{"size":3}}"#]
        );
    }

    #[test]
    fn test_reconfigure_decode_failure_applies_nothing() {
        let recorder = Recorder::new("svc");
        let (registrar, _) = bound(&recorder);

        let result = registrar
            .invoke(
                NAME_OP_RECONF,
                &[json!("rate"), json!("5"), json!("window"), json!("{broken")],
            )
            .unwrap();
        assert!(!result.success);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_reconfigure_string_primitive_must_be_quoted() {
        let recorder = Recorder::new("svc");
        let (registrar, _) = bound(&recorder);

        let bare = registrar
            .invoke(NAME_OP_RECONF, &[json!("mode"), json!("fast")])
            .unwrap();
        assert!(!bare.success);
        assert!(recorder.calls().is_empty());

        let quoted = registrar
            .invoke(NAME_OP_RECONF, &[json!("mode"), json!("\"fast\"")])
            .unwrap();
        assert!(quoted.success);
        assert_eq!(recorder.calls(), vec![r#"reconfigure {"mode":"fast"}"#]);
    }

    #[test]
    fn test_injected_decoder_is_used() {
        struct Upper;
        impl StructuredDecoder for Upper {
            fn decode(&self, text: &str) -> Result<Value, DecodeError> {
                Ok(Value::String(text.to_uppercase()))
            }
        }

        let recorder = Recorder::new("svc");
        let mut registrar = TestRegistrar::default();
        let service: Arc<dyn Service> = recorder.clone();
        OperationMapper::default()
            .with_decoder(Arc::new(Upper))
            .bind(&mut registrar, service)
            .unwrap();

        registrar
            .invoke(NAME_OP_RECONF, &[json!("mode"), json!("fast")])
            .unwrap();
        assert_eq!(recorder.calls(), vec![r#"reconfigure {"mode":"FAST"}"#]);
    }

    #[test]
    fn test_unimplemented_operation_is_fatal() {
        struct Bare {
            id: ServiceId,
            version: ServiceVersion,
        }

        impl Service for Bare {
            fn id(&self) -> &ServiceId {
                &self.id
            }
            fn name(&self) -> &str {
                "bare"
            }
            fn version(&self) -> &ServiceVersion {
                &self.version
            }
            fn description(&self) -> &str {
                ""
            }
            fn state(&self) -> ServiceState {
                ServiceState::Available
            }
            fn is_deployable(&self) -> bool {
                false
            }
            fn kind(&self) -> ServiceKind {
                ServiceKind::SinkService
            }
        }

        let mut registrar = TestRegistrar::default();
        let service: Arc<dyn Service> = Arc::new(Bare {
            id: ServiceId::new("bare"),
            version: "1".parse().unwrap(),
        });
        OperationMapper::default()
            .bind(&mut registrar, service)
            .unwrap();

        assert_eq!(registrar.read(NAME_PROP_DEPLOYABLE), "false");
        let err = registrar
            .invoke(NAME_OP_MIGRATE, &[json!("edge")])
            .unwrap_err();
        match err {
            MapperError::Contract {
                service,
                operation,
                source,
            } => {
                assert_eq!(service, ServiceId::new("bare"));
                assert_eq!(operation, NAME_OP_MIGRATE);
                assert_eq!(source, ServiceError::NotImplemented("migrate"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prefix_qualification() {
        let config = MapperConfig::new(NamingStrategy::ServiceIdPrefix {
            separator: "_".to_string(),
        });
        let mut registrar = TestRegistrar::default();
        let service: Arc<dyn Service> = Recorder::new("src-1");
        let mapping = map_service(&mut registrar, service, &config).unwrap();

        assert!(mapping.properties.contains(&"src-1_state".to_string()));
        assert!(mapping.operations.contains(&"src-1_switchTo".to_string()));
        assert_eq!(registrar.read("src-1_state"), "RUNNING");
    }

    #[test]
    fn test_registration_refusal_reports_registered_names() {
        let mut registrar = TestRegistrar {
            refuse: Some(NAME_OP_PASSIVATE.to_string()),
            ..Default::default()
        };
        let service: Arc<dyn Service> = Recorder::new("svc");
        let err = OperationMapper::default()
            .bind(&mut registrar, service)
            .unwrap_err();

        match err {
            MapperError::Registration {
                name, registered, ..
            } => {
                assert_eq!(name, NAME_OP_PASSIVATE);
                assert_eq!(registered.len(), PROPERTY_NAMES.len() + 1);
                assert_eq!(registered.last().map(String::as_str), Some(NAME_OP_ACTIVATE));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
