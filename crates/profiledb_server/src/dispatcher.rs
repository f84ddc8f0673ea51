//! Table-driven request dispatch.

use crate::endpoint::{ProfileEndpoint, RecordEndpoint};
use crate::error::{ServerError, ServerResult};
use profiledb_protocol::{
    CreateRequest, CreateResponse, PullEnvelope, PullResponse, PushEnvelope, SchemaResponse,
};
use profiledb_schema::SchemaRegistry;
use profiledb_store::ProfileStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Routes create, pull, push and fetch-schema requests to record
/// endpoints by endpoint name.
///
/// Dispatch is a table lookup; an endpoint handler is never invoked
/// for a name it did not register, and an unknown name is a client
/// error naming the offending value. Each request is stateless given
/// the endpoints' store and registry.
#[derive(Default)]
pub struct Dispatcher {
    endpoints: HashMap<&'static str, Box<dyn RecordEndpoint>>,
}

impl Dispatcher {
    /// Creates a dispatcher with no endpoints registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher serving the profile endpoint.
    pub fn with_profile(registry: Arc<SchemaRegistry>, store: Arc<dyn ProfileStore>) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register(Box::new(ProfileEndpoint::new(registry, store)));
        dispatcher
    }

    /// Registers a record endpoint under its own name.
    pub fn register(&mut self, endpoint: Box<dyn RecordEndpoint>) {
        self.endpoints.insert(endpoint.name(), endpoint);
    }

    /// Returns the names of the registered endpoints.
    pub fn endpoint_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.endpoints.keys().copied()
    }

    fn endpoint(&self, name: Option<&str>) -> ServerResult<&dyn RecordEndpoint> {
        let name = name.ok_or_else(|| {
            ServerError::MalformedRequest("missing required key 'endpoint'".into())
        })?;
        self.endpoints
            .get(name)
            .map(Box::as_ref)
            .ok_or_else(|| ServerError::MalformedRequest(format!("unknown endpoint {name:?}")))
    }

    /// Handles a create request against a named endpoint.
    ///
    /// The endpoint name comes from the route rather than the body;
    /// the reference binding serves `profile`.
    ///
    /// # Errors
    ///
    /// See [`RecordEndpoint::create`]; additionally
    /// [`ServerError::MalformedRequest`] for an unknown endpoint name.
    pub fn handle_create(
        &self,
        endpoint: &str,
        request: CreateRequest,
    ) -> ServerResult<CreateResponse> {
        let handler = self.endpoint(Some(endpoint))?;
        let response = handler.create(request.fields);
        if let Err(err) = &response {
            tracing::debug!(endpoint, error = %err, "create rejected");
        }
        response
    }

    /// Handles a pull request.
    ///
    /// # Errors
    ///
    /// [`ServerError::MalformedRequest`] for a missing or unknown
    /// endpoint or a missing id; [`ServerError::NotFound`] for an
    /// unknown identity.
    pub fn handle_pull(&self, envelope: PullEnvelope) -> ServerResult<PullResponse> {
        let handler = self.endpoint(envelope.endpoint.as_deref())?;
        let id = envelope
            .id
            .ok_or_else(|| ServerError::MalformedRequest("missing required key 'id'".into()))?;

        handler.get(&id).map(PullResponse::new)
    }

    /// Handles a push request: set exactly one field.
    ///
    /// The envelope is checked for completeness before the endpoint
    /// is consulted; the endpoint re-validates the field/value pair
    /// before any store write.
    ///
    /// # Errors
    ///
    /// [`ServerError::MalformedRequest`] for missing envelope keys or
    /// an unknown endpoint; [`ServerError::NotFound`] for an unknown
    /// identity; [`ServerError::Schema`] for an unknown field or
    /// mistyped value.
    pub fn handle_push(&self, envelope: PushEnvelope) -> ServerResult<()> {
        let handler = self.endpoint(envelope.endpoint.as_deref())?;
        let id = envelope
            .id
            .ok_or_else(|| ServerError::MalformedRequest("missing required key 'id'".into()))?;
        let field = envelope
            .field
            .ok_or_else(|| ServerError::MalformedRequest("missing required key 'field'".into()))?;
        let value = envelope
            .value
            .ok_or_else(|| ServerError::MalformedRequest("missing required key 'value'".into()))?;

        let result = handler.set(&id, &field, value);
        if let Err(err) = &result {
            tracing::debug!(id = %id, field = %field, error = %err, "push rejected");
        }
        result
    }

    /// Handles a fetch-schema request against a named endpoint.
    ///
    /// # Errors
    ///
    /// [`ServerError::MalformedRequest`] for an unknown endpoint name.
    pub fn handle_schema(&self, endpoint: &str) -> ServerResult<SchemaResponse> {
        Ok(self.endpoint(Some(endpoint))?.schema())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profiledb_protocol::ENDPOINT_PROFILE;
    use profiledb_schema::{FieldMap, FieldType};
    use profiledb_store::MemoryStore;
    use serde_json::json;

    fn dispatcher() -> (Dispatcher, Arc<MemoryStore>) {
        let registry = Arc::new(SchemaRegistry::new([
            ("level".to_string(), FieldType::Int),
            ("name".to_string(), FieldType::String),
        ]));
        let store = Arc::new(MemoryStore::new());
        (
            Dispatcher::with_profile(registry, Arc::clone(&store) as Arc<dyn ProfileStore>),
            store,
        )
    }

    fn fields(value: serde_json::Value) -> FieldMap {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn create(dispatcher: &Dispatcher) -> String {
        dispatcher
            .handle_create(
                ENDPOINT_PROFILE,
                CreateRequest::new(fields(json!({"level": 1, "name": "Ava"}))),
            )
            .unwrap()
            .id
    }

    fn pull(dispatcher: &Dispatcher, id: &str) -> ServerResult<PullResponse> {
        dispatcher.handle_pull(PullEnvelope {
            endpoint: Some(ENDPOINT_PROFILE.to_string()),
            id: Some(id.to_string()),
        })
    }

    #[test]
    fn create_then_pull_roundtrips() {
        let (dispatcher, _store) = dispatcher();
        let id = create(&dispatcher);

        let pulled = pull(&dispatcher, &id).unwrap();
        assert_eq!(pulled.fields, fields(json!({"level": 1, "name": "Ava"})));
    }

    #[test]
    fn push_then_pull_reflects_new_value() {
        let (dispatcher, _store) = dispatcher();
        let id = create(&dispatcher);

        dispatcher
            .handle_push(PushEnvelope {
                endpoint: Some(ENDPOINT_PROFILE.to_string()),
                id: Some(id.clone()),
                field: Some("level".to_string()),
                value: Some(json!(2)),
            })
            .unwrap();

        let pulled = pull(&dispatcher, &id).unwrap();
        assert_eq!(pulled.fields, fields(json!({"level": 2, "name": "Ava"})));
    }

    #[test]
    fn unknown_endpoint_is_named_in_the_error() {
        let (dispatcher, _store) = dispatcher();
        let err = dispatcher
            .handle_pull(PullEnvelope {
                endpoint: Some("scores".to_string()),
                id: Some("whatever".to_string()),
            })
            .unwrap_err();

        assert!(matches!(err, ServerError::MalformedRequest(_)));
        assert!(err.to_string().contains("scores"));
    }

    #[test]
    fn missing_envelope_keys_are_named() {
        let (dispatcher, _store) = dispatcher();

        let err = dispatcher
            .handle_push(PushEnvelope {
                endpoint: Some(ENDPOINT_PROFILE.to_string()),
                id: Some("abc".to_string()),
                field: None,
                value: Some(json!(1)),
            })
            .unwrap_err();
        assert!(err.to_string().contains("'field'"));

        let err = dispatcher
            .handle_push(PushEnvelope {
                endpoint: Some(ENDPOINT_PROFILE.to_string()),
                id: Some("abc".to_string()),
                field: Some("level".to_string()),
                value: None,
            })
            .unwrap_err();
        assert!(err.to_string().contains("'value'"));

        let err = dispatcher
            .handle_pull(PullEnvelope {
                endpoint: None,
                id: Some("abc".to_string()),
            })
            .unwrap_err();
        assert!(err.to_string().contains("'endpoint'"));
    }

    #[test]
    fn explicit_null_value_is_a_type_error_not_malformed() {
        let (dispatcher, _store) = dispatcher();
        let id = create(&dispatcher);

        // 'level' is declared int, so null must fail validation, not
        // envelope parsing.
        let err = dispatcher
            .handle_push(PushEnvelope {
                endpoint: Some(ENDPOINT_PROFILE.to_string()),
                id: Some(id),
                field: Some("level".to_string()),
                value: Some(json!(null)),
            })
            .unwrap_err();
        assert!(matches!(err, ServerError::Schema(_)));
    }

    #[test]
    fn pull_unknown_identity_is_not_found() {
        let (dispatcher, _store) = dispatcher();
        let err = pull(&dispatcher, "nonexistent-id").unwrap_err();
        assert!(matches!(err, ServerError::NotFound(_)));
    }

    #[test]
    fn schema_fetch_serves_the_tag_map() {
        let (dispatcher, _store) = dispatcher();
        let schema = dispatcher.handle_schema(ENDPOINT_PROFILE).unwrap();
        assert_eq!(schema.get("level").map(String::as_str), Some("int"));
    }

    #[test]
    fn level_name_walkthrough() {
        // Create, push valid, push mistyped, pull.
        let (dispatcher, store) = dispatcher();
        let id = create(&dispatcher);
        assert_eq!(store.len().unwrap(), 1);

        dispatcher
            .handle_push(PushEnvelope {
                endpoint: Some(ENDPOINT_PROFILE.to_string()),
                id: Some(id.clone()),
                field: Some("level".to_string()),
                value: Some(json!(2)),
            })
            .unwrap();
        assert_eq!(
            pull(&dispatcher, &id).unwrap().fields,
            fields(json!({"level": 2, "name": "Ava"}))
        );

        let err = dispatcher
            .handle_push(PushEnvelope {
                endpoint: Some(ENDPOINT_PROFILE.to_string()),
                id: Some(id.clone()),
                field: Some("level".to_string()),
                value: Some(json!("two")),
            })
            .unwrap_err();
        assert!(matches!(err, ServerError::Schema(_)));
        assert_eq!(
            pull(&dispatcher, &id).unwrap().fields,
            fields(json!({"level": 2, "name": "Ava"}))
        );

        assert!(matches!(
            pull(&dispatcher, "nonexistent-id").unwrap_err(),
            ServerError::NotFound(_)
        ));
    }

    #[test]
    fn concurrent_pushes_to_distinct_identities_make_progress() {
        let (dispatcher, _store) = dispatcher();
        let dispatcher = Arc::new(dispatcher);
        let ids: Vec<String> = (0..2).map(|_| create(&dispatcher)).collect();

        let handles: Vec<_> = ids
            .iter()
            .cloned()
            .map(|id| {
                let dispatcher = Arc::clone(&dispatcher);
                std::thread::spawn(move || {
                    for level in 0..50i64 {
                        dispatcher
                            .handle_push(PushEnvelope {
                                endpoint: Some(ENDPOINT_PROFILE.to_string()),
                                id: Some(id.clone()),
                                field: Some("level".to_string()),
                                value: Some(json!(level)),
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for id in &ids {
            let pulled = pull(&dispatcher, id).unwrap();
            assert_eq!(pulled.fields.get("level"), Some(&json!(49)));
        }
    }
}
