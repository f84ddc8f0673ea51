//! Record endpoints: the validate/get/set entry for one record kind.

use crate::error::{ServerError, ServerResult};
use profiledb_protocol::{CreateResponse, SchemaResponse, ENDPOINT_PROFILE};
use profiledb_schema::{FieldMap, SchemaRegistry};
use profiledb_store::ProfileStore;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// One record kind served by the dispatcher.
///
/// An endpoint owns the validation and storage of its record kind.
/// Registering an implementation under its [`name`](Self::name) is all
/// it takes to serve a new kind through the existing create/pull/push
/// operations.
pub trait RecordEndpoint: Send + Sync {
    /// The endpoint name requests select this handler with.
    fn name(&self) -> &'static str;

    /// Validates a full candidate record and, when valid, stores it
    /// under a freshly minted identity.
    ///
    /// # Errors
    ///
    /// [`ServerError::Validation`] when the candidate is missing
    /// declared fields or carries unknown or mistyped keys; the store
    /// gains no record in that case.
    fn create(&self, fields: FieldMap) -> ServerResult<CreateResponse>;

    /// Returns the stored record for `identity`.
    ///
    /// # Errors
    ///
    /// [`ServerError::NotFound`] when the identity is absent.
    fn get(&self, identity: &str) -> ServerResult<FieldMap>;

    /// Sets one field on the stored record for `identity`.
    ///
    /// # Errors
    ///
    /// [`ServerError::NotFound`] when the identity is absent,
    /// [`ServerError::Schema`] when the field is unknown or the value
    /// mistyped; the stored record is untouched in both cases.
    fn set(&self, identity: &str, field: &str, value: Value) -> ServerResult<()>;

    /// Returns the field-name to type-tag map for this record kind.
    fn schema(&self) -> SchemaResponse;
}

/// The profile record kind.
///
/// Records are stored as the JSON encoding of the field map; the
/// store itself never interprets them.
pub struct ProfileEndpoint {
    registry: Arc<SchemaRegistry>,
    store: Arc<dyn ProfileStore>,
}

impl ProfileEndpoint {
    /// Creates the profile endpoint over a registry and a store.
    pub fn new(registry: Arc<SchemaRegistry>, store: Arc<dyn ProfileStore>) -> Self {
        Self { registry, store }
    }

    /// Mints a fresh identity token: opaque, URL-safe, unused.
    ///
    /// Collisions are vanishingly unlikely but the store is still
    /// consulted so an identity is never reassigned.
    fn mint_identity(&self) -> ServerResult<String> {
        loop {
            let identity = Uuid::new_v4().simple().to_string();
            if !self.store.contains(&identity)? {
                return Ok(identity);
            }
        }
    }

    fn encode(&self, identity: &str, fields: &FieldMap) -> ServerResult<Vec<u8>> {
        serde_json::to_vec(fields).map_err(|e| {
            ServerError::Internal(format!("failed to encode record for {identity:?}: {e}"))
        })
    }

    fn decode(&self, identity: &str, record: &[u8]) -> ServerResult<FieldMap> {
        serde_json::from_slice(record).map_err(|e| {
            ServerError::Internal(format!("stored record for {identity:?} is not valid: {e}"))
        })
    }
}

impl RecordEndpoint for ProfileEndpoint {
    fn name(&self) -> &'static str {
        ENDPOINT_PROFILE
    }

    fn create(&self, fields: FieldMap) -> ServerResult<CreateResponse> {
        self.registry
            .check_profile(&fields)
            .map_err(ServerError::Validation)?;

        let identity = self.mint_identity()?;
        let record = self.encode(&identity, &fields)?;
        self.store.put(&identity, &record)?;

        tracing::info!(identity = %identity, fields = fields.len(), "profile created");
        Ok(CreateResponse::new(identity, fields))
    }

    fn get(&self, identity: &str) -> ServerResult<FieldMap> {
        let record = self
            .store
            .get(identity)?
            .ok_or_else(|| ServerError::NotFound(identity.to_string()))?;
        self.decode(identity, &record)
    }

    fn set(&self, identity: &str, field: &str, value: Value) -> ServerResult<()> {
        let mut fields = self.get(identity)?;
        self.registry.check_field(field, &value)?;

        fields.insert(field.to_string(), value);
        let record = self.encode(identity, &fields)?;
        self.store.put(identity, &record)?;

        tracing::debug!(identity = %identity, field = %field, "profile field updated");
        Ok(())
    }

    fn schema(&self) -> SchemaResponse {
        self.registry.to_tag_map()
    }
}
