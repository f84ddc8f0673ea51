//! The profile client.
//!
//! Owns the transport, the identity cache and the bound mirror.
//! Binding happens once per client: either a fresh create or a pull
//! of a previously assigned identity.

use crate::cache::IdentityCache;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::mirror::ProfileMirror;
use crate::transport::ClientTransport;
use profiledb_protocol::{CreateRequest, PullRequest, ENDPOINT_PROFILE};
use profiledb_schema::{FieldMap, SchemaRegistry};
use std::sync::Arc;

/// Client for one profile record.
///
/// The client binds to exactly one record. `create_or_bind` prefers
/// the identity cached on disk from an earlier run; only when there
/// is none (or the server no longer knows it) does it create a fresh
/// record from the supplied defaults.
pub struct ProfileClient {
    transport: Arc<dyn ClientTransport>,
    cache: IdentityCache,
    schema: SchemaRegistry,
    mirror: Option<Arc<ProfileMirror>>,
    default_fields: Option<FieldMap>,
    autosave: bool,
}

impl ProfileClient {
    /// Creates a client with a locally known schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity cache directory cannot be
    /// created.
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn ClientTransport>,
        schema: SchemaRegistry,
    ) -> ClientResult<Self> {
        let cache = IdentityCache::open(&config.cache_dir)?;
        Ok(Self {
            transport,
            cache,
            schema,
            mirror: None,
            default_fields: None,
            autosave: true,
        })
    }

    /// Creates a client that fetches the schema from the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema fetch fails, the served tag map
    /// is malformed, or the identity cache directory cannot be
    /// created.
    pub fn with_remote_schema(
        config: &ClientConfig,
        transport: Arc<dyn ClientTransport>,
    ) -> ClientResult<Self> {
        let tags = transport.fetch_schema()?;
        let schema = SchemaRegistry::from_tag_map(&tags)?;
        Self::new(config, transport, schema)
    }

    /// Sets the field values used when [`Self::profile`] has to bind
    /// lazily.
    #[must_use]
    pub fn with_defaults(mut self, defaults: FieldMap) -> Self {
        self.default_fields = Some(defaults);
        self
    }

    /// Controls whether the identity is written back to the cache on
    /// every successful bind. On by default.
    #[must_use]
    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Returns the schema this client validates against.
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Returns the bound identity, falling back to the cached one.
    pub fn identity(&self) -> Option<String> {
        if let Some(mirror) = &self.mirror {
            return Some(mirror.identity().to_string());
        }
        self.cache.load().ok().flatten()
    }

    /// Binds to the cached identity when one exists, creating a new
    /// record from `defaults` otherwise.
    ///
    /// A cached identity the server no longer knows also falls back to
    /// a fresh create.
    ///
    /// # Errors
    ///
    /// Surfaces transport failures and server-side create rejections.
    pub fn create_or_bind(&mut self, defaults: FieldMap) -> ClientResult<Arc<ProfileMirror>> {
        if let Some(mirror) = &self.mirror {
            return Ok(Arc::clone(mirror));
        }
        if let Some(identity) = self.cache.load()? {
            match self.bind_by_pull(&identity) {
                Ok(mirror) => return Ok(mirror),
                Err(ClientError::NotFound(_)) => {
                    tracing::info!(
                        identity = %identity,
                        "cached identity is unknown to the server; creating a new record"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        let response = self.transport.create(&CreateRequest::new(defaults))?;
        self.bind(response.id, response.fields)
    }

    /// Binds to a known identity by pulling its record.
    ///
    /// # Errors
    ///
    /// Surfaces transport failures; [`ClientError::NotFound`] when the
    /// server does not know the identity.
    pub fn bind_by_pull(&mut self, identity: &str) -> ClientResult<Arc<ProfileMirror>> {
        let request = PullRequest::new(ENDPOINT_PROFILE, identity);
        let response = self.transport.pull(&request)?;
        self.bind(identity.to_string(), response.fields)
    }

    /// Returns the bound mirror, binding lazily with the configured
    /// defaults when nothing is bound yet.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotBound`] when unbound and no defaults
    /// were configured.
    pub fn profile(&mut self) -> ClientResult<Arc<ProfileMirror>> {
        if let Some(mirror) = &self.mirror {
            return Ok(Arc::clone(mirror));
        }
        tracing::warn!("profile accessed before create_or_bind; binding lazily");
        match self.default_fields.clone() {
            Some(defaults) => self.create_or_bind(defaults),
            None => Err(ClientError::NotBound),
        }
    }

    /// Writes the bound identity to the on-disk cache.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotBound`] when nothing is bound, or the
    /// underlying I/O error.
    pub fn save_identity(&self) -> ClientResult<()> {
        match &self.mirror {
            Some(mirror) => Ok(self.cache.save(mirror.identity())?),
            None => Err(ClientError::NotBound),
        }
    }

    /// Drains queued pushes and unbinds.
    ///
    /// With autosave on, the identity is written back to the cache
    /// first. Safe to call when nothing is bound.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from the identity save, if any.
    pub fn close(&mut self) -> ClientResult<()> {
        if let Some(mirror) = self.mirror.take() {
            if self.autosave {
                self.cache.save(mirror.identity())?;
            }
            mirror.flush();
        }
        Ok(())
    }

    fn bind(&mut self, identity: String, fields: FieldMap) -> ClientResult<Arc<ProfileMirror>> {
        if self.autosave {
            self.cache.save(&identity)?;
        }
        let mirror = Arc::new(ProfileMirror::new(
            identity,
            self.schema.clone(),
            fields,
            Arc::clone(&self.transport),
        ));
        self.mirror = Some(Arc::clone(&mirror));
        Ok(mirror)
    }
}
