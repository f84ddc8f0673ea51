//! Transport layer abstraction.

use crate::error::{ClientError, ClientResult};
use parking_lot::Mutex;
use profiledb_protocol::{
    CreateRequest, CreateResponse, PullRequest, PullResponse, PushRequest, SchemaResponse,
};

/// Network communication with the profile server.
///
/// This trait abstracts the network layer, allowing different
/// implementations (HTTP via [`crate::HttpTransport`], loopback for
/// tests, or any other RPC mechanism that carries the protocol).
pub trait ClientTransport: Send + Sync {
    /// Creates a new record on the server.
    ///
    /// # Errors
    ///
    /// Transport failures and server rejections are surfaced.
    fn create(&self, request: &CreateRequest) -> ClientResult<CreateResponse>;

    /// Fetches the full record for an identity.
    ///
    /// # Errors
    ///
    /// Transport failures and server rejections are surfaced.
    fn pull(&self, request: &PullRequest) -> ClientResult<PullResponse>;

    /// Sets one field on an existing record.
    ///
    /// # Errors
    ///
    /// Transport failures and server rejections are surfaced to the
    /// immediate caller; the mirror's background worker logs and
    /// swallows them.
    fn push(&self, request: &PushRequest) -> ClientResult<()>;

    /// Fetches the server's field-name to type-tag map.
    ///
    /// # Errors
    ///
    /// Transport failures are surfaced.
    fn fetch_schema(&self) -> ClientResult<SchemaResponse>;
}

/// A scripted transport for tests.
///
/// Responses are set up front; every push is recorded so tests can
/// assert exactly which network calls were made.
#[derive(Default)]
pub struct MockTransport {
    create_response: Mutex<Option<ClientResult<CreateResponse>>>,
    pull_response: Mutex<Option<ClientResult<PullResponse>>>,
    push_result: Mutex<Option<ClientResult<()>>>,
    schema_response: Mutex<Option<SchemaResponse>>,
    pushes: Mutex<Vec<PushRequest>>,
}

impl MockTransport {
    /// Creates a mock with no responses scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the create response.
    pub fn set_create_response(&self, response: ClientResult<CreateResponse>) {
        *self.create_response.lock() = Some(response);
    }

    /// Scripts the pull response.
    pub fn set_pull_response(&self, response: ClientResult<PullResponse>) {
        *self.pull_response.lock() = Some(response);
    }

    /// Scripts the push result. Pushes succeed when nothing is scripted.
    pub fn set_push_result(&self, result: ClientResult<()>) {
        *self.push_result.lock() = Some(result);
    }

    /// Scripts the schema response.
    pub fn set_schema_response(&self, response: SchemaResponse) {
        *self.schema_response.lock() = Some(response);
    }

    /// Returns every push request seen so far.
    pub fn pushes(&self) -> Vec<PushRequest> {
        self.pushes.lock().clone()
    }
}

impl ClientTransport for MockTransport {
    fn create(&self, _request: &CreateRequest) -> ClientResult<CreateResponse> {
        self.create_response
            .lock()
            .take()
            .unwrap_or_else(|| Err(ClientError::Protocol("no mock create response set".into())))
    }

    fn pull(&self, _request: &PullRequest) -> ClientResult<PullResponse> {
        self.pull_response
            .lock()
            .take()
            .unwrap_or_else(|| Err(ClientError::Protocol("no mock pull response set".into())))
    }

    fn push(&self, request: &PushRequest) -> ClientResult<()> {
        self.pushes.lock().push(request.clone());
        self.push_result.lock().take().unwrap_or(Ok(()))
    }

    fn fetch_schema(&self) -> ClientResult<SchemaResponse> {
        self.schema_response
            .lock()
            .clone()
            .ok_or_else(|| ClientError::Protocol("no mock schema response set".into()))
    }
}
