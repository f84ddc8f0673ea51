//! HTTP transport implementation.
//!
//! The actual HTTP client is abstracted via a trait so different
//! libraries (reqwest, ureq, hyper, ...) can be plugged in without
//! this crate depending on any of them. [`LoopbackClient`] wires the
//! transport directly to an in-process server for tests and embedded
//! setups.

use crate::error::{ClientError, ClientResult};
use crate::transport::ClientTransport;
use profiledb_protocol::{
    routes, CreateRequest, CreateResponse, ErrorBody, PullRequest, PullResponse, PushRequest,
    SchemaResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// A raw HTTP response: status code plus body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// The HTTP status code.
    pub status: u16,
    /// The response body.
    pub body: Vec<u8>,
}

impl HttpReply {
    /// Creates a reply.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Implementations should honor [`crate::ClientConfig::timeout`] and
/// must return `Err` only for transport-level failures; any response
/// the server actually produced, success or not, comes back as an
/// [`HttpReply`].
pub trait HttpClient: Send + Sync {
    /// Sends a GET request.
    fn get(&self, url: &str) -> Result<HttpReply, String>;

    /// Sends a POST request with a JSON body.
    fn post(&self, url: &str, body: Vec<u8>) -> Result<HttpReply, String>;
}

/// HTTP-based client transport.
///
/// Encodes requests as JSON and maps response statuses onto
/// [`ClientError`] variants.
pub struct HttpTransport<C: HttpClient> {
    base_url: String,
    client: C,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a transport against a base URL such as
    /// `http://localhost:26259`.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post_json<Req: Serialize>(&self, route: &str, request: &Req) -> ClientResult<HttpReply> {
        let body = serde_json::to_vec(request)
            .map_err(|e| ClientError::Protocol(format!("failed to encode request: {e}")))?;
        let url = format!("{}{}", self.base_url, route);
        self.client.post(&url, body).map_err(ClientError::Transport)
    }

    fn decode_body<Res: DeserializeOwned>(&self, route: &str, reply: &HttpReply) -> ClientResult<Res> {
        serde_json::from_slice(&reply.body).map_err(|e| {
            ClientError::Protocol(format!("failed to decode {route} response: {e}"))
        })
    }
}

/// Pulls the server's error message out of a failed reply body.
fn failure_message(status: u16, body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(body) => body.error,
        Err(_) => format!("server returned status {status}"),
    }
}

impl<C: HttpClient> ClientTransport for HttpTransport<C> {
    fn create(&self, request: &CreateRequest) -> ClientResult<CreateResponse> {
        let reply = self.post_json(routes::CREATE, request)?;
        if !reply.is_success() {
            return Err(ClientError::Rejected(failure_message(
                reply.status,
                &reply.body,
            )));
        }
        self.decode_body(routes::CREATE, &reply)
    }

    fn pull(&self, request: &PullRequest) -> ClientResult<PullResponse> {
        let reply = self.post_json(routes::PULL, request)?;
        if reply.is_success() {
            self.decode_body(routes::PULL, &reply)
        } else if reply.status == 404 {
            Err(ClientError::NotFound(request.id.clone()))
        } else {
            Err(ClientError::Rejected(failure_message(
                reply.status,
                &reply.body,
            )))
        }
    }

    fn push(&self, request: &PushRequest) -> ClientResult<()> {
        let reply = self.post_json(routes::PUSH, request)?;
        if reply.is_success() {
            Ok(())
        } else if reply.status == 404 {
            Err(ClientError::NotFound(request.id.clone()))
        } else {
            Err(ClientError::Rejected(failure_message(
                reply.status,
                &reply.body,
            )))
        }
    }

    fn fetch_schema(&self) -> ClientResult<SchemaResponse> {
        let url = format!("{}{}", self.base_url, routes::SCHEMA);
        let reply = self.client.get(&url).map_err(ClientError::Transport)?;
        if !reply.is_success() {
            return Err(ClientError::Protocol(format!(
                "schema fetch returned status {}",
                reply.status
            )));
        }
        self.decode_body(routes::SCHEMA, &reply)
    }
}

/// An in-process server reachable through [`LoopbackClient`].
///
/// Implementors receive the route path and the raw request body and
/// return the reply the HTTP binding would have produced.
pub trait LoopbackServer: Send + Sync {
    /// Handles one request.
    fn handle(&self, route: &str, body: &[u8]) -> HttpReply;
}

/// An [`HttpClient`] that calls a [`LoopbackServer`] directly, with no
/// network in between.
pub struct LoopbackClient<S: LoopbackServer> {
    server: Arc<S>,
}

impl<S: LoopbackServer> LoopbackClient<S> {
    /// Creates a loopback client around a server.
    pub fn new(server: Arc<S>) -> Self {
        Self { server }
    }
}

/// Strips the scheme and authority, leaving the route path.
fn route_of(url: &str) -> &str {
    let after_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };
    match after_scheme.find('/') {
        Some(idx) => &after_scheme[idx..],
        None => "/",
    }
}

impl<S: LoopbackServer> HttpClient for LoopbackClient<S> {
    fn get(&self, url: &str) -> Result<HttpReply, String> {
        Ok(self.server.handle(route_of(url), &[]))
    }

    fn post(&self, url: &str, body: Vec<u8>) -> Result<HttpReply, String> {
        Ok(self.server.handle(route_of(url), &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct CannedServer {
        reply: HttpReply,
    }

    impl LoopbackServer for CannedServer {
        fn handle(&self, _route: &str, _body: &[u8]) -> HttpReply {
            self.reply.clone()
        }
    }

    fn transport(reply: HttpReply) -> HttpTransport<LoopbackClient<CannedServer>> {
        let server = Arc::new(CannedServer { reply });
        HttpTransport::new("http://localhost:26259", LoopbackClient::new(server))
    }

    #[test]
    fn route_of_strips_authority() {
        assert_eq!(route_of("http://localhost:26259/pull"), "/pull");
        assert_eq!(route_of("https://profiles.example.com/schema"), "/schema");
        assert_eq!(route_of("http://localhost:26259"), "/");
    }

    #[test]
    fn trailing_slash_in_base_url_is_dropped() {
        let server = Arc::new(CannedServer {
            reply: HttpReply::new(204, Vec::new()),
        });
        let transport = HttpTransport::new("http://localhost:26259/", LoopbackClient::new(server));
        assert_eq!(transport.base_url(), "http://localhost:26259");
    }

    #[test]
    fn pull_missing_identity_maps_to_not_found() {
        let body = serde_json::to_vec(&json!({"error": "no record for identity \"abc\""})).unwrap();
        let transport = transport(HttpReply::new(404, body));
        let err = transport
            .pull(&PullRequest::new("profile", "abc"))
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound(id) if id == "abc"));
    }

    #[test]
    fn create_rejection_carries_server_message() {
        let body =
            serde_json::to_vec(&json!({"error": "missing required key 'level'"})).unwrap();
        let transport = transport(HttpReply::new(400, body));
        let err = transport.create(&CreateRequest::default()).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Rejected(msg) if msg == "missing required key 'level'"
        ));
    }

    #[test]
    fn push_no_content_is_ok() {
        let transport = transport(HttpReply::new(204, Vec::new()));
        transport
            .push(&PushRequest::new("profile", "abc", "level", json!(2)))
            .unwrap();
    }

    #[test]
    fn schema_decodes_tag_map() {
        let body = serde_json::to_vec(&json!({"level": "int", "name": "string"})).unwrap();
        let transport = transport(HttpReply::new(200, body));
        let schema = transport.fetch_schema().unwrap();
        assert_eq!(schema.get("level").map(String::as_str), Some("int"));
    }
}
