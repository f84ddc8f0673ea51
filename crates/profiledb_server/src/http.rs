//! Reference HTTP binding.
//!
//! Maps the dispatcher onto the routes and statuses of the protocol
//! contract. Everything interesting happens in the dispatcher; this
//! module only translates bodies and statuses.

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::error::ServerError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use profiledb_protocol::{routes, CreateRequest, ErrorBody, PullEnvelope, PushEnvelope, ENDPOINT_PROFILE};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the router for a dispatcher.
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route(routes::CREATE, post(create))
        .route(routes::PULL, get(pull).post(pull))
        .route(routes::PUSH, post(push))
        .route(routes::SCHEMA, get(schema))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}

/// Binds the router and serves until the process is stopped.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or serving fails.
pub async fn serve(config: &ServerConfig, dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "profile server listening");
    axum::serve(listener, router(dispatcher)).await
}

async fn create(
    State(dispatcher): State<Arc<Dispatcher>>,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return unstructured_body(&rejection),
    };
    match dispatcher.handle_create(ENDPOINT_PROFILE, request) {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn pull(
    State(dispatcher): State<Arc<Dispatcher>>,
    body: Result<Json<PullEnvelope>, JsonRejection>,
) -> Response {
    let Json(envelope) = match body {
        Ok(body) => body,
        Err(rejection) => return unstructured_body(&rejection),
    };
    match dispatcher.handle_pull(envelope) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn push(
    State(dispatcher): State<Arc<Dispatcher>>,
    body: Result<Json<PushEnvelope>, JsonRejection>,
) -> Response {
    let Json(envelope) = match body {
        Ok(body) => body,
        Err(rejection) => return unstructured_body(&rejection),
    };
    match dispatcher.handle_push(envelope) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(&err),
    }
}

async fn schema(State(dispatcher): State<Arc<Dispatcher>>) -> Response {
    match dispatcher.handle_schema(ENDPOINT_PROFILE) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(&err),
    }
}

fn unstructured_body(rejection: &JsonRejection) -> Response {
    let body = ErrorBody::message(format!(
        "request body must be application/json: {rejection}"
    ));
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn error_response(err: &ServerError) -> Response {
    if !err.is_client_error() {
        tracing::error!(error = %err, "request failed");
    }
    let status = StatusCode::from_u16(err.status().code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err.error_body())).into_response()
}
