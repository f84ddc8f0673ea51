//! # profiledb Client
//!
//! Client-side profile mirror and transport abstraction for profiledb.
//!
//! This crate provides:
//! - [`ProfileClient`]: creates or binds a profile over a transport
//!   and keeps the identity token cached on disk
//! - [`ProfileMirror`]: the local cached copy of one profile;
//!   field reads never touch the network, field writes validate
//!   locally, update the cache optimistically and push the single
//!   changed field in the background
//! - [`ClientTransport`]: the network seam, with an
//!   [`HttpTransport`]/[`HttpClient`] pair for HTTP bindings and a
//!   loopback implementation for in-process wiring
//!
//! ## Consistency model
//!
//! The server is the authority and re-validates every push
//! independently; the mirror is an optimistic local view. Background
//! pushes are fire-and-forget: transport failures and server-side
//! rejections after local acceptance are logged but not surfaced
//! through [`ProfileMirror::set_field`]. A push is attempted at most
//! once - there is no retry.
//!
//! A single mirror is not safe for concurrent field writes from
//! multiple callers without external serialization; the design
//! assumes one writer per mirror.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod cache;
mod client;
mod config;
mod error;
mod http;
mod mirror;
mod transport;

pub use cache::IdentityCache;
pub use client::ProfileClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, HttpReply, HttpTransport, LoopbackClient, LoopbackServer};
pub use mirror::ProfileMirror;
pub use transport::{ClientTransport, MockTransport};
