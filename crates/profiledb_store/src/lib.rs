//! # profiledb Store
//!
//! Durable identity-to-record storage for profiledb.
//!
//! A [`ProfileStore`] is an **opaque record store**: a mapping from an
//! identity string to a serialized record blob. The store does not
//! interpret the bytes it holds - schema validation and encoding are
//! owned entirely by the layer above.
//!
//! ## Design principles
//!
//! - Stores are simple blob maps (get, put, contains)
//! - No knowledge of profile fields, schemas, or wire formats
//! - Must be `Send + Sync` for concurrent access
//! - Writes to one identity serialize; distinct identities never
//!   block each other
//!
//! ## Available stores
//!
//! - [`MemoryStore`] - For tests and ephemeral deployments
//! - [`FileStore`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use profiledb_store::{MemoryStore, ProfileStore};
//!
//! let store = MemoryStore::new();
//! store.put("id-1", b"{\"level\":1}").unwrap();
//! assert_eq!(store.get("id-1").unwrap().unwrap(), b"{\"level\":1}");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::ProfileStore;
