//! The local profile mirror.
//!
//! A mirror holds a full copy of one record's fields. Reads are
//! answered from the copy without touching the network. Writes are
//! validated against the client-held schema first; an accepted write
//! updates the copy immediately and hands a single-field push to a
//! background worker. The worker sends pushes in the order the writes
//! were issued and logs failures instead of surfacing them.

use crate::error::{ClientError, ClientResult};
use crate::transport::ClientTransport;
use parking_lot::{Condvar, Mutex, RwLock};
use profiledb_protocol::{PushRequest, ENDPOINT_PROFILE};
use profiledb_schema::{FieldMap, SchemaRegistry};
use serde_json::Value;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

/// Counts pushes that have been queued but not yet attempted.
#[derive(Debug, Default)]
struct PushTracker {
    pending: Mutex<usize>,
    idle: Condvar,
}

impl PushTracker {
    fn begin(&self) {
        *self.pending.lock() += 1;
    }

    fn finish(&self) {
        let mut pending = self.pending.lock();
        *pending -= 1;
        if *pending == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self) {
        let mut pending = self.pending.lock();
        while *pending > 0 {
            self.idle.wait(&mut pending);
        }
    }
}

/// The cached local copy of one server-side record.
#[derive(Debug)]
pub struct ProfileMirror {
    identity: String,
    schema: SchemaRegistry,
    fields: RwLock<FieldMap>,
    queue: Option<mpsc::Sender<PushRequest>>,
    tracker: Arc<PushTracker>,
    worker: Option<thread::JoinHandle<()>>,
}

impl ProfileMirror {
    /// Creates a mirror and starts its push worker.
    pub(crate) fn new(
        identity: impl Into<String>,
        schema: SchemaRegistry,
        fields: FieldMap,
        transport: Arc<dyn ClientTransport>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel::<PushRequest>();
        let tracker = Arc::new(PushTracker::default());
        let worker_tracker = Arc::clone(&tracker);
        let worker = thread::spawn(move || {
            while let Ok(request) = receiver.recv() {
                if let Err(err) = transport.push(&request) {
                    tracing::warn!(
                        field = %request.field,
                        error = %err,
                        "background push failed; local copy and server now differ"
                    );
                }
                worker_tracker.finish();
            }
        });
        Self {
            identity: identity.into(),
            schema,
            fields: RwLock::new(fields),
            queue: Some(sender),
            tracker,
            worker: Some(worker),
        }
    }

    /// Returns the bound identity token.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns the schema this mirror validates against.
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Reads a field from the local copy. Never touches the network.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnknownField`] when the field is not in
    /// the local copy.
    pub fn get_field(&self, field: &str) -> ClientResult<Value> {
        self.fields
            .read()
            .get(field)
            .cloned()
            .ok_or_else(|| ClientError::UnknownField {
                field: field.to_string(),
            })
    }

    /// Writes a field: validates locally, updates the local copy and
    /// queues a background push of just this field.
    ///
    /// A validation failure leaves the local copy untouched and makes
    /// no network call. A success means the write was accepted
    /// locally; whether the push later reaches the server is not
    /// reported here.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Schema`] when the field is undeclared or
    /// the value has the wrong type.
    pub fn set_field(&self, field: &str, value: Value) -> ClientResult<()> {
        self.schema.check_field(field, &value)?;
        self.fields
            .write()
            .insert(field.to_string(), value.clone());

        let request = PushRequest::new(ENDPOINT_PROFILE, &self.identity, field, value);
        self.tracker.begin();
        match &self.queue {
            Some(queue) if queue.send(request).is_ok() => Ok(()),
            _ => {
                self.tracker.finish();
                Err(ClientError::Transport("push worker is gone".into()))
            }
        }
    }

    /// Returns a snapshot of the full local copy.
    pub fn fields(&self) -> FieldMap {
        self.fields.read().clone()
    }

    /// Replaces the local copy wholesale, e.g. after a fresh pull.
    pub(crate) fn reset_fields(&self, fields: FieldMap) {
        *self.fields.write() = fields;
    }

    /// Blocks until every queued push has been attempted.
    ///
    /// Attempted, not delivered: a push that failed still counts as
    /// done. Useful before shutdown and in tests.
    pub fn flush(&self) {
        self.tracker.wait_idle();
    }
}

impl Drop for ProfileMirror {
    fn drop(&mut self) {
        // Close the queue so the worker's recv loop ends, then wait
        // for queued pushes to finish.
        self.queue.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
