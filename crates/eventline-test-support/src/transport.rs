//! Test transports — scriptable in-memory `StreamTransport` implementations.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use eventline_core::error::TransportError;
use eventline_core::transport::{RawEvent, StreamTransport, WireEvent};

#[derive(Debug, Default)]
struct Inner {
    streams: HashMap<String, Vec<RawEvent>>,
    read_faults: HashMap<(String, i64), VecDeque<TransportError>>,
    append_faults: HashMap<usize, TransportError>,
    appends_seen: usize,
}

/// An in-memory stream store with scriptable failures.
///
/// Appends and reads behave like a real store: streams are created on first
/// append, positions are assigned monotonically from zero, and reading past
/// the end returns `None`. Faults queued with
/// [`InMemoryStreamTransport::push_read_fault`] are consumed one per
/// matching read, and [`InMemoryStreamTransport::fail_append_at`] fails a
/// single append call — which makes transient-retry and partial-commit
/// scenarios deterministic. Clones share the same underlying store, so
/// tests keep a handle after boxing one for the client.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStreamTransport {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStreamTransport {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `stream_id` with zero events, so it exists but reads empty.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn create_stream(&self, stream_id: &str) {
        self.lock().streams.entry(stream_id.to_owned()).or_default();
    }

    /// Queues `error` for the next read of `stream_id` at `position`. Each
    /// queued fault is consumed by exactly one read.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push_read_fault(&self, stream_id: &str, position: i64, error: TransportError) {
        self.lock()
            .read_faults
            .entry((stream_id.to_owned(), position))
            .or_default()
            .push_back(error);
    }

    /// Makes the `index`-th append call (zero-based, counted across all
    /// streams) fail with `error`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_append_at(&self, index: usize, error: TransportError) {
        self.lock().append_faults.insert(index, error);
    }

    /// Returns a snapshot of the events stored in `stream_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn events(&self, stream_id: &str) -> Vec<RawEvent> {
        self.lock()
            .streams
            .get(stream_id)
            .cloned()
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

#[async_trait]
impl StreamTransport for InMemoryStreamTransport {
    async fn append(&self, stream_id: &str, event: WireEvent) -> Result<i64, TransportError> {
        let mut inner = self.lock();
        let index = inner.appends_seen;
        inner.appends_seen += 1;
        if let Some(error) = inner.append_faults.remove(&index) {
            return Err(error);
        }
        let stream = inner.streams.entry(stream_id.to_owned()).or_default();
        let position = i64::try_from(stream.len()).expect("stream length fits in i64");
        stream.push(RawEvent {
            event_id: event.event_id,
            event_type: event.event_type,
            payload: event.payload,
            metadata: event.metadata,
            position,
            recorded_at: Utc::now(),
        });
        Ok(position)
    }

    async fn read_at(
        &self,
        stream_id: &str,
        position: i64,
    ) -> Result<Option<RawEvent>, TransportError> {
        let mut inner = self.lock();
        if let Some(queue) = inner
            .read_faults
            .get_mut(&(stream_id.to_owned(), position))
        {
            if let Some(error) = queue.pop_front() {
                return Err(error);
            }
        }
        match inner.streams.get(stream_id) {
            Some(stream) => {
                let index = usize::try_from(position).ok();
                Ok(index.and_then(|at| stream.get(at)).cloned())
            }
            None => Err(TransportError::StreamNotFound(stream_id.to_owned())),
        }
    }
}

/// A transport where every call fails with a clone of the configured
/// error. Useful for write-failure passthrough scenarios.
#[derive(Debug, Clone)]
pub struct FailingStreamTransport {
    error: TransportError,
}

impl FailingStreamTransport {
    /// Creates a transport that always fails with `error`.
    #[must_use]
    pub fn new(error: TransportError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl StreamTransport for FailingStreamTransport {
    async fn append(&self, _stream_id: &str, _event: WireEvent) -> Result<i64, TransportError> {
        Err(self.error.clone())
    }

    async fn read_at(
        &self,
        _stream_id: &str,
        _position: i64,
    ) -> Result<Option<RawEvent>, TransportError> {
        Err(self.error.clone())
    }
}
