//! Raw stream-store transport abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::TransportError;
use crate::event::EventMetadata;

/// Store-level envelope for a single write: `{id, type, data, metadata}`.
#[derive(Debug, Clone)]
pub struct WireEvent {
    /// Unique identifier assigned for this write.
    pub event_id: Uuid,
    /// Event type tag.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Metadata attached at write time.
    pub metadata: EventMetadata,
}

/// A raw stored event read back from a stream position.
#[derive(Debug, Clone)]
pub struct RawEvent {
    /// Unique identifier assigned at write time.
    pub event_id: Uuid,
    /// Event type tag.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Metadata attached at write time.
    pub metadata: EventMetadata,
    /// Zero-based position within the stream.
    pub position: i64,
    /// When the store recorded the event.
    pub recorded_at: DateTime<Utc>,
}

/// The physical store connection underneath the stream client.
///
/// Implementations delegate thread safety to their backing connection; the
/// stream client imposes no additional locking on top.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    /// Durably appends one event at the next position of `stream_id` and
    /// returns the assigned position. Positions within a stream are
    /// strictly monotonic. No error means the event is committed.
    ///
    /// # Errors
    ///
    /// Any store-level write failure, classified per [`TransportError`].
    async fn append(&self, stream_id: &str, event: WireEvent) -> Result<i64, TransportError>;

    /// Reads the event at `position` of `stream_id`. `Ok(None)` signals the
    /// end of the stream.
    ///
    /// # Errors
    ///
    /// [`TransportError::StreamNotFound`] when the stream does not exist;
    /// other failures classified per [`TransportError`].
    async fn read_at(
        &self,
        stream_id: &str,
        position: i64,
    ) -> Result<Option<RawEvent>, TransportError>;
}
