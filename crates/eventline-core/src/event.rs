//! Domain event abstractions.

use std::any::Any;
use std::collections::HashMap;

/// String key/value pairs attached to an event at write time (for example
/// causation and correlation identifiers), read back alongside it.
pub type EventMetadata = HashMap<String, String>;

/// Trait that all domain events implement.
///
/// An event is an immutable fact about an aggregate. Once appended to its
/// stream it is never mutated or deleted; ordering within the stream is the
/// sole source of truth for aggregate state.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the identifier of the aggregate — and therefore the stream —
    /// this event belongs to.
    fn aggregate_id(&self) -> &str;

    /// Returns the event type tag, used for registry lookup and wire
    /// identification.
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Upcasts to [`Any`] so aggregates can downcast replayed events to
    /// their concrete types.
    fn as_any(&self) -> &dyn Any;
}

/// A decoded event read back from a stream, together with the metadata it
/// was written with.
#[derive(Debug)]
pub struct RecordedEvent {
    /// The decoded domain event.
    pub event: Box<dyn DomainEvent>,
    /// Metadata attached at write time.
    pub metadata: EventMetadata,
}
