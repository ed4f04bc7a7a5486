//! Event type registry — tag-routed event decoding.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::event::DomainEvent;

type DecodeFn =
    Box<dyn Fn(serde_json::Value) -> Result<Box<dyn DomainEvent>, serde_json::Error> + Send + Sync>;

/// Maps event type tags to decode functions producing typed events.
///
/// The registry is populated once, before any read occurs, and is read-only
/// once handed to the stream client — concurrent lookups need no locking.
/// An unregistered tag is not an error: readers skip events written by
/// newer process versions.
#[derive(Default)]
pub struct EventTypeRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl EventTypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the decode function for `event_type`. Registering a tag
    /// again replaces the earlier decoder.
    pub fn register<E>(&mut self, event_type: &str)
    where
        E: DomainEvent + DeserializeOwned + 'static,
    {
        self.decoders.insert(
            event_type.to_owned(),
            Box::new(|payload: serde_json::Value| {
                let event: E = serde_json::from_value(payload)?;
                Ok(Box::new(event) as Box<dyn DomainEvent>)
            }),
        );
    }

    /// Returns whether `event_type` has a registered decoder.
    #[must_use]
    pub fn contains(&self, event_type: &str) -> bool {
        self.decoders.contains_key(event_type)
    }

    /// Decodes `payload` as `event_type`.
    ///
    /// Returns `None` for an unregistered tag (the caller skips the event).
    /// `Some(Err)` means the payload does not match the registered type — a
    /// serialization contract violation, not a recoverable condition.
    #[must_use]
    pub fn decode(
        &self,
        event_type: &str,
        payload: serde_json::Value,
    ) -> Option<Result<Box<dyn DomainEvent>, serde_json::Error>> {
        self.decoders.get(event_type).map(|decode| decode(payload))
    }
}
