//! Stream client — append-only writes and resilient forward reads.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use eventline_core::error::{StoreError, TransportError};
use eventline_core::event::{DomainEvent, EventMetadata, RecordedEvent};
use eventline_core::registry::EventTypeRegistry;
use eventline_core::transport::{StreamTransport, WireEvent};

/// Bounded retry policy for transient read failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum consecutive failed attempts on one position before the read
    /// gives up with [`StoreError::RetryExhausted`].
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            delay: Duration::from_secs(10),
        }
    }
}

/// Hook observing failures the client considers fatal: unauthorized reads
/// and decode failures on registered types. The default hook logs; a host
/// that wants the process to halt installs a hook that exits.
pub type FatalHook = Arc<dyn Fn(&StoreError) + Send + Sync>;

/// Wraps the physical store connection together with the event type
/// registry, exposing single-event appends and ordered forward reads.
pub struct StreamClient {
    transport: Box<dyn StreamTransport>,
    registry: EventTypeRegistry,
    retry: RetryPolicy,
    fatal: FatalHook,
}

impl StreamClient {
    /// Creates a client over `transport` with the given registry and the
    /// default retry policy.
    #[must_use]
    pub fn new(transport: Box<dyn StreamTransport>, registry: EventTypeRegistry) -> Self {
        Self {
            transport,
            registry,
            retry: RetryPolicy::default(),
            fatal: Arc::new(|err| tracing::error!(error = %err, "fatal store failure")),
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the fatal hook.
    #[must_use]
    pub fn with_fatal_hook(mut self, fatal: FatalHook) -> Self {
        self.fatal = fatal;
        self
    }

    /// Appends `event` to the stream named by its aggregate id and returns
    /// the assigned position. The event is durably stored before this
    /// returns successfully. Writes are never retried: without
    /// deduplication a blind retry could append the same event twice.
    ///
    /// # Errors
    ///
    /// Any store-level write failure, passed through unmodified.
    pub async fn append(
        &self,
        event: &dyn DomainEvent,
        metadata: EventMetadata,
    ) -> Result<i64, StoreError> {
        let stream_id = event.aggregate_id();
        let wire = WireEvent {
            event_id: Uuid::new_v4(),
            event_type: event.event_type().to_owned(),
            payload: event.to_payload(),
            metadata,
        };
        let position = self
            .transport
            .append(stream_id, wire)
            .await
            .map_err(|err| StoreError::from_transport(err, stream_id))?;
        tracing::debug!(
            stream_id,
            position,
            event_type = event.event_type(),
            "appended event"
        );
        Ok(position)
    }

    /// Reads `stream_id` forward from the beginning, invoking `on_event`
    /// once per decoded event in strict stream order. Events whose type is
    /// absent from the registry are skipped without a callback. The `bool`
    /// passed to `on_event` is reserved for end-of-stream signaling and is
    /// always `false`.
    ///
    /// # Errors
    ///
    /// [`StoreError::StreamNotFound`] when the stream does not exist,
    /// [`StoreError::RetryExhausted`] when transient failures outlast the
    /// retry policy, [`StoreError::Unauthorized`] / [`StoreError::Decode`]
    /// after notifying the fatal hook, and [`StoreError::Backend`] for
    /// anything else.
    pub async fn read_all<F>(&self, stream_id: &str, on_event: F) -> Result<(), StoreError>
    where
        F: FnMut(RecordedEvent, bool),
    {
        self.read_all_with_cancel(stream_id, &CancellationToken::new(), on_event)
            .await
    }

    /// Same as [`Self::read_all`] with an explicit cancellation signal: a
    /// token cancelled while the client waits out a transient failure
    /// aborts the read with [`StoreError::Cancelled`].
    ///
    /// # Errors
    ///
    /// As for [`Self::read_all`], plus [`StoreError::Cancelled`].
    pub async fn read_all_with_cancel<F>(
        &self,
        stream_id: &str,
        cancel: &CancellationToken,
        mut on_event: F,
    ) -> Result<(), StoreError>
    where
        F: FnMut(RecordedEvent, bool),
    {
        let mut position: i64 = 0;
        let mut failures: u32 = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(StoreError::Cancelled(stream_id.to_owned()));
            }
            match self.transport.read_at(stream_id, position).await {
                Ok(Some(raw)) => {
                    failures = 0;
                    position += 1;
                    match self.registry.decode(&raw.event_type, raw.payload) {
                        Some(Ok(event)) => on_event(
                            RecordedEvent {
                                event,
                                metadata: raw.metadata,
                            },
                            false,
                        ),
                        Some(Err(source)) => {
                            let err = StoreError::Decode {
                                event_type: raw.event_type,
                                source,
                            };
                            (self.fatal)(&err);
                            return Err(err);
                        }
                        None => {
                            tracing::debug!(
                                stream_id,
                                event_type = %raw.event_type,
                                "skipping event with unregistered type"
                            );
                        }
                    }
                }
                Ok(None) => return Ok(()),
                Err(TransportError::Unavailable(reason)) => {
                    failures += 1;
                    if failures >= self.retry.max_attempts {
                        return Err(StoreError::RetryExhausted {
                            stream_id: stream_id.to_owned(),
                            attempts: failures,
                        });
                    }
                    tracing::info!(
                        stream_id,
                        position,
                        %reason,
                        delay_ms = self.retry.delay.as_millis(),
                        "store not ready, retrying same position after delay"
                    );
                    tokio::select! {
                        () = cancel.cancelled() => {
                            return Err(StoreError::Cancelled(stream_id.to_owned()));
                        }
                        () = tokio::time::sleep(self.retry.delay) => {}
                    }
                }
                Err(TransportError::StreamNotFound(_)) => {
                    tracing::error!(stream_id, "stream not found");
                    return Err(StoreError::StreamNotFound(stream_id.to_owned()));
                }
                Err(TransportError::Unauthorized(reason)) => {
                    tracing::error!(stream_id, %reason, "read not authorized");
                    let err = StoreError::Unauthorized(stream_id.to_owned());
                    (self.fatal)(&err);
                    return Err(err);
                }
                Err(TransportError::Backend(reason)) => {
                    return Err(StoreError::Backend(reason));
                }
            }
        }
    }
}
