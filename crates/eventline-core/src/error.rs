//! Error types for the persistence layer.

use thiserror::Error;

/// Classified failures reported by a stream transport implementation.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The store is temporarily unreachable; the same operation is expected
    /// to succeed once the store recovers.
    #[error("store temporarily unavailable: {0}")]
    Unavailable(String),

    /// The named stream does not exist.
    #[error("stream not found: {0}")]
    StreamNotFound(String),

    /// The store rejected the caller's credentials.
    #[error("not authorized for stream {0}")]
    Unauthorized(String),

    /// Any other store failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Failures surfaced to stream client and repository callers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named stream does not exist — for example, the aggregate has no
    /// events yet. Recoverable by the caller.
    #[error("stream not found: {0}")]
    StreamNotFound(String),

    /// Access to the stream was rejected. Authorization failures never
    /// occur in steady-state operation and indicate a deployment defect;
    /// the fatal hook observes this before it is returned.
    #[error("not authorized for stream {0}")]
    Unauthorized(String),

    /// The retry budget for transient read failures ran out.
    #[error("gave up reading stream {stream_id} after {attempts} attempts")]
    RetryExhausted {
        /// The stream the read was against.
        stream_id: String,
        /// How many consecutive attempts failed.
        attempts: u32,
    },

    /// The read was cancelled while waiting to retry.
    #[error("read of stream {0} cancelled")]
    Cancelled(String),

    /// A registered event type failed to decode: the stored schema and the
    /// in-process registry have diverged. The fatal hook observes this
    /// before it is returned.
    #[error("failed to decode event of registered type {event_type}")]
    Decode {
        /// The tag the payload was stored under.
        event_type: String,
        /// The underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// Any other store failure, passed through unmodified.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Maps a classified transport failure onto the caller-visible taxonomy
    /// for `stream_id`.
    #[must_use]
    pub fn from_transport(err: TransportError, stream_id: &str) -> Self {
        match err {
            TransportError::StreamNotFound(_) => Self::StreamNotFound(stream_id.to_owned()),
            TransportError::Unauthorized(_) => Self::Unauthorized(stream_id.to_owned()),
            TransportError::Unavailable(_) | TransportError::Backend(_) => {
                Self::Backend(err.to_string())
            }
        }
    }
}

/// Failures surfaced by the command dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A handler is already bound to this command type. Registration fails
    /// rather than silently overwriting, so wiring mistakes surface at
    /// startup.
    #[error("a handler is already registered for command {0}")]
    DuplicateHandler(String),

    /// No handler is bound to this command type.
    #[error("no handler registered for command {0}")]
    UnknownCommand(String),

    /// The bound handler rejected the command.
    #[error("command {command_type} rejected: {reason}")]
    Rejected {
        /// The command type that was rejected.
        command_type: String,
        /// Why the handler rejected it.
        reason: String,
    },
}
