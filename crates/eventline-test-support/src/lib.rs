//! Shared test doubles for the Eventline persistence layer.

mod transport;

pub use transport::{FailingStreamTransport, InMemoryStreamTransport};
