//! Eventline Store — store-backed stream client and aggregate repository.
//!
//! Wraps a physical stream store behind [`client::StreamClient`] — append-only
//! writes plus resilient forward reads — and exposes generic
//! [`repository::Repository`] load/save semantics over any aggregate type.
//! [`pg_transport::PgStreamTransport`] is the production PostgreSQL backend.

pub mod client;
pub mod pg_transport;
pub mod repository;
pub mod schema;
