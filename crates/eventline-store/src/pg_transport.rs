//! PostgreSQL implementation of the stream transport.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};

use eventline_core::error::TransportError;
use eventline_core::event::EventMetadata;
use eventline_core::transport::{RawEvent, StreamTransport, WireEvent};

use crate::schema;

/// PostgreSQL-backed stream transport.
///
/// Streams live in two tables: `streams` marks existence and tracks the
/// monotonically increasing append position, `stream_events` holds the
/// immutable event rows. A stream exists once its first event is appended;
/// reading a stream with no `streams` row reports not-found.
#[derive(Debug, Clone)]
pub struct PgStreamTransport {
    pool: PgPool,
}

impl PgStreamTransport {
    /// Connects to the store at `addr` (a PostgreSQL connection URL).
    ///
    /// # Errors
    ///
    /// [`TransportError::Unavailable`] when the connection cannot be
    /// established; hosts treat this as fatal at startup.
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(addr)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to establish event store connection");
                TransportError::Unavailable(err.to_string())
            })?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `streams` and `stream_events` tables if missing.
    ///
    /// # Errors
    ///
    /// Classified store failure when the DDL cannot be applied.
    pub async fn ensure_schema(&self) -> Result<(), TransportError> {
        sqlx::raw_sql(schema::CREATE_TABLES)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }
}

#[async_trait]
impl StreamTransport for PgStreamTransport {
    async fn append(&self, stream_id: &str, event: WireEvent) -> Result<i64, TransportError> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let position: i64 = sqlx::query_scalar(
            "INSERT INTO streams (stream_id, current_position)
             VALUES ($1, 0)
             ON CONFLICT (stream_id)
             DO UPDATE SET current_position = streams.current_position + 1
             RETURNING current_position",
        )
        .bind(stream_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(classify)?;

        sqlx::query(
            "INSERT INTO stream_events
                 (event_id, stream_id, position, event_type, payload, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(event.event_id)
        .bind(stream_id)
        .bind(position)
        .bind(&event.event_type)
        .bind(&event.payload)
        .bind(sqlx::types::Json(&event.metadata))
        .execute(&mut *tx)
        .await
        .map_err(classify)?;

        tx.commit().await.map_err(classify)?;

        tracing::debug!(stream_id, position, event_type = %event.event_type, "stored event row");
        Ok(position)
    }

    async fn read_at(
        &self,
        stream_id: &str,
        position: i64,
    ) -> Result<Option<RawEvent>, TransportError> {
        let row = sqlx::query(
            "SELECT event_id, event_type, payload, metadata, position, recorded_at
             FROM stream_events
             WHERE stream_id = $1 AND position = $2",
        )
        .bind(stream_id)
        .bind(position)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        if let Some(row) = row {
            let metadata: sqlx::types::Json<EventMetadata> =
                row.try_get("metadata").map_err(classify)?;
            return Ok(Some(RawEvent {
                event_id: row.try_get("event_id").map_err(classify)?,
                event_type: row.try_get("event_type").map_err(classify)?,
                payload: row.try_get("payload").map_err(classify)?,
                metadata: metadata.0,
                position: row.try_get("position").map_err(classify)?,
                recorded_at: row.try_get("recorded_at").map_err(classify)?,
            }));
        }

        // Position past the end of an existing stream is a normal stop;
        // a stream with no bookkeeping row at all does not exist.
        let stream: Option<i64> =
            sqlx::query_scalar("SELECT current_position FROM streams WHERE stream_id = $1")
                .bind(stream_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(classify)?;

        if stream.is_some() {
            Ok(None)
        } else {
            Err(TransportError::StreamNotFound(stream_id.to_owned()))
        }
    }
}

/// Maps a sqlx failure onto the transport taxonomy: connection-level
/// failures are transient, authorization SQLSTATE classes are unauthorized,
/// everything else passes through as a backend error.
fn classify(err: sqlx::Error) -> TransportError {
    match &err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            TransportError::Unavailable(err.to_string())
        }
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some("28000" | "28P01" | "42501") => TransportError::Unauthorized(err.to_string()),
            _ => TransportError::Backend(err.to_string()),
        },
        _ => TransportError::Backend(err.to_string()),
    }
}
