//! Stream store database schema.

/// SQL to create the stream bookkeeping and event log tables.
pub const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS streams (
    stream_id        VARCHAR(255) PRIMARY KEY,
    current_position BIGINT NOT NULL
);

CREATE TABLE IF NOT EXISTS stream_events (
    event_id    UUID PRIMARY KEY,
    stream_id   VARCHAR(255) NOT NULL REFERENCES streams (stream_id),
    position    BIGINT NOT NULL,
    event_type  VARCHAR(255) NOT NULL,
    payload     JSONB NOT NULL,
    metadata    JSONB NOT NULL DEFAULT '{}',
    recorded_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (stream_id, position)
);

CREATE INDEX IF NOT EXISTS idx_stream_events_stream_id
    ON stream_events (stream_id, position);
";
