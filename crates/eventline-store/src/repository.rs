//! Generic aggregate repository — replay-based load, append-based save.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use eventline_core::aggregate::AggregateRoot;
use eventline_core::error::StoreError;
use eventline_core::event::EventMetadata;

use crate::client::StreamClient;

/// Loads and saves aggregates of type `A` without knowing any
/// aggregate-specific logic. The stream id equals the aggregate id.
pub struct Repository<A> {
    client: Arc<StreamClient>,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A: AggregateRoot> Repository<A> {
    /// Creates a repository over `client`.
    #[must_use]
    pub fn new(client: Arc<StreamClient>) -> Self {
        Self {
            client,
            _aggregate: PhantomData,
        }
    }

    /// Replays the stream named `aggregate_id` into a fresh instance and
    /// returns it fully hydrated.
    ///
    /// # Errors
    ///
    /// [`StoreError::StreamNotFound`] when the aggregate has no stream yet;
    /// any other read failure per [`StoreError`]. On error the partially
    /// hydrated instance is discarded — a returned error always means
    /// "aggregate not usable".
    pub async fn load(&self, aggregate_id: &str) -> Result<A, StoreError> {
        self.load_with_cancel(aggregate_id, &CancellationToken::new())
            .await
    }

    /// Same as [`Self::load`] with an explicit cancellation signal for the
    /// underlying read.
    ///
    /// # Errors
    ///
    /// As for [`Self::load`], plus [`StoreError::Cancelled`].
    pub async fn load_with_cancel(
        &self,
        aggregate_id: &str,
        cancel: &CancellationToken,
    ) -> Result<A, StoreError> {
        let mut aggregate = A::default();
        self.client
            .read_all_with_cancel(aggregate_id, cancel, |recorded, _is_last| {
                aggregate.when(recorded.event.as_ref());
            })
            .await?;
        Ok(aggregate)
    }

    /// Appends the aggregate's pending changes to its stream, one at a
    /// time, in the order the aggregate reports them. Stops at the first
    /// failure: already-appended events stay committed and the aggregate's
    /// commit cursor advances past them, so a retried save appends only the
    /// remainder.
    ///
    /// # Errors
    ///
    /// The first append failure, unmodified.
    pub async fn save(&self, aggregate: &mut A) -> Result<(), StoreError> {
        let total = aggregate.pending_changes().len();
        let mut committed = 0;
        while committed < total {
            let result = {
                let change = &aggregate.pending_changes()[committed];
                self.client.append(change.as_ref(), EventMetadata::new()).await
            };
            match result {
                Ok(_) => committed += 1,
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        committed,
                        remaining = total - committed,
                        "save interrupted by append failure"
                    );
                    aggregate.mark_committed(committed);
                    return Err(err);
                }
            }
        }
        aggregate.mark_committed(committed);
        Ok(())
    }
}
