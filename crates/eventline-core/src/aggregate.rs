//! Aggregate root abstraction.

use crate::event::DomainEvent;

/// Trait for aggregates whose authoritative state is derived solely by
/// replaying their event stream.
///
/// The `Default` bound is the explicit zero-value factory: the repository
/// constructs a blank, valid instance before events are applied to it.
pub trait AggregateRoot: Default + Send + Sync {
    /// Applies a single event, mutating state in place. Invoked once per
    /// stream position during replay, in stream order, and by domain code
    /// when recording new facts.
    fn when(&mut self, event: &dyn DomainEvent);

    /// Returns the ordered events produced since the last successful save.
    fn pending_changes(&self) -> &[Box<dyn DomainEvent>];

    /// Drops the first `count` pending changes once they are durably
    /// appended. A partially failed save advances this cursor past the
    /// committed prefix, so a retried save appends only the remainder.
    fn mark_committed(&mut self, count: usize);
}
