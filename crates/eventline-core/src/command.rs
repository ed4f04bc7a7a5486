//! Command abstractions.

use std::any::Any;

use uuid::Uuid;

/// Trait that all commands implement.
///
/// A command is a typed instruction with no persisted representation; it is
/// owned transiently by the caller and the dispatcher.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command, used as the dispatcher routing key.
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// Upcasts to [`Any`] so handlers can downcast to the concrete type.
    fn as_any(&self) -> &dyn Any;
}
