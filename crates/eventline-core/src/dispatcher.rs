//! Command dispatch — binds command types to handlers.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::command::Command;
use crate::error::DispatchError;

/// A unit of behavior bound to exactly one command type.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Handles one command instance.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Rejected`] when the command violates domain
    /// rules.
    async fn handle(&self, command: &dyn Command) -> Result<(), DispatchError>;
}

/// Routes command instances to their registered handlers.
///
/// Bindings are established at startup and are read-only afterwards; they
/// live for the lifetime of the dispatcher.
#[derive(Default)]
pub struct CommandDispatcher {
    handlers: HashMap<String, Box<dyn CommandHandler>>,
}

impl CommandDispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `command_type`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DuplicateHandler`] if a handler is already
    /// bound to `command_type`.
    pub fn register_handler(
        &mut self,
        command_type: &str,
        handler: Box<dyn CommandHandler>,
    ) -> Result<(), DispatchError> {
        if self.handlers.contains_key(command_type) {
            return Err(DispatchError::DuplicateHandler(command_type.to_owned()));
        }
        self.handlers.insert(command_type.to_owned(), handler);
        Ok(())
    }

    /// Looks up the handler bound to the command's type and invokes it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownCommand`] if no handler is bound to
    /// the command's type; otherwise the handler's result.
    pub async fn dispatch(&self, command: &dyn Command) -> Result<(), DispatchError> {
        match self.handlers.get(command.command_type()) {
            Some(handler) => handler.handle(command).await,
            None => Err(DispatchError::UnknownCommand(
                command.command_type().to_owned(),
            )),
        }
    }
}
