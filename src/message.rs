//! Warning and error reporting.
//!
//! A plotter reports through its own handler when one was injected at construction,
//! otherwise through the process-wide handler, otherwise through `tracing`.

use std::sync::{Arc, Mutex};

/// Severity of a reported message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Callback receiving warnings and errors.
pub type MessageHandler = Arc<dyn Fn(Severity, &str) + Send + Sync>;

// Held for both installation and invocation; a handler must not reinstall handlers.
static GLOBAL_HANDLER: Mutex<Option<MessageHandler>> = Mutex::new(None);

/// Install (or with `None`, remove) the process-wide handler, returning the previous one.
pub fn set_global_handler(handler: Option<MessageHandler>) -> Option<MessageHandler> {
    let mut slot = GLOBAL_HANDLER
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    std::mem::replace(&mut *slot, handler)
}

/// Per-plotter message sink.
#[derive(Clone, Default)]
pub struct Messenger {
    handler: Option<MessageHandler>,
}

impl std::fmt::Debug for Messenger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messenger")
            .field("injected", &self.handler.is_some())
            .finish()
    }
}

impl Messenger {
    pub fn new(handler: Option<MessageHandler>) -> Self {
        Self { handler }
    }

    pub fn warning(&self, msg: &str) {
        self.emit(Severity::Warning, msg);
    }

    pub fn error(&self, msg: &str) {
        self.emit(Severity::Error, msg);
    }

    fn emit(&self, severity: Severity, msg: &str) {
        if let Some(h) = &self.handler {
            h(severity, msg);
            return;
        }

        let global = GLOBAL_HANDLER
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match global.as_ref() {
            Some(h) => h(severity, msg),
            None => match severity {
                Severity::Warning => tracing::warn!(target: "vectorplot", "{msg}"),
                Severity::Error => tracing::error!(target: "vectorplot", "{msg}"),
            },
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/message.rs"]
mod tests;
