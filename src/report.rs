//! Injected sink for recoverable failures and housekeeping notes.
//!
//! The table never prints. Whatever it has to say goes through the
//! [`Report`] it was built with; by default that is [`TracingReport`],
//! which turns each message into a `tracing` event.

use tracing::Level;

pub trait Report {
    fn report(&self, level: Level, message: &str);
}

/// Forwards reports to `tracing` under the `linked_hash_table` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReport;

impl Report for TracingReport {
    fn report(&self, level: Level, message: &str) {
        if level == Level::ERROR {
            tracing::error!(target: "linked_hash_table", "{message}");
        } else if level == Level::WARN {
            tracing::warn!(target: "linked_hash_table", "{message}");
        } else if level == Level::INFO {
            tracing::info!(target: "linked_hash_table", "{message}");
        } else if level == Level::DEBUG {
            tracing::debug!(target: "linked_hash_table", "{message}");
        } else {
            tracing::trace!(target: "linked_hash_table", "{message}");
        }
    }
}

impl<F> Report for F
where
    F: Fn(Level, &str),
{
    fn report(&self, level: Level, message: &str) {
        self(level, message)
    }
}
