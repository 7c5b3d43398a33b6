//! [`HostLogger`] that forwards to `tracing`.
//!
//! Used when the crate runs outside a radar client (CLI, tests, embedding
//! applications with their own subscriber).

use crate::traits::{HostLogger, LogLevel};

/// Forwards host log lines to the `tracing` facade under the `neo_ccams` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl HostLogger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Fatal => tracing::error!(target: "neo_ccams", fatal = true, "{message}"),
            LogLevel::Error => tracing::error!(target: "neo_ccams", "{message}"),
            LogLevel::Warning => tracing::warn!(target: "neo_ccams", "{message}"),
            LogLevel::Info => tracing::info!(target: "neo_ccams", "{message}"),
            LogLevel::Debug => tracing::debug!(target: "neo_ccams", "{message}"),
            LogLevel::Verbose => tracing::trace!(target: "neo_ccams", "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_forwards_without_subscriber() {
        let logger = TracingLogger;
        logger.fatal("fatal");
        logger.error("error");
        logger.warning("warning");
        logger.info("info");
        logger.debug("debug");
        logger.verbose("verbose");
    }
}
