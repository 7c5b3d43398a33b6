//! Read-only host collaborator traits.
//!
//! The plugin host owns connection state, traffic and controller data. The
//! squawk provider only ever *reads* them, through the narrow traits below.
//! All of them are `Send + Sync` because one provider instance serves
//! concurrent assignment requests.
//!
//! | Trait | Host API |
//! |-------|----------|
//! | [`ConnectionSource`] | FSD connection info |
//! | [`AircraftRoster`] | Aircraft list |
//! | [`ControllerDataRoster`] | Controller data list |
//! | [`HostLogger`] | Plugin log sink |

use std::fmt;
use std::sync::Arc;

use crate::model::{Aircraft, ConnectionInfo, ControllerData};

/// Source of the controller's network connection.
pub trait ConnectionSource: Send + Sync {
    /// Current connection, or `None` when not connected.
    fn connection(&self) -> Option<ConnectionInfo>;
}

/// Full list of aircraft known to the host.
pub trait AircraftRoster: Send + Sync {
    /// Snapshot of every aircraft.
    fn all(&self) -> Vec<Aircraft>;
}

/// Full list of controller data entries known to the host.
pub trait ControllerDataRoster: Send + Sync {
    /// Snapshot of every controller data entry.
    fn all(&self) -> Vec<ControllerData>;
}

/// Log levels understood by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Unrecoverable failure.
    Fatal = 0,
    /// Recoverable failure.
    Error = 1,
    /// Something unexpected, work continues.
    Warning = 2,
    /// Normal operation.
    Info = 3,
    /// Diagnostic detail.
    Debug = 4,
    /// Very chatty diagnostic detail.
    Verbose = 5,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Verbose => "verbose",
        };
        f.write_str(s)
    }
}

/// Leveled log sink provided by the host.
///
/// Only [`log`](Self::log) is required; the per-level helpers forward to it.
/// Nothing in the assignment path depends on what the logger does.
pub trait HostLogger: Send + Sync {
    /// Write a message at the given level.
    fn log(&self, level: LogLevel, message: &str);

    /// Log at [`LogLevel::Fatal`].
    fn fatal(&self, message: &str) {
        self.log(LogLevel::Fatal, message);
    }

    /// Log at [`LogLevel::Error`].
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Log at [`LogLevel::Warning`].
    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    /// Log at [`LogLevel::Info`].
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log at [`LogLevel::Debug`].
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log at [`LogLevel::Verbose`].
    fn verbose(&self, message: &str) {
        self.log(LogLevel::Verbose, message);
    }
}

/// The host APIs a squawk provider reads from, bundled for sharing.
#[derive(Clone)]
pub struct HostServices {
    /// Network connection state.
    pub connection: Arc<dyn ConnectionSource>,
    /// Aircraft roster.
    pub aircraft: Arc<dyn AircraftRoster>,
    /// Controller data roster.
    pub controller_data: Arc<dyn ControllerDataRoster>,
    /// Log sink.
    pub logger: Arc<dyn HostLogger>,
}

impl HostServices {
    /// Bundle host collaborators.
    pub fn new(
        connection: Arc<dyn ConnectionSource>,
        aircraft: Arc<dyn AircraftRoster>,
        controller_data: Arc<dyn ControllerDataRoster>,
        logger: Arc<dyn HostLogger>,
    ) -> Self {
        Self {
            connection,
            aircraft,
            controller_data,
            logger,
        }
    }
}

impl fmt::Debug for HostServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostServices")
            .field("connected", &self.connection.connection().is_some())
            .finish_non_exhaustive()
    }
}
