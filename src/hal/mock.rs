//! Mock implementations for testing without a radar client.
//!
//! This module provides test doubles for every host collaborator and for
//! the HTTP transport, so assignment logic can be exercised on a desktop
//! with no network access.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockConnection`] | [`ConnectionSource`] | Settable connection state |
//! | [`MockAircraftRoster`] | [`AircraftRoster`] | Replaceable aircraft list |
//! | [`MockControllerData`] | [`ControllerDataRoster`] | Replaceable controller data |
//! | [`MockLogger`] | [`HostLogger`] | Captures log lines |
//! | [`MockHttpClient`] | [`HttpClient`] | Queued responses, request capture |
//!
//! # Example
//!
//! ```rust
//! use neo_ccams::hal::{MockConnection, MockHttpClient};
//! use neo_ccams::model::ServerType;
//! use neo_ccams::traits::{ConnectionSource, HttpResponse};
//!
//! let connection = MockConnection::connected("LFPG_APP", ServerType::Live);
//! assert!(connection.connection().is_some());
//! connection.disconnect();
//! assert!(connection.connection().is_none());
//!
//! let http = MockHttpClient::new();
//! http.push_response(HttpResponse::ok("1234"));
//! assert_eq!(http.pending(), 1);
//! ```

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::model::{Aircraft, ConnectionInfo, ControllerData, ServerType};
use crate::traits::{
    AircraftRoster, ConnectionSource, ControllerDataRoster, HostLogger, HttpClient, HttpRequest,
    HttpResponse, LogLevel, TransportError,
};

// ============================================================================
// Host Mocks
// ============================================================================

/// Mock connection source.
#[derive(Debug, Default)]
pub struct MockConnection {
    info: Mutex<Option<ConnectionInfo>>,
}

impl MockConnection {
    /// Not connected.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Connected as `callsign` to a server of kind `server_type`.
    pub fn connected(callsign: &str, server_type: ServerType) -> Self {
        Self {
            info: Mutex::new(Some(ConnectionInfo::new(callsign, server_type))),
        }
    }

    /// Replace the connection.
    pub fn set(&self, info: Option<ConnectionInfo>) {
        *self.info.lock() = info;
    }

    /// Drop the connection.
    pub fn disconnect(&self) {
        self.set(None);
    }
}

impl ConnectionSource for MockConnection {
    fn connection(&self) -> Option<ConnectionInfo> {
        self.info.lock().clone()
    }
}

/// Mock aircraft roster.
#[derive(Debug, Default)]
pub struct MockAircraftRoster {
    aircraft: Mutex<Vec<Aircraft>>,
    reads: Mutex<usize>,
}

impl MockAircraftRoster {
    /// Roster with the given aircraft.
    pub fn new(aircraft: Vec<Aircraft>) -> Self {
        Self {
            aircraft: Mutex::new(aircraft),
            reads: Mutex::new(0),
        }
    }

    /// Replace the roster.
    pub fn set(&self, aircraft: Vec<Aircraft>) {
        *self.aircraft.lock() = aircraft;
    }

    /// Append one aircraft.
    pub fn push(&self, aircraft: Aircraft) {
        self.aircraft.lock().push(aircraft);
    }

    /// Number of roster reads so far.
    pub fn reads(&self) -> usize {
        *self.reads.lock()
    }
}

impl AircraftRoster for MockAircraftRoster {
    fn all(&self) -> Vec<Aircraft> {
        *self.reads.lock() += 1;
        self.aircraft.lock().clone()
    }
}

/// Mock controller data roster.
#[derive(Debug, Default)]
pub struct MockControllerData {
    data: Mutex<Vec<ControllerData>>,
}

impl MockControllerData {
    /// Roster with the given entries.
    pub fn new(data: Vec<ControllerData>) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }

    /// Replace the roster.
    pub fn set(&self, data: Vec<ControllerData>) {
        *self.data.lock() = data;
    }
}

impl ControllerDataRoster for MockControllerData {
    fn all(&self) -> Vec<ControllerData> {
        self.data.lock().clone()
    }
}

/// Logger that keeps every line for inspection.
#[derive(Debug, Default)]
pub struct MockLogger {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MockLogger {
    /// Empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line logged so far.
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    /// Messages logged at `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// `true` if any error (or fatal) line was logged.
    pub fn has_errors(&self) -> bool {
        self.lines.lock().iter().any(|(l, _)| *l <= LogLevel::Error)
    }
}

impl HostLogger for MockLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.lines.lock().push((level, message.to_owned()));
    }
}

// ============================================================================
// Network Mocks
// ============================================================================

/// Mock HTTP client.
///
/// Answers requests from a FIFO queue of results. With an empty queue every
/// request fails with [`TransportError::Connection`]. All requests are
/// captured for assertions.
#[derive(Debug, Default)]
pub struct MockHttpClient {
    queue: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpClient {
    /// Client with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn push_response(&self, response: HttpResponse) {
        self.queue.lock().push_back(Ok(response));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) {
        self.queue.lock().push_back(Err(error));
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received.
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of queued results not yet consumed.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

impl HttpClient for MockHttpClient {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());
        self.queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no mock response queued".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn http_mock_answers_in_order_then_fails() {
        let http = MockHttpClient::new();
        http.push_response(HttpResponse::ok("1111"));
        http.push_error(TransportError::Timeout("slow".into()));

        let req = HttpRequest::get(Url::parse("https://x.test/squawk").unwrap());
        assert_eq!(http.get(&req), Ok(HttpResponse::ok("1111")));
        assert_eq!(http.get(&req), Err(TransportError::Timeout("slow".into())));
        assert!(matches!(http.get(&req), Err(TransportError::Connection(_))));
        assert_eq!(http.call_count(), 3);
    }

    #[test]
    fn logger_captures_levels() {
        let logger = MockLogger::new();
        logger.info("hello");
        assert!(!logger.has_errors());
        logger.error("boom");
        assert!(logger.has_errors());
        assert_eq!(logger.messages_at(LogLevel::Error), vec!["boom".to_string()]);
        assert_eq!(logger.lines().len(), 2);
    }

    #[test]
    fn roster_counts_reads() {
        let roster = MockAircraftRoster::new(vec![Aircraft::new("A", "1234")]);
        assert_eq!(roster.all().len(), 1);
        roster.push(Aircraft::new("B", "2345"));
        assert_eq!(roster.all().len(), 2);
        assert_eq!(roster.reads(), 2);
    }
}
