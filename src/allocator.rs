//! Remote allocator client for the CCAMS service.
//!
//! One allocation is one bounded `GET` round trip. There are no retries and
//! no queueing: any failure is reported as an [`AllocationError`] and the
//! caller falls back to a locally generated code.
//!
//! # Wire Format
//!
//! ```text
//! GET {base}{endpoint}?callsign=<controller>&origin=<ICAO>&dest=<ICAO>
//!     &flightrule=I&connectiontype=1[&codes=c1,c2,...][&sim]
//! User-Agent: neoradar/0.1.0
//! ```
//!
//! - `codes` is omitted when no code is in use.
//! - `sim` is a key-only flag sent from test and sweatbox servers.
//! - A 2xx response carries the code as a plain-text body; surrounding
//!   whitespace is trimmed and the rest must be a valid, assignable code.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use neo_ccams::allocator::{AllocationRequest, RemoteAllocator};
//! use neo_ccams::collector::{InUseCodeSet, IssuedCodes};
//! use neo_ccams::config::CcamsConfig;
//! use neo_ccams::hal::MockHttpClient;
//! use neo_ccams::traits::HttpResponse;
//!
//! let http = Arc::new(MockHttpClient::new());
//! http.push_response(HttpResponse::ok(" 4321\n"));
//!
//! let issued = Arc::new(IssuedCodes::new());
//! let allocator = RemoteAllocator::new(&CcamsConfig::default(), http.clone(), issued.clone()).unwrap();
//!
//! let in_use = InUseCodeSet::new();
//! let request = AllocationRequest::new("LFPG_APP", "LFPG", "KJFK", &in_use);
//! let code = allocator.allocate(&request).unwrap();
//!
//! assert_eq!(code, "4321");
//! assert!(issued.contains(&code));
//! assert_eq!(http.requests()[0].query("flightrule").as_deref(), Some("I"));
//! ```

use std::sync::Arc;

use url::Url;

use crate::collector::{InUseCodeSet, IssuedCodes};
use crate::config::{CcamsConfig, ConfigError};
use crate::squawk::{SquawkCode, SquawkCodeError};
use crate::traits::{HttpClient, HttpRequest, TransportError};

/// Flight rule sent with every allocation; VFR flights never reach the allocator.
pub const FLIGHT_RULE_IFR: &str = "I";

/// Connection type tag expected by the service.
pub const CONNECTION_TYPE: &str = "1";

/// Why a remote allocation produced no code.
///
/// Every variant is recoverable by falling back to a local code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// A connect or read/write deadline expired.
    #[error("allocation timed out: {0}")]
    Timeout(String),
    /// The request could not be completed.
    #[error("allocation transport error: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("allocation service returned status {0}")]
    BadStatus(u16),
    /// The body was not an assignable squawk code.
    #[error("allocation service returned malformed code {body:?}: {reason}")]
    MalformedResponse {
        /// Trimmed response body.
        body: String,
        /// Validation failure.
        reason: SquawkCodeError,
    },
}

impl From<TransportError> for AllocationError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout(msg) => Self::Timeout(msg),
            TransportError::Connection(msg) => Self::Transport(msg),
        }
    }
}

/// Inputs of one allocation.
#[derive(Clone, Copy, Debug)]
pub struct AllocationRequest<'a> {
    /// Controller callsign of the active connection.
    pub callsign: &'a str,
    /// Departure ICAO.
    pub origin: &'a str,
    /// Destination ICAO.
    pub destination: &'a str,
    /// Codes the service must avoid.
    pub in_use: &'a InUseCodeSet,
    /// Connected to a test or sweatbox server.
    pub simulation: bool,
}

impl<'a> AllocationRequest<'a> {
    /// Request on a live server.
    pub fn new(
        callsign: &'a str,
        origin: &'a str,
        destination: &'a str,
        in_use: &'a InUseCodeSet,
    ) -> Self {
        Self {
            callsign,
            origin,
            destination,
            in_use,
            simulation: false,
        }
    }

    /// Mark the request as coming from a non-production server.
    pub fn simulation(mut self, simulation: bool) -> Self {
        self.simulation = simulation;
        self
    }
}

/// Client for the remote allocation service.
pub struct RemoteAllocator<C: HttpClient> {
    client: C,
    endpoint: Url,
    user_agent: String,
    issued: Arc<IssuedCodes>,
}

impl<C: HttpClient> std::fmt::Debug for RemoteAllocator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteAllocator")
            .field("endpoint", &self.endpoint.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl<C: HttpClient> RemoteAllocator<C> {
    /// Create an allocator. Successful allocations are recorded in `issued`.
    pub fn new(
        config: &CcamsConfig,
        client: C,
        issued: Arc<IssuedCodes>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            endpoint: config.endpoint_url()?,
            user_agent: config.user_agent.clone(),
            issued,
        })
    }

    /// Build the outbound request for `request`.
    pub fn build_request(&self, request: &AllocationRequest<'_>) -> HttpRequest {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("callsign", request.callsign)
            .append_pair("origin", request.origin)
            .append_pair("dest", request.destination)
            .append_pair("flightrule", FLIGHT_RULE_IFR)
            .append_pair("connectiontype", CONNECTION_TYPE);
        if !request.in_use.is_empty() {
            // Octal digits only, so the list goes out with literal commas.
            let query = format!(
                "{}&codes={}",
                url.query().unwrap_or_default(),
                request.in_use.to_query_value()
            );
            url.set_query(Some(&query));
        }
        if request.simulation {
            url.query_pairs_mut().append_key_only("sim");
        }
        HttpRequest::get(url).with_header("User-Agent", self.user_agent.as_str())
    }

    /// Ask the service for a code.
    ///
    /// Blocks for at most the transport's configured timeouts. The issued
    /// list is locked only after the response has arrived.
    pub fn allocate(&self, request: &AllocationRequest<'_>) -> Result<SquawkCode, AllocationError> {
        let http_request = self.build_request(request);
        let response = self.client.get(&http_request)?;

        if !response.is_success() {
            return Err(AllocationError::BadStatus(response.status));
        }

        let code = parse_response_body(&response.body)?;
        self.issued.record(code.clone());
        Ok(code)
    }
}

/// Trim and validate a response body.
pub fn parse_response_body(body: &str) -> Result<SquawkCode, AllocationError> {
    let trimmed = body.trim();
    SquawkCode::parse_assignable(trimmed).map_err(|reason| AllocationError::MalformedResponse {
        body: trimmed.to_owned(),
        reason,
    })
}
