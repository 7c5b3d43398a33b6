//! The CCAMS squawk provider.
//!
//! [`CcamsProvider`] runs the full assignment pipeline for one flight:
//!
//! ```text
//! classify ──special──> 7000 / 1000
//!    │
//!    └─none─> connected? ──no──> fallback
//!                 │
//!                 └─yes─> collect in-use ─> remote allocate ──ok──> code
//!                                                  │
//!                                                  └─err──> log + fallback
//! ```
//!
//! Callers always receive a valid code. Transport problems are logged at
//! error level and recovered with a locally generated code.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use neo_ccams::{CcamsProvider, SquawkProvider};
//! use neo_ccams::ccams::AssignmentSource;
//! use neo_ccams::config::CcamsConfig;
//! use neo_ccams::hal::{MockAircraftRoster, MockConnection, MockControllerData, MockHttpClient, MockLogger};
//! use neo_ccams::model::{Aircraft, Flightplan, ServerType};
//! use neo_ccams::traits::{HostServices, HttpResponse};
//!
//! let host = HostServices::new(
//!     Arc::new(MockConnection::connected("LFPG_APP", ServerType::Live)),
//!     Arc::new(MockAircraftRoster::default()),
//!     Arc::new(MockControllerData::default()),
//!     Arc::new(MockLogger::new()),
//! );
//! let http = Arc::new(MockHttpClient::new());
//! http.push_response(HttpResponse::ok(" 4321 "));
//!
//! let provider = CcamsProvider::new(CcamsConfig::default(), host, http).unwrap();
//! let fp = Flightplan::ifr("AFR123", "LFPG", "KJFK");
//! let assignment = provider.assign("AFR123", &Aircraft::default(), &fp);
//!
//! assert_eq!(assignment.code, "4321");
//! assert_eq!(assignment.source, AssignmentSource::Remote);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::allocator::{AllocationRequest, RemoteAllocator};
use crate::classifier::{classify_flightplan, SpecialCode};
use crate::collector::{InUseCollector, IssuedCodes};
use crate::config::{CcamsConfig, ConfigError};
use crate::fallback::FallbackGenerator;
use crate::hal::UreqClient;
use crate::model::{Aircraft, Flightplan};
use crate::squawk::SquawkCode;
use crate::traits::{HostLogger, HostServices, HttpClient, SquawkProvider};

/// Why a fallback code was used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    /// No network connection; the remote allocator was not called.
    NoConnection,
    /// The remote allocator was called and failed.
    AllocationFailed,
}

/// Where an assigned code came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssignmentSource {
    /// VFR conspicuity code.
    Vfr,
    /// Mode-S conspicuity code.
    ModeS,
    /// Allocated by the remote service.
    Remote,
    /// Generated locally.
    Fallback(FallbackReason),
}

impl From<SpecialCode> for AssignmentSource {
    fn from(special: SpecialCode) -> Self {
        match special {
            SpecialCode::Vfr => Self::Vfr,
            SpecialCode::ModeS => Self::ModeS,
        }
    }
}

/// A code together with how it was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// The assigned code.
    pub code: SquawkCode,
    /// How it was obtained.
    pub source: AssignmentSource,
}

/// Squawk provider backed by the CCAMS allocation service.
///
/// Generic over the HTTP transport so tests can use
/// [`MockHttpClient`](crate::hal::MockHttpClient). Safe to share across
/// threads; see [`collector`](crate::collector) for the locking rules.
pub struct CcamsProvider<C: HttpClient = UreqClient> {
    name: String,
    priority: i32,
    host: HostServices,
    issued: Arc<IssuedCodes>,
    collector: InUseCollector,
    allocator: RemoteAllocator<C>,
    fallback: FallbackGenerator,
}

impl CcamsProvider<UreqClient> {
    /// Provider talking to the configured service over HTTPS.
    pub fn with_default_client(
        config: CcamsConfig,
        host: HostServices,
    ) -> Result<Self, ConfigError> {
        let client = UreqClient::new(&config);
        Self::new(config, host, client)
    }
}

impl<C: HttpClient> CcamsProvider<C> {
    /// Create a provider. Fails only on an invalid configuration.
    pub fn new(config: CcamsConfig, host: HostServices, client: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let issued = Arc::new(IssuedCodes::new());
        let collector = InUseCollector::new(
            host.aircraft.clone(),
            host.controller_data.clone(),
            issued.clone(),
        );
        let allocator = RemoteAllocator::new(&config, client, issued.clone())?;
        Ok(Self {
            name: config.provider_name,
            priority: config.priority,
            host,
            issued,
            collector,
            allocator,
            fallback: FallbackGenerator::with_optional_seed(config.fallback_seed),
        })
    }

    /// Codes this provider obtained remotely in this session.
    pub fn issued_codes(&self) -> &Arc<IssuedCodes> {
        &self.issued
    }

    /// Run the assignment pipeline and report where the code came from.
    pub fn assign(
        &self,
        callsign: &str,
        _aircraft: &Aircraft,
        flightplan: &Flightplan,
    ) -> Assignment {
        let logger = &self.host.logger;
        logger.info(&format!(
            "NeoCCAMS provider generating squawk for {callsign} from {} to {} with equipment {}",
            flightplan.origin, flightplan.destination, flightplan.transponder_equipment
        ));

        if let Some(special) = classify_flightplan(flightplan) {
            let code = special.code();
            let kind = match special {
                SpecialCode::Vfr => "VFR",
                SpecialCode::ModeS => "Mode S",
            };
            logger.info(&format!("Squawk {kind} for {callsign}: {code}"));
            return Assignment {
                code,
                source: special.into(),
            };
        }

        let Some(connection) = self.host.connection.connection() else {
            let code = self.fallback.generate();
            logger.info(&format!("Using fallback squawk for {callsign}: {code}"));
            return Assignment {
                code,
                source: AssignmentSource::Fallback(FallbackReason::NoConnection),
            };
        };

        let in_use = self.collector.collect();
        let request = AllocationRequest::new(
            &connection.callsign,
            &flightplan.origin,
            &flightplan.destination,
            &in_use,
        )
        .simulation(connection.server_type.is_simulation());

        match self.allocator.allocate(&request) {
            Ok(code) => {
                logger.info(&format!("Received squawk {code} for {callsign}"));
                Assignment {
                    code,
                    source: AssignmentSource::Remote,
                }
            }
            Err(e) => {
                logger.error(&format!("CCAMS API request failed for {callsign}: {e}"));
                let code = self.fallback.generate();
                logger.info(&format!("Using fallback squawk for {callsign}: {code}"));
                Assignment {
                    code,
                    source: AssignmentSource::Fallback(FallbackReason::AllocationFailed),
                }
            }
        }
    }
}

impl<C: HttpClient> SquawkProvider for CcamsProvider<C> {
    fn generate_squawk(
        &self,
        callsign: &str,
        aircraft: &Aircraft,
        flightplan: &Flightplan,
    ) -> SquawkCode {
        self.assign(callsign, aircraft, flightplan).code
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl<C: HttpClient> fmt::Debug for CcamsProvider<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CcamsProvider")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("allocator", &self.allocator)
            .finish_non_exhaustive()
    }
}
