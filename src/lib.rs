//! # neo-ccams
//!
//! Transponder (squawk) code assignment for ATC simulation plugin hosts,
//! backed by the centralised CCAMS allocator.
//!
//! ## Features
//!
//! - **Special codes**: VFR flights get `7000`, Mode-S capable flights
//!   between Mode-S airports get `1000`, with no network traffic
//! - **Conflict avoidance**: codes already seen on scope, assigned by
//!   controllers, or issued earlier in the session are sent to the allocator
//! - **Always a code**: transport failures and garbage responses fall back
//!   to a locally generated octal code
//! - **Provider registry**: named, prioritized providers with an optional
//!   active override and RAII registration tokens
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without a radar client:
//!
//! - `traits` - Host collaborator, transport and provider abstractions
//! - `squawk` / `model` - Value types shared by every module
//! - `classifier` - VFR and Mode-S rules
//! - `collector` - In-use code gathering and the session's issued codes
//! - `allocator` - CCAMS request building and response parsing
//! - `fallback` - Local random code generation
//! - `ccams` - The provider that ties the pipeline together
//! - `registry` - Provider registration and selection
//! - `plugin` - Host lifecycle (initialize / shutdown)
//! - `hal` - Concrete implementations (mocks for testing, `ureq` transport)
//!
//! ## Example
//!
//! ```rust
//! use neo_ccams::{AnyProvider, ProviderDescriptor, SquawkCode, SquawkProvider, SquawkRegistry};
//! use neo_ccams::model::{Aircraft, Flightplan};
//!
//! struct Fixed;
//!
//! impl SquawkProvider for Fixed {
//!     fn generate_squawk(&self, _: &str, _: &Aircraft, _: &Flightplan) -> SquawkCode {
//!         SquawkCode::parse("2341").unwrap()
//!     }
//!     fn provider_name(&self) -> &str {
//!         "fixed"
//!     }
//! }
//!
//! let registry = SquawkRegistry::new();
//! registry
//!     .register(ProviderDescriptor::new("fixed", 0), AnyProvider::new(Fixed))
//!     .unwrap();
//!
//! let event = registry
//!     .generate_squawk("AFR123", &Aircraft::default(), &Flightplan::default())
//!     .unwrap();
//! assert_eq!(event.squawk, "2341");
//! assert_eq!(event.provider_name, "fixed");
//! ```

#![warn(missing_docs)]

/// Squawk code value type and well-known codes.
pub mod squawk;
/// Host data model: aircraft, flight plans, connection.
pub mod model;
/// Core traits for host collaborators, transport and providers.
pub mod traits;
/// Concrete trait implementations, including mocks for testing.
pub mod hal;

/// VFR and Mode-S special code rules.
pub mod classifier;
/// In-use code collection and issued code tracking.
pub mod collector;
/// Client for the remote CCAMS allocator.
pub mod allocator;
/// Local random code generation.
pub mod fallback;
/// Provider configuration.
pub mod config;

/// The CCAMS squawk provider.
pub mod ccams;
/// Type-erased providers for runtime polymorphism.
pub mod provider_dyn;
/// Provider registration and selection.
pub mod registry;
/// Host lifecycle.
pub mod plugin;

// Re-exports for convenience
pub use allocator::{AllocationError, RemoteAllocator};
pub use ccams::{Assignment, AssignmentSource, CcamsProvider, FallbackReason};
pub use classifier::SpecialCode;
pub use config::{CcamsConfig, ConfigError};
pub use model::{
    Aircraft, ClientInformation, ConnectionInfo, ControllerData, Flightplan, ServerType,
    SquawkAssignedEvent,
};
pub use plugin::{NeoCcams, PluginMetadata};
pub use provider_dyn::AnyProvider;
pub use registry::{
    ProviderDescriptor, ProviderId, RegistrationToken, RegistryError, SquawkRegistry,
};
pub use squawk::{SquawkCode, SquawkCodeError};
pub use traits::{
    // Host
    AircraftRoster,
    ConnectionSource,
    ControllerDataRoster,
    HostLogger,
    HostServices,
    // Network
    HttpClient,
    HttpRequest,
    HttpResponse,
    LogLevel,
    // Providers
    SquawkProvider,
    TransportError,
};
