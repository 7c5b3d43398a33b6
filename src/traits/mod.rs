//! Trait definitions for host collaborators, transport and providers.
//!
//! These are the seams that let the squawk assignment run inside a radar
//! client, in a desktop harness, or in tests with mocks.
//!
//! # Submodules
//!
//! - `host`: read-only queries into the plugin host (connection, rosters, logger)
//! - `network`: outbound HTTP transport used by the remote allocator
//! - `provider`: the [`SquawkProvider`] capability registered with the registry
//!
//! # Host Collaborators
//!
//! - [`ConnectionSource`]: the controller's network connection, if any
//! - [`AircraftRoster`]: every aircraft with its transponder code
//! - [`ControllerDataRoster`]: every controller-assigned code
//! - [`HostLogger`]: leveled log sink

pub mod host;
pub mod network;
pub mod provider;

pub use host::*;
pub use network::*;
pub use provider::*;
