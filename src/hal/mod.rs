//! Concrete implementations of the traits in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: test doubles for host collaborators and HTTP
//! - `ureq_client`: HTTPS transport for the remote allocator
//! - `tracing_logger`: host logger backed by `tracing`

pub mod mock;
pub mod tracing_logger;
pub mod ureq_client;

pub use mock::*;
pub use tracing_logger::TracingLogger;
pub use ureq_client::UreqClient;
