//! The squawk provider capability.
//!
//! Anything that can produce a code for a flight, report a name and a
//! priority qualifies as a provider. The registry stores providers as
//! [`AnyProvider`](crate::AnyProvider) so different implementations can sit
//! side by side.
//!
//! ```rust
//! use neo_ccams::{SquawkCode, SquawkProvider};
//! use neo_ccams::model::{Aircraft, Flightplan};
//!
//! struct Fixed;
//!
//! impl SquawkProvider for Fixed {
//!     fn generate_squawk(&self, _: &str, _: &Aircraft, _: &Flightplan) -> SquawkCode {
//!         "2000".parse().unwrap()
//!     }
//!
//!     fn provider_name(&self) -> &str {
//!         "fixed"
//!     }
//! }
//!
//! assert_eq!(Fixed.priority(), 0);
//! ```

use crate::model::{Aircraft, Flightplan};
use crate::squawk::SquawkCode;

/// A strategy that assigns squawk codes.
///
/// Implementations are shared across concurrent assignment calls, so any
/// internal mutable state must be synchronized.
pub trait SquawkProvider: Send + Sync {
    /// Produce a code for `callsign`. Must always return a valid code; a
    /// provider that cannot reach its backend falls back locally.
    fn generate_squawk(
        &self,
        callsign: &str,
        aircraft: &Aircraft,
        flightplan: &Flightplan,
    ) -> SquawkCode;

    /// Provider name, unique within a registry.
    fn provider_name(&self) -> &str;

    /// Higher values win when no provider is explicitly active.
    fn priority(&self) -> i32 {
        0
    }
}
