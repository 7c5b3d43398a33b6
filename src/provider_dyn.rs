//! Type-erased squawk providers for runtime polymorphism.
//!
//! This module provides [`AnyProvider`], a shared, type-erased handle to any
//! [`SquawkProvider`] implementation. The registry stores providers this way
//! so that different implementations can live in one table and be handed to
//! concurrent callers without copying.
//!
//! # How It Works
//!
//! [`AnyProvider`] wraps any `SquawkProvider + 'static` in an `Arc`. Cloning
//! is a reference-count bump; the provider itself is dropped when the last
//! handle (registry entry or in-flight call) goes away.
//!
//! ```rust
//! use neo_ccams::{AnyProvider, SquawkCode, SquawkProvider};
//! use neo_ccams::model::{Aircraft, Flightplan};
//!
//! struct Fixed(&'static str, i32);
//!
//! impl SquawkProvider for Fixed {
//!     fn generate_squawk(&self, _: &str, _: &Aircraft, _: &Flightplan) -> SquawkCode {
//!         "2000".parse().unwrap()
//!     }
//!     fn provider_name(&self) -> &str {
//!         self.0
//!     }
//!     fn priority(&self) -> i32 {
//!         self.1
//!     }
//! }
//!
//! let providers = vec![AnyProvider::new(Fixed("a", 0)), AnyProvider::new(Fixed("b", 10))];
//! let best = providers.iter().max_by_key(|p| p.priority()).unwrap();
//! assert_eq!(best.provider_name(), "b");
//! ```
//!
//! # Performance
//!
//! One allocation per provider and virtual dispatch per call. Assignment
//! calls are rare and may involve a network round trip, so this is noise.

use std::sync::Arc;

use crate::model::{Aircraft, Flightplan};
use crate::squawk::SquawkCode;
use crate::traits::SquawkProvider;

/// Shared, type-erased squawk provider.
#[derive(Clone)]
pub struct AnyProvider {
    inner: Arc<dyn SquawkProvider>,
}

impl std::fmt::Debug for AnyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyProvider")
            .field("name", &self.provider_name())
            .field("priority", &self.priority())
            .finish()
    }
}

impl AnyProvider {
    /// Wrap a concrete provider.
    pub fn new<P: SquawkProvider + 'static>(provider: P) -> Self {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Wrap a provider that is already shared.
    pub fn from_arc(provider: Arc<dyn SquawkProvider>) -> Self {
        Self { inner: provider }
    }

    /// Produce a code using the wrapped provider.
    pub fn generate_squawk(
        &self,
        callsign: &str,
        aircraft: &Aircraft,
        flightplan: &Flightplan,
    ) -> SquawkCode {
        self.inner.generate_squawk(callsign, aircraft, flightplan)
    }

    /// Name reported by the wrapped provider.
    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    /// Priority reported by the wrapped provider.
    pub fn priority(&self) -> i32 {
        self.inner.priority()
    }

    /// Whether two handles point at the same provider instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<P: SquawkProvider + 'static> From<Arc<P>> for AnyProvider {
    fn from(provider: Arc<P>) -> Self {
        Self { inner: provider }
    }
}
