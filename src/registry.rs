//! Provider registry with priority resolution and scoped registrations.
//!
//! The registry holds any number of named [`SquawkProvider`]s and decides
//! which one services an assignment request.
//!
//! # Resolution
//!
//! 1. If a provider was selected with [`SquawkRegistry::set_active`], it wins.
//! 2. Otherwise the highest [`ProviderDescriptor::priority`] wins.
//! 3. Equal priorities go to the provider registered first.
//!
//! [`SquawkRegistry::list_available`] lists names in registration order and
//! does not reflect resolution.
//!
//! # Lifecycle
//!
//! ```text
//! Unregistered --register--> Registered --set_active--> Active
//!       ^                        |                         |
//!       +---- unregister / token release -----------------+
//! ```
//!
//! A provider is never active while unregistered: removing the active
//! provider clears the selection.
//!
//! # Example
//!
//! ```rust
//! use neo_ccams::{SquawkRegistry, ProviderDescriptor, AnyProvider, SquawkCode, SquawkProvider};
//! use neo_ccams::model::{Aircraft, Flightplan};
//!
//! struct Fixed(&'static str);
//! impl SquawkProvider for Fixed {
//!     fn generate_squawk(&self, _: &str, _: &Aircraft, _: &Flightplan) -> SquawkCode {
//!         self.0.parse().unwrap()
//!     }
//!     fn provider_name(&self) -> &str {
//!         "fixed"
//!     }
//! }
//!
//! let registry = SquawkRegistry::new();
//! registry.register(ProviderDescriptor::new("builtin", 0), AnyProvider::new(Fixed("2000"))).unwrap();
//! {
//!     let _token = registry
//!         .register_with_token(ProviderDescriptor::new("ccams", 100), AnyProvider::new(Fixed("4321")))
//!         .unwrap();
//!     assert_eq!(registry.resolve().unwrap().0.name, "ccams");
//! }
//! // Token dropped: back to the built-in provider.
//! assert_eq!(registry.list_available(), vec!["builtin".to_string()]);
//! ```
//!
//! # Concurrency
//!
//! The table sits behind a reader-writer lock. Registration, removal and
//! activation take the write side; resolution and listing take the read
//! side. [`SquawkRegistry::generate_squawk`] clones the resolved provider
//! handle and releases the lock before calling it, so a slow provider never
//! blocks registration.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::model::{Aircraft, Flightplan, SquawkAssignedEvent};
use crate::provider_dyn::AnyProvider;

/// Names taken by built-in host commands and channels. Providers may not use them.
pub const RESERVED_NAMES: &[&str] = &[
    "hello", "wx", "clear", "dev", "rings", "vis", "wallop", "chat", "center",
];

/// Whether `name` is on the reserved list (exact match).
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Registration-time failures. The registry is unchanged when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A provider with this name is already registered.
    #[error("provider name {0:?} is already registered")]
    NameCollision(String),
    /// The name is reserved by the host.
    #[error("provider name {0:?} is reserved")]
    ReservedName(String),
    /// The name is empty.
    #[error("provider name must not be empty")]
    EmptyName,
}

/// Name and priority a provider is registered under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProviderDescriptor {
    /// Unique name within the registry.
    pub name: String,
    /// Higher wins when no provider is explicitly active.
    pub priority: i32,
}

impl ProviderDescriptor {
    /// Create a descriptor.
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }

    /// Descriptor reported by the provider itself.
    pub fn of(provider: &AnyProvider) -> Self {
        Self::new(provider.provider_name(), provider.priority())
    }
}

/// Identifies one registration. Never reused within a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProviderId(u64);

struct Entry {
    id: ProviderId,
    descriptor: ProviderDescriptor,
    provider: AnyProvider,
}

#[derive(Default)]
struct Table {
    // Registration order.
    entries: Vec<Entry>,
    active: Option<ProviderId>,
    next_id: u64,
}

impl Table {
    fn position_by_name(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.descriptor.name == name)
    }

    fn remove(&mut self, index: usize) -> Entry {
        let entry = self.entries.remove(index);
        if self.active == Some(entry.id) {
            self.active = None;
        }
        entry
    }

    fn resolve(&self) -> Option<&Entry> {
        if let Some(active) = self.active {
            if let Some(entry) = self.entries.iter().find(|e| e.id == active) {
                return Some(entry);
            }
        }
        // max_by_key returns the last maximum; iterate in reverse so the
        // earliest registration wins ties.
        self.entries
            .iter()
            .rev()
            .max_by_key(|e| e.descriptor.priority)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Thread-safe provider registry. Cheap to clone; clones share the table.
#[derive(Clone, Default)]
pub struct SquawkRegistry {
    table: Arc<RwLock<Table>>,
}

impl std::fmt::Debug for SquawkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SquawkRegistry")
            .field("providers", &self.list_available())
            .field("active", &self.active_name())
            .finish()
    }
}

impl SquawkRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under `descriptor`.
    pub fn register(
        &self,
        descriptor: ProviderDescriptor,
        provider: AnyProvider,
    ) -> Result<ProviderId, RegistryError> {
        if descriptor.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if is_reserved_name(&descriptor.name) {
            tracing::warn!(name = %descriptor.name, "rejected reserved provider name");
            return Err(RegistryError::ReservedName(descriptor.name));
        }

        let mut table = self.table.write();
        if table.position_by_name(&descriptor.name).is_some() {
            tracing::warn!(name = %descriptor.name, "rejected duplicate provider name");
            return Err(RegistryError::NameCollision(descriptor.name));
        }

        let id = ProviderId(table.next_id);
        table.next_id += 1;
        tracing::info!(
            name = %descriptor.name,
            priority = descriptor.priority,
            "squawk provider registered"
        );
        table.entries.push(Entry {
            id,
            descriptor,
            provider,
        });
        Ok(id)
    }

    /// Register using the name and priority the provider reports.
    pub fn register_provider(&self, provider: AnyProvider) -> Result<ProviderId, RegistryError> {
        self.register(ProviderDescriptor::of(&provider), provider)
    }

    /// Register and return a token that unregisters on release or drop.
    pub fn register_with_token(
        &self,
        descriptor: ProviderDescriptor,
        provider: AnyProvider,
    ) -> Result<RegistrationToken, RegistryError> {
        let name = descriptor.name.clone();
        let id = self.register(descriptor, provider)?;
        Ok(RegistrationToken {
            table: Arc::downgrade(&self.table),
            id: Some(id),
            name,
        })
    }

    /// [`register_with_token`](Self::register_with_token) using the provider's own descriptor.
    pub fn register_provider_with_token(
        &self,
        provider: AnyProvider,
    ) -> Result<RegistrationToken, RegistryError> {
        self.register_with_token(ProviderDescriptor::of(&provider), provider)
    }

    /// Remove the provider called `name`. Returns `false` if none was registered.
    pub fn unregister(&self, name: &str) -> bool {
        let mut table = self.table.write();
        match table.position_by_name(name) {
            Some(index) => {
                table.remove(index);
                tracing::info!(name, "squawk provider unregistered");
                true
            }
            None => false,
        }
    }

    /// Select the provider that services subsequent requests.
    ///
    /// Returns `false` and leaves the current selection untouched if `name`
    /// is not registered.
    pub fn set_active(&self, name: &str) -> bool {
        let mut table = self.table.write();
        match table.position_by_name(name) {
            Some(index) => {
                table.active = Some(table.entries[index].id);
                tracing::info!(name, "squawk provider activated");
                true
            }
            None => {
                tracing::warn!(name, "cannot activate unknown squawk provider");
                false
            }
        }
    }

    /// Drop the explicit selection and go back to priority resolution.
    pub fn clear_active(&self) {
        self.table.write().active = None;
    }

    /// Name of the explicitly selected provider, if any.
    pub fn active_name(&self) -> Option<String> {
        let table = self.table.read();
        let active = table.active?;
        table
            .entries
            .iter()
            .find(|e| e.id == active)
            .map(|e| e.descriptor.name.clone())
    }

    /// Registered names, in registration order.
    pub fn list_available(&self) -> Vec<String> {
        self.table
            .read()
            .entries
            .iter()
            .map(|e| e.descriptor.name.clone())
            .collect()
    }

    /// Whether a provider called `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.table.read().position_by_name(name).is_some()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.table.read().entries.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.table.read().entries.is_empty()
    }

    /// The provider that would service a request right now.
    pub fn resolve(&self) -> Option<(ProviderDescriptor, AnyProvider)> {
        self.table
            .read()
            .resolve()
            .map(|e| (e.descriptor.clone(), e.provider.clone()))
    }

    /// Assign a code through the resolved provider.
    ///
    /// Returns `None` only when no provider is registered. The registry lock
    /// is released before the provider runs.
    pub fn generate_squawk(
        &self,
        callsign: &str,
        aircraft: &Aircraft,
        flightplan: &Flightplan,
    ) -> Option<SquawkAssignedEvent> {
        let (descriptor, provider) = self.resolve()?;
        let squawk = provider.generate_squawk(callsign, aircraft, flightplan);
        tracing::debug!(callsign, %squawk, provider = %descriptor.name, "squawk assigned");
        Some(SquawkAssignedEvent {
            callsign: callsign.to_owned(),
            squawk,
            provider_name: descriptor.name,
        })
    }
}

// ============================================================================
// Registration Token
// ============================================================================

/// Keeps a registration alive; releasing or dropping it unregisters the
/// provider exactly once.
///
/// The token only ever removes the registration it was issued for. If that
/// provider was already unregistered explicitly, or the registry is gone,
/// release does nothing.
#[must_use = "dropping the token immediately unregisters the provider"]
pub struct RegistrationToken {
    table: Weak<RwLock<Table>>,
    id: Option<ProviderId>,
    name: String,
}

impl RegistrationToken {
    /// Name the provider was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `false` once released.
    pub fn is_held(&self) -> bool {
        self.id.is_some()
    }

    /// Unregister now. Returns `true` if this call removed the provider;
    /// later calls are no-ops returning `false`.
    pub fn release(&mut self) -> bool {
        let Some(id) = self.id.take() else {
            return false;
        };
        let Some(table) = self.table.upgrade() else {
            return false;
        };
        let mut table = table.write();
        match table.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                table.remove(index);
                tracing::info!(name = %self.name, "squawk provider registration released");
                true
            }
            None => false,
        }
    }
}

impl Drop for RegistrationToken {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for RegistrationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationToken")
            .field("name", &self.name)
            .field("held", &self.is_held())
            .finish()
    }
}
