//! Plugin lifecycle.
//!
//! [`NeoCcams`] is what a host loads: on [`initialize`](NeoCcams::initialize)
//! it builds a [`CcamsProvider`] and registers it with the host's squawk
//! registry; on [`shutdown`](NeoCcams::shutdown) it gives the registration
//! back. The registration is held as a [`RegistrationToken`], so dropping the
//! plugin without calling `shutdown` still unregisters the provider.
//!
//! ```rust
//! use std::sync::Arc;
//! use neo_ccams::{NeoCcams, SquawkRegistry};
//! use neo_ccams::config::CcamsConfig;
//! use neo_ccams::hal::{MockAircraftRoster, MockConnection, MockControllerData, MockLogger};
//! use neo_ccams::model::ClientInformation;
//! use neo_ccams::traits::HostServices;
//!
//! let host = HostServices::new(
//!     Arc::new(MockConnection::disconnected()),
//!     Arc::new(MockAircraftRoster::default()),
//!     Arc::new(MockControllerData::default()),
//!     Arc::new(MockLogger::new()),
//! );
//! let registry = SquawkRegistry::new();
//!
//! let mut plugin = NeoCcams::new(CcamsConfig::default());
//! plugin.initialize(host, &registry, ClientInformation::default()).unwrap();
//! assert_eq!(registry.list_available(), vec!["Neo Radar CCAMS Squawk Provider".to_string()]);
//!
//! plugin.shutdown();
//! assert!(registry.is_empty());
//! ```

use std::sync::Arc;

use anyhow::Context;

use crate::ccams::CcamsProvider;
use crate::config::CcamsConfig;
use crate::hal::UreqClient;
use crate::model::ClientInformation;
use crate::provider_dyn::AnyProvider;
use crate::registry::{ProviderDescriptor, RegistrationToken, SquawkRegistry};
use crate::traits::{HostLogger, HostServices, HttpClient, SquawkProvider};

/// Plugin name reported to the host.
pub const PLUGIN_NAME: &str = "NeoCCAMS";

/// Plugin author reported to the host.
pub const PLUGIN_AUTHOR: &str = "French VACC";

/// Plugin identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginMetadata {
    /// Plugin name.
    pub name: String,
    /// Plugin version.
    pub version: String,
    /// Plugin author.
    pub author: String,
}

struct Running {
    provider: Arc<dyn SquawkProvider>,
    token: RegistrationToken,
    logger: Arc<dyn HostLogger>,
}

/// The CCAMS squawk plugin.
pub struct NeoCcams {
    config: CcamsConfig,
    running: Option<Running>,
}

impl NeoCcams {
    /// Plugin with the given provider configuration. Nothing is registered yet.
    pub fn new(config: CcamsConfig) -> Self {
        Self {
            config,
            running: None,
        }
    }

    /// Static plugin identity.
    pub fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            name: String::from(PLUGIN_NAME),
            version: String::from(env!("CARGO_PKG_VERSION")),
            author: String::from(PLUGIN_AUTHOR),
        }
    }

    /// `true` between a successful `initialize` and `shutdown`.
    pub fn is_initialized(&self) -> bool {
        self.running.is_some()
    }

    /// The registered provider, while running.
    pub fn provider(&self) -> Option<&Arc<dyn SquawkProvider>> {
        self.running.as_ref().map(|r| &r.provider)
    }

    /// Build the provider with the HTTPS client and register it.
    pub fn initialize(
        &mut self,
        host: HostServices,
        registry: &SquawkRegistry,
        client_info: ClientInformation,
    ) -> anyhow::Result<()> {
        let client = UreqClient::new(&self.config);
        self.initialize_with_client(host, registry, client_info, client)
    }

    /// Like [`initialize`](Self::initialize) with a caller-supplied transport.
    pub fn initialize_with_client<C: HttpClient + 'static>(
        &mut self,
        host: HostServices,
        registry: &SquawkRegistry,
        client_info: ClientInformation,
        client: C,
    ) -> anyhow::Result<()> {
        if self.running.is_some() {
            anyhow::bail!("{PLUGIN_NAME} is already initialized");
        }

        let logger = host.logger.clone();
        logger.info(&format!(
            "Initializing {PLUGIN_NAME} {} in {} {}",
            self.metadata().version,
            client_info.client_name,
            client_info.client_version
        ));

        let result = self.start(host, registry, client);
        match &result {
            Ok(()) => logger.info(&format!("{PLUGIN_NAME} initialized successfully")),
            Err(e) => logger.error(&format!("Failed to initialize {PLUGIN_NAME}: {e:#}")),
        }
        result
    }

    fn start<C: HttpClient + 'static>(
        &mut self,
        host: HostServices,
        registry: &SquawkRegistry,
        client: C,
    ) -> anyhow::Result<()> {
        let logger = host.logger.clone();
        let provider = CcamsProvider::new(self.config.clone(), host, client)
            .context("invalid CCAMS configuration")?;
        let provider: Arc<dyn SquawkProvider> = Arc::new(provider);

        let descriptor = ProviderDescriptor::new(&self.config.provider_name, self.config.priority);
        let token = registry
            .register_with_token(descriptor, AnyProvider::from_arc(provider.clone()))
            .context("squawk provider registration failed")?;

        self.running = Some(Running {
            provider,
            token,
            logger,
        });
        Ok(())
    }

    /// Unregister the provider. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(mut running) = self.running.take() {
            running.token.release();
            running.logger.info(&format!("{PLUGIN_NAME} shutdown complete"));
        }
    }
}

impl Drop for NeoCcams {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for NeoCcams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeoCcams")
            .field("initialized", &self.is_initialized())
            .field("provider_name", &self.config.provider_name)
            .finish()
    }
}
