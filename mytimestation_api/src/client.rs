//! HTTP client for the MyTimeStation API.

use std::fmt;
use std::sync::Arc;

use crate::config::{Config, Settings};
use crate::department::DepartmentClient;
use crate::employee::EmployeeClient;
use crate::logging::Logger;
use crate::transport::{AuthTransport, Transport};
use crate::Error;

/// Client for the MyTimeStation API.
///
/// Cheap to clone and safe to share between tasks: it holds no per-request
/// state, so concurrent calls are as safe as the configured transport.
/// Settings are resolved once when the client is built.
#[derive(Clone)]
pub struct Client {
    settings: Arc<Settings>,
    transport: Arc<dyn Transport>,
    logger: Logger,
}

impl Client {
    /// Creates a client from `config`, reading `$MTS_AUTH_TOKEN` if no token is set.
    pub fn new(config: Config) -> Result<Self, Error> {
        let settings = config.resolve();
        Self::with_settings(settings, config)
    }

    /// Creates a client from already resolved `settings`. Only the transport
    /// and log dispatch are taken from `config`.
    pub fn with_settings(settings: Settings, config: Config) -> Result<Self, Error> {
        let settings = Arc::new(settings);
        let logger = Logger::new(config.log_dispatch, settings.debug());
        let transport = AuthTransport::new(settings.clone(), config.transport, logger.clone())?;
        Ok(Self {
            settings,
            transport: Arc::new(transport),
            logger,
        })
    }

    /// The effective settings this client was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Employee related API methods.
    pub fn employees(&self) -> EmployeeClient<'_> {
        EmployeeClient::new(self)
    }

    /// Department related API methods.
    pub fn departments(&self) -> DepartmentClient<'_> {
        DepartmentClient::new(self)
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
