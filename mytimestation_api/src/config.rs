//! Client configuration and effective-value resolution.

use std::fmt;
use std::sync::Arc;

use crate::transport::Transport;

/// Environment variable consulted when no auth token is configured.
pub const AUTH_TOKEN_ENV_VAR: &str = "MTS_AUTH_TOKEN";

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_HOST: &str = "api.mytimestation.com";
const DEFAULT_API_VERSION: &str = "v1.2";
const DEFAULT_USER_AGENT: &str = concat!("mytimestation-rs/", env!("CARGO_PKG_VERSION"));

/// Configuration for a [`Client`](crate::Client).
///
/// Every field may be left empty; [`Config::resolve`] fills the gaps with
/// the environment (auth token only) and the built-in defaults. The
/// configuration is consumed when a client is built, so later edits to a
/// cloned `Config` never reach an existing client.
#[derive(Clone, Default)]
pub struct Config {
    /// URL scheme. Defaults to `https`, the only scheme the production API serves.
    pub protocol: String,

    /// Value for the `User-Agent` header.
    pub user_agent: String,

    /// API host. Defaults to `api.mytimestation.com`.
    pub host: String,

    /// API version path segment. Defaults to `v1.2`.
    pub api_version: String,

    /// Enables request and response dumping at debug level.
    pub debug: bool,

    /// Token used as the Basic auth username. Falls back to `$MTS_AUTH_TOKEN`.
    pub auth_token: String,

    /// Transport that performs the request after the auth headers are set.
    /// Defaults to a plain `reqwest::Client`.
    pub transport: Option<Arc<dyn Transport>>,

    /// Dispatch that receives the client's log events. Defaults to a text
    /// logger on stderr at `info` (or `debug` when [`Config::debug`] is set).
    pub log_dispatch: Option<tracing::Dispatch>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_protocol(mut self, protocol: &str) -> Self {
        self.protocol = protocol.to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_auth_token(mut self, auth_token: &str) -> Self {
        self.auth_token = auth_token.to_string();
        self
    }

    /// Sets the transport wrapped by the authenticating transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Routes the client's log events to `dispatch` instead of the default
    /// stderr logger.
    pub fn with_log_dispatch(mut self, dispatch: tracing::Dispatch) -> Self {
        self.log_dispatch = Some(dispatch);
        self
    }

    /// Resolves the effective settings, reading `$MTS_AUTH_TOKEN` once.
    pub fn resolve(&self) -> Settings {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolves the effective settings using `env` as the environment lookup.
    pub fn resolve_with<F>(&self, env: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth_token = if self.auth_token.is_empty() {
            env(AUTH_TOKEN_ENV_VAR).unwrap_or_default()
        } else {
            self.auth_token.clone()
        };

        Settings {
            protocol: or_default(&self.protocol, DEFAULT_PROTOCOL),
            host: or_default(&self.host, DEFAULT_HOST),
            api_version: or_default(&self.api_version, DEFAULT_API_VERSION),
            user_agent: or_default(&self.user_agent, DEFAULT_USER_AGENT),
            auth_token,
            debug: self.debug,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("protocol", &self.protocol)
            .field("user_agent", &self.user_agent)
            .field("host", &self.host)
            .field("api_version", &self.api_version)
            .field("debug", &self.debug)
            .field("auth_token", &redact(&self.auth_token))
            .field("transport", &self.transport.as_ref().map(|_| ".."))
            .field("log_dispatch", &self.log_dispatch.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Effective configuration values, every fallback already applied.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    protocol: String,
    host: String,
    api_version: String,
    user_agent: String,
    auth_token: String,
    debug: bool,
}

impl Settings {
    /// Auth token; empty when neither the config nor the environment set one.
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// `{protocol}://{host}/{api_version}`, e.g. `https://api.mytimestation.com/v1.2`.
    pub fn base_url(&self) -> String {
        format!("{}://{}/{}", self.protocol, self.host, self.api_version)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url())
            .field("user_agent", &self.user_agent)
            .field("auth_token", &redact(&self.auth_token))
            .field("debug", &self.debug)
            .finish()
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn redact(token: &str) -> &'static str {
    if token.is_empty() {
        ""
    } else {
        "[redacted]"
    }
}
