use figment::{
    providers::{Env, Serialized},
    Figment,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SERVER_URL, ENV_PREFIX};
use crate::utils::BankingError;

/// Where the banking gateway lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL every request path is appended to
    pub server: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.server
    }
}

/// Build the layered configuration: defaults, then `MIFOS_*`, then the flag
fn figment(server_flag: Option<&str>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(ServerConfig::default()))
        .merge(Env::prefixed(ENV_PREFIX).only(&["server"]));

    if let Some(server) = server_flag.map(str::trim).filter(|s| !s.is_empty()) {
        figment = figment.merge(Serialized::default("server", server));
    }

    figment
}

/// Resolve the gateway configuration once at startup
pub fn load_config(server_flag: Option<&str>) -> Result<ServerConfig, BankingError> {
    let mut config: ServerConfig = figment(server_flag)
        .extract()
        .map_err(|e| BankingError::InvalidConfig(e.to_string()))?;

    // An exported-but-empty MIFOS_SERVER behaves as if unset
    if config.server.trim().is_empty() {
        tracing::warn!("{}SERVER is empty, using {}", ENV_PREFIX, DEFAULT_SERVER_URL);
        config.server = DEFAULT_SERVER_URL.to_string();
    }

    let server = config.server.trim().trim_end_matches('/');
    let url = Url::parse(server)
        .map_err(|e| BankingError::InvalidConfig(format!("invalid server URL '{}': {}", server, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BankingError::InvalidConfig(format!(
            "server URL '{}' must use http or https",
            server
        )));
    }

    config.server = server.to_string();
    tracing::debug!("Using gateway at {}", config.server);
    Ok(config)
}
