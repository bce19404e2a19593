//! Configuration maps for the broker clients and the schema registry.
//!
//! Properties are assembled into an ordered map before being handed to
//! rdkafka so they can be inspected and logged. Later layers win:
//! extra properties from the config file, then the required properties, then
//! the security properties.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rdkafka::ClientConfig;
use schema_registry_converter::async_impl::schema_registry::SrSettings;

use crate::error::{ClientError, Result};
use crate::security::SecurityConfig;

/// Where a fresh consumer group starts reading.
pub const AUTO_OFFSET_RESET: &str = "earliest";

fn to_client_config(props: &BTreeMap<String, String>) -> ClientConfig {
    let mut config = ClientConfig::new();
    for (key, value) in props {
        config.set(key.as_str(), value.as_str());
    }
    config
}

fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Config(format!("{} must not be empty", what)));
    }
    Ok(())
}

/// Settings for the `User` producer.
#[derive(Debug, Clone)]
pub struct ProducerSettings {
    pub bootstrap_servers: String,
    pub security: SecurityConfig,
    /// Pass-through librdkafka properties.
    pub extra: BTreeMap<String, String>,
}

impl ProducerSettings {
    pub fn new(bootstrap_servers: impl Into<String>, security: SecurityConfig) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.into(),
            security,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, extra: BTreeMap<String, String>) -> Self {
        self.extra = extra;
        self
    }

    pub fn properties(&self) -> Result<BTreeMap<String, String>> {
        require_non_empty(&self.bootstrap_servers, "bootstrap servers")?;

        let mut props = self.extra.clone();
        props.insert(
            "bootstrap.servers".to_string(),
            self.bootstrap_servers.clone(),
        );
        props.extend(self.security.properties());
        Ok(props)
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        Ok(to_client_config(&self.properties()?))
    }
}

/// Settings for the `User` consumer.
#[derive(Debug, Clone)]
pub struct ConsumerSettings {
    pub bootstrap_servers: String,
    pub group_id: String,
    pub security: SecurityConfig,
    pub extra: BTreeMap<String, String>,
}

impl ConsumerSettings {
    pub fn new(
        bootstrap_servers: impl Into<String>,
        group_id: impl Into<String>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.into(),
            group_id: group_id.into(),
            security,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, extra: BTreeMap<String, String>) -> Self {
        self.extra = extra;
        self
    }

    pub fn properties(&self) -> Result<BTreeMap<String, String>> {
        require_non_empty(&self.bootstrap_servers, "bootstrap servers")?;
        require_non_empty(&self.group_id, "consumer group")?;

        let mut props = self.extra.clone();
        props.insert(
            "bootstrap.servers".to_string(),
            self.bootstrap_servers.clone(),
        );
        props.insert("group.id".to_string(), self.group_id.clone());
        props.insert(
            "auto.offset.reset".to_string(),
            AUTO_OFFSET_RESET.to_string(),
        );
        props.extend(self.security.properties());
        Ok(props)
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        Ok(to_client_config(&self.properties()?))
    }
}

/// Schema registry connection settings.
#[derive(Debug, Clone, Default)]
pub struct RegistrySettings {
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub ca_cert: Option<PathBuf>,
}

impl RegistrySettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, user: Option<String>, password: Option<String>) -> Self {
        self.user = user;
        self.password = password;
        self
    }

    pub fn with_ca_cert(mut self, ca_cert: Option<PathBuf>) -> Self {
        self.ca_cert = ca_cert;
        self
    }

    /// Basic auth credentials, only when both user and password are set.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some((user.as_str(), password.as_str())),
            _ => None,
        }
    }

    pub fn is_https(&self) -> bool {
        self.url.trim_start().to_ascii_lowercase().starts_with("https")
    }

    /// CA certificate requested for an `https` registry, if any.
    pub fn requested_ca_cert(&self) -> Option<&PathBuf> {
        self.ca_cert.as_ref().filter(|_| self.is_https())
    }

    pub fn sr_settings(&self) -> Result<SrSettings> {
        require_non_empty(&self.url, "schema registry url")?;

        if let Some(ca) = self.requested_ca_cert() {
            tracing::warn!(
                ca_cert = %ca.display(),
                "custom CA is not applied to the schema registry client; the platform trust store is used"
            );
        }

        let mut builder = SrSettings::new_builder(self.url.trim().to_string());
        if let Some((user, password)) = self.basic_auth() {
            builder.set_basic_authorization(user, Some(password));
        }
        Ok(builder.build()?)
    }
}
