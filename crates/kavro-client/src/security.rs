//! SASL / TLS settings shared by the producer and the consumer.
//!
//! | Property                     | Set when                               |
//! |------------------------------|----------------------------------------|
//! | `sasl.mechanism`             | always                                 |
//! | `security.protocol`          | always: `SASL_SSL` or `SASL_PLAINTEXT` |
//! | `ssl.ca.location`            | TLS enabled and a CA path is given     |
//! | `sasl.username`/`password`   | mechanism is not GSSAPI                |
//! | `sasl.kerberos.*`            | mechanism is GSSAPI                    |

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ClientError;

/// Kerberos service name used when none is configured.
pub const DEFAULT_BROKER_PRINCIPAL: &str = "kafka";

/// SASL mechanism used to authenticate with the brokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaslMechanism {
    Gssapi,
    #[default]
    Plain,
    ScramSha256,
    ScramSha512,
}

impl SaslMechanism {
    pub const ALL: [SaslMechanism; 4] = [
        SaslMechanism::Gssapi,
        SaslMechanism::Plain,
        SaslMechanism::ScramSha256,
        SaslMechanism::ScramSha512,
    ];

    /// The name librdkafka expects for `sasl.mechanism`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SaslMechanism::Gssapi => "GSSAPI",
            SaslMechanism::Plain => "PLAIN",
            SaslMechanism::ScramSha256 => "SCRAM-SHA-256",
            SaslMechanism::ScramSha512 => "SCRAM-SHA-512",
        }
    }
}

impl fmt::Display for SaslMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaslMechanism {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        SaslMechanism::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| {
                ClientError::Config(format!(
                    "invalid SASL mechanism '{}': expected one of GSSAPI, PLAIN, SCRAM-SHA-256, SCRAM-SHA-512",
                    s
                ))
            })
    }
}

/// Broker authentication settings.
///
/// `user_secret` is the password for PLAIN and SCRAM, or the keytab path for
/// GSSAPI.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub mechanism: SaslMechanism,
    pub tls: bool,
    pub ca_cert: Option<PathBuf>,
    pub user_principal: String,
    pub user_secret: String,
    pub broker_principal: String,
}

impl SecurityConfig {
    pub fn new(
        mechanism: SaslMechanism,
        user_principal: impl Into<String>,
        user_secret: impl Into<String>,
    ) -> Self {
        Self {
            mechanism,
            tls: false,
            ca_cert: None,
            user_principal: user_principal.into(),
            user_secret: user_secret.into(),
            broker_principal: DEFAULT_BROKER_PRINCIPAL.to_string(),
        }
    }

    /// Enable TLS, optionally trusting a specific CA certificate.
    pub fn with_tls(mut self, ca_cert: Option<PathBuf>) -> Self {
        self.tls = true;
        self.ca_cert = ca_cert;
        self
    }

    pub fn with_broker_principal(mut self, principal: impl Into<String>) -> Self {
        self.broker_principal = principal.into();
        self
    }

    pub fn security_protocol(&self) -> &'static str {
        if self.tls {
            "SASL_SSL"
        } else {
            "SASL_PLAINTEXT"
        }
    }

    /// librdkafka properties for this configuration.
    pub fn properties(&self) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        props.insert(
            "sasl.mechanism".to_string(),
            self.mechanism.as_str().to_string(),
        );
        props.insert(
            "security.protocol".to_string(),
            self.security_protocol().to_string(),
        );

        if self.tls {
            if let Some(ca) = &self.ca_cert {
                props.insert(
                    "ssl.ca.location".to_string(),
                    ca.to_string_lossy().into_owned(),
                );
            }
        }

        match self.mechanism {
            SaslMechanism::Gssapi => {
                props.insert(
                    "sasl.kerberos.service.name".to_string(),
                    self.broker_principal.clone(),
                );
                props.insert(
                    "sasl.kerberos.principal".to_string(),
                    self.user_principal.clone(),
                );
                // Keytabs are not supported on Windows; librdkafka falls back
                // to the logged-on user's credentials there.
                props.insert(
                    "sasl.kerberos.keytab".to_string(),
                    self.user_secret.clone(),
                );
            }
            _ => {
                props.insert("sasl.username".to_string(), self.user_principal.clone());
                props.insert("sasl.password".to_string(), self.user_secret.clone());
            }
        }

        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mechanism_parse_case_insensitive() {
        assert_eq!("plain".parse::<SaslMechanism>().unwrap(), SaslMechanism::Plain);
        assert_eq!("Gssapi".parse::<SaslMechanism>().unwrap(), SaslMechanism::Gssapi);
        assert_eq!(
            "scram-sha-512".parse::<SaslMechanism>().unwrap(),
            SaslMechanism::ScramSha512
        );
        assert_eq!(
            "SCRAM-SHA-256".parse::<SaslMechanism>().unwrap(),
            SaslMechanism::ScramSha256
        );
    }

    #[test]
    fn test_mechanism_parse_invalid() {
        let err = "OAUTHBEARER".parse::<SaslMechanism>().unwrap_err();
        assert!(err.to_string().contains("OAUTHBEARER"));
    }

    #[test]
    fn test_default_mechanism_is_plain() {
        assert_eq!(SaslMechanism::default(), SaslMechanism::Plain);
    }

    #[test]
    fn test_plain_without_tls() {
        let props = SecurityConfig::new(SaslMechanism::Plain, "alice", "s3cret").properties();
        assert_eq!(props["sasl.mechanism"], "PLAIN");
        assert_eq!(props["security.protocol"], "SASL_PLAINTEXT");
        assert_eq!(props["sasl.username"], "alice");
        assert_eq!(props["sasl.password"], "s3cret");
        assert!(!props.contains_key("ssl.ca.location"));
        assert!(!props.contains_key("sasl.kerberos.principal"));
    }

    #[test]
    fn test_ca_cert_ignored_without_tls() {
        let mut config = SecurityConfig::new(SaslMechanism::Plain, "alice", "s3cret");
        config.ca_cert = Some(PathBuf::from("/etc/ca.pem"));
        let props = config.properties();
        assert!(!props.contains_key("ssl.ca.location"));
    }

    #[test]
    fn test_scram_with_tls_and_ca() {
        let props = SecurityConfig::new(SaslMechanism::ScramSha512, "bob", "pw")
            .with_tls(Some(PathBuf::from("/etc/kafka/ca.pem")))
            .properties();
        assert_eq!(props["sasl.mechanism"], "SCRAM-SHA-512");
        assert_eq!(props["security.protocol"], "SASL_SSL");
        assert_eq!(props["ssl.ca.location"], "/etc/kafka/ca.pem");
        assert_eq!(props["sasl.username"], "bob");
    }

    #[test]
    fn test_tls_without_ca() {
        let props = SecurityConfig::new(SaslMechanism::Plain, "bob", "pw")
            .with_tls(None)
            .properties();
        assert_eq!(props["security.protocol"], "SASL_SSL");
        assert!(!props.contains_key("ssl.ca.location"));
    }

    #[test]
    fn test_gssapi_uses_kerberos_properties() {
        let props = SecurityConfig::new(SaslMechanism::Gssapi, "client@EXAMPLE.COM", "/etc/client.keytab")
            .with_broker_principal("kafka-broker")
            .properties();
        assert_eq!(props["sasl.mechanism"], "GSSAPI");
        assert_eq!(props["sasl.kerberos.service.name"], "kafka-broker");
        assert_eq!(props["sasl.kerberos.principal"], "client@EXAMPLE.COM");
        assert_eq!(props["sasl.kerberos.keytab"], "/etc/client.keytab");
        assert!(!props.contains_key("sasl.username"));
        assert!(!props.contains_key("sasl.password"));
    }

    #[test]
    fn test_gssapi_default_service_name() {
        let props = SecurityConfig::new(SaslMechanism::Gssapi, "client", "keytab").properties();
        assert_eq!(props["sasl.kerberos.service.name"], DEFAULT_BROKER_PRINCIPAL);
    }
}
