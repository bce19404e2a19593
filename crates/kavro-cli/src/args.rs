//! Command-line arguments for `avro-producer` and `avro-consumer`.

use std::path::PathBuf;

use clap::{Args, Parser};
use kavro_client::{
    ConsumerSettings, ProducerSettings, RegistrySettings, SaslMechanism, SchemaVariant,
    SecurityConfig, UserSchema, DEFAULT_BROKER_PRINCIPAL,
};

use crate::config::Config;
use crate::output::OutputFormat;
use crate::schemas;

/// Topic used when `-t` is not given.
pub const DEFAULT_TOPIC: &str = "example_serde_avro";

/// Consumer group used when `-g` is not given.
pub const DEFAULT_GROUP: &str = "example_serde_avro";

/// Broker, registry and authentication flags shared by both tools.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Bootstrap broker(s) (host[:port])
    #[arg(short = 'b', long = "bootstrap-servers", env = "KAVRO_BOOTSTRAP_SERVERS")]
    pub bootstrap_servers: String,

    /// Schema Registry (http(s)://host[:port])
    #[arg(short = 's', long = "schema-registry", env = "KAVRO_SCHEMA_REGISTRY")]
    pub schema_registry: String,

    /// Topic name
    #[arg(short = 't', long, env = "KAVRO_TOPIC", default_value = DEFAULT_TOPIC)]
    pub topic: String,

    /// Avro specific record ("true" selects the namespaced schema)
    #[arg(short = 'p', long = "specific", default_value = "true")]
    pub specific: String,

    /// SASL mechanism to use for authentication (GSSAPI, PLAIN, SCRAM-SHA-256, SCRAM-SHA-512)
    #[arg(short = 'm', long = "sasl-mechanism", default_value = "PLAIN")]
    pub sasl_mechanism: SaslMechanism,

    /// Use SASL_SSL instead of SASL_PLAINTEXT
    #[arg(long)]
    pub tls: bool,

    /// Path to CA certificate for TLS authentication
    #[arg(long = "cacert")]
    pub ca_cert: Option<PathBuf>,

    /// Username
    #[arg(long = "user", env = "KAVRO_USER")]
    pub user_principal: String,

    /// Password for PLAIN and SCRAM, or path to keytab (ignored on Windows) if GSSAPI
    #[arg(long = "password", env = "KAVRO_PASSWORD", hide_env_values = true)]
    pub user_secret: String,

    /// Kerberos service name of the brokers (GSSAPI only)
    #[arg(long, default_value = DEFAULT_BROKER_PRINCIPAL)]
    pub broker_principal: String,

    /// Directory holding user_specific.avsc and user_generic.avsc (default: the
    /// schemas built into the binary)
    #[arg(long, env = "KAVRO_SCHEMA_DIR")]
    pub schema_dir: Option<PathBuf>,

    /// Config file (default: ~/.kavro/config.toml when present)
    #[arg(long, env = "KAVRO_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    pub fn variant(&self) -> SchemaVariant {
        SchemaVariant::from_flag(&self.specific)
    }

    pub fn schema(&self) -> kavro_client::Result<UserSchema> {
        schemas::load(self.schema_dir.as_deref(), self.variant())
    }

    pub fn security(&self) -> SecurityConfig {
        let security = SecurityConfig::new(
            self.sasl_mechanism,
            self.user_principal.clone(),
            self.user_secret.clone(),
        )
        .with_broker_principal(self.broker_principal.clone());

        if self.tls {
            security.with_tls(self.ca_cert.clone())
        } else {
            security
        }
    }

    pub fn producer_settings(&self, config: &Config) -> ProducerSettings {
        ProducerSettings::new(self.bootstrap_servers.clone(), self.security())
            .with_extra(config.kafka_properties())
    }

    pub fn consumer_settings(&self, group: &str, config: &Config) -> ConsumerSettings {
        ConsumerSettings::new(self.bootstrap_servers.clone(), group, self.security())
            .with_extra(config.kafka_properties())
    }

    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings::new(self.schema_registry.clone()).with_ca_cert(self.ca_cert.clone())
    }
}

/// AvroSerializer example: read users from stdin and produce them as Avro.
#[derive(Parser, Debug)]
#[command(name = "avro-producer", version)]
#[command(about = "AvroSerializer example: produce User records typed on stdin")]
pub struct ProducerArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Schema Registry user
    #[arg(long = "registry-user", visible_alias = "su", env = "KAVRO_REGISTRY_USER")]
    pub registry_user: Option<String>,

    /// Schema Registry password
    #[arg(
        long = "registry-password",
        visible_alias = "sp",
        env = "KAVRO_REGISTRY_PASSWORD",
        hide_env_values = true
    )]
    pub registry_password: Option<String>,
}

impl ProducerArgs {
    pub fn registry_settings(&self) -> RegistrySettings {
        self.connection
            .registry_settings()
            .with_credentials(self.registry_user.clone(), self.registry_password.clone())
    }
}

/// AvroDeserializer example: consume User records and print them.
#[derive(Parser, Debug)]
#[command(name = "avro-consumer", version)]
#[command(about = "AvroDeserializer example: consume and print User records")]
pub struct ConsumerArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Consumer group
    #[arg(short = 'g', long, env = "KAVRO_GROUP", default_value = DEFAULT_GROUP)]
    pub group: String,

    /// How to print consumed records
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}
