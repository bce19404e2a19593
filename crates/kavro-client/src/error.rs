//! Error types for kavro client operations.
//!
//! Errors are grouped by where they come from: local configuration, the schema
//! files on disk, the schema registry, Avro value conversion, and the broker
//! client. Broker delivery failures are not errors here; they arrive through
//! the delivery report callback (see [`crate::delivery`]).

use rdkafka::error::KafkaError;
use thiserror::Error;

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while building clients or moving `User` records.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid or missing configuration, such as empty bootstrap servers or
    /// an unknown SASL mechanism.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A schema file could not be read or parsed.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The schema registry rejected a request or could not be reached.
    #[error("Schema registry error: {0}")]
    Registry(String),

    /// An Avro value did not match the expected `User` shape.
    #[error("Avro error: {0}")]
    Avro(String),

    /// Error reported by librdkafka while creating a client or enqueueing.
    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<apache_avro::Error> for ClientError {
    fn from(e: apache_avro::Error) -> Self {
        ClientError::Avro(e.to_string())
    }
}

impl From<schema_registry_converter::error::SRCError> for ClientError {
    fn from(e: schema_registry_converter::error::SRCError) -> Self {
        ClientError::Registry(e.to_string())
    }
}
