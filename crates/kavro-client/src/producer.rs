//! Producing `User` records.
//!
//! [`UserSerializer`] turns a [`User`] into Confluent-framed Avro bytes via
//! the schema registry. [`UserProducer`] hands those bytes to librdkafka,
//! whose background thread delivers them and calls the
//! [`DeliveryReporter`](crate::delivery::DeliveryReporter).
//!
//! ```ignore
//! let serializer = UserSerializer::new(&registry, &schema, "users")?;
//! let producer = UserProducer::new(&settings, "users")?;
//!
//! let payload = serializer.serialize(&user).await?;
//! producer.send(&Uuid::new_v4().to_string(), &payload).await?;
//!
//! let summary = producer.flush(Duration::from_secs(30))?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use rdkafka::error::KafkaError;
use rdkafka::producer::{BaseRecord, Producer, ThreadedProducer};
use rdkafka::types::RDKafkaErrorCode;
use schema_registry_converter::async_impl::avro::AvroEncoder;
use schema_registry_converter::schema_registry_common::SubjectNameStrategy;

use crate::delivery::{DeliveryReporter, DeliveryStats, DeliverySummary};
use crate::error::Result;
use crate::schema::UserSchema;
use crate::settings::{ProducerSettings, RegistrySettings};
use crate::user::{User, UserRecord};

/// How long to wait before retrying when librdkafka's local queue is full.
const QUEUE_FULL_BACKOFF: Duration = Duration::from_millis(100);

/// Serializes users for the value subject of one topic.
pub struct UserSerializer<'a> {
    encoder: AvroEncoder<'a>,
    strategy: SubjectNameStrategy,
}

impl<'a> UserSerializer<'a> {
    pub fn new(registry: &RegistrySettings, schema: &UserSchema, topic: &str) -> Result<Self> {
        let encoder = AvroEncoder::new(registry.sr_settings()?);
        Ok(Self {
            encoder,
            strategy: schema.value_strategy(topic),
        })
    }

    /// Encode `user` without its address. The first call registers the
    /// schema; later calls reuse the cached schema id.
    pub async fn serialize(&self, user: &User) -> Result<Vec<u8>> {
        let record = UserRecord::from(user);
        let bytes = self.encoder.encode_struct(record, &self.strategy).await?;
        Ok(bytes)
    }
}

/// Threaded rdkafka producer bound to a single topic.
pub struct UserProducer {
    producer: ThreadedProducer<DeliveryReporter>,
    topic: String,
    stats: Arc<DeliveryStats>,
}

impl UserProducer {
    pub fn new(settings: &ProducerSettings, topic: impl Into<String>) -> Result<Self> {
        let reporter = DeliveryReporter::new();
        let stats = reporter.stats();
        let producer: ThreadedProducer<DeliveryReporter> =
            settings.client_config()?.create_with_context(reporter)?;

        let topic = topic.into();
        tracing::info!(
            bootstrap_servers = %settings.bootstrap_servers,
            topic = %topic,
            mechanism = %settings.security.mechanism,
            "producer created"
        );

        Ok(Self {
            producer,
            topic,
            stats,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Enqueue one message. Returns once librdkafka accepted it; the outcome
    /// arrives later through the delivery report.
    pub async fn send(&self, key: &str, payload: &[u8]) -> Result<()> {
        let mut record = BaseRecord::to(&self.topic).key(key).payload(payload);
        loop {
            match self.producer.send(record) {
                Ok(()) => return Ok(()),
                Err((KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull), returned)) => {
                    tracing::debug!(key, "producer queue full, backing off");
                    record = returned;
                    tokio::time::sleep(QUEUE_FULL_BACKOFF).await;
                }
                Err((e, _)) => return Err(e.into()),
            }
        }
    }

    /// Messages enqueued but not yet acknowledged.
    pub fn in_flight(&self) -> i32 {
        self.producer.in_flight_count()
    }

    /// Block until outstanding messages are delivered or `timeout` passes.
    pub fn flush(&self, timeout: Duration) -> Result<DeliverySummary> {
        tracing::debug!(in_flight = self.in_flight(), ?timeout, "flushing producer");
        self.producer.flush(timeout)?;
        Ok(self.stats.snapshot())
    }

    pub fn summary(&self) -> DeliverySummary {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::{SaslMechanism, SecurityConfig};

    fn settings() -> ProducerSettings {
        // Nothing listens here; creating the client does not connect.
        ProducerSettings::new(
            "127.0.0.1:1",
            SecurityConfig::new(SaslMechanism::Plain, "alice", "secret"),
        )
    }

    #[test]
    fn test_producer_creation_is_offline() {
        let producer = UserProducer::new(&settings(), "users").unwrap();
        assert_eq!(producer.topic(), "users");
        assert_eq!(producer.in_flight(), 0);
        assert_eq!(producer.summary(), DeliverySummary::default());
    }

    #[test]
    fn test_flush_with_nothing_queued() {
        let producer = UserProducer::new(&settings(), "users").unwrap();
        let summary = producer.flush(Duration::from_millis(100)).unwrap();
        assert_eq!(summary, DeliverySummary::default());
    }

    const SCHEMAS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../kavro-cli/avro");

    #[tokio::test]
    async fn test_serialize_registers_value_subject_once() {
        let mut server = mockito::Server::new_async().await;
        let registration = server
            .mock("POST", "/subjects/users-value/versions")
            .with_status(200)
            .with_header("content-type", "application/vnd.schemaregistry.v1+json")
            .with_body(r#"{"id":23}"#)
            .expect(1)
            .create_async()
            .await;

        let schema = UserSchema::load(
            std::path::Path::new(SCHEMAS),
            crate::schema::SchemaVariant::Specific,
        )
        .unwrap();
        let registry = RegistrySettings::new(server.url());
        let serializer = UserSerializer::new(&registry, &schema, "users").unwrap();

        let user = User::new("Alice", "1 Secret Lane", 42, "blue");
        let first = serializer.serialize(&user).await.unwrap();
        let second = serializer.serialize(&user).await.unwrap();
        registration.assert_async().await;
        assert_eq!(first, second);

        // Magic byte, then the big-endian schema id.
        assert_eq!(first[0], 0);
        assert_eq!(&first[1..5], &23u32.to_be_bytes());

        let value =
            apache_avro::from_avro_datum(schema.parsed(), &mut &first[5..], None).unwrap();
        let decoded = User::from_avro(value, schema.parsed()).unwrap().unwrap();
        assert_eq!(UserRecord::from(&decoded), UserRecord::from(&user));
    }

    #[tokio::test]
    async fn test_serialized_bytes_never_contain_address() {
        let mut server = mockito::Server::new_async().await;
        let _registration = server
            .mock("POST", "/subjects/users-value/versions")
            .with_status(200)
            .with_body(r#"{"id":1}"#)
            .create_async()
            .await;

        let schema = UserSchema::load(
            std::path::Path::new(SCHEMAS),
            crate::schema::SchemaVariant::Generic,
        )
        .unwrap();
        let registry = RegistrySettings::new(server.url());
        let serializer = UserSerializer::new(&registry, &schema, "users").unwrap();

        let address = b"742 Evergreen Terrace";
        let user = User::new("Homer", "742 Evergreen Terrace", 1, "pink");
        let bytes = serializer.serialize(&user).await.unwrap();
        assert!(!bytes.windows(address.len()).any(|w| w == address));
        assert!(bytes.windows(b"Homer".len()).any(|w| w == b"Homer"));
    }

    #[tokio::test]
    async fn test_serialize_registry_error() {
        let mut server = mockito::Server::new_async().await;
        let _registration = server
            .mock("POST", "/subjects/users-value/versions")
            .with_status(409)
            .with_body(r#"{"error_code":409,"message":"Schema being registered is incompatible"}"#)
            .create_async()
            .await;

        let schema = UserSchema::load(
            std::path::Path::new(SCHEMAS),
            crate::schema::SchemaVariant::Generic,
        )
        .unwrap();
        let registry = RegistrySettings::new(server.url());
        let serializer = UserSerializer::new(&registry, &schema, "users").unwrap();

        let err = serializer
            .serialize(&User::new("Alice", "x", 1, "blue"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::ClientError::Registry(_)));
    }

    #[test]
    fn test_producer_rejects_empty_bootstrap() {
        let mut settings = settings();
        settings.bootstrap_servers = String::new();
        assert!(UserProducer::new(&settings, "users").is_err());
    }
}
