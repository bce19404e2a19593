//! kavro client - Avro `User` records over Kafka with a schema registry
//!
//! This crate is glue. The broker protocol comes from `rdkafka`, schema
//! registration and the registry wire framing come from
//! `schema_registry_converter`, and Avro encoding comes from `apache-avro`.
//! What lives here is building their configuration and moving one record type
//! through them.
//!
//! # Examples
//!
//! ## Producer
//!
//! ```ignore
//! use kavro_client::{ProducerSettings, RegistrySettings, SecurityConfig, SaslMechanism};
//! use kavro_client::{SchemaVariant, User, UserProducer, UserSchema, UserSerializer};
//!
//! let security = SecurityConfig::new(SaslMechanism::Plain, "alice", "secret");
//! let settings = ProducerSettings::new("localhost:9092", security);
//! let registry = RegistrySettings::new("http://localhost:8081");
//! let schema = UserSchema::load(Path::new("avro"), SchemaVariant::Specific)?;
//!
//! let serializer = UserSerializer::new(&registry, &schema, "users")?;
//! let producer = UserProducer::new(&settings, "users")?;
//!
//! let user = User::new("Alice", "1 Main St", 7, "blue");
//! producer.send("key-1", &serializer.serialize(&user).await?).await?;
//! producer.flush(Duration::from_secs(30))?;
//! ```
//!
//! ## Consumer
//!
//! ```ignore
//! let consumer = UserConsumer::new(&settings, "users")?;
//! let deserializer = UserDeserializer::new(&registry, schema)?;
//!
//! let message = consumer.recv().await?;
//! if let Some(user) = deserializer.deserialize(message.payload()).await? {
//!     println!("{}", user.name);
//! }
//! ```

pub mod consumer;
pub mod delivery;
pub mod error;
pub mod producer;
pub mod schema;
pub mod security;
pub mod settings;
pub mod user;

pub use consumer::{UserConsumer, UserDeserializer};
pub use delivery::{display_key, DeliveryReport, DeliveryReporter, DeliverySummary};
pub use error::{ClientError, Result};
pub use producer::{UserProducer, UserSerializer};
pub use schema::{value_subject, SchemaVariant, UserSchema};
pub use security::{SaslMechanism, SecurityConfig, DEFAULT_BROKER_PRINCIPAL};
pub use settings::{ConsumerSettings, ProducerSettings, RegistrySettings};
pub use user::{User, UserRecord};

// Re-exported so callers can read messages without depending on rdkafka.
pub use rdkafka::message::Message;
