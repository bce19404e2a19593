//! Consuming `User` records.

use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::BorrowedMessage;
use schema_registry_converter::async_impl::avro::AvroDecoder;

use crate::error::Result;
use crate::schema::UserSchema;
use crate::settings::{ConsumerSettings, RegistrySettings};
use crate::user::User;

/// Decodes registry-framed Avro payloads into users, resolving each record
/// against the local reader schema.
pub struct UserDeserializer<'a> {
    decoder: AvroDecoder<'a>,
    reader: UserSchema,
}

impl<'a> UserDeserializer<'a> {
    pub fn new(registry: &RegistrySettings, reader: UserSchema) -> Result<Self> {
        Ok(Self {
            decoder: AvroDecoder::new(registry.sr_settings()?),
            reader,
        })
    }

    pub fn reader(&self) -> &UserSchema {
        &self.reader
    }

    /// `Ok(None)` when there is no payload or it decodes to null.
    pub async fn deserialize(&self, payload: Option<&[u8]>) -> Result<Option<User>> {
        let Some(bytes) = payload else {
            return Ok(None);
        };
        let decoded = self.decoder.decode(Some(bytes)).await?;
        User::from_avro(decoded.value, self.reader.parsed())
    }
}

/// Group consumer subscribed to a single topic.
pub struct UserConsumer {
    consumer: StreamConsumer,
    topic: String,
}

impl UserConsumer {
    pub fn new(settings: &ConsumerSettings, topic: impl Into<String>) -> Result<Self> {
        let topic = topic.into();
        let consumer: StreamConsumer = settings.client_config()?.create()?;
        consumer.subscribe(&[topic.as_str()])?;

        tracing::info!(
            bootstrap_servers = %settings.bootstrap_servers,
            group = %settings.group_id,
            topic = %topic,
            "consumer subscribed"
        );

        Ok(Self { consumer, topic })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wait for the next message.
    pub async fn recv(&self) -> Result<BorrowedMessage<'_>> {
        Ok(self.consumer.recv().await?)
    }

    /// Leave the subscription. Dropping the consumer afterwards closes it and
    /// commits the stored offsets.
    pub fn close(self) {
        self.consumer.unsubscribe();
        tracing::info!(topic = %self.topic, "consumer closed");
    }
}
