//! One step of the producer loop.

use kavro_client::{User, UserProducer, UserSerializer};
use uuid::Uuid;

/// Serialize `user` and enqueue it under a fresh UUID key.
///
/// Failures drop only this record: they are logged and `None` is returned,
/// so the caller keeps looping and still flushes what was already queued.
pub async fn produce_user(
    serializer: &UserSerializer<'_>,
    producer: &UserProducer,
    user: &User,
) -> Option<String> {
    let payload = match serializer.serialize(user).await {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize user, discarding record");
            return None;
        }
    };

    let key = Uuid::new_v4().to_string();
    send_payload(producer, &key, &payload).await.then_some(key)
}

/// Enqueue one encoded record. `false` means it was rejected and discarded.
pub async fn send_payload(producer: &UserProducer, key: &str, payload: &[u8]) -> bool {
    match producer.send(key, payload).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, key, "failed to produce record, discarding it");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kavro_client::{
        ProducerSettings, RegistrySettings, SaslMechanism, SchemaVariant, SecurityConfig,
    };
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn producer() -> UserProducer {
        let mut extra = BTreeMap::new();
        extra.insert("message.max.bytes".to_string(), "1000".to_string());
        let settings = ProducerSettings::new(
            "127.0.0.1:1",
            SecurityConfig::new(SaslMechanism::Plain, "alice", "secret"),
        )
        .with_extra(extra);
        UserProducer::new(&settings, "users").unwrap()
    }

    #[tokio::test]
    async fn test_rejected_send_is_discarded_and_flush_still_runs() {
        let producer = producer();

        assert!(!send_payload(&producer, "k", &[0u8; 5000]).await);
        assert_eq!(producer.in_flight(), 0);

        let summary = producer.flush(Duration::from_millis(100)).unwrap();
        assert_eq!(summary.delivered, 0);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_serialize_failure_is_discarded() {
        let producer = producer();
        let schema = crate::schemas::bundled(SchemaVariant::Specific).unwrap();
        let registry = RegistrySettings::new("http://127.0.0.1:1");
        let serializer = UserSerializer::new(&registry, &schema, "users").unwrap();

        let user = User::new("Alice", "1 Main St", 7, "blue");
        assert!(produce_user(&serializer, &producer, &user).await.is_none());
        assert_eq!(producer.in_flight(), 0);
    }
}
