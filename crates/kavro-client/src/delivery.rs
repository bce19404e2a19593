//! Delivery reports for produced `User` records.
//!
//! librdkafka calls back into [`DeliveryReporter`] from the producer's
//! polling thread once the broker acknowledged (or gave up on) a message.
//! Reports are printed to stdout and counted.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rdkafka::message::Message;
use rdkafka::producer::{DeliveryResult, ProducerContext};
use rdkafka::ClientContext;

/// Outcome of a single delivery, detached from librdkafka's borrowed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    Delivered {
        key: String,
        topic: String,
        partition: i32,
        offset: i64,
    },
    Failed {
        key: String,
        error: String,
    },
}

impl DeliveryReport {
    pub fn from_result(result: &DeliveryResult<'_>) -> Self {
        match result {
            Ok(message) => DeliveryReport::Delivered {
                key: display_key(message.key()),
                topic: message.topic().to_string(),
                partition: message.partition(),
                offset: message.offset(),
            },
            Err((error, message)) => DeliveryReport::Failed {
                key: display_key(message.key()),
                error: error.to_string(),
            },
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryReport::Delivered { .. })
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryReport::Delivered {
                key,
                topic,
                partition,
                offset,
            } => write!(
                f,
                "User record {} successfully produced to {} [{}] at offset {}",
                key, topic, partition, offset
            ),
            DeliveryReport::Failed { key, error } => {
                write!(f, "Delivery failed for User record {}: {}", key, error)
            }
        }
    }
}

/// Render a message key for humans: UTF-8 when possible, `None` when absent.
pub fn display_key(key: Option<&[u8]>) -> String {
    match key {
        Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        None => "None".to_string(),
    }
}

/// Counters shared between the delivery callback and the producer loop.
#[derive(Debug, Default)]
pub struct DeliveryStats {
    delivered: AtomicU64,
    failed: AtomicU64,
}

impl DeliveryStats {
    pub fn record(&self, report: &DeliveryReport) {
        if report.is_delivered() {
            self.delivered.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> DeliverySummary {
        DeliverySummary {
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliverySummary {
    pub delivered: u64,
    pub failed: u64,
}

/// rdkafka producer context that reports every delivery.
#[derive(Debug, Clone, Default)]
pub struct DeliveryReporter {
    stats: Arc<DeliveryStats>,
}

impl DeliveryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Arc<DeliveryStats> {
        Arc::clone(&self.stats)
    }

    fn report(&self, report: DeliveryReport) {
        self.stats.record(&report);
        match &report {
            DeliveryReport::Delivered { .. } => tracing::debug!(%report, "delivered"),
            DeliveryReport::Failed { .. } => tracing::warn!(%report, "delivery failed"),
        }
        println!("{}", report);
    }
}

impl ClientContext for DeliveryReporter {}

impl ProducerContext for DeliveryReporter {
    type DeliveryOpaque = ();

    fn delivery(&self, delivery_result: &DeliveryResult<'_>, _: Self::DeliveryOpaque) {
        self.report(DeliveryReport::from_result(delivery_result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivered() -> DeliveryReport {
        DeliveryReport::Delivered {
            key: "5f0c7f52-1b8e-4c1e-9a55-0d6c1c1f2f33".to_string(),
            topic: "example_serde_avro".to_string(),
            partition: 2,
            offset: 17,
        }
    }

    #[test]
    fn test_delivered_message() {
        assert_eq!(
            delivered().to_string(),
            "User record 5f0c7f52-1b8e-4c1e-9a55-0d6c1c1f2f33 successfully produced to example_serde_avro [2] at offset 17"
        );
    }

    #[test]
    fn test_failed_message() {
        let report = DeliveryReport::Failed {
            key: "k1".to_string(),
            error: "Message timed out".to_string(),
        };
        assert_eq!(
            report.to_string(),
            "Delivery failed for User record k1: Message timed out"
        );
        assert!(!report.is_delivered());
    }

    #[test]
    fn test_display_key() {
        assert_eq!(display_key(Some(b"abc".as_slice())), "abc");
        assert_eq!(display_key(None), "None");
        assert_eq!(display_key(Some([0xff, b'a'].as_slice())), "\u{fffd}a");
    }

    #[test]
    fn test_stats_counts() {
        let stats = DeliveryStats::default();
        stats.record(&delivered());
        stats.record(&delivered());
        stats.record(&DeliveryReport::Failed {
            key: "k".to_string(),
            error: "boom".to_string(),
        });
        assert_eq!(
            stats.snapshot(),
            DeliverySummary {
                delivered: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn test_reporter_shares_stats() {
        let reporter = DeliveryReporter::new();
        let stats = reporter.stats();
        reporter.report(delivered());
        assert_eq!(stats.snapshot().delivered, 1);
    }
}
