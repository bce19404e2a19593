//! avro-producer - type `User` records on stdin and produce them as Avro
//!
//! ```bash
//! avro-producer -b localhost:9092 -s http://localhost:8081 \
//!     --user alice --password secret -t users
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use kavro_cli::args::ProducerArgs;
use kavro_cli::config::Config;
use kavro_cli::produce::produce_user;
use kavro_cli::prompt::{spawn_stdin_reader, PromptOutcome, UserPrompt};
use kavro_cli::{logging, shutdown};
use kavro_client::{value_subject, UserProducer, UserSerializer};

#[tokio::main]
async fn main() -> Result<()> {
    let args = ProducerArgs::parse();
    logging::init();

    let conn = &args.connection;
    let config = Config::load(conn.config.as_deref())?;

    let schema = conn.schema().context("Failed to load User schema")?;
    tracing::info!(
        schema = %schema.path().display(),
        variant = %schema.variant(),
        subject = %value_subject(&conn.topic),
        "using schema"
    );

    let registry = args.registry_settings();
    if let Some(ca) = registry.requested_ca_cert() {
        println!("Using CA cert at {} to connect to schema registry", ca.display());
    }
    let serializer = UserSerializer::new(&registry, &schema, &conn.topic)
        .context("Failed to configure schema registry client")?;

    let producer = UserProducer::new(&conn.producer_settings(&config), conn.topic.clone())
        .context("Failed to create producer")?;

    println!("Producing user records to topic {}. ^C to exit.", producer.topic());

    let mut prompt = UserPrompt::new(spawn_stdin_reader(), std::io::stdout());
    let shutdown = shutdown::signal();
    tokio::pin!(shutdown);

    loop {
        let outcome = tokio::select! {
            _ = &mut shutdown => break,
            outcome = prompt.next_user() => outcome.context("Failed to read from stdin")?,
        };

        let user = match outcome {
            Some(PromptOutcome::User(user)) => user,
            Some(PromptOutcome::Invalid) => continue,
            None => {
                tracing::debug!("end of input");
                break;
            }
        };

        produce_user(&serializer, &producer, &user).await;
    }

    println!("\nFlushing records...");
    match producer.flush(config.flush_timeout()) {
        Ok(summary) => tracing::info!(
            delivered = summary.delivered,
            failed = summary.failed,
            "producer flushed"
        ),
        Err(e) => {
            let summary = producer.summary();
            tracing::warn!(
                error = %e,
                delivered = summary.delivered,
                failed = summary.failed,
                undelivered = producer.in_flight(),
                "flush did not complete"
            );
        }
    }

    Ok(())
}
