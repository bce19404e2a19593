//! avro-consumer - consume `User` records and print them
//!
//! ```bash
//! avro-consumer -b localhost:9092 -s http://localhost:8081 \
//!     --user alice --password secret -t users -g readers --output json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use kavro_cli::args::ConsumerArgs;
use kavro_cli::config::Config;
use kavro_cli::output::Formatter;
use kavro_cli::{logging, shutdown};
use kavro_client::{display_key, Message, UserConsumer, UserDeserializer};

#[tokio::main]
async fn main() -> Result<()> {
    let args = ConsumerArgs::parse();
    logging::init();

    let conn = &args.connection;
    let config = Config::load(conn.config.as_deref())?;
    let formatter = Formatter::for_stdout(args.output);

    let schema = conn.schema().context("Failed to load User schema")?;
    tracing::info!(
        schema = %schema.path().display(),
        variant = %schema.variant(),
        "using reader schema"
    );

    let registry = conn.registry_settings();
    let deserializer = UserDeserializer::new(&registry, schema)
        .context("Failed to configure schema registry client")?;

    let settings = conn.consumer_settings(&args.group, &config);
    let consumer =
        UserConsumer::new(&settings, conn.topic.clone()).context("Failed to create consumer")?;

    let shutdown = shutdown::signal();
    tokio::pin!(shutdown);

    loop {
        let message = tokio::select! {
            _ = &mut shutdown => break,
            message = consumer.recv() => message,
        };

        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "consumer error");
                continue;
            }
        };

        let key = display_key(message.key());
        match deserializer.deserialize(message.payload()).await {
            Ok(Some(user)) => formatter.print_user(&key, &user)?,
            Ok(None) => tracing::debug!(%key, "skipping message without a record"),
            Err(e) => tracing::error!(
                error = %e,
                %key,
                partition = message.partition(),
                offset = message.offset(),
                "failed to decode message"
            ),
        }
    }

    consumer.close();
    Ok(())
}
