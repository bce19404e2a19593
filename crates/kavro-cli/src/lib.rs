//! Shared pieces of the `avro-producer` and `avro-consumer` binaries.

pub mod args;
pub mod config;
pub mod logging;
pub mod output;
pub mod produce;
pub mod prompt;
pub mod schemas;
pub mod shutdown;
