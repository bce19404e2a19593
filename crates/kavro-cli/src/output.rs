//! Printing consumed records
//!
//! - Text: the multi-line human form (default)
//! - JSON: one object per line, for piping into other tools

use std::io::IsTerminal;

use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use kavro_client::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct Formatter {
    format: OutputFormat,
    colored: bool,
}

impl Formatter {
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self { format, colored }
    }

    /// Colors only when stdout is a terminal.
    pub fn for_stdout(format: OutputFormat) -> Self {
        Self::new(format, std::io::stdout().is_terminal())
    }

    pub fn format_user(&self, key: &str, user: &User) -> Result<String> {
        match self.format {
            OutputFormat::Text => {
                let heading = format!("User record {}:", key);
                let heading = if self.colored {
                    heading.bold().to_string()
                } else {
                    heading
                };
                Ok(format!(
                    "{} name: {}\n\tfavorite_number: {}\n\tfavorite_color: {}\n",
                    heading, user.name, user.favorite_number, user.favorite_color
                ))
            }
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "key": key,
                    "name": user.name,
                    "favorite_number": user.favorite_number,
                    "favorite_color": user.favorite_color,
                });
                Ok(serde_json::to_string(&value)?)
            }
        }
    }

    pub fn print_user(&self, key: &str, user: &User) -> Result<()> {
        println!("{}", self.format_user(key, user)?);
        Ok(())
    }
}
