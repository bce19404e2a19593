//! Interactive `User` input for the producer.
//!
//! Stdin is read on a plain thread and forwarded over a channel, so the
//! producer loop can `select!` between the next line and a shutdown signal.

use std::io::{self, BufRead, Write};

use kavro_client::User;
use tokio::sync::mpsc;

const LINE_BUFFER: usize = 16;

pub const INVALID_INPUT: &str = "Invalid input, discarding record...";

#[derive(Debug)]
pub enum PromptOutcome {
    User(User),
    /// The favorite number was not an integer.
    Invalid,
}

/// Forward stdin lines until end of input or until the receiver is dropped.
pub fn spawn_stdin_reader() -> mpsc::Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub fn parse_favorite_number(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

pub struct UserPrompt<W> {
    lines: mpsc::Receiver<io::Result<String>>,
    out: W,
}

impl<W: Write> UserPrompt<W> {
    pub fn new(lines: mpsc::Receiver<io::Result<String>>, out: W) -> Self {
        Self { lines, out }
    }

    /// Ask for one user. `Ok(None)` means input ended.
    pub async fn next_user(&mut self) -> io::Result<Option<PromptOutcome>> {
        let Some(name) = self.ask("Enter name: ").await? else {
            return Ok(None);
        };
        let Some(address) = self.ask("Enter address: ").await? else {
            return Ok(None);
        };
        let Some(number) = self.ask("Enter favorite number: ").await? else {
            return Ok(None);
        };
        let Some(favorite_number) = parse_favorite_number(&number) else {
            writeln!(self.out, "{}", INVALID_INPUT)?;
            return Ok(Some(PromptOutcome::Invalid));
        };
        let Some(favorite_color) = self.ask("Enter favorite color: ").await? else {
            return Ok(None);
        };

        Ok(Some(PromptOutcome::User(User::new(
            name,
            address,
            favorite_number,
            favorite_color,
        ))))
    }

    async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        self.lines.recv().await.transpose()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
