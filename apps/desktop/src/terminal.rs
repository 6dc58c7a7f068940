use std::sync::Arc;

use async_trait::async_trait;
use client_core::JourneyHost;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, Mutex},
};
use tracing::{info, warn};

/// Stdin lines shared between the command loop and exit confirmation.
pub type SharedInput = Arc<Mutex<mpsc::Receiver<String>>>;

pub fn spawn_stdin_reader() -> SharedInput {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!("terminal: stdin read failed: {err}");
                    break;
                }
            }
        }
    });
    Arc::new(Mutex::new(rx))
}

pub async fn next_line(input: &SharedInput) -> Option<String> {
    input.lock().await.recv().await
}

pub struct TerminalHost {
    input: SharedInput,
}

impl TerminalHost {
    pub fn new(input: SharedInput) -> Self {
        Self { input }
    }
}

#[async_trait]
impl JourneyHost for TerminalHost {
    async fn confirm_exit(&self, prompt: &str) -> bool {
        println!("{prompt} [y/N]");
        match next_line(&self.input).await {
            Some(answer) => is_affirmative(&answer),
            None => false,
        }
    }

    fn leave_flow(&self) {
        info!("terminal: journey abandoned, back at the start");
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "نعم"
    )
}
