//! Terminal implementations of the view collaborators: a shared line
//! reader, a printing notifier and a y/n confirmation prompt.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use todo_core::{Confirm, Notification, NotificationLevel, Notifier};

/// Stdin split into lines, shared by the command loop and the prompts.
#[derive(Clone)]
pub struct LineReader {
    lines: Arc<Mutex<Lines<BufReader<Stdin>>>>,
}

impl LineReader {
    pub fn stdin() -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
        }
    }

    /// Print `prompt` and wait for the next line. `None` on end of input.
    pub async fn read(&self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        self.lines.lock().await.next_line().await
    }
}

/// Prints each notification as one tagged line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        println!("{}", format_notification(&notification));
    }
}

pub fn format_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => " ok ",
        NotificationLevel::Warning => "warn",
        NotificationLevel::Error => "FAIL",
    };
    format!("[{tag}] {}", notification.message)
}

/// Asks on the terminal; anything other than y/yes declines.
#[derive(Clone)]
pub struct PromptConfirm {
    reader: LineReader,
}

impl PromptConfirm {
    pub fn new(reader: LineReader) -> Self {
        Self { reader }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl Confirm for PromptConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        match self.reader.read(&format!("{prompt} [y/N] ")).await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }
}
