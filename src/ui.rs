// UI layer: banner, the prompt sequence and per-phase progress markers.
// Everything blocks; the spinner only ticks while an HTTP call is pending.

use crate::api::{ApiClient, ApiConfig};
use crate::error::PublishError;
use crate::input::{collect_request, program_dir, TerminalInput};
use crate::publish::{PublishProgress, Publisher, TopicHandle};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Collect the request interactively and publish it. Blocks until both
/// phases finish or one of them fails.
pub fn run() -> Result<()> {
    print_banner();

    let base_dir = program_dir().context("Failed to locate the program directory")?;
    let mut input = TerminalInput;
    let request = collect_request(&mut input, &base_dir)?;

    let publisher = Publisher::new(ApiClient::new(ApiConfig::default())?);
    let mut progress = TerminalProgress::default();
    publisher.publish(&request, &mut progress)?;
    Ok(())
}

fn print_banner() {
    println!("{}", "=".repeat(60));
    println!("Ameliorate Graph Uploader");
    println!("{}", "=".repeat(60));
    println!();
}

/// Render a failed run as one line, labelled with its error category.
pub fn describe_failure(err: &anyhow::Error) -> String {
    let text = match err.downcast_ref::<PublishError>() {
        Some(publish_err) => format!("{} error: {}", publish_err.category(), publish_err),
        None => format!("Unexpected error: {:#}", err),
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prints the phase markers and shows a spinner while a call is in flight.
#[derive(Default)]
pub struct TerminalProgress {
    spinner: Option<ProgressBar>,
}

impl TerminalProgress {
    fn start(&mut self, heading: &str) {
        println!("{}", heading);
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Waiting for the server...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn stop(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl PublishProgress for TerminalProgress {
    fn creating_topic(&mut self) {
        self.start("Creating topic...");
    }

    fn topic_created(&mut self, topic: &TopicHandle) {
        self.stop();
        println!("✓ Topic created successfully!");
        println!("Topic ID: {}", topic.id());
    }

    fn uploading_diagram(&mut self) {
        self.start("\nUploading graph...");
    }

    fn diagram_uploaded(&mut self) {
        self.stop();
        println!("✓ Graph uploaded successfully!");
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn failure_line_names_the_category() {
        let err = anyhow::Error::new(PublishError::RemoteApi {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "{\n  \"message\": \"boom\"\n}".into(),
        });
        let line = describe_failure(&err);
        assert!(line.starts_with("API error: 500"));
        assert!(line.contains("boom"));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn context_does_not_hide_the_category() {
        let err = anyhow::Error::new(PublishError::Interrupted).context("while prompting");
        assert_eq!(describe_failure(&err), "Interrupted error: input interrupted");
    }

    #[test]
    fn unknown_errors_are_unexpected() {
        let err = anyhow::anyhow!("something odd");
        assert_eq!(describe_failure(&err), "Unexpected error: something odd");
    }
}
