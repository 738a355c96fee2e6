// Error taxonomy shared by every stage of a publish run.
// The collector, the orchestrator and the HTTP client all return
// `PublishError`; the binary maps it to a one-line message via `category()`.

use std::fmt;
use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can end a publish run.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Malformed or missing operator input.
    #[error("{0}")]
    Validation(String),

    /// The resolved graph path does not exist.
    #[error("graph file {} does not exist", .path.display())]
    GraphNotFound { path: PathBuf },

    /// The graph file exists but could not be read.
    #[error("failed to read graph file {}: {source}", .path.display())]
    GraphUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The graph file is not JSON, or lacks `nodes`/`edges` sequences.
    #[error("failed to parse graph file {}: {source}", .path.display())]
    GraphMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The remote service answered with a non-2xx status.
    #[error("{status} - {body}")]
    RemoteApi { status: StatusCode, body: String },

    /// A 2xx response that does not have the expected shape.
    #[error("{0}")]
    Protocol(String),

    /// The request never produced a response (connect, TLS, read failure).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The operator cancelled while being prompted.
    #[error("input interrupted")]
    Interrupted,

    /// The terminal could not be read for a reason other than cancellation.
    #[error("failed to read input: {0}")]
    Console(#[source] io::Error),
}

/// Coarse classification used when reporting a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    File,
    RemoteApi,
    Protocol,
    Transport,
    Interrupted,
    Console,
}

impl PublishError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PublishError::Validation(_) => ErrorCategory::Validation,
            PublishError::GraphNotFound { .. }
            | PublishError::GraphUnreadable { .. }
            | PublishError::GraphMalformed { .. } => ErrorCategory::File,
            PublishError::RemoteApi { .. } => ErrorCategory::RemoteApi,
            PublishError::Protocol(_) => ErrorCategory::Protocol,
            PublishError::Transport(_) => ErrorCategory::Transport,
            PublishError::Interrupted => ErrorCategory::Interrupted,
            PublishError::Console(_) => ErrorCategory::Console,
        }
    }

    /// Classify an error coming back from an interactive prompt.
    pub fn from_input(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof => PublishError::Interrupted,
            _ => PublishError::Console(err),
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorCategory::Validation => "Validation",
            ErrorCategory::File => "File",
            ErrorCategory::RemoteApi => "API",
            ErrorCategory::Protocol => "Protocol",
            ErrorCategory::Transport => "Network",
            ErrorCategory::Interrupted => "Interrupted",
            ErrorCategory::Console => "Console",
        };
        f.write_str(label)
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_and_eof_both_mean_cancellation() {
        let err = PublishError::from_input(io::Error::from(io::ErrorKind::Interrupted));
        assert_eq!(err.category(), ErrorCategory::Interrupted);
        let err = PublishError::from_input(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert_eq!(err.category(), ErrorCategory::Interrupted);
    }

    #[test]
    fn other_input_failures_are_console_errors() {
        let err = PublishError::from_input(io::Error::new(io::ErrorKind::Other, "not a tty"));
        assert_eq!(err.category(), ErrorCategory::Console);
        assert!(err.to_string().contains("not a tty"));
    }

    #[test]
    fn remote_api_message_keeps_status_and_body() {
        let err = PublishError::RemoteApi {
            status: StatusCode::UNAUTHORIZED,
            body: "{\"error\":\"bad session\"}".into(),
        };
        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("bad session"));
        assert_eq!(err.category(), ErrorCategory::RemoteApi);
    }

    #[test]
    fn graph_errors_share_the_file_category() {
        let err = PublishError::GraphNotFound { path: PathBuf::from("/nope/graph.json") };
        assert_eq!(err.category(), ErrorCategory::File);
        assert!(err.to_string().contains("/nope/graph.json"));
    }
}
