// Library root
// -----------
// This crate exposes the publish pipeline as a library. The binary
// (`main.rs`) wires it to the terminal.
//
// Module responsibilities:
// - `input`: Collects and validates the operator's answers into a
//   `PublishRequest` before any network call is made.
// - `publish`: Runs the two phases (create topic, attach diagram) in order
//   against a `TopicService`.
// - `api`: Blocking HTTP client for the Ameliorate tRPC endpoints.
// - `error`: The error taxonomy every stage reports with.
// - `ui`: Banner, progress markers and failure rendering.
pub mod api;
pub mod error;
pub mod input;
pub mod publish;
pub mod request;
pub mod ui;

pub use error::{ErrorCategory, PublishError};
pub use publish::{GraphDocument, PublishProgress, Publisher, TopicHandle, TopicService};
pub use request::{PublishRequest, Visibility};
