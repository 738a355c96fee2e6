// Validated operator input for one publish run.

use serde::Serialize;
use std::path::PathBuf;

/// Who can see the topic once it is created.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// Everything needed to publish one graph. Built once by the input
/// collector and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    /// Normalized slug, e.g. `My-Topic`.
    pub title: String,
    pub description: String,
    /// Existing path to the graph JSON document.
    pub graph_path: PathBuf,
    pub visibility: Visibility,
    pub allow_anyone_to_edit: bool,
    /// Value of the session cookie. Opaque; the service decides if it is valid.
    pub credential: String,
}
