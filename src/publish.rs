// Two-phase publish: create the topic, then attach the diagram to it.
//
// Phase two only runs with the `TopicHandle` phase one returned, so a
// diagram is never uploaded without a topic to hold it. If phase two fails
// the topic created in phase one stays on the service without a diagram;
// nothing is rolled back.

use crate::api::{CreateTopicRequest, TopicDraft, UpdateDiagramRequest};
use crate::error::{PublishError, Result};
use crate::request::PublishRequest;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Remote operations the publisher depends on. Implemented by
/// [`crate::api::ApiClient`].
pub trait TopicService {
    fn create_topic(&self, credential: &str, request: &CreateTopicRequest) -> Result<TopicHandle>;
    fn update_diagram(&self, credential: &str, request: &UpdateDiagramRequest) -> Result<()>;
}

/// Identifier of a topic created during this run.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicHandle {
    id: String,
    wire: Value,
}

impl TopicHandle {
    /// Accepts the id as the service returned it: a non-empty string or a
    /// number. Anything else is not a usable id.
    pub fn from_wire(value: Value) -> Option<Self> {
        let id = match &value {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(TopicHandle { id, wire: value })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The id in its original JSON form, sent back as `topicId`.
    pub fn wire_id(&self) -> &Value {
        &self.wire
    }
}

/// The two fields of a graph file the uploader cares about. Records are
/// opaque and other top-level keys are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GraphDocument {
    pub nodes: Vec<Value>,
    pub edges: Vec<Value>,
}

impl GraphDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| PublishError::GraphUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| PublishError::GraphMalformed {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Hooks for reporting phase progress. All methods default to doing nothing.
pub trait PublishProgress {
    fn creating_topic(&mut self) {}
    fn topic_created(&mut self, _topic: &TopicHandle) {}
    fn uploading_diagram(&mut self) {}
    fn diagram_uploaded(&mut self) {}
}

impl PublishProgress for () {}

/// Drives the two remote phases in order for one request.
pub struct Publisher<S> {
    service: S,
}

impl<S: TopicService> Publisher<S> {
    pub fn new(service: S) -> Self {
        Publisher { service }
    }

    /// Phase one.
    pub fn create_topic(&self, request: &PublishRequest) -> Result<TopicHandle> {
        let payload = CreateTopicRequest {
            topic: TopicDraft {
                title: request.title.clone(),
                description: request.description.clone(),
                visibility: request.visibility,
                allow_anyone_to_edit: request.allow_anyone_to_edit,
            },
            quick_views: Vec::new(),
        };
        self.service.create_topic(&request.credential, &payload)
    }

    /// Phase two. The graph file is read here, after the topic exists.
    pub fn attach_diagram(&self, request: &PublishRequest, topic: &TopicHandle) -> Result<()> {
        let graph = GraphDocument::load(&request.graph_path)?;
        let payload = UpdateDiagramRequest {
            topic_id: topic.wire_id().clone(),
            nodes_to_create: graph.nodes,
            edges_to_create: graph.edges,
        };
        self.service.update_diagram(&request.credential, &payload)
    }

    /// Run both phases, stopping at the first failure.
    pub fn publish<P: PublishProgress + ?Sized>(
        &self,
        request: &PublishRequest,
        progress: &mut P,
    ) -> Result<TopicHandle> {
        info!(title = %request.title, visibility = request.visibility.as_str(), "publishing graph");

        progress.creating_topic();
        let topic = self.create_topic(request)?;
        progress.topic_created(&topic);

        progress.uploading_diagram();
        if let Err(err) = self.attach_diagram(request, &topic) {
            warn!(topic_id = %topic.id(), error = %err, "topic was created but the diagram was not attached");
            return Err(err);
        }
        progress.diagram_uploaded();
        Ok(topic)
    }
}
