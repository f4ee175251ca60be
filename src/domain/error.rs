//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors: import failures and unresolvable positions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid JSON: {message}")]
    InvalidJson {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("invalid material: expected a top-level `topics` array")]
    MissingTopics,

    #[error("failed to serialize material: {0}")]
    Serialize(String),

    #[error("no topic at position {0}")]
    TopicNotFound(usize),

    #[error("no subtopic at position {topic}/{sub_topic}")]
    SubTopicNotFound { topic: usize, sub_topic: usize },

    #[error("no scene at position {topic}/{sub_topic}/{scene}")]
    SceneNotFound {
        topic: usize,
        sub_topic: usize,
        scene: usize,
    },

    #[error("unknown scene kind: {0} (expected bubble or points)")]
    UnknownSceneKind(String),
}

impl DomainError {
    /// True for the two import failure kinds (parse and schema).
    pub fn is_import_failure(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidJson { .. } | DomainError::MissingTopics
        )
    }
}
