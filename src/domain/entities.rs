//! Domain entities: the Material → Topic → SubTopic → Scene hierarchy

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::domain::error::DomainError;

/// Opaque internal node identifier.
///
/// Generated on creation and on import, never written to an export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content kind of a scene: selects which of `bubble_text`/`points` is exported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SceneKind {
    #[default]
    Bubble,
    Points,
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneKind::Bubble => write!(f, "bubble"),
            SceneKind::Points => write!(f, "points"),
        }
    }
}

impl FromStr for SceneKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bubble" => Ok(SceneKind::Bubble),
            "points" => Ok(SceneKind::Points),
            other => Err(DomainError::UnknownSceneKind(other.to_string())),
        }
    }
}

/// Leaf content node.
///
/// Both content fields are always resident; `kind` decides which one is
/// active. The dormant one survives kind toggles and is only dropped on export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub id: NodeId,
    /// Stable external identifier, preserved through export/import
    pub part: String,
    pub title: String,
    pub kind: SceneKind,
    pub bubble_text: String,
    pub points: Vec<String>,
}

impl Scene {
    /// Fresh bubble scene whose `part` is its own id.
    pub fn new() -> Self {
        let id = NodeId::new();
        Self {
            id,
            part: id.to_string(),
            title: String::new(),
            kind: SceneKind::Bubble,
            bubble_text: String::new(),
            points: Vec::new(),
        }
    }

    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    pub fn with_part(&self, part: impl Into<String>) -> Self {
        Self {
            part: part.into(),
            ..self.clone()
        }
    }

    /// Switch the active content kind; the other field stays as it is.
    pub fn with_kind(&self, kind: SceneKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    pub fn with_bubble_text(&self, text: impl Into<String>) -> Self {
        Self {
            bubble_text: text.into(),
            ..self.clone()
        }
    }

    pub fn with_points(&self, points: Vec<String>) -> Self {
        Self {
            points,
            ..self.clone()
        }
    }

    /// Append an empty point.
    pub fn with_point_added(&self) -> Self {
        self.with_points(crate::domain::collection::appended(
            &self.points,
            String::new(),
        ))
    }

    pub fn with_point_updated(&self, index: usize, text: impl Into<String>) -> Self {
        self.with_points(crate::domain::collection::replaced(
            &self.points,
            index,
            text.into(),
        ))
    }

    pub fn with_point_removed(&self, index: usize) -> Self {
        self.with_points(crate::domain::collection::removed(&self.points, index))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTopic {
    pub id: NodeId,
    pub title: String,
    pub scenes: Vec<Scene>,
}

impl SubTopic {
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            title: String::new(),
            scenes: Vec::new(),
        }
    }

    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    pub fn with_scenes(&self, scenes: Vec<Scene>) -> Self {
        Self {
            scenes,
            ..self.clone()
        }
    }

    pub fn scene(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }
}

impl Default for SubTopic {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: NodeId,
    pub title: String,
    pub sub_topics: Vec<SubTopic>,
}

impl Topic {
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            title: String::new(),
            sub_topics: Vec::new(),
        }
    }

    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    pub fn with_sub_topics(&self, sub_topics: Vec<SubTopic>) -> Self {
        Self {
            sub_topics,
            ..self.clone()
        }
    }

    pub fn sub_topic(&self, index: usize) -> Option<&SubTopic> {
        self.sub_topics.get(index)
    }
}

impl Default for Topic {
    fn default() -> Self {
        Self::new()
    }
}

/// Root document: an ordered list of topics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Material {
    pub topics: Vec<Topic>,
}

impl Material {
    /// Material without any topics.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Example material used when an editing session starts from scratch.
    pub fn seeded() -> Self {
        let scene = Scene::new()
            .with_title("Welcome")
            .with_bubble_text("Hello! Edit this scene or add new ones.");
        let sub_topic = SubTopic::new()
            .with_title("First steps")
            .with_scenes(vec![scene]);
        let topic = Topic::new()
            .with_title("Introduction")
            .with_sub_topics(vec![sub_topic]);
        Self {
            topics: vec![topic],
        }
    }

    pub fn topic(&self, index: usize) -> Option<&Topic> {
        self.topics.get(index)
    }

    pub fn sub_topic(&self, topic: usize, sub_topic: usize) -> Option<&SubTopic> {
        self.topic(topic)?.sub_topic(sub_topic)
    }

    pub fn scene(&self, topic: usize, sub_topic: usize, scene: usize) -> Option<&Scene> {
        self.sub_topic(topic, sub_topic)?.scene(scene)
    }

    pub fn require_topic(&self, topic: usize) -> Result<&Topic, DomainError> {
        self.topic(topic).ok_or(DomainError::TopicNotFound(topic))
    }

    pub fn require_sub_topic(&self, topic: usize, sub_topic: usize) -> Result<&SubTopic, DomainError> {
        self.require_topic(topic)?
            .sub_topic(sub_topic)
            .ok_or(DomainError::SubTopicNotFound { topic, sub_topic })
    }

    pub fn require_scene(
        &self,
        topic: usize,
        sub_topic: usize,
        scene: usize,
    ) -> Result<&Scene, DomainError> {
        self.require_sub_topic(topic, sub_topic)?
            .scene(scene)
            .ok_or(DomainError::SceneNotFound {
                topic,
                sub_topic,
                scene,
            })
    }

    /// Number of (topics, subtopics, scenes) in the whole tree.
    pub fn counts(&self) -> (usize, usize, usize) {
        let sub_topics = self.topics.iter().map(|t| t.sub_topics.len()).sum();
        let scenes = self
            .topics
            .iter()
            .flat_map(|t| &t.sub_topics)
            .map(|s| s.scenes.len())
            .sum();
        (self.topics.len(), sub_topics, scenes)
    }
}
