//! Material ⇄ external JSON.
//!
//! Export strips internal ids and the scene kind tag, emits only the active
//! scene content field and omits empty titles. Import hydrates: fresh ids,
//! defaults for missing fields, and scene kind inferred from content.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::entities::{Material, NodeId, Scene, SceneKind, SubTopic, Topic};
use crate::domain::error::DomainError;

/// External shape of a material file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportedMaterial {
    pub topics: Vec<ExportedTopic>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportedTopic {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(rename = "subTopics")]
    pub sub_topics: Vec<ExportedSubTopic>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportedSubTopic {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    pub scenes: Vec<ExportedScene>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportedScene {
    pub part: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(flatten)]
    pub content: SceneContent,
}

/// The one content field a scene exports.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum SceneContent {
    #[serde(rename = "bubbleText")]
    BubbleText(String),
    #[serde(rename = "points")]
    Points(Vec<String>),
}

impl From<&Scene> for ExportedScene {
    fn from(scene: &Scene) -> Self {
        let content = match scene.kind {
            SceneKind::Bubble => SceneContent::BubbleText(scene.bubble_text.clone()),
            SceneKind::Points => SceneContent::Points(scene.points.clone()),
        };
        Self {
            part: scene.part.clone(),
            title: scene.title.clone(),
            content,
        }
    }
}

impl From<&SubTopic> for ExportedSubTopic {
    fn from(sub_topic: &SubTopic) -> Self {
        Self {
            title: sub_topic.title.clone(),
            scenes: sub_topic.scenes.iter().map(ExportedScene::from).collect(),
        }
    }
}

impl From<&Topic> for ExportedTopic {
    fn from(topic: &Topic) -> Self {
        Self {
            title: topic.title.clone(),
            sub_topics: topic.sub_topics.iter().map(ExportedSubTopic::from).collect(),
        }
    }
}

impl From<&Material> for ExportedMaterial {
    fn from(material: &Material) -> Self {
        Self {
            topics: material.topics.iter().map(ExportedTopic::from).collect(),
        }
    }
}

pub fn export(material: &Material) -> ExportedMaterial {
    ExportedMaterial::from(material)
}

/// Serialize the export shape; `indent == 0` produces compact output.
#[instrument(level = "debug", skip(material))]
pub fn to_json(material: &Material, indent: usize) -> Result<String, DomainError> {
    let exported = export(material);
    if indent == 0 {
        return serde_json::to_string(&exported).map_err(|e| DomainError::Serialize(e.to_string()));
    }

    let pad = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(pad.as_bytes()));
    exported
        .serialize(&mut serializer)
        .map_err(|e| DomainError::Serialize(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| DomainError::Serialize(e.to_string()))
}

/// Parse external JSON text into a fresh material.
///
/// Only the top level is validated: it must carry a `topics` array. Below
/// that every field falls back to its default.
#[instrument(level = "debug", skip(text), fields(len = text.len()))]
pub fn import(text: &str) -> Result<Material, DomainError> {
    let value: Value = serde_json::from_str(text).map_err(|e| DomainError::InvalidJson {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;

    let topics = value
        .get("topics")
        .and_then(Value::as_array)
        .ok_or(DomainError::MissingTopics)?;

    let material = Material {
        topics: topics.iter().map(hydrate_topic).collect(),
    };
    debug!("import: hydrated {:?} (topics, subtopics, scenes)", material.counts());
    Ok(material)
}

fn hydrate_topic(value: &Value) -> Topic {
    Topic {
        id: NodeId::new(),
        title: string_field(value, "title").unwrap_or_default(),
        sub_topics: array_field(value, "subTopics")
            .iter()
            .map(hydrate_sub_topic)
            .collect(),
    }
}

fn hydrate_sub_topic(value: &Value) -> SubTopic {
    SubTopic {
        id: NodeId::new(),
        title: string_field(value, "title").unwrap_or_default(),
        scenes: array_field(value, "scenes").iter().map(hydrate_scene).collect(),
    }
}

fn hydrate_scene(value: &Value) -> Scene {
    let id = NodeId::new();
    let bubble_text = string_field(value, "bubbleText").unwrap_or_default();
    let points: Vec<String> = array_field(value, "points").iter().map(point_text).collect();
    let part = match value.get("part") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => id.to_string(),
    };

    Scene {
        id,
        part,
        title: string_field(value, "title").unwrap_or_default(),
        kind: infer_kind(&bubble_text, &points),
        bubble_text,
        points,
    }
}

/// Points only when there are points and no bubble text; ties go to bubble.
pub fn infer_kind(bubble_text: &str, points: &[String]) -> SceneKind {
    if !points.is_empty() && bubble_text.is_empty() {
        SceneKind::Points
    } else {
        SceneKind::Bubble
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn point_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
