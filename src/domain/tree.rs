//! Tree reducer: `(material, operation) → material`.
//!
//! Edits never mutate in place. The touched collection is rebuilt and the
//! replacement propagates upward by rebuilding every ancestor collection.

use tracing::{instrument, warn};

use crate::domain::collection::{self, Direction};
use crate::domain::entities::{Material, NodeId, Scene, SubTopic, Topic};

/// Default value for a newly added element.
pub trait Fresh {
    fn fresh() -> Self;
}

impl Fresh for Topic {
    fn fresh() -> Self {
        Topic::new()
    }
}

impl Fresh for SubTopic {
    fn fresh() -> Self {
        SubTopic::new()
    }
}

impl Fresh for Scene {
    fn fresh() -> Self {
        Scene::new()
    }
}

impl Fresh for String {
    fn fresh() -> Self {
        String::new()
    }
}

/// Structural edit of one ordered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    /// Append a fresh element
    Add,
    Remove(usize),
    Move(usize, Direction),
    /// Wholesale replacement; used for every field edit
    Replace(usize, T),
}

impl<T: Clone + Fresh> Edit<T> {
    pub fn apply_to(&self, items: &[T]) -> Vec<T> {
        match self {
            Edit::Add => collection::appended(items, T::fresh()),
            Edit::Remove(index) => collection::removed(items, *index),
            Edit::Move(index, direction) => collection::moved(items, *index, *direction),
            Edit::Replace(index, item) => collection::replaced(items, *index, item.clone()),
        }
    }

    /// Whether the targeted index exists in a collection of `len` elements.
    pub fn in_range(&self, len: usize) -> bool {
        match self {
            Edit::Add => true,
            Edit::Remove(index) | Edit::Move(index, _) | Edit::Replace(index, _) => *index < len,
        }
    }
}

/// One editing step on the material, addressed by parent id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Topics(Edit<Topic>),
    SubTopics { topic: NodeId, edit: Edit<SubTopic> },
    Scenes { sub_topic: NodeId, edit: Edit<Scene> },
    Points { scene: NodeId, edit: Edit<String> },
}

impl Material {
    /// Apply `op` and return the resulting material.
    ///
    /// Total: an unknown parent id or an out-of-range index yields an
    /// unchanged copy.
    #[instrument(level = "debug", skip(self))]
    pub fn apply(&self, op: &Operation) -> Material {
        let next = match op {
            Operation::Topics(edit) => {
                warn_if_out_of_range(edit, self.topics.len(), "topic");
                Material {
                    topics: edit.apply_to(&self.topics),
                }
            }
            Operation::SubTopics { topic, edit } => self.rebuild_topics(|t| {
                (t.id == *topic).then(|| {
                    warn_if_out_of_range(edit, t.sub_topics.len(), "subtopic");
                    t.with_sub_topics(edit.apply_to(&t.sub_topics))
                })
            }),
            Operation::Scenes { sub_topic, edit } => self.rebuild_sub_topics(|s| {
                (s.id == *sub_topic).then(|| {
                    warn_if_out_of_range(edit, s.scenes.len(), "scene");
                    s.with_scenes(edit.apply_to(&s.scenes))
                })
            }),
            Operation::Points { scene, edit } => self.rebuild_scenes(|c| {
                (c.id == *scene).then(|| {
                    warn_if_out_of_range(edit, c.points.len(), "point");
                    c.with_points(edit.apply_to(&c.points))
                })
            }),
        };
        if next == *self {
            warn!("operation left the material unchanged");
        }
        next
    }

    /// Replace every topic for which `f` returns a rebuilt one.
    fn rebuild_topics(&self, f: impl Fn(&Topic) -> Option<Topic>) -> Material {
        Material {
            topics: self
                .topics
                .iter()
                .map(|t| f(t).unwrap_or_else(|| t.clone()))
                .collect(),
        }
    }

    fn rebuild_sub_topics(&self, f: impl Fn(&SubTopic) -> Option<SubTopic>) -> Material {
        self.rebuild_topics(|t| {
            let mut touched = false;
            let sub_topics: Vec<SubTopic> = t
                .sub_topics
                .iter()
                .map(|s| match f(s) {
                    Some(rebuilt) => {
                        touched = true;
                        rebuilt
                    }
                    None => s.clone(),
                })
                .collect();
            touched.then(|| t.with_sub_topics(sub_topics))
        })
    }

    fn rebuild_scenes(&self, f: impl Fn(&Scene) -> Option<Scene>) -> Material {
        self.rebuild_sub_topics(|s| {
            let mut touched = false;
            let scenes: Vec<Scene> = s
                .scenes
                .iter()
                .map(|c| match f(c) {
                    Some(rebuilt) => {
                        touched = true;
                        rebuilt
                    }
                    None => c.clone(),
                })
                .collect();
            touched.then(|| s.with_scenes(scenes))
        })
    }
}

fn warn_if_out_of_range<T: Clone + Fresh>(edit: &Edit<T>, len: usize, level: &str) {
    if !edit.in_range(len) {
        warn!("ignoring {} edit: index out of range (len {})", level, len);
    }
}
