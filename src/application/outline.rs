//! Terminal outline of a material, with the positions the shell addresses by.

use termtree::Tree;

use crate::domain::{Material, Scene, SceneKind, SubTopic, Topic};

const UNTITLED: &str = "(untitled)";

pub trait OutlineExt {
    fn to_outline(&self) -> Tree<String>;
}

fn label(index: usize, title: &str) -> String {
    let title = if title.is_empty() { UNTITLED } else { title };
    format!("[{}] {}", index, title)
}

fn scene_tree(index: usize, scene: &Scene) -> Tree<String> {
    let root = format!(
        "{} <{}, part {}>",
        label(index, &scene.title),
        scene.kind,
        scene.part
    );
    let leaves: Vec<Tree<String>> = match scene.kind {
        SceneKind::Bubble if scene.bubble_text.is_empty() => Vec::new(),
        SceneKind::Bubble => vec![Tree::new(format!("\"{}\"", scene.bubble_text))],
        SceneKind::Points => scene
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| Tree::new(format!("({}) {}", i, p)))
            .collect(),
    };
    Tree::new(root).with_leaves(leaves)
}

fn sub_topic_tree(index: usize, sub_topic: &SubTopic) -> Tree<String> {
    Tree::new(label(index, &sub_topic.title)).with_leaves(
        sub_topic
            .scenes
            .iter()
            .enumerate()
            .map(|(i, s)| scene_tree(i, s)),
    )
}

fn topic_tree(index: usize, topic: &Topic) -> Tree<String> {
    Tree::new(label(index, &topic.title)).with_leaves(
        topic
            .sub_topics
            .iter()
            .enumerate()
            .map(|(i, s)| sub_topic_tree(i, s)),
    )
}

impl OutlineExt for Material {
    fn to_outline(&self) -> Tree<String> {
        let (topics, sub_topics, scenes) = self.counts();
        let root = format!(
            "material ({} topics, {} subtopics, {} scenes)",
            topics, sub_topics, scenes
        );
        Tree::new(root).with_leaves(self.topics.iter().enumerate().map(|(i, t)| topic_tree(i, t)))
    }
}
