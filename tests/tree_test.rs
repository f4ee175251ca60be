//! Tests for the material reducer: add/remove/move/replace at every level

use rstest::{fixture, rstest};

use materialtree::domain::{Direction, Edit, Material, Operation, Scene, SubTopic, Topic};

/// One topic holding one subtopic holding scenes A, B, C (by part).
#[fixture]
fn three_scenes() -> Material {
    let scenes = ["A", "B", "C"]
        .iter()
        .map(|p| Scene::new().with_part(*p))
        .collect();
    let sub_topic = SubTopic::new().with_scenes(scenes);
    Material {
        topics: vec![Topic::new().with_sub_topics(vec![sub_topic])],
    }
}

fn parts(material: &Material) -> Vec<String> {
    material.topics[0].sub_topics[0]
        .scenes
        .iter()
        .map(|s| s.part.clone())
        .collect()
}

fn scenes_op(material: &Material, edit: Edit<Scene>) -> Operation {
    Operation::Scenes {
        sub_topic: material.topics[0].sub_topics[0].id,
        edit,
    }
}

// ============================================================
// Move
// ============================================================

#[rstest]
fn given_three_scenes_when_moving_first_down_then_pure_swap(three_scenes: Material) {
    let op = scenes_op(&three_scenes, Edit::Move(0, Direction::Down));
    let next = three_scenes.apply(&op);
    assert_eq!(parts(&next), vec!["B", "A", "C"]);
}

#[rstest]
#[case(0, Direction::Up)]
#[case(2, Direction::Down)]
fn given_boundary_scene_when_moving_outward_then_unchanged(
    three_scenes: Material,
    #[case] index: usize,
    #[case] direction: Direction,
) {
    let op = scenes_op(&three_scenes, Edit::Move(index, direction));
    let next = three_scenes.apply(&op);
    assert_eq!(next, three_scenes);
}

#[rstest]
fn given_last_scene_when_moving_up_twice_then_becomes_first(three_scenes: Material) {
    let once = three_scenes.apply(&scenes_op(&three_scenes, Edit::Move(2, Direction::Up)));
    let twice = once.apply(&scenes_op(&once, Edit::Move(1, Direction::Up)));
    assert_eq!(parts(&twice), vec!["C", "A", "B"]);
}

// ============================================================
// Remove
// ============================================================

#[rstest]
fn given_middle_scene_when_removing_then_later_scenes_shift_up(three_scenes: Material) {
    let next = three_scenes.apply(&scenes_op(&three_scenes, Edit::Remove(1)));
    assert_eq!(parts(&next), vec!["A", "C"]);
}

#[rstest]
fn given_out_of_range_index_when_removing_then_ignored(three_scenes: Material) {
    let next = three_scenes.apply(&scenes_op(&three_scenes, Edit::Remove(3)));
    assert_eq!(next, three_scenes);
}

// ============================================================
// Add / Replace across levels
// ============================================================

#[test]
fn given_empty_material_when_building_all_levels_then_nodes_append_in_order() {
    let m = Material::empty().apply(&Operation::Topics(Edit::Add));
    let m = m.apply(&Operation::Topics(Edit::Add));
    let topic = m.topics[1].id;
    let m = m.apply(&Operation::SubTopics {
        topic,
        edit: Edit::Add,
    });
    let sub_topic = m.topics[1].sub_topics[0].id;
    let m = m.apply(&Operation::Scenes {
        sub_topic,
        edit: Edit::Add,
    });

    assert_eq!(m.counts(), (2, 1, 1));
    assert!(m.topics[0].sub_topics.is_empty());
    let scene = &m.topics[1].sub_topics[0].scenes[0];
    assert_eq!(scene.part, scene.id.to_string());
}

#[test]
fn given_topic_title_edit_when_replacing_then_subtree_and_siblings_kept() {
    let m = Material::seeded().apply(&Operation::Topics(Edit::Add));
    let renamed = m.topics[0].with_title("Renamed");

    let next = m.apply(&Operation::Topics(Edit::Replace(0, renamed)));

    assert_eq!(next.topics[0].title, "Renamed");
    assert_eq!(next.topics[0].sub_topics, m.topics[0].sub_topics);
    assert_eq!(next.topics[1], m.topics[1]);
}

#[test]
fn given_sub_topic_under_second_topic_when_moving_then_first_topic_untouched() {
    let m = Material::seeded().apply(&Operation::Topics(Edit::Add));
    let topic = m.topics[1].id;
    let m = m.apply(&Operation::SubTopics { topic, edit: Edit::Add });
    let m = m.apply(&Operation::SubTopics { topic, edit: Edit::Add });
    let first = m.topics[1].sub_topics[0].id;

    let next = m.apply(&Operation::SubTopics {
        topic,
        edit: Edit::Move(0, Direction::Down),
    });

    assert_eq!(next.topics[0], m.topics[0]);
    assert_eq!(next.topics[1].sub_topics[1].id, first);
}
