//! Scripted shell sessions against an in-process editor.

use std::io::Cursor;
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use materialtree::application::services::EditorService;
use materialtree::cli::shell::{Flow, Shell};
use materialtree::domain::{Material, SceneKind};
use materialtree::infrastructure::traits::RealFileSystem;
use materialtree::util::testing;

#[fixture]
fn editor() -> EditorService {
    testing::init_test_setup();
    EditorService::new(Arc::new(RealFileSystem), Material::seeded(), 2)
}

fn run_script(editor: &mut EditorService, script: &str) -> String {
    let mut out = Vec::new();
    Shell::new(editor, None)
        .run(Cursor::new(script), &mut out)
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[rstest]
fn given_build_script_when_run_then_tree_is_built_in_order(mut editor: EditorService) {
    let script = "\
# build a second topic with one points scene
add topic
title topic 1 Advanced usage
add subtopic 1
add scene 1 0
kind 1 0 0 points
add point 1 0 0
add point 1 0 0
point 1 0 0 0 first
point 1 0 0 1 second
down point 1 0 0 0
";
    let output = run_script(&mut editor, script);

    assert!(!output.contains("error"), "{}", output);
    let material = editor.material();
    assert_eq!(material.counts(), (2, 2, 2));
    assert_eq!(material.topics[1].title, "Advanced usage");
    let scene = &material.topics[1].sub_topics[0].scenes[0];
    assert_eq!(scene.kind, SceneKind::Points);
    assert_eq!(scene.points, vec!["second", "first"]);
}

#[rstest]
fn given_out_of_range_edit_when_run_then_warns_and_keeps_material(mut editor: EditorService) {
    let before = editor.material().clone();

    let output = run_script(&mut editor, "rm topic 3\nup topic 0\n");

    assert_eq!(output.matches("nothing changed").count(), 2, "{}", output);
    assert_eq!(editor.material(), &before);
}

#[rstest]
fn given_missing_parent_when_run_then_reports_error_and_continues(mut editor: EditorService) {
    let output = run_script(&mut editor, "add subtopic 5\nadd topic\n");

    assert!(output.contains("no topic at position 5"), "{}", output);
    assert_eq!(editor.material().topics.len(), 2);
}

#[rstest]
fn given_unknown_command_when_run_then_usage_is_printed(mut editor: EditorService) {
    let output = run_script(&mut editor, "frobnicate\nkind 0 0 0 video\n");

    assert!(output.contains("frobnicate"), "{}", output);
    assert!(output.contains("video"), "{}", output);
    assert_eq!(editor.material().counts(), (1, 1, 1));
}

#[rstest]
fn given_quit_when_run_then_later_lines_are_ignored(mut editor: EditorService) {
    run_script(&mut editor, "add topic\nquit\nadd topic\n");
    assert_eq!(editor.material().topics.len(), 2);
}

#[rstest]
fn given_blank_and_comment_lines_when_handled_then_continue(mut editor: EditorService) {
    let mut out = Vec::new();
    let mut shell = Shell::new(&mut editor, None);

    assert_eq!(shell.handle_line("   ", &mut out).unwrap(), Flow::Continue);
    assert_eq!(shell.handle_line("# note", &mut out).unwrap(), Flow::Continue);
    assert_eq!(shell.handle_line("exit", &mut out).unwrap(), Flow::Quit);
    assert!(out.is_empty());
}

#[rstest]
fn given_export_then_import_when_run_then_material_survives_round_trip(
    mut editor: EditorService,
) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("course.json");
    let part_before = editor.material().topics[0].sub_topics[0].scenes[0]
        .part
        .clone();

    let script = format!(
        "part 0 0 0 intro-1\nexport {p}\nrm topic 0\nimport {p}\n",
        p = path.display()
    );
    let output = run_script(&mut editor, &script);

    assert!(output.contains("exported"), "{}", output);
    assert!(output.contains("imported"), "{}", output);
    let scene = &editor.material().topics[0].sub_topics[0].scenes[0];
    assert_ne!(scene.part, part_before);
    assert_eq!(scene.part, "intro-1");
    assert_eq!(scene.title, "Welcome");
}

#[rstest]
fn given_existing_file_when_export_without_force_then_error_and_file_kept(
    mut editor: EditorService,
) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("course.json");
    std::fs::write(&path, "keep").unwrap();

    let output = run_script(&mut editor, &format!("export {}\n", path.display()));

    assert!(output.contains("already exists"), "{}", output);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep");
}

#[rstest]
fn given_preview_and_outline_when_run_then_both_printed(mut editor: EditorService) {
    let output = run_script(&mut editor, "text 0 0 0 Hi there\npreview\noutline\n");

    assert!(output.contains("\"bubbleText\": \"Hi there\""), "{}", output);
    assert!(output.contains("[0] Welcome <bubble"), "{}", output);
}

#[rstest]
fn given_quoted_title_and_path_with_spaces_when_run_then_kept_verbatim(
    mut editor: EditorService,
) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("my course.json");

    let script = format!(
        "title topic 0 \"Intro  to Rust\"\nexport \"{p}\"\nrm topic 0\nimport '{p}'\ntitle topic 0 \"unclosed\n",
        p = path.display()
    );
    let output = run_script(&mut editor, &script);

    assert!(path.exists());
    assert!(output.contains("unterminated quote"), "{}", output);
    assert_eq!(editor.material().topics.len(), 1);
    assert_eq!(editor.material().topics[0].title, "Intro  to Rust");
}
