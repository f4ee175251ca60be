//! Environment overrides live in their own test binary so the variables
//! never leak into other config tests.

use std::path::PathBuf;

use tempfile::TempDir;

use materialtree::config::Settings;

const VARS: [&str; 4] = [
    "MATERIALTREE_INDENT",
    "MATERIALTREE_SEED_EXAMPLE",
    "MATERIALTREE_DOCUMENT",
    "MATERIALTREE_PROMPT",
];

#[test]
fn given_env_vars_when_load_then_env_beats_local_config() {
    let project = TempDir::new().unwrap();
    std::fs::write(
        project.path().join(".materialtree.toml"),
        "indent = 4\nseed_example = true\nprompt = \"local> \"\n",
    )
    .unwrap();
    std::env::set_var("MATERIALTREE_INDENT", "0");
    std::env::set_var("MATERIALTREE_SEED_EXAMPLE", "false");
    std::env::set_var("MATERIALTREE_DOCUMENT", "/srv/course.json");
    std::env::set_var("MATERIALTREE_PROMPT", "env> ");

    let loaded = Settings::load(Some(project.path()));

    for var in VARS {
        std::env::remove_var(var);
    }
    let settings = loaded.expect("load settings");
    assert_eq!(settings.indent, 0);
    assert!(!settings.seed_example);
    assert_eq!(settings.document, Some(PathBuf::from("/srv/course.json")));
    assert_eq!(settings.prompt, "env> ");

    // double-underscore prefix is not a recognised spelling
    std::env::set_var("MATERIALTREE__INDENT", "7");
    let loaded = Settings::load(Some(project.path()));
    std::env::remove_var("MATERIALTREE__INDENT");
    assert_eq!(loaded.expect("load settings").indent, 4);
}
