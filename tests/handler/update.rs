//! `update`: carry `ExtState.json`/`CoreState.json`/`*.bak` forward from the
//! immediately preceding version directory. The handler derives the
//! extension root from `--handler-env`'s parent, so these tests lay out
//! `<root>/Extension-1.0.0/` and `<root>/Extension-1.1.0/` side by side
//! rather than using the `Extension` harness (which owns a single root).

use assert_cmd::Command;
use serde_json::json;
use tempfile::TempDir;

fn write_handler_environment(version_dir: &std::path::Path) {
    std::fs::create_dir_all(version_dir).expect("version dir");
    let env = json!([{
        "handlerEnvironment": {
            "configFolder": version_dir.join("config").display().to_string(),
            "statusFolder": version_dir.join("status").display().to_string(),
            "logFolder": version_dir.join("log").display().to_string(),
            "eventsFolder": version_dir.join("events").display().to_string(),
        }
    }]);
    std::fs::write(version_dir.join("HandlerEnvironment.json"), env.to_string()).expect("write HandlerEnvironment.json");
}

fn patchext_in(version_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("patchext").expect("patchext binary");
    cmd.current_dir(version_dir);
    cmd.arg("--handler-env").arg(version_dir.join("HandlerEnvironment.json"));
    cmd
}

#[test]
fn update_copies_ext_state_core_state_and_bak_files_from_the_preceding_version() {
    let root = TempDir::new().expect("tempdir");
    let old_dir = root.path().join("PatchOrchestration-1.0.0");
    let new_dir = root.path().join("PatchOrchestration-1.1.0");

    std::fs::create_dir_all(old_dir.join("config")).expect("old config dir");
    write_handler_environment(&old_dir);
    std::fs::write(old_dir.join("config/ExtState.json"), r#"{"extensionSequence":{"number":3}}"#).expect("ExtState");
    std::fs::write(old_dir.join("config/CoreState.json"), r#"{"number":3}"#).expect("CoreState");
    std::fs::write(old_dir.join("config/apt.conf.bak"), "original apt config").expect("bak file");

    write_handler_environment(&new_dir);

    patchext_in(&new_dir).arg("update").assert().success();

    assert_eq!(
        std::fs::read_to_string(new_dir.join("config/ExtState.json")).expect("ExtState carried forward"),
        r#"{"extensionSequence":{"number":3}}"#
    );
    assert_eq!(
        std::fs::read_to_string(new_dir.join("config/CoreState.json")).expect("CoreState carried forward"),
        r#"{"number":3}"#
    );
    assert_eq!(
        std::fs::read_to_string(new_dir.join("config/apt.conf.bak")).expect(".bak carried forward"),
        "original apt config"
    );
}

#[test]
fn update_picks_the_lexicographically_newest_preceding_version() {
    let root = TempDir::new().expect("tempdir");
    for version in ["PatchOrchestration-1.0.0", "PatchOrchestration-1.1.0"] {
        std::fs::create_dir_all(root.path().join(version).join("config")).expect("config dir");
    }
    std::fs::write(
        root.path().join("PatchOrchestration-1.0.0/config/ExtState.json"),
        r#"{"extensionSequence":{"number":1}}"#,
    )
    .expect("older ExtState");
    std::fs::write(
        root.path().join("PatchOrchestration-1.1.0/config/ExtState.json"),
        r#"{"extensionSequence":{"number":2}}"#,
    )
    .expect("newer ExtState");

    let new_dir = root.path().join("PatchOrchestration-1.2.0");
    write_handler_environment(&new_dir);

    patchext_in(&new_dir).arg("update").assert().success();

    assert_eq!(
        std::fs::read_to_string(new_dir.join("config/ExtState.json")).expect("ExtState carried forward"),
        r#"{"extensionSequence":{"number":2}}"#
    );
}

#[test]
fn update_with_no_preceding_version_is_a_handler_failure() {
    let root = TempDir::new().expect("tempdir");
    let new_dir = root.path().join("PatchOrchestration-1.0.0");
    write_handler_environment(&new_dir);

    patchext_in(&new_dir).arg("update").assert().failure().code(pk_core::ExitCode::HandlerFailed.as_i32());
}
