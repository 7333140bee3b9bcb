//! `patchext`'s bare CLI surface: `--help`/`--version`, and the host agent's
//! single-dash calling convention.

use crate::support::Extension;

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn help_shows_usage() {
    let assert = Extension::new().patchext().arg("--help").assert().success();
    assert!(stdout_of(assert).contains("Usage:"));
}

#[test]
fn version_reports_the_crate_version() {
    let assert = Extension::new().patchext().arg("--version").assert().success();
    assert!(stdout_of(assert).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn single_dash_verb_is_accepted_like_the_host_agent_sends_it() {
    let ext = Extension::new();
    // `-install` is how the host agent actually invokes extension verbs;
    // `install` the bare subcommand name works identically.
    ext.patchext().arg("-install").assert().success();
    assert!(ext.config_dir().is_dir());
}

#[test]
fn missing_handler_environment_is_a_handler_failure() {
    let ext = Extension::new();
    std::fs::remove_file(ext.root().join("HandlerEnvironment.json")).expect("remove HandlerEnvironment.json");

    ext.patchext().arg("install").assert().failure().code(pk_core::ExitCode::HandlerFailed.as_i32());
}
