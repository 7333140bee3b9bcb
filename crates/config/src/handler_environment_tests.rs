// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn write_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("HandlerEnvironment.json");
    let body = format!(
        r#"[{{
            "version": 1.0,
            "handlerEnvironment": {{
                "configFolder": "{0}/config",
                "statusFolder": "{0}/status",
                "logFolder": "{0}/log",
                "eventsFolder": "{0}/events"
            }}
        }}]"#,
        dir.display()
    );
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn parses_paths_from_first_array_entry() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path());
    let paths = load_handler_environment(&path).unwrap();
    assert_eq!(paths.config_dir, dir.path().join("config"));
    assert_eq!(paths.status_dir, dir.path().join("status"));
    assert_eq!(paths.log_dir, dir.path().join("log"));
    assert_eq!(paths.events_dir, dir.path().join("events"));
}

#[test]
fn empty_array_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("HandlerEnvironment.json");
    std::fs::write(&path, "[]").unwrap();
    let result = load_handler_environment(&path);
    assert!(matches!(result, Err(HandlerEnvironmentError::Empty { .. })));
}

#[test]
fn missing_file_is_an_error() {
    let path = PathBuf::from("/nonexistent/HandlerEnvironment.json");
    let result = load_handler_environment(&path);
    assert!(matches!(result, Err(HandlerEnvironmentError::Read { .. })));
}
