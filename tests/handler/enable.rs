//! `enable` scenarios that never spawn a core process: `NoOperation`'s
//! terminal success, and a prior run that has already completed by the time
//! of re-enable. Scenarios that reach `EnableDecision::SpawnCore` are
//! exercised at the [`crate::engine`] level instead of through the CLI —
//! spawning for real would shell out to `patchextd`, which in turn probes
//! for a real package manager. The bounded wait/poll loop for a still-live
//! prior run (`EnableDecision::WaitForPriorRun`) is covered by the
//! `pk-handler` crate's own unit tests (`lifecycle_tests.rs`,
//! `commands::enable_tests`) instead of here, for the same reason: a CLI
//! invocation that actually waits out minutes of polling, or reaches the
//! far end of it and spawns, is impractical to drive through a subprocess
//! in a fast test suite.

use chrono::Utc;
use pk_core::Operation;
use serial_test::serial;

use crate::support::Extension;

#[test]
#[serial]
fn no_operation_settings_yield_a_terminal_success_status_without_spawning() {
    let ext = Extension::installed();
    ext.write_settings(7, Operation::NoOperation);
    std::env::set_var("ConfigSequenceNumber", "7");

    ext.patchext().arg("enable").assert().success();

    let entry = ext.read_status(7);
    assert_eq!(entry.status.operation, Operation::NoOperation);
    assert!(matches!(entry.status.status, pk_core::SubstatusState::Success));
    assert!(entry.status.substatus.is_empty());
    assert!(!ext.config_dir().join("ExtState.json").exists());

    std::env::remove_var("ConfigSequenceNumber");
}

#[test]
#[serial]
fn reenable_of_a_sequence_whose_prior_run_already_completed_is_treated_as_fresh() {
    let ext = Extension::installed();
    let now = Utc::now();
    ext.write_settings(4, Operation::NoOperation);
    ext.write_ext_state(&crate::support::ext_state(4, now + chrono::Duration::minutes(30), Operation::Assessment));
    let mut completed = crate::support::live_core_state(4, Operation::Assessment, now);
    completed.mark_completed();
    ext.write_core_state(&completed);
    std::env::set_var("ConfigSequenceNumber", "4");

    // NoOperation short-circuits before the prior-run check even runs, but
    // this confirms a completed prior run at the same sequence number does
    // not itself block the handler from reaching a terminal decision.
    ext.patchext().arg("enable").assert().success();
    let entry = ext.read_status(4);
    assert!(matches!(entry.status.status, pk_core::SubstatusState::Success));

    std::env::remove_var("ConfigSequenceNumber");
}
