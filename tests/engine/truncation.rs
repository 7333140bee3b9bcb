//! `pk_engine::truncate_to_budget` driven by a real JSON-byte-length size
//! function, standing in for how `patchextd` sizes a composed StatusFile
//! document, rather than the crate-level tests' synthetic linear closure.

use pk_core::{Classification, PatchRecord, SubstatusState};
use pk_engine::{truncate_to_budget, AGENT_LIMIT, MIN_ASSESSMENT_PATCHES_RETAINED};

fn pkg(name: &str) -> PatchRecord {
    PatchRecord::new(name, "1.0-1", "ubuntu", "22.04", vec![Classification::Other])
}

/// Total on-wire byte length of both lists serialized as JSON arrays, the
/// same shape `StatusFileEntry::byte_len` measures.
fn json_byte_len(installation: &[PatchRecord], assessment: &[PatchRecord]) -> usize {
    serde_json::to_vec(installation).expect("serialize installation").len()
        + serde_json::to_vec(assessment).expect("serialize assessment").len()
}

#[test]
fn small_lists_fit_within_the_agent_limit_untouched() {
    let installation: Vec<_> = (0..3).map(|i| pkg(&format!("pkg{i}"))).collect();
    let assessment: Vec<_> = (0..3).map(|i| pkg(&format!("apkg{i}"))).collect();

    let outcome = truncate_to_budget(&installation, &assessment, AGENT_LIMIT, json_byte_len);

    assert!(!outcome.truncated);
    assert_eq!(outcome.installation_patches, installation);
    assert_eq!(outcome.assessment_patches, assessment);
    assert_eq!(outcome.apply_status_bump(SubstatusState::Success), SubstatusState::Success);
}

#[test]
fn a_huge_assessment_list_is_shrunk_with_a_tombstone_and_bumps_status_to_warning() {
    let installation: Vec<_> = (0..10).map(|i| pkg(&format!("pkg{i}"))).collect();
    let assessment: Vec<_> = (0..5_000).map(|i| pkg(&format!("assessment-package-{i}"))).collect();

    let total_before = json_byte_len(&installation, &assessment);
    assert!(total_before > AGENT_LIMIT, "fixture must actually exceed the budget to exercise truncation");

    let outcome = truncate_to_budget(&installation, &assessment, AGENT_LIMIT, json_byte_len);

    assert!(outcome.truncated);
    // Installation records always survive in full while any budget remains
    // after shrinking assessment records.
    assert_eq!(outcome.installation_patches, installation);
    assert!(outcome.assessment_patches.len() < assessment.len());
    assert!(outcome.assessment_patches.last().expect("non-empty").is_tombstone());
    assert!(json_byte_len(&outcome.installation_patches, &outcome.assessment_patches) <= AGENT_LIMIT);
    assert_eq!(outcome.apply_status_bump(SubstatusState::Success), SubstatusState::Warning);
}

#[test]
fn assessment_never_shrinks_below_the_minimum_while_installation_still_has_room() {
    // Few installation records and a huge assessment list: assessment should
    // hit its floor before installation is ever touched.
    let installation: Vec<_> = (0..2).map(|i| pkg(&format!("pkg{i}"))).collect();
    let assessment: Vec<_> = (0..20_000).map(|i| pkg(&format!("assessment-package-{i}"))).collect();

    let outcome = truncate_to_budget(&installation, &assessment, AGENT_LIMIT, json_byte_len);

    assert!(outcome.truncated);
    assert_eq!(outcome.installation_patches, installation);
    // MIN_ASSESSMENT_PATCHES_RETAINED kept, plus the tombstone.
    assert_eq!(outcome.assessment_patches.len(), MIN_ASSESSMENT_PATCHES_RETAINED + 1);
}

#[test]
fn both_lists_huge_forces_installation_to_shrink_too() {
    let installation: Vec<_> = (0..20_000).map(|i| pkg(&format!("installation-package-{i}"))).collect();
    let assessment: Vec<_> = (0..20_000).map(|i| pkg(&format!("assessment-package-{i}"))).collect();

    let outcome = truncate_to_budget(&installation, &assessment, AGENT_LIMIT, json_byte_len);

    assert!(outcome.truncated);
    assert!(outcome.installation_patches.len() < installation.len());
    assert!(outcome.installation_patches.last().expect("non-empty").is_tombstone());
    assert_eq!(outcome.assessment_patches.len(), MIN_ASSESSMENT_PATCHES_RETAINED + 1);
    assert!(json_byte_len(&outcome.installation_patches, &outcome.assessment_patches) <= AGENT_LIMIT);
}

#[test]
fn truncation_never_downgrades_an_existing_error_status() {
    let installation: Vec<_> = (0..10).map(|i| pkg(&format!("pkg{i}"))).collect();
    let assessment: Vec<_> = (0..5_000).map(|i| pkg(&format!("assessment-package-{i}"))).collect();

    let outcome = truncate_to_budget(&installation, &assessment, AGENT_LIMIT, json_byte_len);

    assert!(outcome.truncated);
    assert_eq!(outcome.apply_status_bump(SubstatusState::Error), SubstatusState::Error);
}
