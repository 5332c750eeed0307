/*!
 * Tests for the duration verification report
 */

use advox::app_config::VerifyConfig;
use advox::verify::{SyncReport, SyncStatus};

use crate::common::entry_at;

#[test]
fn test_report_rows_shouldCarryNominalAndActualFields() {
    let entries = vec![entry_at(1, 10_000, "first"), entry_at(2, 15_000, "second")];
    let durations = vec![Some(3.5), Some(2.0)];

    let report = SyncReport::build(&entries, &durations, 24.0, &VerifyConfig::default());

    let row = &report.rows[0];
    assert_eq!(row.nominal_start_ms, 10_000);
    assert_eq!(row.nominal_duration_ms, Some(5_000));
    assert_eq!(row.actual_duration_ms, Some(3_500));
    assert_eq!(row.actual_end_ms, Some(13_500));
    assert_eq!(row.overlap.unwrap().ms, -1_500);

    // The last row is open-ended
    let last = &report.rows[1];
    assert_eq!(last.nominal_duration_ms, None);
    assert!(last.overlap.is_none());
}

#[test]
fn test_report_withMissingLastDuration_shouldMarkLastUnverified() {
    let entries = vec![entry_at(1, 0, "a"), entry_at(2, 5_000, "b")];
    let durations = vec![Some(2.0), None];

    let report = SyncReport::build(&entries, &durations, 24.0, &VerifyConfig::default());

    assert_eq!(report.rows[0].status, SyncStatus::Ok);
    assert_eq!(report.rows[1].status, SyncStatus::Unverified);
}

#[test]
fn test_report_withShortDurationsVector_shouldTreatTailAsUnverified() {
    // Fewer duration slots than entries must not panic or skew alignment
    let entries = vec![entry_at(1, 0, "a"), entry_at(2, 5_000, "b"), entry_at(3, 9_000, "c")];
    let durations = vec![Some(1.0)];

    let report = SyncReport::build(&entries, &durations, 24.0, &VerifyConfig::default());

    assert_eq!(report.rows[0].status, SyncStatus::Ok);
    assert_eq!(report.rows[1].status, SyncStatus::Unverified);
    assert_eq!(report.rows[2].status, SyncStatus::Unverified);
}

#[test]
fn test_issues_shouldContainEverythingButOk() {
    let entries = vec![
        entry_at(1, 0, "fits"),
        entry_at(2, 2_000, "minor overrun"),
        entry_at(3, 4_000, "severe overrun"),
        entry_at(4, 10_000, "missing"),
    ];
    let durations = vec![Some(1.0), Some(2.3), Some(7.0), None];
    let config = VerifyConfig { minor_threshold_ms: 500 };

    let report = SyncReport::build(&entries, &durations, 24.0, &config);
    let issues = report.issues();

    assert_eq!(issues.len(), 3);
    assert_eq!(issues[0].status, SyncStatus::Minor);
    assert_eq!(issues[1].status, SyncStatus::Severe);
    assert_eq!(issues[2].status, SyncStatus::Unverified);

    let summary = report.summary();
    assert_eq!(summary.ok, 1);
    // 300 ms + 1000 ms of positive overlap
    assert_eq!(summary.total_overrun_ms, 1_300);
}

#[test]
fn test_frame_counts_shouldFollowConfiguredFrameRate() {
    let entries = vec![entry_at(1, 0, "a"), entry_at(2, 1_000, "b")];
    let durations = vec![Some(1.5), Some(0.2)];

    let at_24 = SyncReport::build(&entries, &durations, 24.0, &VerifyConfig::default());
    let at_30 = SyncReport::build(&entries, &durations, 30.0, &VerifyConfig::default());

    assert_eq!(at_24.rows[0].overlap.unwrap().frames, 12);
    assert_eq!(at_30.rows[0].overlap.unwrap().frames, 15);
}

#[test]
fn test_report_withEmptyEntryList_shouldRenderEmptySummary() {
    let report = SyncReport::build(&[], &[], 24.0, &VerifyConfig::default());

    assert!(report.rows.is_empty());
    assert!(!report.summary().has_issues());
    assert!(report.render_text().contains("Total entries: 0"));
}
