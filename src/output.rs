//! CLI output formatting for runs and status previews.
//!
//! # Output Format
//!
//! ## Status
//!
//! Every scanned file is listed with its classification, including the
//! up-to-date ones, so `status` doubles as an inventory:
//!
//! ```text
//! Photos
//!     dawn.jpg: up to date
//!     dusk.jpg: reprocess (new)
//!     noon.jpg: reprocess (content changed)
//!
//! Pruned on next run
//!     gone.jpg
//!
//! 2 to process, 1 up to date, 1 pruned
//! ```
//!
//! ## Run
//!
//! A run prints one line per file actually worked on (up-to-date files are
//! silent), then a closing summary. Failures repeat in the summary with
//! their causes so they survive scrollback:
//!
//! ```text
//! dusk.jpg → dusk.webp
//! broken.jpg: failed (decode failed: ...)
//!
//! Failures
//!     broken.jpg: decode failed: ...
//! 1 processed, 1 up to date, 1 failed, 0 pruned
//! ```
//!
//! # Architecture
//!
//! Each surface has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects. Per-file run lines are
//! formatted from [`RunEvent`]s as they arrive, so progress shows while
//! the pool is still working.

use crate::classify::Decision;
use crate::config::PipelineConfig;
use crate::pipeline::{RunPlan, RunSummary};
use crate::pool::RunEvent;

// ============================================================================
// Status output
// ============================================================================

/// Format a status preview: per-file decisions, unreadable files, and
/// entries the next run would prune.
pub fn format_plan_output(plan: &RunPlan) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Photos".to_string());
    if plan.decisions.is_empty() && plan.failures.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (filename, decision) in &plan.decisions {
        match decision {
            Decision::Fresh => lines.push(format!("    {}: up to date", filename)),
            Decision::Reprocess(reason) => {
                lines.push(format!("    {}: reprocess ({})", filename, reason))
            }
        }
    }
    for failure in &plan.failures {
        lines.push(format!(
            "    {}: unreadable ({})",
            failure.filename, failure.error
        ));
    }

    if !plan.pruned.is_empty() {
        lines.push(String::new());
        lines.push("Pruned on next run".to_string());
        for name in &plan.pruned {
            lines.push(format!("    {}", name));
        }
    }

    lines.push(String::new());
    lines.push(plan_totals(plan));
    lines
}

/// Print status output to stdout.
pub fn print_plan_output(plan: &RunPlan) {
    for line in format_plan_output(plan) {
        println!("{}", line);
    }
}

fn plan_totals(plan: &RunPlan) -> String {
    let to_process = plan
        .decisions
        .iter()
        .filter(|(_, decision)| decision.needs_processing())
        .count();
    let fresh = plan.decisions.len() - to_process;

    let mut parts = vec![
        format!("{} to process", to_process),
        format!("{} up to date", fresh),
    ];
    if !plan.failures.is_empty() {
        parts.push(format!("{} unreadable", plan.failures.len()));
    }
    if !plan.pruned.is_empty() {
        parts.push(format!("{} pruned", plan.pruned.len()));
    }
    parts.join(", ")
}

// ============================================================================
// Run output
// ============================================================================

/// Format a single run progress event as display lines.
pub fn format_run_event(event: &RunEvent) -> Vec<String> {
    match event {
        RunEvent::Transcoded { filename } => {
            vec![format!(
                "{} \u{2192} {}",
                filename,
                PipelineConfig::derivative_filename(filename)
            )]
        }
        RunEvent::Failed { filename, reason } => {
            vec![format!("{}: failed ({})", filename, reason)]
        }
    }
}

/// Format the closing summary for a completed run.
///
/// Failures are repeated here with their causes; the count line is always
/// last so scripts can grab it with `tail -1`.
pub fn format_run_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::new();

    if !summary.failures.is_empty() {
        lines.push("Failures".to_string());
        for failure in &summary.failures {
            lines.push(format!("    {}: {}", failure.filename, failure.error));
        }
    }

    lines.push(format!(
        "{} processed, {} up to date, {} failed, {} pruned",
        summary.transcoded,
        summary.fresh,
        summary.failures.len(),
        summary.pruned,
    ));
    lines
}

/// Print the run summary to stdout.
pub fn print_run_summary(summary: &RunSummary) {
    for line in format_run_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ReprocessReason;
    use crate::transcode::TranscodeFailure;

    fn fail(filename: &str, error: &str) -> TranscodeFailure {
        TranscodeFailure {
            filename: filename.to_string(),
            error: error.to_string(),
        }
    }

    // =========================================================================
    // Status formatting tests
    // =========================================================================

    #[test]
    fn format_plan_empty_source() {
        let plan = RunPlan {
            decisions: vec![],
            failures: vec![],
            pruned: vec![],
        };
        let lines = format_plan_output(&plan);
        assert_eq!(
            lines,
            vec!["Photos", "    (none)", "", "0 to process, 0 up to date"]
        );
    }

    #[test]
    fn format_plan_shows_every_decision() {
        let plan = RunPlan {
            decisions: vec![
                ("dawn.jpg".to_string(), Decision::Fresh),
                (
                    "dusk.jpg".to_string(),
                    Decision::Reprocess(ReprocessReason::New),
                ),
                (
                    "noon.jpg".to_string(),
                    Decision::Reprocess(ReprocessReason::ContentChanged),
                ),
                (
                    "old.jpg".to_string(),
                    Decision::Reprocess(ReprocessReason::LegacyEntry),
                ),
                (
                    "thin.jpg".to_string(),
                    Decision::Reprocess(ReprocessReason::DerivativeMissing),
                ),
            ],
            failures: vec![],
            pruned: vec![],
        };
        let lines = format_plan_output(&plan);
        assert_eq!(lines[0], "Photos");
        assert_eq!(lines[1], "    dawn.jpg: up to date");
        assert_eq!(lines[2], "    dusk.jpg: reprocess (new)");
        assert_eq!(lines[3], "    noon.jpg: reprocess (content changed)");
        assert_eq!(lines[4], "    old.jpg: reprocess (legacy entry)");
        assert_eq!(lines[5], "    thin.jpg: reprocess (derivative missing)");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "4 to process, 1 up to date");
    }

    #[test]
    fn format_plan_with_failures_and_pruned() {
        let plan = RunPlan {
            decisions: vec![("dawn.jpg".to_string(), Decision::Fresh)],
            failures: vec![fail("locked.jpg", "hashing failed: permission denied")],
            pruned: vec!["gone.jpg".to_string()],
        };
        let lines = format_plan_output(&plan);
        assert_eq!(lines[0], "Photos");
        assert_eq!(lines[1], "    dawn.jpg: up to date");
        assert_eq!(
            lines[2],
            "    locked.jpg: unreadable (hashing failed: permission denied)"
        );
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Pruned on next run");
        assert_eq!(lines[5], "    gone.jpg");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "0 to process, 1 up to date, 1 unreadable, 1 pruned");
    }

    // =========================================================================
    // Run event formatting tests
    // =========================================================================

    #[test]
    fn format_run_event_transcoded() {
        let event = RunEvent::Transcoded {
            filename: "dusk.jpg".to_string(),
        };
        assert_eq!(format_run_event(&event), vec!["dusk.jpg \u{2192} dusk.webp"]);
    }

    #[test]
    fn format_run_event_failed() {
        let event = RunEvent::Failed {
            filename: "broken.jpg".to_string(),
            reason: "decode failed: bad header".to_string(),
        };
        assert_eq!(
            format_run_event(&event),
            vec!["broken.jpg: failed (decode failed: bad header)"]
        );
    }

    // =========================================================================
    // Run summary formatting tests
    // =========================================================================

    #[test]
    fn format_run_summary_clean() {
        let summary = RunSummary {
            scanned: 3,
            fresh: 1,
            transcoded: 2,
            failures: vec![],
            pruned: 0,
        };
        assert_eq!(
            format_run_summary(&summary),
            vec!["2 processed, 1 up to date, 0 failed, 0 pruned"]
        );
    }

    #[test]
    fn format_run_summary_repeats_failures_with_causes() {
        let summary = RunSummary {
            scanned: 3,
            fresh: 0,
            transcoded: 1,
            failures: vec![
                fail("broken.jpg", "decode failed: bad header"),
                fail("locked.jpg", "hashing failed: permission denied"),
            ],
            pruned: 1,
        };
        let lines = format_run_summary(&summary);
        assert_eq!(lines[0], "Failures");
        assert_eq!(lines[1], "    broken.jpg: decode failed: bad header");
        assert_eq!(lines[2], "    locked.jpg: hashing failed: permission denied");
        assert_eq!(lines[3], "1 processed, 0 up to date, 2 failed, 1 pruned");
    }
}
