//! Human-readable step trace.

use std::fmt::Write;

use pulse_domain::{RunReport, RunVerdict, StepReport};

const RULE: &str = "--------------------------------";

/// Renders a report as the console trace: one line per step, then the verdict.
pub fn trace(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Target: {}", report.target);
    let _ = writeln!(out, "{RULE}");
    for step in &report.steps {
        let _ = writeln!(out, "{}", step_line(step));
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", verdict_line(report));
    out
}

fn step_line(step: &StepReport) -> String {
    let mark = match (step.passed, step.advisory) {
        (true, _) => "PASS",
        (false, true) => "WARN",
        (false, false) => "FAIL",
    };
    let detail = if step.passed {
        step.actual.as_deref()
    } else {
        step.error.as_deref()
    };
    match detail {
        Some(detail) => format!(
            "[{mark}] {:<15} {detail} ({}ms)",
            step.step.label(),
            step.duration_ms
        ),
        None => format!("[{mark}] {:<15} ({}ms)", step.step.label(), step.duration_ms),
    }
}

fn verdict_line(report: &RunReport) -> String {
    let counts = format!(
        "{} passed, {} failed in {}ms",
        report.passed(),
        report.failed(),
        report.duration_ms
    );
    match &report.verdict {
        RunVerdict::Passed => format!("PASSED ({counts})"),
        RunVerdict::Failed => format!("FAILED ({counts})"),
        RunVerdict::Aborted { reason } => format!("ABORTED: {reason} ({counts})"),
    }
}
