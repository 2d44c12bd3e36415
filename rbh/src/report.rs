//! Plain-text rendering for the final report lines.
//!
//! The pipeline already prints progress while it runs; these renderers add
//! the one-screen wrap-up afterwards. JSON output bypasses this module.

use rbh_common::preflight::Severity;
use rbh_common::{PreflightReport, RunReport};

pub fn print_run_summary(report: &RunReport) {
    println!("{}", render_run_summary(report));
}

pub fn print_preflight(report: &PreflightReport) {
    print!("{}", render_preflight(report));
}

fn render_run_summary(report: &RunReport) -> String {
    if report.dry_run {
        return "Dry run: nothing was executed.".to_string();
    }

    let mut parts = Vec::new();
    if report.synced {
        let n = report.changed_files.len();
        let plural = if n == 1 { "" } else { "s" };
        parts.push(format!(
            "synced {n} file{plural} in {:.1}s",
            report.sync_ms as f64 / 1000.0
        ));
    } else {
        parts.push("nothing to sync".to_string());
    }
    if !report.reverted.is_empty() {
        parts.push(format!("reverted {}", report.reverted.len()));
    }
    // The pipeline fails before reporting when the build fails, so an
    // invoked build here succeeded.
    if report.build_invoked {
        parts.push(format!("build ok in {:.1}s", report.build_ms as f64 / 1000.0));
    } else {
        parts.push("build skipped".to_string());
    }
    format!("✓ {}", parts.join(", "))
}

fn render_preflight(report: &PreflightReport) -> String {
    let mut out = format!("Preflight for {}:\n", report.host);
    for check in &report.checks {
        if check.passed {
            out.push_str(&format!("  ✓ {}\n", check.name));
            continue;
        }
        let sigil = if check.severity == Severity::Error {
            '✗'
        } else {
            '!'
        };
        out.push_str(&format!("  {sigil} {}: {}\n", check.name, check.message));
        if let Some(fix) = &check.remediation {
            out.push_str(&format!("      fix: {fix}\n"));
        }
    }
    if report.ok() {
        out.push_str("Host looks ready.\n");
    } else {
        out.push_str("Host is not ready.\n");
    }
    out
}
