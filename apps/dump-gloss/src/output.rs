//! Human-readable rendering of a report on stderr.
//!
//! The JSON report on disk is the machine-facing artifact; this is what an
//! operator watching a batch sees. Colors are dropped when `NO_COLOR` is set.

use crate::models::{Report, ReportItem, Severity};
use crate::utils::use_colors;
use owo_colors::OwoColorize;

/// Print the items that need attention, then the summary line.
pub fn print_report(report: &Report) {
    for line in render_report(report, use_colors()) {
        eprintln!("{}", line);
    }
}

/// Non-good items only; notes and fixed or correct items show up in the
/// summary tally alone.
pub fn render_report(report: &Report, color: bool) -> Vec<String> {
    let mut lines: Vec<String> = report
        .items()
        .iter()
        .filter(|it| it.severity.is_bad())
        .map(|it| render_item(it, color))
        .collect();
    let summary = format!("— Summary — {}", report.summary_line());
    lines.push(if color {
        summary.bold().to_string()
    } else {
        summary
    });
    lines
}

/// One line per item: icon, severity tag, location and message.
pub fn render_item(it: &ReportItem, color: bool) -> String {
    let tag = format!("⟦{}⟧", it.severity);
    let (icon, tag) = match it.severity {
        s if s.is_severe() => (
            paint("✖", color, |t| t.red().to_string()),
            paint(&tag, color, |t| t.red().bold().to_string()),
        ),
        Severity::Warning => (
            paint("▲", color, |t| t.yellow().to_string()),
            paint(&tag, color, |t| t.yellow().bold().to_string()),
        ),
        s if s.is_fix() || s == Severity::Correct => (
            paint("✔", color, |t| t.green().to_string()),
            paint(&tag, color, |t| t.green().bold().to_string()),
        ),
        _ => (
            paint("◆", color, |t| t.blue().to_string()),
            paint(&tag, color, |t| t.blue().bold().to_string()),
        ),
    };
    let mut line = format!("{} {} {}", icon, tag, it.summary());
    if let Some(e) = &it.e {
        line.push_str(" — ");
        line.push_str(e);
    }
    line
}

fn paint(text: &str, color: bool, f: impl Fn(&str) -> String) -> String {
    if color {
        f(text)
    } else {
        text.to_string()
    }
}
