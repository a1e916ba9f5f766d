//! Report data model: severities and the flat report item record.
//!
//! Items are what downstream corpus tooling merges into its own reports, so
//! the JSON shape is fixed: `severity, what, howto, e, filename, lines,
//! columns, function`, with absent values rendered as `null`.

pub mod report;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use report::Report;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
/// Closed set of report severities, serialized by name.
pub enum Severity {
    #[default]
    Critical,
    Warning,
    Note,
    Missing,
    Correct,
    IFixedItForYou,
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Note => "NOTE",
            Severity::Missing => "MISSING",
            Severity::Correct => "CORRECT",
            Severity::IFixedItForYou => "IFIXEDITFORYOU",
            Severity::Unknown => "UNKNOWN",
        }
    }

    /// Counts towards the "good" statistic.
    pub fn is_good(&self) -> bool {
        matches!(
            self,
            Severity::Correct | Severity::Note | Severity::IFixedItForYou
        )
    }

    /// Counts towards the "bad" statistic.
    pub fn is_bad(&self) -> bool {
        !self.is_good()
    }

    /// Should be presented as a severe problem.
    pub fn is_severe(&self) -> bool {
        matches!(
            self,
            Severity::Critical | Severity::Missing | Severity::Unknown
        )
    }

    pub fn is_fix(&self) -> bool {
        matches!(self, Severity::IFixedItForYou)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One structured log entry produced by a corpus job.
pub struct ReportItem {
    #[serde(default)]
    pub severity: Severity,
    pub what: String,
    #[serde(default)]
    pub howto: Option<String>,
    /// Captured error detail, always stored as text.
    #[serde(default)]
    pub e: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub lines: Option<Vec<usize>>,
    #[serde(default)]
    pub columns: Option<Vec<usize>>,
    #[serde(default = "default_function")]
    pub function: String,
}

fn default_function() -> String {
    "Unknown function".to_string()
}

impl Default for ReportItem {
    fn default() -> Self {
        ReportItem {
            severity: Severity::Critical,
            what: "Totally unexpected error".to_string(),
            howto: Some("No known fix".to_string()),
            e: None,
            filename: None,
            lines: None,
            columns: None,
            function: default_function(),
        }
    }
}

impl ReportItem {
    pub fn new(severity: Severity, what: impl Into<String>) -> Self {
        ReportItem {
            severity,
            what: what.into(),
            ..Default::default()
        }
    }

    /// An item with the default (critical) severity.
    pub fn critical(what: impl Into<String>) -> Self {
        Self::new(Severity::Critical, what)
    }

    pub fn note(what: impl Into<String>) -> Self {
        Self::new(Severity::Note, what)
    }

    /// Attach an error as its display string.
    pub fn with_error(mut self, e: &dyn std::error::Error) -> Self {
        self.e = Some(e.to_string());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.lines = Some(vec![line]);
        self.columns = Some(vec![column]);
        self
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    /// Location as `filename[:lines[.columns]]`, empty when unknown.
    pub fn location(&self) -> String {
        let mut loc = self.filename.clone().unwrap_or_default();
        if let Some(lines) = &self.lines {
            loc.push(':');
            loc.push_str(&join_numbers(lines));
            if let Some(columns) = &self.columns {
                loc.push('.');
                loc.push_str(&join_numbers(columns));
            }
        }
        loc
    }

    /// Short, location-prefixed message.
    pub fn summary(&self) -> String {
        let loc = self.location();
        if loc.is_empty() {
            self.what.clone()
        } else {
            format!("{}: {}", loc, self.what)
        }
    }
}

fn join_numbers(ns: &[usize]) -> String {
    ns.iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for ReportItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}. {}. {}",
            self.location(),
            self.what,
            self.howto.as_deref().unwrap_or(""),
            self.e.as_deref().unwrap_or("")
        )
    }
}
