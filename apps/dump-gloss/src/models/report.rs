//! Ordered report buffer owned by the runner for one invocation.

use super::{ReportItem, Severity};
use crate::error::{GlossError, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    items: Vec<ReportItem>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ReportItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[ReportItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// One-line tally of the items by severity.
    ///
    /// `MISSING` counts as critical; everything that is neither critical,
    /// warning nor note is counted under "others".
    pub fn summary_line(&self) -> String {
        let (mut criticals, mut warnings, mut notes, mut others) = (0usize, 0usize, 0usize, 0usize);
        for it in &self.items {
            match it.severity {
                Severity::Critical | Severity::Missing => criticals += 1,
                Severity::Warning => warnings += 1,
                Severity::Note => notes += 1,
                _ => others += 1,
            }
        }
        format!(
            "Total of {} messages: {} critical errors, {} warnings, {} notes and {} others.",
            self.items.len(),
            criticals,
            warnings,
            notes,
            others
        )
    }

    /// Serialize the buffer as a compact JSON array, truncating `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = fs::File::create(path).map_err(|e| GlossError::io(path, e))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer(&mut out, &self.items)?;
        out.flush().map_err(|e| GlossError::io(path, e))?;
        Ok(())
    }

    /// Read a report written by a corpus job.
    ///
    /// Never fails: an empty or unreadable file becomes a single critical
    /// item describing the problem, so callers can merge it unconditionally.
    pub fn load(path: &Path) -> Report {
        let shown = path.to_string_lossy().to_string();
        let data = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                return Report::from(vec![ReportItem::critical(format!(
                    "Exception when reading report file {}",
                    shown
                ))
                .with_error(&e)])
            }
        };
        if data.trim().is_empty() {
            return Report::from(vec![ReportItem::critical(format!(
                "Empty report file {}",
                shown
            ))]);
        }
        match serde_json::from_str::<Vec<ReportItem>>(&data) {
            Ok(items) => Report::from(items),
            Err(e) => Report::from(vec![ReportItem::critical(format!(
                "Exception when reading report file {}",
                shown
            ))
            .with_error(&e)]),
        }
    }
}

impl From<Vec<ReportItem>> for Report {
    fn from(items: Vec<ReportItem>) -> Self {
        Report { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Report {
        let mut r = Report::new();
        r.push(ReportItem::note("Reading doc1.eaf"));
        r.push(ReportItem::new(Severity::Warning, "odd tier"));
        r.push(ReportItem::critical("Unsupported data type WRONG"));
        r.push(ReportItem::new(Severity::Missing, "no gloss"));
        r.push(ReportItem::new(Severity::Correct, "fine"));
        r
    }

    #[test]
    fn test_write_is_byte_identical_when_repeated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let r = sample();
        r.write(&path).unwrap();
        let first = fs::read(&path).unwrap();
        r.write(&path).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_written_report_parses_back_with_plain_severities() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        sample().write(&path).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 5);
        let sevs: Vec<&str> = arr.iter().map(|o| o["severity"].as_str().unwrap()).collect();
        assert_eq!(sevs, ["NOTE", "WARNING", "CRITICAL", "MISSING", "CORRECT"]);
        assert_eq!(arr[2]["what"], "Unsupported data type WRONG");

        let loaded = Report::load(&path);
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_write_truncates_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        fs::write(&path, "x".repeat(4096)).unwrap();
        Report::new().write(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_load_empty_and_broken_files() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.json");
        fs::write(&empty, "").unwrap();
        let r = Report::load(&empty);
        assert_eq!(r.len(), 1);
        assert_eq!(r.items()[0].severity, Severity::Critical);
        assert!(r.items()[0].what.starts_with("Empty report file"));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{not json").unwrap();
        let r = Report::load(&broken);
        assert_eq!(r.len(), 1);
        assert!(r.items()[0].what.starts_with("Exception when reading report file"));
        assert!(r.items()[0].e.is_some());

        let missing = Report::load(&dir.path().join("nope.json"));
        assert!(missing.items()[0].e.is_some());
    }

    #[test]
    fn test_load_fills_defaults_for_sparse_items() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sparse.json");
        fs::write(&path, r#"[{"what": "only a message"}]"#).unwrap();
        let r = Report::load(&path);
        let it = &r.items()[0];
        assert_eq!(it.severity, Severity::Critical);
        assert_eq!(it.function, "Unknown function");
        assert!(it.howto.is_none());
    }

    #[test]
    fn test_summary_line_counts() {
        assert_eq!(
            sample().summary_line(),
            "Total of 5 messages: 2 critical errors, 1 warnings, 1 notes and 1 others."
        );
    }
}
