//! Gloss extraction job.
//!
//! Reads one tiered-annotation document, selects the annotation values of
//! the configured tier and writes them space-joined to
//! `<output_dir>/<input stem>_<tier>.txt`. Every step leaves a note in the
//! report; an unexpected data-format tag leaves a single critical item and
//! touches no files.

use crate::cli::Invocation;
use crate::config::GlossConfig;
use crate::error::{GlossError, Result};
use crate::models::{Report, ReportItem};
use crate::query::Query;
use crate::utils::line_col;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The invocation's data-format tag did not match; nothing was read.
    Unsupported,
    Extracted { output: PathBuf, glosses: usize },
}

#[derive(Debug, Clone, Default)]
pub struct GlossJob {
    config: GlossConfig,
}

impl GlossJob {
    pub fn new(config: GlossConfig) -> Self {
        GlossJob { config }
    }

    pub fn config(&self) -> &GlossConfig {
        &self.config
    }

    /// Run the extraction once for `inv`, appending items to `report`.
    ///
    /// Does not write the report; that is the runner's job.
    pub fn work(&self, inv: &Invocation, report: &mut Report) -> Result<Outcome> {
        let cfg = &self.config;
        if inv.corpus_data != cfg.expected_data {
            report.push(
                ReportItem::critical(format!("Unsupported data type {}", inv.corpus_data))
                    .with_function(&cfg.function),
            );
            return Ok(Outcome::Unsupported);
        }

        let input = inv.input.to_string_lossy().to_string();
        report.push(
            ReportItem::note(format!("Reading {}", input))
                .with_filename(&input)
                .with_function(&cfg.function),
        );
        let src = fs::read_to_string(&inv.input).map_err(|e| GlossError::io(&inv.input, e))?;

        // Parsing and querying share one pass over the document, so the xpath
        // note is only recorded once the document proved well-formed.
        let xpath = cfg.xpath();
        let query = Query::parse(&xpath)?;
        let glosses = query.select_text(&src).map_err(|fault| {
            let (line, column) = line_col(&src, fault.offset);
            GlossError::Xml {
                path: inv.input.clone(),
                line,
                column,
                message: fault.message,
            }
        })?;
        report.push(ReportItem::note(format!("Running xpath {}", xpath)).with_function(&cfg.function));

        let output = cfg.output_path_for(&inv.input);
        report.push(
            ReportItem::note(format!("Writing result {:?}", glosses))
                .with_filename(output.to_string_lossy())
                .with_function(&cfg.function),
        );
        fs::create_dir_all(&cfg.output_dir).map_err(|e| GlossError::io(&cfg.output_dir, e))?;
        fs::write(&output, glosses.join(" ")).map_err(|e| GlossError::io(&output, e))?;

        Ok(Outcome::Extracted {
            output,
            glosses: glosses.len(),
        })
    }
}
