//! Run lifecycle: one invocation, one report, one flush.
//!
//! `run` calls the job's work method once and then writes the report once,
//! whether the work succeeded or not. A failed run gets a closing critical
//! item carrying the error text before the flush.

use crate::cli::{Invocation, UsageError};
use crate::error::{GlossError, Result};
use crate::extract::{GlossJob, Outcome};
use crate::models::{Report, ReportItem};
use crate::utils;
use std::ffi::OsString;

pub struct Runner {
    invocation: Invocation,
    report: Report,
}

impl Runner {
    pub fn new(invocation: Invocation) -> Self {
        Runner {
            invocation,
            report: Report::new(),
        }
    }

    /// Construct from the raw argument vector, program name first.
    pub fn from_args<I, T>(args: I) -> std::result::Result<Self, UsageError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Invocation::from_args(args).map(Runner::new)
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn run(&mut self, job: &GlossJob) -> Result<Outcome> {
        eprintln!(
            "{} Run {} on {}",
            utils::info_prefix(),
            self.invocation.corpus_data,
            self.invocation.input.to_string_lossy()
        );
        let result = job.work(&self.invocation, &mut self.report);
        if let Err(e) = &result {
            self.report.push(failure_item(&self.invocation, job, e));
        }
        let flushed = self.write_report();
        match (result, flushed) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(w)) => Err(w),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(w)) => {
                eprintln!("{} could not write report: {}", utils::error_prefix(), w);
                Err(e)
            }
        }
    }

    /// Serialize the report to the invocation's report path.
    pub fn write_report(&self) -> Result<()> {
        eprintln!(
            "{} Writing report {}",
            utils::info_prefix(),
            self.invocation.report.to_string_lossy()
        );
        self.report.write(&self.invocation.report)
    }
}

fn failure_item(inv: &Invocation, job: &GlossJob, e: &GlossError) -> ReportItem {
    let filename = e
        .path()
        .unwrap_or(&inv.input)
        .to_string_lossy()
        .to_string();
    let mut item = ReportItem::critical(format!(
        "Gloss extraction failed for {}",
        inv.input.to_string_lossy()
    ))
    .with_error(e)
    .with_filename(filename)
    .with_function(&job.config().function);
    if let Some((line, column)) = e.position() {
        item = item.with_position(line, column);
    }
    item
}
