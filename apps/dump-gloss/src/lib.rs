//! dump-gloss core library.
//!
//! Extracts the gloss tier of one tiered-annotation XML transcription,
//! writes the glosses as a space-joined text file and records what happened
//! in a JSON report that corpus tooling merges into its own.
//!
//! High-level modules:
//! - `cli`: Positional argument contract and usage text.
//! - `runner`: Run lifecycle; owns the report and flushes it once.
//! - `extract`: The gloss extraction job.
//! - `config`: Fixed job presets (ELAN, EXMARaLDA).
//! - `query`: XPath subset evaluated over a streamed document.
//! - `models`: Severity, report items and the report buffer.
//! - `output`: Human-readable report rendering on stderr.
//! - `utils`: Log prefixes and source positions.
//! - `error`: Error type shared across modules.
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod output;
pub mod query;
pub mod runner;
pub mod utils;
