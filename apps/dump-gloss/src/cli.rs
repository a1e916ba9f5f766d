//! Positional CLI contract via `clap`.
//!
//! `<program> <corpus-data> <input-file> <output-file> <report-file>`
//!
//! Exactly four values after the program name. A `help` or `--help` token
//! anywhere or a wrong count yields a [`UsageError`]; the binary prints
//! [`usage`] on stdout and exits with -1. Every other token is a value, even
//! when it starts with a dash.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "dump-gloss", disable_help_flag = true, disable_version_flag = true)]
/// One job invocation, stored verbatim. Paths are neither normalized nor
/// checked for existence and keep non-UTF-8 bytes.
pub struct Invocation {
    #[arg(skip)]
    pub command: String,
    /// Declared format of the input file, e.g. `ELANData`.
    pub corpus_data: String,
    pub input: PathBuf,
    /// Accepted for contract compatibility; the gloss job derives its own
    /// output path.
    pub output: PathBuf,
    pub report: PathBuf,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("usage: {command} corpus-data input-file output-file report-file")]
pub struct UsageError {
    pub command: String,
}

impl UsageError {
    pub fn usage(&self) -> String {
        usage(&self.command)
    }
}

/// Two-part usage text: synopsis plus one line per expected value.
pub fn usage(command: &str) -> String {
    format!(
        "{} corpus-data input-file output-file report-file:\n\
         \tcorpus-data: Format of the input-file\n\
         \tinput-file: Input file\n\
         \toutput-file: Output file\n\
         \treport-file: Report file",
        command
    )
}

impl Invocation {
    /// Build an invocation from the full argument vector, program name first.
    pub fn from_args<I, T>(args: I) -> Result<Invocation, UsageError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let command = args
            .first()
            .map(|a| a.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dump-gloss".to_string());
        let usage_err = || UsageError {
            command: command.clone(),
        };
        if args.len() != 5 || args.iter().any(|a| a == "help" || a == "--help") {
            return Err(usage_err());
        }
        // Everything after `--` is positional, so `-h`, `-x.eaf` or a literal
        // `--` reach their slots untouched.
        args.insert(1, OsString::from("--"));
        let mut inv = Invocation::try_parse_from(&args).map_err(|_| usage_err())?;
        inv.command = command;
        Ok(inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_tokens_are_stored_verbatim() {
        let inv = Invocation::from_args([
            "bin/dump-gloss",
            "ELANData",
            "../corpus/doc1.eaf",
            "null",
            "/tmp/r.json",
        ])
        .unwrap();
        assert_eq!(inv.command, "bin/dump-gloss");
        assert_eq!(inv.corpus_data, "ELANData");
        assert_eq!(inv.input, PathBuf::from("../corpus/doc1.eaf"));
        assert_eq!(inv.output, PathBuf::from("null"));
        assert_eq!(inv.report, PathBuf::from("/tmp/r.json"));
    }

    #[test]
    fn test_wrong_count_is_usage_error() {
        let err = Invocation::from_args(["dump-gloss", "ELANData"]).unwrap_err();
        assert_eq!(err.command, "dump-gloss");
        assert!(Invocation::from_args(Vec::<String>::new()).is_err());
        assert!(Invocation::from_args(["p", "a", "b", "c", "d", "e"]).is_err());
    }

    #[test]
    fn test_help_tokens_anywhere_are_usage_errors() {
        for args in [
            ["p", "help", "b", "c", "d"],
            ["p", "a", "b", "c", "--help"],
        ] {
            assert!(Invocation::from_args(args).is_err(), "{:?}", args);
        }
    }

    #[test]
    fn test_dash_leading_values_are_positional() {
        let inv = Invocation::from_args(["p", "-h", "-doc.eaf", "--", "-V"]).unwrap();
        assert_eq!(inv.corpus_data, "-h");
        assert_eq!(inv.input, PathBuf::from("-doc.eaf"));
        assert_eq!(inv.output, PathBuf::from("--"));
        assert_eq!(inv.report, PathBuf::from("-V"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_are_kept_byte_for_byte() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = OsStr::from_bytes(b"corpus/d\xf6c.eaf");
        let report = OsStr::from_bytes(b"/tmp/r\xe9port.json");
        let inv = Invocation::from_args([
            OsStr::new("dump-gloss"),
            OsStr::new("ELANData"),
            input,
            OsStr::new("null"),
            report,
        ])
        .unwrap();
        assert_eq!(inv.input.as_os_str(), input);
        assert_eq!(inv.report.as_os_str(), report);
    }

    #[test]
    fn test_usage_text_names_every_value() {
        let text = usage("prog");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "prog corpus-data input-file output-file report-file:");
        assert_eq!(lines.len(), 5);
        for (line, name) in lines[1..]
            .iter()
            .zip(["corpus-data", "input-file", "output-file", "report-file"])
        {
            assert!(line.starts_with(&format!("\t{}:", name)));
        }
    }
}
