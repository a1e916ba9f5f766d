//! dump-gloss binary entry point.
//!
//! Exit status: 0 on success or unsupported data, 1 when extraction or the
//! report flush fails, -1 on a usage error.

use dump_gloss::config::GlossConfig;
use dump_gloss::extract::{GlossJob, Outcome};
use dump_gloss::runner::Runner;
use dump_gloss::{output, utils};

fn main() {
    let mut runner = match Runner::from_args(std::env::args_os()) {
        Ok(r) => r,
        Err(usage) => {
            println!("{}", usage.usage());
            std::process::exit(-1);
        }
    };
    let job = GlossJob::new(GlossConfig::default());
    let result = runner.run(&job);
    output::print_report(runner.report());
    match result {
        Ok(Outcome::Extracted { output, glosses }) => {
            eprintln!(
                "{} {} glosses written to {}",
                utils::info_prefix(),
                glosses,
                output.to_string_lossy()
            );
        }
        Ok(Outcome::Unsupported) => {
            eprintln!(
                "{} Nothing extracted; data type not handled by this job.",
                utils::note_prefix()
            );
        }
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(1);
        }
    }
}
