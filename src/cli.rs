use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;
use simple_logger::SimpleLogger;

use crate::fixture;
use crate::harness::{run_suite, RunState, TokenizerBuilder};
use crate::report::write_report;

/// Runs html5lib tokenizer fixture files against a tokenizer implementation.
#[derive(Debug, Parser)]
#[command(name = "tokenizer-harness")]
pub struct Args {
    /// Fixture files to run, in order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Program entry point for a harness binary. The caller supplies the way to
/// build tokenizer instances; everything else (argument parsing, per-file
/// runs, the report, the exit status) lives here.
///
/// Exit status is zero only when every scored unit passed.
pub fn run<B>(builder: &B) -> ExitCode
where
    B: TokenizerBuilder,
{
    let _ = SimpleLogger::new().init();
    let args = Args::parse();

    let mut out = io::stdout().lock();
    match run_files(builder, &args.files, &mut out) {
        Ok(run) if run.all_passed() => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

/// Processes the given fixture files in order and writes the merged report.
///
/// A file that cannot be read or parsed is reported immediately and
/// contributes zero test units; processing continues with the next file.
pub fn run_files<B>(
    builder: &B,
    files: &[PathBuf],
    out: &mut impl Write,
) -> io::Result<RunState>
where
    B: TokenizerBuilder,
{
    let mut total = RunState::default();

    for path in files {
        let filename = path.display().to_string();
        writeln!(out, "{filename}")?;

        match fixture::from_path(path) {
            Ok(suite) => {
                info!("running {} tests from {filename}", suite.tests.len());
                total.merge(run_suite(builder, &filename, &suite));
            }
            Err(error) => {
                writeln!(out, "ERROR: couldn't parse tests from {filename}: {error}")?;
            }
        }

        // Every file's block ends with a blank line, report or not.
        writeln!(out)?;
    }

    write_report(out, &total)?;
    Ok(total)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::harness::Tokenizer;
    use crate::token::Token;

    struct Empty;

    impl Tokenizer for Empty {
        fn tokenize(
            &mut self,
            _input: &str,
            _initial_state: &str,
            _last_start_tag: Option<&str>,
            _char_by_char: bool,
        ) -> anyhow::Result<Vec<Token>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_unreadable_file_contributes_zero_units() {
        let files = vec![PathBuf::from("./definitely/not/there.test")];
        let mut out = Vec::new();
        let run = run_files(&|| Empty, &files, &mut out).unwrap();

        assert_eq!(run.num_tests, 0);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("ERROR: couldn't parse tests from"));
        assert!(printed.contains("All 0 tests passed."));
    }
}
