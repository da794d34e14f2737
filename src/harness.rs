use log::warn;

use crate::escape::unescape;
use crate::fixture::{Root, Test};
use crate::token::{normalize, serialize_stream, Token};

/// Contract for the tokenizer under test.
///
/// Given an input string, the lexer state to start from, optionally the name
/// of the last open start tag, and the feeding mode, the tokenizer returns
/// the ordered token stream it produced, or an error when it could not
/// complete. With `char_by_char` set the implementation must feed itself the
/// input one character per call; a correct tokenizer produces the same
/// stream either way, which is why both modes are scored separately.
pub trait Tokenizer {
    fn tokenize(
        &mut self,
        input: &str,
        initial_state: &str,
        last_start_tag: Option<&str>,
        char_by_char: bool,
    ) -> anyhow::Result<Vec<Token>>;
}

/// Builds a brand-new tokenizer instance for every invocation. Reusing an
/// instance would leak lexer state between unrelated tests and invalidate
/// the initial-state contract, so the harness never does.
pub trait TokenizerBuilder {
    type Tokenizer: Tokenizer;

    fn build(&self) -> Self::Tokenizer;
}

impl<F, T> TokenizerBuilder for F
where
    F: Fn() -> T,
    T: Tokenizer,
{
    type Tokenizer = T;

    fn build(&self) -> T {
        self()
    }
}

/// How a single test unit diverged.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    /// The tokenizer returned a stream, but not the expected one. Both
    /// sides are kept in serialized form for the report.
    Mismatch { output: String, expected: String },
    /// The invocation returned an error instead of a token stream.
    /// `message` is the outermost error and `chain` up to four underlying
    /// causes. Rust errors carry no exception name or source location, so
    /// the cause chain is the whole diagnostic.
    Abort { message: String, chain: Vec<String> },
}

/// One non-pass outcome, with everything the report needs to show it.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub filename: String,
    pub testnum: usize,
    pub description: String,
    pub state: String,
    pub char_by_char: bool,
    pub input: String,
    pub kind: FailureKind,
}

/// Accumulated outcome of a run. Failed count is derived, never stored:
/// `num_tests - num_passed - num_aborted`.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RunState {
    pub num_tests: usize,
    pub num_passed: usize,
    pub num_aborted: usize,
    pub failures: Vec<FailureRecord>,
}

impl RunState {
    pub fn num_failed(&self) -> usize {
        self.num_tests - self.num_passed - self.num_aborted
    }

    pub fn all_passed(&self) -> bool {
        self.num_passed == self.num_tests
    }

    /// Folds the outcome of one fixture file into the run total.
    pub fn merge(&mut self, other: RunState) {
        self.num_tests += other.num_tests;
        self.num_passed += other.num_passed;
        self.num_aborted += other.num_aborted;
        self.failures.extend(other.failures);
    }
}

/// Runs every test in a fixture suite and returns the collected outcome.
pub fn run_suite<B>(builder: &B, filename: &str, suite: &Root) -> RunState
where
    B: TokenizerBuilder,
{
    let mut run = RunState::default();
    for (testnum, test) in suite.tests.iter().enumerate() {
        run_test(builder, filename, testnum, test, &mut run);
    }
    run
}

/// Runs one test case: for each declared initial state the tokenizer is
/// invoked twice, once with the whole input and once character by character.
/// Every (state, mode) pair is an independently scored unit.
fn run_test<B>(builder: &B, filename: &str, testnum: usize, test: &Test, run: &mut RunState)
where
    B: TokenizerBuilder,
{
    let states = test.states();
    if states.is_empty() {
        warn!("{filename} test #{testnum}: empty initialStates, no units to run");
        return;
    }

    let input = if test.is_double_escaped() {
        unescape(&test.input)
    } else {
        test.input.clone()
    };

    // The expected stream is normalized and serialized once per test case.
    // For double-escaped fixtures the codec applies to the serialized form,
    // just like it applies to the raw input.
    let mut expected = serialize_stream(&normalize(test.output.clone()));
    if test.is_double_escaped() {
        expected = unescape(&expected);
    }

    for state in &states {
        for char_by_char in [false, true] {
            run.num_tests += 1;

            let mut tokenizer = builder.build();
            let outcome = tokenizer.tokenize(
                &input,
                state,
                test.last_start_tag.as_deref(),
                char_by_char,
            );

            let record = |kind| FailureRecord {
                filename: filename.to_string(),
                testnum,
                description: test.description.clone(),
                state: state.clone(),
                char_by_char,
                input: input.clone(),
                kind,
            };

            match outcome {
                Ok(tokens) => {
                    let output = serialize_stream(&tokens);
                    if output == expected {
                        run.num_passed += 1;
                    } else {
                        run.failures.push(record(FailureKind::Mismatch {
                            output,
                            expected: expected.clone(),
                        }));
                    }
                }
                Err(error) => {
                    run.num_aborted += 1;
                    let chain = error
                        .chain()
                        .skip(1)
                        .take(4)
                        .map(|cause| cause.to_string())
                        .collect();
                    run.failures.push(record(FailureKind::Abort {
                        message: error.to_string(),
                        chain,
                    }));
                }
            }
        }
    }
}
