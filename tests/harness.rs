//! End-to-end runs over the fixture files in `tests/data`, with a scripted
//! collaborator standing in for a real tokenizer so the harness itself is
//! what gets exercised.

use std::path::PathBuf;

use test_case::test_case;

use html5_tokenizer_harness::cli::run_files;
use html5_tokenizer_harness::fixture::{self, Root};
use html5_tokenizer_harness::harness::{run_suite, FailureKind, Tokenizer};
use html5_tokenizer_harness::token::{Attribute, Token};

/// Replays the known-good token stream for every input in `tests/data`,
/// regardless of feeding mode.
struct Scripted;

impl Tokenizer for Scripted {
    fn tokenize(
        &mut self,
        input: &str,
        _initial_state: &str,
        _last_start_tag: Option<&str>,
        _char_by_char: bool,
    ) -> anyhow::Result<Vec<Token>> {
        match input {
            "&amp;" => Ok(vec![Token::Character("&".into())]),
            "<a href=\"&amp;\">" => Ok(vec![Token::StartTag {
                name: "a".into(),
                attributes: vec![Attribute {
                    name: "href".into(),
                    value: "&".into(),
                }],
                self_closing: false,
            }]),
            "a<b>c" => Ok(vec![
                Token::Character("a".into()),
                Token::StartTag {
                    name: "b".into(),
                    attributes: vec![],
                    self_closing: false,
                },
                Token::Character("c".into()),
            ]),
            "</textarea>" => Ok(vec![Token::EndTag("textarea".into())]),
            "<!DOCTYPE html><!--x-->" => Ok(vec![
                Token::Doctype {
                    name: Some("html".into()),
                    public_id: None,
                    system_id: None,
                    force_quirks: false,
                },
                Token::Comment("x".into()),
            ]),
            other => anyhow::bail!("no scripted stream for {other:?}"),
        }
    }
}

/// Leaves every entity unexpanded, which must show up as a mismatch.
struct Unexpanding;

impl Tokenizer for Unexpanding {
    fn tokenize(
        &mut self,
        input: &str,
        _initial_state: &str,
        _last_start_tag: Option<&str>,
        _char_by_char: bool,
    ) -> anyhow::Result<Vec<Token>> {
        Ok(vec![Token::Character(input.to_string())])
    }
}

fn data_path(filename: &str) -> PathBuf {
    PathBuf::from("./tests/data").join(filename)
}

fn load(filename: &str) -> Root {
    fixture::from_path(&data_path(filename)).unwrap()
}

#[test_case("entities.test", 4)]
#[test_case("errors.test", 6)]
fn scripted_fixtures_pass(filename: &str, units: usize) {
    let run = run_suite(&|| Scripted, filename, &load(filename));
    assert_eq!(run.num_tests, units);
    assert!(run.all_passed(), "unexpected failures: {:?}", run.failures);
}

#[test]
fn unexpanded_entity_fails_in_both_modes() {
    let run = run_suite(&|| Unexpanding, "entities.test", &load("entities.test"));

    assert_eq!(run.num_tests, 4);
    assert_eq!(run.num_passed, 0);
    assert_eq!(run.num_failed(), 4);
    assert_eq!(run.num_aborted, 0);

    let modes: Vec<bool> = run.failures.iter().map(|f| f.char_by_char).collect();
    assert_eq!(modes, vec![false, true, false, true]);

    match &run.failures[0].kind {
        FailureKind::Mismatch { output, expected } => {
            assert_eq!(output, r#"[["Character","&amp;"]]"#);
            assert_eq!(expected, r#"[["Character","&"]]"#);
        }
        other => panic!("expected a mismatch, got {other:?}"),
    }
}

#[test]
fn run_files_merges_suites_and_reports() {
    let files = vec![data_path("entities.test"), data_path("errors.test")];
    let mut out = Vec::new();
    let run = run_files(&|| Scripted, &files, &mut out).unwrap();

    assert_eq!(run.num_tests, 10);
    assert!(run.all_passed());

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("entities.test\n\n"));
    assert!(printed.contains("errors.test\n\n"));
    assert!(printed.ends_with("All 10 tests passed.\n"));
}

#[test]
fn run_files_skips_broken_files_but_keeps_going() {
    let files = vec![data_path("no-such.test"), data_path("entities.test")];
    let mut out = Vec::new();
    let run = run_files(&|| Scripted, &files, &mut out).unwrap();

    assert_eq!(run.num_tests, 4);
    assert!(run.all_passed());

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("ERROR: couldn't parse tests from"));
    assert!(printed.ends_with("All 4 tests passed.\n"));
}
