use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::token::Token;
use crate::types::Result;

/// State a test starts from when the fixture does not say otherwise.
pub const DEFAULT_STATE: &str = "PCDATA state";

/// One fixture file: an ordered suite of test cases.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    pub tests: Vec<Test>,
}

/// A single tokenizer test case. Token payloads in `output` are validated
/// while the file is deserialized; a malformed entry fails the whole load.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    #[serde(default)]
    pub description: String,
    pub input: String,
    pub output: Vec<Token>,
    #[serde(default)]
    pub initial_states: Option<Vec<String>>,
    #[serde(default)]
    pub last_start_tag: Option<String>,
    #[serde(default)]
    pub double_escaped: Option<bool>,
}

impl Test {
    /// The lexer states this test runs from. An absent `initialStates`
    /// field defaults to [`DEFAULT_STATE`]; a present-but-empty list yields
    /// no runnable states, which the harness reports as zero test units.
    pub fn states(&self) -> Vec<String> {
        match &self.initial_states {
            None => vec![DEFAULT_STATE.to_string()],
            Some(states) => states.clone(),
        }
    }

    pub fn is_double_escaped(&self) -> bool {
        self.double_escaped.unwrap_or(false)
    }
}

pub fn from_str(contents: &str) -> Result<Root> {
    Ok(serde_json::from_str(contents)?)
}

pub fn from_path<P>(path: &P) -> Result<Root>
where
    P: AsRef<Path>,
{
    let contents = fs::read_to_string(path)?;
    from_str(&contents)
}
