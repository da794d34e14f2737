use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::types::{Error, Result};

/// A single attribute on a start tag. Order is meaningful: the canonical
/// serialization keeps attributes in the order the producer emitted them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A token as encoded by the html5lib tokenizer fixtures.
///
/// The wire form is a tagged array (`["Character", text]`,
/// `["StartTag", name, {attrs}, true?]`, `["EndTag", name]`,
/// `["Comment", text]`, `["DOCTYPE", name, public, system, correctness]`)
/// or the bare string `"ParseError"`. The DOCTYPE `correctness` flag is the
/// inverse of `force_quirks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Character(String),
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Doctype {
        name: Option<String>,
        public_id: Option<String>,
        system_id: Option<String>,
        force_quirks: bool,
    },
    ParseError,
}

impl Token {
    /// Decodes a fixture token entry. Malformed entries are rejected here so
    /// a bad fixture fails at load time instead of deep inside comparison.
    pub fn from_value(value: &Value) -> Result<Token> {
        match value {
            Value::String(s) if s == "ParseError" => Ok(Token::ParseError),
            Value::Array(parts) => Token::from_parts(parts),
            _ => Err(Error::Token(format!(
                "expected a token array or \"ParseError\", got {value}"
            ))),
        }
    }

    fn from_parts(parts: &[Value]) -> Result<Token> {
        let tag = parts
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Token("token array without a kind tag".into()))?;

        match tag {
            "Character" => Ok(Token::Character(required_str(parts, 1, tag)?)),
            "Comment" => Ok(Token::Comment(required_str(parts, 1, tag)?)),
            "EndTag" => Ok(Token::EndTag(required_str(parts, 1, tag)?)),
            "StartTag" => {
                let name = required_str(parts, 1, tag)?;
                let attributes = match parts.get(2) {
                    None => Vec::new(),
                    Some(Value::Object(map)) => attributes_from_map(map, &name)?,
                    Some(other) => {
                        return Err(Error::Token(format!(
                            "StartTag <{name}> attributes must be an object, got {other}"
                        )))
                    }
                };
                let self_closing = match parts.get(3) {
                    None => false,
                    Some(Value::Bool(b)) => *b,
                    Some(other) => {
                        return Err(Error::Token(format!(
                            "StartTag <{name}> self-closing flag must be a bool, got {other}"
                        )))
                    }
                };
                Ok(Token::StartTag {
                    name,
                    attributes,
                    self_closing,
                })
            }
            "DOCTYPE" => {
                let correctness = match parts.get(4) {
                    None => true,
                    Some(Value::Bool(b)) => *b,
                    Some(other) => {
                        return Err(Error::Token(format!(
                            "DOCTYPE correctness flag must be a bool, got {other}"
                        )))
                    }
                };
                Ok(Token::Doctype {
                    name: optional_str(parts, 1, tag)?,
                    public_id: optional_str(parts, 2, tag)?,
                    system_id: optional_str(parts, 3, tag)?,
                    force_quirks: !correctness,
                })
            }
            _ => Err(Error::Token(format!("unknown token kind {tag:?}"))),
        }
    }

    /// Encodes this token back into the fixture array form.
    pub fn to_value(&self) -> Value {
        match self {
            Token::Character(text) => json!(["Character", text]),
            Token::Comment(text) => json!(["Comment", text]),
            Token::EndTag(name) => json!(["EndTag", name]),
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let mut attrs = Map::new();
                for attr in attributes {
                    attrs.insert(attr.name.clone(), Value::String(attr.value.clone()));
                }
                let mut parts = vec![json!("StartTag"), json!(name), Value::Object(attrs)];
                if *self_closing {
                    parts.push(Value::Bool(true));
                }
                Value::Array(parts)
            }
            Token::Doctype {
                name,
                public_id,
                system_id,
                force_quirks,
            } => json!(["DOCTYPE", name, public_id, system_id, !force_quirks]),
            Token::ParseError => json!("ParseError"),
        }
    }
}

fn required_str(parts: &[Value], idx: usize, tag: &str) -> Result<String> {
    parts
        .get(idx)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| Error::Token(format!("{tag} token needs a string at position {idx}")))
}

fn optional_str(parts: &[Value], idx: usize, tag: &str) -> Result<Option<String>> {
    match parts.get(idx) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::Token(format!(
            "{tag} token needs a string or null at position {idx}, got {other}"
        ))),
    }
}

fn attributes_from_map(map: &Map<String, Value>, name: &str) -> Result<Vec<Attribute>> {
    map.iter()
        .map(|(key, value)| match value.as_str() {
            Some(v) => Ok(Attribute {
                name: key.clone(),
                value: v.to_string(),
            }),
            None => Err(Error::Token(format!(
                "attribute {key} on <{name}> must be a string"
            ))),
        })
        .collect()
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Token::from_value(&value).map_err(de::Error::custom)
    }
}

/// Serializes a token stream to its canonical textual encoding. Field order
/// and quoting are stable, so two streams are equal exactly when their
/// encodings are equal, and the encoding doubles as the Got/Expected display
/// in the failure report.
pub fn serialize_stream(tokens: &[Token]) -> String {
    Value::Array(tokens.iter().map(Token::to_value).collect()).to_string()
}

/// Normalizes an expected token stream: drops every `ParseError` marker
/// (the tokenizer under test is not required to track parse errors), then
/// merges each `Character` token into the `Character` directly before it.
///
/// The result carries no `ParseError` and no two adjacent `Character`
/// tokens; relative order of everything else is preserved. Idempotent.
pub fn normalize(tokens: Vec<Token>) -> Vec<Token> {
    let mut normalized: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::ParseError => continue,
            Token::Character(text) => {
                if let Some(Token::Character(run)) = normalized.last_mut() {
                    run.push_str(&text);
                } else {
                    normalized.push(Token::Character(text));
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
