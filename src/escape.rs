use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref UNICODE_ESCAPE: Regex = Regex::new(r"\\u([0-9a-fA-F]{4})").unwrap();
}

/// Decodes a double-escaped fixture string by replacing the first `\uXXXX`
/// marker with the literal character it names.
///
/// Only the first occurrence is decoded. That matches the reference harness,
/// which fixtures may depend on, so it is kept as-is rather than generalized
/// to all occurrences.
///
/// Surrogate codepoints cannot live in a Rust `String` and decode to U+FFFD.
pub fn unescape(input: &str) -> String {
    UNICODE_ESCAPE
        .replace(input, |caps: &Captures| {
            let codepoint = u32::from_str_radix(&caps[1], 16).unwrap_or(0xfffd);
            char::from_u32(codepoint).unwrap_or('\u{fffd}').to_string()
        })
        .into_owned()
}
