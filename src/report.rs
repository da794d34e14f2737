use std::io::{self, Write};

use crate::harness::{FailureKind, FailureRecord, RunState};

/// Renders the end-of-run report.
///
/// A fully green run is a single summary line. Anything else prints the
/// pass/fail/abort counts followed by every abort record and then every
/// mismatch record. All free-form text (inputs, descriptions, token
/// streams) goes through [`escape_for_terminal`] so fixture control
/// characters cannot mangle a terminal or log collector.
pub fn write_report(out: &mut impl Write, run: &RunState) -> io::Result<()> {
    if run.all_passed() {
        put_line(out, &format!("All {} tests passed.", run.num_tests))?;
        return Ok(());
    }

    put_line(out, &format!("{} passed.", run.num_passed))?;
    put_line(out, &format!("{} failed.", run.num_failed()))?;
    put_line(out, &format!("{} aborted.", run.num_aborted))?;

    // Aborts first, then the mismatches.
    for failure in &run.failures {
        if let FailureKind::Abort { message, chain } = &failure.kind {
            put_preamble(out, failure)?;
            put_line(out, &format!("Aborted with: {message}"))?;
            for cause in chain {
                put_line(out, &format!("  caused by: {cause}"))?;
            }
            put_line(out, "")?;
        }
    }

    for failure in &run.failures {
        if let FailureKind::Mismatch { output, expected } = &failure.kind {
            put_preamble(out, failure)?;
            put_line(out, "Got:")?;
            put_line(out, output)?;
            put_line(out, "Expected:")?;
            put_line(out, expected)?;
            put_line(out, "")?;
        }
    }

    Ok(())
}

fn put_preamble(out: &mut impl Write, failure: &FailureRecord) -> io::Result<()> {
    put_line(out, "----------")?;
    put_line(
        out,
        &format!(
            "{} test #{}: {}",
            failure.filename, failure.testnum, failure.description
        ),
    )?;
    put_line(out, &format!("Input: {}", failure.input))?;
    put_line(out, &format!("Initial state: {}", failure.state))?;
    if failure.char_by_char {
        put_line(out, "One character at a time")?;
    }
    Ok(())
}

fn put_line(out: &mut impl Write, line: &str) -> io::Result<()> {
    writeln!(out, "{}", escape_for_terminal(line))
}

/// Escapes a string for terminal-safe display. Printable ASCII and newlines
/// pass through unchanged; every other character becomes a fixed-width hex
/// escape: two digits for codepoints below 0x100, at least four otherwise.
pub fn escape_for_terminal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        let codepoint = c as u32;
        if (0x20..0x7f).contains(&codepoint) || c == '\n' {
            escaped.push(c);
        } else if codepoint < 0x100 {
            escaped.push_str(&format!("\\x{codepoint:02x}"));
        } else {
            escaped.push_str(&format!("\\u{codepoint:04x}"));
        }
    }
    escaped
}
