//! Conformance harness for HTML tokenizers.
//!
//! Runs html5lib-style tokenizer fixture files against an implementation
//! supplied by the caller. Every test case is executed twice per declared
//! initial state: once with the whole input delivered in one call, once one
//! character at a time. The resulting token streams are compared against the
//! normalized expected output and every divergence ends up in a diagnostic
//! report.
//!
//! The tokenizer under test is an external collaborator: implement
//! [`harness::Tokenizer`] (and hand the harness a way to build fresh
//! instances) and the harness takes care of the rest.

// Fixture model and token encoding
pub mod escape;
pub mod fixture;
pub mod token;

// Execution and reporting
pub mod harness;
pub mod report;

// Misc
pub mod cli;
pub mod types;
