//! Line-based driver protocol.
//!
//! One command per line on stdin, one response line per command on stdout.
//! Responses are produced by `Engine`; this module only parses input.

pub mod parser;

pub use parser::{parse_command, Command};
