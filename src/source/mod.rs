//! Source-spec mini-grammar and engineering-number parsing.
//!
//! Voltage sources carry their excitation as a short text such as
//! `pulse(0, 5, 1n, 1n, 1n, 5n, 10n)`. This module parses that text into a
//! [`SourceSpec`].
//!
//! # Grammar
//!
//! ```text
//! spec   = identifier "(" number { "," number } ")"
//! number = ['-'|'+'] mantissa [scale] [unit] | radix_int
//! scale  = 'f' | 'p' | 'n' | 'u' | 'm' | 'k' | "meg" | 'M' | 'g' | 't'
//! ```
//!
//! Whitespace is allowed anywhere between tokens. The match is anchored at
//! both ends: text before the kind or after the closing parenthesis is an
//! error.

mod lexer;
mod parser;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use lexer::{parse_number, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::{GateLevelError, Result};

/// Parsed `kind(args...)` description of a time-varying excitation.
///
/// The argument count is not checked here; the engine knows what each kind
/// expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Waveform kind, e.g. `dc`, `pulse`, `pwl`
    #[serde(rename = "type")]
    pub kind: String,
    /// Numeric arguments in declaration order
    pub args: Vec<f64>,
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

impl FromStr for SourceSpec {
    type Err = GateLevelError;

    fn from_str(s: &str) -> Result<Self> {
        parse_source_spec(s)
    }
}

/// Parse a source-spec string into a [`SourceSpec`].
pub fn parse_source_spec(text: &str) -> Result<SourceSpec> {
    Parser::new(text)
        .and_then(|mut parser| parser.parse())
        .map_err(|e| match e {
            GateLevelError::LexerError { column, message } => GateLevelError::source_spec(
                text,
                format!("{} at column {}", message, column),
            ),
            other => other,
        })
}
