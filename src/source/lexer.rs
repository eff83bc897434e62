//! Lexer (tokenizer) for source-spec strings and engineering numbers.

use crate::error::{GateLevelError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in a source spec.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A word token (the source kind)
    Identifier,
    /// A number, possibly with scale suffix or radix prefix
    Number,
    /// Open parenthesis '('
    OpenParen,
    /// Close parenthesis ')'
    CloseParen,
    /// Argument separator ','
    Comma,
    /// End of input
    Eof,
}

/// Lexer for tokenizing a source-spec string.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    column: self.column,
                });
            }
        };

        let column = self.column;
        let single = |kind: TokenKind| Token {
            kind,
            text: ch.to_string(),
            column,
        };

        let token = match ch {
            '(' => {
                self.advance();
                single(TokenKind::OpenParen)
            }
            ')' => {
                self.advance();
                single(TokenKind::CloseParen)
            }
            ',' => {
                self.advance();
                single(TokenKind::Comma)
            }
            '-' | '+' | '.' | '0'..='9' => Token {
                kind: TokenKind::Number,
                text: self.read_number(),
                column,
            },
            _ if ch.is_alphabetic() || ch == '_' => Token {
                kind: TokenKind::Identifier,
                text: self.read_identifier(),
                column,
            },
            _ => {
                return Err(GateLevelError::lexer(
                    column,
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        Ok(token)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.column += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    // Numbers run until a delimiter; `parse_number` decides validity.
    fn read_number(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | ',') {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }
}

/// Parse a number with optional radix prefix, scale suffix and unit text.
///
/// Accepts `2.5`, `-1e-9`, `10k`, `4.7u`, `1meg`, `10ns`, `0x1F`, `0b101`.
/// Returns `None` when the text is not a number.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let (sign, body) = match text.as_bytes().first()? {
        b'-' => (-1.0, &text[1..]),
        b'+' => (1.0, &text[1..]),
        _ => (1.0, text),
    };

    if let Some(radix) = radix_prefix(body) {
        let digits = &body[2..];
        if digits.starts_with(['+', '-']) {
            return None;
        }
        return i64::from_str_radix(digits, radix)
            .ok()
            .map(|v| sign * v as f64);
    }

    let split = mantissa_len(body)?;
    let mantissa: f64 = body[..split].parse().ok()?;
    let multiplier = parse_scale(&body[split..])?;

    Some(sign * mantissa * multiplier)
}

fn radix_prefix(body: &str) -> Option<u32> {
    match body.get(..2)? {
        "0x" | "0X" => Some(16),
        "0b" | "0B" => Some(2),
        "0o" | "0O" => Some(8),
        _ => None,
    }
}

/// Length of the leading `digits[.digits][e[+-]digits]` run, if it has digits.
fn mantissa_len(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut i = 0;
    let mut digits = 0;

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // Only take the exponent if digits follow, so "5e" stays a unit.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'-' || bytes[j] == b'+') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    Some(i)
}

fn parse_scale(suffix: &str) -> Option<f64> {
    if suffix.is_empty() {
        return Some(1.0);
    }
    if let Some(head) = suffix.get(..3) {
        if head.eq_ignore_ascii_case("meg") {
            return unit_text(&suffix[3..]).then_some(1e6);
        }
    }

    let mut chars = suffix.chars();
    let first = chars.next()?;
    let multiplier = match first {
        'f' => 1e-15,
        'p' => 1e-12,
        'n' => 1e-9,
        'u' | 'µ' => 1e-6,
        'm' => 1e-3,
        'k' | 'K' => 1e3,
        'M' => 1e6,
        'g' | 'G' => 1e9,
        't' | 'T' => 1e12,
        // No scale, just a unit such as "V" or "s"
        _ => return unit_text(suffix).then_some(1.0),
    };
    unit_text(chars.as_str()).then_some(multiplier)
}

fn unit_text(rest: &str) -> bool {
    rest.chars().all(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_number_plain() {
        assert_relative_eq!(parse_number("2.5").unwrap(), 2.5);
        assert_relative_eq!(parse_number("-1e-9").unwrap(), -1e-9);
        assert_relative_eq!(parse_number(".5").unwrap(), 0.5);
        assert_relative_eq!(parse_number(" 42 ").unwrap(), 42.0);
    }

    #[test]
    fn test_parse_number_scale_suffix() {
        assert_relative_eq!(parse_number("10k").unwrap(), 10_000.0);
        assert_relative_eq!(parse_number("100n").unwrap(), 100e-9);
        assert_relative_eq!(parse_number("4.7u").unwrap(), 4.7e-6);
        assert_relative_eq!(parse_number("1meg").unwrap(), 1e6);
        assert_relative_eq!(parse_number("3m").unwrap(), 3e-3);
        assert_relative_eq!(parse_number("2f").unwrap(), 2e-15);
    }

    #[test]
    fn test_parse_number_unit_text() {
        assert_relative_eq!(parse_number("10ns").unwrap(), 10e-9);
        assert_relative_eq!(parse_number("5V").unwrap(), 5.0);
        assert_relative_eq!(parse_number("1.5megohm").unwrap(), 1.5e6);
    }

    #[test]
    fn test_parse_number_radix() {
        assert_eq!(parse_number("0x1F"), Some(31.0));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number("-0o17"), Some(-15.0));
    }

    #[test]
    fn test_parse_number_rejects() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1.2.3"), None);
        assert_eq!(parse_number("5k3"), None);
        assert_eq!(parse_number("0xZZ"), None);
        assert_eq!(parse_number("0x-5"), None);
        assert_eq!(parse_number("0x+5"), None);
    }

    #[test]
    fn test_lexer_tokens() {
        let mut lexer = Lexer::new("pulse( 0, 5n )");
        let kinds: Vec<TokenKind> = std::iter::from_fn(|| {
            let tok = lexer.next_token().unwrap();
            (tok.kind != TokenKind::Eof).then_some(tok.kind)
        })
        .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::Number,
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn test_lexer_unexpected_character() {
        let mut lexer = Lexer::new("dc@");
        assert_eq!(lexer.next_token().unwrap().text, "dc");
        assert!(matches!(
            lexer.next_token(),
            Err(GateLevelError::LexerError { column: 3, .. })
        ));
    }
}
