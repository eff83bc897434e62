//! Parser for the source-spec grammar.

use super::lexer::{parse_number, Lexer, Token, TokenKind};
use super::SourceSpec;
use crate::error::{GateLevelError, Result};

/// Parser for `kind(arg, ...)` source specs.
pub struct Parser<'a> {
    text: &'a str,
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser over the given source-spec text.
    pub fn new(text: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(text);
        let current = lexer.next_token()?;
        Ok(Self {
            text,
            lexer,
            current,
        })
    }

    /// Parse the whole input. Anything before the kind or after the closing
    /// parenthesis is rejected.
    pub fn parse(&mut self) -> Result<SourceSpec> {
        let kind = self.expect(TokenKind::Identifier)?.text;
        self.expect(TokenKind::OpenParen)?;

        let mut args = vec![self.parse_arg()?];
        while self.current.kind == TokenKind::Comma {
            self.advance()?;
            args.push(self.parse_arg()?);
        }

        self.expect(TokenKind::CloseParen)?;
        self.expect(TokenKind::Eof)?;

        Ok(SourceSpec { kind, args })
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(self.error(format!(
                "expected {:?} at column {}, got {:?}",
                kind, self.current.column, self.current.kind
            )))
        }
    }

    fn parse_arg(&mut self) -> Result<f64> {
        let tok = self.expect(TokenKind::Number)?;
        parse_number(&tok.text)
            .ok_or_else(|| self.error(format!("invalid number '{}'", tok.text)))
    }

    fn error(&self, message: String) -> GateLevelError {
        GateLevelError::source_spec(self.text, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<SourceSpec> {
        Parser::new(text)?.parse()
    }

    #[test]
    fn test_parse_pulse() {
        let spec = parse("pulse(0,5,1e-9,1e-9,1e-9,5e-9,1e-8)").unwrap();
        assert_eq!(spec.kind, "pulse");
        assert_eq!(spec.args, vec![0.0, 5.0, 1e-9, 1e-9, 1e-9, 5e-9, 1e-8]);
    }

    #[test]
    fn test_parse_whitespace_and_suffixes() {
        let spec = parse("  dc ( 3.3 )  ").unwrap();
        assert_eq!(spec.kind, "dc");
        assert_eq!(spec.args, vec![3.3]);

        let spec = parse("pwl(0, 0, 10n, 5)").unwrap();
        assert_eq!(spec.args.len(), 4);
        assert!((spec.args[2] - 10e-9).abs() < 1e-20);
    }

    #[test]
    fn test_rejects_leading_garbage() {
        assert!(matches!(
            parse("5 dc(1)"),
            Err(GateLevelError::SourceSpec { .. })
        ));
        assert!(parse("x = dc(1)").is_err());
    }

    #[test]
    fn test_rejects_trailing_garbage() {
        assert!(parse("dc(1) extra").is_err());
        assert!(parse("dc(1))").is_err());
    }

    #[test]
    fn test_rejects_malformed_args() {
        assert!(parse("dc()").is_err());
        assert!(parse("dc(1,)").is_err());
        assert!(parse("dc(one)").is_err());
        assert!(parse("dc(1").is_err());
        assert!(parse("3.3").is_err());
        assert!(parse("").is_err());
    }
}
