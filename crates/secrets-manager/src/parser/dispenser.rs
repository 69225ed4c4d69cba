//! Cursor over block-grammar tokens.

use crate::error::{ParseError, Position};
use crate::parser::lexer::{tokenize, Token};

/// Hands out tokens one at a time and tracks block nesting.
///
/// The cursor starts before the first token; [`Dispenser::next_token`] must be
/// called before [`Dispenser::val`] returns anything.
#[derive(Debug, Clone)]
pub struct Dispenser {
    filename: String,
    tokens: Vec<Token>,
    cursor: Option<usize>,
    nesting: usize,
}

impl Dispenser {
    /// Tokenizes `input` and returns a dispenser over it.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the input cannot be tokenized.
    pub fn new(filename: impl Into<String>, input: &str) -> Result<Self, ParseError> {
        let filename = filename.into();
        let tokens = tokenize(&filename, input)?;
        Ok(Self::from_tokens(filename, tokens))
    }

    /// Creates a dispenser over already lexed tokens.
    #[must_use]
    pub fn from_tokens(filename: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            filename: filename.into(),
            tokens,
            cursor: None,
            nesting: 0,
        }
    }

    /// Name of the source being dispensed.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    fn current(&self) -> Option<&Token> {
        self.cursor.and_then(|i| self.tokens.get(i))
    }

    fn peek(&self) -> Option<&Token> {
        let next = self.cursor.map_or(0, |i| i + 1);
        self.tokens.get(next)
    }

    fn back(&mut self) {
        self.cursor = match self.cursor {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Advances to the next token. Returns false at end of input.
    pub fn next_token(&mut self) -> bool {
        if self.peek().is_some() {
            self.cursor = Some(self.cursor.map_or(0, |i| i + 1));
            true
        } else {
            false
        }
    }

    /// Text of the current token, or an empty string before the first one.
    #[must_use]
    pub fn val(&self) -> &str {
        self.current().map_or("", |t| t.text.as_str())
    }

    /// Line of the current token, or 0 before the first one.
    #[must_use]
    pub fn line(&self) -> usize {
        self.current().map_or(0, |t| t.line)
    }

    /// Position of the current token.
    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.filename.clone(), self.line())
    }

    /// Position of the token after the current one.
    #[must_use]
    pub fn next_position(&self) -> Position {
        Position::new(self.filename.clone(), self.peek().map_or(0, |t| t.line))
    }

    /// Returns true once every token has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.peek().is_none()
    }

    /// Advances if the next token sits on the same line as the current one.
    fn next_on_same_line(&mut self) -> bool {
        let Some(current) = self.current() else {
            return self.next_token();
        };
        let end_line = current.end_line;
        match self.peek() {
            Some(next) if next.line == end_line => self.next_token(),
            _ => false,
        }
    }

    /// Advances to the next argument on the current line.
    ///
    /// Stops without consuming at a block brace.
    pub fn next_arg(&mut self) -> bool {
        if !self.next_on_same_line() {
            return false;
        }
        if self.current().is_some_and(|t| t.is_block_open() || t.is_block_close()) {
            self.back();
            return false;
        }
        true
    }

    /// Collects every remaining argument on the current line.
    pub fn remaining_args(&mut self) -> Vec<String> {
        let mut args = Vec::new();
        while self.next_arg() {
            args.push(self.val().to_string());
        }
        args
    }

    /// Steps through the lines of a block.
    ///
    /// On the first call the next token must be a `{` on the current line;
    /// otherwise nothing is consumed and false is returned. Subsequent calls
    /// move to the next line inside the block and return false once the
    /// matching `}` is reached. `initial_nesting` is the nesting level of
    /// the directive that owns the block.
    pub fn next_block(&mut self, initial_nesting: usize) -> bool {
        if self.nesting > initial_nesting {
            if !self.next_token() {
                return false;
            }
            if self.current().is_some_and(Token::is_block_close) {
                self.nesting -= 1;
            } else if self.current().is_some_and(Token::is_block_open) {
                self.nesting += 1;
            }
            return self.nesting > initial_nesting;
        }

        if !self.next_on_same_line() {
            return false;
        }
        if !self.current().is_some_and(Token::is_block_open) {
            self.back();
            return false;
        }
        if !self.next_token() || self.current().is_some_and(Token::is_block_close) {
            return false;
        }
        self.nesting += 1;
        true
    }

    /// Current block nesting level.
    #[must_use]
    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// Returns true if the tokens after the cursor close every block that is
    /// currently open.
    #[must_use]
    pub fn closes_all_blocks(&self) -> bool {
        let start = self.cursor.map_or(0, |i| i + 1);
        let depth = self.tokens.iter().skip(start).fold(self.nesting, |depth, t| {
            if t.is_block_open() {
                depth + 1
            } else if t.is_block_close() {
                depth.saturating_sub(1)
            } else {
                depth
            }
        });
        depth == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispenser(input: &str) -> Dispenser {
        Dispenser::new("Testfile", input).expect("should tokenize")
    }

    #[test]
    fn val_is_empty_before_first_token() {
        let mut d = dispenser("a b");
        assert_eq!(d.val(), "");
        assert_eq!(d.line(), 0);
        assert!(d.next_token());
        assert_eq!(d.val(), "a");
        assert!(d.next_token());
        assert!(!d.next_token());
        assert!(d.is_exhausted());
    }

    #[test]
    fn remaining_args_stop_at_line_end() {
        let mut d = dispenser("region us-east-1 foo\npath x");
        assert!(d.next_token());
        assert_eq!(d.remaining_args(), ["us-east-1", "foo"]);
        assert!(d.next_token());
        assert_eq!(d.val(), "path");
    }

    #[test]
    fn remaining_args_stop_at_brace() {
        let mut d = dispenser("id arg {\n}");
        assert!(d.next_token());
        assert_eq!(d.remaining_args(), ["arg"]);
        assert!(!d.next_block(0));
        assert_eq!(d.val(), "}");
    }

    #[test]
    fn next_block_walks_lines() {
        let mut d = dispenser("secret {\n  region us-east-1\n  path a/b\n}\n");
        assert!(d.next_token());
        let mut keys = Vec::new();
        while d.next_block(0) {
            keys.push(d.val().to_string());
            d.remaining_args();
        }
        assert_eq!(keys, ["region", "path"]);
        assert_eq!(d.val(), "}");
        assert_eq!(d.line(), 4);
        assert_eq!(d.nesting(), 0);
    }

    #[test]
    fn next_block_requires_brace_on_same_line() {
        let mut d = dispenser("{\n  region us-east-1\n}");
        assert!(d.next_token());
        assert!(!d.next_block(0));
        assert_eq!(d.val(), "{");
        assert_eq!(d.line(), 1);
    }

    #[test]
    fn next_block_without_block_leaves_cursor() {
        let mut d = dispenser("secret\nother");
        assert!(d.next_token());
        assert!(!d.next_block(0));
        assert_eq!(d.val(), "secret");
    }

    #[test]
    fn empty_block_is_closed_immediately() {
        let mut d = dispenser("secret { }");
        assert!(d.next_token());
        assert!(!d.next_block(0));
        assert_eq!(d.val(), "}");
        assert_eq!(d.nesting(), 0);
    }

    #[test]
    fn nested_blocks_are_tracked() {
        let mut d = dispenser("a {\n b {\n c\n }\n d\n}");
        assert!(d.next_token());
        let mut seen = Vec::new();
        while d.next_block(0) {
            seen.push(d.val().to_string());
        }
        assert_eq!(seen, ["b", "{", "c", "}", "d"]);
    }

    #[test]
    fn closes_all_blocks_sees_missing_brace() {
        let mut d = dispenser("a {\n path p\n\nb {\n path q\n}\n");
        assert!(d.next_token());
        assert!(d.next_block(0));
        assert!(!d.closes_all_blocks());

        let mut d = dispenser("a {\n b {\n }\n}");
        assert!(d.next_token());
        assert!(d.next_block(0));
        assert!(d.closes_all_blocks());
    }

    #[test]
    fn unclosed_block_ends_with_nesting_left() {
        let mut d = dispenser("a {\n path p\n");
        assert!(d.next_token());
        while d.next_block(0) {
            d.remaining_args();
        }
        assert_eq!(d.nesting(), 1);
    }
}
