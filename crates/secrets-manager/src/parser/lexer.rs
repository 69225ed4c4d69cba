//! Tokenizer for the block configuration grammar.

use crate::error::{ParseError, Position};

/// A single token of block-grammar input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text with quotes removed.
    pub text: String,
    /// Line the token starts on (1-based).
    pub line: usize,
    /// Line the token ends on; differs from `line` only for quoted tokens
    /// spanning several lines.
    pub end_line: usize,
    /// Whether the token was quoted in the source.
    pub quoted: bool,
}

impl Token {
    /// Returns true if this is an unquoted `{`.
    #[must_use]
    pub fn is_block_open(&self) -> bool {
        !self.quoted && self.text == "{"
    }

    /// Returns true if this is an unquoted `}`.
    #[must_use]
    pub fn is_block_close(&self) -> bool {
        !self.quoted && self.text == "}"
    }
}

/// Splits `input` into tokens.
///
/// Tokens are separated by whitespace. `#` at the start of a token begins a
/// comment running to the end of the line. Double-quoted tokens may contain
/// whitespace and `\"`; backtick-quoted tokens are taken verbatim.
///
/// # Errors
///
/// Returns [`ParseError::UnterminatedQuote`] if a quote is never closed.
pub fn tokenize(filename: &str, input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut line = 1;
    let mut start_line = 1;
    let mut quote: Option<char> = None;
    let mut quoted = false;
    let mut escaped = false;
    let mut comment = false;

    for ch in input.chars() {
        if comment {
            if ch == '\n' {
                comment = false;
                line += 1;
            }
            continue;
        }

        if let Some(q) = quote {
            if escaped {
                if ch != q {
                    buf.push('\\');
                }
                buf.push(ch);
                escaped = false;
                continue;
            }
            if ch == '\\' && q == '"' {
                escaped = true;
                continue;
            }
            if ch == q {
                quote = None;
                continue;
            }
            if ch == '\n' {
                line += 1;
            }
            buf.push(ch);
            continue;
        }

        if ch.is_whitespace() {
            if !buf.is_empty() || quoted {
                tokens.push(Token {
                    text: std::mem::take(&mut buf),
                    line: start_line,
                    end_line: line,
                    quoted,
                });
                quoted = false;
            }
            if ch == '\n' {
                line += 1;
            }
            continue;
        }

        if buf.is_empty() && !quoted {
            match ch {
                '#' => {
                    comment = true;
                    continue;
                }
                '"' | '`' => {
                    quote = Some(ch);
                    quoted = true;
                    start_line = line;
                    continue;
                }
                _ => start_line = line,
            }
        }

        buf.push(ch);
    }

    if quote.is_some() {
        return Err(ParseError::UnterminatedQuote {
            position: Position::new(filename, start_line),
        });
    }

    if !buf.is_empty() || quoted {
        tokens.push(Token {
            text: buf,
            line: start_line,
            end_line: line,
            quoted,
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_on_whitespace_and_tracks_lines() {
        let tokens = tokenize("Testfile", "\naccess_token {\n\tregion us-east-1\n}\n")
            .expect("should tokenize");
        assert_eq!(texts(&tokens), ["access_token", "{", "region", "us-east-1", "}"]);
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, [2, 2, 3, 3, 4]);
    }

    #[test]
    fn comments_are_skipped() {
        let tokens = tokenize("Testfile", "# header\nfoo # trailing\nbar#baz\n")
            .expect("should tokenize");
        assert_eq!(texts(&tokens), ["foo", "bar#baz"]);
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn double_quotes_keep_whitespace_and_escapes() {
        let tokens = tokenize("Testfile", r#"path "my secret/\"v1\"" "a\nb""#)
            .expect("should tokenize");
        assert_eq!(texts(&tokens), ["path", r#"my secret/"v1""#, r"a\nb"]);
        assert!(tokens[1].quoted);
        assert!(!tokens[0].quoted);
    }

    #[test]
    fn backticks_are_verbatim() {
        let tokens = tokenize("Testfile", r#"path `a "b" \c`"#).expect("should tokenize");
        assert_eq!(texts(&tokens), ["path", r#"a "b" \c"#]);
    }

    #[test]
    fn quoted_token_spanning_lines() {
        let tokens = tokenize("Testfile", "\"one\ntwo\" next").expect("should tokenize");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].end_line, 2);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn empty_quoted_token_is_kept() {
        let tokens = tokenize("Testfile", r#"path """#).expect("should tokenize");
        assert_eq!(texts(&tokens), ["path", ""]);
    }

    #[test]
    fn quoted_brace_is_not_a_block() {
        let tokens = tokenize("Testfile", r#"id "{" {"#).expect("should tokenize");
        assert!(!tokens[1].is_block_open());
        assert!(tokens[2].is_block_open());
    }

    #[test]
    fn unterminated_quote_reports_opening_line() {
        let err = tokenize("Testfile", "a\npath \"oops\n").expect_err("should fail");
        assert_eq!(
            err,
            ParseError::UnterminatedQuote {
                position: Position::new("Testfile", 2)
            }
        );
    }

    #[test]
    fn blank_input_has_no_tokens() {
        assert!(tokenize("Testfile", "\n\n  \t\n").expect("should tokenize").is_empty());
    }
}
