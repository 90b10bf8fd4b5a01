//! Character-by-character lexer for script lines.
//!
//! Consumes one logical input line at a time and extracts bare tokens,
//! single/double-quoted strings with permissive backslash escaping,
//! `%X...X` special quotes, and `<<TAG` / `<<-TAG` heredocs, pulling
//! further lines from the supplier when a token spans lines. Positions
//! are tracked in code points, 1-based.

use crate::error::{Error, ParseError};
use crate::interpreter::Config;
use crate::position::Position;
use crate::source::LineSupplier;

pub struct Lexer<'a> {
    input: &'a mut dyn LineSupplier,
    line: Vec<char>,
    cursor: usize,
    line_number: usize,
    exhausted: bool,
    comment_char: char,
    escape_char: char,
    strict: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a mut dyn LineSupplier, config: &Config) -> Self {
        Self {
            input,
            line: Vec::new(),
            cursor: 0,
            line_number: 0,
            exhausted: false,
            comment_char: config.comment_char,
            escape_char: config.escape_char,
            strict: config.strict,
        }
    }

    /// Pull the next input line. Returns false once the supplier is
    /// exhausted.
    pub fn next_line(&mut self) -> Result<bool, Error> {
        match self.input.next_line()? {
            Some(line) => {
                self.line = line.chars().collect();
                self.cursor = 0;
                self.line_number += 1;
                Ok(true)
            }
            None => {
                self.exhausted = true;
                Ok(false)
            }
        }
    }

    /// True once the underlying input has run out (a heredoc or quote
    /// may exhaust it mid-instruction).
    pub fn at_end_of_input(&self) -> bool {
        self.exhausted
    }

    /// The position of the next unconsumed character.
    pub fn pos(&self) -> Position {
        Position::new(self.line_number.max(1), self.cursor + 1)
    }

    /// The position of the most recently consumed character, for errors
    /// raised mid-token.
    fn err_pos(&self) -> Position {
        Position::new(self.line_number.max(1), self.cursor.max(1))
    }

    /// A (line, cursor) snapshot, used by the caller's progress guard.
    pub fn checkpoint(&self) -> (usize, usize) {
        (self.line_number, self.cursor)
    }

    /// Build a lexer-internal diagnostic at the current position.
    pub fn parse_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.err_pos(), message)
    }

    pub fn has_line_char(&self) -> bool {
        self.cursor < self.line.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.line.get(self.cursor).copied()
    }

    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.cursor += 1;
        Some(ch)
    }

    /// Skip whitespace on the current line. Returns true if a
    /// non-whitespace character is next; a comment discards the rest of
    /// the line and counts as "nothing here".
    pub fn seek_to_non_whitespace(&mut self) -> bool {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.cursor += 1;
            } else if ch == self.comment_char {
                self.cursor = self.line.len();
                return false;
            } else {
                return true;
            }
        }
        false
    }

    /// Read a bare token: everything up to whitespace or a comment.
    pub fn read_to_whitespace(&mut self) -> String {
        let mut buf = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                break;
            }
            if ch == self.comment_char {
                self.cursor = self.line.len();
                break;
            }
            buf.push(ch);
            self.cursor += 1;
        }
        buf
    }

    /// Read everything up to end-of-line or a comment.
    fn read_to_end_of_line(&mut self) -> String {
        let mut buf = String::new();
        while let Some(ch) = self.peek() {
            if ch == self.comment_char {
                self.cursor = self.line.len();
                break;
            }
            buf.push(ch);
            self.cursor += 1;
        }
        buf
    }

    /// Read a quoted string; the opening quote has been consumed.
    ///
    /// Backslash before the end quote or another backslash collapses to
    /// that literal character; before anything else it is preserved
    /// as-is, backslash included, so that stray backslashes from
    /// non-programmers survive intact. Reaching end-of-line continues
    /// the string onto the next input line with an inserted newline.
    pub fn read_quote(&mut self, end_quote: char) -> Result<String, Error> {
        let mut buf = String::new();
        loop {
            while let Some(ch) = self.bump() {
                if ch == end_quote {
                    return Ok(buf);
                }
                if ch == self.escape_char {
                    match self.bump() {
                        Some(esc) if esc == end_quote || esc == self.escape_char => buf.push(esc),
                        Some(esc) => {
                            buf.push(ch);
                            buf.push(esc);
                        }
                        // Escape at end-of-line: kept as-is.
                        None => buf.push(ch),
                    }
                } else {
                    buf.push(ch);
                }
            }
            if !self.next_line()? {
                if self.strict {
                    return Err(self
                        .parse_error("No end quote found before end of input")
                        .into());
                }
                // Permissive: the value accumulated so far.
                return Ok(buf);
            }
            buf.push('\n');
        }
    }

    /// Read a `%X...X` special quote; the `%` has been consumed.
    ///
    /// `( < [ {` terminate at their matching closer; any other delimiter
    /// terminates at itself.
    pub fn read_special_quote(&mut self) -> Result<String, Error> {
        let delim = match self.peek() {
            Some(ch) if !ch.is_whitespace() => ch,
            _ => {
                return Err(self
                    .parse_error(
                        "Invalid special quote '%' without a tag, with spaces, or unquoted string",
                    )
                    .into());
            }
        };
        self.cursor += 1;

        let end_quote = match delim {
            '(' => ')',
            '<' => '>',
            '[' => ']',
            '{' => '}',
            other => other,
        };
        self.read_quote(end_quote)
    }

    /// Read a heredoc; the first `<` has been consumed.
    ///
    /// `<<TAG` keeps body lines verbatim; `<<-TAG` strips the minimum
    /// leading-whitespace width (in code points) from every body line.
    /// Body lines are joined with `\n` and the result is chomped. The
    /// end tag may be indented, and lexing resumes on the terminator
    /// line right after the tag, so further arguments may follow it.
    pub fn read_heredoc(&mut self) -> Result<String, Error> {
        if self.peek() != Some('<') {
            return Err(self
                .parse_error("Invalid heredoc '<' instead of '<<' or unquoted string")
                .into());
        }
        self.cursor += 1;

        let strip_indent = self.peek() == Some('-');
        if strip_indent {
            self.cursor += 1;
        }

        let tag_pos = self.pos();
        let tag = self.read_to_end_of_line().trim_end().to_string();
        if tag.is_empty() {
            return Err(
                ParseError::new(tag_pos, "Invalid heredoc without a tag or unquoted string").into(),
            );
        }
        if tag.chars().any(char::is_whitespace) {
            return Err(ParseError::new(
                tag_pos,
                "Invalid heredoc with whitespaces before or in the tag, or unquoted string",
            )
            .into());
        }

        let tag_chars: Vec<char> = tag.chars().collect();
        let mut body: Vec<String> = Vec::new();
        let mut min_indent = usize::MAX;
        let mut terminated = false;

        while self.next_line()? {
            let lead = self.line.iter().take_while(|ch| ch.is_whitespace()).count();

            // End tag? The line's leading token must equal the tag
            // exactly, followed by end-of-line, whitespace, or a
            // comment. A longer token that merely starts with the tag is
            // body text, and no later occurrence on that line is
            // considered.
            let after = lead + tag_chars.len();
            if self.line.len() >= after && self.line[lead..after] == tag_chars[..] {
                match self.line.get(after).copied() {
                    None => {
                        self.cursor = after;
                        terminated = true;
                        break;
                    }
                    Some(ch) if ch.is_whitespace() => {
                        self.cursor = after + 1;
                        terminated = true;
                        break;
                    }
                    Some(ch) if ch == self.comment_char => {
                        self.cursor = self.line.len();
                        terminated = true;
                        break;
                    }
                    Some(_) => {}
                }
            }

            if lead < min_indent {
                min_indent = lead;
            }
            body.push(self.line.iter().collect());
            self.cursor = self.line.len();
        }

        if !terminated && self.strict {
            return Err(self
                .parse_error(format!("No end tag '{tag}' found before end of input"))
                .into());
        }

        let strip = strip_indent && min_indent > 0 && min_indent != usize::MAX;
        let mut value = String::new();
        for (i, line) in body.iter().enumerate() {
            if i > 0 {
                value.push('\n');
            }
            if strip {
                value.extend(line.chars().skip(min_indent));
            } else {
                value.push_str(line);
            }
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReadSource;

    fn args_of(text: &str) -> Vec<(Position, String)> {
        args_with_config(text, &Config::default())
    }

    fn args_with_config(text: &str, config: &Config) -> Vec<(Position, String)> {
        let mut src = ReadSource::from_str(text);
        let mut lx = Lexer::new(&mut src, config);
        assert!(lx.next_line().unwrap());
        let mut args = Vec::new();
        while lx.has_line_char() {
            if !lx.seek_to_non_whitespace() {
                break;
            }
            let pos = lx.pos();
            let value = match lx.peek() {
                Some(q @ ('"' | '\'')) => {
                    lx.bump();
                    lx.read_quote(q).unwrap()
                }
                Some('%') => {
                    lx.bump();
                    lx.read_special_quote().unwrap()
                }
                Some('<') => {
                    lx.bump();
                    lx.read_heredoc().unwrap()
                }
                _ => lx.read_to_whitespace(),
            };
            args.push((pos, value));
            if lx.at_end_of_input() {
                break;
            }
        }
        args
    }

    fn values_of(text: &str) -> Vec<String> {
        args_of(text).into_iter().map(|(_, v)| v).collect()
    }

    #[test]
    fn test_bare_tokens_and_positions() {
        let args = args_of("click 10 20");
        assert_eq!(
            args,
            vec![
                (Position::new(1, 1), "click".to_string()),
                (Position::new(1, 7), "10".to_string()),
                (Position::new(1, 10), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_comment_only_line_yields_nothing() {
        let mut src = ReadSource::from_str("   # just a comment");
        let mut lx = Lexer::new(&mut src, &Config::default());
        assert!(lx.next_line().unwrap());
        assert!(!lx.seek_to_non_whitespace());
        assert!(!lx.has_line_char());
    }

    #[test]
    fn test_comment_terminates_bare_token() {
        assert_eq!(values_of("puts foo#comment"), vec!["puts", "foo"]);
        assert_eq!(values_of("puts foo # comment"), vec!["puts", "foo"]);
    }

    #[test]
    fn test_double_and_single_quotes() {
        assert_eq!(values_of(r#"puts "Hello World""#), vec!["puts", "Hello World"]);
        assert_eq!(values_of("puts 'Hello World'"), vec!["puts", "Hello World"]);
    }

    #[test]
    fn test_escaped_quote_and_escape() {
        assert_eq!(
            values_of(r#"puts "Hello \"World\"""#),
            vec!["puts", r#"Hello "World""#]
        );
        assert_eq!(values_of(r#"puts "a\\b""#), vec!["puts", r"a\b"]);
    }

    #[test]
    fn test_unknown_escape_is_preserved() {
        // "\a" keeps its backslash, so stray backslashes are harmless.
        assert_eq!(values_of(r#"puts "a\nb""#), vec!["puts", r"a\nb"]);
    }

    #[test]
    fn test_quote_continues_across_lines() {
        assert_eq!(values_of("puts \"Hello\nWorld\""), vec!["puts", "Hello\nWorld"]);
    }

    #[test]
    fn test_trailing_escape_kept_and_line_joined() {
        assert_eq!(values_of("puts \"abc\\\ndef\""), vec!["puts", "abc\\\ndef"]);
    }

    #[test]
    fn test_unterminated_quote_returns_partial_value() {
        assert_eq!(values_of("puts \"abc"), vec!["puts", "abc"]);
    }

    #[test]
    fn test_unterminated_quote_is_error_in_strict_mode() {
        let config = Config {
            strict: true,
            ..Config::default()
        };
        let mut src = ReadSource::from_str("puts \"abc");
        let mut lx = Lexer::new(&mut src, &config);
        lx.next_line().unwrap();
        lx.seek_to_non_whitespace();
        lx.read_to_whitespace();
        lx.seek_to_non_whitespace();
        lx.bump();
        assert!(lx.read_quote('"').is_err());
    }

    #[test]
    fn test_special_quote_paired_delimiters() {
        assert_eq!(values_of("puts %(Hello \\) World)"), vec!["puts", "Hello ) World"]);
        assert_eq!(values_of("puts %[abc]"), vec!["puts", "abc"]);
        assert_eq!(values_of("puts %{abc}"), vec!["puts", "abc"]);
        assert_eq!(values_of("puts %<abc>"), vec!["puts", "abc"]);
    }

    #[test]
    fn test_special_quote_self_delimiter() {
        assert_eq!(values_of("puts %^Hello \\^ World^"), vec!["puts", "Hello ^ World"]);
    }

    #[test]
    fn test_special_quote_errors() {
        for text in ["puts %", "puts % abc"] {
            let mut src = ReadSource::from_str(text);
            let mut lx = Lexer::new(&mut src, &Config::default());
            lx.next_line().unwrap();
            lx.seek_to_non_whitespace();
            lx.read_to_whitespace();
            lx.seek_to_non_whitespace();
            assert_eq!(lx.bump(), Some('%'));
            assert!(lx.read_special_quote().is_err(), "{text:?} should fail");
        }
    }

    #[test]
    fn test_heredoc_verbatim() {
        let args = args_of("puts <<EOS\n  Hello\n    World\nEOS");
        assert_eq!(args[1].1, "  Hello\n    World");
    }

    #[test]
    fn test_heredoc_min_indent_stripping() {
        let args = args_of("puts <<-EOS\n    line one\n      line two\n    EOS");
        assert_eq!(args[1].1, "line one\n  line two");
    }

    #[test]
    fn test_heredoc_indent_stripping_is_idempotent() {
        let stripped = args_of("puts <<-EOS\n    a\n      b\n  EOS")[1].1.clone();
        // The computed indent of the stripped text is zero, so a second
        // pass is a no-op.
        let again = args_of(&format!("puts <<-EOS\n{stripped}\nEOS"))[1].1.clone();
        assert_eq!(again, stripped);
    }

    #[test]
    fn test_heredoc_end_tag_may_be_indented() {
        let args = args_of("puts <<EOS\nHello\n  EOS");
        assert_eq!(args[1].1, "Hello");
    }

    #[test]
    fn test_heredoc_blank_body_line_forces_zero_indent() {
        let args = args_of("puts <<-EOS\n    a\n\n    b\n  EOS");
        assert_eq!(args[1].1, "    a\n\n    b");
    }

    #[test]
    fn test_heredoc_tag_prefix_is_body() {
        // "EOSX" starts with the tag but is a longer token: body text.
        let args = args_of("puts <<EOS\nEOSX\nEOS");
        assert_eq!(args[1].1, "EOSX");
    }

    #[test]
    fn test_heredoc_comment_after_tag() {
        let args = args_of("puts <<EOS # note\nHello\nEOS # done");
        assert_eq!(args[1].1, "Hello");
    }

    #[test]
    fn test_heredoc_args_continue_after_end_tag() {
        let values = values_of("puts <<EOS\nHello\nEOS 10 20");
        assert_eq!(values, vec!["puts", "Hello", "10", "20"]);
    }

    #[test]
    fn test_heredoc_ends_silently_at_eof() {
        let args = args_of("puts <<EOS\nHello\nWorld");
        assert_eq!(args[1].1, "Hello\nWorld");
    }

    #[test]
    fn test_heredoc_eof_is_error_in_strict_mode() {
        let config = Config {
            strict: true,
            ..Config::default()
        };
        let mut src = ReadSource::from_str("puts <<EOS\nHello");
        let mut lx = Lexer::new(&mut src, &config);
        lx.next_line().unwrap();
        lx.seek_to_non_whitespace();
        lx.read_to_whitespace();
        lx.seek_to_non_whitespace();
        lx.bump();
        assert!(lx.read_heredoc().is_err());
    }

    #[test]
    fn test_heredoc_introducer_errors() {
        for text in ["puts <EOS", "puts <<", "puts <<-", "puts <<#c", "puts << EOS"] {
            let mut src = ReadSource::from_str(text);
            let mut lx = Lexer::new(&mut src, &Config::default());
            lx.next_line().unwrap();
            lx.seek_to_non_whitespace();
            lx.read_to_whitespace();
            lx.seek_to_non_whitespace();
            assert_eq!(lx.bump(), Some('<'));
            assert!(lx.read_heredoc().is_err(), "{text:?} should fail");
        }
    }

    #[test]
    fn test_custom_comment_and_escape_chars() {
        let config = Config {
            comment_char: ';',
            escape_char: '~',
            ..Config::default()
        };
        let args = args_with_config("puts \"a~\"b\" ; done", &config);
        let values: Vec<&str> = args.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, vec!["puts", "a\"b"]);
    }

    #[test]
    fn test_positions_count_code_points() {
        let args = args_of("puts \u{56DE}\u{8F49} next");
        assert_eq!(args[1].0, Position::new(1, 6));
        assert_eq!(args[1].1, "\u{56DE}\u{8F49}");
        assert_eq!(args[2].0, Position::new(1, 9));
    }
}
