use crate::diagnostic::{DiagnosticSink, Source};
use crate::token::{Range, Token, TokenKind};
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Markup source scanner.
///
/// Walks the source once, left to right, classifying lexical runs with at
/// most a few bytes of lookahead. Multi-character delimiters (`<!doctype`,
/// `<!--`, `-->`, `/>`) are matched optimistically against the upcoming
/// slice; on a mismatch nothing beyond the first character has been
/// committed, so the run degrades to `Text` instead of failing.
///
/// The scanner is an iterator: tokens are produced on demand and end of
/// file is never yielded.
pub struct Scanner<'a, 'l> {
    log: &'l mut dyn DiagnosticSink,
    source: &'a Source,
    /// Offset just past `code_point`.
    current: usize,
    /// The next undecided character, `None` at end of input.
    code_point: Option<char>,
    /// The token being built. Its length always reaches up to `code_point`.
    token: Token<'a>,
}

impl<'a, 'l> Scanner<'a, 'l> {
    /// Create a new scanner over `source`, reporting problems to `log`.
    pub fn new(log: &'l mut dyn DiagnosticSink, source: &'a Source) -> Self {
        let mut scanner = Self {
            log,
            source,
            current: 0,
            code_point: None,
            token: Token::new(TokenKind::EndOfFile, Range::empty(0)),
        };
        scanner.step();
        scanner
    }

    /// Tokenize the entire source. The end-of-file marker is implicit and
    /// not part of the returned vector.
    pub fn tokenize(log: &mut dyn DiagnosticSink, source: &'a Source) -> Vec<Token<'a>> {
        let tokens: Vec<_> = Scanner::new(log, source).collect();
        debug!(source = %source.label, tokens = tokens.len(), "tokenized");
        tokens
    }

    /// Scan the next token, including the end-of-file marker.
    fn scan_token(&mut self) -> Token<'a> {
        self.token = Token::new(TokenKind::EndOfFile, Range::empty(self.token.range.end()));

        let Some(c) = self.code_point else {
            return self.token;
        };

        self.token.kind = match c {
            '=' => {
                self.step();
                TokenKind::Equals
            }

            '"' | '\'' => self.scan_string(c),

            '<' => {
                if self.eat("!doctype") || self.eat("!DOCTYPE") {
                    self.step();
                    TokenKind::DoctypeStart
                } else if self.eat("!--") {
                    self.step();
                    TokenKind::CommentStart
                } else if self.eat("/") {
                    self.step();
                    TokenKind::TagCloseStart
                } else {
                    self.step();
                    // The tag name itself is the next token
                    if self.would_start_name() {
                        TokenKind::TagOpenStart
                    } else {
                        self.consume_to_end_of_text();
                        TokenKind::Text
                    }
                }
            }

            '-' => {
                if self.eat("->") {
                    self.step();
                    TokenKind::CommentEnd
                } else {
                    self.step();
                    self.consume_to_end_of_text();
                    TokenKind::Text
                }
            }

            '/' => {
                if self.eat(">") {
                    self.step();
                    TokenKind::SelfClosingEnd
                } else {
                    self.step();
                    self.consume_to_end_of_text();
                    TokenKind::Text
                }
            }

            '>' => {
                self.step();
                TokenKind::TagEnd
            }

            _ if self.would_start_name() => {
                self.consume_to_end_of_name();
                TokenKind::Name
            }

            _ => {
                self.consume_to_end_of_text();
                TokenKind::Text
            }
        };

        self.token
    }

    // --- Scanners ---

    /// Scan a quoted string up to and including the matching quote.
    /// Reaching end of input first logs an error and yields `SyntaxError`.
    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.step(); // consume opening quote

        loop {
            match self.code_point {
                None => {
                    self.log
                        .add_range_error(self.token.range, "String must be closed".into());
                    return TokenKind::SyntaxError;
                }
                Some(c) if c == quote => {
                    self.step();
                    return TokenKind::String;
                }
                Some(_) => self.step(),
            }
        }
    }

    /// Consume a text run. Stops before any character that may begin another
    /// construct so text never swallows a delimiter.
    fn consume_to_end_of_text(&mut self) {
        while let Some(c) = self.code_point {
            if matches!(c, '<' | '-' | '>' | '"' | '\'') {
                return;
            }
            self.step();
        }
    }

    fn consume_to_end_of_name(&mut self) {
        while self.code_point.is_some_and(is_name_continue) {
            self.step();
        }
    }

    // --- Helpers ---

    /// Decode the next character and extend the current token up to it.
    fn step(&mut self) {
        let code_point = self.source.contents[self.current..].chars().next();
        self.code_point = code_point;
        self.token.range.len = self.current - self.token.range.start;
        self.current += code_point.map_or(0, char::len_utf8);
    }

    /// Whether the bytes after `code_point` spell `literal`.
    fn matches(&self, literal: &str) -> bool {
        self.source.contents[self.current..].starts_with(literal)
    }

    /// Step over `literal` if it follows `code_point`. On success the last
    /// character of the literal becomes `code_point`.
    fn eat(&mut self, literal: &str) -> bool {
        if !self.matches(literal) {
            return false;
        }
        for _ in literal.chars() {
            self.step();
        }
        true
    }

    fn would_start_name(&self) -> bool {
        self.code_point.is_some_and(is_name_start)
    }
}

impl<'a> Iterator for Scanner<'a, '_> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.scan_token();
        if token.kind == TokenKind::EndOfFile {
            return None;
        }
        trace!(
            kind = %token.kind,
            start = token.range.start,
            len = token.range.len,
            "token"
        );
        Some(token)
    }
}

impl FusedIterator for Scanner<'_, '_> {}

/// Whether `c` may begin a tag or attribute name. Every non-ASCII character
/// is accepted.
pub fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c as u32 >= 0x80
}

/// Whether `c` may continue a name. `:` joins namespaced names like `svg:rect`.
pub fn is_name_continue(c: char) -> bool {
    is_name_start(c) || c == ':'
}
