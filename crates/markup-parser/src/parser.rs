//! Token cursor and grammar rules.
//!
//! The parser has no states of its own beyond the cursor position. Grammar
//! rules are ordinary sequences of `eat` / `expect` / `unexpected` calls and
//! never backtrack: once a token is consumed it stays consumed. Missing
//! tokens only produce warnings, so every rule returns a node.

use crate::ast::{Ast, Doctype};
use crate::{DoctypeMode, ParseOptions};
use markup_lexer::{DiagnosticSink, Range, Scanner, Source, Token, TokenKind};
use tracing::{debug, trace};

/// Parse a source unit into a syntax tree, reporting problems to `log`.
pub fn parse(log: &mut dyn DiagnosticSink, source: &Source, options: ParseOptions) -> Ast {
    let tokens = Scanner::tokenize(log, source);
    let mut parser = Parser::new(log, source, tokens).with_options(options);
    let doctype = parser.parse_doctype();

    Ast {
        doctype,
        nodes: Vec::new(),
    }
}

/// Cursor over a token sequence.
pub struct Parser<'a, 'l> {
    log: &'l mut dyn DiagnosticSink,
    source: &'a Source,
    tokens: Vec<Token<'a>>,
    index: usize,
    /// Logical end of the token sequence. Tokens at or past it read as EOF.
    end: usize,
    /// Start of the most recently reported token, `None` before the first.
    prev_error: Option<usize>,
    options: ParseOptions,
}

impl<'a, 'l> Parser<'a, 'l> {
    /// Create a parser over tokens previously scanned from `source`.
    pub fn new(
        log: &'l mut dyn DiagnosticSink,
        source: &'a Source,
        tokens: Vec<Token<'a>>,
    ) -> Self {
        let end = tokens.len();
        Self {
            log,
            source,
            tokens,
            index: 0,
            end,
            prev_error: None,
            options: ParseOptions::default(),
        }
    }

    /// Stop reading at `end`, so only a prefix of the tokens is parsed.
    pub fn with_end(mut self, end: usize) -> Self {
        self.end = end.min(self.tokens.len());
        self
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    pub fn position(&self) -> usize {
        self.index
    }

    /// Move to the next token. Never moves past the logical end.
    pub fn advance(&mut self) {
        if self.index < self.end {
            let token = self.tokens[self.index];
            trace!(
                pos = self.index,
                kind = %token.kind,
                start = token.range.start,
                len = token.range.len,
                "advance"
            );
            self.index += 1;
        }
    }

    /// The token at `index`, or a zero-length EOF token past the logical end.
    ///
    /// The EOF token sits where the first excluded token starts, or at the
    /// end of the source when every token is included.
    pub fn at(&self, index: usize) -> Token<'a> {
        if index < self.end {
            return self.tokens[index];
        }
        let start = match self.tokens.get(self.end) {
            Some(excluded) => excluded.range.start,
            None => self.source.contents.len(),
        };
        Token::new(TokenKind::EndOfFile, Range::empty(start))
    }

    pub fn current(&self) -> Token<'a> {
        self.at(self.index)
    }

    /// One token of lookahead past `current`.
    pub fn next_token(&self) -> Token<'a> {
        self.at(self.index + 1)
    }

    /// Source text of the current token.
    pub fn raw(&self) -> &'a str {
        let source: &'a Source = self.source;
        self.current().text(&source.contents)
    }

    pub fn peek(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consume the current token if it is `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek(kind) {
            self.advance();
            return true;
        }
        false
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Consume a `kind` token, or warn that it is missing.
    pub fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }

        let token = self.current();
        let message = match token.kind {
            TokenKind::EndOfFile => format!("Expected {kind} but found {}", token.kind),
            _ => format!("Expected {kind} but found {:?}", self.raw()),
        };
        self.report(token.range, message);
        false
    }

    /// Warn that the current token does not belong here.
    pub fn unexpected(&mut self) {
        let token = self.current();
        let message = match token.kind {
            TokenKind::EndOfFile => format!("Unexpected {}", token.kind),
            _ => format!("Unexpected {:?}", self.raw()),
        };
        self.report(token.range, message);
    }

    /// Emit a warning unless one was already reported at or after `range`.
    fn report(&mut self, range: Range, message: String) {
        if self.prev_error.is_some_and(|prev| range.start <= prev) {
            debug!(start = range.start, %message, "suppressed diagnostic");
            return;
        }
        debug!(start = range.start, %message, "diagnostic");
        self.log.add_range_warning(range, message);
        self.prev_error = Some(range.start);
    }

    // =========================================================================
    // Grammar
    // =========================================================================

    /// Parse `<!doctype name value>`.
    pub fn parse_doctype(&mut self) -> Doctype {
        self.expect(TokenKind::DoctypeStart);

        let doctype = match self.options.doctype {
            DoctypeMode::Captured => self.doctype_declaration(),
            DoctypeMode::Reference => self.doctype_placeholder(),
        };

        self.expect(TokenKind::TagEnd);
        doctype
    }

    /// Collect every run up to `>` and split it into name and value.
    /// `<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN">` yields name
    /// `html` and value `PUBLIC "-//W3C//DTD HTML 4.01//EN"`.
    fn doctype_declaration(&mut self) -> Doctype {
        let start = self.current().range.start;
        while matches!(
            self.current().kind,
            TokenKind::Text | TokenKind::Name | TokenKind::String
        ) {
            self.advance();
        }
        let end = self.current().range.start;

        let declaration = self.source.contents[start..end].trim();
        if declaration.is_empty() {
            self.expect(TokenKind::Text);
            return Doctype::default();
        }

        let (name, value) = match declaration.split_once(|c: char| c.is_ascii_whitespace()) {
            Some((name, value)) => (name, value.trim()),
            None => (declaration, ""),
        };
        Doctype {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// A candidate name run is skipped and a separate value run is
    /// required; neither reaches the node.
    fn doctype_placeholder(&mut self) -> Doctype {
        self.eat(TokenKind::Text);
        self.expect(TokenKind::Text);

        Doctype {
            name: "name".to_string(),
            value: "value".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup_lexer::{Diagnostic, Log, Severity};
    use pretty_assertions::assert_eq;

    fn parse_with(contents: &str, options: ParseOptions) -> (Ast, Vec<Diagnostic>) {
        let source = Source::new("test.html", contents);
        let mut log = Log::new();
        let ast = parse(&mut log, &source, options);
        (ast, log.done())
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    fn doctype(name: &str, value: &str) -> Doctype {
        Doctype {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Run `f` against a parser over `contents`, returning the diagnostics.
    fn with_parser(contents: &str, f: impl FnOnce(&mut Parser<'_, '_>)) -> Vec<Diagnostic> {
        let source = Source::new("test.html", contents);
        let mut log = Log::new();
        let tokens = Scanner::tokenize(&mut log, &source);
        let mut parser = Parser::new(&mut log, &source, tokens);
        f(&mut parser);
        log.done()
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    #[test]
    fn test_at_past_end_is_eof_at_end_of_source() {
        with_parser("<a>", |p| {
            let token = p.at(1_000_000);
            assert_eq!(token.kind, TokenKind::EndOfFile);
            assert_eq!(token.range, Range::empty(3));
            assert_eq!(p.at(usize::MAX - 1).kind, TokenKind::EndOfFile);
        });
    }

    #[test]
    fn test_at_on_empty_source() {
        with_parser("", |p| {
            assert_eq!(p.current().kind, TokenKind::EndOfFile);
            assert_eq!(p.current().range, Range::empty(0));
            assert_eq!(p.raw(), "");
        });
    }

    #[test]
    fn test_logical_end_truncates() {
        let source = Source::new("test.html", "<a>");
        let mut log = Log::new();
        let tokens = Scanner::tokenize(&mut log, &source);
        let mut parser = Parser::new(&mut log, &source, tokens).with_end(1);

        assert!(parser.eat(TokenKind::TagOpenStart));
        // `a` exists but lies past the logical end
        assert_eq!(parser.current().kind, TokenKind::EndOfFile);
        assert_eq!(parser.current().range, Range::empty(1));
        parser.advance();
        assert_eq!(parser.position(), 1);
    }

    #[test]
    fn test_with_end_is_clamped() {
        with_parser("", |p| {
            assert_eq!(p.at(0).kind, TokenKind::EndOfFile);
        });
        let source = Source::new("test.html", ">");
        let mut log = Log::new();
        let tokens = Scanner::tokenize(&mut log, &source);
        let parser = Parser::new(&mut log, &source, tokens).with_end(10);
        assert_eq!(parser.at(0).kind, TokenKind::TagEnd);
        assert_eq!(parser.at(1).range, Range::empty(1));
    }

    #[test]
    fn test_peek_and_eat() {
        with_parser("<a/>", |p| {
            assert!(p.peek(TokenKind::TagOpenStart));
            assert!(!p.eat(TokenKind::Name));
            assert_eq!(p.position(), 0);
            assert!(p.eat(TokenKind::TagOpenStart));
            assert_eq!(p.raw(), "a");
            assert_eq!(p.next_token().kind, TokenKind::SelfClosingEnd);
            assert!(p.eat(TokenKind::Name));
            assert!(p.eat(TokenKind::SelfClosingEnd));
            assert!(p.peek(TokenKind::EndOfFile));
            assert!(p.eat(TokenKind::EndOfFile));
            assert_eq!(p.position(), 3);
        });
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    #[test]
    fn test_expect_reports_raw_text() {
        let diagnostics = with_parser("x", |p| {
            assert!(!p.expect(TokenKind::TagEnd));
        });
        assert_eq!(messages(&diagnostics), vec!["Expected > but found \"x\""]);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].range, Range::new(0, 1));
    }

    #[test]
    fn test_expect_at_eof_is_zero_length() {
        let diagnostics = with_parser("x", |p| {
            p.advance();
            p.expect(TokenKind::TagEnd);
        });
        assert_eq!(
            messages(&diagnostics),
            vec!["Expected > but found end of file"]
        );
        assert_eq!(diagnostics[0].range, Range::empty(1));
    }

    #[test]
    fn test_unexpected() {
        let diagnostics = with_parser("'q' x", |p| {
            p.unexpected();
            p.advance();
            p.advance();
            p.advance();
            p.unexpected();
        });
        assert_eq!(
            messages(&diagnostics),
            vec!["Unexpected \"'q'\"", "Unexpected end of file"]
        );
        assert_eq!(diagnostics[1].range, Range::empty(5));
    }

    #[test]
    fn test_same_position_reports_once() {
        let diagnostics = with_parser("x", |p| {
            assert!(!p.expect(TokenKind::TagEnd));
            assert!(!p.expect(TokenKind::Equals));
            p.unexpected();
        });
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_new_position_reports_again() {
        let diagnostics = with_parser("x=y", |p| {
            p.expect(TokenKind::TagEnd);
            p.advance();
            p.expect(TokenKind::TagEnd);
            p.advance();
            p.expect(TokenKind::TagEnd);
        });
        assert_eq!(
            messages(&diagnostics),
            vec![
                "Expected > but found \"x\"",
                "Expected > but found \"=\"",
                "Expected > but found \"y\"",
            ]
        );
    }

    #[test]
    fn test_watermark_is_per_parser() {
        let first = with_parser("x", |p| {
            p.expect(TokenKind::TagEnd);
        });
        let second = with_parser("x", |p| {
            p.expect(TokenKind::TagEnd);
        });
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_lexer_errors_share_the_log() {
        let (_, diagnostics) = parse_with("<!doctype 'html>", ParseOptions::default());
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].message, "String must be closed");
        assert_eq!(
            diagnostics[1..]
                .iter()
                .map(|d| d.severity)
                .collect::<Vec<_>>(),
            vec![Severity::Warning]
        );
    }

    // =========================================================================
    // Doctype (captured)
    // =========================================================================

    #[test]
    fn test_doctype_html() {
        let (ast, diagnostics) = parse_with("<!doctype html>", ParseOptions::default());
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(ast.doctype, doctype("html", ""));
        assert!(ast.nodes.is_empty());
    }

    #[test]
    fn test_doctype_uppercase() {
        let (ast, diagnostics) = parse_with("<!DOCTYPE html>", ParseOptions::default());
        assert!(diagnostics.is_empty());
        assert_eq!(ast.doctype, doctype("html", ""));
    }

    #[test]
    fn test_doctype_with_public_identifier() {
        let (ast, diagnostics) = parse_with(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\">",
            ParseOptions::default(),
        );
        assert!(diagnostics.is_empty());
        assert_eq!(
            ast.doctype,
            doctype("html", "PUBLIC \"-//W3C//DTD HTML 4.01//EN\"")
        );
    }

    #[test]
    fn test_doctype_without_space() {
        let (ast, diagnostics) = parse_with("<!doctypehtml>", ParseOptions::default());
        assert!(diagnostics.is_empty());
        assert_eq!(ast.doctype, doctype("html", ""));
    }

    #[test]
    fn test_doctype_missing_name() {
        let (ast, diagnostics) = parse_with("<!doctype >", ParseOptions::default());
        assert_eq!(messages(&diagnostics), vec!["Expected text but found \">\""]);
        assert_eq!(ast.doctype, Doctype::default());
    }

    #[test]
    fn test_doctype_missing_tag_end() {
        let (ast, diagnostics) = parse_with("<!doctype html", ParseOptions::default());
        assert_eq!(
            messages(&diagnostics),
            vec!["Expected > but found end of file"]
        );
        assert_eq!(diagnostics[0].range, Range::empty(14));
        assert_eq!(ast.doctype, doctype("html", ""));
    }

    #[test]
    fn test_doctype_missing_start() {
        let (ast, diagnostics) = parse_with("html>", ParseOptions::default());
        assert_eq!(
            messages(&diagnostics),
            vec!["Expected <!doctype but found \"html\""]
        );
        assert_eq!(ast.doctype, doctype("html", ""));
    }

    #[test]
    fn test_doctype_empty_source_reports_once() {
        let (ast, diagnostics) = parse_with("", ParseOptions::default());
        assert_eq!(
            messages(&diagnostics),
            vec!["Expected <!doctype but found end of file"]
        );
        assert_eq!(diagnostics[0].range, Range::empty(0));
        assert_eq!(ast.doctype, Doctype::default());
    }

    // =========================================================================
    // Doctype (reference)
    // =========================================================================

    fn reference() -> ParseOptions {
        ParseOptions {
            doctype: DoctypeMode::Reference,
        }
    }

    #[test]
    fn test_reference_doctype_discards_text() {
        // Two text runs satisfy both the name and the value slot, yet the
        // node only carries placeholders.
        let (ast, diagnostics) = parse_with("<!doctype a-b>", reference());
        assert!(diagnostics.is_empty());
        assert_eq!(ast.doctype, doctype("name", "value"));
    }

    #[test]
    fn test_reference_doctype_html_requires_a_value_run() {
        let (ast, diagnostics) = parse_with("<!doctype html>", reference());
        assert_eq!(messages(&diagnostics), vec!["Expected text but found \">\""]);
        assert_eq!(ast.doctype, doctype("name", "value"));
    }

    #[test]
    fn test_reference_doctype_on_empty_source() {
        let (_, diagnostics) = parse_with("", reference());
        // All three expectations fail at offset 0; only the first is kept
        assert_eq!(diagnostics.len(), 1);
    }
}
