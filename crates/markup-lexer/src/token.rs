use std::fmt;
use std::marker::PhantomData;

/// A byte range in source text: `len` bytes starting at `start`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: usize,
    pub len: usize,
}

impl Range {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// A zero-length range at `start`.
    pub fn empty(start: usize) -> Self {
        Self { start, len: 0 }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Convert to a `std::ops::Range` for slicing.
    pub fn as_std(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }
}

/// Token classification for markup source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EndOfFile,
    SyntaxError,

    // Markup delimiters
    DoctypeStart,   // <!doctype
    CommentStart,   // <!--
    CommentEnd,     // -->
    TagOpenStart,   // <
    TagCloseStart,  // </
    TagEnd,         // >
    SelfClosingEnd, // />
    Equals,         // =

    // Runs
    Name,
    String,
    Text,
}

impl TokenKind {
    /// Human-readable spelling used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::EndOfFile => "end of file",
            TokenKind::SyntaxError => "syntax error",
            TokenKind::DoctypeStart => "<!doctype",
            TokenKind::CommentStart => "<!--",
            TokenKind::CommentEnd => "-->",
            TokenKind::TagOpenStart => "<",
            TokenKind::TagCloseStart => "</",
            TokenKind::TagEnd => ">",
            TokenKind::SelfClosingEnd => "/>",
            TokenKind::Equals => "=",
            TokenKind::Name => "name",
            TokenKind::String => "string",
            TokenKind::Text => "text",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token produced by the markup lexer.
///
/// Tokens reference a range of the source instead of owning the substring.
/// The `'a` marker ties each token to the buffer it was scanned from, so a
/// token cannot outlive that buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub range: Range,
    pub kind: TokenKind,
    source: PhantomData<&'a str>,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, range: Range) -> Self {
        Self {
            range,
            kind,
            source: PhantomData,
        }
    }

    /// The slice of `source` this token covers.
    pub fn text(&self, source: &'a str) -> &'a str {
        &source[self.range.as_std()]
    }
}
