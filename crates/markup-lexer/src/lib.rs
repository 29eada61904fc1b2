//! Markup Lexer
//!
//! Tokenizes HTML-like markup into a flat sequence of position-annotated
//! tokens: doctype and comment delimiters, tag delimiters, names, quoted
//! strings and text runs. Tokens are byte ranges into the source, never
//! copies. Problems are reported to a [`DiagnosticSink`] and never abort
//! the pass.
//!
//! # Example
//!
//! ```
//! use markup_lexer::{Log, Scanner, Source, TokenKind};
//!
//! let source = Source::new("index.html", "<br/>");
//! let mut log = Log::new();
//! let tokens = Scanner::tokenize(&mut log, &source);
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::TagOpenStart, TokenKind::Name, TokenKind::SelfClosingEnd]
//! );
//! assert!(log.is_empty());
//! ```

pub mod diagnostic;
pub mod scanner;
pub mod token;

pub use diagnostic::{Diagnostic, DiagnosticSink, ErrorsEmitted, Log, Severity, Source};
pub use scanner::{is_name_continue, is_name_start, Scanner};
pub use token::{Range, Token, TokenKind};
