//! Markup Parser
//!
//! A cursor over the lexer's token sequence with bounded lookahead,
//! conditional consumption (`eat`), required consumption (`expect`) and a
//! per-parser watermark that keeps one stuck token from producing a cascade
//! of diagnostics. Grammar rules are plain sequences of those calls; the
//! doctype rule is the one implemented here.
//!
//! ```text
//! Source → Scanner::tokenize → Parser → parse_doctype → Ast
//! ```

pub mod ast;
pub mod parser;

pub use ast::{Ast, Doctype, Element, Node, Property};
pub use parser::{parse, Parser};

/// Options controlling grammar rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub doctype: DoctypeMode,
}

/// How the doctype rule treats the text after `<!doctype`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DoctypeMode {
    /// Split the declaration into a name and an optional value and keep both.
    #[default]
    Captured,
    /// Legacy behaviour: a candidate name run is skipped, a separate value
    /// run is required, and the node always carries the placeholder text
    /// `name` / `value`.
    Reference,
}
