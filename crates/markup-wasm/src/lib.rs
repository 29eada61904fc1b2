//! WASM bindings for the markup tokenizer and parser.
//!
//! Exposes `tokenize()`, `parse()` and `version()` to JavaScript via
//! wasm-bindgen. Diagnostics are returned as data, never thrown.

use markup_lexer::{Diagnostic, Log, Scanner, Source};
use markup_parser::{DoctypeMode, ParseOptions};
use serde::Serialize;
use wasm_bindgen::prelude::*;

const LABEL: &str = "<input>";

/// A token as seen from JavaScript: `{ kind, start, end }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct TokenRecord {
    kind: String,
    start: usize,
    end: usize,
}

/// A diagnostic as seen from JavaScript: `{ severity, start, end, message }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct DiagnosticRecord {
    severity: String,
    start: usize,
    end: usize,
    message: String,
}

impl From<&Diagnostic> for DiagnosticRecord {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            severity: diagnostic.severity.to_string(),
            start: diagnostic.range.start,
            end: diagnostic.range.end(),
            message: diagnostic.message.clone(),
        }
    }
}

/// Tokenize markup source.
///
/// Returns a JS array of `{ kind, start, end }` objects with byte offsets.
/// Lexer errors are dropped; use `parse()` to see them.
#[wasm_bindgen]
pub fn tokenize(source: &str) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&token_records(source)).map_err(|e| JsError::new(&e.to_string()))
}

/// Parse markup source and print it back.
///
/// Returns a JS object `{ output: string, diagnostics: [...] }`.
#[wasm_bindgen]
pub fn parse(source: &str, reference_doctype: bool) -> Result<JsValue, JsError> {
    let (output, diagnostics) = parse_records(source, reference_doctype);
    let diagnostics = serde_wasm_bindgen::to_value(&diagnostics)
        .map_err(|e| JsError::new(&e.to_string()))?;

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"output".into(), &output.into())
        .map_err(|_| JsError::new("Failed to set output property"))?;
    js_sys::Reflect::set(&js_obj, &"diagnostics".into(), &diagnostics)
        .map_err(|_| JsError::new("Failed to set diagnostics property"))?;

    Ok(js_obj.into())
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn token_records(contents: &str) -> Vec<TokenRecord> {
    let source = Source::new(LABEL, contents);
    let mut log = Log::new();
    Scanner::tokenize(&mut log, &source)
        .iter()
        .map(|token| TokenRecord {
            kind: format!("{:?}", token.kind),
            start: token.range.start,
            end: token.range.end(),
        })
        .collect()
}

fn parse_records(contents: &str, reference_doctype: bool) -> (String, Vec<DiagnosticRecord>) {
    let source = Source::new(LABEL, contents);
    let options = ParseOptions {
        doctype: if reference_doctype {
            DoctypeMode::Reference
        } else {
            DoctypeMode::Captured
        },
    };
    let mut log = Log::new();
    let ast = markup_parser::parse(&mut log, &source, options);
    let diagnostics = log.diagnostics().iter().map(DiagnosticRecord::from).collect();
    (markup_printer::print(&ast), diagnostics)
}
