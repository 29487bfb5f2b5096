mod lower;
pub mod tree;

pub use tree::{LoopKind, Node, NodeKind, Span};

use rustpython_parser::{ast::Mod, Mode};
use thiserror::Error;
use tracing::debug;

/// Malformed source. Deliberately carries no location or structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Syntax error in code")]
    Syntax,
}

/// Parse Python source text into the analyzer tree.
pub fn parse(text: &str) -> Result<Node, ParseError> {
    let module = rustpython_parser::parse(text, Mode::Module, "<module>").map_err(|err| {
        debug!(error = %err, "source failed to parse");
        ParseError::Syntax
    })?;

    let body = match module {
        Mod::Module(m) => m.body,
        _ => Vec::new(),
    };
    Ok(lower::lower_module(&body, text.len()))
}

/// The text of one file together with its parse outcome.
///
/// Built once per file and shared read-only by every analyzer.
#[derive(Debug)]
pub struct SourceUnit<'a> {
    text: &'a str,
    tree: Result<Node, ParseError>,
}

impl<'a> SourceUnit<'a> {
    pub fn parse(text: &'a str) -> Self {
        Self {
            text,
            tree: parse(text),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn tree(&self) -> Result<&Node, ParseError> {
        self.tree.as_ref().map_err(|err| *err)
    }
}

/// Characters that end a line, as in Python's `str.splitlines`.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b' | '\x0c'
            | '\x1c' | '\x1d' | '\x1e'
            | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into lines the way Python's `str.splitlines` does, dropping the
/// terminators. `\r\n` is a single break.
///
/// A trailing terminator does not start an extra empty line, and empty text has no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.char_indices().find(|&(_, c)| is_line_break(c)) {
            Some((idx, c)) => {
                lines.push(&rest[..idx]);
                let terminator = if rest[idx..].starts_with("\r\n") { 2 } else { c.len_utf8() };
                rest = &rest[idx + terminator..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}
