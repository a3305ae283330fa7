//! The frontend module is in charge of taking ILOC
//! source text and producing a Vec<IrNode> from the
//! IR submodule.
//!
//! It does this by implementing a character-stream scanner
//! and a one-token-lookahead recursive descent parser. Neither
//! stage stops at the first error: both collect `Diagnostic`s
//! and keep consuming their input.

pub mod ir;
pub mod lexer;
pub mod parser;

use std::fmt;

/// Where a diagnostic was raised. The parser can run off the end
/// of the token stream, in which case there is no line to point at.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Line {
    At(usize),
    Eof,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Line::At(n) => write!(f, "{}", n),
            Line::Eof   => write!(f, "EOF"),
        }
    }
}

/// A non-fatal lexical or syntax error.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Diagnostic {
    pub line: Line,
    pub message: String,
}

impl Diagnostic {
    pub fn new<S: Into<String>>(line: Line, message: S) -> Self {
        Diagnostic { line, message: message.into() }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error on line {}: {}", self.line, self.message)
    }
}

/// Everything the CLI needs from one pass over a source file.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Analysis {
    pub ir: Vec<ir::IrNode>,
    /// Scanner diagnostics first, then parser diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

/// Scans, strips comments and parses `source` in one go.
pub fn analyze(source: &str) -> Analysis {
    let mut diagnostics = Vec::new();
    let tokens = lexer::tokenize(source, &mut diagnostics);
    let (ir, mut parse_diagnostics) = parser::parse(tokens);
    diagnostics.append(&mut parse_diagnostics);
    Analysis { ir, diagnostics }
}
