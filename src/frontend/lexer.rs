//! This lexer tokenizes ILOC.
use std::fmt;
use regex::Regex;
use super::{Diagnostic, Line};
use super::ir::Opcode;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Opcode,
    Register,
    Constant,
    Comma,
    AssignArrow,
    Comment,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::Opcode      => "OPCODE",
            TokenKind::Register    => "REGISTER",
            TokenKind::Constant    => "CONSTANT",
            TokenKind::Comma       => "COMMA",
            TokenKind::AssignArrow => "ASSIGN_ARROW",
            TokenKind::Comment     => "COMMENT",
        };
        write!(f, "{}", name)
    }
}

/// A lexeme tagged with its kind and the line its first character is on.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub line: usize,
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new<S: Into<String>>(line: usize, kind: TokenKind, lexeme: S) -> Self {
        Token { line, kind, lexeme: lexeme.into() }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.line, self.kind, self.lexeme)
    }
}

/// Tokenizes `source` in a single pass.
///
/// Invalid identifiers and stray characters are appended to `diagnostics`
/// and skipped; the whole input is always consumed.
pub fn tokenize(source: &str, diagnostics: &mut Vec<Diagnostic>) -> Vec<Token> {
    let tokens = Scanner::new(source, diagnostics).run();
    debug!("Scanned {} token(s), {} diagnostic(s) so far.", tokens.len(), diagnostics.len());
    tokens
}

struct Scanner<'a> {
    chars: Vec<char>,
    pos:   usize,
    line:  usize,
    register: Regex,
    tokens: Vec<Token>,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> Scanner<'a> {
    const REGISTER_PATTERN: &'static str = r"^r[0-9]+$";

    fn new(source: &str, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Scanner {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            register: Regex::new(Self::REGISTER_PATTERN).expect("Invalid regex"),
            tokens: Vec::with_capacity(256),
            diagnostics,
        }
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => self.pos += 1,
                '\n' => {
                    self.line += 1;
                    self.pos += 1;
                },
                '/' if self.peek_next() == Some('/') => self.comment(),
                '=' if self.peek_next() == Some('>') => {
                    self.pos += 2;
                    self.push(TokenKind::AssignArrow, "=>");
                },
                ',' => {
                    self.pos += 1;
                    self.push(TokenKind::Comma, ",");
                },
                c if c.is_ascii_digit() => self.constant(),
                c if c.is_alphabetic() => self.word(),
                c => {
                    self.error(format!("Unexpected character '{}'", c));
                    self.pos += 1;
                },
            }
        }
        self.tokens
    }

    /// `//` up to, but not including, the end of the line.
    fn comment(&mut self) {
        let lexeme = self.take_while(|c| c != '\n');
        self.push(TokenKind::Comment, lexeme);
    }

    fn constant(&mut self) {
        let lexeme = self.take_while(|c| c.is_ascii_digit());
        self.push(TokenKind::Constant, lexeme);
    }

    /// Opcode or register; anything else alphanumeric is rejected.
    fn word(&mut self) {
        let lexeme = self.take_while(char::is_alphanumeric);
        if Opcode::from_name(&lexeme).is_some() {
            self.push(TokenKind::Opcode, lexeme);
        } else if self.register.is_match(&lexeme) {
            self.push(TokenKind::Register, lexeme);
        } else {
            self.error(format!("Invalid identifier '{}'", lexeme));
        }
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, pred: F) -> String {
        let start = self.pos;
        while self.peek().map_or(false, &pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn push<S: Into<String>>(&mut self, kind: TokenKind, lexeme: S) {
        let token = Token::new(self.line, kind, lexeme);
        trace!("token: {}", token);
        self.tokens.push(token);
    }

    fn error(&mut self, message: String) {
        self.diagnostics.push(Diagnostic::new(Line::At(self.line), message));
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let tokens = tokenize(source, &mut diagnostics);
        (tokens, diagnostics)
    }

    #[test]
    fn test_tokenize_opcodes() {
        for op in Opcode::ALL.iter() {
            let (tokens, diagnostics) = scan(op.name());
            assert_eq!(tokens, vec![Token::new(1, TokenKind::Opcode, op.name())]);
            assert!(diagnostics.is_empty());
        }

        let (tokens, diagnostics) = scan("LOAD Nop loadi");
        assert!(tokens.is_empty());
        assert_eq!(diagnostics, vec![
            Diagnostic::new(Line::At(1), "Invalid identifier 'LOAD'"),
            Diagnostic::new(Line::At(1), "Invalid identifier 'Nop'"),
            Diagnostic::new(Line::At(1), "Invalid identifier 'loadi'"),
        ]);
    }

    #[test]
    fn test_tokenize_registers() {
        for i in 0..=255 {
            let lexeme = format!("r{}", i);
            let (tokens, _) = scan(&lexeme);
            assert_eq!(tokens, vec![Token::new(1, TokenKind::Register, lexeme)]);
        }

        let (tokens, diagnostics) = scan("r003 r0");
        assert_eq!(tokens, vec![
            Token::new(1, TokenKind::Register, "r003"),
            Token::new(1, TokenKind::Register, "r0"),
        ]);
        assert!(diagnostics.is_empty());

        let (tokens, diagnostics) = scan("r R1 r1a ra1");
        assert!(tokens.is_empty());
        assert_eq!(diagnostics, vec![
            Diagnostic::new(Line::At(1), "Invalid identifier 'r'"),
            Diagnostic::new(Line::At(1), "Invalid identifier 'R1'"),
            Diagnostic::new(Line::At(1), "Invalid identifier 'r1a'"),
            Diagnostic::new(Line::At(1), "Invalid identifier 'ra1'"),
        ]);
    }

    #[test]
    fn test_tokenize_constants() {
        let (tokens, diagnostics) = scan("0 007 2147483648 99999999999999999999");
        assert_eq!(tokens, vec![
            Token::new(1, TokenKind::Constant, "0"),
            Token::new(1, TokenKind::Constant, "007"),
            Token::new(1, TokenKind::Constant, "2147483648"),
            Token::new(1, TokenKind::Constant, "99999999999999999999"),
        ]);
        assert!(diagnostics.is_empty());

        // A digit run stops at the first letter, which starts a new word.
        let (tokens, _) = scan("12r3");
        assert_eq!(tokens, vec![
            Token::new(1, TokenKind::Constant, "12"),
            Token::new(1, TokenKind::Register, "r3"),
        ]);
    }

    #[test]
    fn test_tokenize_punctuation() {
        let (tokens, diagnostics) = scan("r1,r2=>r3");
        assert_eq!(tokens, vec![
            Token::new(1, TokenKind::Register, "r1"),
            Token::new(1, TokenKind::Comma, ","),
            Token::new(1, TokenKind::Register, "r2"),
            Token::new(1, TokenKind::AssignArrow, "=>"),
            Token::new(1, TokenKind::Register, "r3"),
        ]);
        assert!(diagnostics.is_empty());

        let (tokens, diagnostics) = scan("= > / -");
        assert!(tokens.is_empty());
        assert_eq!(diagnostics, vec![
            Diagnostic::new(Line::At(1), "Unexpected character '='"),
            Diagnostic::new(Line::At(1), "Unexpected character '>'"),
            Diagnostic::new(Line::At(1), "Unexpected character '/'"),
            Diagnostic::new(Line::At(1), "Unexpected character '-'"),
        ]);

        // A trailing `=` has nothing to pair with.
        let (tokens, diagnostics) = scan("r1 =");
        assert_eq!(tokens, vec![Token::new(1, TokenKind::Register, "r1")]);
        assert_eq!(diagnostics, vec![Diagnostic::new(Line::At(1), "Unexpected character '='")]);
    }

    #[test]
    fn test_tokenize_comments() {
        let (tokens, diagnostics) = scan("nop // r1 => r2, %$#\noutput r1");
        assert_eq!(tokens, vec![
            Token::new(1, TokenKind::Opcode, "nop"),
            Token::new(1, TokenKind::Comment, "// r1 => r2, %$#"),
            Token::new(2, TokenKind::Opcode, "output"),
            Token::new(2, TokenKind::Register, "r1"),
        ]);
        assert!(diagnostics.is_empty());

        let (tokens, _) = scan("//");
        assert_eq!(tokens, vec![Token::new(1, TokenKind::Comment, "//")]);
    }

    #[test]
    fn test_tokenize_keeps_going() {
        let (tokens, diagnostics) = scan("foo r1 => r2\nadd r1 ; r2");
        assert_eq!(tokens, vec![
            Token::new(1, TokenKind::Register, "r1"),
            Token::new(1, TokenKind::AssignArrow, "=>"),
            Token::new(1, TokenKind::Register, "r2"),
            Token::new(2, TokenKind::Opcode, "add"),
            Token::new(2, TokenKind::Register, "r1"),
            Token::new(2, TokenKind::Register, "r2"),
        ]);
        assert_eq!(diagnostics, vec![
            Diagnostic::new(Line::At(1), "Invalid identifier 'foo'"),
            Diagnostic::new(Line::At(2), "Unexpected character ';'"),
        ]);
    }

    #[test]
    fn test_tokenize() {
        let iloc_input = "
        loadI 1024 => r1
        \tloadI 8 => r2\r
        lshift r1, r2 => r3 // r3 should now contain 262144
        output r3
        ";
        let v = vec![
            Token::new(2, TokenKind::Opcode, "loadI"),
            Token::new(2, TokenKind::Constant, "1024"),
            Token::new(2, TokenKind::AssignArrow, "=>"),
            Token::new(2, TokenKind::Register, "r1"),
            Token::new(3, TokenKind::Opcode, "loadI"),
            Token::new(3, TokenKind::Constant, "8"),
            Token::new(3, TokenKind::AssignArrow, "=>"),
            Token::new(3, TokenKind::Register, "r2"),
            Token::new(4, TokenKind::Opcode, "lshift"),
            Token::new(4, TokenKind::Register, "r1"),
            Token::new(4, TokenKind::Comma, ","),
            Token::new(4, TokenKind::Register, "r2"),
            Token::new(4, TokenKind::AssignArrow, "=>"),
            Token::new(4, TokenKind::Register, "r3"),
            Token::new(4, TokenKind::Comment, "// r3 should now contain 262144"),
            Token::new(5, TokenKind::Opcode, "output"),
            Token::new(5, TokenKind::Register, "r3"),
        ];
        let (tokens, diagnostics) = scan(iloc_input);
        assert_eq!(tokens, v);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::new(1, TokenKind::AssignArrow, "=>").to_string(), "1 ASSIGN_ARROW =>");
        assert_eq!(Token::new(12, TokenKind::Constant, "1024").to_string(), "12 CONSTANT 1024");
    }

    #[test]
    fn test_tokenize_empty() {
        let (tokens, diagnostics) = scan("");
        assert!(tokens.is_empty());
        assert!(diagnostics.is_empty());

        let (tokens, diagnostics) = scan(" \t\r\n\n");
        assert!(tokens.is_empty());
        assert!(diagnostics.is_empty());
    }
}
