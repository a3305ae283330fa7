//! The Parser module takes a token stream (Vec<Token>) from the lexer
//! and converts it into IR.
//!
//! Errors never stop the parser. An instruction with a missing operand
//! still has all of its remaining operands parsed so that every problem
//! on the line is reported, but it contributes no IR node.
use std::collections::VecDeque;
use super::{Diagnostic, Line};
use super::lexer::{Token, TokenKind};
use super::ir::*;

/// Drops comment tokens; the grammar has no place for them.
pub fn strip_comments(tokens: Vec<Token>) -> VecDeque<Token> {
    tokens.into_iter()
        .filter(|tok| tok.kind != TokenKind::Comment)
        .collect()
}

/// Parses a raw token stream, comments included.
pub fn parse(tokens: Vec<Token>) -> (Vec<IrNode>, Vec<Diagnostic>) {
    Parser::new(strip_comments(tokens)).run()
}

pub struct Parser {
    tokens: VecDeque<Token>,
    ir:     Vec<IrNode>,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    /// `tokens` must already have had its comments stripped.
    pub fn new(tokens: VecDeque<Token>) -> Self {
        let capacity = tokens.len();
        Parser { tokens, ir: Vec::with_capacity(capacity), diagnostics: Vec::new() }
    }

    /// Run the parser, consuming itself and returning the IR along
    /// with every diagnostic raised on the way.
    pub fn run(mut self) -> (Vec<IrNode>, Vec<Diagnostic>) {
        while let Some(tok) = self.consume() {
            if let Some(node) = self.instruction(tok) {
                self.ir.push(node);
            }
        }

        debug!("Parsed {} instruction(s) with {} error(s).", self.ir.len(), self.diagnostics.len());
        (self.ir, self.diagnostics)
    }

    /// Parses one instruction starting at `tok`. Anything other than an
    /// opcode is reported and skipped on its own.
    fn instruction(&mut self, tok: Token) -> Option<IrNode> {
        if tok.kind != TokenKind::Opcode {
            self.error(Line::At(tok.line), format!("Expected Opcode, got {}", tok.kind));
            return None;
        }

        let op = match Opcode::from_name(&tok.lexeme) {
            Some(op) => op,
            None => {
                self.error(Line::At(tok.line), format!("Unknown opcode '{}'", tok.lexeme));
                return None;
            }
        };

        self.operation(op).map(|ins| IrNode::new(tok.line, ins))
    }

    fn operation(&mut self, op: Opcode) -> Option<Instruction> {
        match op {
            Opcode::Add    => self.op_arith(ArithOp::Add),
            Opcode::Sub    => self.op_arith(ArithOp::Sub),
            Opcode::Mult   => self.op_arith(ArithOp::Mult),
            Opcode::LShift => self.op_arith(ArithOp::LShift),
            Opcode::RShift => self.op_arith(ArithOp::RShift),

            Opcode::Load   => self.op_memory(MemoryOp::Load),
            Opcode::Store  => self.op_memory(MemoryOp::Store),

            Opcode::LoadI  => self.op_load_immediate(),

            // Output is the only opcode with a single
            // register operand, so it's just handled
            // inline.
            Opcode::Output => {
                let src = self.expect(TokenKind::Register, "Missing operand after 'output'")?;
                Some(Instruction::Output { src })
            },

            Opcode::Nop    => Some(Instruction::Nop),
        }
    }

    /// `op r1, r2 => r3`
    fn op_arith(&mut self, op: ArithOp) -> Option<Instruction> {
        let src1 = self.expect(TokenKind::Register, "Missing first operand");
        self.expect(TokenKind::Comma, "Missing comma between operands");
        let src2 = self.expect(TokenKind::Register, "Missing second operand");
        self.expect(TokenKind::AssignArrow, "Invalid assignment arrow");
        let dest = self.expect(TokenKind::Register, "Missing destination register");

        Some(Instruction::Arith { op, src1: src1?, src2: src2?, dest: dest? })
    }

    /// `op r1 => r2`
    fn op_memory(&mut self, op: MemoryOp) -> Option<Instruction> {
        let src = self.expect(TokenKind::Register, "Missing source operand");
        self.expect(TokenKind::AssignArrow, "Invalid assignment arrow");
        let dest = self.expect(TokenKind::Register, "Missing destination register");

        Some(Instruction::Memory { op, src: src?, dest: dest? })
    }

    /// `loadI c => r2`
    fn op_load_immediate(&mut self) -> Option<Instruction> {
        let value = self.expect(TokenKind::Constant, "Missing constant value");
        self.expect(TokenKind::AssignArrow, "Invalid assignment arrow");
        let dest = self.expect(TokenKind::Register, "Missing destination register");

        Some(Instruction::LoadI { value: value?, dest: dest? })
    }

    /// Consumes the next token if it is of the `expected` kind and returns
    /// its lexeme. Otherwise the token is left in place and `message` is
    /// reported against it, or against EOF if the stream is empty.
    fn expect(&mut self, expected: TokenKind, message: &str) -> Option<String> {
        let line = match self.peek().map(|tok| (tok.kind, tok.line)) {
            Some((kind, _)) if kind == expected => return self.consume().map(|tok| tok.lexeme),
            Some((_, line)) => Line::At(line),
            None => Line::Eof,
        };

        self.error(line, message);
        None
    }

    fn error<S: Into<String>>(&mut self, line: Line, message: S) {
        let diagnostic = Diagnostic::new(line, message);
        trace!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    #[inline]
    fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    /// Pops a token off the input stream and returns it.
    /// Returns None if no tokens are left.
    #[inline]
    fn consume(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }
}
