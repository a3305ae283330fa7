//! This IR describes a structurally valid ILOC program.
//!
//! Comments start with `//` and run to the end of the line.
//! Instructions are written one per line, although the grammar
//! itself never looks at line breaks.
//!
//! Supported Instructions:
//!
//! ```text
//! load   r1 => r2      // r2 <= MEM[r1]
//! loadI  c  => r2      // r2 <= c
//! store  r1 => r2      // MEM[r2] <= r1
//! add    r1, r2 => r3  // r3 <= r1 + r2
//! sub    r1, r2 => r3  // r3 <= r1 - r2
//! mult   r1, r2 => r3  // r3 <= r1 * r2
//! lshift r1, r2 => r3  // r3 <= r1 << r2
//! rshift r1, r2 => r3  // r3 <= r1 >> r2
//! output r1            // print MEM[r1]
//! nop                  // no-op
//! ```
//!
//! Registers are `r` followed by a non-negative integer (`r0`, `r25`,
//! `r003`). Constants are non-negative integers. Neither is range
//! checked here; operands are kept as the text they were written as.

use std::fmt;

pub type Register = String;
pub type Constant = String;

/// The ten opcodes the scanner recognizes. Names are case-sensitive.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Opcode {
    Load,
    LoadI,
    Store,
    Add,
    Sub,
    Mult,
    LShift,
    RShift,
    Output,
    Nop,
}

impl Opcode {
    pub const ALL: [Opcode; 10] = [
        Opcode::Load,
        Opcode::LoadI,
        Opcode::Store,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mult,
        Opcode::LShift,
        Opcode::RShift,
        Opcode::Output,
        Opcode::Nop,
    ];

    pub fn from_name(name: &str) -> Option<Opcode> {
        use Opcode::*;
        match name {
            "load"   => Some(Load),
            "loadI"  => Some(LoadI),
            "store"  => Some(Store),
            "add"    => Some(Add),
            "sub"    => Some(Sub),
            "mult"   => Some(Mult),
            "lshift" => Some(LShift),
            "rshift" => Some(RShift),
            "output" => Some(Output),
            "nop"    => Some(Nop),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        use Opcode::*;
        match self {
            Load   => "load",
            LoadI  => "loadI",
            Store  => "store",
            Add    => "add",
            Sub    => "sub",
            Mult   => "mult",
            LShift => "lshift",
            RShift => "rshift",
            Output => "output",
            Nop    => "nop",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Opcodes of the form `op r1, r2 => r3`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ArithOp {
    Add,
    Sub,
    Mult,
    LShift,
    RShift,
}

/// Opcodes of the form `op r1 => r2`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MemoryOp {
    Load,
    Store,
}

impl From<ArithOp> for Opcode {
    fn from(op: ArithOp) -> Opcode {
        match op {
            ArithOp::Add    => Opcode::Add,
            ArithOp::Sub    => Opcode::Sub,
            ArithOp::Mult   => Opcode::Mult,
            ArithOp::LShift => Opcode::LShift,
            ArithOp::RShift => Opcode::RShift,
        }
    }
}

impl From<MemoryOp> for Opcode {
    fn from(op: MemoryOp) -> Opcode {
        match op {
            MemoryOp::Load  => Opcode::Load,
            MemoryOp::Store => Opcode::Store,
        }
    }
}

/// One instruction, shaped by its opcode family. Each variant only
/// carries the operands its family actually has.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
    Arith  { op: ArithOp, src1: Register, src2: Register, dest: Register },
    Memory { op: MemoryOp, src: Register, dest: Register },
    LoadI  { value: Constant, dest: Register },
    Output { src: Register },
    Nop,
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Arith { op, .. }  => Opcode::from(*op),
            Instruction::Memory { op, .. } => Opcode::from(*op),
            Instruction::LoadI { .. }      => Opcode::LoadI,
            Instruction::Output { .. }     => Opcode::Output,
            Instruction::Nop               => Opcode::Nop,
        }
    }

    /// Operands left of the arrow, in source order.
    pub fn sources(&self) -> Vec<&str> {
        match self {
            Instruction::Arith { src1, src2, .. } => vec![src1.as_str(), src2.as_str()],
            Instruction::Memory { src, .. }       => vec![src.as_str()],
            Instruction::LoadI { value, .. }      => vec![value.as_str()],
            Instruction::Output { src }           => vec![src.as_str()],
            Instruction::Nop                      => vec![],
        }
    }

    /// The register right of the arrow, if the instruction has one.
    pub fn destination(&self) -> Option<&str> {
        match self {
            Instruction::Arith { dest, .. }  |
            Instruction::Memory { dest, .. } |
            Instruction::LoadI { dest, .. }  => Some(dest.as_str()),
            Instruction::Output { .. } |
            Instruction::Nop                 => None,
        }
    }
}

/// A parsed instruction together with the line its opcode was on.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IrNode {
    pub line: usize,
    pub instruction: Instruction,
}

impl IrNode {
    pub fn new(line: usize, instruction: Instruction) -> Self {
        IrNode { line, instruction }
    }

    pub fn opcode(&self) -> Opcode {
        self.instruction.opcode()
    }
}

impl fmt::Display for IrNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.opcode())?;
        match &self.instruction {
            Instruction::Arith { src1, src2, dest, .. } =>
                write!(f, "\n  src1: {}\n  src2: {}\n  dest: {}", src1, src2, dest),
            Instruction::Memory { src, dest, .. } =>
                write!(f, "\n  src: {}\n  dest: {}", src, dest),
            Instruction::LoadI { value, dest } =>
                write!(f, "\n  val: {}\n  dest: {}", value, dest),
            Instruction::Output { src } =>
                write!(f, "\n  src: {}", src),
            Instruction::Nop => Ok(()),
        }
    }
}
