//! Assembly lines and the buffers they are collected in.

use std::fmt::Display;

use log::trace;

pub const FP: &str = "$fp";
pub const SP: &str = "$sp";
pub const RA: &str = "$ra";
pub const V0: &str = "$v0";
pub const A0: &str = "$a0";
pub const T0: &str = "$t0";
pub const T1: &str = "$t1";
pub const ZERO: &str = "$zero";

pub const TRUE: &str = "1";
pub const FALSE: &str = "0";

/// Bytes one push or pop moves the stack pointer by.
pub const STACK_SLOT: u32 = 4;

/// One line of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmLine {
    /// A bare directive such as `.text` or `.align 2`.
    Directive(String),
    Label(String),
    /// A labelled data directive, `_g_x: .space 4`.
    Data { label: String, directive: String },
    Instruction {
        opcode: &'static str,
        operands: Vec<String>,
        comment: Option<String>,
    },
    Comment(String),
}

impl Display for AsmLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsmLine::Directive(directive) => write!(f, "\t{}", directive),
            AsmLine::Label(label) => write!(f, "{}:", label),
            AsmLine::Data { label, directive } => write!(f, "{}:\t{}", label, directive),
            AsmLine::Instruction {
                opcode,
                operands,
                comment,
            } => {
                write!(f, "\t{}", opcode)?;
                if !operands.is_empty() {
                    write!(f, "\t{}", operands.join(", "))?;
                }
                if let Some(comment) = comment {
                    write!(f, "\t\t# {}", comment)?;
                }
                Ok(())
            }
            AsmLine::Comment(comment) => write!(f, "\t# {}", comment),
        }
    }
}

/// Appends lines to one segment.
#[derive(Debug, Default)]
pub struct Emitter {
    lines: Vec<AsmLine>,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter { lines: vec![] }
    }

    pub fn instruction(&mut self, opcode: &'static str, operands: &[&str]) {
        self.push_line(AsmLine::Instruction {
            opcode,
            operands: operands.iter().map(|operand| operand.to_string()).collect(),
            comment: None,
        });
    }

    pub fn instruction_with_comment(&mut self, opcode: &'static str, operands: &[&str], comment: &str) {
        self.push_line(AsmLine::Instruction {
            opcode,
            operands: operands.iter().map(|operand| operand.to_string()).collect(),
            comment: Some(comment.to_string()),
        });
    }

    /// `sw reg, 0($sp)` then `subu $sp, $sp, 4`.
    pub fn push(&mut self, register: &str) {
        self.instruction_with_comment("sw", &[register, "0($sp)"], "PUSH");
        self.instruction("subu", &[SP, SP, &STACK_SLOT.to_string()]);
    }

    /// `lw reg, 4($sp)` then `addu $sp, $sp, 4`.
    pub fn pop(&mut self, register: &str) {
        self.instruction_with_comment("lw", &[register, "4($sp)"], "POP");
        self.instruction("addu", &[SP, SP, &STACK_SLOT.to_string()]);
    }

    pub fn label(&mut self, label: &str) {
        self.push_line(AsmLine::Label(label.to_string()));
    }

    pub fn directive(&mut self, directive: &str) {
        self.push_line(AsmLine::Directive(directive.to_string()));
    }

    pub fn data(&mut self, label: &str, directive: &str) {
        self.push_line(AsmLine::Data {
            label: label.to_string(),
            directive: directive.to_string(),
        });
    }

    pub fn comment(&mut self, comment: &str) {
        self.push_line(AsmLine::Comment(comment.to_string()));
    }

    pub fn lines(&self) -> &[AsmLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<AsmLine> {
        self.lines
    }

    fn push_line(&mut self, line: AsmLine) {
        trace!("emit {}", line);
        self.lines.push(line);
    }
}

/// A complete program: the data segment followed by the text segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    lines: Vec<AsmLine>,
}

impl Assembly {
    pub fn new(lines: Vec<AsmLine>) -> Self {
        Assembly { lines }
    }

    pub fn lines(&self) -> &[AsmLine] {
        &self.lines
    }

    /// Opcode and operands of every instruction, in order.
    pub fn instructions(&self) -> impl Iterator<Item = (&'static str, &[String])> + '_ {
        self.lines.iter().filter_map(|line| match line {
            AsmLine::Instruction {
                opcode, operands, ..
            } => Some((*opcode, operands.as_slice())),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().filter_map(|line| match line {
            AsmLine::Label(label) => Some(label.as_str()),
            AsmLine::Data { label, .. } => Some(label.as_str()),
            _ => None,
        })
    }
}

impl Display for Assembly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.lines.iter() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
