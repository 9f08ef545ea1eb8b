//! Main code generation module.
//!
//! This module contains the core Compiler structure and drives the
//! translation of a checked program into MIPS assembly. Globals go to the
//! data segment, functions to the text segment, and every function is
//! compiled through a fixed sequence of phases.

use std::{collections::HashMap, fmt::Display};

use log::{debug, info};

use crate::{
    ast::ast::{Decl, FnDecl, IdNode, Program, VarDecl},
    context::{CompilationContext, LabelAllocator},
    errors::errors::InternalError,
    symbols::symbol::{FunctionSymbol, Storage, Symbol, SymbolArena, SymbolId},
};

use super::{
    emitter::{AsmLine, Assembly, Emitter, FP, RA, SP, T0, V0},
    stmt::gen_block,
};

/// Steps every function goes through, in this order only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionPhase {
    Entry,
    Prologue,
    Body,
    Epilogue,
    Exit,
}

impl FunctionPhase {
    fn can_advance_to(self, next: FunctionPhase) -> bool {
        matches!(
            (self, next),
            (FunctionPhase::Entry, FunctionPhase::Prologue)
                | (FunctionPhase::Prologue, FunctionPhase::Body)
                | (FunctionPhase::Body, FunctionPhase::Epilogue)
                | (FunctionPhase::Epilogue, FunctionPhase::Exit)
        )
    }
}

impl Display for FunctionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The function currently being compiled.
#[derive(Debug)]
pub struct FunctionFrame {
    pub name: String,
    /// Where every return path jumps to; the epilogue starts here.
    pub exit_label: String,
    pub is_main: bool,
    pub phase: FunctionPhase,
}

/// The state of one code generation run.
///
/// This structure holds:
/// - The symbol arena the program's identifiers point into
/// - The run's label allocator
/// - One buffer per segment
/// - The string literal pool
/// - The enclosing loops and the function being compiled
pub struct Compiler<'a> {
    /// Symbols resolved by the analysis passes
    pub symbols: &'a SymbolArena,
    /// Label counter shared with the rest of the compilation run
    pub labels: &'a mut LabelAllocator,

    /// Static data: globals and string literals
    pub data: Emitter,
    /// Executable code
    pub text: Emitter,

    /// Literal source text to the data label holding it
    pub strings: HashMap<String, String>,
    /// Exit labels of the enclosing loops, innermost last
    pub loop_exits: Vec<String>,
    /// Set between the entry and exit of a function
    pub function: Option<FunctionFrame>,
}

impl<'a> Compiler<'a> {
    /// Creates a new Compiler instance.
    ///
    /// # Arguments
    ///
    /// * `symbols` - The symbol arena filled by name resolution
    /// * `labels` - The label allocator of the compilation run
    pub fn new(symbols: &'a SymbolArena, labels: &'a mut LabelAllocator) -> Self {
        Compiler {
            symbols,
            labels,
            data: Emitter::new(),
            text: Emitter::new(),
            strings: HashMap::new(),
            loop_exits: vec![],
            function: None,
        }
    }

    pub fn next_label(&mut self) -> String {
        self.labels.next_label()
    }

    /// The symbol an identifier was resolved to.
    pub fn symbol_of(&self, id: &IdNode) -> Result<&'a Symbol, InternalError> {
        let symbols = self.symbols;
        symbols.get(resolved(id)?)
    }

    /// The function symbol an identifier was resolved to.
    pub fn function_of(&self, id: &IdNode) -> Result<&'a FunctionSymbol, InternalError> {
        match self.symbol_of(id)? {
            Symbol::Function(function) => Ok(function),
            other => Err(InternalError::UnexpectedNode {
                expected: "function symbol",
                found: other.name().to_string(),
            }),
        }
    }

    /// Returns the data label of a string literal, adding it to the pool
    /// the first time it is seen.
    ///
    /// # Arguments
    ///
    /// * `literal` - The literal as written, quotes included
    pub fn string_label(&mut self, literal: &str) -> String {
        if let Some(label) = self.strings.get(literal) {
            return label.clone();
        }

        let label = self.next_label();
        self.data.data(&label, &format!(".asciiz {}", literal));
        self.strings.insert(literal.to_string(), label.clone());

        label
    }

    /// Label every return path of the current function jumps to.
    pub fn exit_label(&self) -> Result<String, InternalError> {
        self.function
            .as_ref()
            .map(|frame| frame.exit_label.clone())
            .ok_or(InternalError::NoEnclosingFunction {
                construct: "return statement",
            })
    }

    /// Exit label of the innermost loop being compiled.
    pub fn current_loop_exit(&self) -> Option<&str> {
        self.loop_exits.last().map(|label| label.as_str())
    }

    pub fn phase(&self) -> Option<FunctionPhase> {
        self.function.as_ref().map(|frame| frame.phase)
    }

    /// Moves the current function to `next`, failing on anything but the
    /// next phase in order.
    pub fn advance_phase(&mut self, next: FunctionPhase) -> Result<(), InternalError> {
        let frame = self
            .function
            .as_mut()
            .ok_or(InternalError::NoEnclosingFunction {
                construct: "function phase",
            })?;

        if !frame.phase.can_advance_to(next) {
            return Err(InternalError::IllegalTransition {
                from: frame.phase.to_string(),
                to: next.to_string(),
            });
        }

        debug!("{}: {} -> {}", frame.name, frame.phase, next);
        frame.phase = next;
        Ok(())
    }

    /// Fails unless the current function is in `expected`.
    pub fn require_phase(&self, expected: FunctionPhase, construct: &'static str) -> Result<(), InternalError> {
        match self.phase() {
            Some(phase) if phase == expected => Ok(()),
            Some(phase) => Err(InternalError::IllegalTransition {
                from: phase.to_string(),
                to: format!("{} in {}", construct, expected),
            }),
            None => Err(InternalError::NoEnclosingFunction { construct }),
        }
    }

    /// Generates code for every top-level declaration.
    fn gen(&mut self, program: &Program) -> Result<(), InternalError> {
        for decl in program.decls.iter() {
            match decl {
                Decl::Var(var) => self.gen_global(var)?,
                Decl::Fn(function) => self.gen_function(function)?,
                Decl::Struct(_) => {}
            }
        }

        Ok(())
    }

    /// Reserves a word-aligned data slot for a global.
    fn gen_global(&mut self, var: &VarDecl) -> Result<(), InternalError> {
        let symbol = resolved(&var.id)?;
        let label = match self.symbols.get(symbol)?.storage() {
            Some(Storage::Global { label }) => label.clone(),
            _ => {
                return Err(InternalError::UnexpectedNode {
                    expected: "global storage",
                    found: var.id.name.clone(),
                })
            }
        };
        let size = self.symbols.size_of(symbol)?;

        self.data.directive(".align 2");
        self.data.data(&label, &format!(".space {}", size));

        Ok(())
    }

    /// Compiles one function through `Entry -> Prologue -> Body -> Epilogue -> Exit`.
    ///
    /// The activation record, from the frame pointer down:
    /// - `0($fp)` the saved return address
    /// - `-4($fp)` the caller's frame pointer
    /// - locals, starting at `-8($fp)`
    ///
    /// Parameters sit above the frame pointer where the caller pushed them.
    fn gen_function(&mut self, function: &FnDecl) -> Result<(), InternalError> {
        let symbol = self.function_of(&function.id)?;
        let name = function.id.name.clone();
        let is_main = name == "main";
        debug!("compiling function {} ({} bytes of locals)", name, symbol.locals_size);

        let exit_label = self.next_label();
        self.function = Some(FunctionFrame {
            name: name.clone(),
            exit_label: exit_label.clone(),
            is_main,
            phase: FunctionPhase::Entry,
        });

        self.text.comment(&format!("function {}", name));
        self.text.label(&symbol.label);
        if is_main {
            self.text.label("__start");
        }

        self.advance_phase(FunctionPhase::Prologue)?;
        self.text.push(RA);
        self.text.push(FP);
        self.text.instruction("addu", &[FP, SP, "8"]);
        if symbol.locals_size > 0 {
            self.text
                .instruction("subu", &[SP, SP, &symbol.locals_size.to_string()]);
        }

        self.advance_phase(FunctionPhase::Body)?;
        gen_block(self, &function.body)?;

        self.advance_phase(FunctionPhase::Epilogue)?;
        self.text.label(&exit_label);
        self.text.instruction_with_comment("lw", &[RA, "0($fp)"], "load return address");
        self.text.instruction_with_comment("move", &[T0, FP], "save control link");
        self.text.instruction_with_comment("lw", &[FP, "-4($fp)"], "restore frame pointer");
        self.text.instruction_with_comment("move", &[SP, T0], "restore stack pointer");

        self.advance_phase(FunctionPhase::Exit)?;
        if is_main {
            self.text.instruction("li", &[V0, "10"]);
            self.text.instruction("syscall", &[]);
        } else {
            self.text.instruction("jr", &[RA]);
        }

        self.function = None;
        Ok(())
    }

    /// Joins both segments into the final program.
    fn finish(self) -> Assembly {
        let mut lines = vec![AsmLine::Directive(String::from(".data"))];
        lines.extend(self.data.into_lines());
        lines.push(AsmLine::Directive(String::from(".text")));
        lines.push(AsmLine::Directive(String::from(".globl main")));
        lines.extend(self.text.into_lines());

        Assembly::new(lines)
    }
}

/// The symbol handle name resolution stored on `id`.
pub fn resolved(id: &IdNode) -> Result<SymbolId, InternalError> {
    id.symbol.ok_or_else(|| InternalError::UnresolvedIdentifier {
        name: id.name.clone(),
    })
}

/// The main compile function: turns a checked program into assembly.
///
/// Must only run on a program that analysis accepted without diagnostics.
///
/// # Arguments
///
/// * `program` - The resolved, type-checked program
/// * `context` - The compilation context holding its symbols and labels
///
/// # Returns
///
/// The complete assembly, or the internal error that stopped generation.
pub fn compile(program: &Program, context: &mut CompilationContext) -> Result<Assembly, InternalError> {
    info!("generating code for {} declaration(s)", program.decls.len());

    let mut compiler = Compiler::new(&context.symbols, &mut context.labels);
    compiler.gen(program)?;

    let assembly = compiler.finish();
    info!("emitted {} line(s)", assembly.lines().len());

    Ok(assembly)
}
