//! Per-compilation state shared by the passes.
//!
//! Nothing here is global: two compilations with their own contexts never
//! observe each other's symbols, diagnostics or labels.

use log::trace;

use crate::{errors::diagnostics::Diagnostics, symbols::symbol::SymbolArena};

#[derive(Debug, Default)]
pub struct CompilationContext {
    pub symbols: SymbolArena,
    pub diagnostics: Diagnostics,
    /// Set by name resolution when a function named `main` is declared.
    pub main_declared: bool,
    pub labels: LabelAllocator,
}

impl CompilationContext {
    pub fn new() -> Self {
        CompilationContext {
            symbols: SymbolArena::new(),
            diagnostics: Diagnostics::new(),
            main_declared: false,
            labels: LabelAllocator::new(),
        }
    }
}

/// Hands out `.L0`, `.L1`, ... in strictly increasing order.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    next: u32,
}

impl LabelAllocator {
    pub fn new() -> Self {
        LabelAllocator { next: 0 }
    }

    pub fn next_label(&mut self) -> String {
        let label = format!(".L{}", self.next);
        self.next += 1;
        trace!("allocated label {}", label);
        label
    }

    pub fn allocated(&self) -> u32 {
        self.next
    }
}
