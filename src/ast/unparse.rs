//! Canonical source rendering of a program tree.
//!
//! Output is fully parenthesised and indented four spaces per level. Without
//! a symbol arena it parses back to the same tree; with one, each resolved
//! identifier is followed by its symbol's type, e.g. `x(int)`.

use std::fmt::Write;

use crate::symbols::symbol::SymbolArena;

use super::{
    ast::{Block, Decl, FnDecl, FormalDecl, IdNode, Program, StructDecl, TypeNode, VarDecl},
    expressions::Expr,
    statements::Stmt,
};

const INDENT: &str = "    ";

pub fn unparse(program: &Program, symbols: Option<&SymbolArena>) -> String {
    let mut unparser = Unparser {
        symbols,
        out: String::new(),
    };
    unparser.program(program);
    unparser.out
}

struct Unparser<'a> {
    symbols: Option<&'a SymbolArena>,
    out: String,
}

impl Unparser<'_> {
    fn indent(&mut self, level: usize) {
        self.out.push_str(&INDENT.repeat(level));
    }

    fn id(&self, id: &IdNode) -> String {
        let symbol = self
            .symbols
            .zip(id.symbol)
            .and_then(|(symbols, symbol)| symbols.get(symbol).ok());

        match symbol {
            Some(symbol) => format!("{}({})", id.name, symbol),
            None => id.name.clone(),
        }
    }

    fn type_node(&self, ty: &TypeNode) -> String {
        match ty {
            TypeNode::Int => String::from("int"),
            TypeNode::Bool => String::from("bool"),
            TypeNode::Void => String::from("void"),
            TypeNode::Struct(id) => format!("struct {}", self.id(id)),
        }
    }

    fn program(&mut self, program: &Program) {
        for decl in &program.decls {
            match decl {
                Decl::Var(var) => self.var_decl(var, 0),
                Decl::Fn(function) => self.fn_decl(function),
                Decl::Struct(def) => self.struct_decl(def),
            }
        }
    }

    fn var_decl(&mut self, var: &VarDecl, level: usize) {
        self.indent(level);
        let line = format!("{} {};\n", self.type_node(&var.ty), self.id(&var.id));
        self.out.push_str(&line);
    }

    fn formal(&self, formal: &FormalDecl) -> String {
        format!("{} {}", self.type_node(&formal.ty), self.id(&formal.id))
    }

    fn fn_decl(&mut self, function: &FnDecl) {
        let formals = function
            .formals
            .iter()
            .map(|formal| self.formal(formal))
            .collect::<Vec<String>>()
            .join(", ");
        let header = format!(
            "{} {}({}) ",
            self.type_node(&function.return_type),
            self.id(&function.id),
            formals
        );

        self.out.push_str(&header);
        self.block(&function.body, 0);
        self.out.push('\n');
    }

    fn struct_decl(&mut self, def: &StructDecl) {
        let header = format!("struct {} {{\n", self.id(&def.id));
        self.out.push_str(&header);
        for field in &def.fields {
            self.var_decl(field, 1);
        }
        self.out.push_str("};\n\n");
    }

    /// Emits `{ ... }` whose closing brace sits at `level`.
    fn block(&mut self, block: &Block, level: usize) {
        self.out.push_str("{\n");
        for decl in &block.decls {
            self.var_decl(decl, level + 1);
        }
        for stmt in &block.stmts {
            self.stmt(stmt, level + 1);
        }
        self.indent(level);
        self.out.push_str("}\n");
    }

    fn stmt(&mut self, stmt: &Stmt, level: usize) {
        self.indent(level);

        let line = match stmt {
            Stmt::Assign(assign) => format!(
                "{} = {};\n",
                self.expr(&assign.target),
                self.expr(&assign.value)
            ),
            Stmt::PostInc(target) => format!("{}++;\n", self.expr(target)),
            Stmt::PostDec(target) => format!("{}--;\n", self.expr(target)),
            Stmt::Read(target) => format!("cin >> {};\n", self.expr(target)),
            Stmt::Write(value) => format!("cout << {};\n", self.expr(value)),
            Stmt::Call(call) => format!("{};\n", self.expr(&Expr::Call(call.clone()))),
            Stmt::Return(ret) => match &ret.value {
                Some(value) => format!("return {};\n", self.expr(value)),
                None => String::from("return;\n"),
            },
            Stmt::If(stmt) => {
                let header = format!("if ({}) ", self.expr(&stmt.condition));
                self.out.push_str(&header);
                self.block(&stmt.then_body, level);
                return;
            }
            Stmt::IfElse(stmt) => {
                let header = format!("if ({}) ", self.expr(&stmt.condition));
                self.out.push_str(&header);
                self.block(&stmt.then_body, level);
                self.indent(level);
                self.out.push_str("else ");
                self.block(&stmt.else_body, level);
                return;
            }
            Stmt::While(stmt) => {
                let header = format!("while ({}) ", self.expr(&stmt.condition));
                self.out.push_str(&header);
                self.block(&stmt.body, level);
                return;
            }
            Stmt::Repeat(stmt) => {
                let header = format!("repeat ({}) ", self.expr(&stmt.count));
                self.out.push_str(&header);
                self.block(&stmt.body, level);
                return;
            }
        };

        self.out.push_str(&line);
    }

    fn expr(&self, expr: &Expr) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = match expr {
            Expr::IntLit { value, .. } => write!(out, "{}", value),
            Expr::StrLit { value, .. } => write!(out, "{}", value),
            Expr::True(_) => write!(out, "true"),
            Expr::False(_) => write!(out, "false"),
            Expr::Id(id) => write!(out, "{}", self.id(id)),
            Expr::DotAccess(dot) => write!(out, "{}.{}", self.expr(&dot.loc), self.id(&dot.field)),
            Expr::Assign(assign) => write!(
                out,
                "({} = {})",
                self.expr(&assign.target),
                self.expr(&assign.value)
            ),
            Expr::Call(call) => {
                let args = call
                    .args
                    .iter()
                    .map(|arg| self.expr(arg))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(out, "{}({})", self.id(&call.callee), args)
            }
            Expr::Unary(unary) => write!(out, "({}{})", unary.op, self.expr(&unary.operand)),
            Expr::Binary(binary) => write!(
                out,
                "({} {} {})",
                self.expr(&binary.lhs),
                binary.op,
                self.expr(&binary.rhs)
            ),
        };

        out
    }
}
