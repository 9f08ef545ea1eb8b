use log::trace;

use crate::{
    ast::{ast::Block, statements::Stmt},
    errors::errors::InternalError,
    type_checker::type_checker::infer_type,
};

use super::{
    compiler::{Compiler, FunctionPhase},
    emitter::{A0, T0, V0, ZERO},
    expr::{call_has_result, gen_address, gen_assign, gen_call, gen_expression, gen_step},
};

/// Declarations in a block emit nothing; their slots were reserved by the
/// function prologue.
pub fn gen_block(compiler: &mut Compiler, block: &Block) -> Result<(), InternalError> {
    for stmt in block.stmts.iter() {
        gen_statement(compiler, stmt)?;
    }

    Ok(())
}

/// Every statement leaves the stack as it found it.
pub fn gen_statement(compiler: &mut Compiler, statement: &Stmt) -> Result<(), InternalError> {
    match statement {
        Stmt::Assign(assign) => {
            gen_assign(compiler, assign)?;
            compiler.text.pop(T0);
        }
        Stmt::PostInc(target) => gen_step(compiler, target, 1)?,
        Stmt::PostDec(target) => gen_step(compiler, target, -1)?,
        Stmt::Read(target) => {
            compiler.text.instruction_with_comment("li", &[V0, "5"], "read");
            compiler.text.instruction("syscall", &[]);
            gen_address(compiler, target)?;
            compiler.text.pop(T0);
            compiler.text.instruction("sw", &[V0, "0($t0)"]);
        }
        Stmt::Write(value) => {
            let syscall = if infer_type(value, compiler.symbols)?.is_string_type() {
                "4"
            } else {
                "1"
            };

            gen_expression(compiler, value)?;
            compiler.text.pop(A0);
            compiler.text.instruction_with_comment("li", &[V0, syscall], "write");
            compiler.text.instruction("syscall", &[]);
        }
        Stmt::If(stmt) => {
            let end = compiler.next_label();

            gen_expression(compiler, &stmt.condition)?;
            compiler.text.pop(T0);
            compiler.text.instruction("beq", &[T0, ZERO, &end]);
            gen_block(compiler, &stmt.then_body)?;
            compiler.text.label(&end);
        }
        Stmt::IfElse(stmt) => {
            let else_label = compiler.next_label();
            let end = compiler.next_label();

            gen_expression(compiler, &stmt.condition)?;
            compiler.text.pop(T0);
            compiler.text.instruction("beq", &[T0, ZERO, &else_label]);
            gen_block(compiler, &stmt.then_body)?;
            compiler.text.instruction("b", &[end.as_str()]);
            compiler.text.label(&else_label);
            gen_block(compiler, &stmt.else_body)?;
            compiler.text.label(&end);
        }
        Stmt::While(stmt) => {
            let top = compiler.next_label();
            let exit = compiler.next_label();

            compiler.text.label(&top);
            gen_expression(compiler, &stmt.condition)?;
            compiler.text.pop(T0);
            compiler.text.instruction("beq", &[T0, ZERO, &exit]);

            gen_loop_body(compiler, &stmt.body, &exit)?;

            compiler.text.instruction("b", &[top.as_str()]);
            compiler.text.label(&exit);
        }
        Stmt::Repeat(stmt) => {
            let top = compiler.next_label();
            let exit = compiler.next_label();

            // The count stays on the stack as the remaining-iterations counter.
            gen_expression(compiler, &stmt.count)?;
            compiler.text.label(&top);
            compiler.text.instruction_with_comment("lw", &[T0, "4($sp)"], "repeat counter");
            compiler.text.instruction("blez", &[T0, &exit]);

            gen_loop_body(compiler, &stmt.body, &exit)?;

            compiler.text.instruction("lw", &[T0, "4($sp)"]);
            compiler.text.instruction("subu", &[T0, T0, "1"]);
            compiler.text.instruction("sw", &[T0, "4($sp)"]);
            compiler.text.instruction("b", &[top.as_str()]);
            compiler.text.label(&exit);
            compiler.text.pop(T0);
        }
        Stmt::Call(call) => {
            let has_result = call_has_result(compiler, call)?;
            gen_call(compiler, call)?;
            if has_result {
                compiler.text.pop(T0);
            }
        }
        Stmt::Return(ret) => {
            compiler.require_phase(FunctionPhase::Body, "return statement")?;
            let exit = compiler.exit_label()?;

            if let Some(value) = &ret.value {
                gen_expression(compiler, value)?;
                compiler.text.pop(V0);
            }
            compiler.text.instruction_with_comment("b", &[exit.as_str()], "return");
        }
    }

    Ok(())
}

/// Compiles a loop body with `exit` as the innermost loop exit.
fn gen_loop_body(compiler: &mut Compiler, body: &Block, exit: &str) -> Result<(), InternalError> {
    compiler.loop_exits.push(exit.to_string());
    trace!("entering loop, exit {}", exit);

    let result = gen_block(compiler, body);

    compiler.loop_exits.pop();
    result
}
