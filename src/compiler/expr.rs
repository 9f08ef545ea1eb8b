use crate::{
    ast::expressions::{AssignExpr, BinaryExpr, BinaryOp, CallExpr, Expr, UnaryExpr, UnaryOp},
    errors::errors::InternalError,
    symbols::symbol::Storage,
};

use super::{
    compiler::Compiler,
    emitter::{FALSE, FP, SP, T0, T1, TRUE, V0, ZERO},
};

/// Evaluates `expression`, leaving exactly one word on the stack.
pub fn gen_expression(compiler: &mut Compiler, expression: &Expr) -> Result<(), InternalError> {
    match expression {
        Expr::IntLit { value, .. } => {
            compiler.text.instruction("li", &[T0, &value.to_string()]);
            compiler.text.push(T0);
        }
        Expr::StrLit { value, .. } => {
            let label = compiler.string_label(value);
            compiler.text.instruction("la", &[T0, &label]);
            compiler.text.push(T0);
        }
        Expr::True(_) => {
            compiler.text.instruction("li", &[T0, TRUE]);
            compiler.text.push(T0);
        }
        Expr::False(_) => {
            compiler.text.instruction("li", &[T0, FALSE]);
            compiler.text.push(T0);
        }
        Expr::Id(id) => {
            let operand = match compiler.symbol_of(id)?.storage() {
                Some(Storage::Global { label }) => label.clone(),
                Some(Storage::Local { offset }) => format!("{}({})", offset, FP),
                _ => {
                    return Err(InternalError::UnexpectedNode {
                        expected: "variable",
                        found: id.name.clone(),
                    })
                }
            };
            compiler.text.instruction("lw", &[T0, &operand]);
            compiler.text.push(T0);
        }
        Expr::DotAccess(_) => {
            gen_address(compiler, expression)?;
            compiler.text.pop(T0);
            compiler.text.instruction("lw", &[T0, "0($t0)"]);
            compiler.text.push(T0);
        }
        Expr::Assign(assign) => gen_assign(compiler, assign)?,
        Expr::Call(call) => gen_call(compiler, call)?,
        Expr::Unary(unary) => gen_unary(compiler, unary)?,
        Expr::Binary(binary) => gen_binary(compiler, binary)?,
    }

    Ok(())
}

/// Pushes the address of a location instead of its value.
pub fn gen_address(compiler: &mut Compiler, expression: &Expr) -> Result<(), InternalError> {
    match expression {
        Expr::Id(id) => {
            let operand = match compiler.symbol_of(id)?.storage() {
                Some(Storage::Global { label }) => label.clone(),
                Some(Storage::Local { offset }) => format!("{}({})", offset, FP),
                _ => {
                    return Err(InternalError::UnexpectedNode {
                        expected: "variable",
                        found: id.name.clone(),
                    })
                }
            };
            compiler.text.instruction("la", &[T0, &operand]);
            compiler.text.push(T0);
        }
        Expr::DotAccess(dot) => {
            let offset = match compiler.symbol_of(&dot.field)?.storage() {
                Some(Storage::Field { offset }) => *offset,
                _ => {
                    return Err(InternalError::UnexpectedNode {
                        expected: "struct field",
                        found: dot.field.name.clone(),
                    })
                }
            };

            gen_address(compiler, &dot.loc)?;
            compiler.text.pop(T0);
            compiler
                .text
                .instruction_with_comment("addu", &[T0, T0, &offset.to_string()], &dot.field.name);
            compiler.text.push(T0);
        }
        other => {
            return Err(InternalError::UnexpectedNode {
                expected: "location",
                found: String::from(other.kind_name()),
            })
        }
    }

    Ok(())
}

/// Stores the value and leaves a copy of it on the stack.
pub fn gen_assign(compiler: &mut Compiler, assign: &AssignExpr) -> Result<(), InternalError> {
    gen_expression(compiler, &assign.value)?;
    gen_address(compiler, &assign.target)?;

    compiler.text.pop(T1);
    compiler.text.pop(T0);
    compiler.text.instruction("sw", &[T0, "0($t1)"]);
    compiler.text.push(T0);

    Ok(())
}

/// Arguments are pushed left to right; the caller pops them afterwards.
/// A non-void result is pushed from `$v0`.
pub fn gen_call(compiler: &mut Compiler, call: &CallExpr) -> Result<(), InternalError> {
    let function = compiler.function_of(&call.callee)?;

    for arg in call.args.iter() {
        gen_expression(compiler, arg)?;
    }

    compiler.text.instruction("jal", &[function.label.as_str()]);
    if function.params_size > 0 {
        compiler
            .text
            .instruction("addu", &[SP, SP, &function.params_size.to_string()]);
    }

    if !function.return_type.is_void_type() {
        compiler.text.push(V0);
    }

    Ok(())
}

/// Whether a call leaves a value on the stack.
pub fn call_has_result(compiler: &Compiler, call: &CallExpr) -> Result<bool, InternalError> {
    Ok(!compiler.function_of(&call.callee)?.return_type.is_void_type())
}

fn gen_unary(compiler: &mut Compiler, unary: &UnaryExpr) -> Result<(), InternalError> {
    gen_expression(compiler, &unary.operand)?;
    compiler.text.pop(T0);

    match unary.op {
        UnaryOp::Negate => compiler.text.instruction("subu", &[T0, ZERO, T0]),
        UnaryOp::Not => compiler.text.instruction("xori", &[T0, T0, TRUE]),
    }

    compiler.text.push(T0);
    Ok(())
}

fn gen_binary(compiler: &mut Compiler, binary: &BinaryExpr) -> Result<(), InternalError> {
    let opcode = match binary.op {
        BinaryOp::And | BinaryOp::Or => return gen_short_circuit(compiler, binary),
        BinaryOp::Plus => "add",
        BinaryOp::Minus => "sub",
        BinaryOp::Times => "mul",
        BinaryOp::Divide => "div",
        BinaryOp::Equals => "seq",
        BinaryOp::NotEquals => "sne",
        BinaryOp::Less => "slt",
        BinaryOp::Greater => "sgt",
        BinaryOp::LessEquals => "sle",
        BinaryOp::GreaterEquals => "sge",
    };

    gen_expression(compiler, &binary.lhs)?;
    gen_expression(compiler, &binary.rhs)?;

    compiler.text.pop(T1);
    compiler.text.pop(T0);
    compiler.text.instruction(opcode, &[T0, T0, T1]);
    compiler.text.push(T0);

    Ok(())
}

/// The left value stays on the stack as the result when it decides the
/// outcome; otherwise it is dropped and replaced by the right value.
fn gen_short_circuit(compiler: &mut Compiler, binary: &BinaryExpr) -> Result<(), InternalError> {
    let done = compiler.next_label();
    // `&&` is decided by a false left side, `||` by a true one.
    let branch = if binary.op == BinaryOp::And { "beq" } else { "bne" };

    gen_expression(compiler, &binary.lhs)?;
    compiler.text.instruction("lw", &[T0, "4($sp)"]);
    compiler.text.instruction(branch, &[T0, ZERO, &done]);

    compiler.text.pop(T0);
    gen_expression(compiler, &binary.rhs)?;
    compiler.text.label(&done);

    Ok(())
}

/// `loc++` / `loc--`.
pub fn gen_step(compiler: &mut Compiler, target: &Expr, step: i32) -> Result<(), InternalError> {
    gen_address(compiler, target)?;
    compiler.text.pop(T0);
    compiler.text.instruction("lw", &[T1, "0($t0)"]);
    compiler.text.instruction("addi", &[T1, T1, &step.to_string()]);
    compiler.text.instruction("sw", &[T1, "0($t0)"]);

    Ok(())
}
