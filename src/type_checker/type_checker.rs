use log::{debug, info};

use crate::{
    ast::{
        ast::{Block, Decl, FnDecl, IdNode, Program},
        expressions::{AssignExpr, BinaryExpr, BinaryOp, CallExpr, Expr, UnaryExpr, UnaryOp},
        statements::{ReturnStmt, Stmt},
    },
    context::CompilationContext,
    errors::{
        diagnostics::Diagnostics,
        errors::{ErrorImpl, InternalError},
    },
    name_resolver::name_resolver::scalar_type,
    symbols::symbol::{Symbol, SymbolArena},
    Position,
};

use super::types::Type;

pub struct TypeChecker<'a> {
    pub symbols: &'a SymbolArena,
    /// `None` when types are only being inferred, e.g. by code generation.
    pub diagnostics: Option<&'a mut Diagnostics>,
    /// Declared return type of the function whose body is being checked.
    pub return_type: Option<Type>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(symbols: &'a SymbolArena, diagnostics: &'a mut Diagnostics) -> Self {
        TypeChecker {
            symbols,
            diagnostics: Some(diagnostics),
            return_type: None,
        }
    }

    /// A checker that computes types without reporting anything.
    pub fn quiet(symbols: &'a SymbolArena) -> Self {
        TypeChecker {
            symbols,
            diagnostics: None,
            return_type: None,
        }
    }

    fn report(&mut self, error: ErrorImpl, position: Position) {
        if let Some(diagnostics) = self.diagnostics.as_mut() {
            diagnostics.report(error, position);
        }
    }
}

/// Checks every function body in `program`. Expects a program that name
/// resolution accepted.
pub fn type_check(program: &Program, context: &mut CompilationContext) -> Result<(), InternalError> {
    info!("type checking {} declaration(s)", program.decls.len());
    let mut type_checker = TypeChecker::new(&context.symbols, &mut context.diagnostics);

    for decl in program.decls.iter() {
        if let Decl::Fn(function) = decl {
            type_check_fn(&mut type_checker, function)?;
        }
    }

    Ok(())
}

/// The type of `expr`, computed without diagnostics.
pub fn infer_type(expr: &Expr, symbols: &SymbolArena) -> Result<Type, InternalError> {
    type_check_expr(&mut TypeChecker::quiet(symbols), expr)
}

fn type_check_fn(type_checker: &mut TypeChecker, function: &FnDecl) -> Result<(), InternalError> {
    debug!("checking function {}", function.id.name);

    let enclosing = type_checker
        .return_type
        .replace(scalar_type(&function.return_type)?);
    type_check_block(type_checker, &function.body)?;
    type_checker.return_type = enclosing;

    Ok(())
}

pub fn type_check_block(type_checker: &mut TypeChecker, block: &Block) -> Result<(), InternalError> {
    for stmt in block.stmts.iter() {
        type_check_stmt(type_checker, stmt)?;
    }

    Ok(())
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &Stmt) -> Result<(), InternalError> {
    match stmt {
        Stmt::Assign(assign) => {
            type_check_assign(type_checker, assign)?;
        }
        Stmt::PostInc(target) | Stmt::PostDec(target) => {
            let ty = type_check_expr(type_checker, target)?;
            if !ty.is_error_type() && !ty.is_int_type() {
                type_checker.report(ErrorImpl::ArithmeticOnNonNumeric, target.position());
            }
        }
        Stmt::Read(target) => {
            let ty = type_check_expr(type_checker, target)?;
            let error = if ty.is_fn_type() {
                Some(ErrorImpl::ReadFunction)
            } else if ty.is_struct_def_type() {
                Some(ErrorImpl::ReadStructName)
            } else if ty.is_struct_type() {
                Some(ErrorImpl::ReadStructVariable)
            } else {
                None
            };

            if let Some(error) = error {
                type_checker.report(error, target.position());
            }
        }
        Stmt::Write(value) => {
            let ty = type_check_expr(type_checker, value)?;
            let error = if ty.is_fn_type() {
                Some(ErrorImpl::WriteFunction)
            } else if ty.is_struct_def_type() {
                Some(ErrorImpl::WriteStructName)
            } else if ty.is_struct_type() {
                Some(ErrorImpl::WriteStructVariable)
            } else if ty.is_void_type() {
                Some(ErrorImpl::WriteVoid)
            } else {
                None
            };

            if let Some(error) = error {
                type_checker.report(error, value.position());
            }
        }
        Stmt::If(stmt) => {
            type_check_condition(type_checker, &stmt.condition, ErrorImpl::NonBoolIfCondition)?;
            type_check_block(type_checker, &stmt.then_body)?;
        }
        Stmt::IfElse(stmt) => {
            type_check_condition(type_checker, &stmt.condition, ErrorImpl::NonBoolIfCondition)?;
            type_check_block(type_checker, &stmt.then_body)?;
            type_check_block(type_checker, &stmt.else_body)?;
        }
        Stmt::While(stmt) => {
            type_check_condition(type_checker, &stmt.condition, ErrorImpl::NonBoolWhileCondition)?;
            type_check_block(type_checker, &stmt.body)?;
        }
        Stmt::Repeat(stmt) => {
            let ty = type_check_expr(type_checker, &stmt.count)?;
            if !ty.is_error_type() && !ty.is_int_type() {
                type_checker.report(ErrorImpl::NonIntegerRepeatClause, stmt.count.position());
            }
            type_check_block(type_checker, &stmt.body)?;
        }
        Stmt::Call(call) => {
            type_check_call(type_checker, call)?;
        }
        Stmt::Return(ret) => type_check_return(type_checker, ret)?,
    }

    Ok(())
}

fn type_check_condition(
    type_checker: &mut TypeChecker,
    condition: &Expr,
    error: ErrorImpl,
) -> Result<(), InternalError> {
    let ty = type_check_expr(type_checker, condition)?;
    if !ty.is_error_type() && !ty.is_bool_type() {
        type_checker.report(error, condition.position());
    }

    Ok(())
}

fn type_check_return(type_checker: &mut TypeChecker, ret: &ReturnStmt) -> Result<(), InternalError> {
    let return_type = type_checker
        .return_type
        .clone()
        .ok_or(InternalError::NoEnclosingFunction {
            construct: "return statement",
        })?;

    match &ret.value {
        Some(value) => {
            let ty = type_check_expr(type_checker, value)?;

            if return_type.is_void_type() {
                type_checker.report(ErrorImpl::ReturnValueInVoidFunction, value.position());
            } else if !ty.is_error_type() && !return_type.equals(&ty) {
                let error = ErrorImpl::BadReturnValue {
                    expected: return_type.to_string(),
                    received: ty.to_string(),
                };
                type_checker.report(error, value.position());
            }
        }
        None => {
            if !return_type.is_void_type() {
                type_checker.report(ErrorImpl::MissingReturnValue, ret.position);
            }
        }
    }

    Ok(())
}

pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &Expr) -> Result<Type, InternalError> {
    match expr {
        Expr::IntLit { .. } => Ok(Type::Int),
        Expr::StrLit { .. } => Ok(Type::String),
        Expr::True(_) | Expr::False(_) => Ok(Type::Bool),
        Expr::Id(id) => id_type(type_checker, id),
        Expr::DotAccess(dot) => id_type(type_checker, &dot.field),
        Expr::Assign(assign) => type_check_assign(type_checker, assign),
        Expr::Call(call) => type_check_call(type_checker, call),
        Expr::Unary(unary) => type_check_unary(type_checker, unary),
        Expr::Binary(binary) => type_check_binary(type_checker, binary),
    }
}

/// Unresolved identifiers were reported by name resolution already.
fn id_type(type_checker: &TypeChecker, id: &IdNode) -> Result<Type, InternalError> {
    match id.symbol {
        Some(symbol) => Ok(type_checker.symbols.get(symbol)?.ty()),
        None => Ok(Type::Error),
    }
}

fn type_check_assign(type_checker: &mut TypeChecker, assign: &AssignExpr) -> Result<Type, InternalError> {
    let target = type_check_expr(type_checker, &assign.target)?;
    let value = type_check_expr(type_checker, &assign.value)?;

    if target.is_error_type() || value.is_error_type() {
        return Ok(Type::Error);
    }

    let error = if target.is_fn_type() && value.is_fn_type() {
        ErrorImpl::FunctionAssignment
    } else if target.is_struct_def_type() && value.is_struct_def_type() {
        ErrorImpl::StructNameAssignment
    } else if target.is_struct_type() && value.is_struct_type() {
        ErrorImpl::StructVariableAssignment
    } else if !target.equals(&value) {
        ErrorImpl::TypeMismatch {
            expected: target.to_string(),
            received: value.to_string(),
        }
    } else {
        return Ok(target);
    };

    type_checker.report(error, assign.target.position());
    Ok(Type::Error)
}

fn type_check_call(type_checker: &mut TypeChecker, call: &CallExpr) -> Result<Type, InternalError> {
    let symbols = type_checker.symbols;

    let symbol = match call.callee.symbol {
        Some(symbol) => symbol,
        None => return Ok(Type::Error),
    };

    let function = match symbols.get(symbol)? {
        Symbol::Function(function) => function,
        _ => {
            type_checker.report(ErrorImpl::CallOfNonFunction, call.callee.position);
            return Ok(Type::Error);
        }
    };

    if call.args.len() != function.param_types.len() {
        let error = ErrorImpl::WrongArgumentCount {
            expected: function.param_types.len(),
            received: call.args.len(),
        };
        type_checker.report(error, call.callee.position);
        return Ok(function.return_type.clone());
    }

    for (arg, formal) in call.args.iter().zip(function.param_types.iter()) {
        let actual = type_check_expr(type_checker, arg)?;

        if !actual.is_error_type() && !actual.equals(formal) {
            let error = ErrorImpl::ArgumentTypeMismatch {
                expected: formal.to_string(),
                received: actual.to_string(),
            };
            type_checker.report(error, arg.position());
        }
    }

    Ok(function.return_type.clone())
}

fn type_check_unary(type_checker: &mut TypeChecker, unary: &UnaryExpr) -> Result<Type, InternalError> {
    let operand = type_check_expr(type_checker, &unary.operand)?;
    if operand.is_error_type() {
        return Ok(Type::Error);
    }

    let (accepted, error, result) = match unary.op {
        UnaryOp::Negate => (operand.is_int_type(), ErrorImpl::ArithmeticOnNonNumeric, Type::Int),
        UnaryOp::Not => (operand.is_bool_type(), ErrorImpl::LogicalOnNonBool, Type::Bool),
    };

    if accepted {
        Ok(result)
    } else {
        type_checker.report(error, unary.operand.position());
        Ok(Type::Error)
    }
}

fn type_check_binary(type_checker: &mut TypeChecker, binary: &BinaryExpr) -> Result<Type, InternalError> {
    let lhs = type_check_expr(type_checker, &binary.lhs)?;
    let rhs = type_check_expr(type_checker, &binary.rhs)?;

    let (operand_ok, error, result): (fn(&Type) -> bool, ErrorImpl, Type) = match binary.op {
        BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Times | BinaryOp::Divide => {
            (Type::is_int_type, ErrorImpl::ArithmeticOnNonNumeric, Type::Int)
        }
        BinaryOp::And | BinaryOp::Or => (Type::is_bool_type, ErrorImpl::LogicalOnNonBool, Type::Bool),
        BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEquals | BinaryOp::GreaterEquals => {
            (Type::is_int_type, ErrorImpl::RelationalOnNonNumeric, Type::Bool)
        }
        BinaryOp::Equals | BinaryOp::NotEquals => {
            return Ok(type_check_equality(type_checker, binary, &lhs, &rhs))
        }
    };

    let mut valid = true;
    for (ty, operand) in [(&lhs, &binary.lhs), (&rhs, &binary.rhs)] {
        if ty.is_error_type() {
            valid = false;
        } else if !operand_ok(ty) {
            type_checker.report(error.clone(), operand.position());
            valid = false;
        }
    }

    Ok(if valid { result } else { Type::Error })
}

fn type_check_equality(type_checker: &mut TypeChecker, binary: &BinaryExpr, lhs: &Type, rhs: &Type) -> Type {
    if lhs.is_error_type() || rhs.is_error_type() {
        return Type::Error;
    }

    let error = if lhs.is_void_type() && rhs.is_void_type() {
        ErrorImpl::EqualityOnVoidFunctions
    } else if lhs.is_fn_type() && rhs.is_fn_type() {
        ErrorImpl::EqualityOnFunctions
    } else if lhs.is_struct_def_type() && rhs.is_struct_def_type() {
        ErrorImpl::EqualityOnStructNames
    } else if lhs.is_struct_type() && rhs.is_struct_type() {
        ErrorImpl::EqualityOnStructVariables
    } else if !lhs.equals(rhs) {
        ErrorImpl::TypeMismatch {
            expected: lhs.to_string(),
            received: rhs.to_string(),
        }
    } else {
        return Type::Bool;
    };

    type_checker.report(error, binary.lhs.position());
    Type::Error
}
