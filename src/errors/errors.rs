use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A user-facing diagnostic: what went wrong and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// The stable message text, e.g. `Undeclared identifier`.
    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            ErrorImpl::MultiplyDeclared { .. } => "MultiplyDeclared",
            ErrorImpl::NonFunctionVoid { .. } => "NonFunctionVoid",
            ErrorImpl::InvalidStructType { .. } => "InvalidStructType",
            ErrorImpl::DotAccessOfNonStruct => "DotAccessOfNonStruct",
            ErrorImpl::InvalidFieldName { .. } => "InvalidFieldName",
            ErrorImpl::NoMainFunction => "NoMainFunction",
            ErrorImpl::ArithmeticOnNonNumeric => "ArithmeticOnNonNumeric",
            ErrorImpl::LogicalOnNonBool => "LogicalOnNonBool",
            ErrorImpl::RelationalOnNonNumeric => "RelationalOnNonNumeric",
            ErrorImpl::EqualityOnVoidFunctions => "EqualityOnVoidFunctions",
            ErrorImpl::EqualityOnFunctions => "EqualityOnFunctions",
            ErrorImpl::EqualityOnStructNames => "EqualityOnStructNames",
            ErrorImpl::EqualityOnStructVariables => "EqualityOnStructVariables",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::FunctionAssignment => "FunctionAssignment",
            ErrorImpl::StructNameAssignment => "StructNameAssignment",
            ErrorImpl::StructVariableAssignment => "StructVariableAssignment",
            ErrorImpl::ReadFunction => "ReadFunction",
            ErrorImpl::ReadStructName => "ReadStructName",
            ErrorImpl::ReadStructVariable => "ReadStructVariable",
            ErrorImpl::WriteFunction => "WriteFunction",
            ErrorImpl::WriteStructName => "WriteStructName",
            ErrorImpl::WriteStructVariable => "WriteStructVariable",
            ErrorImpl::WriteVoid => "WriteVoid",
            ErrorImpl::NonBoolIfCondition => "NonBoolIfCondition",
            ErrorImpl::NonBoolWhileCondition => "NonBoolWhileCondition",
            ErrorImpl::NonIntegerRepeatClause => "NonIntegerRepeatClause",
            ErrorImpl::CallOfNonFunction => "CallOfNonFunction",
            ErrorImpl::WrongArgumentCount { .. } => "WrongArgumentCount",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::ReturnValueInVoidFunction => "ReturnValueInVoidFunction",
            ErrorImpl::BadReturnValue { .. } => "BadReturnValue",
            ErrorImpl::MissingReturnValue => "MissingReturnValue",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UndeclaredIdentifier { name } => {
                ErrorTip::Suggestion(format!("`{}` is not declared in any enclosing scope", name))
            }
            ErrorImpl::MultiplyDeclared { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            ErrorImpl::NonFunctionVoid { name } => {
                ErrorTip::Suggestion(format!("only functions may be declared void, not `{}`", name))
            }
            ErrorImpl::InvalidStructType { name } => {
                ErrorTip::Suggestion(format!("`{}` does not name a struct definition", name))
            }
            ErrorImpl::InvalidFieldName { name } => {
                ErrorTip::Suggestion(format!("the struct has no field named `{}`", name))
            }
            ErrorImpl::NoMainFunction => {
                ErrorTip::Suggestion(String::from("declare a function named `main`"))
            }
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::WrongArgumentCount { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ArgumentTypeMismatch { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::BadReturnValue { expected, received } => ErrorTip::Suggestion(format!(
                "Expected return type `{}`, received `{}`",
                expected, received
            )),
            other => ErrorTip::Suggestion(other.to_string()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ***ERROR*** {}", self.position, self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

/// Every kind of diagnostic the front end and the two analysis passes can
/// raise. The `#[error]` strings are part of the compiler's output contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // name resolution
    #[error("Undeclared identifier")]
    UndeclaredIdentifier { name: String },
    #[error("Multiply declared identifier")]
    MultiplyDeclared { name: String },
    #[error("Non-function declared void")]
    NonFunctionVoid { name: String },
    #[error("Invalid name of struct type")]
    InvalidStructType { name: String },
    #[error("Dot-access of non-struct type")]
    DotAccessOfNonStruct,
    #[error("Invalid struct field name")]
    InvalidFieldName { name: String },
    #[error("No main function")]
    NoMainFunction,

    // type checking
    #[error("Arithmetic operator applied to non-numeric operand")]
    ArithmeticOnNonNumeric,
    #[error("Logical operator applied to non-bool operand")]
    LogicalOnNonBool,
    #[error("Relational operator applied to non-numeric operand")]
    RelationalOnNonNumeric,
    #[error("Equality operator applied to void functions")]
    EqualityOnVoidFunctions,
    #[error("Equality operator applied to functions")]
    EqualityOnFunctions,
    #[error("Equality operator applied to struct names")]
    EqualityOnStructNames,
    #[error("Equality operator applied to struct variables")]
    EqualityOnStructVariables,
    #[error("Type mismatch")]
    TypeMismatch { expected: String, received: String },
    #[error("Function assignment")]
    FunctionAssignment,
    #[error("Struct name assignment")]
    StructNameAssignment,
    #[error("Struct variable assignment")]
    StructVariableAssignment,
    #[error("Attempt to read a function")]
    ReadFunction,
    #[error("Attempt to read a struct name")]
    ReadStructName,
    #[error("Attempt to read a struct variable")]
    ReadStructVariable,
    #[error("Attempt to write a function")]
    WriteFunction,
    #[error("Attempt to write a struct name")]
    WriteStructName,
    #[error("Attempt to write a struct variable")]
    WriteStructVariable,
    #[error("Attempt to write void")]
    WriteVoid,
    #[error("Non-bool expression used as an if condition")]
    NonBoolIfCondition,
    #[error("Non-bool expression used as a while condition")]
    NonBoolWhileCondition,
    #[error("Non-integer expression used as a repeat clause")]
    NonIntegerRepeatClause,
    #[error("Attempt to call a non-function")]
    CallOfNonFunction,
    #[error("Function call with wrong number of args")]
    WrongArgumentCount { expected: usize, received: usize },
    #[error("Type of actual does not match type of formal")]
    ArgumentTypeMismatch { expected: String, received: String },
    #[error("Return with a value in a void function")]
    ReturnValueInVoidFunction,
    #[error("Bad return value")]
    BadReturnValue { expected: String, received: String },
    #[error("Missing return value")]
    MissingReturnValue,
}

/// A broken compiler invariant. These abort the run; they never describe a
/// mistake in the program being compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("attempted to pop a scope from an empty scope stack")]
    EmptyScopeStack,
    #[error("symbol {name:?} inserted twice into the same scope")]
    DuplicateSymbol { name: String },
    #[error("symbol handle {id} does not refer to a live symbol")]
    DanglingSymbol { id: u32 },
    #[error("identifier {name:?} reached code generation without a symbol")]
    UnresolvedIdentifier { name: String },
    #[error("expected {expected}, found {found}")]
    UnexpectedNode { expected: &'static str, found: String },
    #[error("illegal function compilation step from {from} to {to}")]
    IllegalTransition { from: String, to: String },
    #[error("{construct} compiled outside of a function")]
    NoEnclosingFunction { construct: &'static str },
}
