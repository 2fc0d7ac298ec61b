//! Error handling for the Dana checker

use crate::types::Type;
use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Semantic error. Checking stops at the first one raised.
#[derive(Error, Debug, Clone)]
pub enum Error {
    // ==================== Scoping ====================

    #[error("Redeclaration of {what} '{name}'")]
    Redeclaration {
        what: &'static str,
        name: String,
        span: Span,
    },

    #[error("Undeclared variable '{name}'")]
    UndeclaredVariable { name: String, span: Span },

    #[error("Undefined function '{name}'")]
    UndefinedFunction { name: String, span: Span },

    // ==================== Calls ====================

    #[error("Function '{function}' expects {expected} args, got {got}")]
    Arity {
        function: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("Type mismatch in argument '{param}' of '{function}': expected {expected}, got {got}")]
    ArgumentType {
        function: String,
        param: String,
        expected: Type,
        got: Type,
        span: Span,
    },

    // ==================== Typing ====================

    #[error("Type mismatch in {context}: {expected} and {got}")]
    TypeMismatch {
        context: String,
        expected: Type,
        got: Type,
        span: Span,
    },

    #[error("Invalid assignment: {reason}")]
    ArrayAssignment { reason: &'static str, span: Span },

    #[error("Condition must be of boolean type, got {got}")]
    ConditionType { got: Type, span: Span },

    #[error("Variable '{name}' is not an array")]
    NotAnArray { name: String, span: Span },

    #[error("Array index for '{name}' must be int, got {got}")]
    IndexType { name: String, got: Type, span: Span },

    #[error("Null operand for operator '{op}'")]
    NullOperand { op: String, span: Span },

    // ==================== Control flow ====================

    #[error("'{keyword}' used outside of any loop")]
    LoopContext { keyword: &'static str, span: Span },

    // ==================== Structure ====================

    #[error("Malformed {what}")]
    MalformedNode { what: &'static str, span: Span },

    #[error("Internal error: {message}")]
    Internal { message: String, span: Span },
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            Self::Redeclaration { span, .. }
            | Self::UndeclaredVariable { span, .. }
            | Self::UndefinedFunction { span, .. }
            | Self::Arity { span, .. }
            | Self::ArgumentType { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::ArrayAssignment { span, .. }
            | Self::ConditionType { span, .. }
            | Self::NotAnArray { span, .. }
            | Self::IndexType { span, .. }
            | Self::NullOperand { span, .. }
            | Self::LoopContext { span, .. }
            | Self::MalformedNode { span, .. }
            | Self::Internal { span, .. } => *span,
        }
    }

    /// Source line of the offending node
    pub fn line(&self) -> u32 {
        self.span().line
    }

    /// Name of the error kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Redeclaration { .. } => "RedeclarationError",
            Self::UndeclaredVariable { .. } => "UndeclaredVariableError",
            Self::UndefinedFunction { .. } => "UndefinedFunctionError",
            Self::Arity { .. } => "ArityError",
            Self::ArgumentType { .. } => "ArgumentTypeError",
            Self::TypeMismatch { .. } => "TypeMismatchError",
            Self::ArrayAssignment { .. } => "ArrayAssignmentError",
            Self::ConditionType { .. } => "ConditionTypeError",
            Self::NotAnArray { .. } => "NotAnArrayError",
            Self::IndexType { .. } => "IndexTypeError",
            Self::LoopContext { .. } => "LoopContextError",
            Self::NullOperand { .. } => "NullOperandError",
            Self::MalformedNode { .. } => "MalformedNodeError",
            Self::Internal { .. } => "InternalError",
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            span: Span::dummy(),
        }
    }
}
