//! Structured Feedback Module
//!
//! Machine-readable form of a check result: the first semantic error as a
//! JSON report with a stable code, kind, message and source line.

use serde::{Deserialize, Serialize};

use crate::utils::{Error, Result};

// ==================== Structured Error Report ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code (e.g., "E0001")
    pub code: String,
    /// Error kind name (e.g., "RedeclarationError")
    pub kind: String,
    /// Human-readable message
    pub message: String,
    /// 1-based source line, absent for internal errors
    pub line: Option<u32>,
}

impl ErrorReport {
    /// Create an error report from a semantic error
    pub fn from_error(error: &Error) -> Self {
        let span = error.span();
        Self {
            code: error_code(error).to_string(),
            kind: error.kind_name().to_string(),
            message: error.to_string(),
            line: (!span.is_dummy()).then_some(span.line),
        }
    }
}

/// Outcome of checking one program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub success: bool,
    /// Source file, when known
    pub source_file: Option<String>,
    /// Empty on success, otherwise the single error that aborted checking
    pub diagnostics: Vec<ErrorReport>,
}

impl CheckReport {
    pub fn from_result(result: &Result<()>, source_file: Option<&str>) -> Self {
        let diagnostics = match result {
            Ok(()) => vec![],
            Err(err) => vec![ErrorReport::from_error(err)],
        };
        Self {
            success: diagnostics.is_empty(),
            source_file: source_file.map(str::to_string),
            diagnostics,
        }
    }

    /// Output as pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn error_code(error: &Error) -> &'static str {
    match error {
        Error::Redeclaration { .. } => "E0001",
        Error::UndeclaredVariable { .. } => "E0002",
        Error::UndefinedFunction { .. } => "E0003",
        Error::Arity { .. } => "E0004",
        Error::ArgumentType { .. } => "E0005",
        Error::TypeMismatch { .. } => "E0006",
        Error::ArrayAssignment { .. } => "E0007",
        Error::ConditionType { .. } => "E0008",
        Error::NotAnArray { .. } => "E0009",
        Error::IndexType { .. } => "E0010",
        Error::LoopContext { .. } => "E0011",
        Error::NullOperand { .. } => "E0012",
        Error::MalformedNode { .. } => "E0013",
        Error::Internal { .. } => "E0014",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_from_error() {
        let err = Error::LoopContext {
            keyword: "break",
            span: Span::new(12),
        };
        let report = CheckReport::from_result(&Err(err), Some("prog.json"));
        assert!(!report.success);
        assert_eq!(
            report.diagnostics,
            vec![ErrorReport {
                code: "E0011".to_string(),
                kind: "LoopContextError".to_string(),
                message: "'break' used outside of any loop".to_string(),
                line: Some(12),
            }]
        );
    }

    #[test]
    fn test_success_report_json() {
        let report = CheckReport::from_result(&Ok(()), None);
        let value: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(value["success"], serde_json::json!(true));
        assert_eq!(value["diagnostics"], serde_json::json!([]));
    }

    #[test]
    fn test_internal_error_has_no_line() {
        let report = ErrorReport::from_error(&Error::Internal {
            message: "scope underflow".to_string(),
            span: Span::dummy(),
        });
        assert_eq!(report.line, None);
        assert_eq!(report.code, "E0014");
    }
}
