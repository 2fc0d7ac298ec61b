//! Abstract Syntax Tree definitions for Dana
//!
//! The tree is produced by an external parser and is read-only for the
//! checker. Every node carries the source line it came from. Sequences that
//! the grammar builds as tail-linked lists (parameter groups, `elif` chains,
//! statement lists) are plain vectors here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::Type;
use crate::utils::{Error, Span};

/// Identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    #[serde(rename = "line", default)]
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            span: Span::new(line),
        }
    }
}

// ==================== Functions ====================

/// Run of parameter names sharing one type and passing mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGroup {
    pub names: Vec<String>,
    pub ty: Type,
    #[serde(default)]
    pub by_ref: bool,
    #[serde(rename = "line", default)]
    pub span: Span,
}

impl ParamGroup {
    pub fn new(names: &[&str], ty: Type, by_ref: bool) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            ty,
            by_ref,
            span: Span::dummy(),
        }
    }

    /// Type bound to each name of the group, reference-wrapped when passed by reference
    pub fn declared_type(&self) -> Type {
        if self.by_ref {
            Type::reference(self.ty.clone())
        } else {
            self.ty.clone()
        }
    }
}

/// Function or procedure signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub name: Ident,
    /// `None` for procedures
    #[serde(default)]
    pub ret_type: Option<Type>,
    #[serde(default)]
    pub params: Vec<ParamGroup>,
    #[serde(rename = "line", default)]
    pub span: Span,
}

impl Header {
    pub fn new(name: &str, ret_type: Option<Type>, params: Vec<ParamGroup>, line: u32) -> Self {
        Self {
            name: Ident::new(name, line),
            ret_type,
            params,
            span: Span::new(line),
        }
    }

    pub fn return_type(&self) -> Type {
        self.ret_type.clone().unwrap_or(Type::VOID)
    }

    /// Formal parameters in declaration order, groups flattened
    pub fn formals(&self) -> impl Iterator<Item = (&str, Type)> + '_ {
        self.params.iter().flat_map(|group| {
            let ty = group.declared_type();
            group.names.iter().map(move |name| (name.as_str(), ty.clone()))
        })
    }

    pub fn param_count(&self) -> usize {
        self.params.iter().map(|group| group.names.len()).sum()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name.name)?;
        for (i, (name, ty)) in self.formals().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", ty, name)?;
        }
        f.write_str(")")?;
        if let Some(ret) = &self.ret_type {
            write!(f, " -> {}", ret)?;
        }
        Ok(())
    }
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub header: Header,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(rename = "line", default)]
    pub span: Span,
}

// ==================== Operators ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum LogicOp {
    And,
    Or,
}

impl ArithOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }
}

impl RelOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }
}

impl LogicOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

fn unknown_operator(op: &str) -> Error {
    Error::internal(format!("Unknown expression operator '{}'", op))
}

impl FromStr for ArithOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Sub),
            "*" => Ok(Self::Mul),
            "/" => Ok(Self::Div),
            "%" => Ok(Self::Mod),
            other => Err(unknown_operator(other)),
        }
    }
}

impl FromStr for RelOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" | "==" => Ok(Self::Eq),
            "<>" | "!=" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            ">" => Ok(Self::Gt),
            "<=" => Ok(Self::Le),
            ">=" => Ok(Self::Ge),
            other => Err(unknown_operator(other)),
        }
    }
}

impl FromStr for LogicOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "and" | "&" => Ok(Self::And),
            "or" | "|" => Ok(Self::Or),
            other => Err(unknown_operator(other)),
        }
    }
}

impl TryFrom<String> for ArithOp {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for RelOp {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for LogicOp {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ArithOp> for &'static str {
    fn from(op: ArithOp) -> Self {
        op.as_str()
    }
}

impl From<RelOp> for &'static str {
    fn from(op: RelOp) -> Self {
        op.as_str()
    }
}

impl From<LogicOp> for &'static str {
    fn from(op: LogicOp) -> Self {
        op.as_str()
    }
}

// ==================== Expressions ====================

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    #[serde(rename = "line", default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    /// Decimal integer literal
    Const(i32),
    /// Character or hex literal
    Hex(i32),
    /// `true` / `false`
    Bool(bool),
    LValue(LValue),
    Call(FunctionCall),
    /// `not e` / `!e`
    Not { operand: Option<Box<Expr>> },
    /// A missing left operand encodes unary `+`/`-`
    Arithmetic {
        op: ArithOp,
        left: Option<Box<Expr>>,
        right: Option<Box<Expr>>,
    },
    Relational {
        op: RelOp,
        left: Option<Box<Expr>>,
        right: Option<Box<Expr>>,
    },
    Logical {
        op: LogicOp,
        left: Option<Box<Expr>>,
        right: Option<Box<Expr>>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, line: u32) -> Self {
        Self {
            kind,
            span: Span::new(line),
        }
    }

    pub fn int(value: i32, line: u32) -> Self {
        Self::new(ExprKind::Const(value), line)
    }

    pub fn hex(value: i32, line: u32) -> Self {
        Self::new(ExprKind::Hex(value), line)
    }

    pub fn boolean(value: bool, line: u32) -> Self {
        Self::new(ExprKind::Bool(value), line)
    }

    /// Plain variable reference
    pub fn var(name: &str, line: u32) -> Self {
        Self::new(ExprKind::LValue(LValue::var(name, line)), line)
    }

    pub fn lvalue(lvalue: LValue) -> Self {
        let line = lvalue.span.line;
        Self::new(ExprKind::LValue(lvalue), line)
    }

    pub fn call(callee: &str, args: Vec<Expr>, line: u32) -> Self {
        Self::new(ExprKind::Call(FunctionCall::new(callee, args, line)), line)
    }

    pub fn not(operand: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Not {
                operand: Some(Box::new(operand)),
            },
            line,
        )
    }

    pub fn arith(op: ArithOp, left: Expr, right: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Arithmetic {
                op,
                left: Some(Box::new(left)),
                right: Some(Box::new(right)),
            },
            line,
        )
    }

    /// Unary `+e` / `-e`
    pub fn signed(op: ArithOp, operand: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Arithmetic {
                op,
                left: None,
                right: Some(Box::new(operand)),
            },
            line,
        )
    }

    pub fn rel(op: RelOp, left: Expr, right: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Relational {
                op,
                left: Some(Box::new(left)),
                right: Some(Box::new(right)),
            },
            line,
        )
    }

    pub fn logic(op: LogicOp, left: Expr, right: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Logical {
                op,
                left: Some(Box::new(left)),
                right: Some(Box::new(right)),
            },
            line,
        )
    }
}

/// Storage location: a variable, optionally indexed, or a string literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LValue {
    /// Variable name, or the literal text when `is_string` is set
    pub ident: Ident,
    #[serde(default)]
    pub indices: Vec<Expr>,
    #[serde(default)]
    pub is_string: bool,
    #[serde(rename = "line", default)]
    pub span: Span,
}

impl LValue {
    pub fn var(name: &str, line: u32) -> Self {
        Self {
            ident: Ident::new(name, line),
            indices: Vec::new(),
            is_string: false,
            span: Span::new(line),
        }
    }

    pub fn indexed(name: &str, indices: Vec<Expr>, line: u32) -> Self {
        Self {
            indices,
            ..Self::var(name, line)
        }
    }

    pub fn string(text: &str, line: u32) -> Self {
        Self {
            is_string: true,
            ..Self::var(text, line)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub callee: Ident,
    #[serde(default)]
    pub args: Vec<Expr>,
    #[serde(rename = "line", default)]
    pub span: Span,
}

impl FunctionCall {
    pub fn new(callee: &str, args: Vec<Expr>, line: u32) -> Self {
        Self {
            callee: Ident::new(callee, line),
            args,
            span: Span::new(line),
        }
    }
}

// ==================== Statements ====================

/// One branch of an `if` / `elif` / `else` chain. `else` has no condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfBranch {
    #[serde(default)]
    pub condition: Option<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(rename = "line", default)]
    pub span: Span,
}

impl IfBranch {
    pub fn new(condition: Option<Expr>, body: Vec<Stmt>, line: u32) -> Self {
        Self {
            condition,
            body,
            span: Span::new(line),
        }
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    #[serde(rename = "line", default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StmtKind {
    /// lvalue := expr
    Assign { target: LValue, value: Expr },
    Skip,
    Exit,
    Return(Option<Expr>),
    Break(Option<String>),
    Continue(Option<String>),
    If(Vec<IfBranch>),
    Loop {
        #[serde(default)]
        label: Option<String>,
        body: Vec<Stmt>,
    },
    /// Procedure call used as a statement
    ProcCall(Expr),
    FuncDef(FunctionDef),
    FuncDecl(Header),
    /// var a b c is type
    VarDecl { names: Vec<String>, ty: Type },
}

impl Stmt {
    pub fn new(kind: StmtKind, line: u32) -> Self {
        Self {
            kind,
            span: Span::new(line),
        }
    }

    pub fn var_decl(names: &[&str], ty: Type, line: u32) -> Self {
        Self::new(
            StmtKind::VarDecl {
                names: names.iter().map(|n| n.to_string()).collect(),
                ty,
            },
            line,
        )
    }

    pub fn assign(target: LValue, value: Expr, line: u32) -> Self {
        Self::new(StmtKind::Assign { target, value }, line)
    }

    pub fn proc_call(callee: &str, args: Vec<Expr>, line: u32) -> Self {
        Self::new(StmtKind::ProcCall(Expr::call(callee, args, line)), line)
    }

    pub fn func_def(header: Header, body: Vec<Stmt>) -> Self {
        let line = header.span.line;
        Self::new(
            StmtKind::FuncDef(FunctionDef {
                header,
                body,
                span: Span::new(line),
            }),
            line,
        )
    }

    pub fn func_decl(header: Header) -> Self {
        let line = header.span.line;
        Self::new(StmtKind::FuncDecl(header), line)
    }

    pub fn loop_stmt(label: Option<&str>, body: Vec<Stmt>, line: u32) -> Self {
        Self::new(
            StmtKind::Loop {
                label: label.map(str::to_string),
                body,
            },
            line,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_formals_flatten_groups_in_order() {
        let header = Header::new(
            "strcmp",
            Some(Type::INT),
            vec![
                ParamGroup::new(&["s1", "s2"], Type::string(), true),
                ParamGroup::new(&["n"], Type::INT, false),
            ],
            1,
        );
        let formals: Vec<_> = header.formals().map(|(n, _)| n.to_string()).collect();
        assert_eq!(formals, vec!["s1", "s2", "n"]);
        assert_eq!(header.param_count(), 3);
        assert_eq!(header.to_string(), "strcmp(ref byte[] s1, ref byte[] s2, int n) -> int");
    }

    #[test]
    fn test_procedure_returns_void() {
        let header = Header::new("main", None, vec![], 1);
        assert_eq!(header.return_type(), Type::VOID);
        assert_eq!(header.to_string(), "main()");
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!("<>".parse::<RelOp>().unwrap(), RelOp::Ne);
        assert_eq!("%".parse::<ArithOp>().unwrap(), ArithOp::Mod);
        assert_eq!("or".parse::<LogicOp>().unwrap(), LogicOp::Or);
        let err = "^".parse::<ArithOp>().unwrap_err();
        assert_eq!(err.kind_name(), "InternalError");
    }

    #[test]
    fn test_deserialize_statement() {
        let json = r#"{
            "kind": {"assign": {
                "target": {"ident": {"name": "x", "line": 4}, "line": 4},
                "value": {"kind": {"arithmetic": {
                    "op": "+",
                    "left": {"kind": {"const": 1}, "line": 4},
                    "right": {"kind": {"hex": 2}, "line": 4}
                }}, "line": 4}
            }},
            "line": 4
        }"#;
        let stmt: Stmt = serde_json::from_str(json).unwrap();
        let expected = Stmt::assign(
            LValue::var("x", 4),
            Expr::arith(ArithOp::Add, Expr::int(1, 4), Expr::hex(2, 4), 4),
            4,
        );
        assert_eq!(stmt, expected);
    }

    #[test]
    fn test_operator_decoding_accepts_alternate_spellings() {
        let json = r#"{"kind": {"relational": {
            "op": "!=",
            "left": {"kind": {"const": 1}, "line": 2},
            "right": {"kind": {"const": 2}, "line": 2}
        }}, "line": 2}"#;
        let expr: Expr = serde_json::from_str(json).unwrap();
        assert_eq!(expr, Expr::rel(RelOp::Ne, Expr::int(1, 2), Expr::int(2, 2), 2));

        let op: LogicOp = serde_json::from_str(r#""&""#).unwrap();
        assert_eq!(op, LogicOp::And);
        assert_eq!(serde_json::to_string(&RelOp::Ne).unwrap(), r#""<>""#);
    }

    #[test]
    fn test_unknown_operator_is_rejected_on_decode() {
        let err = serde_json::from_str::<ArithOp>(r#""^""#).unwrap_err();
        assert!(err.to_string().contains("Unknown expression operator '^'"), "{}", err);
    }
}
