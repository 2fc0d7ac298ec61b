//! Semantic Analysis for Dana
//!
//! Performs:
//! - Name resolution against the scope stack
//! - Type checking of expressions, l-values and assignments
//! - Loop-context checks for `break` / `continue`
//!
//! The traversal is depth-first and stops at the first error.

use log::debug;

use crate::frontend::ast::*;
use crate::frontend::symbols::SymbolTable;
use crate::stdlib::BuiltinRegistry;
use crate::types::Type;
use crate::utils::{Error, Result, Span};

// ==================== Semantic Checker ====================

/// Semantic checker. Owns the symbol table for the duration of one check.
pub struct Checker {
    symbols: SymbolTable,
}

impl Checker {
    /// Checker whose global scope holds the standard library
    pub fn new() -> Result<Self> {
        let mut symbols = SymbolTable::new();
        BuiltinRegistry::new().register_into(&mut symbols)?;
        Ok(Self::with_symbols(symbols))
    }

    /// Checker over a caller-prepared symbol table
    pub fn with_symbols(symbols: SymbolTable) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }

    /// Check a top-level declaration list
    pub fn check_program(&mut self, program: &[Stmt]) -> Result<()> {
        debug!("checking {} top-level declarations", program.len());
        self.check_stmts(program)?;
        debug!("semantic check passed");
        Ok(())
    }

    /// Check a statement sequence in order
    pub fn check_stmts(&mut self, stmts: &[Stmt]) -> Result<()> {
        for stmt in stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    /// Type check a statement
    pub fn check_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        let span = stmt.span;
        match &stmt.kind {
            StmtKind::VarDecl { names, ty } => {
                if names.is_empty() || ty.is_reference() {
                    return Err(Error::MalformedNode {
                        what: "variable declaration",
                        span,
                    });
                }
                for name in names {
                    self.symbols.add_variable(name, ty.clone(), span)?;
                }
                Ok(())
            }
            StmtKind::FuncDecl(header) => {
                if self.symbols.lookup_function(&header.name.name).is_some() {
                    return Err(Error::Redeclaration {
                        what: "function",
                        name: header.name.name.clone(),
                        span,
                    });
                }
                self.symbols.add_function(header)
            }
            StmtKind::FuncDef(def) => self.check_function_def(def),
            StmtKind::Assign { target, value } => self.check_assign(target, value, span),
            StmtKind::If(branches) => {
                if branches.is_empty() {
                    return Err(Error::MalformedNode {
                        what: "if statement",
                        span,
                    });
                }
                self.symbols.enter_scope();
                for branch in branches {
                    self.check_if_branch(branch)?;
                }
                self.symbols.exit_scope()
            }
            StmtKind::Loop { label, body } => {
                if let Some(label) = label {
                    debug!("entering loop '{}' at {}", label, span);
                }
                self.symbols.enter_loop();
                self.symbols.enter_scope();
                self.check_stmts(body)?;
                self.symbols.exit_scope()?;
                self.symbols.exit_loop();
                Ok(())
            }
            StmtKind::ProcCall(expr) => {
                self.symbols.enter_scope();
                self.check_expr(expr)?;
                self.symbols.exit_scope()
            }
            // The value is not compared with the enclosing function's return type.
            StmtKind::Return(value) => {
                if let Some(expr) = value {
                    self.check_expr(expr)?;
                }
                Ok(())
            }
            // Labels are accepted without matching them against enclosing loops.
            StmtKind::Break(_) => self.require_loop("break", span),
            StmtKind::Continue(_) => self.require_loop("continue", span),
            StmtKind::Skip | StmtKind::Exit => Ok(()),
        }
    }

    fn require_loop(&self, keyword: &'static str, span: Span) -> Result<()> {
        if self.symbols.inside_loop() {
            Ok(())
        } else {
            Err(Error::LoopContext { keyword, span })
        }
    }

    fn check_assign(&mut self, target: &LValue, value: &Expr, span: Span) -> Result<()> {
        let lt = self.check_lvalue(target)?;
        let rt = self.check_expr(value)?;

        let reason = match (lt.is_array(), rt.is_array()) {
            (true, false) => Some("right-hand expression is not an array"),
            (false, true) => Some("cannot assign an array to a non-array element"),
            (true, true) => Some("entire arrays cannot be directly assigned"),
            (false, false) => None,
        };
        if let Some(reason) = reason {
            return Err(Error::ArrayAssignment { reason, span });
        }

        if !lt.same_as(&rt) {
            return Err(Error::TypeMismatch {
                context: format!("assignment to '{}'", target.ident.name),
                expected: lt,
                got: rt,
                span,
            });
        }
        Ok(())
    }

    /// The condition is checked in the enclosing scope, the body in its own.
    fn check_if_branch(&mut self, branch: &IfBranch) -> Result<()> {
        if let Some(cond) = &branch.condition {
            let ty = self.check_expr(cond)?;
            if !ty.same_as(&Type::BOOL) {
                return Err(Error::ConditionType {
                    got: ty,
                    span: cond.span,
                });
            }
        }
        self.symbols.enter_scope();
        self.check_stmts(&branch.body)?;
        self.symbols.exit_scope()
    }

    /// Type check a function definition.
    ///
    /// Parameters and body share one scope. The function itself is
    /// registered first, so recursive calls resolve.
    pub fn check_function_def(&mut self, def: &FunctionDef) -> Result<()> {
        let header = &def.header;
        if header.name.name.is_empty() {
            return Err(Error::MalformedNode {
                what: "function definition",
                span: def.span,
            });
        }
        if self.symbols.lookup_function(&header.name.name).is_none() {
            self.symbols.add_function(header)?;
        }
        debug!("checking function {}", header);

        self.symbols.enter_scope();
        for group in &header.params {
            let span = if group.span.is_dummy() { header.span } else { group.span };
            let ty = group.declared_type();
            for name in &group.names {
                self.symbols.add_parameter(name, ty.clone(), span)?;
            }
        }
        self.check_stmts(&def.body)?;
        self.symbols.exit_scope()
    }

    /// Type check an expression
    pub fn check_expr(&mut self, expr: &Expr) -> Result<Type> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Const(_) => Ok(Type::INT),
            // Character and boolean literals both type as byte.
            ExprKind::Hex(_) | ExprKind::Bool(_) => Ok(Type::BYTE),
            ExprKind::LValue(lvalue) => self.check_lvalue(lvalue),
            ExprKind::Call(call) => self.check_call(call),
            ExprKind::Not { operand } => {
                let operand = operand
                    .as_deref()
                    .ok_or_else(|| null_operand("not", span))?;
                self.check_expr(operand)?;
                Ok(Type::BOOL)
            }
            ExprKind::Arithmetic { op, left, right } => {
                let lt = left.as_deref().map(|e| self.check_expr(e)).transpose()?;
                let rt = right.as_deref().map(|e| self.check_expr(e)).transpose()?;
                match (lt, rt) {
                    (Some(lt), Some(rt)) => {
                        if !lt.same_as(&rt) {
                            return Err(Error::TypeMismatch {
                                context: format!("'{}' expression", op.as_str()),
                                expected: lt,
                                got: rt,
                                span,
                            });
                        }
                        Ok(lt)
                    }
                    // Unary sign: the operand's type passes through.
                    (None, Some(ty)) | (Some(ty), None) => Ok(ty),
                    (None, None) => Err(null_operand(op.as_str(), span)),
                }
            }
            ExprKind::Relational { op, left, right } => {
                self.check_comparison(op.as_str(), left.as_deref(), right.as_deref(), span)
            }
            ExprKind::Logical { op, left, right } => {
                self.check_comparison(op.as_str(), left.as_deref(), right.as_deref(), span)
            }
        }
    }

    /// Relational and logical operators: two operands of the same type, bool result
    fn check_comparison(
        &mut self,
        op: &str,
        left: Option<&Expr>,
        right: Option<&Expr>,
        span: Span,
    ) -> Result<Type> {
        let (Some(left), Some(right)) = (left, right) else {
            return Err(null_operand(op, span));
        };
        let lt = self.check_expr(left)?;
        let rt = self.check_expr(right)?;
        if !lt.same_as(&rt) {
            return Err(Error::TypeMismatch {
                context: format!("'{}' expression", op),
                expected: lt,
                got: rt,
                span,
            });
        }
        Ok(Type::BOOL)
    }

    fn check_call(&mut self, call: &FunctionCall) -> Result<Type> {
        let name = &call.callee.name;
        if name.is_empty() {
            return Err(Error::MalformedNode {
                what: "function call",
                span: call.span,
            });
        }
        let header = self
            .symbols
            .lookup_function(name)
            .cloned()
            .ok_or_else(|| Error::UndefinedFunction {
                name: name.clone(),
                span: call.span,
            })?;

        let expected = header.param_count();
        if call.args.len() != expected {
            return Err(Error::Arity {
                function: name.clone(),
                expected,
                got: call.args.len(),
                span: call.span,
            });
        }

        for ((param, formal), arg) in header.formals().zip(&call.args) {
            let given = self.check_expr(arg)?;
            if !formal.same_as(&given) {
                return Err(Error::ArgumentType {
                    function: name.clone(),
                    param: param.to_string(),
                    expected: formal,
                    got: given,
                    span: call.span,
                });
            }
        }

        Ok(header.return_type())
    }

    /// Type check an l-value. The result never carries a reference wrapper.
    pub fn check_lvalue(&mut self, lvalue: &LValue) -> Result<Type> {
        let name = &lvalue.ident.name;
        if lvalue.is_string {
            return Ok(Type::string());
        }
        if name.is_empty() {
            return Err(Error::MalformedNode {
                what: "l-value",
                span: lvalue.span,
            });
        }

        // A function name stands for its return type.
        let mut current = match self.symbols.lookup(name) {
            Some(symbol) => symbol.ty().strip_reference().clone(),
            None => {
                return Err(Error::UndeclaredVariable {
                    name: name.clone(),
                    span: lvalue.span,
                })
            }
        };

        for index in &lvalue.indices {
            let Type::Array { elem, .. } = current else {
                return Err(Error::NotAnArray {
                    name: name.clone(),
                    span: lvalue.span,
                });
            };
            let ty = self.check_expr(index)?;
            if !ty.same_as(&Type::INT) {
                return Err(Error::IndexType {
                    name: name.clone(),
                    got: ty,
                    span: index.span,
                });
            }
            current = *elem;
        }

        Ok(current)
    }
}

fn null_operand(op: &str, span: Span) -> Error {
    Error::NullOperand {
        op: op.to_string(),
        span,
    }
}

/// Check a program against the standard library
pub fn check(program: &[Stmt]) -> Result<()> {
    Checker::new()?.check_program(program)
}
