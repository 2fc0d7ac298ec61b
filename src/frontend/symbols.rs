//! Symbol table: a stack of lexical scopes plus the loop-nesting counter

use log::{debug, trace};
use std::collections::HashMap;
use std::fmt;

use crate::frontend::ast::Header;
use crate::types::Type;
use crate::utils::{Error, Result, Span};

/// Symbol information
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub span: Span,
}

/// Kind of symbol
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Binding {
        ty: Type,
        is_param: bool,
        is_const: bool,
    },
    Function(Header),
}

impl Symbol {
    /// Declared type of a binding, return type of a function
    pub fn ty(&self) -> Type {
        match &self.kind {
            SymbolKind::Binding { ty, .. } => ty.clone(),
            SymbolKind::Function(header) => header.return_type(),
        }
    }

    pub fn as_function(&self) -> Option<&Header> {
        match &self.kind {
            SymbolKind::Function(header) => Some(header),
            SymbolKind::Binding { .. } => None,
        }
    }

    pub fn is_function(&self) -> bool {
        self.as_function().is_some()
    }

    pub fn is_param(&self) -> bool {
        matches!(self.kind, SymbolKind::Binding { is_param: true, .. })
    }

    pub fn is_const(&self) -> bool {
        matches!(self.kind, SymbolKind::Binding { is_const: true, .. })
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SymbolKind::Function(header) => write!(f, "[Function] {} -> {}", self.name, header),
            SymbolKind::Binding { ty, is_param, is_const } => {
                let tag = if *is_const {
                    "[Const]"
                } else if *is_param {
                    "[Param]"
                } else {
                    "[Var]"
                };
                write!(f, "{} {} : {}", tag, self.name, ty)
            }
        }
    }
}

/// A scope containing symbols
#[derive(Debug, Default)]
struct Scope {
    symbols: HashMap<String, Symbol>,
}

impl Scope {
    fn sorted(&self) -> Vec<&Symbol> {
        let mut symbols: Vec<&Symbol> = self.symbols.values().collect();
        symbols.sort_by(|a, b| a.name.cmp(&b.name));
        symbols
    }
}

/// Symbol table with nested scopes.
///
/// Index 0 is the global scope, where every function lives regardless of
/// where it was declared. Lookups walk from the innermost scope outward.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    loop_depth: usize,
}

impl SymbolTable {
    /// Create a table with the global scope open
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            loop_depth: 0,
        }
    }

    /// Enter a new scope
    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
        trace!("enter scope (depth {})", self.scopes.len());
    }

    /// Exit the current scope
    pub fn exit_scope(&mut self) -> Result<()> {
        if self.scopes.pop().is_none() {
            return Err(Error::internal("exit_scope called with no active scope"));
        }
        trace!("exit scope (depth {})", self.scopes.len());
        Ok(())
    }

    /// Number of open scopes, the global one included
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    fn define(&mut self, symbol: Symbol, what: &'static str, global: bool) -> Result<()> {
        let scope = if global {
            self.scopes.first_mut()
        } else {
            self.scopes.last_mut()
        };
        let scope = scope.ok_or_else(|| Error::internal("no active scope"))?;
        if scope.symbols.contains_key(&symbol.name) {
            return Err(Error::Redeclaration {
                what,
                name: symbol.name.clone(),
                span: symbol.span,
            });
        }
        scope.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    fn binding(name: &str, ty: Type, is_param: bool, is_const: bool, span: Span) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Binding {
                ty,
                is_param,
                is_const,
            },
            span,
        }
    }

    /// Define a variable in the current scope
    pub fn add_variable(&mut self, name: &str, ty: Type, span: Span) -> Result<()> {
        self.define(Self::binding(name, ty, false, false, span), "variable", false)
    }

    /// Define a function parameter in the current scope
    pub fn add_parameter(&mut self, name: &str, ty: Type, span: Span) -> Result<()> {
        self.define(Self::binding(name, ty, true, false, span), "parameter", false)
    }

    /// Define a constant in the current scope
    pub fn add_constant(&mut self, name: &str, ty: Type, span: Span) -> Result<()> {
        self.define(Self::binding(name, ty, false, true, span), "constant", false)
    }

    /// Register a function signature in the global scope
    pub fn add_function(&mut self, header: &Header) -> Result<()> {
        if header.name.name.is_empty() {
            return Err(Error::MalformedNode {
                what: "function header",
                span: header.span,
            });
        }
        let symbol = Symbol {
            name: header.name.name.clone(),
            kind: SymbolKind::Function(header.clone()),
            span: header.span,
        };
        self.define(symbol, "function", true)?;
        debug!("registered function {}", header);
        Ok(())
    }

    /// Look up a symbol, searching from current scope outward
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
    }

    /// Look up a symbol only in the current scope
    pub fn lookup_current_scope(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last()?.symbols.get(name)
    }

    /// Look up a function signature. Non-function entries are skipped.
    pub fn lookup_function(&self, name: &str) -> Option<&Header> {
        self.scopes
            .iter()
            .rev()
            .filter_map(|scope| scope.symbols.get(name))
            .find_map(Symbol::as_function)
    }

    pub fn enter_loop(&mut self) {
        self.loop_depth += 1;
        trace!("enter loop (depth {})", self.loop_depth);
    }

    /// Leave a loop. Stays at zero when no loop is open.
    pub fn exit_loop(&mut self) {
        self.loop_depth = self.loop_depth.saturating_sub(1);
        trace!("exit loop (depth {})", self.loop_depth);
    }

    pub fn inside_loop(&self) -> bool {
        self.loop_depth > 0
    }

    pub fn loop_depth(&self) -> usize {
        self.loop_depth
    }

    /// Render the innermost scope
    pub fn dump_current_scope(&self) -> String {
        let Some(scope) = self.scopes.last() else {
            return "<no active scope>\n".to_string();
        };
        let mut out = String::from("---- Current Scope ----\n");
        for symbol in scope.sorted() {
            out.push_str(&format!("{}\n", symbol));
        }
        out
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==== Symbol Table ====")?;
        for (level, scope) in self.scopes.iter().enumerate() {
            writeln!(f, "Scope {}:", level)?;
            for symbol in scope.sorted() {
                writeln!(f, "{}", symbol)?;
            }
        }
        writeln!(f, "======================")
    }
}
