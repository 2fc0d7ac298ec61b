//! Frontend module - AST, Symbol Table, Semantic Analysis

pub mod ast;
pub mod symbols;
pub mod semantic;
