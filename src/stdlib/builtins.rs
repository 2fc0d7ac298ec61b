//! Built-in Functions Registry
//!
//! Signatures of the Dana standard library. Checking only needs the
//! signatures, so the registry is a plain data table that is loaded into the
//! global scope before a program is checked.

use serde::Serialize;

use crate::frontend::ast::{Header, ParamGroup};
use crate::frontend::symbols::SymbolTable;
use crate::types::Type;
use crate::utils::Result;

/// Built-in function signature
#[derive(Debug, Clone, Serialize)]
pub struct BuiltinFunc {
    pub name: &'static str,
    pub params: Vec<(&'static str, Type)>,
    /// `None` for procedures
    pub ret_type: Option<Type>,
}

impl BuiltinFunc {
    fn new(name: &'static str, params: Vec<(&'static str, Type)>, ret_type: Option<Type>) -> Self {
        Self {
            name,
            params,
            ret_type,
        }
    }

    /// Header form, one parameter group per parameter
    pub fn header(&self) -> Header {
        let params = self
            .params
            .iter()
            .map(|(name, ty)| ParamGroup::new(&[*name], ty.clone(), false))
            .collect();
        Header::new(self.name, self.ret_type.clone(), params, 0)
    }
}

/// Registry of all built-in functions, in declaration order
pub struct BuiltinRegistry {
    functions: Vec<BuiltinFunc>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        let int = || Type::INT;
        let byte = || Type::BYTE;
        let string = Type::string;

        let functions = vec![
            // I/O
            BuiltinFunc::new("writeInteger", vec![("n", int())], None),
            BuiltinFunc::new("writeByte", vec![("b", byte())], None),
            BuiltinFunc::new("writeChar", vec![("b", byte())], None),
            BuiltinFunc::new("writeString", vec![("s", string())], None),
            BuiltinFunc::new("readInteger", vec![], Some(int())),
            BuiltinFunc::new("readByte", vec![], Some(byte())),
            BuiltinFunc::new("readChar", vec![], Some(byte())),
            BuiltinFunc::new("readString", vec![("n", int()), ("s", string())], None),
            // Conversions
            BuiltinFunc::new("extend", vec![("b", byte())], Some(int())),
            BuiltinFunc::new("shrink", vec![("i", int())], Some(byte())),
            // Strings
            BuiltinFunc::new("strlen", vec![("s", string())], Some(int())),
            BuiltinFunc::new("strcmp", vec![("s1", string()), ("s2", string())], Some(int())),
            BuiltinFunc::new("strcpy", vec![("trg", string()), ("src", string())], None),
            BuiltinFunc::new("strcat", vec![("trg", string()), ("src", string())], None),
        ];

        Self { functions }
    }

    /// Check if a function is a built-in
    pub fn is_builtin(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&BuiltinFunc> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn all(&self) -> impl Iterator<Item = &BuiltinFunc> {
        self.functions.iter()
    }

    /// Seed the global scope of `symbols` with every built-in
    pub fn register_into(&self, symbols: &mut SymbolTable) -> Result<()> {
        for func in &self.functions {
            symbols.add_function(&func.header())?;
        }
        Ok(())
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}
