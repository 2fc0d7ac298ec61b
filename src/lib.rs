//! Dana semantic analysis core
//!
//! Takes a parsed Dana program and performs name resolution, scope
//! management and type checking, stopping at the first error.

pub mod feedback;
pub mod frontend;
pub mod stdlib;
pub mod types;
pub mod utils;

pub use frontend::semantic::{check, Checker};
pub use frontend::symbols::SymbolTable;
pub use utils::{Error, Result, Span};
