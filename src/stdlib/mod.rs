//! Dana standard library signatures

pub mod builtins;

pub use builtins::{BuiltinFunc, BuiltinRegistry};
