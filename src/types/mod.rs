//! Type definitions

pub mod type_system;

pub use type_system::{same_type, ScalarKind, Type, TypeTag};
