//! Type System for Dana

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Int,
    /// `byte`, also used for characters
    Byte,
    Void,
    Bool,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Byte => "byte",
            Self::Void => "void",
            Self::Bool => "bool",
        }
    }
}

/// Coarse classification of a type, as seen through any reference wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    Byte,
    Void,
    Bool,
    Array,
}

impl From<ScalarKind> for TypeTag {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Int => Self::Int,
            ScalarKind::Byte => Self::Byte,
            ScalarKind::Void => Self::Void,
            ScalarKind::Bool => Self::Bool,
        }
    }
}

/// A Dana type.
///
/// `Reference` only ever wraps a parameter's declared type; variables and
/// expression results never carry it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Scalar(ScalarKind),
    /// `size` of `None` or `Some(0)` is an open array (`byte[]` parameters)
    Array {
        elem: Box<Type>,
        #[serde(default)]
        size: Option<u32>,
    },
    Reference(Box<Type>),
}

impl Type {
    // Constants for common types
    pub const INT: Self = Self::Scalar(ScalarKind::Int);
    pub const BYTE: Self = Self::Scalar(ScalarKind::Byte);
    pub const VOID: Self = Self::Scalar(ScalarKind::Void);
    pub const BOOL: Self = Self::Scalar(ScalarKind::Bool);

    /// Create an array type
    pub fn array(elem: Type, size: Option<u32>) -> Self {
        Self::Array {
            elem: Box::new(elem),
            size,
        }
    }

    /// Wrap in a reference. Already-wrapped types are returned unchanged.
    pub fn reference(base: Type) -> Self {
        match base {
            Self::Reference(_) => base,
            other => Self::Reference(Box::new(other)),
        }
    }

    /// `byte[]`, the type of string literals
    pub fn string() -> Self {
        Self::array(Self::BYTE, None)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.strip_reference(), Self::Array { .. })
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    /// Array without a known length
    pub fn is_unsized(&self) -> bool {
        matches!(
            self.strip_reference(),
            Self::Array { size: None, .. } | Self::Array { size: Some(0), .. }
        )
    }

    /// Unwrap one level: the referenced type or the array element type
    pub fn base_type(&self) -> Option<&Type> {
        match self {
            Self::Reference(inner) => Some(inner),
            Self::Array { elem, .. } => Some(elem),
            Self::Scalar(_) => None,
        }
    }

    /// Remove a reference wrapper, if any
    pub fn strip_reference(&self) -> &Type {
        match self {
            Self::Reference(inner) => inner,
            other => other,
        }
    }

    pub fn kind(&self) -> TypeTag {
        match self.strip_reference() {
            Self::Scalar(kind) => (*kind).into(),
            Self::Array { .. } => TypeTag::Array,
            Self::Reference(inner) => inner.kind(),
        }
    }

    /// Type equivalence used throughout checking.
    ///
    /// References are transparent. Only the coarse tag is compared, so any
    /// two arrays match regardless of element type or size.
    pub fn same_as(&self, other: &Type) -> bool {
        self.kind() == other.kind()
    }
}

/// Equivalence over possibly-absent types. Absent on either side is never equal.
pub fn same_type(a: Option<&Type>, b: Option<&Type>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.same_as(b),
        _ => false,
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.write_str(kind.as_str()),
            Self::Reference(inner) => write!(f, "ref {}", inner),
            Self::Array { .. } => {
                let mut dims = Vec::new();
                let mut current = self;
                while let Self::Array { elem, size } = current {
                    dims.push(*size);
                    current = elem;
                }
                write!(f, "{}", current)?;
                for size in dims {
                    match size {
                        Some(n) if n > 0 => write!(f, "[{}]", n)?,
                        _ => f.write_str("[]")?,
                    }
                }
                Ok(())
            }
        }
    }
}
