//! Source location tracking

use serde::{Deserialize, Serialize};

/// Location of a node in the source program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Span {
    /// 1-based line number (0 for compiler-provided entities)
    pub line: u32,
}

impl Span {
    /// Create a new span
    pub fn new(line: u32) -> Self {
        Self { line }
    }

    /// Create a dummy span (built-ins, tests)
    pub fn dummy() -> Self {
        Self { line: 0 }
    }

    /// Whether this span points into real source
    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::dummy()
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}", self.line)
    }
}
