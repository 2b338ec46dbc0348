//! Resource limits for compilation and enumeration

/// Resource limits
///
/// Equations come from users and truth tables grow exponentially, so both the parser
/// and the table enumeration are bounded. Exceeding a limit is an error, never a truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting of the parser and height of the expression tree
    pub max_depth: usize,
    /// Maximum number of distinct variables in a truth table
    pub max_table_vars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_table_vars: 16,
        }
    }
}

impl Limits {
    /// Create limits with custom values
    pub fn new(max_depth: usize, max_table_vars: usize) -> Self {
        Self {
            max_depth,
            max_table_vars,
        }
    }

    /// Allow every letter of the alphabet in a truth table
    pub fn permissive() -> Self {
        Self {
            max_depth: 1024,
            max_table_vars: 26,
        }
    }
}
