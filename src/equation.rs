//! Compilation of boolean equations into circuits
//!
//! The pipeline normalizes the notation, splits the text into tokens, parses them into an
//! [`Expr`] tree and lowers the tree into a [`Circuit`]:
//! ```
//! # use boolcirc::{compile_equation, Limits};
//! let circuit = compile_equation("A ⊕ B'", &Limits::default()).unwrap();
//! assert_eq!(circuit.nb_gates(), 4);
//! ```

mod builder;
mod normalize;
mod parser;
mod token;

use tracing::debug;

pub use builder::CircuitBuilder;
pub use normalize::{normalize, normalize_to_string};
pub use parser::{parse, Expr};
pub use token::{tokenize, Lexeme, Token};

use crate::error::SyntaxError;
use crate::limits::Limits;
use crate::network::Circuit;

/// Parse an equation into an expression tree
pub fn parse_equation(text: &str, limits: &Limits) -> Result<Expr, SyntaxError> {
    let tokens = tokenize(text)?;
    debug!(nb_tokens = tokens.len(), "tokenized equation");
    let expr = parse(&tokens, limits)?;
    debug!(expr = %expr, "parsed equation");
    Ok(expr)
}

/// Compile an equation into a new circuit
///
/// On error, nothing is built.
pub fn compile_equation(text: &str, limits: &Limits) -> Result<Circuit, SyntaxError> {
    let expr = parse_equation(text, limits)?;
    let circuit = CircuitBuilder::build(&expr);
    debug!(
        nb_gates = circuit.nb_gates(),
        nb_wires = circuit.nb_wires(),
        "compiled equation"
    );
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::GateKind;

    #[test]
    fn test_compile() {
        let c = compile_equation("A XOR B", &Limits::default()).unwrap();
        c.check();
        assert_eq!(c.nb_gates(), 3);
        assert_eq!(c.nb_wires(), 2);

        let c = compile_equation("!A . B", &Limits::default()).unwrap();
        c.check();
        assert_eq!(c.nb_gates(), 4);
        assert_eq!(c.nb_wires(), 3);
        assert_eq!(c.gates()[0].kind(), GateKind::And);
    }

    #[test]
    fn test_notations_agree() {
        let limits = Limits::default();
        let reference = compile_equation("(A AND !B) OR (C XOR D)", &limits).unwrap();
        for eq in [
            "(a·¬b)+(c⊕d)",
            "(A*~B) ∨ (C ⊗ D)",
            "(A.B')+(C⊖D)",
            "(A∧B\u{0305})+(CXORD)",
        ] {
            let c = compile_equation(eq, &limits).unwrap();
            assert!(c.same_structure(&reference), "{eq}");
        }
    }

    #[test]
    fn test_errors() {
        let limits = Limits::default();
        assert_eq!(
            compile_equation("A AND", &limits).unwrap_err(),
            SyntaxError::IncompleteExpression
        );
        assert_eq!(
            compile_equation("A # B", &limits).unwrap_err(),
            SyntaxError::InvalidCharacter { ch: '#', pos: 2 }
        );
    }

    #[test]
    fn test_parse_equation() {
        let e = parse_equation("a + b . c", &Limits::default()).unwrap();
        assert_eq!(e.to_string(), "(A OR (B AND C))");
        assert_eq!(e.letters(), vec!['A', 'B', 'C']);
    }
}
