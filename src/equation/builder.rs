use crate::equation::parser::Expr;
use crate::network::{Circuit, GateId, GateKind, Position};

/// Horizontal position of the output gate of a compiled equation
const ROOT_X: i32 = 350;
/// Vertical position of the output gate of a compiled equation
const ROOT_Y: i32 = 150;
/// Horizontal distance between a gate and its operands
const STEP_X: i32 = 100;
/// Vertical distance between a binary gate and each of its operands
const STEP_Y: i32 = 40;

/// Lowering of an expression tree into a circuit
///
/// Each node of the tree becomes a new gate, including repeated variables: `A . A` has
/// two Var gates for `A`. Gates are created in pre-order, operator first then left operand
/// then right operand, so that identifiers follow the textual order of the equation.
/// The output gate is placed on the right, and operands spread to the left.
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Create a builder with an empty circuit
    pub fn new() -> CircuitBuilder {
        CircuitBuilder::default()
    }

    /// Lower an expression into a new circuit
    pub fn build(expr: &Expr) -> Circuit {
        let mut b = CircuitBuilder::new();
        b.add_expr(expr);
        b.finish()
    }

    /// Add the gates of an expression to the circuit under construction
    ///
    /// Returns the gate computing the expression.
    pub fn add_expr(&mut self, expr: &Expr) -> GateId {
        self.lower(expr, ROOT_X, ROOT_Y)
    }

    /// Return the circuit built so far
    pub fn finish(self) -> Circuit {
        self.circuit
    }

    fn lower(&mut self, expr: &Expr, x: i32, y: i32) -> GateId {
        let pos = Position::snapped(x, y);
        match expr {
            Expr::Variable(c) => self
                .circuit
                .add_gate_at(GateKind::Var(c.to_ascii_uppercase()), pos),
            Expr::Not(a) => {
                let id = self.circuit.add_gate_at(GateKind::Not, pos);
                let a = self.lower(a, x - STEP_X, y);
                self.connect(a, id, 0);
                id
            }
            Expr::Binary(op, a, b) => {
                let id = self.circuit.add_gate_at(GateKind::from(*op), pos);
                let a = self.lower(a, x - STEP_X, y - STEP_Y);
                let b = self.lower(b, x - STEP_X, y + STEP_Y);
                self.connect(a, id, 0);
                self.connect(b, id, 1);
                id
            }
        }
    }

    fn connect(&mut self, from: GateId, to: GateId, slot: usize) {
        // Fresh gates and slots: the wire is always valid
        let res = self.circuit.add_wire(from, to, slot);
        debug_assert!(res.is_ok(), "Invalid wire {from} -> {to}[{slot}]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::BinaryOp;

    #[test]
    fn test_xor() {
        let e = Expr::binary(BinaryOp::Xor, Expr::var('A'), Expr::var('B'));
        let c = CircuitBuilder::build(&e);
        c.check();
        assert_eq!(c.nb_gates(), 3);
        assert_eq!(c.nb_wires(), 2);
        let x = GateId::new(0);
        assert_eq!(c.gate(x).unwrap().kind(), GateKind::Xor);
        assert_eq!(
            c.gate(x).unwrap().slots(),
            &[Some(GateId::new(1)), Some(GateId::new(2))]
        );
        assert_eq!(c.sinks(), vec![x]);
        assert_eq!(c.registry().letters(), vec!['A', 'B']);
    }

    #[test]
    fn test_preorder() {
        // !A . B
        let e = Expr::binary(BinaryOp::And, Expr::not(Expr::var('A')), Expr::var('B'));
        let c = CircuitBuilder::build(&e);
        c.check();
        let kinds: Vec<GateKind> = c.gates().iter().map(|g| g.kind()).collect();
        assert_eq!(
            kinds,
            vec![GateKind::And, GateKind::Not, GateKind::Var('A'), GateKind::Var('B')]
        );
    }

    #[test]
    fn test_repeated_letters() {
        let e = Expr::binary(BinaryOp::Or, Expr::var('A'), Expr::var('a'));
        let c = CircuitBuilder::build(&e);
        assert_eq!(c.registry().gates('A'), &[GateId::new(1), GateId::new(2)]);
    }

    #[test]
    fn test_positions() {
        let e = Expr::binary(BinaryOp::Nor, Expr::not(Expr::var('A')), Expr::var('B'));
        let c = CircuitBuilder::build(&e);
        let pos: Vec<Position> = c.gates().iter().map(|g| g.position()).collect();
        assert_eq!(
            pos,
            vec![
                Position::snapped(350, 150),
                Position::snapped(250, 110),
                Position::snapped(150, 110),
                Position::snapped(250, 190),
            ]
        );
        for p in pos {
            assert_eq!(p.x % 20, 0);
            assert_eq!(p.y % 20, 0);
        }
    }
}
