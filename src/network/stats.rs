//! Compute gate statistics
//!
//! ```
//! # use boolcirc::{compile_equation, Limits};
//! # let circuit = compile_equation("A + B . C", &Limits::default()).unwrap();
//! use boolcirc::network::stats::stats;
//! let stats = stats(&circuit);
//!
//! // Check that there is no Xor gate
//! assert_eq!(stats.nb_xor, 0);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use fxhash::FxHashMap;

use crate::network::{Circuit, GateKind};

/// Number of gates of each kind in a circuit
#[derive(Clone, Debug, Default)]
pub struct CircuitStats {
    /// Number of distinct variable letters
    pub nb_letters: usize,
    /// Number of Var gates
    pub nb_var: usize,
    /// Number of outputs
    pub nb_sinks: usize,
    /// Number of wires
    pub nb_wires: usize,
    /// Number of And gates
    pub nb_and: usize,
    /// Number of Nand gates
    pub nb_nand: usize,
    /// Number of Or gates
    pub nb_or: usize,
    /// Number of Nor gates
    pub nb_nor: usize,
    /// Number of Xor gates
    pub nb_xor: usize,
    /// Number of Xnor gates
    pub nb_xnor: usize,
    /// Number of Not gates
    pub nb_not: usize,
    /// Number of constant gates
    pub nb_const: usize,
    /// Number of unconnected input slots
    pub nb_open_slots: usize,
    /// Longest path from a source to a sink, in gates; None for a circuit with a loop
    pub depth: Option<usize>,
}

impl CircuitStats {
    /// Total number of logic gates, excluding variables and constants
    pub fn nb_logic(&self) -> usize {
        self.nb_and + self.nb_nand + self.nb_or + self.nb_nor + self.nb_xor + self.nb_xnor + self.nb_not
    }

    /// Total number of gates
    pub fn nb_gates(&self) -> usize {
        self.nb_logic() + self.nb_var + self.nb_const
    }
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Variables: {} ({} gates)", self.nb_letters, self.nb_var)?;
        writeln!(f, "  Outputs: {}", self.nb_sinks)?;
        writeln!(f, "  Gates: {}", self.nb_gates())?;
        writeln!(f, "  Wires: {}", self.nb_wires)?;
        match self.depth {
            Some(d) => writeln!(f, "  Depth: {}", d)?,
            None => writeln!(f, "  Depth: combinational loop")?,
        }
        let kinds = [
            ("And", self.nb_and),
            ("Nand", self.nb_nand),
            ("Or", self.nb_or),
            ("Nor", self.nb_nor),
            ("Xor", self.nb_xor),
            ("Xnor", self.nb_xnor),
            ("Not", self.nb_not),
            ("Const", self.nb_const),
        ];
        for (name, nb) in kinds {
            if nb != 0 {
                writeln!(f, "  {}: {}", name, nb)?;
            }
        }
        if self.nb_open_slots != 0 {
            writeln!(f, "  Unconnected inputs: {}", self.nb_open_slots)?;
        }
        fmt::Result::Ok(())
    }
}

/// Compute the longest path in a circuit, or None if there is a loop
fn depth(circuit: &Circuit) -> Option<usize> {
    let order = circuit.topo_order().ok()?;
    let mut level = FxHashMap::default();
    let mut ret = 0;
    for id in order {
        let g = circuit.gate(id)?;
        let l = g.dependencies().map(|d| level[&d] + 1).max().unwrap_or(0);
        ret = ret.max(l);
        level.insert(id, l);
    }
    Some(ret)
}

/// Compute the statistics of a circuit
pub fn stats(circuit: &Circuit) -> CircuitStats {
    use GateKind::*;
    let mut ret = CircuitStats {
        nb_letters: circuit.registry().len(),
        nb_sinks: circuit.sinks().len(),
        nb_wires: circuit.nb_wires(),
        depth: depth(circuit),
        ..Default::default()
    };
    for g in circuit.gates() {
        match g.kind() {
            And => ret.nb_and += 1,
            Nand => ret.nb_nand += 1,
            Or => ret.nb_or += 1,
            Nor => ret.nb_nor += 1,
            Xor => ret.nb_xor += 1,
            Xnor => ret.nb_xnor += 1,
            Not => ret.nb_not += 1,
            Const0 | Const1 => ret.nb_const += 1,
            Var(_) => ret.nb_var += 1,
        }
        ret.nb_open_slots += g.slots().iter().filter(|s| s.is_none()).count();
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::stats;
    use crate::network::{Circuit, GateKind};
    use crate::{compile_equation, Limits};

    #[test]
    fn test_equation_stats() {
        let c = compile_equation("(A + B) . !A", &Limits::default()).unwrap();
        let s = stats(&c);
        assert_eq!(s.nb_letters, 2);
        assert_eq!(s.nb_var, 3);
        assert_eq!(s.nb_and, 1);
        assert_eq!(s.nb_or, 1);
        assert_eq!(s.nb_not, 1);
        assert_eq!(s.nb_gates(), 6);
        assert_eq!(s.nb_wires, 5);
        assert_eq!(s.nb_sinks, 1);
        assert_eq!(s.depth, Some(2));
        assert_eq!(s.nb_open_slots, 0);
    }

    #[test]
    fn test_loop_stats() {
        let mut c = Circuit::new();
        let x = c.add_gate(GateKind::Xor);
        let y = c.add_gate(GateKind::Not);
        c.add_wire(x, y, 0).unwrap();
        c.add_wire(y, x, 0).unwrap();
        let s = stats(&c);
        assert_eq!(s.depth, None);
        assert_eq!(s.nb_open_slots, 1);
        assert_eq!(s.nb_sinks, 0);
    }
}
