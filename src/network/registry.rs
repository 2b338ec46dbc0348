use itertools::Itertools;

use crate::network::{Circuit, GateId};

/// Mapping from each variable letter to the gates that represent it
///
/// The same letter may appear several times in an equation: each occurrence is its own gate.
/// The registry groups them so that they are always assigned together.
/// Letters are ordered by first appearance, that is by the smallest identifier of their gates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableRegistry {
    entries: Vec<(char, Vec<GateId>)>,
}

impl VariableRegistry {
    /// Build the registry of a circuit
    pub fn from_circuit(circuit: &Circuit) -> VariableRegistry {
        let mut entries: Vec<(char, Vec<GateId>)> = Vec::new();
        for g in circuit.gates() {
            if let Some(c) = g.kind().letter() {
                match entries.iter_mut().find(|(l, _)| *l == c) {
                    Some((_, ids)) => ids.push(g.id()),
                    None => entries.push((c, vec![g.id()])),
                }
            }
        }
        VariableRegistry { entries }
    }

    /// Number of distinct letters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there is no variable
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Letters in order of first appearance
    pub fn letters(&self) -> Vec<char> {
        self.entries.iter().map(|(c, _)| *c).collect()
    }

    /// Gates representing a letter
    pub fn gates(&self, letter: char) -> &[GateId] {
        let letter = letter.to_ascii_uppercase();
        self.entries
            .iter()
            .find(|(c, _)| *c == letter)
            .map(|(_, ids)| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Position of a letter in the registry
    pub fn position(&self, letter: char) -> Option<usize> {
        let letter = letter.to_ascii_uppercase();
        self.entries.iter().position(|(c, _)| *c == letter)
    }

    /// Iterate over letters and their gates
    pub fn iter(&self) -> impl Iterator<Item = (char, &[GateId])> + '_ {
        self.entries.iter().map(|(c, ids)| (*c, ids.as_slice()))
    }

    /// Add the letters of another registry that are not present yet, keeping the order
    pub(crate) fn merged_letters(&self, other: &VariableRegistry) -> Vec<char> {
        self.letters()
            .into_iter()
            .chain(other.letters())
            .unique()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::network::{Circuit, GateKind};

    #[test]
    fn test_registry() {
        let mut c = Circuit::new();
        let x = c.add_gate(GateKind::Or);
        let b0 = c.add_gate(GateKind::Var('B'));
        let a0 = c.add_gate(GateKind::Var('A'));
        let b1 = c.add_gate(GateKind::Var('B'));
        c.add_gate(GateKind::Const1);
        c.add_wire(b0, x, 0).unwrap();
        c.add_wire(a0, x, 1).unwrap();

        let r = c.registry();
        assert_eq!(r.len(), 2);
        assert_eq!(r.letters(), vec!['B', 'A']);
        assert_eq!(r.gates('B'), &[b0, b1]);
        assert_eq!(r.gates('a'), &[a0]);
        assert!(r.gates('C').is_empty());
        assert_eq!(r.position('A'), Some(1));
        assert_eq!(r.position('Z'), None);
    }

    #[test]
    fn test_empty() {
        let mut c = Circuit::new();
        c.add_gate(GateKind::Const0);
        assert!(c.registry().is_empty());
    }

    #[test]
    fn test_merge() {
        let mut c1 = Circuit::new();
        c1.add_gate(GateKind::Var('C'));
        c1.add_gate(GateKind::Var('A'));
        let mut c2 = Circuit::new();
        c2.add_gate(GateKind::Var('A'));
        c2.add_gate(GateKind::Var('D'));
        let letters = c1.registry().merged_letters(&c2.registry());
        assert_eq!(letters, vec!['C', 'A', 'D']);
    }
}
