use core::fmt;

use fxhash::{FxHashMap, FxHashSet};

use crate::error::{EvaluationError, FormatError};
use crate::network::gates::{Gate, GateId, GateKind, Position};
use crate::network::registry::VariableRegistry;
use crate::network::value::Value;
use crate::sim::{Assignment, Evaluation};

/// Directed connection from the output of a gate to an input slot of another gate
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Wire {
    pub(crate) from: GateId,
    pub(crate) to: GateId,
    pub(crate) slot: usize,
    pub(crate) active: bool,
}

impl Wire {
    /// Gate driving the wire
    pub fn from(&self) -> GateId {
        self.from
    }

    /// Gate receiving the wire
    pub fn to(&self) -> GateId {
        self.to
    }

    /// Input slot of the receiving gate
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Whether the step simulation has propagated through this wire
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}[{}]", self.from, self.to, self.slot)
    }
}

/// Representation of a combinational circuit as gates and wires
///
/// Gates are kept in increasing order of identifier, which is their creation order until
/// identifiers run out and freed ones are reused.
/// Each filled input slot corresponds to exactly one wire. Gates without any outgoing
/// wire are the outputs of the circuit, called sinks.
/// The structure does not prevent loops while editing: they are detected on evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circuit {
    gates: Vec<Gate>,
    wires: Vec<Wire>,
    next_id: u32,
}

impl Circuit {
    /// Create a new empty circuit
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of gates
    pub fn nb_gates(&self) -> usize {
        self.gates.len()
    }

    /// Return the number of wires
    pub fn nb_wires(&self) -> usize {
        self.wires.len()
    }

    /// Returns whether the circuit has no gate
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// All gates, in increasing identifier order
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// All wires, in creation order
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Get a gate by identifier
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.index_of(id).map(|i| &self.gates[i])
    }

    /// Returns whether a gate exists
    pub fn contains(&self, id: GateId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: GateId) -> Option<usize> {
        self.gates.binary_search_by_key(&id, |g| g.id).ok()
    }

    fn gate_mut(&mut self, id: GateId) -> Option<&mut Gate> {
        self.index_of(id).map(|i| &mut self.gates[i])
    }

    /// Add a new gate with unconnected inputs
    pub fn add_gate(&mut self, kind: GateKind) -> GateId {
        self.add_gate_at(kind, Position::default())
    }

    /// Add a new gate at a given position
    ///
    /// Variable letters are normalized to uppercase.
    pub fn add_gate_at(&mut self, kind: GateKind, pos: Position) -> GateId {
        let id = match self.next_id.checked_add(1) {
            Some(next) => {
                let id = GateId::new(self.next_id);
                self.next_id = next;
                id
            }
            None => self.free_id(),
        };
        let mut g = Gate::new(id, kind.normalized());
        g.pos = pos;
        let at = self.gates.partition_point(|g| g.id < id);
        self.gates.insert(at, g);
        id
    }

    /// Smallest identifier not used by any gate
    fn free_id(&self) -> GateId {
        let free = self
            .gates
            .iter()
            .zip(0u32..)
            .find(|(g, i)| g.id.index() != *i)
            .map_or(self.gates.len() as u32, |(_, i)| i);
        GateId::new(free)
    }

    /// Insert a gate with a given identifier, as read from a file
    ///
    /// The largest identifier is reserved and rejected.
    pub(crate) fn insert_gate(&mut self, mut gate: Gate) -> Result<(), FormatError> {
        let next = gate
            .id
            .index()
            .checked_add(1)
            .ok_or(FormatError::IdOverflow(gate.id))?;
        match self.gates.binary_search_by_key(&gate.id, |g| g.id) {
            Ok(_) => Err(FormatError::DuplicateId(gate.id)),
            Err(pos) => {
                gate.kind = gate.kind.normalized();
                self.next_id = self.next_id.max(next);
                self.gates.insert(pos, gate);
                Ok(())
            }
        }
    }

    /// Connect the output of a gate to an input slot of another gate
    ///
    /// The slot must exist and be free: a connected slot is never overwritten.
    pub fn add_wire(&mut self, from: GateId, to: GateId, slot: usize) -> Result<(), FormatError> {
        if !self.contains(from) {
            return Err(FormatError::BadReference(from));
        }
        if from == to {
            return Err(FormatError::SelfLoop(from));
        }
        let g = self.gate_mut(to).ok_or(FormatError::BadReference(to))?;
        if slot >= g.slots.len() {
            return Err(FormatError::ArityMismatch {
                gate: to,
                arity: g.slots.len(),
                found: slot,
            });
        }
        if g.slots[slot].is_some() {
            return Err(FormatError::DuplicateSlot { gate: to, slot });
        }
        g.slots[slot] = Some(from);
        self.wires.push(Wire {
            from,
            to,
            slot,
            active: false,
        });
        Ok(())
    }

    /// Remove the wire connected to an input slot, if any
    pub fn disconnect(&mut self, to: GateId, slot: usize) -> Option<Wire> {
        let pos = self
            .wires
            .iter()
            .position(|w| w.to == to && w.slot == slot)?;
        let w = self.wires.remove(pos);
        if let Some(g) = self.gate_mut(to) {
            g.slots[slot] = None;
        }
        Some(w)
    }

    /// Remove a gate and every wire connected to it
    ///
    /// Returns false if the gate does not exist.
    pub fn remove_gate(&mut self, id: GateId) -> bool {
        let Some(i) = self.index_of(id) else {
            return false;
        };
        self.gates.remove(i);
        self.wires.retain(|w| w.from != id && w.to != id);
        for g in self.gates.iter_mut() {
            for s in g.slots.iter_mut() {
                if *s == Some(id) {
                    *s = None;
                }
            }
        }
        true
    }

    /// Move a gate on the drawing grid
    pub fn set_position(&mut self, id: GateId, pos: Position) -> bool {
        match self.gate_mut(id) {
            Some(g) => {
                g.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Remove everything
    pub fn clear(&mut self) {
        *self = Circuit::new();
    }

    /// Wires driven by a gate
    pub fn fanout(&self, id: GateId) -> impl Iterator<Item = &Wire> + '_ {
        self.wires.iter().filter(move |w| w.from == id)
    }

    /// Wires entering a gate
    pub fn fanin(&self, id: GateId) -> impl Iterator<Item = &Wire> + '_ {
        self.wires.iter().filter(move |w| w.to == id)
    }

    /// Gates without any outgoing wire, in increasing identifier order
    pub fn sinks(&self) -> Vec<GateId> {
        let drivers: FxHashSet<GateId> = self.wires.iter().map(|w| w.from).collect();
        self.gates
            .iter()
            .map(|g| g.id)
            .filter(|id| !drivers.contains(id))
            .collect()
    }

    /// Returns whether a gate is an output of the circuit
    pub fn is_sink(&self, id: GateId) -> bool {
        self.contains(id) && self.fanout(id).next().is_none()
    }

    /// Variable letters and the gates that represent them
    pub fn registry(&self) -> VariableRegistry {
        VariableRegistry::from_circuit(self)
    }

    /// Topologically sort the gates, inputs first
    ///
    /// Fails with a gate that belongs to or depends on a combinational loop.
    pub fn topo_order(&self) -> Result<Vec<GateId>, EvaluationError> {
        // Count the input dependencies of each gate
        let mut count_deps: FxHashMap<GateId, usize> = self
            .gates
            .iter()
            .map(|g| (g.id, g.dependencies().count()))
            .collect();
        let mut fanouts: FxHashMap<GateId, Vec<GateId>> = FxHashMap::default();
        for w in &self.wires {
            fanouts.entry(w.from).or_default().push(w.to);
        }

        // Start with gates with no dependencies
        let mut to_visit: Vec<GateId> = self
            .gates
            .iter()
            .rev()
            .map(|g| g.id)
            .filter(|id| count_deps[id] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nb_gates());
        while let Some(v) = to_visit.pop() {
            order.push(v);
            for d in fanouts.get(&v).into_iter().flatten() {
                let c = count_deps.entry(*d).or_default();
                *c -= 1;
                if *c == 0 {
                    to_visit.push(*d);
                }
            }
        }

        if order.len() != self.nb_gates() {
            let stuck = self
                .gates
                .iter()
                .map(|g| g.id)
                .find(|id| count_deps[id] != 0);
            return Err(EvaluationError::CycleDetected(
                stuck.unwrap_or(GateId::new(0)),
            ));
        }
        Ok(order)
    }

    /// Check that the circuit has no combinational loop
    pub fn check_acyclic(&self) -> Result<(), EvaluationError> {
        self.topo_order().map(|_| ())
    }

    /// Set the value of every Var gate with this letter
    ///
    /// Returns the number of gates updated.
    pub fn set_input(&mut self, letter: char, value: Value) -> usize {
        let letter = letter.to_ascii_uppercase();
        let mut nb = 0;
        for g in self.gates.iter_mut() {
            if g.kind == GateKind::Var(letter) {
                g.value = value;
                nb += 1;
            }
        }
        nb
    }

    /// Apply an assignment to the Var gates; unassigned letters become unset
    pub fn set_inputs(&mut self, assignment: &Assignment) {
        for g in self.gates.iter_mut() {
            if let GateKind::Var(c) = g.kind {
                g.value = Value::from(assignment.get(c));
            }
        }
    }

    /// Current values of the Var gates, by letter
    ///
    /// If the gates of a letter disagree, the first one set wins.
    pub fn input_assignment(&self) -> Assignment {
        let mut ret = Assignment::new();
        for g in &self.gates {
            if let (GateKind::Var(c), Some(b)) = (g.kind, g.value.to_bool()) {
                if ret.get(c).is_none() {
                    ret.set(c, b);
                }
            }
        }
        ret
    }

    /// Reset all Var gates to unset
    pub fn reset_inputs(&mut self) {
        for g in self.gates.iter_mut() {
            if g.kind.letter().is_some() {
                g.value = Value::Unset;
            }
        }
    }

    /// Store the result of an evaluation in the gates
    pub fn apply_values(&mut self, eval: &Evaluation) {
        for g in self.gates.iter_mut() {
            if g.kind.letter().is_none() {
                g.value = eval.value(g.id);
            }
        }
    }

    /// Reset the activity flags of the step simulation
    pub fn clear_activity(&mut self) {
        for g in self.gates.iter_mut() {
            g.active = false;
        }
        for w in self.wires.iter_mut() {
            w.active = false;
        }
    }

    /// Mark a gate and the wires entering it as active
    pub(crate) fn activate(&mut self, id: GateId) {
        if let Some(g) = self.gate_mut(id) {
            g.active = true;
        }
        for w in self.wires.iter_mut() {
            if w.to == id {
                w.active = true;
            }
        }
    }

    /// Compare the structure of two circuits, ignoring identifiers and positions
    ///
    /// Gates are matched by their rank in identifier order.
    pub fn same_structure(&self, other: &Circuit) -> bool {
        if self.nb_gates() != other.nb_gates() || self.nb_wires() != other.nb_wires() {
            return false;
        }
        let rank = |c: &Circuit| -> FxHashMap<GateId, usize> {
            c.gates.iter().enumerate().map(|(i, g)| (g.id, i)).collect()
        };
        let r1 = rank(self);
        let r2 = rank(other);
        self.gates.iter().zip(other.gates.iter()).all(|(a, b)| {
            a.kind == b.kind
                && a.slots.len() == b.slots.len()
                && a
                    .slots
                    .iter()
                    .zip(b.slots.iter())
                    .all(|(x, y)| x.map(|i| r1[&i]) == y.map(|i| r2[&i]))
        })
    }

    /// Check consistency of the datastructure
    pub fn check(&self) {
        assert!(
            self.gates.windows(2).all(|w| w[0].id < w[1].id),
            "Gates are not sorted"
        );
        for g in &self.gates {
            assert_eq!(g.slots.len(), g.kind.arity(), "Invalid arity for {}", g.id);
            assert!(g.id.index() < self.next_id, "Invalid identifier {}", g.id);
        }
        for w in &self.wires {
            assert!(self.contains(w.from), "Invalid wire source {w}");
            let g = self.gate(w.to);
            assert!(g.is_some(), "Invalid wire destination {w}");
            if let Some(g) = g {
                assert_eq!(g.slots[w.slot], Some(w.from), "Invalid wire {w}");
            }
        }
        let nb_filled: usize = self.gates.iter().map(|g| g.dependencies().count()).sum();
        assert_eq!(nb_filled, self.wires.len(), "Slots and wires differ");
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sinks = self.sinks();
        writeln!(
            f,
            "Circuit with {} gates, {} wires, {} outputs:",
            self.nb_gates(),
            self.nb_wires(),
            sinks.len()
        )?;
        for g in &self.gates {
            writeln!(f, "\t{} = {}", g.id, g)?;
        }
        for (i, s) in sinks.iter().enumerate() {
            writeln!(f, "\to{} = {}", i, s)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{EvaluationError, FormatError};
    use crate::network::{Circuit, Gate, GateId, GateKind, Value};

    #[test]
    fn test_basic() {
        let mut c = Circuit::new();
        let a = c.add_gate(GateKind::Var('A'));
        let b = c.add_gate(GateKind::Var('B'));
        let x = c.add_gate(GateKind::Xor);
        c.add_wire(a, x, 0).unwrap();
        c.add_wire(b, x, 1).unwrap();
        c.check();

        // Basic properties
        assert_eq!(c.nb_gates(), 3);
        assert_eq!(c.nb_wires(), 2);
        assert_eq!(c.sinks(), vec![x]);
        assert!(c.is_sink(x));
        assert!(!c.is_sink(a));

        // Access
        assert_eq!(c.gate(x).unwrap().slots(), &[Some(a), Some(b)]);
        assert_eq!(c.gate(a).unwrap().kind(), GateKind::Var('A'));
        assert!(c.gate(GateId::new(7)).is_none());
    }

    #[test]
    fn test_wire_errors() {
        let mut c = Circuit::new();
        let a = c.add_gate(GateKind::Var('A'));
        let n = c.add_gate(GateKind::Not);
        let x = c.add_gate(GateKind::And);
        let unknown = GateId::new(42);

        assert_eq!(c.add_wire(unknown, x, 0), Err(FormatError::BadReference(unknown)));
        assert_eq!(c.add_wire(a, unknown, 0), Err(FormatError::BadReference(unknown)));
        assert_eq!(c.add_wire(x, x, 0), Err(FormatError::SelfLoop(x)));
        assert_eq!(
            c.add_wire(a, n, 1),
            Err(FormatError::ArityMismatch {
                gate: n,
                arity: 1,
                found: 1
            })
        );
        assert_eq!(
            c.add_wire(x, a, 0),
            Err(FormatError::ArityMismatch {
                gate: a,
                arity: 0,
                found: 0
            })
        );
        c.add_wire(a, n, 0).unwrap();
        assert_eq!(
            c.add_wire(x, n, 0),
            Err(FormatError::DuplicateSlot { gate: n, slot: 0 })
        );
        // The slot kept its original driver
        assert_eq!(c.gate(n).unwrap().slots(), &[Some(a)]);
        c.check();
    }

    #[test]
    fn test_remove_gate() {
        let mut c = Circuit::new();
        let a = c.add_gate(GateKind::Var('A'));
        let b = c.add_gate(GateKind::Var('B'));
        let x = c.add_gate(GateKind::Or);
        c.add_wire(a, x, 0).unwrap();
        c.add_wire(b, x, 1).unwrap();
        assert!(c.remove_gate(a));
        assert!(!c.remove_gate(a));
        assert_eq!(c.nb_gates(), 2);
        assert_eq!(c.nb_wires(), 1);
        assert_eq!(c.gate(x).unwrap().slots(), &[None, Some(b)]);
        c.check();

        // Identifiers are never reused
        let d = c.add_gate(GateKind::Const1);
        assert_eq!(d, GateId::new(3));
        c.add_wire(d, x, 0).unwrap();
        c.check();
    }

    #[test]
    fn test_disconnect() {
        let mut c = Circuit::new();
        let a = c.add_gate(GateKind::Var('A'));
        let n = c.add_gate(GateKind::Not);
        c.add_wire(a, n, 0).unwrap();
        assert_eq!(c.sinks(), vec![n]);
        let w = c.disconnect(n, 0).unwrap();
        assert_eq!(w.from(), a);
        assert!(c.disconnect(n, 0).is_none());
        assert_eq!(c.sinks(), vec![a, n]);
        c.add_wire(a, n, 0).unwrap();
        c.check();
    }

    #[test]
    fn test_topo_order() {
        let mut c = Circuit::new();
        let x = c.add_gate(GateKind::And);
        let a = c.add_gate(GateKind::Var('A'));
        let n = c.add_gate(GateKind::Not);
        c.add_wire(a, n, 0).unwrap();
        c.add_wire(n, x, 0).unwrap();
        c.add_wire(a, x, 1).unwrap();
        let order = c.topo_order().unwrap();
        assert_eq!(order, vec![a, n, x]);
    }

    #[test]
    fn test_cycle() {
        let mut c = Circuit::new();
        let a = c.add_gate(GateKind::Var('A'));
        let x = c.add_gate(GateKind::And);
        let y = c.add_gate(GateKind::Or);
        c.add_wire(a, x, 0).unwrap();
        c.add_wire(x, y, 0).unwrap();
        c.add_wire(y, x, 1).unwrap();
        assert_eq!(c.check_acyclic(), Err(EvaluationError::CycleDetected(x)));
    }

    #[test]
    fn test_inputs() {
        let mut c = Circuit::new();
        let a0 = c.add_gate(GateKind::Var('A'));
        let b = c.add_gate(GateKind::Var('B'));
        let a1 = c.add_gate(GateKind::Var('A'));
        assert_eq!(c.set_input('a', Value::One), 2);
        assert_eq!(c.gate(a0).unwrap().value(), Value::One);
        assert_eq!(c.gate(a1).unwrap().value(), Value::One);
        assert_eq!(c.gate(b).unwrap().value(), Value::Unset);
        let assignment = c.input_assignment();
        assert_eq!(assignment.get('A'), Some(true));
        assert_eq!(assignment.get('B'), None);
        c.reset_inputs();
        assert!(c.input_assignment().is_empty());
    }

    #[test]
    fn test_same_structure() {
        let build = |first: GateKind| {
            let mut c = Circuit::new();
            let a = c.add_gate(first);
            let b = c.add_gate(GateKind::Var('B'));
            let x = c.add_gate(GateKind::Nand);
            c.add_wire(a, x, 0).unwrap();
            c.add_wire(b, x, 1).unwrap();
            c
        };
        let c1 = build(GateKind::Var('A'));
        let mut c2 = build(GateKind::Var('A'));
        let c3 = build(GateKind::Const0);
        assert!(c1.same_structure(&c2));
        assert!(!c1.same_structure(&c3));
        c2.disconnect(GateId::new(2), 1);
        assert!(!c1.same_structure(&c2));
    }

    #[test]
    fn test_letter_case() {
        let mut c = Circuit::new();
        let a = c.add_gate(GateKind::Var('a'));
        let b = c.add_gate(GateKind::Var('A'));
        let x = c.add_gate(GateKind::Xor);
        c.add_wire(a, x, 0).unwrap();
        c.add_wire(b, x, 1).unwrap();
        assert_eq!(c.gate(a).unwrap().kind(), GateKind::Var('A'));
        assert_eq!(c.registry().letters(), vec!['A']);
        assert_eq!(c.set_input('a', Value::One), 2);
    }

    #[test]
    fn test_id_exhaustion() {
        let mut c = Circuit::new();
        let g = Gate::new(GateId::new(u32::MAX - 1), GateKind::Const1);
        c.insert_gate(g).unwrap();
        let last = Gate::new(GateId::new(u32::MAX), GateKind::Const0);
        assert_eq!(
            c.insert_gate(last),
            Err(FormatError::IdOverflow(GateId::new(u32::MAX)))
        );

        // Identifiers are exhausted: the free ones are reused, in order
        let x = c.add_gate(GateKind::Not);
        let y = c.add_gate(GateKind::Not);
        assert_eq!(x, GateId::new(0));
        assert_eq!(y, GateId::new(1));
        c.add_wire(x, y, 0).unwrap();
        c.check();
        assert_eq!(c.nb_gates(), 3);
    }
}
