use std::fmt;

use fxhash::FxHashMap;
use tracing::warn;

use crate::error::EvaluationError;
use crate::network::{Circuit, Gate, GateId, GateKind, Value};

/// Values given to the input letters
///
/// Letters are kept in insertion order. Letters that are not assigned are unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<(char, bool)>,
}

impl Assignment {
    /// Create an empty assignment
    pub fn new() -> Assignment {
        Assignment::default()
    }

    /// Create an assignment from the bits of an integer
    ///
    /// The first letter takes the most significant bit, as in the rows of a truth table.
    pub fn from_bits(letters: &[char], bits: usize) -> Assignment {
        let k = letters.len();
        Assignment {
            values: letters
                .iter()
                .enumerate()
                .map(|(j, c)| (c.to_ascii_uppercase(), (bits >> (k - 1 - j)) & 1 != 0))
                .collect(),
        }
    }

    /// Value of a letter, if assigned
    pub fn get(&self, letter: char) -> Option<bool> {
        let letter = letter.to_ascii_uppercase();
        self.values
            .iter()
            .find(|(c, _)| *c == letter)
            .map(|(_, b)| *b)
    }

    /// Assign a letter, replacing any previous value
    pub fn set(&mut self, letter: char, value: bool) {
        let letter = letter.to_ascii_uppercase();
        match self.values.iter_mut().find(|(c, _)| *c == letter) {
            Some((_, b)) => *b = value,
            None => self.values.push((letter, value)),
        }
    }

    /// Remove the value of a letter
    pub fn unset(&mut self, letter: char) {
        let letter = letter.to_ascii_uppercase();
        self.values.retain(|(c, _)| *c != letter);
    }

    /// Returns whether no letter is assigned
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of assigned letters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over the assigned letters, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (char, bool)> + '_ {
        self.values.iter().copied()
    }
}

impl FromIterator<(char, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (char, bool)>>(iter: I) -> Assignment {
        let mut ret = Assignment::new();
        for (c, b) in iter {
            ret.set(c, b);
        }
        ret
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (c, b) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{}={}", c, u8::from(b))?;
        }
        Ok(())
    }
}

/// Result of the evaluation of a circuit: one value per gate
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    values: FxHashMap<GateId, Value>,
    sinks: Vec<GateId>,
}

impl Evaluation {
    /// Value of a gate; unset for an unknown gate
    pub fn value(&self, id: GateId) -> Value {
        self.values.get(&id).copied().unwrap_or_default()
    }

    /// Output gates of the circuit, in increasing identifier order
    pub fn sinks(&self) -> &[GateId] {
        &self.sinks
    }

    /// Values of the outputs, in the same order as the sinks
    pub fn outputs(&self) -> Vec<Value> {
        self.sinks.iter().map(|s| self.value(*s)).collect()
    }

    /// Value of the first output, or unset if there is none
    pub fn first_output(&self) -> Value {
        self.sinks
            .first()
            .map(|s| self.value(*s))
            .unwrap_or_default()
    }
}

/// Traversal state of a gate during evaluation
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Mark {
    /// On the current traversal path
    InProgress,
    /// Value computed
    Done,
}

/// Compute the value of a gate whose inputs are already computed
fn gate_value(gate: &Gate, values: &FxHashMap<GateId, Value>, assignment: &Assignment) -> Value {
    use GateKind::*;
    let input = |i: usize| {
        gate.slots()[i]
            .and_then(|d| values.get(&d).copied())
            .unwrap_or_default()
    };
    match gate.kind() {
        Const0 => Value::Zero,
        Const1 => Value::One,
        Var(c) => Value::from(assignment.get(c)),
        Not => !input(0),
        And | Or | Nand | Nor | Xor | Xnor => match gate.kind().binary_op() {
            Some(op) => op.eval(input(0), input(1)),
            None => Value::Unset,
        },
    }
}

/// Evaluate every gate of a circuit for an assignment of the letters
///
/// Unassigned letters and unconnected slots are unset, and an unset input makes the gate
/// unset. Every gate is visited, so that a loop is detected even if no output depends on it.
/// The traversal is depth-first with an explicit stack: a gate found again while it is
/// still on the path closes a loop.
pub fn evaluate(circuit: &Circuit, assignment: &Assignment) -> Result<Evaluation, EvaluationError> {
    let mut marks: FxHashMap<GateId, Mark> = FxHashMap::default();
    let mut values: FxHashMap<GateId, Value> = FxHashMap::default();
    for root in circuit.gates() {
        if marks.contains_key(&root.id()) {
            continue;
        }
        marks.insert(root.id(), Mark::InProgress);
        let mut stack: Vec<(&Gate, usize)> = vec![(root, 0)];
        while let Some((gate, next_slot)) = stack.last().copied() {
            if next_slot < gate.slots().len() {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                let Some(d) = gate.slots()[next_slot] else {
                    continue;
                };
                match marks.get(&d) {
                    Some(Mark::Done) => (),
                    Some(Mark::InProgress) => {
                        warn!(gate = %d, "combinational loop detected");
                        return Err(EvaluationError::CycleDetected(d));
                    }
                    None => {
                        // Dangling references are unset
                        if let Some(dg) = circuit.gate(d) {
                            marks.insert(d, Mark::InProgress);
                            stack.push((dg, 0));
                        }
                    }
                }
            } else {
                values.insert(gate.id(), gate_value(gate, &values, assignment));
                marks.insert(gate.id(), Mark::Done);
                stack.pop();
            }
        }
    }
    Ok(Evaluation {
        values,
        sinks: circuit.sinks(),
    })
}
