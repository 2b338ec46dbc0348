//! Canonical JSON record of a circuit
//!
//! The record lists the gates with their input slots, and the wires:
//! ```text
//!     {
//!       "gates": [
//!         { "id": 0, "kind": "XOR", "slots": [1, 2], "value": null, "x": 360, "y": 160 },
//!         { "id": 1, "kind": "VAR(A)", "slots": [], "value": 1, "x": 260, "y": 120 },
//!         { "id": 2, "kind": "VAR(B)", "slots": [], "value": 0, "x": 260, "y": 200 }
//!       ],
//!       "wires": [
//!         { "from": 1, "to": 0, "slot": 0 },
//!         { "from": 2, "to": 0, "slot": 1 }
//!       ]
//!     }
//! ```
//! Slots and wires carry the same information: they must agree when a record is loaded.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Error, FormatError};
use crate::network::{Circuit, Gate, GateId, GateKind, Position, Value};

/// Serializable description of a gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateRecord {
    /// Unique identifier
    pub id: GateId,
    /// Kind of the gate, such as `AND` or `VAR(A)`
    pub kind: String,
    /// Gate connected to each input slot
    pub slots: Vec<Option<GateId>>,
    /// Last value of the gate
    #[serde(default)]
    pub value: Value,
    /// Horizontal position
    #[serde(default)]
    pub x: i32,
    /// Vertical position
    #[serde(default)]
    pub y: i32,
}

/// Serializable description of a wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    /// Driving gate
    pub from: GateId,
    /// Receiving gate
    pub to: GateId,
    /// Input slot of the receiving gate
    pub slot: usize,
}

/// Serializable description of a circuit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitRecord {
    /// Gates, in increasing identifier order
    pub gates: Vec<GateRecord>,
    /// Wires, in creation order
    pub wires: Vec<WireRecord>,
}

/// Create the record of a circuit
pub fn to_record(circuit: &Circuit) -> CircuitRecord {
    CircuitRecord {
        gates: circuit
            .gates()
            .iter()
            .map(|g| GateRecord {
                id: g.id(),
                kind: g.kind().to_string(),
                slots: g.slots().to_vec(),
                value: g.value(),
                x: g.position().x,
                y: g.position().y,
            })
            .collect(),
        wires: circuit
            .wires()
            .iter()
            .map(|w| WireRecord {
                from: w.from(),
                to: w.to(),
                slot: w.slot(),
            })
            .collect(),
    }
}

/// Build a circuit from a record, checking its consistency
///
/// The circuit is rebuilt from the gates and the wires; the slots declared by the gates
/// must then match. Circuits with a combinational loop are rejected.
pub fn from_record(record: &CircuitRecord) -> Result<Circuit, FormatError> {
    let mut ret = Circuit::new();
    for g in &record.gates {
        let kind: GateKind = g
            .kind
            .parse()
            .map_err(|_| FormatError::UnknownKind(g.kind.clone()))?;
        if g.slots.len() != kind.arity() {
            return Err(FormatError::ArityMismatch {
                gate: g.id,
                arity: kind.arity(),
                found: g.slots.len(),
            });
        }
        let mut gate = Gate::new(g.id, kind);
        gate.value = g.value;
        gate.pos = Position { x: g.x, y: g.y };
        ret.insert_gate(gate)?;
    }
    for w in &record.wires {
        ret.add_wire(w.from, w.to, w.slot)?;
    }
    for g in &record.gates {
        for d in g.slots.iter().flatten() {
            if !ret.contains(*d) {
                return Err(FormatError::BadReference(*d));
            }
        }
        let slots = ret.gate(g.id).map(|x| x.slots());
        if slots != Some(g.slots.as_slice()) {
            return Err(FormatError::SlotMismatch(g.id));
        }
    }
    ret.check_acyclic()?;
    Ok(ret)
}

/// Read a circuit from its JSON record
pub fn read_json<R: Read>(r: R) -> Result<Circuit, FormatError> {
    let record: CircuitRecord = serde_json::from_reader(r)?;
    from_record(&record)
}

/// Write the JSON record of a circuit
pub fn write_json<W: Write>(w: W, circuit: &Circuit) -> Result<(), Error> {
    serde_json::to_writer_pretty(w, &to_record(circuit)).map_err(|e| {
        if e.is_io() {
            Error::Io(e.into())
        } else {
            FormatError::from(e).into()
        }
    })
}

/// Parse a circuit from a JSON string
pub fn from_json_str(s: &str) -> Result<Circuit, FormatError> {
    let record: CircuitRecord = serde_json::from_str(s)?;
    from_record(&record)
}

/// Export a circuit to a JSON string
pub fn to_json_string(circuit: &Circuit) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(&to_record(circuit))?)
}
