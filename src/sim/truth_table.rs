use std::fmt;

use tracing::{debug, info};
use volute::Lut;

use crate::error::{Error, ResourceError};
use crate::limits::Limits;
use crate::network::{Circuit, GateId, Value};
use crate::sim::eval::{evaluate, Assignment};

/// One line of a truth table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Value of each letter, in the order of the table
    pub inputs: Vec<bool>,
    /// Value of each output
    pub outputs: Vec<Value>,
}

/// Exhaustive table of the outputs of a circuit
///
/// Rows are sorted by increasing binary value of the inputs, the first letter being the
/// most significant bit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TruthTable {
    letters: Vec<char>,
    sinks: Vec<GateId>,
    rows: Vec<Row>,
}

impl TruthTable {
    /// Letters of the inputs, in order of first appearance in the circuit
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// Output gates, one per output column
    pub fn sinks(&self) -> &[GateId] {
        &self.sinks
    }

    /// All rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn nb_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the table has no row
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one output column, in row order
    pub fn column(&self, output: usize) -> Vec<Value> {
        self.rows
            .iter()
            .map(|r| r.outputs.get(output).copied().unwrap_or_default())
            .collect()
    }

    /// Convert an output column to a lookup table
    ///
    /// Variable j of the lookup table is the j-th letter. Unset outputs are converted to
    /// zero. Returns None if the output does not exist or the table is empty.
    pub fn to_lut(&self, output: usize) -> Option<Lut> {
        if output >= self.sinks.len() || self.rows.is_empty() {
            return None;
        }
        let k = self.letters.len();
        let mut lut = Lut::zero(k);
        for (i, r) in self.rows.iter().enumerate() {
            // The first letter is the most significant bit of the row index
            let mask = (0..k)
                .filter(|j| (i >> (k - 1 - j)) & 1 != 0)
                .map(|j| 1usize << j)
                .sum::<usize>();
            lut.set_value(mask, r.outputs[output] == Value::One);
        }
        Some(lut)
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.letters {
            write!(f, "{c} ")?;
        }
        write!(f, "|")?;
        for s in &self.sinks {
            write!(f, " {s}")?;
        }
        writeln!(f)?;
        for r in &self.rows {
            for b in &r.inputs {
                write!(f, "{} ", u8::from(*b))?;
            }
            write!(f, "|")?;
            for v in &r.outputs {
                write!(f, " {v}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Enumerate the truth table of a circuit
///
/// See [`enumerate_truth_table_with`].
pub fn enumerate_truth_table(circuit: &mut Circuit, limits: &Limits) -> Result<TruthTable, Error> {
    enumerate_truth_table_with(circuit, limits, |_, _| ())
}

/// Enumerate the truth table of a circuit, reporting progress after each row
///
/// Every combination of the letters is applied to all Var gates of each letter, and all
/// outputs are evaluated. The progress callback receives the number of rows done and the
/// total number of rows. Var gates are unset afterwards, even on error.
/// The table is empty if there is no letter or no output. Too many letters is an error,
/// and no row is computed in that case.
pub fn enumerate_truth_table_with<F: FnMut(usize, usize)>(
    circuit: &mut Circuit,
    limits: &Limits,
    mut progress: F,
) -> Result<TruthTable, Error> {
    let letters = circuit.registry().letters();
    let k = letters.len();
    if k > limits.max_table_vars {
        return Err(ResourceError::TableTooLarge {
            vars: k,
            limit: limits.max_table_vars,
        }
        .into());
    }
    let sinks = circuit.sinks();
    let mut table = TruthTable {
        letters,
        sinks,
        rows: Vec::new(),
    };
    if k == 0 || table.sinks.is_empty() {
        debug!("empty truth table");
        return Ok(table);
    }

    let nb_rows = 1usize << k;
    info!(nb_letters = k, nb_rows, "enumerating truth table");
    table.rows.reserve(nb_rows);
    for i in 0..nb_rows {
        let assignment = Assignment::from_bits(&table.letters, i);
        circuit.set_inputs(&assignment);
        let eval = match evaluate(circuit, &assignment) {
            Ok(e) => e,
            Err(e) => {
                circuit.reset_inputs();
                return Err(e.into());
            }
        };
        table.rows.push(Row {
            inputs: assignment.iter().map(|(_, b)| b).collect(),
            outputs: table.sinks.iter().map(|s| eval.value(*s)).collect(),
        });
        progress(i + 1, nb_rows);
    }
    circuit.reset_inputs();
    Ok(table)
}
