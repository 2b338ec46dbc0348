//! Export of truth tables as CSV
//!
//! The header lists the letters, then the output column. Each row gives the value of each
//! letter and of the first output:
//! ```text
//!     A,B,Output
//!     0,0,0
//!     0,1,1
//!     1,0,1
//!     1,1,0
//! ```
//! Unset outputs are written as 0.

use std::io::Write;

use crate::network::Value;
use crate::sim::TruthTable;

/// Title of the output column
pub const OUTPUT_HEADER: &str = "Output";

/// Write a truth table in CSV format
pub fn write_csv<W: Write>(w: &mut W, table: &TruthTable) -> std::io::Result<()> {
    for c in table.letters() {
        write!(w, "{c},")?;
    }
    writeln!(w, "{OUTPUT_HEADER}")?;
    for r in table.rows() {
        for b in &r.inputs {
            write!(w, "{},", u8::from(*b))?;
        }
        let out = r.outputs.first().copied().unwrap_or_default();
        writeln!(w, "{}", u8::from(out == Value::One))?;
    }
    Ok(())
}

/// Export a truth table to a CSV string
pub fn to_csv_string(table: &TruthTable) -> String {
    let mut buf = Vec::new();
    // Writing to memory does not fail
    let _ = write_csv(&mut buf, table);
    String::from_utf8_lossy(&buf).into_owned()
}
