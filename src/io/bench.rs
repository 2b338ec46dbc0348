//! Export to .bench (ISCAS) files

use std::io::Write;

use crate::error::{Error, FormatError};
use crate::network::{Circuit, GateKind};

/// Check that a circuit can be exported: every input slot must be connected
fn check_exportable(circuit: &Circuit) -> Result<(), FormatError> {
    for g in circuit.gates() {
        if let Some(slot) = g.slots().iter().position(|s| s.is_none()) {
            return Err(FormatError::UnfilledSlot { gate: g.id(), slot });
        }
    }
    circuit.check_acyclic()?;
    Ok(())
}

/// Write a circuit in .bench format, as used by the ISCAS benchmarks
///
/// Each letter becomes an input, each sink an output, and each gate a statement:
/// ```text
///     # .bench (ISCAS) file
///     # Generated by boolcirc
///     INPUT(A)
///     INPUT(B)
///
///     OUTPUT(x0)
///
///     x0 = NAND(x1, x2)
///     x1 = BUF(A)
///     x2 = NOT(x3)
///     x3 = BUF(B)
/// ```
/// Constants are written `gnd` and `vdd`. Nothing is written if a slot is unconnected or
/// the circuit has a loop.
pub fn write_bench<W: Write>(w: &mut W, circuit: &Circuit) -> Result<(), Error> {
    check_exportable(circuit)?;
    writeln!(w, "# .bench (ISCAS) file")?;
    writeln!(w, "# Generated by boolcirc")?;
    for c in circuit.registry().letters() {
        writeln!(w, "INPUT({c})")?;
    }
    writeln!(w)?;
    for s in circuit.sinks() {
        writeln!(w, "OUTPUT({s})")?;
    }
    writeln!(w)?;
    for g in circuit.gates() {
        use GateKind::*;
        let rep = g
            .dependencies()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(w, "{} = ", g.id())?;
        match g.kind() {
            Var(c) => writeln!(w, "BUF({c})")?,
            Const0 => writeln!(w, "gnd")?,
            Const1 => writeln!(w, "vdd")?,
            k => writeln!(w, "{k}({rep})")?,
        }
    }
    Ok(())
}
