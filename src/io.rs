//! Read and write circuits and truth tables to files

mod bench;
pub mod csv;
pub mod json;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use bench::write_bench;
pub use csv::write_csv;
pub use json::{read_json, to_record, write_json, CircuitRecord};

use crate::error::{Error, FormatError};
use crate::network::Circuit;
use crate::sim::TruthTable;

/// Read a circuit from a file
///
/// Following extensions are supported: .json
pub fn read_circuit_file(path: &Path) -> Result<Circuit, Error> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let f = File::open(path)?;
            Ok(read_json(f)?)
        }
        ext => Err(unknown_extension(ext)),
    }
}

/// Write a circuit to a file
///
/// Following extensions are supported: .json, .bench
pub fn write_circuit_file(path: &Path, circuit: &Circuit) -> Result<(), Error> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let mut f = BufWriter::new(File::create(path)?);
            write_json(&mut f, circuit)?;
            f.flush()?;
            Ok(())
        }
        Some("bench") => {
            let mut f = BufWriter::new(File::create(path)?);
            write_bench(&mut f, circuit)?;
            f.flush()?;
            Ok(())
        }
        ext => Err(unknown_extension(ext)),
    }
}

/// Write a truth table to a CSV file
pub fn write_csv_file(path: &Path, table: &TruthTable) -> Result<(), Error> {
    let mut f = BufWriter::new(File::create(path)?);
    write_csv(&mut f, table)?;
    f.flush()?;
    Ok(())
}

fn unknown_extension(ext: Option<&str>) -> Error {
    FormatError::UnsupportedExtension(ext.unwrap_or_default().to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile_equation, enumerate_truth_table, Limits};

    #[test]
    fn test_files() {
        let dir = std::env::temp_dir().join(format!("boolcirc-io-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut c = compile_equation("A + !B", &Limits::default()).unwrap();

        let json = dir.join("c.json");
        write_circuit_file(&json, &c).unwrap();
        assert!(read_circuit_file(&json).unwrap().same_structure(&c));

        let bench = dir.join("c.bench");
        write_circuit_file(&bench, &c).unwrap();
        let text = std::fs::read_to_string(&bench).unwrap();
        assert!(text.contains("x0 = OR(x1, x2)"));
        assert!(matches!(
            read_circuit_file(&bench),
            Err(Error::Format(FormatError::UnsupportedExtension(ext))) if ext == "bench"
        ));
        assert!(matches!(
            write_circuit_file(&dir.join("c"), &c),
            Err(Error::Format(FormatError::UnsupportedExtension(_)))
        ));

        let csv = dir.join("t.csv");
        let table = enumerate_truth_table(&mut c, &Limits::default()).unwrap();
        write_csv_file(&csv, &table).unwrap();
        assert_eq!(
            std::fs::read_to_string(&csv).unwrap(),
            "A,B,Output\n0,0,1\n0,1,0\n1,0,1\n1,1,1\n"
        );

        assert!(matches!(read_circuit_file(&dir.join("missing.json")), Err(Error::Io(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
