//! Editing session around a single live circuit

use tracing::{info, warn};

use crate::equation::compile_equation;
use crate::error::{Error, EvaluationError, FormatError, SyntaxError};
use crate::io::csv::to_csv_string;
use crate::io::json::{from_json_str, to_json_string};
use crate::limits::Limits;
use crate::network::{Circuit, Value};
use crate::sim::{enumerate_truth_table, evaluate, Evaluation, Step, StepSimulator, TruthTable};

/// Session owning the circuit being edited, its limits and the state of the step simulation
///
/// Replacing the circuit is transactional: when compiling an equation or loading a file
/// fails, the previous circuit is kept untouched.
/// ```
/// # use boolcirc::Workbench;
/// let mut wb = Workbench::new();
/// wb.compile("A OR B").unwrap();
/// assert!(wb.compile("A AND").is_err());
/// assert_eq!(wb.circuit().nb_gates(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Workbench {
    circuit: Circuit,
    limits: Limits,
    sim: StepSimulator,
}

impl Workbench {
    /// Create a session with an empty circuit and default limits
    pub fn new() -> Workbench {
        Workbench::default()
    }

    /// Create a session with custom limits
    pub fn with_limits(limits: Limits) -> Workbench {
        Workbench {
            limits,
            ..Default::default()
        }
    }

    /// The live circuit
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Edit the live circuit; any step simulation in progress is abandoned
    pub fn circuit_mut(&mut self) -> &mut Circuit {
        self.sim.reset();
        &mut self.circuit
    }

    /// Current limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Change the limits used by the next operations
    pub fn set_limits(&mut self, limits: Limits) {
        self.limits = limits;
    }

    /// Replace the live circuit
    pub fn replace(&mut self, circuit: Circuit) {
        self.circuit = circuit;
        self.sim.reset();
    }

    /// Replace the circuit by the compilation of an equation
    pub fn compile(&mut self, text: &str) -> Result<(), SyntaxError> {
        match compile_equation(text, &self.limits) {
            Ok(c) => {
                info!(nb_gates = c.nb_gates(), "circuit replaced by equation");
                self.replace(c);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "equation rejected, circuit kept");
                Err(e)
            }
        }
    }

    /// Replace the circuit by one loaded from its JSON record
    pub fn load_json(&mut self, text: &str) -> Result<(), FormatError> {
        match from_json_str(text) {
            Ok(c) => {
                info!(nb_gates = c.nb_gates(), "circuit replaced by file");
                self.replace(c);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "circuit file rejected, circuit kept");
                Err(e)
            }
        }
    }

    /// Export the circuit to its JSON record
    pub fn to_json(&self) -> Result<String, FormatError> {
        to_json_string(&self.circuit)
    }

    /// Set the value of every Var gate with this letter
    pub fn set_input(&mut self, letter: char, value: Value) -> usize {
        self.circuit.set_input(letter, value)
    }

    /// Evaluate the circuit with the current inputs, and store the values in the gates
    ///
    /// On error, the gates are left unchanged.
    pub fn evaluate(&mut self) -> Result<Evaluation, EvaluationError> {
        let eval = evaluate(&self.circuit, &self.circuit.input_assignment())?;
        self.circuit.apply_values(&eval);
        Ok(eval)
    }

    /// Compute the truth table of the circuit; the inputs are unset afterwards
    pub fn truth_table(&mut self) -> Result<TruthTable, Error> {
        self.sim.reset();
        enumerate_truth_table(&mut self.circuit, &self.limits)
    }

    /// Compute the truth table of the circuit, as CSV
    pub fn export_csv(&mut self) -> Result<String, Error> {
        Ok(to_csv_string(&self.truth_table()?))
    }

    /// Run one step of the signal propagation
    pub fn step(&mut self) -> Result<Step, EvaluationError> {
        self.sim.advance(&mut self.circuit)
    }

    /// Current step of the propagation, if one is in progress
    pub fn current_step(&self) -> Option<usize> {
        self.sim.current_step()
    }

    /// Remove the circuit and stop the simulation
    pub fn reset(&mut self) {
        info!("workbench reset");
        self.replace(Circuit::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{GateId, GateKind};

    #[test]
    fn test_failed_compile_keeps_circuit() {
        let mut wb = Workbench::new();
        wb.compile("A OR B").unwrap();
        let before = wb.to_json().unwrap();
        assert_eq!(wb.compile("A AND"), Err(SyntaxError::IncompleteExpression));
        assert!(matches!(
            wb.compile("A $ B"),
            Err(SyntaxError::InvalidCharacter { ch: '$', .. })
        ));
        assert_eq!(wb.to_json().unwrap(), before);
        assert_eq!(wb.circuit().nb_gates(), 3);
    }

    #[test]
    fn test_failed_load_keeps_circuit() {
        let mut wb = Workbench::new();
        wb.compile("!A").unwrap();
        let before = wb.to_json().unwrap();
        assert!(wb.load_json("not json").is_err());
        let bad = r#"{"gates": [{"id": 0, "kind": "NOT", "slots": [0]}], "wires": [{"from": 0, "to": 0, "slot": 0}]}"#;
        assert_eq!(
            wb.load_json(bad),
            Err(FormatError::SelfLoop(GateId::new(0)))
        );
        assert_eq!(wb.to_json().unwrap(), before);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut wb = Workbench::new();
        wb.compile("A . (B + !C)").unwrap();
        let text = wb.to_json().unwrap();
        let mut other = Workbench::new();
        other.load_json(&text).unwrap();
        assert!(other.circuit().same_structure(wb.circuit()));
    }

    #[test]
    fn test_evaluate() {
        let mut wb = Workbench::new();
        wb.compile("A XOR B").unwrap();
        assert_eq!(wb.evaluate().unwrap().outputs(), vec![Value::Unset]);
        wb.set_input('A', Value::One);
        wb.set_input('b', Value::Zero);
        let e = wb.evaluate().unwrap();
        assert_eq!(e.outputs(), vec![Value::One]);
        assert_eq!(wb.circuit().gates()[0].value(), Value::One);
    }

    #[test]
    fn test_truth_table() {
        let mut wb = Workbench::new();
        wb.compile("!A . B").unwrap();
        wb.set_input('A', Value::One);
        assert_eq!(
            wb.export_csv().unwrap(),
            "A,B,Output\n0,0,0\n0,1,1\n1,0,0\n1,1,0\n"
        );
        assert!(wb.circuit().input_assignment().is_empty());

        wb.set_limits(Limits::new(256, 1));
        assert!(matches!(wb.truth_table(), Err(Error::Resource(_))));
    }

    #[test]
    fn test_step_and_reset() {
        let mut wb = Workbench::new();
        wb.compile("A + B").unwrap();
        assert!(matches!(wb.step().unwrap(), Step::Sources(_)));
        assert_eq!(wb.current_step(), Some(0));
        assert!(matches!(wb.step().unwrap(), Step::Propagated { step: 1, .. }));

        // Editing the circuit abandons the simulation
        let n = wb.circuit_mut().add_gate(GateKind::Not);
        assert_eq!(wb.current_step(), None);
        assert!(wb.circuit().is_sink(n));

        wb.reset();
        assert!(wb.circuit().is_empty());
        assert_eq!(wb.current_step(), None);
    }
}
