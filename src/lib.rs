//! Boolean equation compiler and logic gate simulator
//!
//! This crate turns boolean equations into circuits of logic gates, and evaluates them.
//! Circuits can also be built gate by gate, as a schematic editor would.
//!
//! # Usage
//!
//! Boolcirc features a compiler for equations written with keywords or with the usual
//! symbols of boolean algebra, evaluation with three-valued logic, exhaustive
//! [truth tables](https://en.wikipedia.org/wiki/Truth_table), a level-by-level propagation
//! for animations, and exhaustive equivalence checking.
//!
//! ```bash
//! # Show available commands
//! boolcirc help
//! # Show the gates and statistics of an equation
//! boolcirc show "A + B . !C"
//! # Export the truth table
//! boolcirc table "A ⊕ B" -o table.csv
//! # Save the circuit and check it against another equation
//! boolcirc compile "(A + B)'" -o circuit.json
//! boolcirc equiv --circuit circuit.json "!A . !B"
//! ```
//!
//! # Equations
//!
//! Equations use single letters as variables, parentheses, and the following operators,
//! from the tightest to the loosest binding:
//! * negation: `!A`, `~A`, `¬A`, or the postfix forms `A'` and `A̅`;
//! * `AND` and `NAND`, with `.`, `*`, `·` and `∧` as symbols for `AND`;
//! * `OR`, `NOR`, `XOR` and `XNOR`, with `+` and `∨` for `OR`, `⊕` for `XOR`, `⊙` for `XNOR`.
//!
//! Operators of the same level associate to the left: `A XOR B OR C` is `(A XOR B) OR C`.
//!
//! # Datastructures
//!
//! A [`Circuit`] is a set of gates connected by wires. Each gate has a fixed number of input
//! slots, and each connected slot corresponds to exactly one wire. Gates without any
//! outgoing wire are the outputs of the circuit. Variables are gates too: the same letter
//! may appear in several gates, which always receive the same value.
//!
//! Values are three-valued: a gate is [`Value::Unset`] until all its inputs are known.
//! ```
//! # use boolcirc::{compile_equation, evaluate, Assignment, Limits, Value};
//! let circuit = compile_equation("A XOR B", &Limits::default()).unwrap();
//! let mut assignment = Assignment::new();
//! assignment.set('A', true);
//! assert_eq!(evaluate(&circuit, &assignment).unwrap().outputs(), vec![Value::Unset]);
//! assignment.set('B', false);
//! assert_eq!(evaluate(&circuit, &assignment).unwrap().outputs(), vec![Value::One]);
//! ```
//!
//! Circuits are built manually in the same way:
//! ```
//! # use boolcirc::{enumerate_truth_table, Circuit, GateKind, Limits};
//! let mut circuit = Circuit::new();
//! let a = circuit.add_gate(GateKind::Var('A'));
//! let b = circuit.add_gate(GateKind::Var('B'));
//! let x = circuit.add_gate(GateKind::Nand);
//! circuit.add_wire(a, x, 0).unwrap();
//! circuit.add_wire(b, x, 1).unwrap();
//! let table = enumerate_truth_table(&mut circuit, &Limits::default()).unwrap();
//! assert_eq!(table.nb_rows(), 4);
//! ```

#![warn(missing_docs)]

pub mod cmd;
pub mod equation;
pub mod error;
pub mod io;
pub mod limits;
pub mod network;
pub mod sim;
pub mod workbench;

pub use equation::{compile_equation, parse_equation, Expr};
pub use error::{Error, EvaluationError, FormatError, ResourceError, SyntaxError};
pub use limits::Limits;
pub use network::{stats, Circuit, Gate, GateId, GateKind, Value, Wire};
pub use sim::{
    check_equivalence, enumerate_truth_table, evaluate, Assignment, Evaluation, Step,
    StepSimulator, TruthTable,
};
pub use workbench::Workbench;
