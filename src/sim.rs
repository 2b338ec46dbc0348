//! Evaluation of circuits: single assignments, truth tables and step-by-step propagation

mod equiv;
mod eval;
mod step;
mod truth_table;

pub use equiv::check_equivalence;
pub use eval::{evaluate, Assignment, Evaluation};
pub use step::{Step, StepSimulator};
pub use truth_table::{enumerate_truth_table, enumerate_truth_table_with, Row, TruthTable};
