//! Representation and handling of circuits

mod circuit;
mod gates;
mod registry;
pub mod stats;
mod value;

pub use circuit::{Circuit, Wire};
pub use gates::{snap_to_grid, BinaryOp, Gate, GateId, GateKind, Position, GRID_SIZE};
pub use registry::VariableRegistry;
pub use value::Value;
