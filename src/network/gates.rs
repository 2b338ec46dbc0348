use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::network::value::Value;

/// Identifier of a gate inside a circuit
///
/// Identifiers are allocated in increasing order and never reused by a circuit,
/// so that the ordering of identifiers follows the creation order of the gates.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateId(u32);

impl GateId {
    /// Create an identifier from its raw index
    pub fn new(v: u32) -> GateId {
        GateId(v)
    }

    /// Raw index of the identifier
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl fmt::Debug for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Basic types of 2-input gates
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum BinaryOp {
    /// 2-input And gate
    And,
    /// 2-input Nand gate
    Nand,
    /// 2-input Or gate
    Or,
    /// 2-input Nor gate
    Nor,
    /// 2-input Xor gate
    Xor,
    /// 2-input Xnor gate
    Xnor,
}

impl BinaryOp {
    /// All binary operators, in keyword order
    pub const ALL: [BinaryOp; 6] = [
        BinaryOp::And,
        BinaryOp::Nand,
        BinaryOp::Or,
        BinaryOp::Nor,
        BinaryOp::Xor,
        BinaryOp::Xnor,
    ];

    /// Apply the operator to two concrete values
    pub fn apply(&self, a: bool, b: bool) -> bool {
        use BinaryOp::*;
        match self {
            And => a & b,
            Nand => !(a & b),
            Or => a | b,
            Nor => !(a | b),
            Xor => a ^ b,
            Xnor => !(a ^ b),
        }
    }

    /// Apply the operator to tri-state values: an unset input blocks the output
    pub fn eval(&self, a: Value, b: Value) -> Value {
        match (a.to_bool(), b.to_bool()) {
            (Some(x), Some(y)) => Value::from(self.apply(x, y)),
            _ => Value::Unset,
        }
    }

    /// Returns whether the operator binds as tightly as And
    pub fn is_and_tier(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Nand)
    }

    /// Keyword used for the operator in equations and file formats
    pub fn keyword(&self) -> &'static str {
        use BinaryOp::*;
        match self {
            And => "AND",
            Nand => "NAND",
            Or => "OR",
            Nor => "NOR",
            Xor => "XOR",
            Xnor => "XNOR",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Logic gate kinds
///
/// Binary gates have two input slots, Not has one, and constants and variables have none.
/// Several Var gates may share the same letter: they are distinct gates that receive the
/// same value whenever the letter is assigned.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum GateKind {
    /// 2-input And gate
    And,
    /// 2-input Or gate
    Or,
    /// Inverter
    Not,
    /// 2-input Nand gate
    Nand,
    /// 2-input Nor gate
    Nor,
    /// 2-input Xor gate
    Xor,
    /// 2-input Xnor gate
    Xnor,
    /// Constant zero
    Const0,
    /// Constant one
    Const1,
    /// Input variable, identified by an uppercase letter
    Var(char),
}

impl GateKind {
    /// Number of input slots of the gate
    pub fn arity(&self) -> usize {
        use GateKind::*;
        match self {
            Const0 | Const1 | Var(_) => 0,
            Not => 1,
            And | Or | Nand | Nor | Xor | Xnor => 2,
        }
    }

    /// Returns whether the gate has no input and starts the propagation
    pub fn is_source(&self) -> bool {
        self.arity() == 0
    }

    /// Returns the letter of a Var gate
    pub fn letter(&self) -> Option<char> {
        match self {
            GateKind::Var(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the operator of a binary gate
    pub fn binary_op(&self) -> Option<BinaryOp> {
        use GateKind::*;
        match self {
            And => Some(BinaryOp::And),
            Nand => Some(BinaryOp::Nand),
            Or => Some(BinaryOp::Or),
            Nor => Some(BinaryOp::Nor),
            Xor => Some(BinaryOp::Xor),
            Xnor => Some(BinaryOp::Xnor),
            Not | Const0 | Const1 | Var(_) => None,
        }
    }

    /// Same kind, with the letter of a Var gate in uppercase
    pub fn normalized(self) -> GateKind {
        match self {
            GateKind::Var(c) => GateKind::Var(c.to_ascii_uppercase()),
            k => k,
        }
    }

    /// Create a Var gate kind; the letter is normalized to uppercase
    pub fn var(letter: char) -> Option<GateKind> {
        if letter.is_ascii_alphabetic() {
            Some(GateKind::Var(letter.to_ascii_uppercase()))
        } else {
            None
        }
    }
}

impl From<BinaryOp> for GateKind {
    fn from(op: BinaryOp) -> GateKind {
        match op {
            BinaryOp::And => GateKind::And,
            BinaryOp::Nand => GateKind::Nand,
            BinaryOp::Or => GateKind::Or,
            BinaryOp::Nor => GateKind::Nor,
            BinaryOp::Xor => GateKind::Xor,
            BinaryOp::Xnor => GateKind::Xnor,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use GateKind::*;
        match self {
            And => write!(f, "AND"),
            Or => write!(f, "OR"),
            Not => write!(f, "NOT"),
            Nand => write!(f, "NAND"),
            Nor => write!(f, "NOR"),
            Xor => write!(f, "XOR"),
            Xnor => write!(f, "XNOR"),
            Const0 => write!(f, "CONST0"),
            Const1 => write!(f, "CONST1"),
            Var(c) => write!(f, "VAR({c})"),
        }
    }
}

impl FromStr for GateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<GateKind, String> {
        let t = s.trim().to_uppercase();
        match t.as_str() {
            "NOT" => return Ok(GateKind::Not),
            "CONST0" => return Ok(GateKind::Const0),
            "CONST1" => return Ok(GateKind::Const1),
            _ => (),
        }
        for op in BinaryOp::ALL {
            if t == op.keyword() {
                return Ok(op.into());
            }
        }
        if let Some(inner) = t.strip_prefix("VAR(").and_then(|r| r.strip_suffix(')')) {
            let mut chars = inner.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                if let Some(kind) = GateKind::var(c) {
                    return Ok(kind);
                }
            }
        }
        Err(format!("Unknown gate kind {s}"))
    }
}

/// Position of a gate on the drawing grid; only a rendering hint
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct Position {
    /// Horizontal coordinate
    pub x: i32,
    /// Vertical coordinate
    pub y: i32,
}

/// Spacing of the drawing grid
pub const GRID_SIZE: i32 = 20;

impl Position {
    /// Create a position snapped to the drawing grid
    pub fn snapped(x: i32, y: i32) -> Position {
        Position {
            x: snap_to_grid(x),
            y: snap_to_grid(y),
        }
    }
}

/// Round a coordinate to the closest grid line
pub fn snap_to_grid(v: i32) -> i32 {
    (v as f64 / GRID_SIZE as f64).round() as i32 * GRID_SIZE
}

/// Logic gate in a circuit
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Gate {
    pub(crate) id: GateId,
    pub(crate) kind: GateKind,
    pub(crate) slots: Box<[Option<GateId>]>,
    pub(crate) value: Value,
    pub(crate) active: bool,
    pub(crate) pos: Position,
}

impl Gate {
    /// Create a gate with empty input slots
    pub(crate) fn new(id: GateId, kind: GateKind) -> Gate {
        Gate {
            id,
            kind,
            slots: vec![None; kind.arity()].into(),
            value: Value::Unset,
            active: false,
            pos: Position::default(),
        }
    }

    /// Identifier of the gate
    pub fn id(&self) -> GateId {
        self.id
    }

    /// Kind of the gate
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Input slots of the gate, in order
    pub fn slots(&self) -> &[Option<GateId>] {
        &self.slots
    }

    /// Gates connected to the inputs, skipping empty slots
    pub fn dependencies(&self) -> impl Iterator<Item = GateId> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Returns whether every input slot is connected
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    /// Last computed value of the gate
    pub fn value(&self) -> Value {
        self.value
    }

    /// Whether the gate has been reached by the step simulation
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Position of the gate on the drawing grid
    pub fn position(&self) -> Position {
        self.pos
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use GateKind::*;
        let input = |i: usize| match self.slots[i] {
            Some(id) => id.to_string(),
            None => "##".to_string(),
        };
        match self.kind {
            Const0 => write!(f, "0"),
            Const1 => write!(f, "1"),
            Var(c) => write!(f, "{c}"),
            Not => write!(f, "!{}", input(0)),
            k => write!(f, "{}({}, {})", k, input(0), input(1)),
        }
    }
}
