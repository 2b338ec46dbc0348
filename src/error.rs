//! Error types for equation compilation, evaluation and circuit files

use thiserror::Error;

use crate::equation::Token;
use crate::network::GateId;

/// Errors raised while compiling an equation
///
/// Positions are character indices in the original equation text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A character that is not part of the equation language
    #[error("invalid character '{ch}' at position {pos}")]
    InvalidCharacter {
        /// Offending character
        ch: char,
        /// Position in the equation
        pos: usize,
    },

    /// An operator or closing parenthesis where an operand was expected
    #[error("unexpected token {token} at position {pos}")]
    UnexpectedToken {
        /// Offending token
        token: Token,
        /// Position in the equation
        pos: usize,
    },

    /// A parenthesis that is never closed
    #[error("parenthesis opened at position {pos} is never closed")]
    UnclosedParen {
        /// Position of the opening parenthesis
        pos: usize,
    },

    /// The equation ends where an operand was expected
    #[error("incomplete expression")]
    IncompleteExpression,

    /// Tokens remain after a complete expression
    #[error("unexpected token {token} after the expression at position {pos}")]
    TrailingTokens {
        /// First remaining token
        token: Token,
        /// Position in the equation
        pos: usize,
    },

    /// The expression is nested deeper than the configured limit
    #[error("expression is nested deeper than {limit} levels")]
    ExpressionTooDeep {
        /// Configured maximum depth
        limit: usize,
    },
}

/// Errors raised while evaluating a circuit
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The gate feeds back into its own inputs
    #[error("combinational loop through gate {0}")]
    CycleDetected(GateId),
}

/// Errors raised while wiring, loading or exporting a circuit
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Reference to a gate that does not exist
    #[error("reference to unknown gate {0}")]
    BadReference(GateId),

    /// Slot index or slot count incompatible with the gate kind
    #[error("gate {gate} has {arity} input slots, got {found}")]
    ArityMismatch {
        /// Gate whose arity is violated
        gate: GateId,
        /// Arity of the gate kind
        arity: usize,
        /// Slot count or slot index found
        found: usize,
    },

    /// Two wires driving the same input slot
    #[error("input slot {slot} of gate {gate} is already connected")]
    DuplicateSlot {
        /// Destination gate
        gate: GateId,
        /// Slot index
        slot: usize,
    },

    /// A wire from a gate to itself
    #[error("gate {0} cannot drive its own input")]
    SelfLoop(GateId),

    /// Identifier too large to be used by a gate
    #[error("gate identifier {0} is out of range")]
    IdOverflow(GateId),

    /// The same identifier used by two gates
    #[error("gate {0} is defined twice")]
    DuplicateId(GateId),

    /// Unrecognized gate kind
    #[error("unknown gate kind {0}")]
    UnknownKind(String),

    /// The slots declared by a gate do not match the wires
    #[error("slots of gate {0} do not match the wires")]
    SlotMismatch(GateId),

    /// The circuit contains a combinational loop
    #[error("combinational loop through gate {0}")]
    CycleDetected(GateId),

    /// An input slot left unconnected where the format requires one
    #[error("input slot {slot} of gate {gate} is not connected")]
    UnfilledSlot {
        /// Gate with the empty slot
        gate: GateId,
        /// Slot index
        slot: usize,
    },

    /// Malformed JSON document
    #[error("malformed circuit file: {0}")]
    Json(String),

    /// File extension that does not correspond to a supported format
    #[error("unsupported file extension '{0}'")]
    UnsupportedExtension(String),
}

/// Errors raised when a request exceeds the configured limits
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Too many variables to enumerate the truth table
    #[error("truth table over {vars} variables exceeds the limit of {limit}")]
    TableTooLarge {
        /// Number of distinct variables
        vars: usize,
        /// Configured maximum
        limit: usize,
    },
}

/// Any error raised by the crate
#[derive(Debug, Error)]
pub enum Error {
    /// Equation compilation failed
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Evaluation failed
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Invalid circuit structure or file
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Resource limit exceeded
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// File IO failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EvaluationError> for FormatError {
    fn from(e: EvaluationError) -> FormatError {
        match e {
            EvaluationError::CycleDetected(g) => FormatError::CycleDetected(g),
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(e: serde_json::Error) -> FormatError {
        FormatError::Json(e.to_string())
    }
}
