use std::fmt;
use std::ops::Not;

use serde::{Deserialize, Serialize};

/// Tri-state logic value carried by a gate output
///
/// `Unset` means that the value is not known yet, for example because an input variable
/// has not been assigned. It is distinct from zero, and blocks every gate it feeds.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<u8>", into = "Option<u8>")]
pub enum Value {
    /// Logic zero
    Zero,
    /// Logic one
    One,
    /// Not computed or not assigned
    #[default]
    Unset,
}

impl Value {
    /// Obtain the boolean value, if set
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Zero => Some(false),
            Value::One => Some(true),
            Value::Unset => None,
        }
    }

    /// Returns true if the value is zero or one
    pub fn is_set(&self) -> bool {
        !matches!(self, Value::Unset)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        if b {
            Value::One
        } else {
            Value::Zero
        }
    }
}

impl From<Option<bool>> for Value {
    fn from(b: Option<bool>) -> Value {
        match b {
            Some(b) => Value::from(b),
            None => Value::Unset,
        }
    }
}

impl From<Value> for Option<u8> {
    fn from(v: Value) -> Option<u8> {
        v.to_bool().map(u8::from)
    }
}

impl TryFrom<Option<u8>> for Value {
    type Error = String;

    fn try_from(v: Option<u8>) -> Result<Value, String> {
        match v {
            None => Ok(Value::Unset),
            Some(0) => Ok(Value::Zero),
            Some(1) => Ok(Value::One),
            Some(x) => Err(format!("Invalid logic value {x}")),
        }
    }
}

impl Not for Value {
    type Output = Value;
    fn not(self) -> Value {
        match self {
            Value::Zero => Value::One,
            Value::One => Value::Zero,
            Value::Unset => Value::Unset,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Zero => write!(f, "0"),
            Value::One => write!(f, "1"),
            Value::Unset => write!(f, "-"),
        }
    }
}
