use serde::{Deserialize, Serialize};

/// A JSON number, or a string holding one (HTML forms send both).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Text(String),
}

impl Numeric {
    /// The value as an `i32`, if it is a whole number in range.
    pub fn to_i32(&self) -> Option<i32> {
        match self {
            Numeric::Int(n) => i32::try_from(*n).ok(),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }
}
