//! Integer Coercion Module
//! Year-like and state-like inputs that may arrive as numbers or text.

use std::fmt;
use thiserror::Error;

/// Token used in place of a value that could not be coerced.
pub const NA_TOKEN: &str = "NA";

/// Raised (as a value, not a failure) when an input cannot be read as an integer.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("NAs introduced by coercion: '{input}'")]
pub struct CoercionWarning {
    pub input: String,
}

/// A value intended to be an integer: a year or a STATE code.
#[derive(Debug, Clone, PartialEq)]
pub enum IntLike {
    Int(i64),
    Float(f64),
    Text(String),
}

impl IntLike {
    /// Coerce to an integer. Floats truncate toward zero.
    pub fn coerce(&self) -> Result<i64, CoercionWarning> {
        let warning = || CoercionWarning {
            input: self.to_string(),
        };

        match self {
            IntLike::Int(v) => Ok(*v),
            IntLike::Float(v) => truncate(*v).ok_or_else(warning),
            IntLike::Text(s) => {
                let s = s.trim();
                if let Ok(v) = s.parse::<i64>() {
                    return Ok(v);
                }
                s.parse::<f64>().ok().and_then(truncate).ok_or_else(warning)
            }
        }
    }

    /// Coerce to a calendar year, which must also fit in an `i32`.
    pub fn coerce_year(&self) -> Result<i32, CoercionWarning> {
        self.coerce().and_then(|v| {
            i32::try_from(v).map_err(|_| CoercionWarning {
                input: self.to_string(),
            })
        })
    }
}

fn truncate(v: f64) -> Option<i64> {
    if v.is_finite() && v.abs() < i64::MAX as f64 {
        Some(v.trunc() as i64)
    } else {
        None
    }
}

impl fmt::Display for IntLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntLike::Int(v) => write!(f, "{}", v),
            IntLike::Float(v) => write!(f, "{}", v),
            IntLike::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! int_like_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for IntLike {
            fn from(v: $t) -> Self {
                IntLike::Int(v as i64)
            }
        })*
    };
}

int_like_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for IntLike {
    fn from(v: f64) -> Self {
        IntLike::Float(v)
    }
}

impl From<&str> for IntLike {
    fn from(v: &str) -> Self {
        IntLike::Text(v.to_string())
    }
}

impl From<String> for IntLike {
    fn from(v: String) -> Self {
        IntLike::Text(v)
    }
}

impl From<&IntLike> for IntLike {
    fn from(v: &IntLike) -> Self {
        v.clone()
    }
}
