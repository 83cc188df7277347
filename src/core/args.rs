//! Arguments for printf-style message templates

use std::fmt;
use std::time::Duration;

/// One positional argument of a leveled logging call
///
/// Built through `From` conversions, usually by the logging macros:
///
/// ```
/// use rust_section_logger::Arg;
///
/// let args = [Arg::from("mesh"), Arg::from(42), Arg::from(0.5)];
/// assert_eq!(args[1], Arg::Int(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Char(char),
    Bool(bool),
}

impl Arg {
    /// Short type name used in formatting diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Arg::Int(_) => "int",
            Arg::UInt(_) => "uint",
            Arg::Float(_) => "float",
            Arg::Str(_) => "string",
            Arg::Char(_) => "char",
            Arg::Bool(_) => "bool",
        }
    }

    /// Integer view used by the integer conversions
    pub(crate) fn as_i128(&self) -> Option<i128> {
        match self {
            Arg::Int(i) => Some(*i as i128),
            Arg::UInt(u) => Some(*u as i128),
            Arg::Float(f) => Some(*f as i128),
            Arg::Char(c) => Some(*c as i128),
            Arg::Bool(b) => Some(*b as i128),
            Arg::Str(_) => None,
        }
    }

    /// Floating point view used by the float conversions
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Arg::Int(i) => Some(*i as f64),
            Arg::UInt(u) => Some(*u as f64),
            Arg::Float(f) => Some(*f),
            Arg::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Arg::Char(_) | Arg::Str(_) => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(i) => write!(f, "{}", i),
            Arg::UInt(u) => write!(f, "{}", u),
            Arg::Float(fl) => write!(f, "{}", fl),
            Arg::Str(s) => write!(f, "{}", s),
            Arg::Char(c) => write!(f, "{}", c),
            Arg::Bool(b) => write!(f, "{}", b),
        }
    }
}

macro_rules! arg_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Int(v as i64)
            }
        })*
    };
}

macro_rules! arg_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::UInt(v as u64)
            }
        })*
    };
}

arg_from_signed!(i8, i16, i32, i64, isize);
arg_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Arg::Float(v as f64)
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<char> for Arg {
    fn from(v: char) -> Self {
        Arg::Char(v)
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Str(s.clone())
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

/// Durations travel as seconds; templates print them through `%t`
impl From<Duration> for Arg {
    fn from(d: Duration) -> Self {
        Arg::Float(d.as_secs_f64())
    }
}

macro_rules! arg_from_ref {
    ($($t:ty),*) => {
        $(impl From<&$t> for Arg {
            fn from(v: &$t) -> Self {
                Arg::from(*v)
            }
        })*
    };
}

arg_from_ref!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char);
