//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four leveled calls of the logging contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    /// Machine-oriented line for log analysis tools
    Analysis = 0,
    /// User-facing progress line
    #[default]
    Info = 1,
    /// Non-fatal anomaly
    Warn = 2,
    /// Results are no longer well-defined
    Error = 3,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Analysis,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Analysis => "ANALYSIS",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Output channel a message of this level is presented on
    pub fn channel(&self) -> Channel {
        match self {
            LogLevel::Analysis | LogLevel::Info => Channel::Info,
            LogLevel::Warn => Channel::Warning,
            LogLevel::Error => Channel::Error,
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Analysis => BrightBlack,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ANALYSIS" | "INF" => Ok(LogLevel::Analysis),
            "INFO" | "LOG" => Ok(LogLevel::Info),
            "WARN" | "WARNING" | "WRN" => Ok(LogLevel::Warn),
            "ERROR" | "ERR" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// One of the three physical output slots of a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Info = 0,
    Warning = 1,
    Error = 2,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Info, Channel::Warning, Channel::Error];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Channel::Info => "info",
            Channel::Warning => "warning",
            Channel::Error => "error",
        }
    }
}
