//! Declarative logger configuration
//!
//! A [`LoggerConfig`] describes a [`StreamLogger`] as data: title and echo
//! options, one destination name per level, the open mode for files and an
//! optional banner. It is usually loaded from JSON:
//!
//! ```json
//! {
//!   "show_date": true,
//!   "console_echo": false,
//!   "info": "run.log",
//!   "warnings": "run.log",
//!   "errors": "stderr",
//!   "open_mode": "append",
//!   "header": "=== solver run ==="
//! }
//! ```
//!
//! Destination names: `""` disables the level, `"stdout"` and `"stderr"` are
//! the standard streams, anything else is a file path.

use crate::appenders::{Banner, OpenMode, StreamLogger, StreamLoggerBuilder, Target};
use crate::core::{FormatterConfig, LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    #[serde(flatten)]
    pub formatter: FormatterConfig,
    /// Destination of informational and analysis lines
    pub info: String,
    pub warnings: String,
    pub errors: String,
    pub open_mode: OpenMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            formatter: FormatterConfig::default(),
            info: "stdout".to_string(),
            warnings: "stderr".to_string(),
            errors: "stderr".to_string(),
            open_mode: OpenMode::Truncate,
            header: None,
            footer: None,
        }
    }
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            LoggerError::config(
                "LoggerConfig",
                format!("cannot read '{}': {}", path.display(), e),
            )
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn banner(&self) -> Banner {
        Banner {
            header: self.header.clone(),
            footer: self.footer.clone(),
        }
    }

    fn builder(&self) -> StreamLoggerBuilder {
        StreamLogger::builder()
            .info(Target::from_name(&self.info))
            .warnings(Target::from_name(&self.warnings))
            .errors(Target::from_name(&self.errors))
            .open_mode(self.open_mode)
            .config(self.formatter.clone())
            .banner(self.banner())
    }

    /// Build the logger, disabling destinations that cannot be opened
    pub fn build(&self) -> StreamLogger {
        self.builder().build()
    }

    /// Build the logger, failing when a file destination cannot be opened
    pub fn try_build(&self) -> Result<StreamLogger> {
        self.builder().try_build()
    }
}
