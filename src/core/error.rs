//! Error types for the logger system
//!
//! None of these ever escape a leveled logging call. They are produced while
//! formatting or presenting a message and handed to [`Log::discard`], or they
//! are returned from the fallible configuration APIs.
//!
//! [`Log::discard`]: crate::core::Log::discard

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Malformed printf-style template
    #[error("Invalid format template '{template}': {message}")]
    Format { template: String, message: String },

    /// Template references more arguments than were supplied
    #[error("Missing argument #{position} for template '{template}'")]
    MissingArgument { template: String, position: usize },

    /// Argument cannot be rendered by the conversion that consumes it
    #[error("Argument #{position} ({found}) does not fit conversion '%{conversion}'")]
    ArgumentType {
        position: usize,
        conversion: char,
        found: &'static str,
    },

    /// Named destination could not be opened
    #[error("Failed to open log destination '{path}': {source}")]
    DestinationOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A sink or presenter panicked while handling a message
    #[error("Sink panicked: {0}")]
    SinkPanicked(String),
}

impl LoggerError {
    /// Create a template error
    pub fn format(template: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Format {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create a missing argument error
    pub fn missing_argument(template: impl Into<String>, position: usize) -> Self {
        LoggerError::MissingArgument {
            template: template.into(),
            position,
        }
    }

    /// Create an argument type error
    pub fn argument_type(position: usize, conversion: char, found: &'static str) -> Self {
        LoggerError::ArgumentType {
            position,
            conversion,
            found,
        }
    }

    /// Create a destination open error
    pub fn destination_open(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::DestinationOpen {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a sink panic error
    pub fn sink_panicked<S: Into<String>>(msg: S) -> Self {
        LoggerError::SinkPanicked(msg.into())
    }

    /// True for errors raised while turning a template into text
    pub fn is_formatting(&self) -> bool {
        matches!(
            self,
            LoggerError::Format { .. }
                | LoggerError::MissingArgument { .. }
                | LoggerError::ArgumentType { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::missing_argument("%d %d", 2);
        assert!(matches!(err, LoggerError::MissingArgument { position: 2, .. }));

        let err = LoggerError::config("LoggerConfig", "Invalid open mode");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::argument_type(1, 'd', "string");
        assert!(matches!(err, LoggerError::ArgumentType { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::format("%q", "unsupported conversion '%q'");
        assert_eq!(
            err.to_string(),
            "Invalid format template '%q': unsupported conversion '%q'"
        );

        let err = LoggerError::argument_type(1, 'd', "string");
        assert_eq!(
            err.to_string(),
            "Argument #1 (string) does not fit conversion '%d'"
        );

        let err = LoggerError::config("LoggerConfig", "bad name");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for LoggerConfig: bad name"
        );
    }

    #[test]
    fn test_destination_open_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::destination_open("/var/log/run.log", io_err);

        assert!(matches!(err, LoggerError::DestinationOpen { .. }));
        assert!(err.to_string().contains("/var/log/run.log"));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_is_formatting() {
        assert!(LoggerError::format("%", "dangling").is_formatting());
        assert!(LoggerError::missing_argument("%d", 1).is_formatting());
        assert!(!LoggerError::sink_panicked("closed").is_formatting());
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(!LoggerError::from(io_err).is_formatting());
    }
}
