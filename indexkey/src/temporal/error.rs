//! Errors raised while constructing, parsing or rebuilding temporal values.

/// Errors from the temporal value model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// A numeric field is outside its domain (e.g. hour 24).
    InvalidField { field: &'static str, value: i64 },
    /// Text did not match the time or offset grammar.
    Parse { text: String },
    /// A zone offset outside +/-18:00.
    InvalidOffset { seconds: i64 },
    /// The source value cannot provide what was asked of it.
    Unsupported(String),
}

impl std::fmt::Display for TemporalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField { field, value } => {
                write!(f, "invalid value for {field}: {value}")
            }
            Self::Parse { text } => write!(f, "text cannot be parsed to a time: '{text}'"),
            Self::InvalidOffset { seconds } => {
                write!(f, "zone offset out of range: {seconds} seconds")
            }
            Self::Unsupported(message) => write!(f, "unsupported: {message}"),
        }
    }
}

impl std::error::Error for TemporalError {}
