use std::path::PathBuf;

/// Failures that abort a whole conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("could not read subtitle file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write subtitle file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed subtitle document: {}", _0)]
    Format(String),
}

/// Reasons a single subtitle is dropped from the output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TelemetryError {
    #[error("no GPS telemetry found")]
    MissingGps,
    #[error("no camera telemetry found")]
    MissingCamera,
    #[error("no GPS or camera telemetry found")]
    MissingGpsAndCamera,
    #[error("unable to convert {field} value {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}
