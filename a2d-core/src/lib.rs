pub use subrip::Subtitle;

pub mod convert;
pub mod error;
pub mod srt;
pub mod telemetry;

pub use convert::{convert_file, convert_str, output_path_for, ConvertSummary, OUTPUT_MARKER};
pub use error::{ConvertError, TelemetryError};
pub use telemetry::TelemetryRecord;
