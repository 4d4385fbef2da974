//! Error types for replay ingestion and playback

/// Every failure the parser, resolver and frame cache can report.
///
/// Line-level variants never escape [`crate::Game`]; they are absorbed by its
/// discard loop. `ConversionFailed` degrades a single transform to absent.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ReplayError {
    /// Row did not split into exactly a timestamp and a payload
    #[error("row doesn't include both a time and API JSON ({fields} tab-separated fields)")]
    MalformedLine { fields: usize },

    /// Timestamp field could not be parsed as a date
    #[error("can't parse date: {raw}")]
    BadTimestamp { raw: String },

    /// Payload too short to be arena gameplay data
    #[error("row is not arena data ({len} bytes, need more than {min})")]
    NotArenaData { len: usize, min: usize },

    /// Payload is not a structurally valid snapshot
    #[error("bad snapshot json: {reason}")]
    BadJson { reason: String },

    /// Transform payload matched none of the known encodings
    #[error("transform conversion failed: {reason}")]
    ConversionFailed { reason: String },

    /// Every line in the replay has been discarded
    #[error("replay contains no valid arena frames")]
    NoValidFrames,

    /// Frames remain but the requested index is past the end
    #[error("frame {index} is out of range (frame count {count})")]
    FrameOutOfRange { index: usize, count: usize },

    /// Reading the replay text failed
    #[error("IO error: {reason}")]
    Io { reason: String },
}

impl ReplayError {
    /// Whether this failure condemns a single raw line (and only that line).
    #[inline]
    pub fn is_line_level(&self) -> bool {
        matches!(
            self,
            Self::MalformedLine { .. }
                | Self::BadTimestamp { .. }
                | Self::NotArenaData { .. }
                | Self::BadJson { .. }
        )
    }

    /// Coarse category for diagnostics.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::MalformedLine { .. }
            | Self::BadTimestamp { .. }
            | Self::NotArenaData { .. }
            | Self::BadJson { .. } => "line",
            Self::ConversionFailed { .. } => "schema",
            Self::NoValidFrames | Self::FrameOutOfRange { .. } => "cache",
            Self::Io { .. } => "io",
        }
    }
}

impl From<std::io::Error> for ReplayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadJson {
            reason: err.to_string(),
        }
    }
}
