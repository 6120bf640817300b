use thiserror::Error;

/// Result type alias for the detection pipeline.
pub type Result<T> = std::result::Result<T, DetectionError>;

/// Terminal failures of a detection request.
#[derive(Debug, Error)]
pub enum DetectionError {
    /// The input image could not be normalized (corrupt or unsupported
    /// container). Fatal to the current attempt; never retried.
    #[error("image conversion failed: {0}")]
    Conversion(String),

    /// No HTTP exchange with the recognition service succeeded on any
    /// fallback attempt.
    #[error("recognition service unreachable: {reason}")]
    Unreachable { reason: String },

    /// The service was reachable but no attempt yielded a confident,
    /// non-unknown make.
    #[error("no vehicle recognized: {reason}")]
    NoDetection { reason: String },

    /// The submitted bytes could not be kept for the thumbnail reference.
    #[error("thumbnail store failed: {0}")]
    Thumbnail(#[from] std::io::Error),
}

impl From<image::ImageError> for DetectionError {
    fn from(err: image::ImageError) -> Self {
        Self::Conversion(err.to_string())
    }
}

/// Why a single fallback attempt produced no usable result.
///
/// These are non-fatal: the client records them, walks on to the next
/// attempt, and only escalates the last one once the sequence is exhausted.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("empty mm/mmg candidate lists or unselected box")]
    EmptyCandidates,

    #[error("make reported as unknown: {0}")]
    UnknownMake(String),
}
