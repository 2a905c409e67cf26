use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanoramaError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index ({x}, {y}) out of bounds")]
    OutOfBounds { x: i64, y: i64 },

    #[error("invalid HGT file name: {0:?}")]
    InvalidTileName(String),

    #[error("invalid HGT file size: {0} bytes")]
    InvalidTileSize(u64),

    #[error("malformed gazetteer line {line}: {reason}")]
    Gazetteer { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PanoramaError>;

/// Returns `InvalidArgument(message)` unless `condition` holds.
pub(crate) fn check_argument(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(PanoramaError::InvalidArgument(message.into()))
    }
}
