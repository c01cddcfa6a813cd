use std::io;

use markup::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("page `{page}` not found")]
    NotFound { page: String },

    /// Parser failure, passed through unchanged.
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read page `{page}`")]
    Read { page: String, source: io::Error },

    /// The page parsed, but its source could not be released.
    #[error("failed to release page `{page}`")]
    Release { page: String, source: io::Error },

    #[error("failed to write rendered page")]
    Render(#[source] io::Error),
}
