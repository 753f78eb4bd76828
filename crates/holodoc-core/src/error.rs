// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for HoloDoc.

use thiserror::Error;

use crate::status::StatusCode;

/// Top-level error type for all HoloDoc operations.
#[derive(Debug, Error)]
pub enum HoloDocError {
    // -- Input errors --
    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Detection outcome --
    #[error("no documents found")]
    NoDocumentsFound,

    // -- Imaging / persistence --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HoloDocError {
    /// Status code reported across the C boundary for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyInput(_) => StatusCode::EmptyInput,
            Self::UnsupportedFormat(_) => StatusCode::UnsupportedFormat,
            Self::NoDocumentsFound => StatusCode::NoDocumentsFound,
            Self::InvalidArgument(_)
            | Self::ImageError(_)
            | Self::Io(_)
            | Self::Serialization(_) => StatusCode::InvalidArgument,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HoloDocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            HoloDocError::EmptyInput("buffer".into()).status(),
            StatusCode::EmptyInput
        );
        assert_eq!(
            HoloDocError::UnsupportedFormat("rgb565".into()).status(),
            StatusCode::UnsupportedFormat
        );
        assert_eq!(
            HoloDocError::NoDocumentsFound.status(),
            StatusCode::NoDocumentsFound
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(HoloDocError::from(io).status(), StatusCode::InvalidArgument);
    }
}
