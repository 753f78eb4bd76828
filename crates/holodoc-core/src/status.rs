// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Integer status codes returned by the C entry points, with plain-English
// descriptions for command-line output.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of a detection call as seen by a foreign caller.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    /// Detection ran and at least one document was written.
    Ok = 0,
    /// The pixel buffer was empty or had a zero dimension.
    EmptyInput = 1,
    /// The pixel buffer did not match the expected 4-bytes-per-pixel layout.
    UnsupportedFormat = 2,
    /// Detection ran but every candidate was filtered out.
    NoDocumentsFound = 3,
    /// A pointer was null or a parameter was out of range.
    InvalidArgument = 4,
}

impl StatusCode {
    /// Raw integer value for the C ABI.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Collapse a library result into a status code.
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(err) => err.status(),
        }
    }

    /// One-line description suitable for a terminal.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Ok => "documents detected",
            Self::EmptyInput => "the image was empty; capture a frame and try again",
            Self::UnsupportedFormat => {
                "the image buffer is not 4 bytes per pixel at the given width and height"
            }
            Self::NoDocumentsFound => {
                "no document was found; make sure all four edges are visible against the background"
            }
            Self::InvalidArgument => "the detector was called with an invalid argument",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}
