// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HoloDoc: Core types, status codes, and configuration shared across all crates.

pub mod config;
pub mod error;
pub mod status;
pub mod types;

pub use config::{DetectorConfig, EdgeConfig, ScreeningParams};
pub use error::HoloDocError;
pub use status::StatusCode;
pub use types::*;
