// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the HoloDoc detector.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Look up a palette entry by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        PALETTE
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }

    /// Parse either a palette name or an `r,g,b` triple.
    pub fn parse(spec: &str) -> Option<Self> {
        if let Some(color) = Self::from_name(spec.trim()) {
            return Some(color);
        }
        let parts: Vec<u8> = spec
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [r, g, b] => Some(Self::new(*r, *g, *b)),
            _ => None,
        }
    }
}

/// Default reference background.
pub const BACKGROUND_DEFAULT: Color = Color::new(0, 0, 0);

/// Reference colours a caller can name as the background.
pub const PALETTE: [(&str, Color); 18] = [
    ("black", Color::new(0, 0, 0)),
    ("gray", Color::new(125, 125, 125)),
    ("white", Color::new(255, 255, 255)),
    ("red", Color::new(255, 0, 0)),
    ("green", Color::new(0, 255, 0)),
    ("blue", Color::new(0, 0, 255)),
    ("cyan", Color::new(0, 255, 255)),
    ("magenta", Color::new(255, 0, 255)),
    ("yellow", Color::new(255, 255, 0)),
    ("orange", Color::new(255, 125, 0)),
    ("turquoise", Color::new(0, 255, 125)),
    ("indigo", Color::new(125, 0, 255)),
    ("fuchsia", Color::new(255, 0, 125)),
    ("lime", Color::new(125, 255, 0)),
    ("azure", Color::new(0, 125, 255)),
    ("blood", Color::new(125, 0, 0)),
    ("grass", Color::new(0, 125, 0)),
    ("deep", Color::new(0, 0, 125)),
];

/// A detected document: four corner points in a fixed order.
///
/// Coordinates are pixels. Whether the origin is top-left or bottom-left
/// depends on which detector produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    pub corners: [[i32; 2]; 4],
}

impl Document {
    pub fn new(corners: [[i32; 2]; 4]) -> Self {
        Self { corners }
    }

    /// Flatten to `(x1, y1, x2, y2, x3, y3, x4, y4)`.
    pub fn to_scalars(&self) -> [i32; 8] {
        let mut out = [0; 8];
        for (i, [x, y]) in self.corners.iter().enumerate() {
            out[2 * i] = *x;
            out[2 * i + 1] = *y;
        }
        out
    }
}
