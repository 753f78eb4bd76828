// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// C ABI for host applications (game engines, camera apps).
//
// Both entry points take a packed 4-bytes-per-pixel RGBA frame, run a
// detector, and write 8 integers per document into a caller-owned buffer.
// Every failure is reported as a `StatusCode`; panics never cross the
// boundary.

use std::panic::{AssertUnwindSafe, catch_unwind};

use holodoc_core::config::MAX_DOCUMENTS;
use holodoc_core::error::{HoloDocError, Result};
use holodoc_core::{Color, DetectorConfig, Document, StatusCode};
use holodoc_detect::{Frame, detect_documents, detect_with_overlay};
use tracing::{error, warn};

/// Host colour layout, one byte per channel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Color32> for Color {
    fn from(c: Color32) -> Self {
        Color::new(c.r, c.g, c.b)
    }
}

/// Number of `i32` values written per document.
pub const SCALARS_PER_DOCUMENT: usize = 8;

/// Detect documents lying on a uniform `background`.
///
/// Writes up to `MAX_DOCUMENTS` documents as `(x1, y1, ..., x4, y4)` in
/// top-left-origin pixel coordinates.
///
/// # Safety
/// - `image` must point to `width * height * 4` readable bytes (or be null).
/// - `out_documents_count` must point to a writable `u32`.
/// - `out_documents_corners` must point to `MAX_DOCUMENTS * 8` writable `i32`s.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn holodoc_document_detection(
    image: *const u8,
    width: u32,
    height: u32,
    background: Color32,
    out_documents_count: *mut u32,
    out_documents_corners: *mut i32,
) -> i32 {
    if out_documents_count.is_null() || out_documents_corners.is_null() {
        return StatusCode::InvalidArgument.code();
    }
    unsafe { *out_documents_count = 0 };

    let Some(pixels) = (unsafe { pixel_slice(image, width, height) }) else {
        return StatusCode::EmptyInput.code();
    };

    let result = guarded(|| {
        let frame = Frame::from_rgba_bytes(pixels, width, height)?;
        detect_documents(&frame, background.into(), &DetectorConfig::default())
    });

    match result {
        Ok(mut docs) => {
            docs.truncate(MAX_DOCUMENTS);
            let corners = unsafe {
                std::slice::from_raw_parts_mut(
                    out_documents_corners,
                    MAX_DOCUMENTS * SCALARS_PER_DOCUMENT,
                )
            };
            write_documents(&docs, corners);
            unsafe { *out_documents_count = docs.len() as u32 };
            StatusCode::Ok.code()
        }
        Err(err) => {
            warn!(%err, "Document detection failed");
            err.status().code()
        }
    }
}

/// Detect quadrilaterals by polygon approximation and draw them.
///
/// Writes the annotated frame (3 bytes per pixel, RGB) to `result`, then up
/// to `max_documents_count` documents with y measured from the bottom edge.
/// The overlay is written even when no document is found.
///
/// # Safety
/// - `image` must point to `width * height * 4` readable bytes (or be null).
/// - `result` must point to `width * height * 3` writable bytes.
/// - `out_documents_count` must point to a writable `u32`.
/// - `out_documents_corners` must point to `max_documents_count * 8` writable `i32`s.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn holodoc_simple_document_detection(
    image: *const u8,
    width: u32,
    height: u32,
    result: *mut u8,
    max_documents_count: u32,
    out_documents_count: *mut u32,
    out_documents_corners: *mut i32,
) -> i32 {
    if result.is_null() || out_documents_count.is_null() || out_documents_corners.is_null() {
        return StatusCode::InvalidArgument.code();
    }
    unsafe { *out_documents_count = 0 };

    let Some(pixels) = (unsafe { pixel_slice(image, width, height) }) else {
        return StatusCode::EmptyInput.code();
    };

    let max_documents = max_documents_count as usize;
    let detection = guarded(|| {
        let frame = Frame::from_rgba_bytes(pixels, width, height)?;
        detect_with_overlay(&frame, max_documents, &DetectorConfig::default())
    });

    let detection = match detection {
        Ok(detection) => detection,
        Err(err) => {
            warn!(%err, "Overlay detection failed");
            return err.status().code();
        }
    };

    let overlay = Frame::from_rgb(detection.overlay).to_rgb_bytes();
    let out_image = unsafe { std::slice::from_raw_parts_mut(result, overlay.len()) };
    out_image.copy_from_slice(&overlay);

    if detection.documents.is_empty() {
        return StatusCode::NoDocumentsFound.code();
    }
    let corners = unsafe {
        std::slice::from_raw_parts_mut(
            out_documents_corners,
            max_documents * SCALARS_PER_DOCUMENT,
        )
    };
    write_documents(&detection.documents, corners);
    unsafe { *out_documents_count = detection.documents.len() as u32 };
    StatusCode::Ok.code()
}

/// View the host frame as a byte slice, or `None` when it is empty.
///
/// # Safety
/// A non-null `image` must point to `width * height * 4` readable bytes.
unsafe fn pixel_slice<'a>(image: *const u8, width: u32, height: u32) -> Option<&'a [u8]> {
    if image.is_null() || width == 0 || height == 0 {
        return None;
    }
    let len = (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(holodoc_detect::frame::HOST_BYTES_PER_PIXEL)?;
    Some(unsafe { std::slice::from_raw_parts(image, len) })
}

/// Run `f`, turning a panic into an error.
fn guarded<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        error!("Detector panicked; reporting invalid argument");
        Err(HoloDocError::InvalidArgument("detector panicked".into()))
    })
}

/// Copy documents into `out`, 8 scalars each, stopping when `out` is full.
fn write_documents(docs: &[Document], out: &mut [i32]) {
    for (doc, slot) in docs.iter().zip(out.chunks_exact_mut(SCALARS_PER_DOCUMENT)) {
        slot.copy_from_slice(&doc.to_scalars());
    }
}
