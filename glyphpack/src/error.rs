// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for atlas generation and export.

use thiserror::Error;

/// Errors surfaced by atlas generation, settings handling and export.
///
/// Non-fatal conditions (a glyph that does not fit a page, a missing kerning
/// source) degrade inside the operation that owns them and are reported
/// through `log`; only conditions that invalidate the run appear here.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing an output artifact failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding a page image failed.
    #[error("png encoding failed: {0}")]
    PngEncode(#[from] png::EncodingError),

    /// Decoding a source page image failed.
    #[error("png decoding failed: {0}")]
    PngDecode(#[from] png::DecodingError),

    /// The rasterizer has no kerning data to offer.
    #[error("kerning source unavailable: {0}")]
    KerningUnavailable(String),

    /// A settings file line could not be parsed.
    #[error("invalid settings at line {line}: {message}")]
    InvalidSettings {
        /// 1-based line number of the offending entry.
        line: usize,
        /// What went wrong with it.
        message: String,
    },

    /// A descriptor file could not be parsed.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// Page dimensions must be nonzero.
    #[error("page dimensions must be nonzero")]
    PageSize,
}
