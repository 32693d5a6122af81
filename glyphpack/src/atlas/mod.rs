// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas pages and the packing machinery behind them.
//!
//! This module provides the storage side of atlas generation:
//! - a shelf/row packing allocator for one page
//! - [`Surface`] — an owned RGBA pixel surface with sub-rectangle writes
//! - [`Page`] — one fixed-size page: surface, shelf state, placed glyphs
//!   and the content-hash index used for deduplication

mod page;
mod shelf;
mod surface;

pub use page::{Page, PendingGlyph};
pub use surface::Surface;

/// Maximum width or height of a single glyph bitmap, in pixels.
///
/// Oversized bitmaps are clamped to this size before placement, which may
/// crop content. The deduplication hash is computed over a scratch frame of
/// exactly this size.
pub const MAX_GLYPH_SIZE: u32 = 256;
