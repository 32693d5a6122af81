// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyphpack generates bitmap font atlases at build time.
//!
//! The pipeline: a [`Rasterizer`] produces one pixel buffer + metrics per
//! requested code point, a [`FontAtlas`] packs those bitmaps onto fixed-size
//! atlas pages with a shelf allocator and content-hash deduplication, and
//! [`descriptor::write`] serializes the result into the legacy `.fnt` text
//! descriptor alongside one PNG image per page.
//!
//! Glyphpack is not a text renderer: it produces the artifacts an existing
//! renderer consumes. Rasterization backends plug in through the
//! [`Rasterizer`] trait; the crate ships [`BitmapFontRasterizer`], which
//! re-packs a pre-rendered bitmap font, and test suites supply synthetic
//! backends.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET

mod bitmap;
mod config;
mod effect;
mod error;
mod font;
mod glyph;
mod kerning;
mod raster;

pub mod atlas;
pub mod descriptor;

pub use bitmap::BitmapFontRasterizer;
pub use config::{FontConfig, Padding};
pub use effect::{Effect, EffectChain, EffectKind, EffectParam, ParamKind};
pub use error::Error;
pub use font::FontAtlas;
pub use glyph::{Glyph, Placement};
pub use kerning::{KerningPair, KerningTable};
pub use raster::{FontMetrics, PixelFormat, RasterGlyph, Rasterizer, RenderMode};
