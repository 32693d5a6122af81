// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rasterization backend interface.
//!
//! Glyphpack does not rasterize glyphs itself. A [`Rasterizer`] produces one
//! pixel buffer plus metrics per code point — from system font APIs, an
//! embedded rasterizer, or a pre-rendered bitmap font — and the atlas engine
//! packs whatever comes back. The backend and any graphics surface it writes
//! to are single-owner for the duration of a run.

use crate::effect::EffectChain;
use crate::error::Error;
use crate::kerning::KerningTable;

/// Font-wide vertical metrics reported by the rasterizer.
#[derive(Clone, Copy, Debug)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the em box, in pixels.
    pub ascent: i32,
    /// Distance from the baseline to the bottom of the em box, in pixels.
    pub descent: i32,
    /// Vertical distance between successive baselines, in pixels.
    pub line_height: i32,
}

/// Channel order of a rasterized pixel buffer.
///
/// Buffers that are not already in atlas order are swizzled once at intake;
/// everything downstream (hashing, surface writes, export) sees RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Ready for direct use.
    Rgba8,
    /// Needs a red/blue swap on intake.
    Bgra8,
}

/// How glyph pixels are produced, selected per font, never per glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Copy and pad sub-rectangles out of a bitmap atlas the rasterizer
    /// already produced.
    #[default]
    Bitmap,
    /// Fill the vector outline and composite the configured effect chain.
    Outline,
    /// Fill the vector outline only; the effect chain is skipped.
    OutlineShapeOnly,
}

/// One rasterized glyph: pixels plus typographic metrics.
#[derive(Clone, Debug)]
pub struct RasterGlyph {
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// Horizontal offset from the pen position to the bitmap's left edge.
    pub x_offset: i32,
    /// Vertical offset from the baseline to the bitmap's top edge.
    pub y_offset: i32,
    /// Horizontal pen advance after this glyph.
    pub x_advance: i32,
    /// Row-major pixel data, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
    /// Channel order of `pixels`.
    pub format: PixelFormat,
}

/// A rasterization backend.
pub trait Rasterizer {
    /// Font-wide vertical metrics.
    fn metrics(&self) -> FontMetrics;

    /// The backend-internal glyph index for a code point, if the font has
    /// a glyph for it. Indices key the kerning table and are meaningless
    /// outside this backend.
    fn glyph_index(&self, code_point: u32) -> Option<u16>;

    /// Rasterizes one code point.
    ///
    /// `chain` and `mode` come from the font configuration; backends that
    /// produce pre-rendered bitmaps may ignore them.
    fn rasterize(
        &mut self,
        code_point: u32,
        chain: &EffectChain,
        mode: RenderMode,
    ) -> Result<RasterGlyph, Error>;

    /// The backend's kerning table, keyed by glyph-index pairs.
    ///
    /// Returns [`Error::KerningUnavailable`] when the backend has no kerning
    /// source, or an I/O error when reading one fails. Both degrade to a
    /// descriptor without kerning pairs; neither aborts a run.
    fn kerning_table(&self) -> Result<KerningTable, Error>;
}

impl RenderMode {
    /// The settings-file name of this mode.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bitmap => "bitmap",
            Self::Outline => "outline",
            Self::OutlineShapeOnly => "outline-shape",
        }
    }

    /// Parses a settings-file mode name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bitmap" => Some(Self::Bitmap),
            "outline" => Some(Self::Outline),
            "outline-shape" => Some(Self::OutlineShapeOnly),
            _ => None,
        }
    }
}
