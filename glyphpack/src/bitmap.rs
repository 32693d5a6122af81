// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A rasterization backend that serves glyphs out of an existing bitmap
//! font: each glyph is a sub-rectangle copied from the source atlas and
//! padded per the font configuration. Vector effects do not apply; the
//! effect chain and render mode are ignored.

use std::fs::File;
use std::path::Path;

use hashbrown::HashMap;
use log::warn;

use crate::config::Padding;
use crate::descriptor::{self, CharEntry, Descriptor};
use crate::effect::EffectChain;
use crate::error::Error;
use crate::kerning::KerningTable;
use crate::raster::{FontMetrics, PixelFormat, RasterGlyph, Rasterizer, RenderMode};

/// One decoded source atlas page.
#[derive(Debug)]
struct PageImage {
    width: u32,
    data: Vec<u8>,
}

/// Re-packs a pre-rendered bitmap font.
///
/// Opened from a `.fnt` descriptor; the referenced page images are decoded
/// eagerly. Glyph indices are the code points themselves (the source format
/// has no other glyph identity), so the kerning table round-trips through
/// the same pairs the source descriptor carried.
#[derive(Debug)]
pub struct BitmapFontRasterizer {
    metrics: FontMetrics,
    chars: HashMap<u32, CharEntry>,
    pages: Vec<PageImage>,
    kerning: KerningTable,
    padding: Padding,
}

impl BitmapFontRasterizer {
    /// Opens a bitmap font from its descriptor file.
    ///
    /// `padding` is applied around every glyph bitmap served out of the
    /// source atlas.
    pub fn open(path: &Path, padding: Padding) -> Result<Self, Error> {
        let source = descriptor::load(path)?;
        let dir = path.parent().unwrap_or(Path::new("."));
        let mut pages = Vec::with_capacity(source.pages.len());
        for page in &source.pages {
            pages.push(decode_page(&dir.join(&page.file))?);
        }
        Ok(Self::from_parts(source, pages, padding))
    }

    fn from_parts(source: Descriptor, pages: Vec<PageImage>, padding: Padding) -> Self {
        let mut kerning = KerningTable::new();
        for pair in &source.kernings {
            if let (Ok(first), Ok(second)) =
                (u16::try_from(pair.first), u16::try_from(pair.second))
            {
                kerning.insert(first, second, pair.amount);
            }
        }
        let chars = source.chars.iter().map(|c| (c.id, *c)).collect();
        Self {
            metrics: FontMetrics {
                ascent: source.base,
                descent: source.line_height - source.base,
                line_height: source.line_height,
            },
            chars,
            pages,
            kerning,
            padding,
        }
    }
}

impl Rasterizer for BitmapFontRasterizer {
    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn glyph_index(&self, code_point: u32) -> Option<u16> {
        if !self.chars.contains_key(&code_point) {
            return None;
        }
        u16::try_from(code_point).ok()
    }

    fn rasterize(
        &mut self,
        code_point: u32,
        _chain: &EffectChain,
        _mode: RenderMode,
    ) -> Result<RasterGlyph, Error> {
        let Some(entry) = self.chars.get(&code_point) else {
            // The space and missing-glyph placeholders are queued for every
            // export and are routinely absent from source fonts.
            if code_point != 0 && code_point != ' ' as u32 {
                warn!("source font has no glyph for U+{code_point:04X}");
            }
            return Ok(RasterGlyph {
                width: 0,
                height: 0,
                x_offset: 0,
                y_offset: 0,
                x_advance: 0,
                pixels: Vec::new(),
                format: PixelFormat::Rgba8,
            });
        };

        let page = self.pages.get(entry.page as usize).ok_or_else(|| {
            Error::InvalidDescriptor(format!(
                "char U+{code_point:04X} references missing page {}",
                entry.page
            ))
        })?;
        let pad = self.padding;
        let (pixels, width, height) = padded_copy(
            &page.data,
            page.width,
            entry.x,
            entry.y,
            entry.width,
            entry.height,
            pad,
        );
        Ok(RasterGlyph {
            width,
            height,
            x_offset: entry.x_offset - pad.left as i32,
            y_offset: entry.y_offset - pad.top as i32,
            x_advance: entry.x_advance,
            pixels,
            format: PixelFormat::Rgba8,
        })
    }

    fn kerning_table(&self) -> Result<KerningTable, Error> {
        Ok(self.kerning.clone())
    }
}

/// Copies a sub-rectangle out of a source image into a zeroed buffer with
/// padding on all four sides. Returns the buffer and its dimensions.
fn padded_copy(
    src: &[u8],
    src_width: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    pad: Padding,
) -> (Vec<u8>, u32, u32) {
    let out_width = width + pad.left + pad.right;
    let out_height = height + pad.top + pad.bottom;
    let out_row = out_width as usize * 4;
    let mut out = vec![0_u8; out_row * out_height as usize];
    let row_bytes = width as usize * 4;
    for row in 0..height as usize {
        let src_start = ((y as usize + row) * src_width as usize + x as usize) * 4;
        let dst_start = (pad.top as usize + row) * out_row + pad.left as usize * 4;
        out[dst_start..dst_start + row_bytes]
            .copy_from_slice(&src[src_start..src_start + row_bytes]);
    }
    (out, out_width, out_height)
}

fn decode_page(path: &Path) -> Result<PageImage, Error> {
    let decoder = png::Decoder::new(File::open(path)?);
    let mut reader = decoder.read_info()?;
    let mut data = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut data)?;
    if info.color_type != png::ColorType::Rgba || info.bit_depth != png::BitDepth::Eight {
        return Err(Error::InvalidDescriptor(format!(
            "page image {} is not 8-bit RGBA",
            path.display()
        )));
    }
    data.truncate(info.buffer_size());
    Ok(PageImage {
        width: info.width,
        data,
    })
}
