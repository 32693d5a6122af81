// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page set orchestrator: drives the rasterizer-to-allocator pipeline
//! across as many pages as the glyph set needs.

use hashbrown::HashSet;
use log::warn;

use crate::atlas::{Page, PendingGlyph, MAX_GLYPH_SIZE};
use crate::config::FontConfig;
use crate::error::Error;
use crate::glyph::Glyph;
use crate::raster::{FontMetrics, PixelFormat, Rasterizer};

/// A font being packed into a set of atlas pages.
///
/// Code points are queued first, then [`load_glyphs`](Self::load_glyphs)
/// rasterizes and places them one at a time, opening a new page whenever a
/// full pass over the current page places nothing. Every code point appears
/// at most once across the whole page set. The run is single-threaded and
/// synchronous; the rasterizer is exclusively owned for its duration.
#[derive(Debug)]
pub struct FontAtlas<R> {
    config: FontConfig,
    rasterizer: R,
    requested: HashSet<u32>,
    queue: Vec<u32>,
    pending: Vec<PendingGlyph>,
    pages: Vec<Page>,
}

impl<R: Rasterizer> FontAtlas<R> {
    /// Creates an atlas for `config`, queueing the configured glyph text.
    pub fn new(config: FontConfig, rasterizer: R) -> Result<Self, Error> {
        if config.page_width == 0 || config.page_height == 0 {
            return Err(Error::PageSize);
        }
        let mut atlas = Self {
            config,
            rasterizer,
            requested: HashSet::new(),
            queue: Vec::new(),
            pending: Vec::new(),
            pages: Vec::new(),
        };
        let text = atlas.config.glyph_text.clone();
        atlas.queue_glyphs(&text);
        Ok(atlas)
    }

    /// The configuration this atlas was created with.
    #[inline]
    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    /// The rasterization backend.
    #[inline]
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Font-wide vertical metrics, as reported by the rasterizer.
    pub fn metrics(&self) -> FontMetrics {
        self.rasterizer.metrics()
    }

    /// The pages packed so far, in index order.
    #[inline]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Total number of glyph records across all pages.
    pub fn glyph_count(&self) -> usize {
        self.pages.iter().map(|p| p.glyphs().len()).sum()
    }

    /// Code points of every placed glyph, page by page.
    pub fn placed_code_points(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages
            .iter()
            .flat_map(|p| p.glyphs().iter().map(Glyph::code_point))
    }

    /// Queues every code point of `text` that has not been requested yet.
    pub fn queue_glyphs(&mut self, text: &str) {
        for ch in text.chars() {
            self.queue_code_point(ch as u32);
        }
    }

    /// Queues one code point. Re-requests are ignored.
    pub fn queue_code_point(&mut self, code_point: u32) {
        if self.requested.insert(code_point) {
            self.queue.push(code_point);
        }
    }

    /// Queues the glyphs every renderer depends on — the space character
    /// and the missing-glyph placeholder (code point 0) — whether or not
    /// they were requested. Code points the font cannot represent at all
    /// (no glyph index) are skipped.
    pub fn queue_required_glyphs(&mut self) {
        for code_point in [' ' as u32, 0] {
            if self.rasterizer.glyph_index(code_point).is_some() {
                self.queue_code_point(code_point);
            }
        }
    }

    /// Rasterizes and places queued glyphs, at most `max` of them when
    /// `max` is finite. Returns the number placed.
    ///
    /// A glyph the current page rejects is deferred, never dropped: when a
    /// full pass over the page places nothing, a new page is opened and the
    /// pass repeats there. The one exception is a glyph even an empty page
    /// rejects — larger than the page itself — which is discarded with a
    /// warning.
    pub fn load_glyphs(&mut self, max: Option<usize>) -> Result<usize, Error> {
        self.rasterize_queued()?;

        let mut total = 0;
        while !self.pending.is_empty() {
            let remaining = match max {
                Some(m) if total >= m => break,
                Some(m) => Some(m - total),
                None => None,
            };
            if self.pages.is_empty() {
                self.push_page();
            }
            let Some(page) = self.pages.last_mut() else {
                break;
            };
            let was_empty = page.is_empty();
            let loaded = page.load_glyphs(&mut self.pending, remaining);
            total += loaded;
            if loaded == 0 {
                if was_empty {
                    // Nothing in the batch fits even an empty page; no
                    // further page would do better.
                    for entry in self.pending.drain(..) {
                        warn!(
                            "glyph U+{:04X} ({}x{}) exceeds the {}x{} page, discarding",
                            entry.glyph.code_point(),
                            entry.glyph.width(),
                            entry.glyph.height(),
                            self.config.page_width,
                            self.config.page_height,
                        );
                    }
                    break;
                }
                self.push_page();
            }
        }
        Ok(total)
    }

    fn push_page(&mut self) {
        #[expect(clippy::cast_possible_truncation, reason = "page counts stay small")]
        let index = self.pages.len() as u32;
        self.pages.push(Page::new(
            index,
            self.config.page_width,
            self.config.page_height,
            self.config.dedup,
        ));
    }

    /// Drains the code point queue through the rasterizer into the pending
    /// list, normalizing every bitmap on the way in.
    fn rasterize_queued(&mut self) -> Result<(), Error> {
        let queued = std::mem::take(&mut self.queue);
        for code_point in queued {
            let raw = self.rasterizer.rasterize(
                code_point,
                &self.config.effects,
                self.config.render_mode,
            )?;

            let mut width = raw.width;
            let mut height = raw.height;
            let mut pixels = raw.pixels;
            if width > MAX_GLYPH_SIZE || height > MAX_GLYPH_SIZE {
                warn!(
                    "glyph U+{code_point:04X} is {width}x{height}, clamping to {MAX_GLYPH_SIZE}; content is cropped"
                );
                let new_width = width.min(MAX_GLYPH_SIZE);
                let new_height = height.min(MAX_GLYPH_SIZE);
                pixels = crop(&pixels, width, new_width, new_height);
                width = new_width;
                height = new_height;
            }
            if raw.format == PixelFormat::Bgra8 {
                for px in pixels.chunks_exact_mut(4) {
                    px.swap(0, 2);
                }
            }

            let x_advance = raw.x_advance
                + self.config.pad_advance_x
                + self.config.padding.left as i32
                + self.config.padding.right as i32;
            self.pending.push(PendingGlyph {
                glyph: Glyph::new(
                    code_point,
                    width,
                    height,
                    raw.x_offset,
                    raw.y_offset,
                    x_advance,
                ),
                pixels,
            });
        }
        Ok(())
    }
}

/// Copies the top-left `new_width` × `new_height` corner out of a
/// `width`-wide RGBA buffer.
fn crop(pixels: &[u8], width: u32, new_width: u32, new_height: u32) -> Vec<u8> {
    let src_row = width as usize * 4;
    let dst_row = new_width as usize * 4;
    let mut out = vec![0_u8; dst_row * new_height as usize];
    for y in 0..new_height as usize {
        out[y * dst_row..(y + 1) * dst_row]
            .copy_from_slice(&pixels[y * src_row..y * src_row + dst_row]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectChain;
    use crate::kerning::KerningTable;
    use crate::raster::{RasterGlyph, RenderMode};

    /// Renders every code point as a fixed-size box whose pixels encode the
    /// code point, so distinct code points never dedup by accident.
    struct BoxRasterizer {
        size: u32,
    }

    impl Rasterizer for BoxRasterizer {
        fn metrics(&self) -> FontMetrics {
            FontMetrics {
                ascent: 10,
                descent: 3,
                line_height: 14,
            }
        }

        fn glyph_index(&self, code_point: u32) -> Option<u16> {
            u16::try_from(code_point).ok()
        }

        fn rasterize(
            &mut self,
            code_point: u32,
            _chain: &EffectChain,
            _mode: RenderMode,
        ) -> Result<RasterGlyph, Error> {
            let (width, height) = if code_point == 32 || code_point == 0 {
                (0, 0)
            } else {
                (self.size, self.size)
            };
            Ok(RasterGlyph {
                width,
                height,
                x_offset: 0,
                y_offset: 0,
                x_advance: width as i32,
                pixels: vec![(code_point & 0xff) as u8; (width * height * 4) as usize],
                format: PixelFormat::Rgba8,
            })
        }

        fn kerning_table(&self) -> Result<KerningTable, Error> {
            Err(Error::KerningUnavailable("test backend".to_owned()))
        }
    }

    fn config(page: u32) -> FontConfig {
        FontConfig {
            page_width: page,
            page_height: page,
            ..FontConfig::default()
        }
    }

    #[test]
    fn overflow_opens_a_new_page() {
        let mut atlas = FontAtlas::new(config(64), BoxRasterizer { size: 20 }).unwrap();
        // Ten glyphs at 20x20 on 64x64 pages: nine fit, the tenth must end
        // up on a second page rather than be rejected or lost.
        for cp in 65..75 {
            atlas.queue_code_point(cp);
        }
        assert_eq!(atlas.load_glyphs(None).unwrap(), 10);
        assert_eq!(atlas.pages().len(), 2);
        assert_eq!(atlas.pages()[0].glyphs().len(), 9);
        assert_eq!(atlas.pages()[1].glyphs().len(), 1);
        assert_eq!(atlas.pages()[1].glyphs()[0].code_point(), 74);
    }

    #[test]
    fn code_points_are_requested_once() {
        let mut atlas = FontAtlas::new(config(64), BoxRasterizer { size: 8 }).unwrap();
        atlas.queue_glyphs("AAB");
        atlas.queue_glyphs("AB");
        assert_eq!(atlas.load_glyphs(None).unwrap(), 2);
        assert_eq!(atlas.glyph_count(), 2);
    }

    #[test]
    fn no_overlap_across_a_page() {
        let mut atlas = FontAtlas::new(config(64), BoxRasterizer { size: 20 }).unwrap();
        for cp in 65..74 {
            atlas.queue_code_point(cp);
        }
        atlas.load_glyphs(None).unwrap();
        let page = &atlas.pages()[0];
        let rects: Vec<_> = page
            .glyphs()
            .iter()
            .map(|g| {
                let p = g.placement().unwrap();
                let x = (p.u * 64.0) as u32;
                let y = (p.v * 64.0) as u32;
                (x, y, g.width(), g.height())
            })
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let disjoint =
                    a.0 + a.2 <= b.0 || b.0 + b.2 <= a.0 || a.1 + a.3 <= b.1 || b.1 + b.3 <= a.1;
                assert!(disjoint, "glyph rectangles {a:?} and {b:?} overlap");
            }
        }
    }

    #[test]
    fn oversized_glyph_on_tiny_page_is_discarded_not_looped() {
        let mut atlas = FontAtlas::new(config(16), BoxRasterizer { size: 20 }).unwrap();
        atlas.queue_code_point(65);
        assert_eq!(atlas.load_glyphs(None).unwrap(), 0);
        assert_eq!(atlas.pages().len(), 1);
        assert_eq!(atlas.glyph_count(), 0);
    }

    #[test]
    fn max_bounds_placements_across_pages() {
        let mut atlas = FontAtlas::new(config(64), BoxRasterizer { size: 20 }).unwrap();
        for cp in 65..77 {
            atlas.queue_code_point(cp);
        }
        assert_eq!(atlas.load_glyphs(Some(4)).unwrap(), 4);
        assert_eq!(atlas.glyph_count(), 4);
        // The rest are still pending and load later.
        assert_eq!(atlas.load_glyphs(None).unwrap(), 8);
        assert_eq!(atlas.glyph_count(), 12);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(matches!(
            FontAtlas::new(config(0), BoxRasterizer { size: 8 }),
            Err(Error::PageSize)
        ));
    }
}
