// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One atlas page: pixel surface, shelf state, placed glyphs and the
//! content-hash index used for deduplication.

use sha2::{Digest, Sha256};

use super::shelf::Shelf;
use super::surface::Surface;
use super::MAX_GLYPH_SIZE;
use crate::glyph::{Glyph, Placement};

/// SHA-256 digest of a glyph's canonical pixel frame.
type ContentHash = [u8; 32];

/// A glyph waiting for placement, together with its rasterized pixels.
///
/// Pixels are row-major RGBA8, `width * height * 4` bytes. Zero-area glyphs
/// carry an empty buffer.
#[derive(Clone, Debug)]
pub struct PendingGlyph {
    /// The glyph record to be placed.
    pub glyph: Glyph,
    /// The glyph's rasterized pixels.
    pub pixels: Vec<u8>,
}

/// A fixed-size atlas page.
///
/// Dimensions are immutable once created; the pixel surface is mutated
/// incrementally as glyphs are placed. `glyphs` is in placement order, and
/// `hashes` runs parallel to it (entries are `None` for zero-area glyphs
/// and when deduplication is disabled).
#[derive(Debug)]
pub struct Page {
    index: u32,
    surface: Surface,
    shelf: Shelf,
    glyphs: Vec<Glyph>,
    hashes: Vec<Option<ContentHash>>,
    dedup: bool,
}

impl Page {
    pub(crate) fn new(index: u32, width: u32, height: u32, dedup: bool) -> Self {
        Self {
            index,
            surface: Surface::new(width, height),
            shelf: Shelf::new(width, height),
            glyphs: Vec::new(),
            hashes: Vec::new(),
            dedup,
        }
    }

    /// This page's index within the page set.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Page width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Page height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// The page's pixel surface.
    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Glyphs placed on this page, in placement order.
    #[inline]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Whether no glyph has been placed yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Places glyphs from `pending` onto this page, removing every placed
    /// glyph from the list in request order.
    ///
    /// Glyphs the page has no room for are skipped but the batch continues;
    /// later, smaller glyphs may still fit in leftover shelf space. Stops
    /// early once `max` glyphs have been placed in this call. Returns the
    /// number of glyphs placed.
    pub(crate) fn load_glyphs(
        &mut self,
        pending: &mut Vec<PendingGlyph>,
        max: Option<usize>,
    ) -> usize {
        let mut loaded = 0;
        let mut i = 0;
        while i < pending.len() {
            match self.try_place(&mut pending[i]) {
                None => i += 1,
                Some(hash) => {
                    let entry = pending.remove(i);
                    self.glyphs.push(entry.glyph);
                    self.hashes.push(hash);
                    loaded += 1;
                    if Some(loaded) == max {
                        break;
                    }
                }
            }
        }
        loaded
    }

    /// Attempts to place one glyph. Returns `None` when the page has no
    /// room; otherwise the glyph's placement has been set and the returned
    /// hash entry belongs next to it in the parallel lists.
    fn try_place(&mut self, entry: &mut PendingGlyph) -> Option<Option<ContentHash>> {
        let width = entry.glyph.width();
        let height = entry.glyph.height();

        // Zero-area glyphs (space, the missing-glyph placeholder) always
        // succeed without touching the allocator or the surface.
        if width == 0 || height == 0 {
            entry.glyph.set_placement(Placement {
                page_index: self.index,
                u: 0.0,
                v: 0.0,
                u2: 0.0,
                v2: 0.0,
            });
            return Some(None);
        }

        let slot = self.shelf.find(width, height)?;

        let hash = self.dedup.then(|| content_hash(&entry.pixels, width, height));
        if let Some(hash) = hash {
            // Identical pixels already on this page: alias the placement,
            // consume no space and skip the pixel write. Hash collisions
            // are accepted as equality.
            let existing = self
                .hashes
                .iter()
                .position(|other| *other == Some(hash));
            if let Some(i) = existing {
                if let Some(placement) = self.glyphs[i].placement() {
                    entry.glyph.set_placement(placement);
                    return Some(Some(hash));
                }
            }
        }

        self.shelf.commit(slot, width);
        self.surface
            .write_region(slot.x, slot.y, width, height, &entry.pixels);

        let page_width = self.surface.width() as f32;
        let page_height = self.surface.height() as f32;
        entry.glyph.set_placement(Placement {
            page_index: self.index,
            u: slot.x as f32 / page_width,
            v: slot.y as f32 / page_height,
            u2: (slot.x + width) as f32 / page_width,
            v2: (slot.y + height) as f32 / page_height,
        });
        Some(hash)
    }
}

/// Hashes a glyph's pixels over a canonical fixed-size frame.
///
/// The glyph's rows are blitted at the origin of a zeroed
/// [`MAX_GLYPH_SIZE`]² RGBA frame so that two bitmaps compare equal exactly
/// when their pixels match, independent of surrounding buffer contents.
/// The frame is scoped to this call; no scratch state survives it.
fn content_hash(pixels: &[u8], width: u32, height: u32) -> ContentHash {
    debug_assert!(
        width <= MAX_GLYPH_SIZE && height <= MAX_GLYPH_SIZE,
        "glyph dimensions must be clamped before hashing"
    );
    let frame_row = MAX_GLYPH_SIZE as usize * 4;
    let mut frame = vec![0_u8; frame_row * MAX_GLYPH_SIZE as usize];
    let row_bytes = width as usize * 4;
    for y in 0..height as usize {
        frame[y * frame_row..y * frame_row + row_bytes]
            .copy_from_slice(&pixels[y * row_bytes..(y + 1) * row_bytes]);
    }
    let mut hasher = Sha256::new();
    hasher.update(&frame);
    hasher.finalize().into()
}
