// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shelf (row) packing for a single atlas page.

use smallvec::{SmallVec, smallvec};

/// One horizontal strip of the page.
///
/// `x` is the next free offset on the strip; `height` is the tallest glyph
/// placed so far and never shrinks. Rows are append-only and only the last
/// row's height may still grow.
#[derive(Clone, Copy, Debug)]
struct Row {
    x: u32,
    y: u32,
    height: u32,
}

/// A tentative placement returned by [`Shelf::find`].
///
/// The horizontal space is not consumed until [`Shelf::commit`] is called,
/// so a caller that ends up aliasing the glyph to an existing region (the
/// dedup path) simply drops the slot.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Slot {
    /// Absolute x origin for the pixel write.
    pub x: u32,
    /// Absolute y origin for the pixel write.
    pub y: u32,
    row: usize,
}

/// Greedy shelf allocator over an append-only row list.
///
/// Placements that would touch the far edge of the page exactly are
/// rejected: every comparison is strict, leaving a one-pixel margin. This
/// matches the packing of the descriptor format's original producer and
/// must not be relaxed to `<=`.
#[derive(Debug)]
pub(crate) struct Shelf {
    page_width: u32,
    page_height: u32,
    rows: SmallVec<[Row; 8]>,
}

impl Shelf {
    pub(crate) fn new(page_width: u32, page_height: u32) -> Self {
        Self {
            page_width,
            page_height,
            rows: smallvec![Row {
                x: 0,
                y: 0,
                height: 0,
            }],
        }
    }

    /// Finds space for a `width` × `height` rectangle.
    ///
    /// Candidate rows before the last are considered when the rectangle fits
    /// under their established ceiling; among those the tightest (smallest
    /// height) wins, ties broken by creation order. Otherwise the last row
    /// grows to accommodate the rectangle, or a new row is opened below it.
    /// Returns `None` when the page has no room for this rectangle.
    ///
    /// Growing the last row or opening a new one happens here even if the
    /// caller never commits the slot; only the horizontal advance waits for
    /// [`commit`](Self::commit).
    pub(crate) fn find(&mut self, width: u32, height: u32) -> Option<Slot> {
        let mut best: Option<usize> = None;
        for (i, row) in self.rows[..self.rows.len() - 1].iter().enumerate() {
            if row.x + width >= self.page_width {
                continue;
            }
            if row.y + height >= self.page_height {
                continue;
            }
            if height > row.height {
                continue;
            }
            if best.is_none_or(|b| row.height < self.rows[b].height) {
                best = Some(i);
            }
        }

        if best.is_none() {
            let last = self.rows.len() - 1;
            let row = self.rows[last];
            if row.y + height < self.page_height {
                if row.x + width < self.page_width {
                    self.rows[last].height = row.height.max(height);
                    best = Some(last);
                } else if row.y + row.height + height < self.page_height {
                    self.rows.push(Row {
                        x: 0,
                        y: row.y + row.height,
                        height,
                    });
                    best = Some(self.rows.len() - 1);
                }
            }
        }

        best.map(|i| Slot {
            x: self.rows[i].x,
            y: self.rows[i].y,
            row: i,
        })
    }

    /// Consumes the slot's horizontal space.
    pub(crate) fn commit(&mut self, slot: Slot, width: u32) {
        self.rows[slot.row].x += width;
    }
}
