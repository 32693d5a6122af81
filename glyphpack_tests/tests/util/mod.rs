// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic rasterization backend and scratch-directory helpers.

use std::path::PathBuf;

use glyphpack::{
    EffectChain, Error, FontMetrics, KerningTable, PixelFormat, RasterGlyph, Rasterizer,
    RenderMode,
};
use hashbrown::HashMap;

/// A deterministic rasterizer for tests.
///
/// Every code point renders as a solid box whose pixel bytes encode the
/// code point, so no two code points dedup by accident; `uniform()` makes
/// all boxes pixel-identical instead. The space character and code point 0
/// always render zero-area, and code point 0 has no glyph index.
pub(crate) struct TestRasterizer {
    default_size: (u32, u32),
    sizes: HashMap<u32, (u32, u32)>,
    uniform: bool,
    kerning: Option<KerningTable>,
    kerning_read_fails: bool,
}

impl TestRasterizer {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            default_size: (width, height),
            sizes: HashMap::new(),
            uniform: false,
            kerning: None,
            kerning_read_fails: false,
        }
    }

    pub(crate) fn with_size(mut self, code_point: u32, width: u32, height: u32) -> Self {
        self.sizes.insert(code_point, (width, height));
        self
    }

    pub(crate) fn uniform(mut self) -> Self {
        self.uniform = true;
        self
    }

    pub(crate) fn with_kerning(mut self, table: KerningTable) -> Self {
        self.kerning = Some(table);
        self
    }

    pub(crate) fn failing_kerning(mut self) -> Self {
        self.kerning_read_fails = true;
        self
    }
}

impl Rasterizer for TestRasterizer {
    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: 10,
            descent: 4,
            line_height: 14,
        }
    }

    fn glyph_index(&self, code_point: u32) -> Option<u16> {
        if code_point == 0 {
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
        let (width, height) = if code_point == 0 || code_point == ' ' as u32 {
            (0, 0)
        } else {
            self.sizes
                .get(&code_point)
                .copied()
                .unwrap_or(self.default_size)
        };
        let fill = if self.uniform {
            0xff
        } else {
            (code_point % 251 + 1) as u8
        };
        Ok(RasterGlyph {
            width,
            height,
            x_offset: 1,
            y_offset: 2,
            x_advance: width as i32 + 1,
            pixels: vec![fill; (width * height * 4) as usize],
            format: PixelFormat::Rgba8,
        })
    }

    fn kerning_table(&self) -> Result<KerningTable, Error> {
        if self.kerning_read_fails {
            return Err(Error::Io(std::io::Error::other("simulated read failure")));
        }
        match &self.kerning {
            Some(table) => Ok(table.clone()),
            None => Err(Error::KerningUnavailable("no kerning data".to_owned())),
        }
    }
}

/// Creates an empty scratch directory unique to the named test.
pub(crate) fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glyphpack_{}_{test}", std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
