// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Re-packing an existing bitmap font through [`BitmapFontRasterizer`].

use glyphpack::{
    descriptor, BitmapFontRasterizer, FontAtlas, FontConfig, KerningTable, Padding,
};

use crate::util::{scratch_dir, TestRasterizer};

/// Generates a small source font on disk and returns its descriptor path.
fn write_source_font(dir: &std::path::Path) -> std::path::PathBuf {
    let mut kerning = KerningTable::new();
    kerning.insert(65, 66, -2);
    let config = FontConfig {
        face: "Source".to_owned(),
        page_width: 64,
        page_height: 64,
        glyph_text: "AB".to_owned(),
        font_file: Some("source.ttf".into()),
        ..FontConfig::default()
    };
    let mut font =
        FontAtlas::new(config, TestRasterizer::new(8, 8).with_kerning(kerning)).unwrap();
    let path = dir.join("source.fnt");
    descriptor::write(&mut font, &path).unwrap();
    path
}

#[test]
fn repack_preserves_glyphs_and_kerning() {
    let dir = scratch_dir("repack_basic");
    let source = write_source_font(&dir);

    let config = FontConfig {
        face: "Repacked".to_owned(),
        page_width: 128,
        page_height: 128,
        glyph_text: "AB".to_owned(),
        font_file: Some(source.clone()),
        ..FontConfig::default()
    };
    let rasterizer = BitmapFontRasterizer::open(&source, config.padding).unwrap();
    let mut font = FontAtlas::new(config, rasterizer).unwrap();
    descriptor::write(&mut font, &dir.join("repacked.fnt")).unwrap();

    let parsed = descriptor::load(&dir.join("repacked.fnt")).unwrap();
    let ids: Vec<u32> = parsed.chars.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![32, 65, 66]);

    let a = parsed.chars.iter().find(|c| c.id == 65).unwrap();
    assert_eq!((a.width, a.height), (8, 8));
    assert_eq!(a.x_advance, 9);

    assert_eq!(parsed.kernings.len(), 1);
    assert_eq!(
        (parsed.kernings[0].first, parsed.kernings[0].second, parsed.kernings[0].amount),
        (65, 66, -2)
    );
}

#[test]
fn repack_applies_padding() {
    let dir = scratch_dir("repack_padding");
    let source = write_source_font(&dir);

    let padding = Padding {
        top: 1,
        right: 1,
        bottom: 1,
        left: 1,
    };
    let config = FontConfig {
        face: "Padded".to_owned(),
        page_width: 128,
        page_height: 128,
        glyph_text: "A".to_owned(),
        padding,
        font_file: Some(source.clone()),
        ..FontConfig::default()
    };
    let rasterizer = BitmapFontRasterizer::open(&source, padding).unwrap();
    let mut font = FontAtlas::new(config, rasterizer).unwrap();
    descriptor::write(&mut font, &dir.join("padded.fnt")).unwrap();

    let parsed = descriptor::load(&dir.join("padded.fnt")).unwrap();
    let a = parsed.chars.iter().find(|c| c.id == 65).unwrap();
    // 8x8 source glyph plus one padding pixel on each side; offsets shift
    // back so the rendered position is unchanged, and the advance grows by
    // the horizontal padding.
    assert_eq!((a.width, a.height), (10, 10));
    assert_eq!(a.x_offset, 0);
    assert_eq!(a.y_offset, 1);
    assert_eq!(a.x_advance, 11);
}

#[test]
fn repacked_pixels_match_the_source() {
    let dir = scratch_dir("repack_pixels");
    let source = write_source_font(&dir);

    let config = FontConfig {
        face: "Pixels".to_owned(),
        page_width: 128,
        page_height: 128,
        glyph_text: "AB".to_owned(),
        ..FontConfig::default()
    };
    let rasterizer = BitmapFontRasterizer::open(&source, config.padding).unwrap();
    let mut font = FontAtlas::new(config, rasterizer).unwrap();
    descriptor::write(&mut font, &dir.join("pixels.fnt")).unwrap();

    let decoder = png::Decoder::new(std::fs::File::open(dir.join("pixels.png")).unwrap());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    // Two distinct 8x8 glyphs, no dedup: two regions of source pixels.
    let nonzero = buf.iter().filter(|&&b| b != 0).count();
    assert_eq!(nonzero, 2 * 8 * 8 * 4);
}
