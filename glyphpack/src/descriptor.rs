// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bitmap font text descriptor: byte-exact writer and a reader for the
//! same format.
//!
//! The format is line-oriented `key=value` records (`info`, `common`,
//! `page`, `chars`, `char`, `kernings`, `kerning`). Field padding in `char`
//! lines is fixed — 7 columns for `id`, 5 for everything else, space-padded
//! on the right — because existing parsers and diff tooling depend on the
//! historical layout. Change nothing here without a reference file to
//! compare against.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::warn;

use crate::atlas::Surface;
use crate::config::Padding;
use crate::error::Error;
use crate::font::FontAtlas;
use crate::glyph::{Glyph, Placement};
use crate::kerning::{self, KerningPair};
use crate::raster::Rasterizer;

/// Writes the descriptor and every page image next to `path`.
///
/// `path` names the `.fnt` file; page images land in the same directory
/// under the naming rule of [`page_file_name`]. The space character and the
/// missing-glyph placeholder are queued whether or not they were requested
/// — renderers depend on them — and any still-pending glyphs are loaded
/// before serialization.
///
/// Outputs are written through a temporary sibling path and renamed into
/// place, so a failed export never leaves a truncated artifact behind.
pub fn write<R: Rasterizer>(font: &mut FontAtlas<R>, path: &Path) -> Result<(), Error> {
    font.queue_required_glyphs();
    font.load_glyphs(None)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let base = base_name(path);

    let text = render(font, &base);
    write_atomic(&dir.join(format!("{base}.fnt")), text.as_bytes())?;

    for page in font.pages() {
        let name = page_file_name(&base, page.index() as usize);
        export_page(page.surface(), &dir.join(name))?;
    }
    Ok(())
}

/// Renders the full descriptor text for a loaded atlas.
///
/// `base` is the output base name the page image files are derived from.
pub fn render<R: Rasterizer>(font: &FontAtlas<R>, base: &str) -> String {
    let config = font.config();
    let metrics = font.metrics();
    let page_count = font.pages().len();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "info face=\"{}\" size={} bold={} italic={} charset=\"\" unicode=0 stretchH=100 smooth=1 aa=1 padding={},{},{},{} spacing={},{}",
        config.face,
        config.size,
        i32::from(config.bold),
        i32::from(config.italic),
        config.padding.top,
        config.padding.right,
        config.padding.bottom,
        config.padding.left,
        config.pad_advance_x,
        config.pad_advance_y,
    );
    let _ = writeln!(
        out,
        "common lineHeight={} base={} scaleW={} scaleH={} pages={} packed=0",
        metrics.line_height + config.pad_advance_y,
        metrics.ascent,
        config.page_width,
        config.page_height,
        page_count,
    );
    for page in font.pages() {
        let _ = writeln!(
            out,
            "page id={} file=\"{}\"",
            page.index(),
            page_file_name(base, page.index() as usize),
        );
    }

    let _ = writeln!(out, "chars count={}", font.glyph_count());

    // Char lines are sorted by code point within each page; the same order
    // feeds the kerning reverse map so later code points win index clashes.
    let mut exported = Vec::with_capacity(font.glyph_count());
    for page in font.pages() {
        let mut glyphs: Vec<&Glyph> = page.glyphs().iter().collect();
        glyphs.sort_by_key(|g| g.code_point());
        for glyph in glyphs {
            write_char_line(&mut out, glyph, config.page_width, config.page_height);
            exported.push(glyph.code_point());
        }
    }

    // With no kerning source at all the section is omitted entirely; a
    // source that failed to read still gets its (empty) count line.
    if let Some(pairs) = kerning_pairs(font, exported) {
        let _ = writeln!(out, "kernings count={}", pairs.len());
        for pair in pairs {
            let _ = writeln!(
                out,
                "kerning first={} second={} amount={}",
                pair.first, pair.second, pair.amount,
            );
        }
    }
    out
}

/// The image file name for a page.
///
/// The first page is `<base>.png`; further pages are `<base>2.png`,
/// `<base>3.png`, … — numbered from the second page on.
pub fn page_file_name(base: &str, index: usize) -> String {
    if index == 0 {
        format!("{base}.png")
    } else {
        format!("{base}{}.png", index + 1)
    }
}

fn base_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(".fnt").map_or(name.clone(), str::to_owned)
}

fn write_char_line(out: &mut String, glyph: &Glyph, page_width: u32, page_height: u32) {
    let placement = glyph.placement().unwrap_or(Placement {
        page_index: 0,
        u: 0.0,
        v: 0.0,
        u2: 0.0,
        v2: 0.0,
    });
    #[expect(clippy::cast_possible_truncation, reason = "uv times page size fits i32")]
    let x = (placement.u * page_width as f32) as i32;
    #[expect(clippy::cast_possible_truncation, reason = "uv times page size fits i32")]
    let y = (placement.v * page_height as f32) as i32;
    let _ = writeln!(
        out,
        "char id={:<7} x={:<5}y={:<5}width={:<5}height={:<5}xoffset={:<5}yoffset={:<5}xadvance={:<5}page={:<5}chnl=0 ",
        glyph.code_point(),
        x,
        y,
        glyph.width(),
        glyph.height(),
        glyph.x_offset(),
        glyph.y_offset(),
        glyph.x_advance(),
        placement.page_index,
    );
}

/// Collects the kerning pairs for the exported code points.
///
/// `None` means no kerning source was configured and the section should be
/// omitted; a read failure degrades to an empty list. Both paths log.
fn kerning_pairs<R: Rasterizer>(font: &FontAtlas<R>, exported: Vec<u32>) -> Option<Vec<KerningPair>> {
    if font.config().font_file.is_none() {
        warn!("kerning not written: no font file was specified");
        return None;
    }
    let table = match font.rasterizer().kerning_table() {
        Ok(table) => table,
        Err(err) => {
            warn!("unable to read kerning information: {err}");
            return Some(Vec::new());
        }
    };
    let map = kerning::index_map(font.rasterizer(), exported.into_iter());
    Some(kerning::extract_pairs(&table, &map))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);
    fs::write(tmp, bytes)?;
    fs::rename(tmp, path)?;
    Ok(())
}

fn export_page(surface: &Surface, path: &Path) -> Result<(), Error> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, surface.width(), surface.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(surface.data())?;
    }
    write_atomic(path, &bytes)
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// A parsed descriptor file.
#[derive(Clone, Debug, Default)]
pub struct Descriptor {
    /// Font family name from the `info` line.
    pub face: String,
    /// Font size in points.
    pub size: i32,
    /// Bold style flag.
    pub bold: bool,
    /// Italic style flag.
    pub italic: bool,
    /// Per-glyph padding from the `info` line.
    pub padding: Padding,
    /// Advance padding (`spacing=`) from the `info` line.
    pub spacing: (i32, i32),
    /// Vertical distance between baselines.
    pub line_height: i32,
    /// Baseline position from the top of a line.
    pub base: i32,
    /// Page width in pixels.
    pub scale_w: u32,
    /// Page height in pixels.
    pub scale_h: u32,
    /// Page image files, in id order as listed.
    pub pages: Vec<PageEntry>,
    /// Glyph records in file order.
    pub chars: Vec<CharEntry>,
    /// Kerning pairs in file order; empty when the section is absent.
    pub kernings: Vec<KerningPair>,
}

/// One `page` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageEntry {
    /// Page index.
    pub id: u32,
    /// Image file name, relative to the descriptor.
    pub file: String,
}

/// One `char` record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharEntry {
    /// Code point.
    pub id: u32,
    /// Left pixel coordinate on the page.
    pub x: u32,
    /// Top pixel coordinate on the page.
    pub y: u32,
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// Horizontal offset from the pen position.
    pub x_offset: i32,
    /// Vertical offset from the line top.
    pub y_offset: i32,
    /// Pen advance.
    pub x_advance: i32,
    /// Index of the page holding the pixels.
    pub page: u32,
}

/// Reads a descriptor file.
pub fn load(path: &Path) -> Result<Descriptor, Error> {
    parse(&fs::read_to_string(path)?)
}

/// Parses descriptor text.
///
/// Unknown record types are skipped so files from newer producers still
/// load. `chars count` and `kernings count` headers are not trusted; the
/// records themselves are counted.
pub fn parse(text: &str) -> Result<Descriptor, Error> {
    let mut descriptor = Descriptor::default();
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let (record, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let fields = split_fields(rest);
        match record {
            "info" => {
                descriptor.face = get(&fields, "face")?.to_owned();
                descriptor.size = num(&fields, "size")?;
                descriptor.bold = num::<i32>(&fields, "bold")? != 0;
                descriptor.italic = num::<i32>(&fields, "italic")? != 0;
                let pad = int_list::<u32>(get(&fields, "padding")?)?;
                if let [top, right, bottom, left] = pad[..] {
                    descriptor.padding = Padding {
                        top,
                        right,
                        bottom,
                        left,
                    };
                } else {
                    return Err(Error::InvalidDescriptor("bad padding list".to_owned()));
                }
                let spacing = int_list::<i32>(get(&fields, "spacing")?)?;
                if let [x, y] = spacing[..] {
                    descriptor.spacing = (x, y);
                } else {
                    return Err(Error::InvalidDescriptor("bad spacing list".to_owned()));
                }
            }
            "common" => {
                descriptor.line_height = num(&fields, "lineHeight")?;
                descriptor.base = num(&fields, "base")?;
                descriptor.scale_w = num(&fields, "scaleW")?;
                descriptor.scale_h = num(&fields, "scaleH")?;
            }
            "page" => descriptor.pages.push(PageEntry {
                id: num(&fields, "id")?,
                file: get(&fields, "file")?.to_owned(),
            }),
            "char" => descriptor.chars.push(CharEntry {
                id: num(&fields, "id")?,
                x: num(&fields, "x")?,
                y: num(&fields, "y")?,
                width: num(&fields, "width")?,
                height: num(&fields, "height")?,
                x_offset: num(&fields, "xoffset")?,
                y_offset: num(&fields, "yoffset")?,
                x_advance: num(&fields, "xadvance")?,
                page: num(&fields, "page")?,
            }),
            "kerning" => descriptor.kernings.push(KerningPair {
                first: num(&fields, "first")?,
                second: num(&fields, "second")?,
                amount: num(&fields, "amount")?,
            }),
            // "chars"/"kernings" count headers and unknown records.
            _ => {}
        }
    }
    Ok(descriptor)
}

/// Splits `key=value` fields, honoring double-quoted values.
fn split_fields(rest: &str) -> Vec<(&str, &str)> {
    let mut fields = Vec::new();
    let mut rest = rest.trim_start();
    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else { break };
        let key = rest[..eq].trim();
        let after = &rest[eq + 1..];
        let (value, tail) = if let Some(stripped) = after.strip_prefix('"') {
            match stripped.find('"') {
                Some(close) => (&stripped[..close], &stripped[close + 1..]),
                None => (stripped, ""),
            }
        } else {
            match after.find(char::is_whitespace) {
                Some(end) => (&after[..end], &after[end..]),
                None => (after, ""),
            }
        };
        fields.push((key, value));
        rest = tail.trim_start();
    }
    fields
}

fn get<'a>(fields: &[(&str, &'a str)], key: &str) -> Result<&'a str, Error> {
    fields
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .ok_or_else(|| Error::InvalidDescriptor(format!("missing field {key}")))
}

fn num<T: std::str::FromStr>(fields: &[(&str, &str)], key: &str) -> Result<T, Error> {
    let value = get(fields, key)?;
    value
        .parse()
        .map_err(|_| Error::InvalidDescriptor(format!("bad value for {key}: {value:?}")))
}

fn int_list<T: std::str::FromStr>(value: &str) -> Result<Vec<T>, Error> {
    value
        .split(',')
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| Error::InvalidDescriptor(format!("bad list entry {v:?}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_line_layout_is_fixed_width() {
        let mut glyph = Glyph::new(32, 0, 0, 0, 0, 4);
        glyph.set_placement(Placement {
            page_index: 0,
            u: 0.0,
            v: 0.0,
            u2: 0.0,
            v2: 0.0,
        });
        let mut out = String::new();
        write_char_line(&mut out, &glyph, 256, 256);
        assert_eq!(
            out,
            "char id=32      x=0    y=0    width=0    height=0    xoffset=0    yoffset=0    xadvance=4    page=0    chnl=0 \n"
        );
    }

    #[test]
    fn char_line_truncates_pixel_coordinates() {
        let mut glyph = Glyph::new(65, 10, 12, 1, -2, 11);
        glyph.set_placement(Placement {
            page_index: 3,
            u: 100.0 / 256.0,
            v: 37.0 / 256.0,
            u2: 110.0 / 256.0,
            v2: 49.0 / 256.0,
        });
        let mut out = String::new();
        write_char_line(&mut out, &glyph, 256, 256);
        assert_eq!(
            out,
            "char id=65      x=100  y=37   width=10   height=12   xoffset=1    yoffset=-2   xadvance=11   page=3    chnl=0 \n"
        );
    }

    #[test]
    fn page_names_number_from_the_second_page() {
        assert_eq!(page_file_name("test", 0), "test.png");
        assert_eq!(page_file_name("test", 1), "test2.png");
        assert_eq!(page_file_name("test", 2), "test3.png");
    }

    #[test]
    fn base_name_strips_fnt_extension() {
        assert_eq!(base_name(Path::new("out/test.fnt")), "test");
        assert_eq!(base_name(Path::new("test")), "test");
    }

    #[test]
    fn parses_quoted_values_with_spaces() {
        let text = "info face=\"Deja Vu Sans\" size=12 bold=0 italic=1 charset=\"\" unicode=0 stretchH=100 smooth=1 aa=1 padding=1,2,3,4 spacing=5,6\n";
        let descriptor = parse(text).unwrap();
        assert_eq!(descriptor.face, "Deja Vu Sans");
        assert!(!descriptor.bold);
        assert!(descriptor.italic);
        assert_eq!(
            descriptor.padding,
            Padding {
                top: 1,
                right: 2,
                bottom: 3,
                left: 4
            }
        );
        assert_eq!(descriptor.spacing, (5, 6));
    }

    #[test]
    fn parses_char_and_kerning_records() {
        let text = "\
common lineHeight=14 base=10 scaleW=256 scaleH=256 pages=1 packed=0
page id=0 file=\"test.png\"
chars count=1
char id=65      x=1    y=2    width=3    height=4    xoffset=5    yoffset=6    xadvance=7    page=0    chnl=0
kernings count=1
kerning first=65 second=86 amount=-2
";
        let descriptor = parse(text).unwrap();
        assert_eq!(descriptor.line_height, 14);
        assert_eq!(descriptor.pages, vec![PageEntry { id: 0, file: "test.png".to_owned() }]);
        assert_eq!(
            descriptor.chars,
            vec![CharEntry {
                id: 65,
                x: 1,
                y: 2,
                width: 3,
                height: 4,
                x_offset: 5,
                y_offset: 6,
                x_advance: 7,
                page: 0,
            }]
        );
        assert_eq!(
            descriptor.kernings,
            vec![KerningPair {
                first: 65,
                second: 86,
                amount: -2
            }]
        );
    }

    #[test]
    fn missing_field_is_an_error() {
        assert!(matches!(
            parse("page id=0\n"),
            Err(Error::InvalidDescriptor(_))
        ));
    }
}
