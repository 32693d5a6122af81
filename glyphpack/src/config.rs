// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font configuration and the line-oriented settings file format.
//!
//! Settings files are UTF-8 `key=value` lines grouped by blank lines:
//!
//! ```text
//! font.name=Arial
//! font.size=32
//!
//! pad.top=1
//! pad.advance.x=-2
//!
//! glyph.page.width=512
//! glyph.page.height=512
//! glyph.text=0123456789
//!
//! effect.kind=color
//! effect.color=ffffff
//! ```
//!
//! `effect.kind` opens a new effect; subsequent `effect.<param>` lines set
//! parameters on the most recently opened one. Unknown keys are ignored so
//! newer files load in older tools. Newlines in `glyph.text` are escaped
//! as `\n`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::effect::{Effect, EffectChain, EffectKind};
use crate::error::Error;
use crate::raster::RenderMode;

/// Fixed padding added around every glyph bitmap, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Padding {
    /// Rows above the glyph.
    pub top: u32,
    /// Columns right of the glyph.
    pub right: u32,
    /// Rows below the glyph.
    pub bottom: u32,
    /// Columns left of the glyph.
    pub left: u32,
}

/// Everything needed to configure one atlas generation run.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Font family name, written into the descriptor's `info` line.
    pub face: String,
    /// Font size in points.
    pub size: u32,
    /// Bold style flag.
    pub bold: bool,
    /// Italic style flag.
    pub italic: bool,
    /// Treat the font as monospaced.
    pub mono: bool,
    /// Gamma correction hint for the rasterizer; zero leaves it alone.
    pub gamma: f32,
    /// Per-glyph bitmap padding.
    pub padding: Padding,
    /// Extra horizontal advance added to every glyph.
    pub pad_advance_x: i32,
    /// Extra vertical advance added to the line height.
    pub pad_advance_y: i32,
    /// Atlas page width in pixels.
    pub page_width: u32,
    /// Atlas page height in pixels.
    pub page_height: u32,
    /// Code points to pack, as literal text.
    pub glyph_text: String,
    /// How glyph pixels are produced.
    pub render_mode: RenderMode,
    /// Whether pixel-identical glyphs share atlas space.
    pub dedup: bool,
    /// Font resource consulted for kerning (and, for the bitmap backend,
    /// the source font itself). `None` degrades to a descriptor without
    /// kerning pairs.
    pub font_file: Option<PathBuf>,
    /// Effect chain composited while rasterizing.
    pub effects: EffectChain,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            face: "Arial".to_owned(),
            size: 12,
            bold: false,
            italic: false,
            mono: false,
            gamma: 0.0,
            padding: Padding::default(),
            pad_advance_x: 0,
            pad_advance_y: 0,
            page_width: 512,
            page_height: 512,
            glyph_text: String::new(),
            render_mode: RenderMode::default(),
            dedup: true,
            font_file: None,
            effects: EffectChain::new(),
        }
    }
}

impl FontConfig {
    /// Loads a settings file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Parses settings file contents.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut config = Self::default();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let Some((name, value)) = raw.split_once('=') else {
                return Err(Error::InvalidSettings {
                    line,
                    message: "expected key=value".to_owned(),
                });
            };
            let name = name.trim();
            match name {
                "font.name" => config.face = value.to_owned(),
                "font.size" => config.size = parse_num(value, line)?,
                "font.bold" => config.bold = parse_bool(value),
                "font.italic" => config.italic = parse_bool(value),
                "font.mono" => config.mono = parse_bool(value),
                "font.gamma" => config.gamma = parse_num(value, line)?,
                "font.file" => {
                    config.font_file = (!value.is_empty()).then(|| PathBuf::from(value));
                }
                "pad.top" => config.padding.top = parse_num(value, line)?,
                "pad.right" => config.padding.right = parse_num(value, line)?,
                "pad.bottom" => config.padding.bottom = parse_num(value, line)?,
                "pad.left" => config.padding.left = parse_num(value, line)?,
                "pad.advance.x" => config.pad_advance_x = parse_num(value, line)?,
                "pad.advance.y" => config.pad_advance_y = parse_num(value, line)?,
                "glyph.page.width" => config.page_width = parse_num(value, line)?,
                "glyph.page.height" => config.page_height = parse_num(value, line)?,
                "glyph.text" => config.glyph_text = value.replace("\\n", "\n"),
                "glyph.dedup" => config.dedup = parse_bool(value),
                "render.mode" => {
                    config.render_mode =
                        RenderMode::from_name(value.trim()).ok_or(Error::InvalidSettings {
                            line,
                            message: format!("unknown render mode {value:?}"),
                        })?;
                }
                "effect.kind" => {
                    let kind =
                        EffectKind::from_name(value.trim()).ok_or(Error::InvalidSettings {
                            line,
                            message: format!("unknown effect kind {value:?}"),
                        })?;
                    config.effects.push(Effect::new(kind));
                }
                _ => {
                    if let Some(param) = name.strip_prefix("effect.") {
                        let Some(effect) = config.effects.effects_mut().last_mut() else {
                            return Err(Error::InvalidSettings {
                                line,
                                message: "effect parameter before any effect.kind".to_owned(),
                            });
                        };
                        effect.set_value(param, value);
                    }
                    // Other unknown keys are ignored.
                }
            }
        }
        Ok(config)
    }

    /// Saves the settings file.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        fs::write(path, self.to_settings_string())?;
        Ok(())
    }

    /// Renders the configuration in settings file form.
    pub fn to_settings_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "font.name={}", self.face);
        let _ = writeln!(out, "font.size={}", self.size);
        let _ = writeln!(out, "font.bold={}", self.bold);
        let _ = writeln!(out, "font.italic={}", self.italic);
        let _ = writeln!(out, "font.gamma={}", self.gamma);
        let _ = writeln!(out, "font.mono={}", self.mono);
        let _ = writeln!(
            out,
            "font.file={}",
            self.font_file.as_deref().unwrap_or(Path::new("")).display()
        );
        out.push('\n');
        let _ = writeln!(out, "pad.top={}", self.padding.top);
        let _ = writeln!(out, "pad.right={}", self.padding.right);
        let _ = writeln!(out, "pad.bottom={}", self.padding.bottom);
        let _ = writeln!(out, "pad.left={}", self.padding.left);
        let _ = writeln!(out, "pad.advance.x={}", self.pad_advance_x);
        let _ = writeln!(out, "pad.advance.y={}", self.pad_advance_y);
        out.push('\n');
        let _ = writeln!(out, "glyph.page.width={}", self.page_width);
        let _ = writeln!(out, "glyph.page.height={}", self.page_height);
        let _ = writeln!(out, "glyph.text={}", self.glyph_text.replace('\n', "\\n"));
        let _ = writeln!(out, "glyph.dedup={}", self.dedup);
        out.push('\n');
        let _ = writeln!(out, "render.mode={}", self.render_mode.name());
        for effect in self.effects.effects() {
            out.push('\n');
            let _ = writeln!(out, "effect.kind={}", effect.kind().name());
            for (name, value) in effect.values() {
                let _ = writeln!(out, "effect.{name}={value}");
            }
        }
        out
    }
}

fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_num<T: std::str::FromStr>(value: &str, line: usize) -> Result<T, Error> {
    value.trim().parse().map_err(|_| Error::InvalidSettings {
        line,
        message: format!("bad number {value:?}"),
    })
}
