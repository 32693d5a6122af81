// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line front end for glyphpack.
//!
//! Repacks an existing bitmap font: glyphs are read out of the source
//! atlas, packed onto fresh pages per the configured page size and padding,
//! and written as a new descriptor plus page images.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glyphpack::{descriptor, BitmapFontRasterizer, Error, FontAtlas, FontConfig};

#[derive(Debug, Parser)]
#[command(name = "glyphpack", version, about)]
struct Args {
    /// Source bitmap font descriptor (.fnt) to repack.
    input: PathBuf,

    /// Output descriptor path; page images are written alongside it.
    #[arg(short, long)]
    out: PathBuf,

    /// Settings file with padding, page dimensions and glyph text.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Page width override, in pixels.
    #[arg(long)]
    page_width: Option<u32>,

    /// Page height override, in pixels.
    #[arg(long)]
    page_height: Option<u32>,

    /// Code points to pack; defaults to every glyph in the source font.
    #[arg(short, long)]
    text: Option<String>,

    /// Treat every glyph as unique instead of sharing identical bitmaps.
    #[arg(long)]
    no_dedup: bool,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let mut config = match &args.settings {
        Some(path) => FontConfig::load(path)?,
        None => FontConfig::default(),
    };
    if let Some(width) = args.page_width {
        config.page_width = width;
    }
    if let Some(height) = args.page_height {
        config.page_height = height;
    }
    if let Some(text) = &args.text {
        config.glyph_text = text.clone();
    }
    if args.no_dedup {
        config.dedup = false;
    }
    config.font_file = Some(args.input.clone());

    if config.glyph_text.is_empty() {
        let source = descriptor::load(&args.input)?;
        config.glyph_text = source
            .chars
            .iter()
            .filter_map(|c| char::from_u32(c.id))
            .collect();
    }

    let rasterizer = BitmapFontRasterizer::open(&args.input, config.padding)?;
    let mut font = FontAtlas::new(config, rasterizer)?;
    descriptor::write(&mut font, &args.out)
}
