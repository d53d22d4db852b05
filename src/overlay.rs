// Header strip: the palette image stamped across the top of every output frame.
// Visual: a toolbar whose highlighted swatch tells you which brush is active.

use std::fs;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::error::Error;
use crate::paint::{ERASER, GREEN, ORANGE};
use crate::types::{Color, FrameBuffer};

/// Pre-rendered header images, one per brush state, in file-name order.
pub struct HeaderStrips {
    strips: Vec<RgbImage>,
    // Last strip resized to the frame width: (strip index, width, pixels).
    cached: Option<(usize, usize, FrameBuffer)>,
}

impl HeaderStrips {
    pub fn new(strips: Vec<RgbImage>) -> Self {
        Self { strips, cached: None }
    }

    /// Load every .png/.jpg/.jpeg in `dir`, sorted by file name. A missing
    /// directory gives an empty set (the overlay then does nothing).
    pub fn load_dir(dir: &Path) -> Result<Self, Error> {
        if !dir.is_dir() {
            log::warn!("palette dir {} not found; header overlay disabled", dir.display());
            return Ok(Self::new(Vec::new()));
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
                .unwrap_or(false);
            if is_image {
                paths.push(path);
            }
        }
        paths.sort();

        let mut strips = Vec::with_capacity(paths.len());
        for path in &paths {
            match image::open(path) {
                Ok(img) => strips.push(img.to_rgb8()),
                Err(e) => log::warn!("skipping header image {}: {e}", path.display()),
            }
        }
        log::info!("loaded {} header strip(s) from {}", strips.len(), dir.display());
        Ok(Self::new(strips))
    }

    pub fn len(&self) -> usize {
        self.strips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    /// Strip index for a brush color; anything unknown or missing falls back to 0.
    pub fn index_for(&self, color: Color) -> usize {
        let wanted = match color {
            c if c == ORANGE => 1,
            c if c == GREEN => 2,
            c if c == ERASER => 3,
            _ => 0,
        };
        if wanted < self.len() { wanted } else { 0 }
    }

    /// Stamp the strip for `color` over the top rows of `frame`, stretched to the
    /// frame width and keeping its own height (clipped to the frame).
    pub fn stamp(&mut self, frame: &mut FrameBuffer, color: Color) {
        if self.is_empty() || frame.width == 0 {
            return;
        }
        let idx = self.index_for(color);
        let width = frame.width;

        let fresh = !matches!(&self.cached, Some((i, w, _)) if *i == idx && *w == width);
        if fresh {
            let src = &self.strips[idx];
            let resized = imageops::resize(src, width as u32, src.height(), FilterType::Triangle);
            let pixels = resized
                .pixels()
                .map(|p| Color::new(p[0], p[1], p[2]).packed())
                .collect();
            let strip = FrameBuffer { width, height: resized.height() as usize, pixels };
            self.cached = Some((idx, width, strip));
        }

        if let Some((_, _, strip)) = &self.cached {
            let rows = strip.height.min(frame.height);
            let n = rows * width;
            frame.pixels[..n].copy_from_slice(&strip.pixels[..n]);
        }
    }
}
