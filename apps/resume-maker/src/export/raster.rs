//! Rasterizes a measured surface into an RGB bitmap.
//!
//! Rect painting is shared; implementors only decide how a line of text turns
//! into pixels.

use std::path::Path;

use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};
use tracing::debug;

use crate::export::ExportError;
use crate::render::font_metrics::FontWeight;
use crate::render::measure::{Color, Paint, Surface};

/// A single line of text in surface coordinates (CSS px, unscaled).
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub size: f32,
    pub line_height: f32,
    pub bold: bool,
    pub color: Color,
    pub text: &'a str,
}

pub trait Rasterizer: Send + Sync {
    /// Draws one text run onto `canvas`, already scaled by `scale`.
    fn draw_text(&self, canvas: &mut RgbImage, run: &TextRun<'_>, scale: f32);

    fn name(&self) -> &'static str;

    /// Paints the whole surface at `scale` × its CSS size on a white background.
    fn rasterize(&self, surface: &Surface, scale: f32) -> Result<RgbImage, ExportError> {
        let width = (surface.width * scale).round() as u32;
        let height = (surface.height * scale).round() as u32;
        if width == 0 || height == 0 {
            return Err(ExportError::EmptySurface {
                width: surface.width,
                height: surface.height,
            });
        }

        let mut canvas = RgbImage::from_pixel(width, height, rgb(Color::WHITE));
        for paint in &surface.paints {
            match paint {
                Paint::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                    stroke,
                } => {
                    let (x, y, w, h) = (x * scale, y * scale, width * scale, height * scale);
                    if let Some(fill) = fill {
                        fill_rect(&mut canvas, x, y, w, h, *fill);
                    }
                    if let Some(stroke) = stroke {
                        stroke_rect(&mut canvas, x, y, w, h, scale.max(1.0), *stroke);
                    }
                }
                Paint::Text {
                    x,
                    y,
                    width,
                    size,
                    line_height,
                    weight,
                    color,
                    text,
                } => {
                    let run = TextRun {
                        x: *x,
                        y: *y,
                        width: *width,
                        size: *size,
                        line_height: *line_height,
                        bold: *weight == FontWeight::Bold,
                        color: *color,
                        text,
                    };
                    self.draw_text(&mut canvas, &run, scale);
                }
            }
        }
        debug!(rasterizer = self.name(), width, height, "surface rasterized");
        Ok(canvas)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Glyph rasterizer (TrueType)
// ────────────────────────────────────────────────────────────────────────────

/// Draws real glyphs with a TrueType face. Bold runs are emboldened by
/// double-striking one pixel to the right.
pub struct GlyphRasterizer {
    font: Font<'static>,
}

impl GlyphRasterizer {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ExportError> {
        Font::try_from_vec(data)
            .map(|font| Self { font })
            .ok_or_else(|| ExportError::Font("not a TrueType/OpenType font".to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ExportError> {
        let data = std::fs::read(path)
            .map_err(|e| ExportError::Font(format!("{}: {e}", path.display())))?;
        Self::from_bytes(data)
    }
}

impl Rasterizer for GlyphRasterizer {
    fn draw_text(&self, canvas: &mut RgbImage, run: &TextRun<'_>, scale: f32) {
        let px = Scale::uniform(run.size * scale);
        let v = self.font.v_metrics(px);
        let glyph_height = v.ascent - v.descent;
        let baseline = run.y * scale + (run.line_height * scale - glyph_height) / 2.0 + v.ascent;

        let strikes: &[f32] = if run.bold { &[0.0, 1.0] } else { &[0.0] };
        for dx in strikes {
            for glyph in self
                .font
                .layout(run.text, px, point(run.x * scale + dx, baseline))
            {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    let x = bb.min.x + gx as i32;
                    let y = bb.min.y + gy as i32;
                    blend(canvas, x, y, run.color, coverage);
                });
            }
        }
    }

    fn name(&self) -> &'static str {
        "glyph"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Greeking rasterizer (no font configured)
// ────────────────────────────────────────────────────────────────────────────

/// Paints each text run as a solid bar of its measured width.
pub struct GreekingRasterizer;

impl Rasterizer for GreekingRasterizer {
    fn draw_text(&self, canvas: &mut RgbImage, run: &TextRun<'_>, scale: f32) {
        let bar_height = run.size * if run.bold { 0.6 } else { 0.45 };
        let top = run.y + (run.line_height - bar_height) / 2.0;
        fill_rect(
            canvas,
            run.x * scale,
            top * scale,
            run.width * scale,
            bar_height * scale,
            run.color,
        );
    }

    fn name(&self) -> &'static str {
        "greeking"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pixel helpers
// ────────────────────────────────────────────────────────────────────────────

fn rgb(color: Color) -> Rgb<u8> {
    Rgb([color.0, color.1, color.2])
}

fn fill_rect(canvas: &mut RgbImage, x: f32, y: f32, w: f32, h: f32, color: Color) {
    let x0 = x.round().max(0.0) as u32;
    let y0 = y.round().max(0.0) as u32;
    let x1 = ((x + w).round().max(0.0) as u32).min(canvas.width());
    let y1 = ((y + h).round().max(0.0) as u32).min(canvas.height());
    let pixel = rgb(color);
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px, py, pixel);
        }
    }
}

fn stroke_rect(canvas: &mut RgbImage, x: f32, y: f32, w: f32, h: f32, t: f32, color: Color) {
    fill_rect(canvas, x, y, w, t, color);
    fill_rect(canvas, x, y + h - t, w, t, color);
    fill_rect(canvas, x, y, t, h, color);
    fill_rect(canvas, x + w - t, y, t, h, color);
}

fn blend(canvas: &mut RgbImage, x: i32, y: i32, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let a = coverage.clamp(0.0, 1.0);
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let src = [color.0, color.1, color.2];
    for (d, s) in dst.0.iter_mut().zip(src) {
        *d = (f32::from(*d) * (1.0 - a) + f32::from(s) * a).round() as u8;
    }
}
