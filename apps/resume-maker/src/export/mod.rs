// Export pipeline: measured surface → 2× bitmap → A4 page slices → PDF bytes.
// CPU-bound; callers on the async runtime go through `export_resume`, which
// runs the whole pipeline inside tokio::task::spawn_blocking.

pub mod paginate;
pub mod pdf;
pub mod raster;

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::models::Document;
use crate::render::{measure, render_current, Surface};

pub use raster::{GlyphRasterizer, GreekingRasterizer, Rasterizer};

/// Device pixels per CSS pixel when rasterizing.
pub const RASTER_SCALE: f32 = 2.0;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("surface has no area ({width}x{height})")]
    EmptySurface { width: f32, height: f32 },

    #[error("font load failed: {0}")]
    Font(String),

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    #[error("export task failed: {0}")]
    Task(String),
}

/// A finished PDF ready to be downloaded.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Bytes,
}

/// PDF bytes for `surface`, plus the page count.
pub fn export_to_document(
    surface: &Surface,
    rasterizer: &dyn Rasterizer,
) -> Result<(Vec<u8>, usize), ExportError> {
    let bitmap = rasterizer.rasterize(surface, RASTER_SCALE)?;
    let plan = paginate::plan(bitmap.width(), bitmap.height());
    let bytes = pdf::assemble(&bitmap, &plan)?;
    Ok((bytes, plan.page_count()))
}

/// `{Name}_Resume.pdf`, every whitespace run in the name replaced by one underscore.
pub fn export_filename(profile_name: &str) -> String {
    let mut stem = String::with_capacity(profile_name.len());
    let mut in_space = false;
    for c in profile_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(c);
            in_space = false;
        }
    }
    format!("{stem}_Resume.pdf")
}

/// Renders `doc` with its current theme and exports it on the blocking pool.
pub async fn export_resume(
    doc: Document,
    rasterizer: Arc<dyn Rasterizer>,
) -> Result<ExportArtifact, ExportError> {
    let filename = export_filename(&doc.profile.name);
    let (bytes, pages) = tokio::task::spawn_blocking(move || {
        let surface = measure(&render_current(&doc));
        export_to_document(&surface, rasterizer.as_ref())
    })
    .await
    .map_err(|e| ExportError::Task(e.to_string()))??;

    info!(%filename, pages, size = bytes.len(), "resume exported");
    Ok(ExportArtifact {
        filename,
        bytes: Bytes::from(bytes),
    })
}
