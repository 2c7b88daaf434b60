// Template rendering: Document + theme → layout tree → (HTML | measured surface).
// Everything here is pure; the same input always yields the same output.

pub mod classic;
pub mod font_metrics;
pub mod html;
pub mod layout;
pub mod measure;
pub mod modern;

pub use layout::Layout;
pub use measure::{measure, Surface};

use crate::models::{Document, Theme};

/// A4 at 96 dpi, in CSS pixels.
pub const SURFACE_WIDTH_PX: f32 = 794.0;
pub const SURFACE_MIN_HEIGHT_PX: f32 = 1123.0;

/// Renders `doc` with the given theme.
pub fn render(doc: &Document, theme: Theme) -> Layout {
    match theme {
        Theme::Classic => classic::render(doc),
        Theme::Modern => modern::render(doc),
    }
}

/// Renders `doc` with the theme stored in its metadata.
pub fn render_current(doc: &Document) -> Layout {
    render(doc, doc.meta.theme)
}
