//! Slices a tall bitmap into A4 pages.
//!
//! The bitmap is placed at the full width of a page with its height scaled in
//! proportion, then cut into bands of one page height each. Every page shows
//! its own band flush with the top of the page.

use serde::Serialize;

/// A4 in PDF points.
pub const PAGE_WIDTH_PT: f32 = 595.28;
pub const PAGE_HEIGHT_PT: f32 = 841.89;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlan {
    pub bitmap_width: u32,
    pub bitmap_height: u32,
    pub pages: Vec<PageSlice>,
}

/// One page's band of bitmap rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSlice {
    pub index: usize,
    /// First bitmap row of the band.
    pub top: u32,
    /// Rows in the band.
    pub height: u32,
    /// Height of the band on the page, in points.
    pub placed_height: f32,
}

impl PagePlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Plans the pages for a bitmap of `width` × `height` pixels.
///
/// Overflow past the last full page starts another page only once it reaches
/// one bitmap pixel; anything smaller is rounding in the scaled height.
pub fn plan(width: u32, height: u32) -> PagePlan {
    if width == 0 || height == 0 {
        return PagePlan {
            bitmap_width: width,
            bitmap_height: height,
            pages: vec![PageSlice {
                index: 0,
                top: 0,
                height,
                placed_height: 0.0,
            }],
        };
    }

    let pt_per_px = PAGE_WIDTH_PT / width as f32;
    let page_px = PAGE_HEIGHT_PT / pt_per_px;
    let count = ((height as f32 - 1.0) / page_px).ceil().max(1.0) as usize;

    let boundary = |k: usize| -> u32 {
        if k >= count {
            height
        } else {
            ((k as f32 * page_px).round() as u32).min(height)
        }
    };
    let pages = (0..count)
        .map(|index| {
            let top = boundary(index);
            let rows = boundary(index + 1).saturating_sub(top);
            PageSlice {
                index,
                top,
                height: rows,
                placed_height: rows as f32 * pt_per_px,
            }
        })
        .collect();

    PagePlan {
        bitmap_width: width,
        bitmap_height: height,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bitmap rows in one page at width 1588.
    fn page_px() -> f32 {
        PAGE_HEIGHT_PT * 1588.0 / PAGE_WIDTH_PT
    }

    /// Bitmap height whose scaled height is `pages` page heights at width 1588.
    fn bitmap_height(pages: f32) -> u32 {
        (pages * page_px()).round() as u32
    }

    #[test]
    fn test_two_point_four_pages_make_three() {
        let plan = plan(1588, bitmap_height(2.4));
        assert_eq!(plan.page_count(), 3);
        let last = plan.pages[2];
        assert!((last.placed_height / PAGE_HEIGHT_PT - 0.4).abs() < 0.01);
    }

    #[test]
    fn test_minimum_surface_is_one_page() {
        // 794 × 1123 CSS px at 2×.
        let plan = plan(1588, 2246);
        assert_eq!(plan.page_count(), 1);
        assert_eq!(plan.pages[0].height, 2246);
    }

    #[test]
    fn test_one_pixel_of_overflow_starts_a_page() {
        let full = page_px().ceil() as u32;
        assert_eq!(plan(1588, full).page_count(), 1);

        let plan = plan(1588, full + 1);
        assert_eq!(plan.page_count(), 2);
        assert!(plan.pages[1].height >= 1);
    }

    #[test]
    fn test_just_over_two_pages_adds_a_third() {
        let plan = plan(1588, bitmap_height(2.0) + 10);
        assert_eq!(plan.page_count(), 3);
    }

    #[test]
    fn test_bands_cover_every_row_once() {
        let height = bitmap_height(5.7);
        let plan = plan(1588, height);
        let mut next = 0;
        for slice in &plan.pages {
            assert_eq!(slice.top, next);
            assert!(slice.placed_height <= PAGE_HEIGHT_PT + PAGE_WIDTH_PT / 1588.0);
            next += slice.height;
        }
        assert_eq!(next, height);
    }

    #[test]
    fn test_degenerate_bitmap_still_yields_a_page() {
        assert_eq!(plan(0, 0).page_count(), 1);
    }
}
