//! Measures a layout tree into a positioned surface.
//!
//! All coordinates are CSS pixels on a 794 px wide page, origin top-left. Text
//! is wrapped greedily word by word against the static width tables, so the
//! same layout always yields the same surface.

use serde::Serialize;

use crate::render::font_metrics::{get_metrics, FontWeight};
use crate::render::layout::{Align, Block, Frame, Inline, Layout, TextStyle};
use crate::render::{SURFACE_MIN_HEIGHT_PX, SURFACE_WIDTH_PX};

const PAGE_PADDING: f32 = 32.0;
const LINE_HEIGHT: f32 = 1.5;

const SECTION_GAP: f32 = 8.0;
const COLUMN_CHILD_GAP: f32 = 16.0;
const RUN_GAP: f32 = 8.0;

const BADGE_PAD_X: f32 = 8.0;
const BADGE_HEIGHT: f32 = 22.0;
const BADGE_GAP: f32 = 8.0;
const BADGE_ROW_GAP: f32 = 6.0;

const BULLET_MARKER_INDENT: f32 = 8.0;
const BULLET_TEXT_INDENT: f32 = 20.0;
const BULLET_GAP: f32 = 2.0;

const CARD_PADDING: f32 = 12.0;
const CARD_CHILD_GAP: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(0xff, 0xff, 0xff);
    pub const INK: Color = Color(0x0f, 0x17, 0x2a);
    pub const SLATE: Color = Color(0x47, 0x55, 0x69);
    pub const MUTED: Color = Color(0x64, 0x74, 0x8b);
    pub const LINK: Color = Color(0x25, 0x63, 0xeb);
    pub const RULE: Color = Color(0xcb, 0xd5, 0xe1);
    pub const CARD_FILL: Color = Color(0xf1, 0xf5, 0xf9);
    pub const BORDER: Color = Color(0xe2, 0xe8, 0xf0);
    pub const BADGE_SOLID: Color = Color(0x1e, 0x29, 0x3b);
}

/// Font size, weight and colour for a [`TextStyle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleSpec {
    pub size: f32,
    pub weight: FontWeight,
    pub color: Color,
}

impl StyleSpec {
    pub fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT
    }

    pub fn width_of(&self, text: &str) -> f32 {
        get_metrics(self.weight).measure_px(text, self.size)
    }
}

pub fn style_spec(style: TextStyle) -> StyleSpec {
    let (size, weight, color) = match style {
        TextStyle::Name => (24.0, FontWeight::Bold, Color::INK),
        TextStyle::Subtitle => (14.0, FontWeight::Regular, Color::SLATE),
        TextStyle::Heading => (16.0, FontWeight::Bold, Color::INK),
        TextStyle::Body => (14.0, FontWeight::Regular, Color::INK),
        TextStyle::Strong => (14.0, FontWeight::Bold, Color::INK),
        TextStyle::Small => (12.0, FontWeight::Regular, Color::INK),
        TextStyle::Muted => (12.0, FontWeight::Regular, Color::MUTED),
        TextStyle::Link => (12.0, FontWeight::Regular, Color::LINK),
    };
    StyleSpec {
        size,
        weight,
        color,
    }
}

/// One drawing instruction on the surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Paint {
    /// A single line of text. `y` is the top of its line box.
    Text {
        x: f32,
        y: f32,
        width: f32,
        size: f32,
        line_height: f32,
        weight: FontWeight,
        color: Color,
        text: String,
    },
    /// Rules, card backgrounds and badge frames.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Color>,
        stroke: Option<Color>,
    },
}

/// The mounted visual surface handed to the export pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
    pub paints: Vec<Paint>,
}

#[cfg(test)]
impl Surface {
    /// Text of every painted line, in paint order.
    pub fn lines(&self) -> Vec<&str> {
        self.paints
            .iter()
            .filter_map(|p| match p {
                Paint::Text { text, .. } => Some(text.as_str()),
                Paint::Rect { .. } => None,
            })
            .collect()
    }
}

/// Measures `layout` onto a surface of fixed width and at least A4 height.
pub fn measure(layout: &Layout) -> Surface {
    let mut painter = Painter::default();
    let content_width = SURFACE_WIDTH_PX - 2.0 * PAGE_PADDING;
    let content_height = painter.place(&layout.root, PAGE_PADDING, PAGE_PADDING, content_width);

    Surface {
        width: SURFACE_WIDTH_PX,
        height: (content_height + 2.0 * PAGE_PADDING).max(SURFACE_MIN_HEIGHT_PX),
        paints: painter.paints,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Word wrap
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word wrap. Returns each line with its width in px.
///
/// A single word wider than `max_width` gets a line of its own and overflows.
pub fn wrap_lines(text: &str, spec: &StyleSpec, max_width: f32) -> Vec<(String, f32)> {
    let metrics = get_metrics(spec.weight);
    let space_w = metrics.space_width() * spec.size;

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = metrics.measure_px(word, spec.size);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + space_w + word_w > max_width {
            lines.push((std::mem::take(&mut current), current_width));
            current.push_str(word);
            current_width = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }
    if !current.is_empty() {
        lines.push((current, current_width));
    }
    lines
}

/// Width of `runs` laid side by side, `RUN_GAP` apart.
fn runs_width(runs: &[Inline]) -> f32 {
    let total: f32 = runs
        .iter()
        .map(|r| style_spec(r.style()).width_of(r.text()))
        .sum();
    total + RUN_GAP * runs.len().saturating_sub(1) as f32
}

// ────────────────────────────────────────────────────────────────────────────
// Placement
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Painter {
    paints: Vec<Paint>,
}

impl Painter {
    /// Places `block` with its top-left at (`x`, `y`) inside `width`; returns its height.
    fn place(&mut self, block: &Block, x: f32, y: f32, width: f32) -> f32 {
        match block {
            Block::Stack { gap, children } => self.stack(children, *gap, x, y, width),
            Block::Columns { gap, columns } => {
                let total_weight: f32 = columns.iter().map(|c| f32::from(c.weight)).sum();
                if columns.is_empty() || total_weight <= 0.0 {
                    return 0.0;
                }
                let available = width - gap * (columns.len() as f32 - 1.0);
                let mut cx = x;
                let mut height = 0.0_f32;
                for column in columns {
                    let cw = available * f32::from(column.weight) / total_weight;
                    height = height.max(self.stack(&column.children, COLUMN_CHILD_GAP, cx, y, cw));
                    cx += cw + gap;
                }
                height
            }
            Block::Split {
                left,
                right,
                rule_below,
            } => {
                let half = width / 2.0;
                let lh = self.stack(left, 2.0, x, y, half);
                let rh = self.stack(right, 0.0, x + half, y, half);
                let mut height = lh.max(rh);
                if *rule_below {
                    height += SECTION_GAP;
                    self.rule(x, y + height, width, 2.0);
                    height += 2.0;
                }
                height
            }
            Block::Section {
                title,
                ruled,
                children,
            } => {
                let mut height = self.text(title, TextStyle::Heading, Align::Left, x, y, width);
                if *ruled {
                    height += 2.0;
                    self.rule(x, y + height, width, 1.0);
                    height += 1.0;
                }
                if !children.is_empty() {
                    height += SECTION_GAP;
                    height += self.stack(children, SECTION_GAP, x, y + height, width);
                }
                height
            }
            Block::Text { text, style, align } => self.text(text, *style, *align, x, y, width),
            Block::Row { left, right } => self.row(left, right, x, y, width),
            Block::Badges { tags, outline } => self.badges(tags, *outline, x, y, width),
            Block::BulletList { items } => {
                let spec = style_spec(TextStyle::Body);
                let mut height = 0.0_f32;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        height += BULLET_GAP;
                    }
                    self.line("•", &spec, x + BULLET_MARKER_INDENT, y + height);
                    height += self.text(
                        item,
                        TextStyle::Body,
                        Align::Left,
                        x + BULLET_TEXT_INDENT,
                        y + height,
                        width - BULLET_TEXT_INDENT,
                    );
                }
                height
            }
            Block::Card { frame, children } => {
                // The frame is painted before the children; its height is patched once known.
                let slot = self.paints.len();
                let (fill, stroke) = match frame {
                    Frame::Filled => (Some(Color::CARD_FILL), None),
                    Frame::Bordered => (None, Some(Color::BORDER)),
                };
                self.paints.push(Paint::Rect {
                    x,
                    y,
                    width,
                    height: 0.0,
                    fill,
                    stroke,
                });
                let inner = self.stack(
                    children,
                    CARD_CHILD_GAP,
                    x + CARD_PADDING,
                    y + CARD_PADDING,
                    width - 2.0 * CARD_PADDING,
                );
                let height = inner + 2.0 * CARD_PADDING;
                if let Some(Paint::Rect { height: h, .. }) = self.paints.get_mut(slot) {
                    *h = height;
                }
                height
            }
        }
    }

    fn stack(&mut self, children: &[Block], gap: f32, x: f32, y: f32, width: f32) -> f32 {
        let mut height = 0.0_f32;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                height += gap;
            }
            height += self.place(child, x, y + height, width);
        }
        height
    }

    fn text(&mut self, text: &str, style: TextStyle, align: Align, x: f32, y: f32, width: f32) -> f32 {
        let spec = style_spec(style);
        let lines = wrap_lines(text, &spec, width);
        for (i, (line, line_w)) in lines.iter().enumerate() {
            let lx = match align {
                Align::Left => x,
                Align::Center => x + (width - line_w).max(0.0) / 2.0,
                Align::Right => x + (width - line_w).max(0.0),
            };
            self.line(line, &spec, lx, y + i as f32 * spec.line_height());
        }
        lines.len() as f32 * spec.line_height()
    }

    fn line(&mut self, text: &str, spec: &StyleSpec, x: f32, y: f32) {
        self.paints.push(Paint::Text {
            x,
            y,
            width: spec.width_of(text),
            size: spec.size,
            line_height: spec.line_height(),
            weight: spec.weight,
            color: spec.color,
            text: text.to_string(),
        });
    }

    fn rule(&mut self, x: f32, y: f32, width: f32, thickness: f32) {
        self.paints.push(Paint::Rect {
            x,
            y,
            width,
            height: thickness,
            fill: Some(Color::RULE),
            stroke: None,
        });
    }

    /// Title and dates on one line when they fit. Otherwise the right edge keeps
    /// at most half the width and each side wraps within its own share.
    fn row(&mut self, left: &[Inline], right: &[Inline], x: f32, y: f32, width: f32) -> f32 {
        let line_box = left
            .iter()
            .chain(right)
            .map(|r| style_spec(r.style()).line_height())
            .fold(0.0_f32, f32::max);

        let right_width = runs_width(right).min(width / 2.0);
        let left_width = if right.is_empty() {
            width
        } else {
            width - right_width - RUN_GAP
        };

        let lh = self.runs(left, Align::Left, x, y, left_width, line_box);
        let rh = self.runs(right, Align::Right, x + width - right_width, y, right_width, line_box);
        lh.max(rh)
    }

    /// Places `runs` side by side, vertically centred in `line_box`, when they
    /// fit in `width`; otherwise stacks them, each wrapped to `width`.
    fn runs(
        &mut self,
        runs: &[Inline],
        align: Align,
        x: f32,
        y: f32,
        width: f32,
        line_box: f32,
    ) -> f32 {
        if runs.is_empty() {
            return 0.0;
        }
        let natural = runs_width(runs);
        if natural <= width {
            let mut cx = match align {
                Align::Right => x + width - natural,
                Align::Center => x + (width - natural) / 2.0,
                Align::Left => x,
            };
            for run in runs {
                let spec = style_spec(run.style());
                self.line(run.text(), &spec, cx, y + (line_box - spec.line_height()) / 2.0);
                cx += spec.width_of(run.text()) + RUN_GAP;
            }
            return line_box;
        }

        let mut height = 0.0_f32;
        for run in runs {
            height += self.text(run.text(), run.style(), align, x, y + height, width);
        }
        height
    }

    fn badges(&mut self, tags: &[String], outline: bool, x: f32, y: f32, width: f32) -> f32 {
        let spec = style_spec(TextStyle::Small);
        let (fill, stroke, color) = if outline {
            (None, Some(Color::RULE), Color::INK)
        } else {
            (Some(Color::BADGE_SOLID), None, Color::WHITE)
        };
        let label = StyleSpec { color, ..spec };

        let mut cx = x;
        let mut cy = y;
        for tag in tags {
            let bw = label.width_of(tag) + 2.0 * BADGE_PAD_X;
            if cx > x && cx + bw > x + width {
                cx = x;
                cy += BADGE_HEIGHT + BADGE_ROW_GAP;
            }
            self.paints.push(Paint::Rect {
                x: cx,
                y: cy,
                width: bw,
                height: BADGE_HEIGHT,
                fill,
                stroke,
            });
            self.line(
                tag,
                &label,
                cx + BADGE_PAD_X,
                cy + (BADGE_HEIGHT - label.line_height()) / 2.0,
            );
            cx += bw + BADGE_GAP;
        }
        if tags.is_empty() {
            0.0
        } else {
            cy - y + BADGE_HEIGHT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_document, Theme};
    use crate::render::render;

    fn text_paint<'a>(surface: &'a Surface, needle: &str) -> &'a Paint {
        surface
            .paints
            .iter()
            .find(|p| matches!(p, Paint::Text { text, .. } if text == needle))
            .unwrap_or_else(|| panic!("no painted line {needle:?}"))
    }

    #[test]
    fn test_wrap_respects_width() {
        let spec = style_spec(TextStyle::Body);
        let text = "Built scalable web apps and REST APIs for a growing customer base across three regions";
        let lines = wrap_lines(text, &spec, 200.0);
        assert!(lines.len() > 1);
        for (line, width) in &lines {
            assert!(*width <= 200.0, "{line:?} is {width}px");
        }
        let rejoined: Vec<&str> = lines.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(rejoined.join(" "), text);
    }

    #[test]
    fn test_wrap_empty_and_overlong_word() {
        let spec = style_spec(TextStyle::Body);
        assert!(wrap_lines("   ", &spec, 100.0).is_empty());
        let lines = wrap_lines("https://example.com/a/very/long/path tail", &spec, 40.0);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].1 > 40.0);
        assert_eq!(lines[1].0, "tail");
    }

    #[test]
    fn test_default_surface_is_a4_sized() {
        for theme in [Theme::Classic, Theme::Modern] {
            let surface = measure(&render(&default_document(), theme));
            assert_eq!(surface.width, SURFACE_WIDTH_PX);
            assert_eq!(surface.height, SURFACE_MIN_HEIGHT_PX);
            assert!(surface.lines().contains(&"Your Name"));
        }
    }

    #[test]
    fn test_classic_name_is_centred() {
        let surface = measure(&render(&default_document(), Theme::Classic));
        let Paint::Text { x, width, .. } = text_paint(&surface, "Your Name") else {
            unreachable!()
        };
        let left_margin = x - PAGE_PADDING;
        let right_margin = SURFACE_WIDTH_PX - PAGE_PADDING - (x + width);
        assert!((left_margin - right_margin).abs() < 0.01);
    }

    #[test]
    fn test_modern_contact_is_right_aligned() {
        let surface = measure(&render(&default_document(), Theme::Modern));
        let Paint::Text { x, width, .. } = text_paint(&surface, "you@example.com") else {
            unreachable!()
        };
        assert!((x + width - (SURFACE_WIDTH_PX - PAGE_PADDING)).abs() < 0.01);
    }

    #[test]
    fn test_long_content_grows_surface() {
        let mut doc = default_document();
        doc.experience[0].bullets = (0..80)
            .map(|i| format!("Delivered improvement number {i} to the platform"))
            .collect();
        let surface = measure(&render(&doc, Theme::Classic));
        assert!(surface.height > SURFACE_MIN_HEIGHT_PX);

        let bottom = surface
            .paints
            .iter()
            .map(|p| match p {
                Paint::Text { y, line_height, .. } => y + line_height,
                Paint::Rect { y, height, .. } => y + height,
            })
            .fold(0.0_f32, f32::max);
        assert!(bottom <= surface.height);
    }

    #[test]
    fn test_long_entry_titles_wrap_inside_the_page() {
        let mut doc = default_document();
        doc.experience[0].role =
            "Principal Distinguished Staff Software Engineer for Platform Reliability".into();
        doc.experience[0].company = "Awesome Company International Holdings Limited".into();
        doc.projects[0].name =
            "An extremely descriptive project name that keeps going well past the edge of the page"
                .into();

        let right_edge = SURFACE_WIDTH_PX - PAGE_PADDING;
        for theme in [Theme::Classic, Theme::Modern] {
            let surface = measure(&render(&doc, theme));
            for paint in &surface.paints {
                if let Paint::Text { x, width, text, .. } = paint {
                    assert!(
                        x + width <= right_edge + 0.01,
                        "{theme}: {text:?} ends at {}",
                        x + width
                    );
                }
            }
            let painted = surface.lines().join(" ");
            assert!(painted.contains("Holdings Limited"), "{theme}");
            assert!(painted.contains("edge of the page"), "{theme}");
            text_paint(&surface, "2023 – Present");
        }
    }

    #[test]
    fn test_short_row_stays_on_one_line() {
        let surface = measure(&render(&default_document(), Theme::Classic));
        let Paint::Text { y: title_y, line_height: title_lh, .. } =
            text_paint(&surface, "Software Engineer — Awesome Co")
        else {
            unreachable!()
        };
        let Paint::Text { x, y, width, line_height, .. } = text_paint(&surface, "2023 – Present")
        else {
            unreachable!()
        };
        assert!((x + width - (SURFACE_WIDTH_PX - PAGE_PADDING)).abs() < 0.01);
        assert!((title_y + title_lh / 2.0 - (y + line_height / 2.0)).abs() < 0.01);
    }

    #[test]
    fn test_card_frame_encloses_children() {
        let surface = measure(&render(&default_document(), Theme::Modern));
        let card = surface
            .paints
            .iter()
            .find(|p| matches!(p, Paint::Rect { fill: Some(Color::CARD_FILL), .. }))
            .expect("filled card");
        let Paint::Rect { y, height, .. } = card else {
            unreachable!()
        };
        let Paint::Text { y: ty, line_height, .. } = text_paint(&surface, "Software Engineer — Awesome Co")
        else {
            unreachable!()
        };
        assert!(*height > 0.0);
        assert!(*ty >= *y && ty + line_height <= y + height);
    }

    #[test]
    fn test_badges_wrap_inside_width() {
        let tags: Vec<String> = (0..40).map(|i| format!("Tag{i}")).collect();
        let layout = Layout {
            theme: Theme::Classic,
            root: Block::Badges {
                tags,
                outline: true,
            },
        };
        let surface = measure(&layout);
        let right_edge = SURFACE_WIDTH_PX - PAGE_PADDING;
        let mut rows = std::collections::BTreeSet::new();
        for paint in &surface.paints {
            if let Paint::Rect { x, y, width, .. } = paint {
                assert!(x + width <= right_edge + 0.01);
                rows.insert(*y as i32);
            }
        }
        assert!(rows.len() > 1);
    }

    #[test]
    fn test_measure_is_deterministic() {
        let layout = render(&default_document(), Theme::Modern);
        assert_eq!(measure(&layout), measure(&layout));
    }
}
