//! The layout tree produced by the templates.
//!
//! Blocks describe structure and semantic styling only. Pixel geometry is
//! decided later by `measure`, and markup by `html`, so both consumers agree on
//! exactly the same content.

use serde::Serialize;

use crate::models::Theme;

/// Semantic text style. Sizes and colours are looked up by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    /// Candidate name in the header.
    Name,
    /// Job title under the name.
    Subtitle,
    /// Section heading.
    Heading,
    Body,
    /// Entry titles ("Role — Company").
    Strong,
    /// Contact details.
    Small,
    /// Dates and locations.
    Muted,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Decoration of a [`Block::Card`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Frame {
    Filled,
    Bordered,
}

/// A run of text inside a [`Block::Row`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String, style: TextStyle },
    Link { text: String, href: String },
}

impl Inline {
    pub fn text(&self) -> &str {
        match self {
            Inline::Text { text, .. } | Inline::Link { text, .. } => text,
        }
    }

    pub fn style(&self) -> TextStyle {
        match self {
            Inline::Text { style, .. } => *style,
            Inline::Link { .. } => TextStyle::Link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Relative share of the available width.
    pub weight: u8,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Children top to bottom, `gap` px apart.
    Stack { gap: f32, children: Vec<Block> },
    /// Side-by-side columns sharing the width by weight.
    Columns { gap: f32, columns: Vec<Column> },
    /// Two stacks: `left` flush left, `right` flush right.
    Split {
        left: Vec<Block>,
        right: Vec<Block>,
        rule_below: bool,
    },
    /// A titled section. `ruled` draws a rule under the heading.
    Section {
        title: String,
        ruled: bool,
        children: Vec<Block>,
    },
    Text {
        text: String,
        style: TextStyle,
        align: Align,
    },
    /// A line with runs on the left and right edges (title and dates).
    Row { left: Vec<Inline>, right: Vec<Inline> },
    Badges { tags: Vec<String>, outline: bool },
    BulletList { items: Vec<String> },
    Card { frame: Frame, children: Vec<Block> },
}

#[cfg(test)]
impl Block {
    /// Visits this block and every descendant, parents first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Block)) {
        visit(self);
        match self {
            Block::Stack { children, .. }
            | Block::Section { children, .. }
            | Block::Card { children, .. } => {
                for child in children {
                    child.walk(visit);
                }
            }
            Block::Columns { columns, .. } => {
                for child in columns.iter().flat_map(|c| c.children.iter()) {
                    child.walk(visit);
                }
            }
            Block::Split { left, right, .. } => {
                for child in left.iter().chain(right.iter()) {
                    child.walk(visit);
                }
            }
            Block::Text { .. } | Block::Row { .. } | Block::Badges { .. } | Block::BulletList { .. } => {}
        }
    }
}

/// A rendered resume: the theme it was produced with and its block tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub theme: Theme,
    pub root: Block,
}

#[cfg(test)]
impl Layout {
    /// Sections in document order, as `(title, children)`.
    pub fn sections(&self) -> Vec<(&str, &[Block])> {
        let mut out = Vec::new();
        self.root.walk(&mut |block| {
            if let Block::Section { title, children, .. } = block {
                out.push((title.as_str(), children.as_slice()));
            }
        });
        out
    }

    /// The section with `title`, if rendered.
    pub fn section(&self, title: &str) -> Option<&[Block]> {
        self.sections()
            .into_iter()
            .find(|(t, _)| *t == title)
            .map(|(_, children)| children)
    }

    /// Every badge tag in document order.
    pub fn badges(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.root.walk(&mut |block| {
            if let Block::Badges { tags, .. } = block {
                out.extend(tags.iter().map(String::as_str));
            }
        });
        out
    }

    /// Every bullet item in document order.
    pub fn bullets(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.root.walk(&mut |block| {
            if let Block::BulletList { items } = block {
                out.extend(items.iter().map(String::as_str));
            }
        });
        out
    }

    /// Every visible string in document order (text blocks, inlines, tags, bullets).
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.root.walk(&mut |block| match block {
            Block::Section { title, .. } => out.push(title.as_str()),
            Block::Text { text, .. } => out.push(text.as_str()),
            Block::Row { left, right } => {
                out.extend(left.iter().chain(right.iter()).map(Inline::text));
            }
            Block::Badges { tags, .. } => out.extend(tags.iter().map(String::as_str)),
            Block::BulletList { items } => out.extend(items.iter().map(String::as_str)),
            _ => {}
        });
        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builders shared by the templates
// ────────────────────────────────────────────────────────────────────────────

/// A text block, or nothing when `text` is empty.
pub fn text(text: &str, style: TextStyle, align: Align) -> Option<Block> {
    (!text.is_empty()).then(|| Block::Text {
        text: text.to_string(),
        style,
        align,
    })
}

pub fn run(text: &str, style: TextStyle) -> Option<Inline> {
    (!text.is_empty()).then(|| Inline::Text {
        text: text.to_string(),
        style,
    })
}

pub fn link(href: &str) -> Option<Inline> {
    (!href.is_empty()).then(|| Inline::Link {
        text: href.to_string(),
        href: href.to_string(),
    })
}

/// A row, or nothing when both edges are empty.
pub fn row(left: Vec<Inline>, right: Vec<Inline>) -> Option<Block> {
    (!left.is_empty() || !right.is_empty()).then_some(Block::Row { left, right })
}

/// "Title ........ start – end": the heading line of an experience or education entry.
pub fn dated_row(title: &str, start: &str, end: &str) -> Option<Block> {
    row(
        run(title, TextStyle::Strong).into_iter().collect(),
        run(&joined(&[start, end], " – "), TextStyle::Muted)
            .into_iter()
            .collect(),
    )
}

/// Badges for the non-empty tags, or nothing when none are left.
pub fn badges(tags: &[String], outline: bool) -> Option<Block> {
    let tags: Vec<String> = tags.iter().filter(|t| !t.is_empty()).cloned().collect();
    (!tags.is_empty()).then_some(Block::Badges { tags, outline })
}

/// Joins the non-empty parts with `sep`: "Role — Company", "2023 – Present".
pub fn joined(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .copied()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
