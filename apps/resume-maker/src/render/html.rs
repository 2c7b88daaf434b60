//! HTML serialization of a layout for the live preview page.
//!
//! The dark flag styles the page chrome around the resume; the resume surface
//! itself is always printed ink on white.

use crate::render::layout::{Align, Block, Frame, Inline, Layout, TextStyle};
use crate::render::{SURFACE_MIN_HEIGHT_PX, SURFACE_WIDTH_PX};

const STYLESHEET: &str = "\
body{margin:0;padding:24px;background:#e2e8f0;color:#0f172a;font-family:Helvetica,Arial,sans-serif}\
body.dark{background:#0f172a;color:#e2e8f0}\
.surface{box-sizing:border-box;margin:0 auto;padding:32px;background:#fff;color:#0f172a}\
.stack,.section,.card{display:flex;flex-direction:column}\
.columns,.split,.row{display:flex;justify-content:space-between}\
.section h2{margin:0;font-size:16px}\
.section.ruled h2{border-bottom:1px solid #cbd5e1}\
.card{padding:12px;gap:4px;border-radius:6px}\
.card.filled{background:#f1f5f9}\
.card.bordered{border:1px solid #e2e8f0}\
.badges{display:flex;flex-wrap:wrap;gap:8px}\
.badge{padding:2px 8px;font-size:12px;border-radius:4px}\
.badge.outline{border:1px solid #cbd5e1}\
.badge.solid{background:#1e293b;color:#fff}\
ul{margin:0;padding-left:20px}\
p{margin:0}\
.name{font-size:24px;font-weight:700}\
.subtitle{font-size:14px;color:#475569}\
.body{font-size:14px}\
.strong{font-size:14px;font-weight:700}\
.small{font-size:12px}\
.muted{font-size:12px;color:#64748b}\
.link{font-size:12px;color:#2563eb}";

/// Page chrome around the resume surface.
#[derive(Debug, Clone, Default)]
pub struct PageChrome {
    pub title: String,
    pub dark: bool,
}

/// Serializes `layout` as a complete HTML page.
pub fn render_page(layout: &Layout, chrome: &PageChrome) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>");
    out.push_str(&escape(&chrome.title));
    out.push_str("</title><style>");
    out.push_str(STYLESHEET);
    out.push_str("</style></head>");
    out.push_str(if chrome.dark {
        "<body class=\"dark\">"
    } else {
        "<body>"
    });
    out.push_str(&format!(
        "<div class=\"surface theme-{}\" style=\"width:{}px;min-height:{}px\">",
        layout.theme, SURFACE_WIDTH_PX, SURFACE_MIN_HEIGHT_PX
    ));
    write_block(&mut out, &layout.root);
    out.push_str("</div></body></html>");
    out
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Stack { gap, children } => {
            out.push_str(&format!("<div class=\"stack\" style=\"gap:{gap}px\">"));
            children.iter().for_each(|c| write_block(out, c));
            out.push_str("</div>");
        }
        Block::Columns { gap, columns } => {
            out.push_str(&format!("<div class=\"columns\" style=\"gap:{gap}px\">"));
            for column in columns {
                out.push_str(&format!(
                    "<div class=\"stack\" style=\"flex:{};gap:16px\">",
                    column.weight
                ));
                column.children.iter().for_each(|c| write_block(out, c));
                out.push_str("</div>");
            }
            out.push_str("</div>");
        }
        Block::Split {
            left,
            right,
            rule_below,
        } => {
            let rule = if *rule_below {
                " style=\"border-bottom:2px solid #cbd5e1;padding-bottom:8px\""
            } else {
                ""
            };
            out.push_str(&format!("<header class=\"split\"{rule}><div class=\"stack\">"));
            left.iter().for_each(|c| write_block(out, c));
            out.push_str("</div><div class=\"stack\">");
            right.iter().for_each(|c| write_block(out, c));
            out.push_str("</div></header>");
        }
        Block::Section {
            title,
            ruled,
            children,
        } => {
            let class = if *ruled { "section ruled" } else { "section" };
            out.push_str(&format!(
                "<section class=\"{class}\" style=\"gap:8px\"><h2>{}</h2>",
                escape(title)
            ));
            children.iter().for_each(|c| write_block(out, c));
            out.push_str("</section>");
        }
        Block::Text { text, style, align } => {
            out.push_str(&format!(
                "<p class=\"{}\" style=\"text-align:{}\">{}</p>",
                style_class(*style),
                align_css(*align),
                escape(text)
            ));
        }
        Block::Row { left, right } => {
            out.push_str("<div class=\"row\"><span>");
            write_inlines(out, left);
            out.push_str("</span><span>");
            write_inlines(out, right);
            out.push_str("</span></div>");
        }
        Block::Badges { tags, outline } => {
            let kind = if *outline { "outline" } else { "solid" };
            out.push_str("<div class=\"badges\">");
            for tag in tags {
                out.push_str(&format!(
                    "<span class=\"badge {kind}\">{}</span>",
                    escape(tag)
                ));
            }
            out.push_str("</div>");
        }
        Block::BulletList { items } => {
            out.push_str("<ul class=\"body\">");
            for item in items {
                out.push_str(&format!("<li>{}</li>", escape(item)));
            }
            out.push_str("</ul>");
        }
        Block::Card { frame, children } => {
            let kind = match frame {
                Frame::Filled => "filled",
                Frame::Bordered => "bordered",
            };
            out.push_str(&format!("<div class=\"card {kind}\">"));
            children.iter().for_each(|c| write_block(out, c));
            out.push_str("</div>");
        }
    }
}

fn write_inlines(out: &mut String, runs: &[Inline]) {
    for (i, run) in runs.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        match run {
            Inline::Text { text, style } => out.push_str(&format!(
                "<span class=\"{}\">{}</span>",
                style_class(*style),
                escape(text)
            )),
            Inline::Link { text, href } if is_safe_href(href) => out.push_str(&format!(
                "<a class=\"link\" href=\"{}\">{}</a>",
                escape(href),
                escape(text)
            )),
            Inline::Link { text, .. } => {
                out.push_str(&format!("<span class=\"link\">{}</span>", escape(text)))
            }
        }
    }
}

/// Only web and mail links become anchors; anything else is shown as text.
fn is_safe_href(href: &str) -> bool {
    let href = href.trim_start().to_ascii_lowercase();
    ["http://", "https://", "mailto:"]
        .iter()
        .any(|scheme| href.starts_with(scheme))
}

fn style_class(style: TextStyle) -> &'static str {
    match style {
        TextStyle::Name => "name",
        TextStyle::Subtitle => "subtitle",
        TextStyle::Heading => "heading",
        TextStyle::Body => "body",
        TextStyle::Strong => "strong",
        TextStyle::Small => "small",
        TextStyle::Muted => "muted",
        TextStyle::Link => "link",
    }
}

fn align_css(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Center => "center",
        Align::Right => "right",
    }
}

/// Escapes text for element content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
