//! Modern template: split header, narrow aside (Summary, Skills) beside a wide
//! main column (Experience, Projects, Education). Experience entries sit in
//! filled cards, projects in bordered ones.

use crate::models::{Document, Experience, Project, Theme};
use crate::render::classic::education;
use crate::render::layout::{
    badges, dated_row, joined, link, row, run, text, Align, Block, Column, Frame, Layout,
    TextStyle,
};

const ASIDE_WEIGHT: u8 = 1;
const MAIN_WEIGHT: u8 = 2;

pub fn render(doc: &Document) -> Layout {
    let profile = &doc.profile;

    let identity = [
        text(&profile.name, TextStyle::Name, Align::Left),
        text(&profile.title, TextStyle::Subtitle, Align::Left),
    ];
    let contact = [
        &profile.email,
        &profile.phone,
        &profile.location,
        &profile.website,
    ]
    .map(|line| text(line, TextStyle::Small, Align::Right));

    let header = Block::Split {
        left: identity.into_iter().flatten().collect(),
        right: contact.into_iter().flatten().collect(),
        rule_below: true,
    };

    let aside = Column {
        weight: ASIDE_WEIGHT,
        children: vec![
            section(
                "Summary",
                text(&profile.summary, TextStyle::Body, Align::Left)
                    .into_iter()
                    .collect(),
            ),
            section("Skills", badges(&doc.skills, false).into_iter().collect()),
        ],
    };

    let main = Column {
        weight: MAIN_WEIGHT,
        children: vec![
            section("Experience", doc.experience.iter().map(experience).collect()),
            section("Projects", doc.projects.iter().map(project).collect()),
            section("Education", doc.education.iter().map(education).collect()),
        ],
    };

    Layout {
        theme: Theme::Modern,
        root: Block::Stack {
            gap: 16.0,
            children: vec![
                header,
                Block::Columns {
                    gap: 24.0,
                    columns: vec![aside, main],
                },
            ],
        },
    }
}

fn section(title: &str, children: Vec<Block>) -> Block {
    Block::Section {
        title: title.to_string(),
        ruled: false,
        children,
    }
}

fn experience(entry: &Experience) -> Block {
    let bullets: Vec<String> = entry.visible_bullets().map(String::from).collect();
    Block::Card {
        frame: Frame::Filled,
        children: [
            dated_row(
                &joined(&[entry.role.as_str(), entry.company.as_str()], " — "),
                &entry.start,
                &entry.end,
            ),
            text(&entry.location, TextStyle::Muted, Align::Left),
            (!bullets.is_empty()).then_some(Block::BulletList { items: bullets }),
        ]
        .into_iter()
        .flatten()
        .collect(),
    }
}

fn project(entry: &Project) -> Block {
    Block::Card {
        frame: Frame::Bordered,
        children: [
            row(
                run(&entry.name, TextStyle::Strong).into_iter().collect(),
                link(&entry.link).into_iter().collect(),
            ),
            text(&entry.description, TextStyle::Body, Align::Left),
            badges(entry.tech(), true),
        ]
        .into_iter()
        .flatten()
        .collect(),
    }
}
