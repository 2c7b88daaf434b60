//! Classic template: one centred column, ruled section headings.

use crate::models::{Document, Education, Experience, Project, Theme};
use crate::render::layout::{
    badges, dated_row, joined, link, row, run, text, Align, Block, Layout, TextStyle,
};

pub fn render(doc: &Document) -> Layout {
    let profile = &doc.profile;

    let header = Block::Stack {
        gap: 2.0,
        children: [
            text(&profile.name, TextStyle::Name, Align::Center),
            text(&profile.title, TextStyle::Subtitle, Align::Center),
            text(
                &joined(
                    &[
                        profile.email.as_str(),
                        profile.phone.as_str(),
                        profile.location.as_str(),
                    ],
                    " • ",
                ),
                TextStyle::Small,
                Align::Center,
            ),
            text(&profile.website, TextStyle::Small, Align::Center),
        ]
        .into_iter()
        .flatten()
        .collect(),
    };

    let sections = vec![
        header,
        section(
            "Summary",
            text(&profile.summary, TextStyle::Body, Align::Left).into_iter().collect(),
        ),
        section("Skills", badges(&doc.skills, true).into_iter().collect()),
        section("Experience", doc.experience.iter().map(experience).collect()),
        section("Projects", doc.projects.iter().map(project).collect()),
        section("Education", doc.education.iter().map(education).collect()),
    ];

    Layout {
        theme: Theme::Classic,
        root: Block::Stack {
            gap: 12.0,
            children: sections,
        },
    }
}

fn section(title: &str, children: Vec<Block>) -> Block {
    Block::Section {
        title: title.to_string(),
        ruled: true,
        children,
    }
}

fn experience(entry: &Experience) -> Block {
    let bullets: Vec<String> = entry.visible_bullets().map(String::from).collect();
    Block::Stack {
        gap: 2.0,
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
    // Name and link share the title line; the link trails the name.
    let title = [run(&entry.name, TextStyle::Strong), link(&entry.link)]
        .into_iter()
        .flatten()
        .collect();

    Block::Stack {
        gap: 2.0,
        children: [
            row(title, Vec::new()),
            text(&entry.description, TextStyle::Body, Align::Left),
            badges(entry.tech(), true),
        ]
        .into_iter()
        .flatten()
        .collect(),
    }
}

pub(crate) fn education(entry: &Education) -> Block {
    Block::Stack {
        gap: 2.0,
        children: [
            dated_row(
                &joined(&[entry.degree.as_str(), entry.school.as_str()], " — "),
                &entry.start,
                &entry.end,
            ),
            text(&entry.details, TextStyle::Body, Align::Left),
        ]
        .into_iter()
        .flatten()
        .collect(),
    }
}
