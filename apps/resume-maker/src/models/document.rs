//! The resume Document: the single record every other component reads or rewrites.
//!
//! Field names match the JSON blobs written by earlier versions of the builder,
//! so stored and published resumes deserialize without migration. Sections that
//! are missing from a blob load as empty.

use std::fmt;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Presentation metadata
// ────────────────────────────────────────────────────────────────────────────

/// Layout variant used by the renderer.
///
/// Any wire value other than `"modern"` reads as `Classic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    #[default]
    Classic,
    Modern,
}

impl Theme {
    /// Strict parse for user input; unlike deserialization, unknown names are rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "classic" => Some(Theme::Classic),
            "modern" => Some(Theme::Modern),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Modern => "modern",
        }
    }
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        Theme::from(value.as_str())
    }
}

impl From<&str> for Theme {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("modern") {
            Theme::Modern
        } else {
            Theme::Classic
        }
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.as_str().to_string()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub theme: Theme,
    /// Editor chrome only; never changes the rendered resume.
    pub dark: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Content records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub summary: String,
}

/// One role. Dates are free text ("2023", "Present", "Jan 2021").
///
/// Empty bullets are valid here; the renderer suppresses them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub location: String,
    pub start: String,
    pub end: String,
    pub bullets: Vec<String>,
}

impl Experience {
    /// Blank entry appended by the form's "Add" button: one empty bullet ready to type into.
    pub fn blank() -> Self {
        Self {
            bullets: vec![String::new()],
            ..Self::default()
        }
    }

    /// Bullets that carry text, in stored order.
    pub fn visible_bullets(&self) -> impl Iterator<Item = &str> {
        self.bullets
            .iter()
            .map(String::as_str)
            .filter(|b| !b.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub start: String,
    pub end: String,
    pub details: String,
}

impl Education {
    pub fn blank() -> Self {
        Self::default()
    }
}

/// A portfolio project.
///
/// `tech` is absent in blobs written before tech tags existed. Absence is kept
/// as `None` so a loaded blob re-serializes unchanged; readers go through
/// [`Project::tech`], which yields an empty slice. Equality follows the readers:
/// an absent list equals an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub link: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech: Option<Vec<String>>,
}

impl Project {
    pub fn blank() -> Self {
        Self {
            tech: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn tech(&self) -> &[String] {
        self.tech.as_deref().unwrap_or(&[])
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.link == other.link
            && self.description == other.description
            && self.tech() == other.tech()
    }
}

impl Eq for Project {}

// ────────────────────────────────────────────────────────────────────────────
// Root aggregate
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Document {
    /// Title sent with a published copy, e.g. "Jane Doe - Resume".
    pub fn publish_title(&self) -> String {
        format!("{} - Resume", self.profile.name)
    }
}

/// The sample resume a new session starts from.
pub fn default_document() -> Document {
    Document {
        meta: Meta::default(),
        profile: Profile {
            name: "Your Name".to_string(),
            title: "Full-Stack Developer".to_string(),
            email: "you@example.com".to_string(),
            phone: "+91-XXXXXXXXXX".to_string(),
            location: "City, Country".to_string(),
            website: "https://your-portfolio.dev".to_string(),
            summary: "Passionate developer with experience building end-to-end web apps \
                      using React, Node.js, and cloud services."
                .to_string(),
        },
        skills: ["JavaScript", "React", "Node.js", "Express", "MongoDB", "TailwindCSS"]
            .into_iter()
            .map(String::from)
            .collect(),
        experience: vec![Experience {
            role: "Software Engineer".to_string(),
            company: "Awesome Co".to_string(),
            location: "Remote".to_string(),
            start: "2023".to_string(),
            end: "Present".to_string(),
            bullets: vec![
                "Built and scaled a MERN app serving 50k+ users.".to_string(),
                "Implemented CI/CD and improved deployment speed by 40%.".to_string(),
            ],
        }],
        education: vec![Education {
            school: "Your College".to_string(),
            degree: "B.Tech in Computer Science".to_string(),
            start: "2019".to_string(),
            end: "2023".to_string(),
            details: "GPA: 8.5/10 | Relevant Coursework: DSA, DBMS, OS".to_string(),
        }],
        projects: vec![Project {
            name: "URL Shortener".to_string(),
            link: "https://short.ly/yourlink".to_string(),
            description: "Custom URL shortener with analytics and QR codes.".to_string(),
            tech: Some(
                ["Next.js", "PostgreSQL", "Prisma", "Razorpay"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_theme_reads_as_classic() {
        let meta: Meta = serde_json::from_str(r#"{"theme":"retro","dark":true}"#).unwrap();
        assert_eq!(meta.theme, Theme::Classic);
        assert!(meta.dark);

        let meta: Meta = serde_json::from_str(r#"{"theme":"modern"}"#).unwrap();
        assert_eq!(meta.theme, Theme::Modern);
    }

    #[test]
    fn test_legacy_project_without_tech_loads_as_none() {
        let project: Project =
            serde_json::from_str(r#"{"name":"Old","link":"","description":"x"}"#).unwrap();
        assert_eq!(project.tech, None);
        assert!(project.tech().is_empty());

        // Absence survives a save.
        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("tech").is_none());
    }

    #[test]
    fn test_absent_tech_equals_empty_tech() {
        let legacy = Project {
            tech: None,
            ..Project::blank()
        };
        assert_eq!(legacy, Project::blank());
        assert_ne!(
            legacy,
            Project {
                tech: Some(vec!["Rust".into()]),
                ..Project::blank()
            }
        );
    }

    #[test]
    fn test_theme_parse_is_strict() {
        assert_eq!(Theme::parse("modern"), Some(Theme::Modern));
        assert_eq!(Theme::parse(" classic "), Some(Theme::Classic));
        assert_eq!(Theme::parse("retro"), None);
    }

    #[test]
    fn test_partial_blob_fills_missing_sections() {
        let doc: Document =
            serde_json::from_str(r#"{"profile":{"name":"Ada"},"skills":["Rust"]}"#).unwrap();
        assert_eq!(doc.profile.name, "Ada");
        assert_eq!(doc.profile.title, "");
        assert_eq!(doc.skills, vec!["Rust"]);
        assert!(doc.experience.is_empty());
        assert_eq!(doc.meta.theme, Theme::Classic);
    }

    #[test]
    fn test_default_document_wire_shape() {
        let json = serde_json::to_value(default_document()).unwrap();
        assert_eq!(json["meta"]["theme"], "classic");
        assert_eq!(json["meta"]["dark"], false);
        assert_eq!(json["experience"][0]["end"], "Present");
        assert_eq!(json["projects"][0]["tech"][1], "PostgreSQL");
    }

    #[test]
    fn test_visible_bullets_skip_empty() {
        let exp = Experience {
            bullets: vec!["a".into(), String::new(), "b".into()],
            ..Experience::blank()
        };
        assert_eq!(exp.visible_bullets().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(exp.bullets.len(), 3);
    }

    #[test]
    fn test_blank_factories() {
        assert_eq!(Experience::blank().bullets, vec![String::new()]);
        assert_eq!(Project::blank().tech, Some(vec![]));
        assert_eq!(Education::blank(), Education::default());
    }

    #[test]
    fn test_publish_title() {
        assert_eq!(default_document().publish_title(), "Your Name - Resume");
    }
}
