//! Typed selectors into a [`Document`].
//!
//! Form fields address the Document with dotted paths such as
//! `experience.0.bullets.1`. At the edge those strings are parsed once into a
//! closed set of selectors; everything past the parser works on the enums, so
//! an invalid address can only ever be a parse error or an out-of-range index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::editor::PathError;
use crate::models::{Document, Education, Experience, Profile, Project};

// ────────────────────────────────────────────────────────────────────────────
// Text leaves of each record
// ────────────────────────────────────────────────────────────────────────────

/// Declares a field selector over the `String` leaves of a record.
macro_rules! text_fields {
    ($name:ident over $record:ty { $($variant:ident => $field:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn parse(segment: &str) -> Option<Self> {
                match segment {
                    $(stringify!($field) => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($field)),+
                }
            }

            pub fn get<'a>(&self, record: &'a $record) -> &'a str {
                match self {
                    $(Self::$variant => &record.$field),+
                }
            }

            pub fn get_mut<'a>(&self, record: &'a mut $record) -> &'a mut String {
                match self {
                    $(Self::$variant => &mut record.$field),+
                }
            }
        }
    };
}

text_fields!(ProfileField over Profile {
    Name => name,
    Title => title,
    Email => email,
    Phone => phone,
    Location => location,
    Website => website,
    Summary => summary,
});

text_fields!(ExperienceField over Experience {
    Role => role,
    Company => company,
    Location => location,
    Start => start,
    End => end,
});

text_fields!(EducationField over Education {
    School => school,
    Degree => degree,
    Start => start,
    End => end,
    Details => details,
});

text_fields!(ProjectField over Project {
    Name => name,
    Link => link,
    Description => description,
});

// ────────────────────────────────────────────────────────────────────────────
// Values
// ────────────────────────────────────────────────────────────────────────────

/// A value written through [`FieldPath`]. Untagged on the wire: `true`,
/// `"text"`, or `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// An element appended through [`ListPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Text(String),
    Experience(Experience),
    Education(Education),
    Project(Project),
}

// ────────────────────────────────────────────────────────────────────────────
// Field selectors
// ────────────────────────────────────────────────────────────────────────────

/// Every assignable location in a Document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Theme,
    Dark,
    Profile(ProfileField),
    /// The whole skill list.
    Skills,
    Skill(usize),
    Experience(usize, ExperienceField),
    /// The whole bullet list of one experience entry.
    Bullets(usize),
    Bullet(usize, usize),
    Education(usize, EducationField),
    Project(usize, ProjectField),
    /// The whole tech list of one project.
    Tech(usize),
    TechTag(usize, usize),
}

impl FieldPath {
    /// Short description of the value this selector accepts, used in errors.
    pub fn expects(&self) -> &'static str {
        match self {
            FieldPath::Theme => "`classic` or `modern`",
            FieldPath::Dark => "a boolean",
            FieldPath::Skills | FieldPath::Bullets(_) | FieldPath::Tech(_) => "a list of strings",
            _ => "a string",
        }
    }

    /// Reads the value at this location.
    #[cfg(test)]
    pub fn read(&self, doc: &Document) -> Result<FieldValue, PathError> {
        let value = match *self {
            FieldPath::Theme => FieldValue::Text(doc.meta.theme.as_str().to_string()),
            FieldPath::Dark => FieldValue::Flag(doc.meta.dark),
            FieldPath::Profile(f) => f.get(&doc.profile).into(),
            FieldPath::Skills => FieldValue::List(doc.skills.clone()),
            FieldPath::Skill(i) => item(&doc.skills, i, self)?.as_str().into(),
            FieldPath::Experience(i, f) => f.get(item(&doc.experience, i, self)?).into(),
            FieldPath::Bullets(i) => FieldValue::List(item(&doc.experience, i, self)?.bullets.clone()),
            FieldPath::Bullet(i, j) => {
                let bullets = &item(&doc.experience, i, self)?.bullets;
                item(bullets, j, self)?.as_str().into()
            }
            FieldPath::Education(i, f) => f.get(item(&doc.education, i, self)?).into(),
            FieldPath::Project(i, f) => f.get(item(&doc.projects, i, self)?).into(),
            FieldPath::Tech(i) => FieldValue::List(item(&doc.projects, i, self)?.tech().to_vec()),
            FieldPath::TechTag(i, j) => {
                let tech = item(&doc.projects, i, self)?.tech();
                item(tech, j, self)?.as_str().into()
            }
        };
        Ok(value)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Theme => write!(f, "meta.theme"),
            FieldPath::Dark => write!(f, "meta.dark"),
            FieldPath::Profile(field) => write!(f, "profile.{}", field.as_str()),
            FieldPath::Skills => write!(f, "skills"),
            FieldPath::Skill(i) => write!(f, "skills.{i}"),
            FieldPath::Experience(i, field) => write!(f, "experience.{i}.{}", field.as_str()),
            FieldPath::Bullets(i) => write!(f, "experience.{i}.bullets"),
            FieldPath::Bullet(i, j) => write!(f, "experience.{i}.bullets.{j}"),
            FieldPath::Education(i, field) => write!(f, "education.{i}.{}", field.as_str()),
            FieldPath::Project(i, field) => write!(f, "projects.{i}.{}", field.as_str()),
            FieldPath::Tech(i) => write!(f, "projects.{i}.tech"),
            FieldPath::TechTag(i, j) => write!(f, "projects.{i}.tech.{j}"),
        }
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let unknown = || PathError::Unknown(path.to_string());
        let segments: Vec<&str> = path.split('.').collect();

        let parsed = match segments.as_slice() {
            ["meta", "theme"] => FieldPath::Theme,
            ["meta", "dark"] => FieldPath::Dark,
            ["profile", field] => FieldPath::Profile(ProfileField::parse(field).ok_or_else(unknown)?),
            ["skills"] => FieldPath::Skills,
            ["skills", i] => FieldPath::Skill(index(path, i)?),
            ["experience", i, "bullets"] => FieldPath::Bullets(index(path, i)?),
            ["experience", i, "bullets", j] => FieldPath::Bullet(index(path, i)?, index(path, j)?),
            ["experience", i, field] => FieldPath::Experience(
                index(path, i)?,
                ExperienceField::parse(field).ok_or_else(unknown)?,
            ),
            ["education", i, field] => FieldPath::Education(
                index(path, i)?,
                EducationField::parse(field).ok_or_else(unknown)?,
            ),
            ["projects", i, "tech"] => FieldPath::Tech(index(path, i)?),
            ["projects", i, "tech", j] => FieldPath::TechTag(index(path, i)?, index(path, j)?),
            ["projects", i, field] => FieldPath::Project(
                index(path, i)?,
                ProjectField::parse(field).ok_or_else(unknown)?,
            ),
            _ => return Err(unknown()),
        };
        Ok(parsed)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// List selectors
// ────────────────────────────────────────────────────────────────────────────

/// Every sequence in a Document that supports append and remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListPath {
    Skills,
    Experience,
    Education,
    Projects,
    Bullets(usize),
    Tech(usize),
}

impl ListPath {
    /// Short description of the element this list holds, used in errors.
    pub fn expects(&self) -> &'static str {
        match self {
            ListPath::Skills | ListPath::Bullets(_) | ListPath::Tech(_) => "a string",
            ListPath::Experience => "an experience entry",
            ListPath::Education => "an education entry",
            ListPath::Projects => "a project entry",
        }
    }

    /// The element the form's "Add" button appends to this list.
    pub fn blank_item(&self) -> ListItem {
        match self {
            ListPath::Skills | ListPath::Bullets(_) | ListPath::Tech(_) => {
                ListItem::Text(String::new())
            }
            ListPath::Experience => ListItem::Experience(Experience::blank()),
            ListPath::Education => ListItem::Education(Education::blank()),
            ListPath::Projects => ListItem::Project(Project::blank()),
        }
    }

    /// Decodes a JSON element of the shape this list holds.
    pub fn item_from_json(&self, value: serde_json::Value) -> Result<ListItem, PathError> {
        let mismatch = |_| PathError::TypeMismatch {
            path: self.to_string(),
            expected: self.expects(),
        };
        let item = match self {
            ListPath::Skills | ListPath::Bullets(_) | ListPath::Tech(_) => {
                ListItem::Text(serde_json::from_value(value).map_err(mismatch)?)
            }
            ListPath::Experience => {
                ListItem::Experience(serde_json::from_value(value).map_err(mismatch)?)
            }
            ListPath::Education => {
                ListItem::Education(serde_json::from_value(value).map_err(mismatch)?)
            }
            ListPath::Projects => {
                ListItem::Project(serde_json::from_value(value).map_err(mismatch)?)
            }
        };
        Ok(item)
    }

    /// Number of elements currently in this list.
    #[cfg(test)]
    pub fn len(&self, doc: &Document) -> Result<usize, PathError> {
        let len = match *self {
            ListPath::Skills => doc.skills.len(),
            ListPath::Experience => doc.experience.len(),
            ListPath::Education => doc.education.len(),
            ListPath::Projects => doc.projects.len(),
            ListPath::Bullets(i) => item(&doc.experience, i, self)?.bullets.len(),
            ListPath::Tech(i) => item(&doc.projects, i, self)?.tech().len(),
        };
        Ok(len)
    }
}

impl fmt::Display for ListPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListPath::Skills => write!(f, "skills"),
            ListPath::Experience => write!(f, "experience"),
            ListPath::Education => write!(f, "education"),
            ListPath::Projects => write!(f, "projects"),
            ListPath::Bullets(i) => write!(f, "experience.{i}.bullets"),
            ListPath::Tech(i) => write!(f, "projects.{i}.tech"),
        }
    }
}

impl FromStr for ListPath {
    type Err = PathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = path.split('.').collect();
        let parsed = match segments.as_slice() {
            ["skills"] => ListPath::Skills,
            ["experience"] => ListPath::Experience,
            ["education"] => ListPath::Education,
            ["projects"] => ListPath::Projects,
            ["experience", i, "bullets"] => ListPath::Bullets(index(path, i)?),
            ["projects", i, "tech"] => ListPath::Tech(index(path, i)?),
            _ => return Err(PathError::Unknown(path.to_string())),
        };
        Ok(parsed)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn index(path: &str, segment: &str) -> Result<usize, PathError> {
    segment.parse().map_err(|_| PathError::BadIndex {
        path: path.to_string(),
        segment: segment.to_string(),
    })
}

/// Bounds-checked element access reporting the full selector on failure.
#[cfg(test)]
fn item<'a, T>(
    items: &'a [T],
    index: usize,
    path: &dyn fmt::Display,
) -> Result<&'a T, PathError> {
    items.get(index).ok_or_else(|| PathError::OutOfRange {
        path: path.to_string(),
        index,
        len: items.len(),
    })
}

pub(crate) fn item_mut<'a, T>(
    items: &'a mut [T],
    index: usize,
    path: &dyn fmt::Display,
) -> Result<&'a mut T, PathError> {
    let len = items.len();
    items.get_mut(index).ok_or_else(|| PathError::OutOfRange {
        path: path.to_string(),
        index,
        len,
    })
}
