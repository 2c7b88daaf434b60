//! Copy-on-write edits addressed by [`FieldPath`] / [`ListPath`].
//!
//! Every operation clones the input Document, edits the clone and hands it
//! back. The input is never touched, so an `Err` leaves the caller holding the
//! same Document it passed in, and an `Ok` result never aliases it.

use tracing::debug;

use crate::editor::lens::{item_mut, FieldPath, FieldValue, ListItem, ListPath};
use crate::editor::PathError;
use crate::models::{Document, Theme};

/// Returns a copy of `doc` with the location at `path` replaced by `value`.
pub fn update(doc: &Document, path: &FieldPath, value: FieldValue) -> Result<Document, PathError> {
    let mut next = doc.clone();
    assign(&mut next, path, value)?;
    debug!(%path, "field updated");
    Ok(next)
}

/// Returns a copy of `doc` with `factory()` appended to the list at `path`.
///
/// Appending to the tech list of a project that has none creates the list.
pub fn add_array_item<F>(doc: &Document, path: &ListPath, factory: F) -> Result<Document, PathError>
where
    F: FnOnce() -> ListItem,
{
    let mut next = doc.clone();
    let mismatch = || PathError::TypeMismatch {
        path: path.to_string(),
        expected: path.expects(),
    };

    match (*path, factory()) {
        (ListPath::Skills, ListItem::Text(text)) => next.skills.push(text),
        (ListPath::Experience, ListItem::Experience(entry)) => next.experience.push(entry),
        (ListPath::Education, ListItem::Education(entry)) => next.education.push(entry),
        (ListPath::Projects, ListItem::Project(entry)) => next.projects.push(entry),
        (ListPath::Bullets(i), ListItem::Text(text)) => {
            item_mut(&mut next.experience, i, path)?.bullets.push(text)
        }
        (ListPath::Tech(i), ListItem::Text(text)) => item_mut(&mut next.projects, i, path)?
            .tech
            .get_or_insert_with(Vec::new)
            .push(text),
        _ => return Err(mismatch()),
    }

    debug!(%path, "list item added");
    Ok(next)
}

/// Returns a copy of `doc` without element `index` of the list at `path`.
pub fn remove_array_item(
    doc: &Document,
    path: &ListPath,
    index: usize,
) -> Result<Document, PathError> {
    let mut next = doc.clone();

    match *path {
        ListPath::Skills => remove_at(&mut next.skills, index, path)?,
        ListPath::Experience => remove_at(&mut next.experience, index, path)?,
        ListPath::Education => remove_at(&mut next.education, index, path)?,
        ListPath::Projects => remove_at(&mut next.projects, index, path)?,
        ListPath::Bullets(i) => {
            remove_at(&mut item_mut(&mut next.experience, i, path)?.bullets, index, path)?
        }
        ListPath::Tech(i) => match item_mut(&mut next.projects, i, path)?.tech.as_mut() {
            Some(tech) => remove_at(tech, index, path)?,
            None => {
                return Err(PathError::OutOfRange {
                    path: path.to_string(),
                    index,
                    len: 0,
                })
            }
        },
    }

    debug!(%path, index, "list item removed");
    Ok(next)
}

fn assign(doc: &mut Document, path: &FieldPath, value: FieldValue) -> Result<(), PathError> {
    let mismatch = || PathError::TypeMismatch {
        path: path.to_string(),
        expected: path.expects(),
    };

    match (*path, value) {
        (FieldPath::Theme, FieldValue::Text(name)) => {
            doc.meta.theme = Theme::parse(&name).ok_or_else(mismatch)?;
        }
        (FieldPath::Dark, FieldValue::Flag(flag)) => doc.meta.dark = flag,
        (FieldPath::Profile(field), FieldValue::Text(text)) => {
            *field.get_mut(&mut doc.profile) = text;
        }
        (FieldPath::Skills, FieldValue::List(list)) => doc.skills = list,
        (FieldPath::Skill(i), FieldValue::Text(text)) => {
            *item_mut(&mut doc.skills, i, path)? = text;
        }
        (FieldPath::Experience(i, field), FieldValue::Text(text)) => {
            *field.get_mut(item_mut(&mut doc.experience, i, path)?) = text;
        }
        (FieldPath::Bullets(i), FieldValue::List(list)) => {
            item_mut(&mut doc.experience, i, path)?.bullets = list;
        }
        (FieldPath::Bullet(i, j), FieldValue::Text(text)) => {
            let bullets = &mut item_mut(&mut doc.experience, i, path)?.bullets;
            *item_mut(bullets, j, path)? = text;
        }
        (FieldPath::Education(i, field), FieldValue::Text(text)) => {
            *field.get_mut(item_mut(&mut doc.education, i, path)?) = text;
        }
        (FieldPath::Project(i, field), FieldValue::Text(text)) => {
            *field.get_mut(item_mut(&mut doc.projects, i, path)?) = text;
        }
        (FieldPath::Tech(i), FieldValue::List(list)) => {
            item_mut(&mut doc.projects, i, path)?.tech = Some(list);
        }
        (FieldPath::TechTag(i, j), FieldValue::Text(text)) => {
            let tech = item_mut(&mut doc.projects, i, path)?
                .tech
                .get_or_insert_with(Vec::new);
            *item_mut(tech, j, path)? = text;
        }
        _ => return Err(mismatch()),
    }
    Ok(())
}

fn remove_at<T>(items: &mut Vec<T>, index: usize, path: &ListPath) -> Result<(), PathError> {
    if index >= items.len() {
        return Err(PathError::OutOfRange {
            path: path.to_string(),
            index,
            len: items.len(),
        });
    }
    items.remove(index);
    Ok(())
}
