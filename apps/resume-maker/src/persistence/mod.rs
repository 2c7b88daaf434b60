// Persistence: local durable mirror of the working Document, the remote
// publish API, and the save-status machine that tracks the published copy.

pub mod local;
pub mod remote;

use serde::Serialize;
use thiserror::Error;

pub use local::{load_local, save_local, FileStore, KeyValueStore, STORAGE_KEY};
#[cfg(test)]
pub use local::MemoryStore;
pub use remote::{RemoteClient, RemoteError, RemoteStore, SaveReceipt};

/// Reference to the remote copy of the Document. `id` is absent when the
/// Document was opened by public slug rather than saved from here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedRef {
    pub id: Option<String>,
    pub slug: String,
}

impl From<SaveReceipt> for SavedRef {
    fn from(receipt: SaveReceipt) -> Self {
        Self {
            id: Some(receipt.id),
            slug: receipt.slug,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a save is already in progress")]
pub struct SaveInProgress;

/// Unsaved → Saving → Saved{id, slug}. A failed save returns to whatever was
/// held before it began.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SaveStatus {
    #[default]
    Unsaved,
    Saving {
        previous: Option<SavedRef>,
    },
    Saved(SavedRef),
}

impl SaveStatus {
    /// The published copy, if any. While saving, the copy held before the save.
    pub fn saved(&self) -> Option<&SavedRef> {
        match self {
            SaveStatus::Unsaved => None,
            SaveStatus::Saving { previous } => previous.as_ref(),
            SaveStatus::Saved(saved) => Some(saved),
        }
    }

    #[cfg(test)]
    pub fn is_saving(&self) -> bool {
        matches!(self, SaveStatus::Saving { .. })
    }

    /// Enters `Saving` and returns the id the save must send, if any.
    pub fn begin(&mut self) -> Result<Option<String>, SaveInProgress> {
        let previous = match std::mem::take(self) {
            SaveStatus::Saving { previous } => {
                *self = SaveStatus::Saving { previous };
                return Err(SaveInProgress);
            }
            SaveStatus::Unsaved => None,
            SaveStatus::Saved(saved) => Some(saved),
        };
        let id = previous.as_ref().and_then(|s| s.id.clone());
        *self = SaveStatus::Saving { previous };
        Ok(id)
    }

    pub fn succeed(&mut self, receipt: SaveReceipt) {
        *self = SaveStatus::Saved(receipt.into());
    }

    pub fn fail(&mut self) {
        *self = match std::mem::take(self) {
            SaveStatus::Saving {
                previous: Some(saved),
            } => SaveStatus::Saved(saved),
            SaveStatus::Saving { previous: None } => SaveStatus::Unsaved,
            other => other,
        };
    }

    /// A Document opened by public slug: its slug is known, its id is not.
    pub fn opened_by_slug(&mut self, slug: &str) {
        *self = SaveStatus::Saved(SavedRef {
            id: None,
            slug: slug.to_string(),
        });
    }
}
