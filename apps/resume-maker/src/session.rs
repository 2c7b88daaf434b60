//! The editing session: the working Document plus the editor state around it.
//!
//! Every mutation swaps in the mutator's new Document and mirrors it to the
//! local store in the same call. Remote saves are split into `begin_save` and
//! `finish_save` so the network call can run without holding the session.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::editor::{
    add_array_item, remove_array_item, update, FieldPath, FieldValue, ListItem, ListPath,
    PathError,
};
use crate::models::{default_document, Document};
use crate::persistence::{
    load_local, save_local, KeyValueStore, RemoteError, SaveInProgress, SaveReceipt, SaveStatus,
    STORAGE_KEY,
};

/// Form tab shown by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Profile,
    Experience,
    Projects,
    Preview,
}

/// Snapshot taken when a save starts.
#[derive(Debug, Clone)]
pub struct SaveJob {
    pub existing_id: Option<String>,
    pub document: Document,
    pub title: String,
}

pub struct Session {
    document: Document,
    tab: Tab,
    status: SaveStatus,
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    /// Opens the session on whatever the local store holds, or the default Document.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let document = load_local(store.as_ref(), STORAGE_KEY).unwrap_or_else(|| {
            debug!("no stored document, starting from defaults");
            default_document()
        });
        Self {
            document,
            tab: Tab::default(),
            status: SaveStatus::default(),
            store,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    fn commit(&mut self, next: Document) {
        self.document = next;
        save_local(self.store.as_ref(), STORAGE_KEY, &self.document);
    }

    // ── Mutations ──────────────────────────────────────────────────────────

    pub fn apply_update(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), PathError> {
        let next = update(&self.document, path, value)?;
        self.commit(next);
        Ok(())
    }

    /// Appends `item`, or the list's blank element when `None`.
    pub fn add_item(&mut self, list: &ListPath, item: Option<ListItem>) -> Result<(), PathError> {
        let next = add_array_item(&self.document, list, || {
            item.unwrap_or_else(|| list.blank_item())
        })?;
        self.commit(next);
        Ok(())
    }

    pub fn remove_item(&mut self, list: &ListPath, index: usize) -> Result<(), PathError> {
        let next = remove_array_item(&self.document, list, index)?;
        self.commit(next);
        Ok(())
    }

    /// Appends a trimmed skill. Blank input is ignored; returns whether anything was added.
    pub fn add_skill(&mut self, text: &str) -> bool {
        let tag = text.trim();
        if tag.is_empty() {
            return false;
        }
        // Skills always exists, so the append cannot fail.
        match add_array_item(&self.document, &ListPath::Skills, || {
            ListItem::Text(tag.to_string())
        }) {
            Ok(next) => {
                self.commit(next);
                true
            }
            Err(_) => false,
        }
    }

    /// Appends a trimmed tech tag to project `project`, creating its list if absent.
    pub fn add_tech(&mut self, project: usize, text: &str) -> Result<bool, PathError> {
        let tag = text.trim();
        if tag.is_empty() {
            return Ok(false);
        }
        let next = add_array_item(&self.document, &ListPath::Tech(project), || {
            ListItem::Text(tag.to_string())
        })?;
        self.commit(next);
        Ok(true)
    }

    /// Replaces the Document with the default one. The save status is kept.
    pub fn reset(&mut self) {
        self.commit(default_document());
        info!("document reset to defaults");
    }

    // ── Remote ─────────────────────────────────────────────────────────────

    /// Marks a save as started and snapshots what it must send.
    pub fn begin_save(&mut self) -> Result<SaveJob, SaveInProgress> {
        let existing_id = self.status.begin()?;
        Ok(SaveJob {
            existing_id,
            title: self.document.publish_title(),
            document: self.document.clone(),
        })
    }

    /// Settles the save started by `begin_save`. The Document is never touched.
    pub fn finish_save(&mut self, outcome: &Result<SaveReceipt, RemoteError>) {
        match outcome {
            Ok(receipt) => self.status.succeed(receipt.clone()),
            Err(e) => {
                warn!(error = %e, "publish failed, keeping previous save status");
                self.status.fail();
            }
        }
    }

    /// Settles a save whose task died without an outcome.
    pub fn abandon_save(&mut self) {
        if matches!(self.status, SaveStatus::Saving { .. }) {
            warn!("publish task ended without an outcome, keeping previous save status");
            self.status.fail();
        }
    }

    /// Adopts a Document fetched by public slug and switches to the preview.
    pub fn open_public(&mut self, slug: &str, document: Document) {
        self.commit(document);
        self.status.opened_by_slug(slug);
        self.tab = Tab::Preview;
        info!(slug, "opened published resume");
    }
}
