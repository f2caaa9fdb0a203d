// Admin editors
// An editor holds a local draft of one page document. Sections that are lists
// of records (FAQs, stats, packages, hero images) are edited through the
// entry helpers below. Saving overwrites the whole document.

use crate::catalog::{CatalogRecord, CatalogRepository};
use crate::content::{PageDocument, PageService};
use crate::store::StoreError;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Index {index} out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Deletion of {0} was not confirmed")]
    NotConfirmed(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Answer to the "are you sure?" prompt shown before any removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

pub fn confirm_delete(what: &str, confirmation: Confirmation) -> Result<(), EditorError> {
    match confirmation {
        Confirmation::Confirmed => Ok(()),
        Confirmation::Declined => {
            debug!("Deletion of {} declined", what);
            Err(EditorError::NotConfirmed(what.to_string()))
        }
    }
}

pub struct DocumentEditor<T: PageDocument> {
    service: PageService<T>,
    saved: T,
    draft: T,
}

impl<T: PageDocument + PartialEq> DocumentEditor<T> {
    /// Fails when the store cannot be read; the public defaults fallback
    /// does not apply here.
    pub async fn load(service: PageService<T>) -> Result<Self, EditorError> {
        let saved = service.load_for_edit().await?;
        Ok(Self {
            service,
            draft: saved.clone(),
            saved,
        })
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    pub fn edit<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.draft)
    }

    // Applies the change to a copy, so a failed edit leaves the draft untouched
    pub fn try_edit<R>(
        &mut self,
        f: impl FnOnce(&mut T) -> Result<R, EditorError>,
    ) -> Result<R, EditorError> {
        let mut candidate = self.draft.clone();
        let result = f(&mut candidate)?;
        self.draft = candidate;
        Ok(result)
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.saved
    }

    /// Overwrite the stored document with the draft. Concurrent editors do
    /// not see each other; the last save wins.
    pub async fn save(&mut self) -> Result<(), EditorError> {
        self.service.save_page_content(&self.draft).await?;
        self.saved = self.draft.clone();
        info!("Saved {}/{}", T::COLLECTION, T::DOC_ID);
        Ok(())
    }

    pub fn discard(&mut self) {
        self.draft = self.saved.clone();
    }

    // Picks up other editors' saves, dropping local changes. On error the
    // draft is kept as it was.
    pub async fn reload(&mut self) -> Result<(), EditorError> {
        self.saved = self.service.load_for_edit().await?;
        self.draft = self.saved.clone();
        Ok(())
    }

    pub async fn reset_to_default(&mut self, confirmation: Confirmation) -> Result<(), EditorError> {
        confirm_delete(&format!("{}/{} content", T::COLLECTION, T::DOC_ID), confirmation)?;
        self.saved = self.service.reset_to_default().await?;
        self.draft = self.saved.clone();
        Ok(())
    }
}

/// Id for a record added from the admin form.
pub fn new_entry_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

// Returns the index of the new entry
pub fn add_entry<R>(items: &mut Vec<R>, entry: R) -> usize {
    items.push(entry);
    items.len() - 1
}

fn check_index<R>(items: &[R], index: usize) -> Result<(), EditorError> {
    if index < items.len() {
        Ok(())
    } else {
        Err(EditorError::IndexOutOfRange {
            index,
            len: items.len(),
        })
    }
}

pub fn update_entry<R>(
    items: &mut [R],
    index: usize,
    f: impl FnOnce(&mut R),
) -> Result<(), EditorError> {
    check_index(items, index)?;
    f(&mut items[index]);
    Ok(())
}

pub fn remove_entry<R>(
    items: &mut Vec<R>,
    index: usize,
    confirmation: Confirmation,
) -> Result<R, EditorError> {
    check_index(items, index)?;
    confirm_delete(&format!("entry {}", index), confirmation)?;
    Ok(items.remove(index))
}

/// Move the entry at `from` so it ends up at position `to`.
pub fn move_entry<R>(items: &mut [R], from: usize, to: usize) -> Result<(), EditorError> {
    check_index(items, from)?;
    check_index(items, to)?;
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
    Ok(())
}

pub async fn delete_record<T: CatalogRecord>(
    repository: &CatalogRepository<T>,
    id: &str,
    confirmation: Confirmation,
) -> Result<(), EditorError> {
    confirm_delete(&format!("{}/{}", T::COLLECTION, id), confirmation)?;
    repository.delete(id).await?;
    Ok(())
}
