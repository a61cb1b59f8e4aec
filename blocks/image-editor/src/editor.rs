//! Working list of a listing's images for one editing session.
//!
//! Mutations are local and synchronous. `commit` (see `commit.rs`) is the only
//! operation that talks to the network; while it runs every mutation and any
//! second commit is rejected with `CommitInProgress`.

use crate::diff::{compute_diff, ImageDiff};
use crate::drag::{hover_move, SlotBounds};
use crate::error::{EditorError, OpenError};
use crate::ports::{ImageCompressor, ListingImageApi, UploadGateway};
use crate::types::{
    BaselineImage, EditorConfig, EntrySource, ImageEntry, PendingContent, RawImageFile, PENDING_ID_PREFIX,
};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// External services used by the editor
#[derive(Clone)]
pub struct Collaborators {
    pub uploads: Arc<dyn UploadGateway>,
    pub compressor: Arc<dyn ImageCompressor>,
    pub api: Arc<dyn ListingImageApi>,
}

pub(crate) struct EditorState {
    pub(crate) entries: Vec<ImageEntry>,
    pub(crate) baseline: Vec<BaselineImage>,
    pub(crate) committing: bool,
}

pub struct ImageSetEditor {
    pub(crate) listing_id: String,
    pub(crate) config: EditorConfig,
    pub(crate) collaborators: Collaborators,
    pub(crate) state: Mutex<EditorState>,
}

fn sort_baseline(images: &mut [BaselineImage]) {
    images.sort_by(|a, b| match (a.order, b.order) {
        (Some(a_order), Some(b_order)) => a_order.cmp(&b_order),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn check_unique(baseline: &[BaselineImage]) -> Result<(), EditorError> {
    let mut seen = HashSet::new();
    for image in baseline {
        if !seen.insert(image.id.as_str()) {
            return Err(EditorError::DuplicateImage(image.id.clone()));
        }
    }
    Ok(())
}

impl ImageSetEditor {
    /// Start a session from a baseline snapshot. The working list mirrors the
    /// baseline, cover first.
    pub fn initialize(
        listing_id: impl Into<String>,
        baseline: Vec<BaselineImage>,
        config: EditorConfig,
        collaborators: Collaborators,
    ) -> Result<Self, EditorError> {
        check_unique(&baseline)?;

        let mut ordered = baseline.clone();
        sort_baseline(&mut ordered);
        let entries = ordered.iter().map(ImageEntry::existing).collect();

        let listing_id = listing_id.into();
        tracing::info!(
            "🧩 Image editor initialized: listing_id={}, baseline={} images",
            listing_id,
            baseline.len()
        );

        Ok(ImageSetEditor {
            listing_id,
            config,
            collaborators,
            state: Mutex::new(EditorState {
                entries,
                baseline,
                committing: false,
            }),
        })
    }

    /// Fetch the listing's current images and start a session from them
    pub async fn open(
        listing_id: &str,
        config: EditorConfig,
        collaborators: Collaborators,
    ) -> Result<Self, OpenError> {
        let images = collaborators.api.get_images(listing_id).await?;
        let baseline = images.into_iter().map(BaselineImage::from).collect();
        Ok(Self::initialize(listing_id, baseline, config, collaborators)?)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_for_mutation(&self) -> Result<MutexGuard<'_, EditorState>, EditorError> {
        let state = self.lock();
        if state.committing {
            return Err(EditorError::CommitInProgress);
        }
        Ok(state)
    }

    pub fn listing_id(&self) -> &str {
        &self.listing_id
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Snapshot of the working list
    pub fn entries(&self) -> Vec<ImageEntry> {
        self.lock().entries.clone()
    }

    /// Current diff reference
    pub fn baseline(&self) -> Vec<BaselineImage> {
        self.lock().baseline.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cover(&self) -> Option<ImageEntry> {
        self.lock().entries.first().cloned()
    }

    pub fn is_committing(&self) -> bool {
        self.lock().committing
    }

    /// What the next commit would send
    pub fn plan(&self) -> ImageDiff {
        let state = self.lock();
        compute_diff(&state.baseline, &state.entries)
    }

    pub fn has_changes(&self) -> bool {
        !self.plan().is_empty()
    }

    /// Validate, compress and append a picked file. Nothing is uploaded yet.
    pub fn add_image(&self, raw: RawImageFile) -> Result<ImageEntry, EditorError> {
        {
            let state = self.lock_for_mutation()?;
            if state.entries.len() >= self.config.max_images {
                tracing::warn!(
                    "⚠️ add_image rejected: listing_id={}, limit {} reached",
                    self.listing_id,
                    self.config.max_images
                );
                return Err(EditorError::LimitExceeded { max: self.config.max_images });
            }
        }

        if raw.bytes.len() > self.config.max_file_bytes {
            tracing::warn!(
                "⚠️ add_image rejected: file={} is {} bytes (max {})",
                raw.file_name,
                raw.bytes.len(),
                self.config.max_file_bytes
            );
            return Err(EditorError::FileTooLarge {
                size: raw.bytes.len(),
                max: self.config.max_file_bytes,
            });
        }

        let content_type = match self.config.canonical_content_type(&raw.content_type) {
            Some(content_type) => content_type,
            None => {
                tracing::warn!("⚠️ add_image rejected: file={} type={}", raw.file_name, raw.content_type);
                return Err(EditorError::UnsupportedType(raw.content_type));
            }
        };

        // CPU-bound, done without holding the lock
        let compressed = self
            .collaborators
            .compressor
            .compress(&raw.bytes, &content_type, &self.config.compression)
            .map_err(|e| {
                tracing::warn!("⚠️ add_image rejected: file={} could not be compressed: {}", raw.file_name, e);
                EditorError::Compression(e)
            })?;

        let content = PendingContent {
            file_name: raw.file_name,
            content_type,
            bytes: compressed,
        };

        let mut state = self.lock_for_mutation()?;
        // Another add may have filled the list while compressing
        if state.entries.len() >= self.config.max_images {
            return Err(EditorError::LimitExceeded { max: self.config.max_images });
        }

        let id = Self::fresh_pending_id(&state);
        let entry = ImageEntry {
            id,
            display_url: content.preview_url(),
            source: EntrySource::Pending { content },
        };
        state.entries.push(entry.clone());

        tracing::info!(
            "➕ Image added: listing_id={}, entry_id={}, position={}",
            self.listing_id,
            entry.id,
            state.entries.len() - 1
        );

        Ok(entry)
    }

    fn fresh_pending_id(state: &EditorState) -> String {
        loop {
            let candidate = format!("{}{}", PENDING_ID_PREFIX, uuid::Uuid::new_v4());
            let taken = state.entries.iter().any(|e| e.id == candidate)
                || state.baseline.iter().any(|b| b.id == candidate);
            if !taken {
                return candidate;
            }
        }
    }

    /// Remove an entry; later entries shift left
    pub fn remove_image(&self, id: &str) -> Result<ImageEntry, EditorError> {
        let mut state = self.lock_for_mutation()?;
        let index = state
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;

        let removed = state.entries.remove(index);
        tracing::info!("➖ Image removed: listing_id={}, entry_id={}", self.listing_id, id);
        Ok(removed)
    }

    /// Take the entry at `from` out and reinsert it at `to`
    pub fn move_image(&self, from: usize, to: usize) -> Result<(), EditorError> {
        let mut state = self.lock_for_mutation()?;
        let len = state.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(EditorError::IndexOutOfBounds { index, len });
            }
        }

        if from != to {
            let entry = state.entries.remove(from);
            state.entries.insert(to, entry);
        }
        Ok(())
    }

    /// Pointer hovering over slot `hover_index` while dragging `drag_index`.
    /// Returns the dragged entry's index after the hover.
    pub fn drag_hover(
        &self,
        drag_index: usize,
        hover_index: usize,
        pointer_x: f64,
        slot: SlotBounds,
    ) -> Result<usize, EditorError> {
        match hover_move(drag_index, hover_index, pointer_x, slot) {
            Some((from, to)) => {
                self.move_image(from, to)?;
                Ok(to)
            }
            None => Ok(drag_index),
        }
    }

    /// Replace the baseline with a freshly fetched one, e.g. after a partially
    /// applied commit. Existing entries the server no longer has are dropped;
    /// returns how many.
    pub fn resync(&self, baseline: Vec<BaselineImage>) -> Result<usize, EditorError> {
        check_unique(&baseline)?;
        let mut state = self.lock_for_mutation()?;

        let known: HashSet<&str> = baseline.iter().map(|b| b.id.as_str()).collect();
        let before = state.entries.len();
        state
            .entries
            .retain(|entry| entry.is_new() || known.contains(entry.id.as_str()));
        let dropped = before - state.entries.len();

        state.baseline = baseline;
        tracing::info!(
            "🔄 Image editor resynced: listing_id={}, dropped={} stale entries",
            self.listing_id,
            dropped
        );
        Ok(dropped)
    }

    /// End the session without committing. Returns how many pending previews were released.
    pub fn discard(self) -> usize {
        let state = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
        let released = state
            .entries
            .iter()
            .filter(|entry| entry.pending_content().is_some())
            .count();
        tracing::info!(
            "🧹 Image editor discarded: listing_id={}, released {} pending previews",
            self.listing_id,
            released
        );
        released
    }
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;
