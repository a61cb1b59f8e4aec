//! `commit`: upload pending content, then reconcile the working list with the
//! server through the minimal set of delete/create/update calls.
//!
//! Nothing is rolled back. After the network phase the editor rebases onto
//! whatever the server accepted, so a retry only re-issues what failed.

use crate::diff::{compute_diff, ImageDiff};
use crate::editor::ImageSetEditor;
use crate::error::{CommitError, RemoteError};
use crate::ports::{NewListingImage, UploadDestination};
use crate::report::{AppliedOperation, CommitReport, FailedOperation, ImageOperation};
use crate::types::{BaselineImage, EntrySource, ImageEntry, PendingContent};
use futures::future::join_all;
use std::collections::HashMap;

/// Remote calls derived from a diff
pub(crate) struct PlannedOperations {
    pub(crate) deletes: Vec<ImageOperation>,
    pub(crate) creates: Vec<ImageOperation>,
    pub(crate) updates: Vec<ImageOperation>,
    /// Creates that cannot be sent: the entry has no uploaded URL
    pub(crate) unsent: Vec<FailedOperation>,
}

pub(crate) fn plan_operations(diff: &ImageDiff, entries: &[ImageEntry]) -> PlannedOperations {
    let sources: HashMap<&str, &str> = entries
        .iter()
        .filter_map(|entry| entry.uploaded_url().map(|url| (entry.id.as_str(), url)))
        .collect();

    let deletes = diff
        .to_delete
        .iter()
        .map(|image| ImageOperation::Delete { image_id: image.id.clone() })
        .collect();

    let mut creates = Vec::new();
    let mut unsent = Vec::new();
    for planned in &diff.to_create {
        let src = sources.get(planned.entry_id.as_str()).copied();
        let operation = ImageOperation::Create {
            entry_id: planned.entry_id.clone(),
            src: src.unwrap_or_default().to_string(),
            order: planned.order,
        };
        match src {
            Some(_) => creates.push(operation),
            None => unsent.push(FailedOperation {
                operation,
                error: RemoteError::NotUploaded(planned.entry_id.clone()),
            }),
        }
    }

    let updates = diff
        .to_update
        .iter()
        .map(|planned| ImageOperation::Update {
            image_id: planned.image_id.clone(),
            order: planned.order,
        })
        .collect();

    PlannedOperations {
        deletes,
        creates,
        updates,
        unsent,
    }
}

/// Clears the commit flag when the commit future finishes or is dropped
struct CommitGuard<'a> {
    editor: &'a ImageSetEditor,
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        self.editor.lock().committing = false;
    }
}

impl ImageSetEditor {
    pub async fn commit(&self) -> Result<CommitReport, CommitError> {
        let pending: Vec<(String, PendingContent)> = {
            let mut state = self.lock();
            if state.committing {
                tracing::warn!("⚠️ commit rejected: listing_id={}, commit already running", self.listing_id);
                return Err(CommitError::CommitInProgress);
            }
            if state.entries.len() < self.config.min_images {
                return Err(CommitError::TooFewImages { min: self.config.min_images });
            }
            state.committing = true;
            state
                .entries
                .iter()
                .filter_map(|entry| entry.pending_content().map(|content| (entry.id.clone(), content.clone())))
                .collect()
        };
        let _guard = CommitGuard { editor: self };

        tracing::info!(
            "💾 Commit started: listing_id={}, pending uploads={}",
            self.listing_id,
            pending.len()
        );

        // Uploads, all at once
        let uploads = join_all(
            pending
                .iter()
                .map(|(entry_id, content)| self.upload_pending(entry_id, content)),
        )
        .await;

        let (entries, baseline, upload_failure) = {
            let mut state = self.lock();
            let mut upload_failure = None;

            for ((entry_id, _), result) in pending.iter().zip(uploads) {
                match result {
                    Ok(destination) => {
                        // Keep the transfer even if a sibling failed: a retry skips it
                        if let Some(entry) = state.entries.iter_mut().find(|e| &e.id == entry_id) {
                            entry.source = EntrySource::Uploaded {
                                public_url: destination.public_url,
                                key: destination.key,
                            };
                        }
                    }
                    Err(error) => {
                        if upload_failure.is_none() {
                            upload_failure = Some((entry_id.clone(), error));
                        }
                    }
                }
            }

            (state.entries.clone(), state.baseline.clone(), upload_failure)
        };

        if let Some((entry_id, source)) = upload_failure {
            tracing::error!(
                "❌ Commit aborted: listing_id={}, upload of {} failed: {}",
                self.listing_id,
                entry_id,
                source
            );
            return Err(CommitError::UploadFailed { entry_id, source });
        }

        // Diff against the baseline
        let diff = compute_diff(&baseline, &entries);
        if diff.is_empty() {
            tracing::info!("✅ Commit finished: listing_id={}, nothing to change", self.listing_id);
            return Ok(CommitReport::default());
        }

        let PlannedOperations {
            deletes,
            creates,
            updates,
            unsent,
        } = plan_operations(&diff, &entries);

        // The batches touch disjoint ids, run them together
        let (deleted, created, updated) = futures::join!(
            join_all(deletes.iter().map(|op| self.apply(op))),
            join_all(creates.iter().map(|op| self.apply(op))),
            join_all(updates.iter().map(|op| self.apply(op)))
        );

        let mut report = CommitReport {
            failed: unsent,
            ..CommitReport::default()
        };
        let operations = deletes.into_iter().chain(creates).chain(updates);
        let outcomes = deleted.into_iter().chain(created).chain(updated);
        for (operation, outcome) in operations.zip(outcomes) {
            match outcome {
                Ok(image_id) => report.applied.push(AppliedOperation { operation, image_id }),
                Err(error) => {
                    tracing::error!(
                        "❌ Image operation failed: listing_id={}, operation={:?}, error={}",
                        self.listing_id,
                        operation,
                        error
                    );
                    report.failed.push(FailedOperation { operation, error });
                }
            }
        }

        self.rebase(&report);

        if report.is_complete() {
            tracing::info!(
                "✅ Commit finished: listing_id={}, applied={} operations",
                self.listing_id,
                report.applied.len()
            );
            Ok(report)
        } else {
            tracing::error!(
                "❌ Commit partially applied: listing_id={}, applied={}, failed={}",
                self.listing_id,
                report.applied.len(),
                report.failed.len()
            );
            Err(CommitError::PartiallyApplied(report))
        }
    }

    async fn upload_pending(
        &self,
        entry_id: &str,
        content: &PendingContent,
    ) -> Result<UploadDestination, RemoteError> {
        let uploads = &self.collaborators.uploads;
        let destination = uploads
            .request_upload_destination(&content.file_name, &content.content_type)
            .await?;
        uploads
            .upload_bytes(&destination.upload_url, &content.bytes, &content.content_type)
            .await?;

        tracing::info!(
            "☁️ Uploaded image: entry_id={}, key={}, bytes={}",
            entry_id,
            destination.key,
            content.bytes.len()
        );
        Ok(destination)
    }

    /// Issue one remote call; yields the server id it touched
    async fn apply(&self, operation: &ImageOperation) -> Result<String, RemoteError> {
        let api = &self.collaborators.api;
        match operation {
            ImageOperation::Delete { image_id } => {
                api.delete_image(&self.listing_id, image_id).await?;
                Ok(image_id.clone())
            }
            ImageOperation::Create { src, order, .. } => {
                let record = api
                    .create_image(NewListingImage {
                        listing_id: self.listing_id.clone(),
                        src: src.clone(),
                        order: *order,
                    })
                    .await?;
                Ok(record.id)
            }
            ImageOperation::Update { image_id, order } => {
                api.update_image(&self.listing_id, image_id, *order).await?;
                Ok(image_id.clone())
            }
        }
    }

    /// Fold applied operations into a new baseline snapshot and turn created
    /// entries into existing ones under their server id.
    fn rebase(&self, report: &CommitReport) {
        let mut state = self.lock();
        let mut baseline: Vec<BaselineImage> = state.baseline.clone();

        for applied in &report.applied {
            match &applied.operation {
                ImageOperation::Delete { image_id } => baseline.retain(|image| &image.id != image_id),
                ImageOperation::Update { image_id, order } => {
                    if let Some(image) = baseline.iter_mut().find(|image| &image.id == image_id) {
                        image.order = Some(*order);
                    }
                }
                ImageOperation::Create { entry_id, src, order } => {
                    baseline.push(BaselineImage {
                        id: applied.image_id.clone(),
                        src: src.clone(),
                        order: Some(*order),
                    });
                    if let Some(entry) = state.entries.iter_mut().find(|entry| &entry.id == entry_id) {
                        *entry = ImageEntry {
                            id: applied.image_id.clone(),
                            display_url: src.clone(),
                            source: EntrySource::Existing,
                        };
                    }
                }
            }
        }

        baseline.sort_by_key(|image| image.order.unwrap_or(i32::MAX));
        state.baseline = baseline;
    }
}

#[cfg(test)]
#[path = "commit_test.rs"]
mod tests;
