//! In-memory collaborators for editor tests.

use crate::editor::{Collaborators, ImageSetEditor};
use crate::error::RemoteError;
use crate::ports::{ImageCompressor, ListingImageApi, NewListingImage, UploadDestination, UploadGateway};
use crate::types::{BaselineImage, CompressionOptions, EditorConfig, RawImageFile};
use sanca_atoms::media::ListingImage;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// =============================================================================
// Uploads
// =============================================================================

/// Holds every upload until released
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct MockUploads {
    /// File names that reached `upload_bytes` successfully
    pub uploaded: Mutex<Vec<String>>,
    pub failing_files: Mutex<HashSet<String>>,
    pub gate: Option<Arc<Gate>>,
    counter: AtomicUsize,
}

impl MockUploads {
    pub fn gated(gate: Arc<Gate>) -> Self {
        MockUploads { gate: Some(gate), ..MockUploads::default() }
    }

    pub fn fail_file(&self, file_name: &str) {
        self.failing_files.lock().unwrap().insert(file_name.to_string());
    }

    pub fn heal(&self) {
        self.failing_files.lock().unwrap().clear();
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UploadGateway for MockUploads {
    async fn request_upload_destination(
        &self,
        file_name: &str,
        _content_type: &str,
    ) -> Result<UploadDestination, RemoteError> {
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let key = format!("listing-images/{n}-{file_name}");
        Ok(UploadDestination {
            upload_url: format!("https://s3.test/{key}?X-Amz-Signature=abc"),
            public_url: format!("https://bucket.s3.amazonaws.com/{key}"),
            key,
        })
    }

    async fn upload_bytes(&self, upload_url: &str, _payload: &[u8], _content_type: &str) -> Result<(), RemoteError> {
        let failing = self
            .failing_files
            .lock()
            .unwrap()
            .iter()
            .any(|name| upload_url.contains(name.as_str()));
        if failing {
            return Err(RemoteError::Status { status: 500, body: "S3 unavailable".into() });
        }
        let path = upload_url.split('?').next().unwrap_or_default();
        let object = path.rsplit('/').next().unwrap_or_default();
        let file = object.split_once('-').map(|(_, name)| name).unwrap_or(object);
        self.uploaded.lock().unwrap().push(file.to_string());
        Ok(())
    }
}

// =============================================================================
// Compression
// =============================================================================

/// Keeps the first half of the payload so tests can tell compressed bytes apart
pub struct HalvingCompressor;

impl ImageCompressor for HalvingCompressor {
    fn compress(&self, raw: &[u8], _content_type: &str, _options: &CompressionOptions) -> Result<Vec<u8>, String> {
        Ok(raw[..raw.len().div_ceil(2)].to_vec())
    }
}

pub struct BrokenCompressor;

impl ImageCompressor for BrokenCompressor {
    fn compress(&self, _raw: &[u8], _content_type: &str, _options: &CompressionOptions) -> Result<Vec<u8>, String> {
        Err("unsupported image format".to_string())
    }
}

// =============================================================================
// Listing image API
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Create { src: String, order: i32 },
    Update { image_id: String, order: i32 },
    Delete { image_id: String },
}

#[derive(Default)]
pub struct MockApi {
    pub calls: Mutex<Vec<ApiCall>>,
    /// Server ids (or create srcs) whose calls fail
    pub failing: Mutex<HashSet<String>>,
    pub images: Mutex<Vec<ListingImage>>,
    counter: AtomicUsize,
}

impl MockApi {
    pub fn fail(&self, id_or_src: &str) {
        self.failing.lock().unwrap().insert(id_or_src.to_string());
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn check(&self, id: &str) -> Result<(), RemoteError> {
        if self.failing.lock().unwrap().contains(id) {
            Err(RemoteError::Status { status: 500, body: format!("{id} failed") })
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl ListingImageApi for MockApi {
    async fn create_image(&self, image: NewListingImage) -> Result<ListingImage, RemoteError> {
        self.calls.lock().unwrap().push(ApiCall::Create { src: image.src.clone(), order: image.order });
        self.check(&image.src)?;
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(ListingImage {
            id: format!("srv-{n}"),
            listing_id: image.listing_id,
            src: image.src,
            order: Some(image.order),
            created_at: String::new(),
        })
    }

    async fn update_image(&self, listing_id: &str, image_id: &str, order: i32) -> Result<ListingImage, RemoteError> {
        self.calls.lock().unwrap().push(ApiCall::Update { image_id: image_id.to_string(), order });
        self.check(image_id)?;
        Ok(ListingImage {
            id: image_id.to_string(),
            listing_id: listing_id.to_string(),
            src: String::new(),
            order: Some(order),
            created_at: String::new(),
        })
    }

    async fn delete_image(&self, _listing_id: &str, image_id: &str) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(ApiCall::Delete { image_id: image_id.to_string() });
        self.check(image_id)
    }

    async fn get_images(&self, _listing_id: &str) -> Result<Vec<ListingImage>, RemoteError> {
        Ok(self.images.lock().unwrap().clone())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub struct Harness {
    pub uploads: Arc<MockUploads>,
    pub api: Arc<MockApi>,
    pub editor: ImageSetEditor,
}

pub fn baseline(ids: &[&str]) -> Vec<BaselineImage> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| BaselineImage {
            id: (*id).to_string(),
            src: format!("https://bucket.s3.amazonaws.com/{id}.jpg"),
            order: Some(i32::try_from(i).unwrap()),
        })
        .collect()
}

pub fn png(name: &str) -> RawImageFile {
    RawImageFile {
        file_name: name.to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G', 1, 2, 3, 4],
    }
}

pub fn harness_with(ids: &[&str], config: EditorConfig, uploads: MockUploads) -> Harness {
    let uploads = Arc::new(uploads);
    let api = Arc::new(MockApi::default());
    let collaborators = Collaborators {
        uploads: uploads.clone(),
        compressor: Arc::new(HalvingCompressor),
        api: api.clone(),
    };
    let editor = ImageSetEditor::initialize("listing-1", baseline(ids), config, collaborators).unwrap();
    Harness { uploads, api, editor }
}

pub fn harness(ids: &[&str]) -> Harness {
    harness_with(ids, EditorConfig::default(), MockUploads::default())
}

pub fn ids(editor: &ImageSetEditor) -> Vec<String> {
    editor.entries().into_iter().map(|entry| entry.id).collect()
}
