use base64::Engine;
use sanca_atoms::media::ListingImage;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_IMAGES: usize = 5;
pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_MAX_SIZE_MB: f64 = 5.0;
pub const DEFAULT_MAX_DIMENSION_PX: u32 = 1024;
pub const PENDING_ID_PREFIX: &str = "pending-";

/// Server image record as it was when the session started
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BaselineImage {
    pub id: String,
    pub src: String,
    pub order: Option<i32>,
}

impl From<&ListingImage> for BaselineImage {
    fn from(image: &ListingImage) -> Self {
        BaselineImage {
            id: image.id.clone(),
            src: image.src.clone(),
            order: image.order,
        }
    }
}

impl From<ListingImage> for BaselineImage {
    fn from(image: ListingImage) -> Self {
        BaselineImage {
            id: image.id,
            src: image.src,
            order: image.order,
        }
    }
}

/// File picked by the user, before validation and compression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Compressed payload waiting for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingContent {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PendingContent {
    /// `data:` URL the view can render before the image exists anywhere else
    pub fn preview_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// Backed by a server record; the entry id is the server id
    Existing,
    /// Added locally, bytes not transferred yet
    Pending { content: PendingContent },
    /// Bytes transferred by an earlier commit attempt, no server record yet
    Uploaded { public_url: String, key: String },
}

/// One slot of the working list. Position 0 is the cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub id: String,
    pub display_url: String,
    pub source: EntrySource,
}

impl ImageEntry {
    pub fn existing(baseline: &BaselineImage) -> Self {
        ImageEntry {
            id: baseline.id.clone(),
            display_url: baseline.src.clone(),
            source: EntrySource::Existing,
        }
    }

    pub fn is_new(&self) -> bool {
        !matches!(self.source, EntrySource::Existing)
    }

    pub fn pending_content(&self) -> Option<&PendingContent> {
        match &self.source {
            EntrySource::Pending { content } => Some(content),
            _ => None,
        }
    }

    /// Public URL once the bytes are in the object store
    pub fn uploaded_url(&self) -> Option<&str> {
        match &self.source {
            EntrySource::Uploaded { public_url, .. } => Some(public_url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionOptions {
    pub max_size_mb: f64,
    pub max_dimension_px: u32,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        CompressionOptions {
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            max_dimension_px: DEFAULT_MAX_DIMENSION_PX,
        }
    }
}

impl CompressionOptions {
    pub fn max_size_bytes(&self) -> usize {
        (self.max_size_mb * 1024.0 * 1024.0) as usize
    }
}

/// Limits applied by the editor
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub max_images: usize,
    pub max_file_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub compression: CompressionOptions,
    /// Minimum working list size accepted by `commit`
    pub min_images: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            max_images: DEFAULT_MAX_IMAGES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            allowed_content_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
            ],
            compression: CompressionOptions::default(),
            min_images: 0,
        }
    }
}

impl EditorConfig {
    /// Edit page settings: at least one image, the cover
    pub fn listing_edit() -> Self {
        EditorConfig {
            min_images: 1,
            ..EditorConfig::default()
        }
    }

    pub fn allows_content_type(&self, content_type: &str) -> bool {
        self.canonical_content_type(content_type).is_some()
    }

    /// Lowercase form of an accepted content type, as sent to the upload endpoint
    pub fn canonical_content_type(&self, content_type: &str) -> Option<String> {
        self.allowed_content_types
            .iter()
            .find(|allowed| allowed.eq_ignore_ascii_case(content_type.trim()))
            .map(|allowed| allowed.to_ascii_lowercase())
    }
}

/// Position in the working list as stored in the `order` column
pub(crate) fn position(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}
