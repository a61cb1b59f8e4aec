//! Collaborators the editor drives. Implementations live in `sanca-shared`;
//! tests use in-memory mocks.

use crate::error::RemoteError;
use crate::types::CompressionOptions;
use sanca_atoms::media::ListingImage;
use serde::{Deserialize, Serialize};

/// Presigned upload target returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDestination {
    #[serde(rename = "url")]
    pub upload_url: String,
    #[serde(rename = "publicURL")]
    pub public_url: String,
    pub key: String,
}

/// Body of a create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListingImage {
    pub listing_id: String,
    pub src: String,
    pub order: i32,
}

#[async_trait::async_trait]
pub trait UploadGateway: Send + Sync {
    async fn request_upload_destination(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadDestination, RemoteError>;

    async fn upload_bytes(
        &self,
        upload_url: &str,
        payload: &[u8],
        content_type: &str,
    ) -> Result<(), RemoteError>;
}

/// Downscales/re-encodes a picked file. Runs synchronously from the editor's side.
/// Output stays in the format named by `content_type`; a file whose bytes are
/// in another format is an error.
pub trait ImageCompressor: Send + Sync {
    fn compress(&self, raw: &[u8], content_type: &str, options: &CompressionOptions) -> Result<Vec<u8>, String>;
}

/// Listing image persistence. Credentials are the implementation's concern.
#[async_trait::async_trait]
pub trait ListingImageApi: Send + Sync {
    async fn create_image(&self, image: NewListingImage) -> Result<ListingImage, RemoteError>;

    async fn update_image(
        &self,
        listing_id: &str,
        image_id: &str,
        order: i32,
    ) -> Result<ListingImage, RemoteError>;

    async fn delete_image(&self, listing_id: &str, image_id: &str) -> Result<(), RemoteError>;

    async fn get_images(&self, listing_id: &str) -> Result<Vec<ListingImage>, RemoteError>;
}
