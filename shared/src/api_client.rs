//! HTTP client for the `/listing-images` API. Implements the editor's
//! collaborator traits so a session can run against a deployed backend.

use crate::config::ClientConfig;
use crate::s3_presign::PresignRequest;
use image_editor_block::{ListingImageApi, NewListingImage, RemoteError, UploadDestination, UploadGateway};
use reqwest::header::CONTENT_TYPE;
use reqwest::RequestBuilder;
use sanca_atoms::media::{ListingImage, UpdateListingImagePayload};
use serde::de::DeserializeOwned;

pub struct MarketplaceClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl MarketplaceClient {
    pub fn new(config: &ClientConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Ok(MarketplaceClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Bearer token sent with every API call (not with object store uploads)
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(RemoteError::Status { status: status.as_u16(), body });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let body = self.send(self.authorized(request)).await?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

pub fn image_path(image_id: &str) -> String {
    format!("/listing-images/{}", image_id)
}

pub fn listing_images_path(listing_id: &str) -> String {
    format!("/listing-images/listing/{}", listing_id)
}

#[async_trait::async_trait]
impl UploadGateway for MarketplaceClient {
    async fn request_upload_destination(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadDestination, RemoteError> {
        let body = PresignRequest {
            filename: file_name.to_string(),
            content_type: content_type.to_string(),
        };
        self.send_json(self.http.post(self.url("/listing-images/s3")).json(&body))
            .await
    }

    async fn upload_bytes(&self, upload_url: &str, payload: &[u8], content_type: &str) -> Result<(), RemoteError> {
        // Presigned URL carries its own credentials
        let request = self
            .http
            .put(upload_url)
            .header(CONTENT_TYPE, content_type)
            .body(payload.to_vec());
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ListingImageApi for MarketplaceClient {
    async fn create_image(&self, image: NewListingImage) -> Result<ListingImage, RemoteError> {
        self.send_json(self.http.post(self.url("/listing-images")).json(&image))
            .await
    }

    async fn update_image(&self, listing_id: &str, image_id: &str, order: i32) -> Result<ListingImage, RemoteError> {
        let body = UpdateListingImagePayload {
            order: Some(order),
            ..UpdateListingImagePayload::default()
        };
        let request = self
            .http
            .put(self.url(&image_path(image_id)))
            .query(&[("listing_id", listing_id)])
            .json(&body);
        self.send_json(request).await
    }

    async fn delete_image(&self, listing_id: &str, image_id: &str) -> Result<(), RemoteError> {
        let request = self
            .http
            .delete(self.url(&image_path(image_id)))
            .query(&[("listing_id", listing_id)]);
        self.send(self.authorized(request)).await?;
        Ok(())
    }

    async fn get_images(&self, listing_id: &str) -> Result<Vec<ListingImage>, RemoteError> {
        self.send_json(self.http.get(self.url(&listing_images_path(listing_id))))
            .await
    }
}
