use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client as S3Client;
use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];
pub const KEY_PREFIX: &str = "listing-images";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresignRequest {
    pub filename: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresignResponse {
    /// Presigned PUT URL
    pub url: String,
    #[serde(rename = "publicURL")]
    pub public_url: String,
    pub key: String,
}

/// File extension for an accepted content type
pub fn extension_for(content_type: &str) -> Result<&'static str, String> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "" => Err("Content-Type is required".to_string()),
        "image/png" => Ok("png"),
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        _ => Err(format!("Content-Type must be one of: {}", ALLOWED_CONTENT_TYPES.join(", "))),
    }
}

pub fn object_key(extension: &str) -> String {
    format!("{}/{}.{}", KEY_PREFIX, uuid::Uuid::new_v4(), extension)
}

pub fn public_url(bucket: &str, key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", bucket, key)
}

/// Presigned PUT for one listing image
pub async fn presign_upload(
    s3_client: &S3Client,
    bucket: &str,
    expires: Duration,
    request: &PresignRequest,
) -> Result<PresignResponse, String> {
    let extension = extension_for(&request.content_type)?;
    let key = object_key(extension);
    // The PUT must carry exactly the signed Content-Type
    let content_type = request.content_type.trim().to_ascii_lowercase();

    let presigning = PresigningConfig::expires_in(expires).map_err(|e| e.to_string())?;
    let presigned = s3_client
        .put_object()
        .bucket(bucket)
        .key(&key)
        .content_type(&content_type)
        .presigned(presigning)
        .await
        .map_err(|e| {
            tracing::error!("❌ Presign failed: bucket={}, key={}, error={}", bucket, key, e);
            e.to_string()
        })?;

    tracing::info!(
        "🔑 Presigned upload: filename={}, key={}, expires_in={}s",
        request.filename,
        key,
        expires.as_secs()
    );

    Ok(PresignResponse {
        url: presigned.uri().to_string(),
        public_url: public_url(bucket, &key),
        key,
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(body)?.into())
        .map_err(Box::new)?)
}

/// HTTP Handler: POST /listing-images/s3
pub async fn presign_upload_handler(
    s3_client: &S3Client,
    bucket: &str,
    expires: Duration,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let request: PresignRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(_) => return json_response(StatusCode::BAD_REQUEST, &serde_json::json!({ "error": "invalid JSON" })),
    };

    if let Err(e) = extension_for(&request.content_type) {
        tracing::warn!("⚠️ Presign rejected: filename={}, {}", request.filename, e);
        return json_response(StatusCode::BAD_REQUEST, &serde_json::json!({ "error": e }));
    }

    match presign_upload(s3_client, bucket, expires, &request).await {
        Ok(response) => json_response(StatusCode::OK, &response),
        Err(_) => json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &serde_json::json!({ "error": "could not generate presigned URL" }),
        ),
    }
}

#[cfg(test)]
#[path = "s3_presign_test.rs"]
mod tests;
