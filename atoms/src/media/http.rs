use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{Body, Error as LambdaError, Response, http::StatusCode};
use serde::Serialize;
use super::model::{CreateListingImagePayload, UpdateListingImagePayload};
use super::service::{self, IMAGE_NOT_FOUND};
use crate::listings::{self, LISTING_NOT_FOUND, NOT_LISTING_OWNER};

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(body)?.into())
        .map_err(Box::new)?)
}

fn error_response(status: StatusCode, message: &str) -> Result<Response<Body>, LambdaError> {
    json_response(status, &serde_json::json!({ "error": message }))
}

/// Maps service error strings to statuses
fn status_for(error: &str) -> StatusCode {
    match error {
        IMAGE_NOT_FOUND | LISTING_NOT_FOUND => StatusCode::NOT_FOUND,
        NOT_LISTING_OWNER => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A missing listing is a bad request body on create, not a missing resource
fn create_rejection(error: &str) -> (StatusCode, &str) {
    match error {
        LISTING_NOT_FOUND => (StatusCode::BAD_REQUEST, "Invalid listing_id"),
        _ => (status_for(error), error),
    }
}

/// HTTP Handler: GET /listing-images/listing/{listing_id}
pub async fn list_listing_images_handler(
    client: &DynamoClient,
    table_name: &str,
    listing_id: &str,
) -> Result<Response<Body>, LambdaError> {
    match service::load_images_for_listing(client, table_name, listing_id).await {
        Ok(images) => json_response(StatusCode::OK, &images),
        Err(e) => {
            tracing::error!(
                "❌ list_listing_images_handler failed: table={}, listing_id={}, error={}",
                table_name,
                listing_id,
                e
            );
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve images")
        }
    }
}

/// HTTP Handler: GET /listing-images/{id}
pub async fn get_listing_image_handler(
    client: &DynamoClient,
    table_name: &str,
    listing_id: &str,
    image_id: &str,
) -> Result<Response<Body>, LambdaError> {
    match service::get_image(client, table_name, listing_id, image_id).await {
        Ok(image) => json_response(StatusCode::OK, &image),
        Err(e) => error_response(status_for(&e), &e),
    }
}

/// HTTP Handler: POST /listing-images - seller only
pub async fn create_listing_image_handler(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: CreateListingImagePayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    tracing::info!(
        "📥 create_listing_image_handler: user_id={}, listing_id={}, order={:?}",
        user_id,
        payload.listing_id,
        payload.order
    );

    if let Err(e) = listings::ensure_listing_owner(client, table_name, &payload.listing_id, user_id).await {
        let (status, message) = create_rejection(&e);
        return error_response(status, message);
    }

    match service::create_image(client, table_name, payload).await {
        Ok(image) => json_response(StatusCode::CREATED, &image),
        Err(e) if e == LISTING_NOT_FOUND => error_response(StatusCode::BAD_REQUEST, "Invalid listing_id"),
        Err(e) => {
            tracing::error!("❌ create_listing_image_handler failed: user_id={}, error={}", user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create image")
        }
    }
}

/// HTTP Handler: PUT /listing-images/{id} - seller only
pub async fn update_listing_image_handler(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    listing_id: &str,
    image_id: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: UpdateListingImagePayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    if let Err(e) = listings::ensure_listing_owner(client, table_name, listing_id, user_id).await {
        return error_response(status_for(&e), &e);
    }

    match service::update_image(client, table_name, listing_id, image_id, payload).await {
        Ok(image) => json_response(StatusCode::OK, &image),
        Err(e) => {
            tracing::error!(
                "❌ update_listing_image_handler failed: listing_id={}, image_id={}, error={}",
                listing_id,
                image_id,
                e
            );
            error_response(status_for(&e), &e)
        }
    }
}

/// HTTP Handler: DELETE /listing-images/{id} - seller only
pub async fn delete_listing_image_handler(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    listing_id: &str,
    image_id: &str,
) -> Result<Response<Body>, LambdaError> {
    if let Err(e) = listings::ensure_listing_owner(client, table_name, listing_id, user_id).await {
        return error_response(status_for(&e), &e);
    }

    match service::delete_image(client, table_name, listing_id, image_id).await {
        Ok(()) => json_response(StatusCode::OK, &serde_json::json!({ "message": "Image deleted" })),
        Err(e) => {
            tracing::error!(
                "❌ delete_listing_image_handler failed: listing_id={}, image_id={}, error={}",
                listing_id,
                image_id,
                e
            );
            error_response(status_for(&e), &e)
        }
    }
}
