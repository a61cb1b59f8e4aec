use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::types::AttributeValue;
use super::model::{ListingImage, CreateListingImagePayload, UpdateListingImagePayload};
use std::collections::HashMap;
use std::cmp::Ordering;

pub const IMAGE_NOT_FOUND: &str = "Image not found";

fn listing_pk(listing_id: &str) -> String {
    format!("LISTING#{}", listing_id)
}

fn image_sk(image_id: &str) -> String {
    format!("IMAGE#{}", image_id)
}

/// Build a record from a DynamoDB item (missing attributes fall back to defaults)
pub(crate) fn image_from_item(
    listing_id: &str,
    image_id: &str,
    item: &HashMap<String, AttributeValue>,
) -> ListingImage {
    ListingImage {
        id: image_id.to_string(),
        listing_id: listing_id.to_string(),
        src: item.get("src").and_then(|v| v.as_s().ok()).map(|s| s.to_string()).unwrap_or_default(),
        order: item.get("order").and_then(|v| v.as_n().ok()).and_then(|n| n.parse().ok()),
        created_at: item.get("created_at").and_then(|v| v.as_s().ok()).map(|s| s.to_string()).unwrap_or_default(),
    }
}

/// Sort by order; images without an order go last, ties keep their query order
pub fn sort_by_order(images: &mut [ListingImage]) {
    images.sort_by(|a, b| match (a.order, b.order) {
        (Some(a_order), Some(b_order)) => a_order.cmp(&b_order),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Load all images for a listing, cover first
pub async fn load_images_for_listing(
    client: &DynamoClient,
    table_name: &str,
    listing_id: &str,
) -> Result<Vec<ListingImage>, String> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S(listing_pk(listing_id)))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("IMAGE#".to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    let mut images = Vec::new();
    for item in result.items() {
        if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
            if let Some(image_id) = sk.strip_prefix("IMAGE#") {
                images.push(image_from_item(listing_id, image_id, item));
            }
        }
    }

    sort_by_order(&mut images);

    Ok(images)
}

/// Create a new image for a listing. The listing must exist.
pub async fn create_image(
    client: &DynamoClient,
    table_name: &str,
    payload: CreateListingImagePayload,
) -> Result<ListingImage, String> {
    // Fails with "Listing not found" before anything is written
    crate::listings::service::get_listing(client, table_name, &payload.listing_id).await?;

    let image_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(listing_pk(&payload.listing_id)))
        .item("SK", AttributeValue::S(image_sk(&image_id)))
        .item("src", AttributeValue::S(payload.src.clone()))
        .item("created_at", AttributeValue::S(now.clone()));

    if let Some(order) = payload.order {
        builder = builder.item("order", AttributeValue::N(order.to_string()));
    }

    builder.send().await.map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    tracing::info!(
        "🖼️ Created listing image: listing_id={}, image_id={}, order={:?}",
        payload.listing_id,
        image_id,
        payload.order
    );

    Ok(ListingImage {
        id: image_id,
        listing_id: payload.listing_id,
        src: payload.src,
        order: payload.order,
        created_at: now,
    })
}

/// Get a specific image
pub async fn get_image(
    client: &DynamoClient,
    table_name: &str,
    listing_id: &str,
    image_id: &str,
) -> Result<ListingImage, String> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(listing_pk(listing_id)))
        .key("SK", AttributeValue::S(image_sk(image_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    match result.item() {
        Some(item) => Ok(image_from_item(listing_id, image_id, item)),
        None => Err(IMAGE_NOT_FOUND.to_string()),
    }
}

/// Update an image's order and/or src
pub async fn update_image(
    client: &DynamoClient,
    table_name: &str,
    listing_id: &str,
    image_id: &str,
    payload: UpdateListingImagePayload,
) -> Result<ListingImage, String> {
    // 404 instead of silently upserting a new item
    get_image(client, table_name, listing_id, image_id).await?;

    let mut update_expr = vec![];
    let mut expr_names = HashMap::new();
    let mut expr_values = HashMap::new();

    if let Some(src) = payload.src {
        update_expr.push("#src = :src");
        expr_names.insert("#src".to_string(), "src".to_string());
        expr_values.insert(":src".to_string(), AttributeValue::S(src));
    }

    if let Some(order) = payload.order {
        update_expr.push("#order = :order");
        expr_names.insert("#order".to_string(), "order".to_string());
        expr_values.insert(":order".to_string(), AttributeValue::N(order.to_string()));
    }

    if !update_expr.is_empty() {
        let update_expression = format!("SET {}", update_expr.join(", "));

        let mut builder = client
            .update_item()
            .table_name(table_name)
            .key("PK", AttributeValue::S(listing_pk(listing_id)))
            .key("SK", AttributeValue::S(image_sk(image_id)))
            .update_expression(update_expression);

        for (k, v) in expr_names {
            builder = builder.expression_attribute_names(k, v);
        }

        for (k, v) in expr_values {
            builder = builder.expression_attribute_values(k, v);
        }

        builder.send().await.map_err(|e| format!("DynamoDB update_item error: {}", e))?;
    }

    get_image(client, table_name, listing_id, image_id).await
}

/// Delete an image
pub async fn delete_image(
    client: &DynamoClient,
    table_name: &str,
    listing_id: &str,
    image_id: &str,
) -> Result<(), String> {
    get_image(client, table_name, listing_id, image_id).await?;

    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(listing_pk(listing_id)))
        .key("SK", AttributeValue::S(image_sk(image_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;

    tracing::info!("🗑️ Deleted listing image: listing_id={}, image_id={}", listing_id, image_id);

    Ok(())
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
