use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::types::AttributeValue;
use super::model::Listing;

pub const LISTING_NOT_FOUND: &str = "Listing not found";
pub const NOT_LISTING_OWNER: &str = "Cannot modify another user's listing";

/// Get a listing header
pub async fn get_listing(
    client: &DynamoClient,
    table_name: &str,
    listing_id: &str,
) -> Result<Listing, String> {
    let pk = format!("LISTING#{}", listing_id);

    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk.clone()))
        .key("SK", AttributeValue::S(pk))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    if let Some(item) = result.item() {
        Ok(Listing {
            id: listing_id.to_string(),
            user_id: item.get("user_id").and_then(|v| v.as_s().ok()).map(|s| s.to_string()).unwrap_or_default(),
            title: item.get("title").and_then(|v| v.as_s().ok()).map(|s| s.to_string()).unwrap_or_default(),
            slug: item.get("slug").and_then(|v| v.as_s().ok()).map(|s| s.to_string()).unwrap_or_default(),
        })
    } else {
        Err(LISTING_NOT_FOUND.to_string())
    }
}

/// Check that `user_id` is the seller
pub fn check_owner(listing: &Listing, user_id: &str) -> Result<(), String> {
    if !user_id.is_empty() && listing.user_id == user_id {
        Ok(())
    } else {
        Err(NOT_LISTING_OWNER.to_string())
    }
}

/// Load the listing and check that `user_id` is the seller
pub async fn ensure_listing_owner(
    client: &DynamoClient,
    table_name: &str,
    listing_id: &str,
    user_id: &str,
) -> Result<Listing, String> {
    let listing = get_listing(client, table_name, listing_id).await?;
    if let Err(e) = check_owner(&listing, user_id) {
        tracing::warn!(
            "⛔ Listing owner check failed: listing_id={}, owner={}, caller={}",
            listing_id,
            listing.user_id,
            user_id
        );
        return Err(e);
    }
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(user_id: &str) -> Listing {
        Listing {
            id: "l1".to_string(),
            user_id: user_id.to_string(),
            title: "Bicicleta".to_string(),
            slug: "bicicleta".to_string(),
        }
    }

    #[test]
    fn owner_passes() {
        assert!(check_owner(&listing("u1"), "u1").is_ok());
    }

    #[test]
    fn other_user_is_rejected() {
        assert_eq!(check_owner(&listing("u1"), "u2"), Err(NOT_LISTING_OWNER.to_string()));
    }

    #[test]
    fn empty_ids_never_match() {
        assert!(check_owner(&listing(""), "").is_err());
    }
}
