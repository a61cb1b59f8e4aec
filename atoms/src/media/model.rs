
use serde::{Deserialize, Serialize};

/// Listing image record - one photo of a listing, `order` 0 is the cover
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ListingImage {
    pub id: String,
    pub listing_id: String,
    pub src: String,
    pub order: Option<i32>,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CreateListingImagePayload {
    pub listing_id: String,
    pub src: String,
    pub order: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UpdateListingImagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}
