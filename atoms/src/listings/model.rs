
use serde::{Deserialize, Serialize};

/// Listing header - only what image authorisation needs
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Listing {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub slug: String,
}
