//! Legacy marketplace records: categories and for-sale items.
//!
//! The job board grew out of a buy/sell marketplace and the store still
//! carries both collections; the client keeps read/write access to them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::fields;
use crate::domain::ports::{Document, FieldMap, FieldValue};
use crate::domain::UserId;

/// Item status written when a listing is first created.
pub const ITEM_STATUS_AVAILABLE: &str = "available";

/// Marketplace category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Store id, once saved.
    pub id: Option<String>,
    /// Category name.
    pub name: String,
    /// Icon glyph.
    pub icon: String,
    /// Short description.
    pub description: String,
}

impl Category {
    /// New, unsaved category.
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            icon: icon.into(),
            description: description.into(),
        }
    }

    /// Rebuild from a stored document.
    pub fn from_document(document: &Document) -> Self {
        let stored = &document.fields;
        Self {
            id: Some(document.id.to_string()),
            name: fields::text(stored, "name"),
            icon: fields::text(stored, "icon"),
            description: fields::text(stored, "description"),
        }
    }

    /// Field map written to the store.
    pub fn to_fields(&self) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert("name".to_owned(), self.name.clone().into());
        map.insert("icon".to_owned(), self.icon.clone().into());
        map.insert("description".to_owned(), self.description.clone().into());
        map
    }
}

/// Item listed for sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Store id, once saved.
    pub id: Option<String>,
    /// Listing title.
    pub title: String,
    /// Listing description.
    pub description: String,
    /// Asking price.
    pub price: f64,
    /// Category name.
    pub category: String,
    /// Condition label such as `Like New`.
    pub condition: String,
    /// Image URIs.
    pub images: Vec<String>,
    /// Free-text location.
    pub location: String,
    /// Selling account; may dangle.
    pub seller_id: Option<UserId>,
    /// Listing status.
    pub status: String,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Rebuild from a stored document; a missing status reads as
    /// [`ITEM_STATUS_AVAILABLE`].
    pub fn from_document(document: &Document) -> Self {
        let stored = &document.fields;
        Self {
            id: Some(document.id.to_string()),
            title: fields::text(stored, "title"),
            description: fields::text(stored, "description"),
            price: fields::number(stored, "price").unwrap_or_default(),
            category: fields::text(stored, "category"),
            condition: fields::text(stored, "condition"),
            images: fields::string_list(stored, "images"),
            location: fields::text(stored, "location"),
            seller_id: fields::optional_text(stored, "sellerId").and_then(UserId::new),
            status: fields::optional_text(stored, "status")
                .unwrap_or_else(|| ITEM_STATUS_AVAILABLE.to_owned()),
            created_at: fields::timestamp(stored, "createdAt"),
            updated_at: fields::timestamp(stored, "updatedAt"),
        }
    }

    /// Field map written to the store; timestamps are left to the access
    /// layer.
    pub fn to_fields(&self) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert("title".to_owned(), self.title.clone().into());
        map.insert("description".to_owned(), self.description.clone().into());
        map.insert("price".to_owned(), self.price.into());
        map.insert("category".to_owned(), self.category.clone().into());
        map.insert("condition".to_owned(), self.condition.clone().into());
        map.insert("images".to_owned(), FieldValue::list(self.images.clone()));
        map.insert("location".to_owned(), self.location.clone().into());
        map.insert("status".to_owned(), self.status.clone().into());
        fields::put_text(&mut map, "sellerId", self.seller_id.as_ref().map(UserId::as_str));
        map
    }
}

/// Filters accepted by item listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Only items in this category.
    pub category: Option<String>,
    /// Only items sold by this account.
    pub seller_id: Option<UserId>,
    /// Maximum result count.
    pub limit: Option<usize>,
}

impl ItemFilter {
    /// Items of one seller.
    pub fn by_seller(seller_id: UserId) -> Self {
        Self {
            seller_id: Some(seller_id),
            ..Self::default()
        }
    }
}
