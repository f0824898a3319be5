use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::attachment::AttachmentRef;
use crate::domain::types::{EntityId, EntityRef, ProductDescription, ProductName, ProductPrice};

/// A catalog product together with the names of its category and owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: EntityId,
    pub name: ProductName,
    pub active: bool,
    pub user: EntityRef,
    pub price: ProductPrice,
    pub category: EntityRef,
    pub description: Option<ProductDescription>,
    pub available: bool,
    pub image: Option<AttachmentRef>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Information required to create a new [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub id: EntityId,
    pub name: ProductName,
    pub user_id: EntityId,
    pub price: ProductPrice,
    pub category_id: EntityId,
    pub description: Option<ProductDescription>,
    pub available: bool,
    pub created_at: NaiveDateTime,
}

/// Fields a product update may change. The writing user is always recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub user_id: EntityId,
    pub name: Option<ProductName>,
    pub price: Option<ProductPrice>,
    pub category_id: Option<EntityId>,
    pub description: Option<ProductDescription>,
    pub available: Option<bool>,
}
