use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::attachment::AttachmentRef;
use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductUpdate as DomainProductUpdate,
};
use crate::domain::types::{
    EntityRef, ProductDescription, ProductName, ProductPrice, TypeConstraintError,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub user_id: String,
    pub price: f64,
    pub category_id: String,
    pub description: Option<String>,
    pub available: bool,
    pub image: Option<String>,
    pub image_source: Option<String>,
    pub image_public_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub price: f64,
    pub category_id: String,
    pub description: Option<String>,
    pub available: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Patch applied by an update; `None` fields are left untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductChangeset {
    pub user_id: String,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl ProductChangeset {
    pub fn new(update: &DomainProductUpdate, updated_at: NaiveDateTime) -> Self {
        Self {
            user_id: update.user_id.as_str().to_string(),
            name: update.name.as_ref().map(|name| name.as_str().to_string()),
            price: update.price.map(|price| price.get()),
            category_id: update.category_id.as_ref().map(|id| id.as_str().to_string()),
            description: update
                .description
                .as_ref()
                .map(|description| description.as_str().to_string()),
            available: update.available,
            updated_at,
        }
    }
}

/// A product row joined with its category name and owner name.
pub type ProductWithRelations = (Product, String, String);

impl TryFrom<ProductWithRelations> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(
        (product, category_name, owner_name): ProductWithRelations,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            name: ProductName::new(product.name)?,
            active: product.active,
            user: EntityRef {
                id: product.user_id.try_into()?,
                name: owner_name,
            },
            price: ProductPrice::new(product.price)?,
            category: EntityRef {
                id: product.category_id.try_into()?,
                name: category_name,
            },
            description: product
                .description
                .filter(|description| !description.trim().is_empty())
                .map(ProductDescription::new)
                .transpose()?,
            available: product.available,
            image: AttachmentRef::from_columns(
                product.image,
                product.image_source,
                product.image_public_id,
            )?,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl From<DomainNewProduct> for NewProduct {
    fn from(product: DomainNewProduct) -> Self {
        Self {
            id: product.id.into_inner(),
            name: product.name.into_inner(),
            user_id: product.user_id.into_inner(),
            price: product.price.get(),
            category_id: product.category_id.into_inner(),
            description: product.description.map(String::from),
            available: product.available,
            created_at: product.created_at,
            updated_at: product.created_at,
        }
    }
}
