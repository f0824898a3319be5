use serde::Serialize;

use crate::domain::product::Product;
use crate::domain::types::EntityRef;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub user: EntityRef,
    pub price: f64,
    pub category: EntityRef,
    pub description: Option<String>,
    pub available: bool,
    pub image: Option<String>,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.into_inner(),
            name: value.name.into_inner(),
            active: value.active,
            user: value.user,
            price: value.price.get(),
            category: value.category,
            description: value.description.map(String::from),
            available: value.available,
            image: value.image.as_ref().map(|image| image.location().to_string()),
        }
    }
}

/// One page of active products.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub total: usize,
    pub productos: Vec<ProductDto>,
}
