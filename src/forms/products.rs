use serde::Deserialize;
use thiserror::Error;

use crate::domain::types::{
    EntityId, ProductDescription, ProductName, ProductPrice, TypeConstraintError,
};

/// Body of `POST /productos`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProductForm {
    #[serde(alias = "nombre")]
    pub name: Option<String>,
    #[serde(alias = "categoria")]
    pub category: Option<String>,
    #[serde(alias = "precio")]
    pub price: Option<f64>,
    #[serde(alias = "descripcion")]
    pub description: Option<String>,
    #[serde(alias = "disponible")]
    pub available: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductPayload {
    pub name: ProductName,
    pub category_id: EntityId,
    pub price: ProductPrice,
    pub description: Option<ProductDescription>,
    pub available: bool,
}

/// Body of `PUT /productos/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductForm {
    #[serde(alias = "nombre")]
    pub name: Option<String>,
    #[serde(alias = "categoria")]
    pub category: Option<String>,
    #[serde(alias = "precio")]
    pub price: Option<f64>,
    #[serde(alias = "descripcion")]
    pub description: Option<String>,
    #[serde(alias = "disponible")]
    pub available: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductPayload {
    pub name: Option<ProductName>,
    pub category_id: Option<EntityId>,
    pub price: Option<ProductPrice>,
    pub description: Option<ProductDescription>,
    pub available: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("product form is missing {0}")]
    Missing(&'static str),
    #[error("product form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

fn upper_name(name: String) -> Result<ProductName, TypeConstraintError> {
    ProductName::new(name.to_uppercase())
}

fn description(value: Option<String>) -> Result<Option<ProductDescription>, TypeConstraintError> {
    value
        .filter(|description| !description.trim().is_empty())
        .map(ProductDescription::new)
        .transpose()
}

impl TryFrom<CreateProductForm> for CreateProductPayload {
    type Error = ProductFormError;

    fn try_from(value: CreateProductForm) -> Result<Self, Self::Error> {
        Ok(Self {
            name: upper_name(value.name.ok_or(ProductFormError::Missing("name"))?)?,
            category_id: EntityId::new(
                value.category.ok_or(ProductFormError::Missing("category"))?,
            )?,
            price: ProductPrice::new(value.price.unwrap_or(0.0))?,
            description: description(value.description)?,
            available: value.available.unwrap_or(true),
        })
    }
}

impl TryFrom<UpdateProductForm> for UpdateProductPayload {
    type Error = ProductFormError;

    fn try_from(value: UpdateProductForm) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.map(upper_name).transpose()?,
            category_id: value.category.map(EntityId::new).transpose()?,
            price: value.price.map(ProductPrice::new).transpose()?,
            description: description(value.description)?,
            available: value.available,
        })
    }
}
