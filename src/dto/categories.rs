use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::types::EntityRef;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub user: EntityRef,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.into_inner(),
            name: value.name.into_inner(),
            active: value.active,
            user: value.user,
        }
    }
}

/// One page of active categories.
#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub total: usize,
    pub categorias: Vec<CategoryDto>,
}
