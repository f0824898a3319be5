use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{Category as DomainCategory, NewCategory as DomainNewCategory};
use crate::domain::types::{CategoryName, EntityRef, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub user_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A category row joined with the name of its owner.
pub type CategoryWithOwner = (Category, String);

impl TryFrom<CategoryWithOwner> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from((category, owner_name): CategoryWithOwner) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
            active: category.active,
            user: EntityRef {
                id: category.user_id.try_into()?,
                name: owner_name,
            },
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl From<DomainNewCategory> for NewCategory {
    fn from(category: DomainNewCategory) -> Self {
        Self {
            id: category.id.into_inner(),
            name: category.name.into_inner(),
            user_id: category.user_id.into_inner(),
            created_at: category.created_at,
            updated_at: category.created_at,
        }
    }
}
