use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryName, EntityId, EntityRef};

/// Product category, owned by the user who last wrote it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: EntityId,
    pub name: CategoryName,
    pub active: bool,
    pub user: EntityRef,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub id: EntityId,
    pub name: CategoryName,
    pub user_id: EntityId,
    pub created_at: NaiveDateTime,
}
