use diesel::prelude::*;

use crate::domain::role::Role as DomainRole;
use crate::domain::types::{RoleName, TypeConstraintError};

/// Diesel model representing the `roles` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::roles, primary_key(name))]
pub struct Role {
    pub name: String,
}

impl TryFrom<Role> for DomainRole {
    type Error = TypeConstraintError;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        Ok(Self {
            name: RoleName::new(role.name)?,
        })
    }
}
