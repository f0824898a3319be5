use serde::{Deserialize, Serialize};

use crate::domain::types::RoleName;

pub const ADMIN_ROLE: &str = "ADMIN_ROLE";
pub const USER_ROLE: &str = "USER_ROLE";
pub const SALES_ROLE: &str = "VENTAS_ROLE";

/// A role a user may be assigned. Roles are seeded by migrations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub name: RoleName,
}
