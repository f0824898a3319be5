use diesel::prelude::*;

use crate::domain::role::Role;
use crate::models::role::Role as DbRole;
use crate::repository::{DieselRepository, RepositoryResult, RoleReader};

impl RoleReader for DieselRepository {
    fn get_role(&self, name: &str) -> RepositoryResult<Option<Role>> {
        use crate::schema::roles;

        let mut conn = self.conn()?;

        let role = roles::table
            .find(name)
            .first::<DbRole>(&mut conn)
            .optional()?;

        Ok(role.map(TryInto::try_into).transpose()?)
    }
}
