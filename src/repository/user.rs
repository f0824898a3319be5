use chrono::Utc;
use diesel::prelude::*;

use crate::domain::attachment::AttachmentRef;
use crate::domain::types::EntityId;
use crate::domain::user::{NewUser, User, UserUpdate};
use crate::models::user::{NewUser as DbNewUser, User as DbUser, UserChangeset};
use crate::repository::{
    DieselRepository, ListQuery, RepositoryResult, UserReader, UserWriter, fold_case,
    like_pattern, search_fold,
};

fn load_user(conn: &mut SqliteConnection, id: &EntityId) -> RepositoryResult<Option<User>> {
    use crate::schema::users;

    let user = users::table
        .find(id.as_str())
        .first::<DbUser>(conn)
        .optional()?;

    Ok(user.map(TryInto::try_into).transpose()?)
}

impl UserReader for DieselRepository {
    fn list_users(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let query_builder = || {
            users::table
                .filter(users::active.eq(true))
                .into_boxed::<diesel::sqlite::Sqlite>()
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset as i64)
                .limit(pagination.limit as i64);
        }

        let items = items
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<User>, _>>()?;

        Ok((total, items))
    }

    fn get_user_by_id(&self, id: &EntityId) -> RepositoryResult<Option<User>> {
        let mut conn = self.conn()?;
        load_user(&mut conn, id)
    }

    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::email.eq(email))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }

    fn search_users(&self, term: &str) -> RepositoryResult<Vec<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let pattern = like_pattern(&fold_case(term));

        let items = users::table
            .filter(users::active.eq(true))
            .filter(
                search_fold(users::name)
                    .like(pattern.as_str())
                    .escape('\\')
                    .or(search_fold(users::email).like(pattern.as_str()).escape('\\')),
            )
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<User>, _>>()?;

        Ok(items)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user: DbNewUser = user.clone().into();

        diesel::insert_into(users::table)
            .values(db_user)
            .execute(&mut conn)?;

        load_user(&mut conn, &user.id)?.ok_or_else(|| diesel::result::Error::NotFound.into())
    }

    fn update_user(&self, id: &EntityId, update: &UserUpdate) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let changeset = UserChangeset::new(update, Utc::now().naive_utc());

        let affected = diesel::update(users::table.find(id.as_str()))
            .set(&changeset)
            .execute(&mut conn)?;

        if affected == 0 {
            return Ok(None);
        }
        load_user(&mut conn, id)
    }

    fn deactivate_user(&self, id: &EntityId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let affected = diesel::update(users::table.find(id.as_str()))
            .set((
                users::active.eq(false),
                users::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Ok(None);
        }
        load_user(&mut conn, id)
    }

    fn set_user_image(
        &self,
        id: &EntityId,
        image: Option<&AttachmentRef>,
    ) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let affected = diesel::update(users::table.find(id.as_str()))
            .set((
                users::image.eq(image.map(AttachmentRef::location)),
                users::image_source.eq(image.map(AttachmentRef::source)),
                users::image_public_id.eq(image
                    .and_then(AttachmentRef::public_id)
                    .map(|public_id| public_id.as_str())),
                users::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Ok(None);
        }
        load_user(&mut conn, id)
    }
}
