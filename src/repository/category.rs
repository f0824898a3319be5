use chrono::Utc;
use diesel::prelude::*;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryName, EntityId};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::{
    CategoryReader, CategoryWriter, DieselRepository, ListQuery, RepositoryResult, fold_case,
    like_pattern, search_fold,
};

fn load_category(
    conn: &mut SqliteConnection,
    id: &EntityId,
) -> RepositoryResult<Option<Category>> {
    use crate::schema::{categories, users};

    let category = categories::table
        .inner_join(users::table)
        .filter(categories::id.eq(id.as_str()))
        .select((categories::all_columns, users::name))
        .first::<(DbCategory, String)>(conn)
        .optional()?;

    Ok(category.map(TryInto::try_into).transpose()?)
}

impl CategoryReader for DieselRepository {
    fn list_categories(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<Category>)> {
        use crate::schema::{categories, users};

        let mut conn = self.conn()?;

        let query_builder = || {
            categories::table
                .inner_join(users::table)
                .filter(categories::active.eq(true))
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
            .select((categories::all_columns, users::name))
            .load::<(DbCategory, String)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok((total, items))
    }

    fn get_category_by_id(&self, id: &EntityId) -> RepositoryResult<Option<Category>> {
        let mut conn = self.conn()?;
        load_category(&mut conn, id)
    }

    fn get_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>> {
        use crate::schema::{categories, users};

        let mut conn = self.conn()?;

        let category = categories::table
            .inner_join(users::table)
            .filter(categories::name.eq(name.as_str()))
            .select((categories::all_columns, users::name))
            .first::<(DbCategory, String)>(&mut conn)
            .optional()?;

        Ok(category.map(TryInto::try_into).transpose()?)
    }

    fn search_categories(&self, term: &str) -> RepositoryResult<Vec<Category>> {
        use crate::schema::{categories, users};

        let mut conn = self.conn()?;
        let pattern = like_pattern(&fold_case(term));

        let items = categories::table
            .inner_join(users::table)
            .filter(categories::active.eq(true))
            .filter(search_fold(categories::name).like(pattern).escape('\\'))
            .select((categories::all_columns, users::name))
            .load::<(DbCategory, String)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        diesel::insert_into(categories::table)
            .values(db_category)
            .execute(&mut conn)?;

        load_category(&mut conn, &category.id)?
            .ok_or_else(|| diesel::result::Error::NotFound.into())
    }

    fn update_category(
        &self,
        id: &EntityId,
        name: &CategoryName,
        user_id: &EntityId,
    ) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::update(categories::table.find(id.as_str()))
            .set((
                categories::name.eq(name.as_str()),
                categories::user_id.eq(user_id.as_str()),
                categories::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Ok(None);
        }
        load_category(&mut conn, id)
    }

    fn deactivate_category(&self, id: &EntityId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::update(categories::table.find(id.as_str()))
            .set((
                categories::active.eq(false),
                categories::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Ok(None);
        }
        load_category(&mut conn, id)
    }
}
