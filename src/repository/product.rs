use chrono::Utc;
use diesel::prelude::*;

use crate::domain::attachment::AttachmentRef;
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::{EntityId, ProductName};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset, ProductWithRelations,
};
use crate::repository::{
    DieselRepository, ListQuery, ProductReader, ProductWriter, RepositoryResult, fold_case,
    is_numeric_term, like_pattern, search_fold, search_price,
};

fn load_product(conn: &mut SqliteConnection, id: &EntityId) -> RepositoryResult<Option<Product>> {
    use crate::schema::{categories, products, users};

    let product = products::table
        .inner_join(categories::table)
        .inner_join(users::table)
        .filter(products::id.eq(id.as_str()))
        .select((products::all_columns, categories::name, users::name))
        .first::<ProductWithRelations>(conn)
        .optional()?;

    Ok(product.map(TryInto::try_into).transpose()?)
}

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        use crate::schema::{categories, products, users};

        let mut conn = self.conn()?;

        let query_builder = || {
            products::table
                .inner_join(categories::table)
                .inner_join(users::table)
                .filter(products::active.eq(true))
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
            .select((products::all_columns, categories::name, users::name))
            .load::<ProductWithRelations>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok((total, items))
    }

    fn get_product_by_id(&self, id: &EntityId) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;
        load_product(&mut conn, id)
    }

    fn get_product_by_name(&self, name: &ProductName) -> RepositoryResult<Option<Product>> {
        use crate::schema::{categories, products, users};

        let mut conn = self.conn()?;

        let product = products::table
            .inner_join(categories::table)
            .inner_join(users::table)
            .filter(products::name.eq(name.as_str()))
            .select((products::all_columns, categories::name, users::name))
            .first::<ProductWithRelations>(&mut conn)
            .optional()?;

        Ok(product.map(TryInto::try_into).transpose()?)
    }

    fn search_products(&self, term: &str) -> RepositoryResult<Vec<Product>> {
        use crate::schema::{categories, products, users};

        let mut conn = self.conn()?;
        let pattern = like_pattern(&fold_case(term));

        let mut items = products::table
            .inner_join(categories::table)
            .inner_join(users::table)
            .filter(products::active.eq(true))
            .into_boxed::<diesel::sqlite::Sqlite>();

        let name_matches = search_fold(products::name)
            .like(pattern)
            .escape('\\');
        if is_numeric_term(term) {
            // Numeric terms can only contain digits and dots, so no escaping is needed.
            let price_matches = search_price(products::price).like(format!("%{term}%"));
            items = items.filter(name_matches.or(price_matches));
        } else {
            items = items.filter(name_matches);
        }

        let items = items
            .select((products::all_columns, categories::name, users::name))
            .load::<ProductWithRelations>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok(items)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.clone().into();

        diesel::insert_into(products::table)
            .values(db_product)
            .execute(&mut conn)?;

        load_product(&mut conn, &product.id)?
            .ok_or_else(|| diesel::result::Error::NotFound.into())
    }

    fn update_product(
        &self,
        id: &EntityId,
        update: &ProductUpdate,
    ) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let changeset = ProductChangeset::new(update, Utc::now().naive_utc());

        let affected = diesel::update(products::table.find(id.as_str()))
            .set(&changeset)
            .execute(&mut conn)?;

        if affected == 0 {
            return Ok(None);
        }
        load_product(&mut conn, id)
    }

    fn deactivate_product(&self, id: &EntityId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let affected = diesel::update(products::table.find(id.as_str()))
            .set((
                products::active.eq(false),
                products::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Ok(None);
        }
        load_product(&mut conn, id)
    }

    fn set_product_image(
        &self,
        id: &EntityId,
        image: Option<&AttachmentRef>,
    ) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let affected = diesel::update(products::table.find(id.as_str()))
            .set((
                products::image.eq(image.map(AttachmentRef::location)),
                products::image_source.eq(image.map(AttachmentRef::source)),
                products::image_public_id.eq(image
                    .and_then(AttachmentRef::public_id)
                    .map(|public_id| public_id.as_str())),
                products::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Ok(None);
        }
        load_product(&mut conn, id)
    }
}
