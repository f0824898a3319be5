use diesel::QueryResult;
use diesel::sql_types::{Double, Text};
use diesel::sqlite::SqliteConnection;

use crate::db::{DbConnection, DbPool};
use crate::domain::attachment::AttachmentRef;
use crate::domain::category::{Category, NewCategory};
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::role::Role;
use crate::domain::types::{CategoryName, EntityId, ProductName};
use crate::domain::user::{NewUser, User, UserUpdate};

pub mod category;
pub mod errors;
pub mod product;
pub mod role;
#[cfg(test)]
pub mod test;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Skip/limit window applied to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: usize,
    pub offset: usize,
}

/// Query parameters used when listing active entities of any collection.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub pagination: Option<Pagination>,
}

impl ListQuery {
    pub fn paginate(mut self, limit: usize, offset: usize) -> Self {
        self.pagination = Some(Pagination { limit, offset });
        self
    }
}

/// Escape `term` for a `LIKE ... ESCAPE '\'` substring pattern.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Whether a search term may also match a rendered price.
pub(crate) fn is_numeric_term(term: &str) -> bool {
    !term.is_empty() && term.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Case folding applied to both sides of a free-text match. SQLite's own
/// `LIKE` and `lower` only fold ASCII.
pub(crate) fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Text a price is matched against: whole amounts keep one decimal, the way
/// SQLite renders a REAL (`5.0`, `19.99`).
pub(crate) fn price_text(price: f64) -> String {
    if price.is_finite() && price.fract() == 0.0 {
        format!("{price:.1}")
    } else {
        price.to_string()
    }
}

diesel::define_sql_function! {
    /// [`fold_case`] exposed to SQL.
    fn search_fold(value: Text) -> Text;
}

diesel::define_sql_function! {
    /// [`price_text`] exposed to SQL.
    fn search_price(price: Double) -> Text;
}

/// Register the search helpers on a fresh connection.
pub(crate) fn register_search_functions(conn: &mut SqliteConnection) -> QueryResult<()> {
    search_fold_utils::register_impl(conn, |value: String| fold_case(&value))?;
    search_price_utils::register_impl(conn, |price: f64| price_text(price))?;
    Ok(())
}

/// Read-only operations for roles.
pub trait RoleReader {
    /// Retrieve a role by its name.
    fn get_role(&self, name: &str) -> RepositoryResult<Option<Role>>;
}

/// Read-only operations for users.
pub trait UserReader {
    /// List active users; the count ignores pagination.
    fn list_users(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    /// Retrieve a user by id whether or not it is active.
    fn get_user_by_id(&self, id: &EntityId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    /// Active users whose name or email contains `term`, ignoring case.
    fn search_users(&self, term: &str) -> RepositoryResult<Vec<User>>;
}

/// Write operations for users.
pub trait UserWriter {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
    /// Apply `update`, returning `None` when no user has `id`.
    fn update_user(&self, id: &EntityId, update: &UserUpdate) -> RepositoryResult<Option<User>>;
    /// Soft-delete a user.
    fn deactivate_user(&self, id: &EntityId) -> RepositoryResult<Option<User>>;
    /// Replace (or clear) the stored image reference.
    fn set_user_image(
        &self,
        id: &EntityId,
        image: Option<&AttachmentRef>,
    ) -> RepositoryResult<Option<User>>;
}

/// Read-only operations for categories.
pub trait CategoryReader {
    /// List active categories; the count ignores pagination.
    fn list_categories(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<Category>)>;
    /// Retrieve a category by id whether or not it is active.
    fn get_category_by_id(&self, id: &EntityId) -> RepositoryResult<Option<Category>>;
    fn get_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>>;
    /// Active categories whose name contains `term`, ignoring case.
    fn search_categories(&self, term: &str) -> RepositoryResult<Vec<Category>>;
}

/// Write operations for categories.
pub trait CategoryWriter {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Rename a category and record the user who changed it.
    fn update_category(
        &self,
        id: &EntityId,
        name: &CategoryName,
        user_id: &EntityId,
    ) -> RepositoryResult<Option<Category>>;
    /// Soft-delete a category.
    fn deactivate_category(&self, id: &EntityId) -> RepositoryResult<Option<Category>>;
}

/// Read-only operations for products.
pub trait ProductReader {
    /// List active products; the count ignores pagination.
    fn list_products(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Retrieve a product by id whether or not it is active.
    fn get_product_by_id(&self, id: &EntityId) -> RepositoryResult<Option<Product>>;
    fn get_product_by_name(&self, name: &ProductName) -> RepositoryResult<Option<Product>>;
    /// Active products whose name (or, for numeric terms, price) contains
    /// `term`, ignoring case.
    fn search_products(&self, term: &str) -> RepositoryResult<Vec<Product>>;
}

/// Write operations for products.
pub trait ProductWriter {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(
        &self,
        id: &EntityId,
        update: &ProductUpdate,
    ) -> RepositoryResult<Option<Product>>;
    /// Soft-delete a product.
    fn deactivate_product(&self, id: &EntityId) -> RepositoryResult<Option<Product>>;
    /// Replace (or clear) the stored image reference.
    fn set_product_image(
        &self,
        id: &EntityId,
        image: Option<&AttachmentRef>,
    ) -> RepositoryResult<Option<Product>>;
}
