use std::sync::Mutex;

use chrono::Utc;
use diesel::result::DatabaseErrorKind;
use diesel::result::Error::DatabaseError;

use crate::domain::attachment::AttachmentRef;
use crate::domain::category::{Category, NewCategory};
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::role::{ADMIN_ROLE, Role, SALES_ROLE, USER_ROLE};
use crate::domain::types::{CategoryName, EntityId, EntityRef, ProductName, RoleName};
use crate::domain::user::{NewUser, User, UserUpdate};
use crate::repository::{
    CategoryReader, CategoryWriter, ListQuery, ProductReader, ProductWriter, RepositoryError,
    RepositoryResult, RoleReader, UserReader, UserWriter, fold_case, is_numeric_term, price_text,
};

#[derive(Default)]
struct State {
    users: Vec<User>,
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// Simple in-memory repository used for unit tests.
pub struct TestRepository {
    roles: Vec<Role>,
    state: Mutex<State>,
}

impl Default for TestRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepository {
    /// Repository holding only the seeded roles.
    pub fn new() -> Self {
        let roles = [ADMIN_ROLE, USER_ROLE, SALES_ROLE]
            .into_iter()
            .filter_map(|name| RoleName::new(name).ok())
            .map(|name| Role { name })
            .collect();
        Self {
            roles,
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> RepositoryResult<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::ValidationError("poisoned test state".to_string()))
    }

    fn owner(state: &State, id: &EntityId) -> RepositoryResult<EntityRef> {
        state
            .users
            .iter()
            .find(|user| &user.id == id)
            .map(|user| EntityRef {
                id: user.id.clone(),
                name: user.name.to_string(),
            })
            .ok_or_else(|| RepositoryError::ValidationError(format!("unknown user {id}")))
    }

    fn category_ref(state: &State, id: &EntityId) -> RepositoryResult<EntityRef> {
        state
            .categories
            .iter()
            .find(|category| &category.id == id)
            .map(|category| EntityRef {
                id: category.id.clone(),
                name: category.name.to_string(),
            })
            .ok_or_else(|| RepositoryError::ValidationError(format!("unknown category {id}")))
    }
}

/// Same error SQLite reports for a UNIQUE constraint.
fn unique_violation(column: &str) -> RepositoryError {
    RepositoryError::Database(DatabaseError(
        DatabaseErrorKind::UniqueViolation,
        Box::new(format!("UNIQUE constraint failed: {column}")),
    ))
}

fn paginate<T: Clone>(items: Vec<T>, query: &ListQuery) -> (usize, Vec<T>) {
    let total = items.len();
    let items = match query.pagination {
        Some(pagination) => items
            .into_iter()
            .skip(pagination.offset)
            .take(pagination.limit)
            .collect(),
        None => items,
    };
    (total, items)
}

fn contains_ignore_case(haystack: &str, term: &str) -> bool {
    fold_case(haystack).contains(&fold_case(term))
}

impl RoleReader for TestRepository {
    fn get_role(&self, name: &str) -> RepositoryResult<Option<Role>> {
        Ok(self.roles.iter().find(|role| role.name == name).cloned())
    }
}

impl UserReader for TestRepository {
    fn list_users(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        let state = self.state()?;
        let items = state.users.iter().filter(|u| u.active).cloned().collect();
        Ok(paginate(items, &query))
    }

    fn get_user_by_id(&self, id: &EntityId) -> RepositoryResult<Option<User>> {
        Ok(self.state()?.users.iter().find(|u| &u.id == id).cloned())
    }

    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.state()?.users.iter().find(|u| u.email == email).cloned())
    }

    fn search_users(&self, term: &str) -> RepositoryResult<Vec<User>> {
        Ok(self
            .state()?
            .users
            .iter()
            .filter(|u| u.active)
            .filter(|u| contains_ignore_case(&u.name, term) || contains_ignore_case(&u.email, term))
            .cloned()
            .collect())
    }
}

impl UserWriter for TestRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let mut state = self.state()?;
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(unique_violation("users.email"));
        }
        let created = User {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role.clone(),
            image: user.image.clone(),
            active: true,
            google: user.google,
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    fn update_user(&self, id: &EntityId, update: &UserUpdate) -> RepositoryResult<Option<User>> {
        let mut state = self.state()?;
        let Some(user) = state.users.iter_mut().find(|u| &u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(hash) = &update.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(role) = &update.role {
            user.role = role.clone();
        }
        user.updated_at = Utc::now().naive_utc();
        Ok(Some(user.clone()))
    }

    fn deactivate_user(&self, id: &EntityId) -> RepositoryResult<Option<User>> {
        let mut state = self.state()?;
        Ok(state.users.iter_mut().find(|u| &u.id == id).map(|user| {
            user.active = false;
            user.clone()
        }))
    }

    fn set_user_image(
        &self,
        id: &EntityId,
        image: Option<&AttachmentRef>,
    ) -> RepositoryResult<Option<User>> {
        let mut state = self.state()?;
        Ok(state.users.iter_mut().find(|u| &u.id == id).map(|user| {
            user.image = image.cloned();
            user.clone()
        }))
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<Category>)> {
        let state = self.state()?;
        let items = state.categories.iter().filter(|c| c.active).cloned().collect();
        Ok(paginate(items, &query))
    }

    fn get_category_by_id(&self, id: &EntityId) -> RepositoryResult<Option<Category>> {
        Ok(self.state()?.categories.iter().find(|c| &c.id == id).cloned())
    }

    fn get_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>> {
        Ok(self
            .state()?
            .categories
            .iter()
            .find(|c| &c.name == name)
            .cloned())
    }

    fn search_categories(&self, term: &str) -> RepositoryResult<Vec<Category>> {
        Ok(self
            .state()?
            .categories
            .iter()
            .filter(|c| c.active && contains_ignore_case(&c.name, term))
            .cloned()
            .collect())
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let mut state = self.state()?;
        if state.categories.iter().any(|c| c.name == category.name) {
            return Err(unique_violation("name"));
        }
        let created = Category {
            id: category.id.clone(),
            name: category.name.clone(),
            active: true,
            user: Self::owner(&state, &category.user_id)?,
            created_at: category.created_at,
            updated_at: category.created_at,
        };
        state.categories.push(created.clone());
        Ok(created)
    }

    fn update_category(
        &self,
        id: &EntityId,
        name: &CategoryName,
        user_id: &EntityId,
    ) -> RepositoryResult<Option<Category>> {
        let mut state = self.state()?;
        let owner = Self::owner(&state, user_id)?;
        Ok(state.categories.iter_mut().find(|c| &c.id == id).map(|category| {
            category.name = name.clone();
            category.user = owner;
            category.updated_at = Utc::now().naive_utc();
            category.clone()
        }))
    }

    fn deactivate_category(&self, id: &EntityId) -> RepositoryResult<Option<Category>> {
        let mut state = self.state()?;
        Ok(state.categories.iter_mut().find(|c| &c.id == id).map(|category| {
            category.active = false;
            category.clone()
        }))
    }
}

impl ProductReader for TestRepository {
    fn list_products(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let state = self.state()?;
        let items = state.products.iter().filter(|p| p.active).cloned().collect();
        Ok(paginate(items, &query))
    }

    fn get_product_by_id(&self, id: &EntityId) -> RepositoryResult<Option<Product>> {
        Ok(self.state()?.products.iter().find(|p| &p.id == id).cloned())
    }

    fn get_product_by_name(&self, name: &ProductName) -> RepositoryResult<Option<Product>> {
        Ok(self
            .state()?
            .products
            .iter()
            .find(|p| &p.name == name)
            .cloned())
    }

    fn search_products(&self, term: &str) -> RepositoryResult<Vec<Product>> {
        let numeric = is_numeric_term(term);
        Ok(self
            .state()?
            .products
            .iter()
            .filter(|p| p.active)
            .filter(|p| {
                contains_ignore_case(&p.name, term)
                    || (numeric && price_text(p.price.get()).contains(term))
            })
            .cloned()
            .collect())
    }
}

impl ProductWriter for TestRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let mut state = self.state()?;
        if state.products.iter().any(|p| p.name == product.name) {
            return Err(unique_violation("name"));
        }
        let created = Product {
            id: product.id.clone(),
            name: product.name.clone(),
            active: true,
            user: Self::owner(&state, &product.user_id)?,
            price: product.price,
            category: Self::category_ref(&state, &product.category_id)?,
            description: product.description.clone(),
            available: product.available,
            image: None,
            created_at: product.created_at,
            updated_at: product.created_at,
        };
        state.products.push(created.clone());
        Ok(created)
    }

    fn update_product(
        &self,
        id: &EntityId,
        update: &ProductUpdate,
    ) -> RepositoryResult<Option<Product>> {
        let mut state = self.state()?;
        let owner = Self::owner(&state, &update.user_id)?;
        let category = update
            .category_id
            .as_ref()
            .map(|category_id| Self::category_ref(&state, category_id))
            .transpose()?;
        Ok(state.products.iter_mut().find(|p| &p.id == id).map(|product| {
            product.user = owner;
            if let Some(name) = &update.name {
                product.name = name.clone();
            }
            if let Some(price) = update.price {
                product.price = price;
            }
            if let Some(category) = category {
                product.category = category;
            }
            if let Some(description) = &update.description {
                product.description = Some(description.clone());
            }
            if let Some(available) = update.available {
                product.available = available;
            }
            product.updated_at = Utc::now().naive_utc();
            product.clone()
        }))
    }

    fn deactivate_product(&self, id: &EntityId) -> RepositoryResult<Option<Product>> {
        let mut state = self.state()?;
        Ok(state.products.iter_mut().find(|p| &p.id == id).map(|product| {
            product.active = false;
            product.clone()
        }))
    }

    fn set_product_image(
        &self,
        id: &EntityId,
        image: Option<&AttachmentRef>,
    ) -> RepositoryResult<Option<Product>> {
        let mut state = self.state()?;
        Ok(state.products.iter_mut().find(|p| &p.id == id).map(|product| {
            product.image = image.cloned();
            product.clone()
        }))
    }
}
