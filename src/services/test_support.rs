//! Fixtures shared by the service unit tests.

use chrono::Utc;

use crate::auth::PasswordHasher;
use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryName, Email, EntityId, RoleName, UserName};
use crate::domain::user::{NewUser, User};
use crate::repository::test::TestRepository;
use crate::repository::{CategoryWriter, UserWriter};

/// Cheapest bcrypt cost, keeping tests fast.
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(4)
}

/// Insert an active user with password `secret1` and an email derived from `name`.
pub fn seed_user(repo: &TestRepository, name: &str, role: &str) -> User {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    repo.create_user(&NewUser {
        id: EntityId::generate(),
        name: UserName::new(name).unwrap(),
        email: Email::new(email).unwrap(),
        password_hash: test_hasher().hash("secret1").unwrap(),
        role: RoleName::new(role).unwrap(),
        image: None,
        google: false,
        created_at: Utc::now().naive_utc(),
    })
    .unwrap()
}

pub fn seed_category(repo: &TestRepository, name: &str, owner: &User) -> Category {
    repo.create_category(&NewCategory {
        id: EntityId::generate(),
        name: CategoryName::new(name).unwrap(),
        user_id: owner.id.clone(),
        created_at: Utc::now().naive_utc(),
    })
    .unwrap()
}
