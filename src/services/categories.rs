use chrono::Utc;

use crate::domain::category::NewCategory;
use crate::domain::role::ADMIN_ROLE;
use crate::domain::types::{CategoryName, EntityId};
use crate::domain::user::User;
use crate::dto::categories::{CategoryDto, CategoryPage};
use crate::forms::categories::{CategoryForm, CategoryFormPayload};
use crate::forms::pagination::ListParams;
use crate::forms::{IdPath, path_id};
use crate::repository::{CategoryReader, CategoryWriter};
use crate::validation::{Pipeline, category_exists, entity_id, form, required};

use super::{ServiceError, ServiceResult};

async fn check_existing<R: CategoryReader>(path: &IdPath, repo: &R) -> ServiceResult<EntityId> {
    Pipeline::new()
        .then(entity_id("id", path_id))
        .then(category_exists("id", repo, path_id))
        .run(path)
        .await?;
    Ok(EntityId::new(path.id.as_str())?)
}

async fn check_name(form: &CategoryForm) -> ServiceResult<()> {
    Pipeline::new()
        .then(required("name", "name is required", |f: &CategoryForm| {
            f.name.clone()
        }))
        .run(form)
        .await?;
    Ok(())
}

/// Fails when another category already uses `name`.
fn ensure_name_free<R: CategoryReader>(
    name: &CategoryName,
    except: Option<&EntityId>,
    repo: &R,
) -> ServiceResult<()> {
    match repo.get_category_by_name(name) {
        Ok(Some(existing)) if Some(&existing.id) != except => Err(ServiceError::Form(format!(
            "category {name} already exists"
        ))),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to look up category by name: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub async fn list_categories<R>(params: ListParams, repo: &R) -> ServiceResult<CategoryPage>
where
    R: CategoryReader,
{
    Pipeline::new().then(form()).run(&params).await?;

    match repo.list_categories(params.to_query()) {
        Ok((total, categories)) => Ok(CategoryPage {
            total,
            categorias: categories.into_iter().map(CategoryDto::from).collect(),
        }),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub async fn show_category<R>(path: IdPath, repo: &R) -> ServiceResult<CategoryDto>
where
    R: CategoryReader,
{
    let id = check_existing(&path, repo).await?;

    match repo.get_category_by_id(&id) {
        Ok(Some(category)) => Ok(category.into()),
        Ok(None) => Err(ServiceError::EntityNotFound(format!(
            "no category exists with id {id}"
        ))),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub async fn create_category<R>(
    form: CategoryForm,
    actor: &User,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    check_name(&form).await?;
    let payload = CategoryFormPayload::try_from(form)?;
    ensure_name_free(&payload.name, None, repo)?;

    let category = NewCategory {
        id: EntityId::generate(),
        name: payload.name,
        user_id: actor.id.clone(),
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_category(&category) {
        Ok(category) => Ok(category.into()),
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub async fn update_category<R>(
    path: IdPath,
    form: CategoryForm,
    actor: &User,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    let id = check_existing(&path, repo).await?;
    check_name(&form).await?;
    let payload = CategoryFormPayload::try_from(form)?;
    ensure_name_free(&payload.name, Some(&id), repo)?;

    match repo.update_category(&id, &payload.name, &actor.id) {
        Ok(Some(category)) => Ok(category.into()),
        Ok(None) => Err(ServiceError::EntityNotFound(format!(
            "no category exists with id {id}"
        ))),
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Soft-delete a category. Administrators only.
pub async fn delete_category<R>(path: IdPath, actor: &User, repo: &R) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    if !actor.has_any_role(&[ADMIN_ROLE]) {
        return Err(ServiceError::Unauthorized);
    }

    let id = check_existing(&path, repo).await?;

    match repo.deactivate_category(&id) {
        Ok(Some(category)) => Ok(category.into()),
        Ok(None) => Err(ServiceError::EntityNotFound(format!(
            "no category exists with id {id}"
        ))),
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(ServiceError::Internal)
        }
    }
}
