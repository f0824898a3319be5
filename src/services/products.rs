use chrono::Utc;

use crate::domain::product::{NewProduct, ProductUpdate};
use crate::domain::role::ADMIN_ROLE;
use crate::domain::types::{EntityId, ProductName};
use crate::domain::user::User;
use crate::dto::products::{ProductDto, ProductPage};
use crate::forms::pagination::ListParams;
use crate::forms::products::{
    CreateProductForm, CreateProductPayload, UpdateProductForm, UpdateProductPayload,
};
use crate::forms::{IdPath, path_id};
use crate::repository::{CategoryReader, ProductReader, ProductWriter};
use crate::validation::{Pipeline, category_exists, entity_id, form, product_exists, required};

use super::{ServiceError, ServiceResult};

async fn check_existing<R: ProductReader>(path: &IdPath, repo: &R) -> ServiceResult<EntityId> {
    Pipeline::new()
        .then(entity_id("id", path_id))
        .then(product_exists("id", repo, path_id))
        .run(path)
        .await?;
    Ok(EntityId::new(path.id.as_str())?)
}

/// Fails when another product already uses `name`.
fn ensure_name_free<R: ProductReader>(
    name: &ProductName,
    except: Option<&EntityId>,
    repo: &R,
) -> ServiceResult<()> {
    match repo.get_product_by_name(name) {
        Ok(Some(existing)) if Some(&existing.id) != except => Err(ServiceError::Form(format!(
            "product {name} already exists"
        ))),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to look up product by name: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub async fn list_products<R>(params: ListParams, repo: &R) -> ServiceResult<ProductPage>
where
    R: ProductReader,
{
    Pipeline::new().then(form()).run(&params).await?;

    match repo.list_products(params.to_query()) {
        Ok((total, products)) => Ok(ProductPage {
            total,
            productos: products.into_iter().map(ProductDto::from).collect(),
        }),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub async fn show_product<R>(path: IdPath, repo: &R) -> ServiceResult<ProductDto>
where
    R: ProductReader,
{
    let id = check_existing(&path, repo).await?;

    match repo.get_product_by_id(&id) {
        Ok(Some(product)) => Ok(product.into()),
        Ok(None) => Err(ServiceError::EntityNotFound(format!(
            "no product exists with id {id}"
        ))),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub async fn create_product<R>(
    form: CreateProductForm,
    actor: &User,
    repo: &R,
) -> ServiceResult<ProductDto>
where
    R: ProductReader + ProductWriter + CategoryReader,
{
    Pipeline::new()
        .then(required("name", "name is required", |f: &CreateProductForm| {
            f.name.clone()
        }))
        .then(entity_id("category", |f: &CreateProductForm| {
            f.category.clone()
        }))
        .then(category_exists("category", repo, |f: &CreateProductForm| {
            f.category.clone()
        }))
        .run(&form)
        .await?;

    let payload = CreateProductPayload::try_from(form)?;
    ensure_name_free(&payload.name, None, repo)?;

    let product = NewProduct {
        id: EntityId::generate(),
        name: payload.name,
        user_id: actor.id.clone(),
        price: payload.price,
        category_id: payload.category_id,
        description: payload.description,
        available: payload.available,
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_product(&product) {
        Ok(product) => Ok(product.into()),
        Err(e) => {
            log::error!("Failed to create product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub async fn update_product<R>(
    path: IdPath,
    form: UpdateProductForm,
    actor: &User,
    repo: &R,
) -> ServiceResult<ProductDto>
where
    R: ProductReader + ProductWriter + CategoryReader,
{
    let id = check_existing(&path, repo).await?;
    Pipeline::new()
        .then(category_exists("category", repo, |f: &UpdateProductForm| {
            f.category.clone()
        }))
        .run(&form)
        .await?;

    let payload = UpdateProductPayload::try_from(form)?;
    if let Some(name) = &payload.name {
        ensure_name_free(name, Some(&id), repo)?;
    }

    let update = ProductUpdate {
        user_id: actor.id.clone(),
        name: payload.name,
        price: payload.price,
        category_id: payload.category_id,
        description: payload.description,
        available: payload.available,
    };

    match repo.update_product(&id, &update) {
        Ok(Some(product)) => Ok(product.into()),
        Ok(None) => Err(ServiceError::EntityNotFound(format!(
            "no product exists with id {id}"
        ))),
        Err(e) => {
            log::error!("Failed to update product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Soft-delete a product. Administrators only.
pub async fn delete_product<R>(path: IdPath, actor: &User, repo: &R) -> ServiceResult<ProductDto>
where
    R: ProductReader + ProductWriter,
{
    if !actor.has_any_role(&[ADMIN_ROLE]) {
        return Err(ServiceError::Unauthorized);
    }

    let id = check_existing(&path, repo).await?;

    match repo.deactivate_product(&id) {
        Ok(Some(product)) => Ok(product.into()),
        Ok(None) => Err(ServiceError::EntityNotFound(format!(
            "no product exists with id {id}"
        ))),
        Err(e) => {
            log::error!("Failed to delete product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::role::USER_ROLE;
    use crate::repository::test::TestRepository;
    use crate::services::test_support::{seed_category, seed_user};

    fn widget(name: &str, category: &EntityId) -> CreateProductForm {
        CreateProductForm {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            price: Some(12.5),
            ..CreateProductForm::default()
        }
    }

    #[actix_web::test]
    async fn create_renders_relations() {
        let repo = TestRepository::new();
        let user = seed_user(&repo, "Ana", USER_ROLE);
        let category = seed_category(&repo, "TOOLS", &user);

        let dto = create_product(widget("widget a", &category.id), &user, &repo)
            .await
            .unwrap();
        assert_eq!(dto.name, "WIDGET A");
        assert_eq!(dto.category.name, "TOOLS");
        assert_eq!(dto.user.name, "Ana");
        assert_eq!(dto.price, 12.5);
        assert!(dto.available);
    }

    #[actix_web::test]
    async fn create_requires_an_existing_category() {
        let repo = TestRepository::new();
        let user = seed_user(&repo, "Ana", USER_ROLE);

        let err = create_product(widget("widget", &EntityId::generate()), &user, &repo)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref errors) if errors[0].field == "category"));

        let mut form = widget("widget", &EntityId::generate());
        form.category = Some("tools".into());
        let err = create_product(form, &user, &repo).await.unwrap_err();
        assert!(
            matches!(err, ServiceError::Validation(ref errors) if errors[0].message == "`tools` is not a valid id")
        );
    }

    #[actix_web::test]
    async fn duplicate_names_conflict() {
        let repo = TestRepository::new();
        let user = seed_user(&repo, "Ana", USER_ROLE);
        let category = seed_category(&repo, "TOOLS", &user);
        create_product(widget("Widget", &category.id), &user, &repo)
            .await
            .unwrap();

        let err = create_product(widget("widget", &category.id), &user, &repo)
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Form("product WIDGET already exists".into()));
    }

    #[actix_web::test]
    async fn partial_update_keeps_other_fields() {
        let repo = TestRepository::new();
        let user = seed_user(&repo, "Ana", USER_ROLE);
        let category = seed_category(&repo, "TOOLS", &user);
        let created = create_product(widget("widget", &category.id), &user, &repo)
            .await
            .unwrap();

        let updated = update_product(
            IdPath {
                id: created.id.clone(),
            },
            UpdateProductForm {
                available: Some(false),
                ..UpdateProductForm::default()
            },
            &user,
            &repo,
        )
        .await
        .unwrap();

        assert!(!updated.available);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.price, created.price);
    }

    #[actix_web::test]
    async fn delete_hides_product_from_listing() {
        let repo = TestRepository::new();
        let admin = seed_user(&repo, "Root", ADMIN_ROLE);
        let category = seed_category(&repo, "TOOLS", &admin);
        let created = create_product(widget("widget", &category.id), &admin, &repo)
            .await
            .unwrap();

        delete_product(IdPath { id: created.id }, &admin, &repo)
            .await
            .unwrap();

        let page = list_products(ListParams::default(), &repo).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.productos.is_empty());
    }
}
