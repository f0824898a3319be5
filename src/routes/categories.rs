use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::IdPath;
use crate::forms::categories::CategoryForm;
use crate::forms::pagination::ListParams;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::categories::{
    create_category as create_category_service, delete_category as delete_category_service,
    list_categories as list_categories_service, show_category as show_category_service,
    update_category as update_category_service,
};

#[get("/categorias")]
pub async fn list_categories(
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_categories_service(params.into_inner(), repo.get_ref()).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err),
    }
}

#[get("/categorias/{id}")]
pub async fn show_category(
    path: web::Path<IdPath>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_category_service(path.into_inner(), repo.get_ref()).await {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(err),
    }
}

#[post("/categorias")]
pub async fn create_category(
    form: web::Json<CategoryForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match create_category_service(form.into_inner(), &user.0, repo.get_ref()).await {
        Ok(category) => HttpResponse::Created().json(category),
        Err(err) => error_response(err),
    }
}

#[put("/categorias/{id}")]
pub async fn update_category(
    path: web::Path<IdPath>,
    form: web::Json<CategoryForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match update_category_service(path.into_inner(), form.into_inner(), &user.0, repo.get_ref())
        .await
    {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(err),
    }
}

#[delete("/categorias/{id}")]
pub async fn delete_category(
    path: web::Path<IdPath>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_category_service(path.into_inner(), &user.0, repo.get_ref()).await {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(err),
    }
}
