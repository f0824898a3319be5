use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::IdPath;
use crate::forms::pagination::ListParams;
use crate::forms::products::{CreateProductForm, UpdateProductForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    list_products as list_products_service, show_product as show_product_service,
    update_product as update_product_service,
};

#[get("/productos")]
pub async fn list_products(
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_products_service(params.into_inner(), repo.get_ref()).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err),
    }
}

#[get("/productos/{id}")]
pub async fn show_product(
    path: web::Path<IdPath>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_product_service(path.into_inner(), repo.get_ref()).await {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err),
    }
}

#[post("/productos")]
pub async fn create_product(
    form: web::Json<CreateProductForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match create_product_service(form.into_inner(), &user.0, repo.get_ref()).await {
        Ok(product) => HttpResponse::Created().json(product),
        Err(err) => error_response(err),
    }
}

#[put("/productos/{id}")]
pub async fn update_product(
    path: web::Path<IdPath>,
    form: web::Json<UpdateProductForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match update_product_service(path.into_inner(), form.into_inner(), &user.0, repo.get_ref())
        .await
    {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err),
    }
}

#[delete("/productos/{id}")]
pub async fn delete_product(
    path: web::Path<IdPath>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_product_service(path.into_inner(), &user.0, repo.get_ref()).await {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err),
    }
}
