use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::auth::{AuthenticatedUser, PasswordHasher};
use crate::forms::IdPath;
use crate::forms::pagination::ListParams;
use crate::forms::users::{CreateUserForm, UpdateUserForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::users::{
    create_user as create_user_service, delete_user as delete_user_service,
    list_users as list_users_service, update_user as update_user_service,
};

#[get("/usuarios")]
pub async fn list_users(
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_users_service(params.into_inner(), repo.get_ref()).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err),
    }
}

#[post("/usuarios")]
pub async fn create_user(
    form: web::Json<CreateUserForm>,
    repo: web::Data<DieselRepository>,
    hasher: web::Data<PasswordHasher>,
) -> impl Responder {
    match create_user_service(form.into_inner(), repo.get_ref(), &hasher).await {
        Ok(user) => HttpResponse::Created().json(user),
        Err(err) => error_response(err),
    }
}

#[put("/usuarios/{id}")]
pub async fn update_user(
    path: web::Path<IdPath>,
    form: web::Json<UpdateUserForm>,
    repo: web::Data<DieselRepository>,
    hasher: web::Data<PasswordHasher>,
) -> impl Responder {
    match update_user_service(path.into_inner(), form.into_inner(), repo.get_ref(), &hasher).await
    {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => error_response(err),
    }
}

#[delete("/usuarios/{id}")]
pub async fn delete_user(
    path: web::Path<IdPath>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_user_service(path.into_inner(), &user.0, repo.get_ref()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => error_response(err),
    }
}
