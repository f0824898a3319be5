use actix_web::{HttpResponse, Responder, post, web};

use crate::auth::{GoogleVerifier, JwtKeys, PasswordHasher};
use crate::forms::auth::{GoogleSignInForm, LoginForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::auth::{google_sign_in as google_sign_in_service, login as login_service};

#[post("/auth/login")]
pub async fn login(
    form: web::Json<LoginForm>,
    repo: web::Data<DieselRepository>,
    keys: web::Data<JwtKeys>,
    hasher: web::Data<PasswordHasher>,
) -> impl Responder {
    match login_service(form.into_inner(), repo.get_ref(), &keys, &hasher).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(err) => error_response(err),
    }
}

#[post("/auth/google")]
pub async fn google_sign_in(
    form: web::Json<GoogleSignInForm>,
    repo: web::Data<DieselRepository>,
    keys: web::Data<JwtKeys>,
    hasher: web::Data<PasswordHasher>,
    verifier: web::Data<GoogleVerifier>,
) -> impl Responder {
    match google_sign_in_service(
        form.into_inner(),
        repo.get_ref(),
        &keys,
        &hasher,
        verifier.get_ref(),
    )
    .await
    {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(err) => error_response(err),
    }
}
