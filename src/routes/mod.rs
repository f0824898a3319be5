//! HTTP handlers. Each one extracts its input, calls the matching service and
//! maps the outcome to a JSON response.

use actix_multipart::form::MultipartFormConfig;
use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::services::ServiceError;

pub mod auth;
pub mod categories;
pub mod products;
pub mod search;
pub mod uploads;
pub mod users;

/// Response for a failed service call.
pub fn error_response(err: ServiceError) -> HttpResponse {
    let msg = err.to_string();
    match err {
        ServiceError::Validation(errors) => HttpResponse::BadRequest().json(json!({ "errors": errors })),
        ServiceError::Blocked | ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(json!({ "msg": msg }))
        }
        ServiceError::Internal => HttpResponse::InternalServerError().json(json!({ "msg": msg })),
        ServiceError::UnknownCollection(_)
        | ServiceError::EntityNotFound(_)
        | ServiceError::Form(_)
        | ServiceError::TypeConstraint(_)
        | ServiceError::InvalidCredentials
        | ServiceError::InvalidGoogleToken => HttpResponse::BadRequest().json(json!({ "msg": msg })),
    }
}

fn bad_request<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response = HttpResponse::BadRequest().json(json!({ "msg": err.to_string() }));
    InternalError::from_response(err, response).into()
}

/// Malformed JSON bodies answer with a JSON 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| bad_request(err))
}

/// Malformed query strings answer with a JSON 400.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| bad_request(err))
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| bad_request(err))
}

pub fn multipart_config() -> MultipartFormConfig {
    MultipartFormConfig::default().error_handler(|err, _req| bad_request(err))
}

/// Register every endpoint under `/api`. Handlers expect the repository,
/// auth and storage components as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(multipart_config())
            .service(auth::login)
            .service(auth::google_sign_in)
            .service(users::list_users)
            .service(users::create_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(categories::list_categories)
            .service(categories::show_category)
            .service(categories::create_category)
            .service(categories::update_category)
            .service(categories::delete_category)
            .service(products::list_products)
            .service(products::show_product)
            .service(products::create_product)
            .service(products::update_product)
            .service(products::delete_product)
            .service(search::search)
            .service(uploads::upload_file)
            .service(uploads::update_image)
            .service(uploads::show_image),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    use super::*;
    use crate::validation::FieldError;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn validation_errors_list_fields() {
        let response = error_response(ServiceError::Validation(vec![FieldError::new(
            "name",
            "name is required",
        )]));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "errors": [{ "field": "name", "message": "name is required" }] })
        );
    }

    #[actix_web::test]
    async fn statuses_follow_error_kind() {
        assert_eq!(
            error_response(ServiceError::Blocked).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_response(ServiceError::EntityNotFound("gone".into())).status(),
            StatusCode::BAD_REQUEST
        );

        let response = error_response(ServiceError::Internal);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "msg": "internal error, contact an administrator" })
        );
    }
}
