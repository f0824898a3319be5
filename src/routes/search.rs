use actix_web::{HttpResponse, Responder, get, web};

use crate::forms::SearchPath;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::search::search as search_service;

#[get("/buscar/{coleccion}/{termino}")]
pub async fn search(
    path: web::Path<SearchPath>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match search_service(path.into_inner(), repo.get_ref()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}
