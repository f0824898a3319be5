use std::path::Path;

use actix_files::NamedFile;
use actix_multipart::form::MultipartForm;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, put, web};
use serde_json::json;

use crate::forms::uploads::{UploadForm, UploadPath, UploadTarget};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::uploads::{
    ImageLocation, show_image as show_image_service, update_attachment,
    upload_file as upload_file_service,
};
use crate::storage::Storage;

fn serve_file(req: &HttpRequest, path: &Path) -> HttpResponse {
    match NamedFile::open(path) {
        Ok(file) => file.into_response(req),
        Err(e) => {
            log::error!("Failed to open image {}: {e}", path.display());
            HttpResponse::InternalServerError()
                .json(json!({ "msg": "internal error, contact an administrator" }))
        }
    }
}

#[post("/uploads")]
pub async fn upload_file(
    storage: web::Data<Storage>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> impl Responder {
    match upload_file_service(form.uploaded_file(), storage.local()).await {
        Ok(uploaded) => HttpResponse::Ok().json(uploaded),
        Err(err) => error_response(err),
    }
}

#[put("/uploads/{coleccion}/{id}")]
pub async fn update_image(
    path: web::Path<UploadPath>,
    repo: web::Data<DieselRepository>,
    storage: web::Data<Storage>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> impl Responder {
    let file = form.uploaded_file();
    let target = UploadTarget::new(path.into_inner(), file.as_ref());
    match update_attachment(target, file, repo.get_ref(), storage.get_ref()).await {
        Ok(owner) => HttpResponse::Ok().json(owner),
        Err(err) => error_response(err),
    }
}

#[get("/uploads/{coleccion}/{id}")]
pub async fn show_image(
    req: HttpRequest,
    path: web::Path<UploadPath>,
    repo: web::Data<DieselRepository>,
    storage: web::Data<Storage>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match show_image_service(path.into_inner(), repo.get_ref(), storage.local()).await {
        Ok(ImageLocation::File(file)) => serve_file(&req, &file),
        Ok(ImageLocation::Remote(url)) => HttpResponse::Found()
            .insert_header((header::LOCATION, url))
            .finish(),
        Ok(ImageLocation::Placeholder) => serve_file(&req, &server_config.placeholder_image),
        Err(err) => error_response(err),
    }
}
