use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;

use crate::domain::attachment::UploadedFile;

/// Multipart body of the upload endpoints; the file travels as `archivo`.
#[derive(MultipartForm)]
pub struct UploadForm {
    #[multipart(rename = "archivo", limit = "10MB")]
    pub file: Option<TempFile>,
}

impl UploadForm {
    /// The received file, if the client sent one with a name.
    pub fn uploaded_file(&self) -> Option<UploadedFile> {
        let file = self.file.as_ref()?;
        let name = file.file_name.clone()?;
        Some(UploadedFile::new(name, file.file.path()))
    }
}

/// `/{coleccion}/{id}` path segments of the per-entity upload endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadPath {
    pub coleccion: String,
    pub id: String,
}

/// What the replace-image checks look at.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub coleccion: String,
    pub id: String,
    pub file_name: Option<String>,
}

impl UploadTarget {
    pub fn new(path: UploadPath, file: Option<&UploadedFile>) -> Self {
        Self {
            coleccion: path.coleccion,
            id: path.id,
            file_name: file.map(|file| file.original_name.clone()),
        }
    }
}
