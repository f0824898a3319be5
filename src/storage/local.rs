use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domain::attachment::{AttachmentRef, UploadedFile};
use crate::domain::collection::EntityTag;
use crate::domain::types::FileName;
use crate::storage::{AttachmentStore, StorageError};

/// Keeps uploads under `<root>/<folder>/<uuid>.<ext>`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, folder: &str, file_name: &FileName) -> PathBuf {
        self.root.join(folder).join(file_name.as_str())
    }

    /// Copy `file` into `folder` under a fresh random name.
    pub async fn save_in(&self, folder: &str, file: &UploadedFile) -> Result<FileName, StorageError> {
        let extension = file
            .image_extension()
            .ok_or_else(|| StorageError::UnsupportedFile(file.original_name.clone()))?;
        let file_name = FileName::new(format!("{}.{extension}", Uuid::new_v4()))?;

        let target_dir = self.root.join(folder);
        fs::create_dir_all(&target_dir)?;
        fs::copy(&file.path, target_dir.join(file_name.as_str()))?;

        log::info!("Stored upload {} in {}", file_name, target_dir.display());
        Ok(file_name)
    }

    /// Delete a stored file; a file that is already gone is fine.
    pub async fn remove(&self, folder: &str, file_name: &FileName) -> Result<(), StorageError> {
        match fs::remove_file(self.path_of(folder, file_name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("Image {file_name} was already missing from {folder}");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl AttachmentStore for LocalStore {
    async fn save(
        &self,
        collection: EntityTag,
        file: &UploadedFile,
    ) -> Result<AttachmentRef, StorageError> {
        let file_name = self.save_in(collection.as_str(), file).await?;
        Ok(AttachmentRef::Local { file_name })
    }

    async fn evict(
        &self,
        collection: EntityTag,
        attachment: &AttachmentRef,
    ) -> Result<(), StorageError> {
        match attachment {
            AttachmentRef::Local { file_name } => self.remove(collection.as_str(), file_name).await,
            AttachmentRef::Hosted { .. } | AttachmentRef::External { .. } => Ok(()),
        }
    }
}
