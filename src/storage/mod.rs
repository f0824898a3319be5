//! Backends holding uploaded images.
//!
//! [`Storage`] picks the backend new files go to from configuration, and
//! routes evictions by the kind of reference being replaced.

use thiserror::Error;

use crate::domain::attachment::{AttachmentRef, UploadedFile};
use crate::domain::collection::EntityTag;
use crate::domain::types::TypeConstraintError;
use crate::models::config::ServerConfig;

pub mod cloudinary;
pub mod local;

pub use cloudinary::CloudinaryStore;
pub use local::LocalStore;

/// Errors raised while storing or removing files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("image service rejected the request: {0}")]
    Remote(String),
    #[error("unsupported file: {0}")]
    UnsupportedFile(String),
    #[error("invalid stored reference: {0}")]
    Reference(#[from] TypeConstraintError),
}

/// Place where entity images live.
#[allow(async_fn_in_trait)]
pub trait AttachmentStore {
    /// Store `file` for an entity of `collection` and return its reference.
    async fn save(
        &self,
        collection: EntityTag,
        file: &UploadedFile,
    ) -> Result<AttachmentRef, StorageError>;

    /// Remove the object behind `attachment`. Missing objects are not an error.
    async fn evict(
        &self,
        collection: EntityTag,
        attachment: &AttachmentRef,
    ) -> Result<(), StorageError>;
}

/// Local disk plus the optional hosted image service.
#[derive(Clone)]
pub struct Storage {
    local: LocalStore,
    remote: Option<CloudinaryStore>,
}

impl Storage {
    pub fn new(local: LocalStore, remote: Option<CloudinaryStore>) -> Self {
        Self { local, remote }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            LocalStore::new(&config.uploads_dir),
            config.cloudinary.clone().map(CloudinaryStore::new),
        )
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }
}

impl AttachmentStore for Storage {
    async fn save(
        &self,
        collection: EntityTag,
        file: &UploadedFile,
    ) -> Result<AttachmentRef, StorageError> {
        match &self.remote {
            Some(remote) => remote.save(collection, file).await,
            None => self.local.save(collection, file).await,
        }
    }

    async fn evict(
        &self,
        collection: EntityTag,
        attachment: &AttachmentRef,
    ) -> Result<(), StorageError> {
        match attachment {
            AttachmentRef::Local { .. } => self.local.evict(collection, attachment).await,
            AttachmentRef::Hosted { public_id, .. } => match &self.remote {
                Some(remote) => remote.evict(collection, attachment).await,
                None => {
                    log::warn!(
                        "Cannot destroy hosted image {public_id}: image service is not configured"
                    );
                    Ok(())
                }
            },
            AttachmentRef::External { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::domain::types::{ImageUrl, PublicId};

    #[actix_web::test]
    async fn without_remote_files_go_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("upload.tmp");
        fs::write(&source, b"png").unwrap();

        let storage = Storage::new(LocalStore::new(dir.path().join("uploads")), None);
        let file = UploadedFile::new("avatar.PNG", &source);
        let saved = storage.save(EntityTag::User, &file).await.unwrap();

        let AttachmentRef::Local { file_name } = &saved else {
            panic!("expected a local reference, got {saved:?}");
        };
        assert!(file_name.ends_with(".png"));
        assert!(storage.local().path_of(EntityTag::User.as_str(), file_name).exists());
    }

    #[actix_web::test]
    async fn foreign_references_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(LocalStore::new(dir.path()), None);

        let external = AttachmentRef::External {
            url: ImageUrl::new("https://lh3.googleusercontent.com/a/photo.jpg").unwrap(),
        };
        storage.evict(EntityTag::User, &external).await.unwrap();

        let hosted = AttachmentRef::Hosted {
            url: ImageUrl::new("https://res.cloudinary.com/demo/image/upload/v1/x.png").unwrap(),
            public_id: PublicId::new("x").unwrap(),
        };
        storage.evict(EntityTag::Product, &hosted).await.unwrap();
    }
}
