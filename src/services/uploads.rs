use std::path::PathBuf;

use crate::domain::attachment::{AttachmentRef, UploadedFile};
use crate::domain::collection::{EntityTag, IMAGE_COLLECTIONS, UnknownCollection};
use crate::domain::types::EntityId;
use crate::dto::auth::UploadedName;
use crate::dto::search::AttachmentOwner;
use crate::forms::uploads::{UploadPath, UploadTarget};
use crate::repository::{
    ProductReader, ProductWriter, RepositoryError, UserReader, UserWriter,
};
use crate::storage::{AttachmentStore, LocalStore};
use crate::validation::{Pipeline, collection, entity_id, extension, file_present};

use super::{ServiceError, ServiceResult};

/// Folder of the generic upload endpoint.
pub const GENERIC_UPLOAD_FOLDER: &str = "imgs";

/// Where the image of an entity can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    /// A file in the local uploads folder.
    File(PathBuf),
    /// An image held elsewhere; clients are redirected to it.
    Remote(String),
    /// The entity has no image that can be served.
    Placeholder,
}

fn not_an_image_collection(tag: EntityTag) -> ServiceError {
    UnknownCollection {
        tag: tag.as_str().to_string(),
        allowed: IMAGE_COLLECTIONS.to_vec(),
    }
    .into()
}

fn missing_entity(tag: EntityTag, id: &EntityId) -> ServiceError {
    let kind = match tag {
        EntityTag::User => "user",
        EntityTag::Category => "category",
        EntityTag::Product => "product",
    };
    ServiceError::EntityNotFound(format!("no {kind} exists with id {id}"))
}

/// Store a file in the generic uploads folder and return its new name.
pub async fn upload_file(
    file: Option<UploadedFile>,
    store: &LocalStore,
) -> ServiceResult<UploadedName> {
    let file_name = file.as_ref().map(|file| file.original_name.clone());
    Pipeline::new()
        .then(file_present("archivo", |name: &Option<String>| name.clone()))
        .then(extension("archivo", |name: &Option<String>| name.clone()))
        .run(&file_name)
        .await?;

    let Some(file) = file else {
        return Err(ServiceError::Form("no file was uploaded".to_string()));
    };

    match store.save_in(GENERIC_UPLOAD_FOLDER, &file).await {
        Ok(name) => Ok(UploadedName {
            name: name.into_inner(),
        }),
        Err(e) => {
            log::error!("Failed to store upload: {e}");
            Err(ServiceError::Internal)
        }
    }
}

async fn evict_current<S: AttachmentStore>(
    store: &S,
    tag: EntityTag,
    current: Option<&AttachmentRef>,
) -> ServiceResult<()> {
    if let Some(current) = current {
        store.evict(tag, current).await.map_err(|e| {
            log::error!("Failed to evict previous image of {tag}: {e}");
            ServiceError::Internal
        })?;
    }
    Ok(())
}

/// Replace the image of a user or product, removing the previous one.
pub async fn update_attachment<R, S>(
    target: UploadTarget,
    file: Option<UploadedFile>,
    repo: &R,
    store: &S,
) -> ServiceResult<AttachmentOwner>
where
    R: UserReader + UserWriter + ProductReader + ProductWriter,
    S: AttachmentStore,
{
    Pipeline::new()
        .then(file_present("archivo", |t: &UploadTarget| t.file_name.clone()))
        .then(extension("archivo", |t: &UploadTarget| t.file_name.clone()))
        .then(entity_id("id", |t: &UploadTarget| Some(t.id.clone())))
        .then(collection("coleccion", IMAGE_COLLECTIONS, |t: &UploadTarget| {
            Some(t.coleccion.clone())
        }))
        .run(&target)
        .await?;

    let tag = EntityTag::resolve_in(&target.coleccion, IMAGE_COLLECTIONS)?;
    let id = EntityId::new(target.id)?;
    let Some(file) = file else {
        return Err(ServiceError::Form("no file was uploaded".to_string()));
    };

    let db_error = |e: RepositoryError| {
        log::error!("Failed to update image of {tag} {id}: {e}");
        ServiceError::Internal
    };

    match tag {
        EntityTag::User => {
            let user = repo
                .get_user_by_id(&id)
                .map_err(db_error)?
                .ok_or_else(|| missing_entity(tag, &id))?;
            evict_current(store, tag, user.image.as_ref()).await?;
            let attachment = match store.save(tag, &file).await {
                Ok(attachment) => attachment,
                Err(e) => {
                    log::error!("Failed to store new image of {tag} {id}: {e}");
                    // The previous image is gone; do not keep pointing at it.
                    if user.image.is_some() {
                        repo.set_user_image(&id, None).map_err(db_error)?;
                    }
                    return Err(ServiceError::Internal);
                }
            };
            repo.set_user_image(&id, Some(&attachment))
                .map_err(db_error)?
                .map(|user| AttachmentOwner::User(user.into()))
                .ok_or_else(|| missing_entity(tag, &id))
        }
        EntityTag::Product => {
            let product = repo
                .get_product_by_id(&id)
                .map_err(db_error)?
                .ok_or_else(|| missing_entity(tag, &id))?;
            evict_current(store, tag, product.image.as_ref()).await?;
            let attachment = match store.save(tag, &file).await {
                Ok(attachment) => attachment,
                Err(e) => {
                    log::error!("Failed to store new image of {tag} {id}: {e}");
                    if product.image.is_some() {
                        repo.set_product_image(&id, None).map_err(db_error)?;
                    }
                    return Err(ServiceError::Internal);
                }
            };
            repo.set_product_image(&id, Some(&attachment))
                .map_err(db_error)?
                .map(|product| AttachmentOwner::Product(product.into()))
                .ok_or_else(|| missing_entity(tag, &id))
        }
        EntityTag::Category => Err(not_an_image_collection(tag)),
    }
}

/// Resolve where the image of a user or product is served from.
pub async fn show_image<R>(
    path: UploadPath,
    repo: &R,
    store: &LocalStore,
) -> ServiceResult<ImageLocation>
where
    R: UserReader + ProductReader,
{
    Pipeline::new()
        .then(entity_id("id", |p: &UploadPath| Some(p.id.clone())))
        .then(collection("coleccion", IMAGE_COLLECTIONS, |p: &UploadPath| {
            Some(p.coleccion.clone())
        }))
        .run(&path)
        .await?;

    let tag = EntityTag::resolve_in(&path.coleccion, IMAGE_COLLECTIONS)?;
    let id = EntityId::new(path.id)?;

    let image = match tag {
        EntityTag::User => repo
            .get_user_by_id(&id)
            .map(|user| user.map(|user| user.image)),
        EntityTag::Product => repo
            .get_product_by_id(&id)
            .map(|product| product.map(|product| product.image)),
        EntityTag::Category => return Err(not_an_image_collection(tag)),
    };

    let image = match image {
        Ok(Some(image)) => image,
        Ok(None) => return Err(missing_entity(tag, &id)),
        Err(e) => {
            log::error!("Failed to load {tag} {id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(match image {
        Some(AttachmentRef::Local { file_name }) => {
            let file = store.path_of(tag.as_str(), &file_name);
            if file.is_file() {
                ImageLocation::File(file)
            } else {
                log::warn!("Image {file_name} of {tag} {id} is missing on disk");
                ImageLocation::Placeholder
            }
        }
        Some(AttachmentRef::Hosted { url, .. }) | Some(AttachmentRef::External { url }) => {
            ImageLocation::Remote(url.into_inner())
        }
        None => ImageLocation::Placeholder,
    })
}
