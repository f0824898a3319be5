use std::fs;

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::domain::attachment::{AttachmentRef, UploadedFile};
use crate::domain::collection::EntityTag;
use crate::domain::types::{ImageUrl, PublicId};
use crate::models::config::CloudinaryConfig;
use crate::storage::{AttachmentStore, StorageError};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Client of the Cloudinary upload API using signed requests.
#[derive(Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

/// Signature over `params` as the upload API expects it: parameters sorted by
/// name, joined as `k=v&k=v`, followed by the secret, hashed with SHA-1.
pub(crate) fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut params = params.to_vec();
    params.sort_by(|(left, _), (right, _)| left.cmp(right));
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{API_BASE}/{}/image/{action}", self.config.cloud_name)
    }

    fn folder_for(&self, collection: EntityTag) -> String {
        match &self.config.folder {
            Some(folder) => format!("{folder}/{collection}"),
            None => collection.to_string(),
        }
    }
}

impl AttachmentStore for CloudinaryStore {
    async fn save(
        &self,
        collection: EntityTag,
        file: &UploadedFile,
    ) -> Result<AttachmentRef, StorageError> {
        if file.image_extension().is_none() {
            return Err(StorageError::UnsupportedFile(file.original_name.clone()));
        }

        let folder = self.folder_for(collection);
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("folder", folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let bytes = fs::read(&file.path)?;
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file.original_name.clone()))
            .text("api_key", self.config.api_key.clone())
            .text("folder", folder)
            .text("timestamp", timestamp)
            .text("signature", signature);

        let resp = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Remote(format!("upload returned {status}: {body}")));
        }

        let uploaded: UploadResponse = resp.json().await?;
        log::info!("Uploaded image {} to Cloudinary", uploaded.public_id);

        Ok(AttachmentRef::Hosted {
            url: ImageUrl::new(uploaded.secure_url)?,
            public_id: PublicId::new(uploaded.public_id)?,
        })
    }

    async fn evict(
        &self,
        _collection: EntityTag,
        attachment: &AttachmentRef,
    ) -> Result<(), StorageError> {
        let Some(public_id) = attachment.public_id() else {
            return Ok(());
        };

        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", public_id.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let resp = self
            .client
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id.as_str()),
                ("api_key", self.config.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(StorageError::Remote(format!(
                "destroy of {public_id} returned {}",
                resp.status()
            )));
        }

        let destroyed: DestroyResponse = resp.json().await?;
        match destroyed.result.as_str() {
            "ok" => Ok(()),
            "not found" => {
                log::warn!("Hosted image {public_id} was already gone");
                Ok(())
            }
            other => Err(StorageError::Remote(format!(
                "destroy of {public_id} answered `{other}`"
            ))),
        }
    }
}
