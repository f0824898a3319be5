use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::types::{FileName, ImageUrl, PublicId, TypeConstraintError};

/// Extensions accepted for image uploads.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Image stored on a user or product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum AttachmentRef {
    /// File kept in the local uploads folder of the entity's collection.
    Local { file_name: FileName },
    /// Object owned by the hosted image service; destroyed when replaced.
    Hosted { url: ImageUrl, public_id: PublicId },
    /// Image owned by someone else (for example a Google avatar); never destroyed.
    External { url: ImageUrl },
}

impl AttachmentRef {
    /// Value exposed to clients: the file name for local files, the URL otherwise.
    pub fn location(&self) -> &str {
        match self {
            Self::Local { file_name } => file_name.as_str(),
            Self::Hosted { url, .. } | Self::External { url } => url.as_str(),
        }
    }

    /// Persistence tag stored in the `image_source` column.
    pub const fn source(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::Hosted { .. } => "hosted",
            Self::External { .. } => "external",
        }
    }

    pub fn public_id(&self) -> Option<&PublicId> {
        match self {
            Self::Hosted { public_id, .. } => Some(public_id),
            Self::Local { .. } | Self::External { .. } => None,
        }
    }

    /// Rebuilds a reference from its three persisted columns.
    pub fn from_columns(
        location: Option<String>,
        source: Option<String>,
        public_id: Option<String>,
    ) -> Result<Option<Self>, TypeConstraintError> {
        let Some(location) = location else {
            return Ok(None);
        };

        let attachment = match source.as_deref() {
            Some("local") | None => Self::Local {
                file_name: FileName::new(location)?,
            },
            Some("hosted") => Self::Hosted {
                url: ImageUrl::new(location)?,
                public_id: PublicId::new(public_id.ok_or_else(|| {
                    TypeConstraintError::InvalidValue("hosted image without public id".to_string())
                })?)?,
            },
            Some("external") => Self::External {
                url: ImageUrl::new(location)?,
            },
            Some(other) => {
                return Err(TypeConstraintError::InvalidValue(format!(
                    "image source: {other}"
                )));
            }
        };

        Ok(Some(attachment))
    }
}

/// A file received from a client, still sitting in its temporary location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name supplied by the client; only its extension is trusted.
    pub original_name: String,
    pub path: PathBuf,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            original_name: original_name.into(),
            path: path.into(),
        }
    }

    /// Text after the last `.` of the client file name.
    pub fn extension(&self) -> Option<&str> {
        self.original_name
            .rsplit_once('.')
            .map(|(_, extension)| extension)
            .filter(|extension| !extension.is_empty())
    }

    /// Extension lower-cased, when it is one of [`IMAGE_EXTENSIONS`].
    pub fn image_extension(&self) -> Option<String> {
        self.extension()
            .map(str::to_ascii_lowercase)
            .filter(|extension| IMAGE_EXTENSIONS.contains(&extension.as_str()))
    }
}
