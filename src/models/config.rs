use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Configuration of the catalog service, loaded once at start-up and injected
/// into the pool, the auth keys and the storage backends.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default = "default_jwt_ttl_hours")]
    pub jwt_ttl_hours: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// OAuth client id the Google ID tokens must be issued for.
    pub google_client_id: Option<String>,
    pub uploads_dir: PathBuf,
    /// Image served when an entity has no picture.
    pub placeholder_image: PathBuf,
    /// When present, new images are uploaded to Cloudinary instead of local disk.
    pub cloudinary: Option<CloudinaryConfig>,
}

/// Credentials of the hosted image service.
#[derive(Clone, Debug, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder uploads are placed in, if any.
    pub folder: Option<String>,
}

fn default_jwt_ttl_hours() -> i64 {
    4
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl ServerConfig {
    /// Layers `config/default.yaml`, `config/{APP_ENV}.yaml` and `APP__*`
    /// environment variables, later sources winning.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
