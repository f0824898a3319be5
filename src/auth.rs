//! Password hashing, JWT issuance and the `x-token` request extractor.

use std::future::{Ready, ready};

use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::domain::types::EntityId;
use crate::domain::user::User;
use crate::repository::{DieselRepository, UserReader};

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "x-token";

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Errors raised by token and password handling.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("identity token rejected: {0}")]
    Rejected(String),
}

/// JWT payload: the user id and the expiry as a unix timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// HMAC keys used to sign and verify session tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Sign a token naming `user_id`.
    pub fn issue(&self, user_id: &EntityId) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Decode a token, rejecting bad signatures and expired tokens.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

/// Bcrypt settings for stored passwords.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(bcrypt::verify(password, hash)?)
    }
}

/// Profile asserted by a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

/// Turns a third-party ID token into a verified identity.
#[allow(async_fn_in_trait)]
pub trait IdentityVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    email: String,
    #[serde(default)]
    email_verified: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// Verifies Google ID tokens through the `tokeninfo` endpoint.
#[derive(Clone)]
pub struct GoogleVerifier {
    client: reqwest::Client,
    client_id: Option<String>,
}

impl GoogleVerifier {
    pub fn new(client_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.filter(|id| !id.is_empty()),
        }
    }
}

impl IdentityVerifier for GoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AuthError> {
        let Some(client_id) = &self.client_id else {
            return Err(AuthError::Rejected(
                "Google sign-in is not configured".to_string(),
            ));
        };

        let resp = self
            .client
            .get(GOOGLE_TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AuthError::Rejected(format!(
                "tokeninfo returned {}",
                resp.status()
            )));
        }

        let info: TokenInfo = resp.json().await?;
        if &info.aud != client_id {
            return Err(AuthError::Rejected(format!(
                "token issued for another client: {}",
                info.aud
            )));
        }
        if info.email_verified.as_deref() == Some("false") {
            return Err(AuthError::Rejected("email is not verified".to_string()));
        }

        Ok(GoogleIdentity {
            name: info.name.unwrap_or_else(|| info.email.clone()),
            email: info.email,
            picture: info.picture,
        })
    }
}

/// An active user identified by the `x-token` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

fn unauthorized(message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::Unauthorized().json(json!({ "msg": message })),
    )
    .into()
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| unauthorized("there is no token in the request"))?;

    let (Some(keys), Some(repo)) = (
        req.app_data::<web::Data<JwtKeys>>(),
        req.app_data::<web::Data<DieselRepository>>(),
    ) else {
        log::error!("JWT keys or repository are not registered with the app");
        return Err(actix_web::error::ErrorInternalServerError(
            "authentication is not configured",
        ));
    };

    let claims = keys.verify(token).map_err(|e| {
        log::warn!("Rejected token: {e}");
        unauthorized("token is not valid")
    })?;
    let user_id =
        EntityId::new(claims.sub).map_err(|_| unauthorized("token is not valid"))?;

    match repo.get_user_by_id(&user_id) {
        Ok(Some(user)) if user.active => Ok(AuthenticatedUser(user)),
        Ok(Some(_)) => Err(unauthorized("token is not valid - user is inactive")),
        Ok(None) => Err(unauthorized("token is not valid - user does not exist")),
        Err(e) => {
            log::error!("Failed to load token user: {e}");
            Err(actix_web::error::ErrorInternalServerError(
                "internal error, contact an administrator",
            ))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
