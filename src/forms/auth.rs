use serde::Deserialize;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(alias = "correo")]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `POST /auth/google`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleSignInForm {
    pub id_token: Option<String>,
}
