use chrono::Utc;

use crate::auth::{IdentityVerifier, JwtKeys, PasswordHasher};
use crate::domain::attachment::AttachmentRef;
use crate::domain::role::USER_ROLE;
use crate::domain::types::{Email, EntityId, ImageUrl, RoleName, UserName};
use crate::domain::user::{NewUser, User};
use crate::dto::auth::SessionDto;
use crate::forms::auth::{GoogleSignInForm, LoginForm};
use crate::repository::{UserReader, UserWriter};
use crate::validation::{Pipeline, email, required};

use super::{ServiceError, ServiceResult};

fn open_session(user: User, keys: &JwtKeys) -> ServiceResult<SessionDto> {
    let token = keys.issue(&user.id).map_err(|e| {
        log::error!("Failed to issue token: {e}");
        ServiceError::Internal
    })?;
    Ok(SessionDto {
        user: user.into(),
        token,
    })
}

/// Email and password sign-in. Unknown, inactive and wrong-password cases
/// all answer with the same error.
pub async fn login<R>(
    form: LoginForm,
    repo: &R,
    keys: &JwtKeys,
    hasher: &PasswordHasher,
) -> ServiceResult<SessionDto>
where
    R: UserReader,
{
    Pipeline::new()
        .then(email("email", "email is not valid", |f: &LoginForm| {
            f.email.clone()
        }))
        .then(required("password", "password is required", |f: &LoginForm| {
            f.password.clone()
        }))
        .run(&form)
        .await?;

    let (Some(email), Some(password)) = (form.email, form.password) else {
        return Err(ServiceError::InvalidCredentials);
    };

    let user = match repo.get_user_by_email(email.trim()) {
        Ok(Some(user)) => user,
        Ok(None) => {
            log::info!("Login for unknown email {email}");
            return Err(ServiceError::InvalidCredentials);
        }
        Err(e) => {
            log::error!("Failed to load user by email: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !user.active {
        log::info!("Login for inactive user {}", user.id);
        return Err(ServiceError::InvalidCredentials);
    }

    match hasher.verify(&password, &user.password_hash) {
        Ok(true) => open_session(user, keys),
        Ok(false) => Err(ServiceError::InvalidCredentials),
        Err(e) => {
            log::warn!("Stored password hash of user {} is unusable: {e}", user.id);
            Err(ServiceError::InvalidCredentials)
        }
    }
}

/// Google sign-in. The first sign-in registers the account.
pub async fn google_sign_in<R, V>(
    form: GoogleSignInForm,
    repo: &R,
    keys: &JwtKeys,
    hasher: &PasswordHasher,
    verifier: &V,
) -> ServiceResult<SessionDto>
where
    R: UserReader + UserWriter,
    V: IdentityVerifier,
{
    Pipeline::new()
        .then(required("id_token", "id_token is required", |f: &GoogleSignInForm| {
            f.id_token.clone()
        }))
        .run(&form)
        .await?;

    let token = form.id_token.unwrap_or_default();
    let identity = verifier.verify(&token).await.map_err(|e| {
        log::warn!("Google sign-in rejected: {e}");
        ServiceError::InvalidGoogleToken
    })?;

    let existing = repo.get_user_by_email(&identity.email).map_err(|e| {
        log::error!("Failed to load user by email: {e}");
        ServiceError::Internal
    })?;

    let user = match existing {
        Some(user) => user,
        None => {
            // Google accounts never log in with a password; store an unguessable one.
            let password_hash = hasher.hash(&EntityId::generate().into_inner()).map_err(|e| {
                log::error!("Failed to hash password: {e}");
                ServiceError::Internal
            })?;
            let image = identity
                .picture
                .and_then(|picture| ImageUrl::new(picture).ok())
                .map(|url| AttachmentRef::External { url });

            let new_user = NewUser {
                id: EntityId::generate(),
                name: UserName::new(identity.name)?,
                email: Email::new(identity.email)?,
                password_hash,
                role: RoleName::new(USER_ROLE)?,
                image,
                google: true,
                created_at: Utc::now().naive_utc(),
            };
            repo.create_user(&new_user).map_err(|e| {
                log::error!("Failed to register Google user: {e}");
                ServiceError::Internal
            })?
        }
    };

    if !user.active {
        return Err(ServiceError::Blocked);
    }

    open_session(user, keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, GoogleIdentity};
    use crate::repository::test::TestRepository;
    use crate::services::test_support::{seed_user, test_hasher};

    struct FakeGoogle(Option<GoogleIdentity>);

    impl IdentityVerifier for FakeGoogle {
        async fn verify(&self, _id_token: &str) -> Result<GoogleIdentity, AuthError> {
            self.0
                .clone()
                .ok_or_else(|| AuthError::Rejected("bad token".into()))
        }
    }

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret", 4)
    }

    fn credentials(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[actix_web::test]
    async fn login_issues_a_token_for_the_user() {
        let repo = TestRepository::new();
        let user = seed_user(&repo, "Ana", USER_ROLE);
        let keys = keys();

        let session = login(
            credentials("ana@example.com", "secret1"),
            &repo,
            &keys,
            &test_hasher(),
        )
        .await
        .unwrap();

        assert_eq!(session.user.id, user.id.as_str());
        assert_eq!(keys.verify(&session.token).unwrap().sub, user.id.as_str());
    }

    #[actix_web::test]
    async fn wrong_password_and_inactive_users_are_rejected_alike() {
        let repo = TestRepository::new();
        let user = seed_user(&repo, "Ana", USER_ROLE);

        let err = login(
            credentials("ana@example.com", "wrong!"),
            &repo,
            &keys(),
            &test_hasher(),
        )
        .await
        .unwrap_err();
        assert_eq!(err, ServiceError::InvalidCredentials);

        repo.deactivate_user(&user.id).unwrap();
        let err = login(
            credentials("ana@example.com", "secret1"),
            &repo,
            &keys(),
            &test_hasher(),
        )
        .await
        .unwrap_err();
        assert_eq!(err, ServiceError::InvalidCredentials);
    }

    #[actix_web::test]
    async fn login_validates_email_format() {
        let repo = TestRepository::new();
        let err = login(credentials("ana", "secret1"), &repo, &keys(), &test_hasher())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[actix_web::test]
    async fn first_google_sign_in_registers_the_user() {
        let repo = TestRepository::new();
        let google = FakeGoogle(Some(GoogleIdentity {
            name: "Ana Gómez".into(),
            email: "ana@gmail.com".into(),
            picture: Some("https://lh3.googleusercontent.com/a/ana.jpg".into()),
        }));
        let form = GoogleSignInForm {
            id_token: Some("token".into()),
        };

        let session = google_sign_in(form.clone(), &repo, &keys(), &test_hasher(), &google)
            .await
            .unwrap();
        assert!(session.user.google);
        assert_eq!(session.user.role, USER_ROLE);
        assert_eq!(
            session.user.image.as_deref(),
            Some("https://lh3.googleusercontent.com/a/ana.jpg")
        );

        let again = google_sign_in(form, &repo, &keys(), &test_hasher(), &google)
            .await
            .unwrap();
        assert_eq!(again.user.id, session.user.id);
    }

    #[actix_web::test]
    async fn blocked_google_users_get_no_session() {
        let repo = TestRepository::new();
        let user = seed_user(&repo, "Ana", USER_ROLE);
        repo.deactivate_user(&user.id).unwrap();
        let google = FakeGoogle(Some(GoogleIdentity {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            picture: None,
        }));

        let err = google_sign_in(
            GoogleSignInForm {
                id_token: Some("token".into()),
            },
            &repo,
            &keys(),
            &test_hasher(),
            &google,
        )
        .await
        .unwrap_err();
        assert_eq!(err, ServiceError::Blocked);
    }

    #[actix_web::test]
    async fn rejected_google_tokens() {
        let repo = TestRepository::new();
        let err = google_sign_in(
            GoogleSignInForm {
                id_token: Some("token".into()),
            },
            &repo,
            &keys(),
            &test_hasher(),
            &FakeGoogle(None),
        )
        .await
        .unwrap_err();
        assert_eq!(err, ServiceError::InvalidGoogleToken);
    }
}
