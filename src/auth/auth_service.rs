use std::sync::Arc;

use axum_extra::extract::cookie::Cookie;
use uuid::Uuid;
use validator::Validate;

use crate::auth::auth_dto::{LoginRequest, RegisterRequest};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::SessionConfig;
use crate::error::{AppError, Result};
use crate::user::user_models::UserProfile;
use crate::user::user_repository::UserStore;

/// Same text for unknown email and wrong password.
pub const BAD_CREDENTIALS: &str = "Incorrect email or password";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    session: SessionConfig,
    bcrypt_cost: u32,
    /// Checked against when the email is unknown, so both login failures cost
    /// one bcrypt verify.
    dummy_hash: Arc<str>,
}

fn present(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.trim().is_empty())
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        session: SessionConfig,
        bcrypt_cost: u32,
    ) -> Result<Self> {
        let dummy_hash = hash_password(&Uuid::new_v4().to_string(), bcrypt_cost)?;
        Ok(Self {
            users,
            session,
            bcrypt_cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub async fn register(&self, payload: &RegisterRequest) -> Result<()> {
        let (Some(name), Some(email), Some(password)) = (
            present(payload.name.as_deref()),
            present(payload.email.as_deref()),
            present(payload.password.as_deref()),
        ) else {
            return Err(AppError::Validation("All fields are required.".to_string()));
        };
        payload.validate()?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User already exists.".to_string()));
        }

        let password_hash = hash_password(password, self.bcrypt_cost)?;
        let user = self.users.create(name, email, &password_hash).await?;

        tracing::info!(user_id = %user.id, "account registered");
        Ok(())
    }

    /// Checks credentials and returns the profile with a fresh session cookie.
    pub async fn login(&self, payload: &LoginRequest) -> Result<(UserProfile, Cookie<'static>)> {
        let email = payload.email.as_deref().unwrap_or_default();
        let password = payload.password.as_deref().unwrap_or_default();

        let Some(user) = self.users.find_by_email(email).await? else {
            verify_password(password, &self.dummy_hash)?;
            return Err(AppError::Authentication(BAD_CREDENTIALS.to_string()));
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Authentication(BAD_CREDENTIALS.to_string()));
        }

        let cookie = self.session.issue(user.id)?;
        let courses = self.users.enrolled_courses(user.id).await?;

        tracing::info!(user_id = %user.id, "session issued");
        Ok((UserProfile::with_courses(user, courses), cookie))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryUserStore;

    fn service(store: Arc<InMemoryUserStore>) -> AuthService {
        AuthService::new(
            store,
            SessionConfig {
                secret: "mysecretkey".to_string(),
                lifetime_hours: 24,
                secure_cookie: false,
            },
            4,
        )
        .unwrap()
    }

    fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn register_stores_hashed_password() {
        let store = Arc::new(InMemoryUserStore::default());
        let auth = service(store.clone());

        auth.register(&register_request("Ada", "ada@example.com", "hunter22"))
            .await
            .unwrap();

        let user = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(user.name, "Ada");
        assert_ne!(user.password_hash, "hunter22");
        assert!(verify_password("hunter22", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn register_twice_is_a_conflict() {
        let store = Arc::new(InMemoryUserStore::default());
        let auth = service(store.clone());
        let request = register_request("Ada", "ada@example.com", "hunter22");

        auth.register(&request).await.unwrap();
        let err = auth.register(&request).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn register_requires_every_field() {
        let store = Arc::new(InMemoryUserStore::default());
        let auth = service(store.clone());

        let cases = [
            register_request("", "ada@example.com", "hunter22"),
            register_request("Ada", "", "hunter22"),
            register_request("Ada", "ada@example.com", "   "),
            RegisterRequest::default(),
        ];

        for request in &cases {
            let err = auth.register(request).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == "All fields are required."));
        }
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let store = Arc::new(InMemoryUserStore::default());
        let auth = service(store.clone());

        auth.register(&register_request("Ada", "ada@example.com", "hunter22"))
            .await
            .unwrap();
        auth.register(&register_request("Ada", "Ada@example.com", "hunter22"))
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn login_issues_session_for_correct_password() {
        let store = Arc::new(InMemoryUserStore::default());
        let auth = service(store.clone());
        auth.register(&register_request("Ada", "ada@example.com", "hunter22"))
            .await
            .unwrap();

        let (profile, cookie) = auth
            .login(&login_request("ada@example.com", "hunter22"))
            .await
            .unwrap();

        assert_eq!(profile.name, "Ada");
        assert_eq!(auth.session().verify(cookie.value()).unwrap(), profile.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let store = Arc::new(InMemoryUserStore::default());
        let auth = service(store.clone());
        auth.register(&register_request("Ada", "ada@example.com", "hunter22"))
            .await
            .unwrap();

        let wrong_password = auth
            .login(&login_request("ada@example.com", "nope"))
            .await
            .unwrap_err();
        let unknown_email = auth
            .login(&login_request("bob@example.com", "hunter22"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.status(), unknown_email.status());
        assert!(matches!(wrong_password, AppError::Authentication(ref m) if m == BAD_CREDENTIALS));
    }

    #[tokio::test]
    async fn unknown_email_pays_for_a_verify() {
        let auth = service(Arc::new(InMemoryUserStore::default()));

        assert!(auth.dummy_hash.starts_with("$2b$04$"));
        assert!(!verify_password("", &auth.dummy_hash).unwrap());
    }

    #[tokio::test]
    async fn login_with_missing_fields_is_bad_credentials() {
        let store = Arc::new(InMemoryUserStore::default());
        let auth = service(store.clone());
        auth.register(&register_request("Ada", "ada@example.com", "hunter22"))
            .await
            .unwrap();

        let cases = [
            LoginRequest {
                email: Some("ada@example.com".to_string()),
                password: None,
            },
            LoginRequest {
                email: None,
                password: Some("hunter22".to_string()),
            },
            LoginRequest::default(),
        ];

        for request in &cases {
            let err = auth.login(request).await.unwrap_err();
            assert!(matches!(err, AppError::Authentication(ref m) if m == BAD_CREDENTIALS));
        }
    }

    #[tokio::test]
    async fn long_password_is_accepted() {
        let store = Arc::new(InMemoryUserStore::default());
        let auth = service(store.clone());
        let password = "p".repeat(100);

        auth.register(&register_request("Ada", "ada@example.com", &password))
            .await
            .unwrap();
        let (profile, _) = auth.login(&login_request("ada@example.com", &password)).await.unwrap();

        assert_eq!(profile.email, "ada@example.com");
    }
}
