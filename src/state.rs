use std::sync::Arc;

use anyhow::Context;

use crate::auth::auth_service::AuthService;
use crate::auth::session::SessionConfig;
use crate::media::SignatureAlgorithm;
use crate::user::user_service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub user_service: UserService,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub cloudinary_signature_algorithm: SignatureAlgorithm,
    pub client_origin: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_hours: parsed("JWT_EXPIRATION_HOURS", 24)?,
            bcrypt_cost: parsed("BCRYPT_COST", 10)?,
            cookie_secure: parsed("COOKIE_SECURE", false)?,
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            cloudinary_cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
            cloudinary_api_key: required("CLOUDINARY_API_KEY")?,
            cloudinary_api_secret: required("CLOUDINARY_API_SECRET")?,
            cloudinary_signature_algorithm: parsed(
                "CLOUDINARY_SIGNATURE_ALGORITHM",
                SignatureAlgorithm::default(),
            )?,
            client_origin: std::env::var("CLIENT_ORIGIN").ok(),
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 3000)?,
        })
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            secret: self.jwt_secret.clone(),
            lifetime_hours: self.jwt_expiration_hours,
            secure_cookie: self.cookie_secure,
        }
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
