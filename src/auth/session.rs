use axum_extra::extract::cookie::{Cookie, SameSite};
use uuid::Uuid;

use super::jwt::{create_session_token, verify_session_token};
use crate::error::Result;

pub const SESSION_COOKIE: &str = "token";

/// Issues and checks the session cookie. Sessions are stateless: the cookie
/// carries a signed token and nothing is kept server-side.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub secret: String,
    pub lifetime_hours: i64,
    pub secure_cookie: bool,
}

impl SessionConfig {
    pub fn issue(&self, user_id: Uuid) -> Result<Cookie<'static>> {
        let token = create_session_token(user_id, &self.secret, self.lifetime_hours)?;

        Ok(Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure_cookie)
            .max_age(time::Duration::hours(self.lifetime_hours))
            .build())
    }

    /// An empty, already-expired session cookie.
    pub fn cleared(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure_cookie)
            .max_age(time::Duration::ZERO)
            .build()
    }

    pub fn verify(&self, token: &str) -> Result<Uuid> {
        verify_session_token(token, &self.secret)
    }
}
