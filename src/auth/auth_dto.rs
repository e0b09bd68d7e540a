use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::user::user_models::UserProfile;

/// Fields are optional so a missing one is reported as our own validation
/// error rather than a deserialization failure.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(max = 255, message = "Name is too long."))]
    pub name: Option<String>,
    #[validate(length(max = 255, message = "Email is too long."))]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Envelope shared by every account endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl ApiResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            user: None,
        }
    }

    pub fn user(user: UserProfile) -> Self {
        Self {
            success: true,
            message: None,
            user: Some(user),
        }
    }

    pub fn user_with_message(user: UserProfile, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            user: Some(user),
        }
    }
}
