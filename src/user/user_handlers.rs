use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    auth::auth_dto::ApiResponse,
    error::{AppError, Result},
    media::UploadFile,
    middleware::AuthUser,
    state::AppState,
    user::user_dto::UpdateProfileForm,
};

const PHOTO_FIELD: &str = "profilePhoto";

/// Get the signed-in user's profile with enrolled courses
#[utoipa::path(
    get,
    path = "/api/v1/user/profile",
    tag = "user",
    responses(
        (status = 200, description = "Profile retrieved", body = ApiResponse),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Profile not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn get_user_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .get_profile(user_id)
        .await
        .map_err(|e| e.or_internal("Failed to get user profile"))?;

    Ok((StatusCode::OK, Json(ApiResponse::user(user))))
}

/// Update name and/or profile photo
#[utoipa::path(
    put,
    path = "/api/v1/user/profile/update",
    tag = "user",
    request_body(
        content = crate::user::user_dto::UpdateProfileMultipart,
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "User not found"),
        (status = 413, description = "Profile photo too large")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = read_profile_form(multipart).await?;

    let user = state
        .user_service
        .update_profile(user_id, form)
        .await
        .map_err(|e| e.or_internal("Failed to update profile"))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::user_with_message(user, "Profile updated successfully.")),
    ))
}

/// Resolve the session to its account
#[utoipa::path(
    get,
    path = "/api/v1/user/check-auth",
    tag = "user",
    responses(
        (status = 200, description = "Session is valid", body = ApiResponse),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "User not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn check_auth(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .check_auth(user_id)
        .await
        .map_err(|e| e.or_internal("Failed to check auth."))?;

    Ok((StatusCode::OK, Json(ApiResponse::user(user))))
}

/// Body limit breaches keep their 413; anything else is a malformed form.
fn form_error(err: MultipartError, message: &str) -> AppError {
    tracing::debug!("Failed to read multipart body: {}", err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Profile photo is too large.".to_string())
    } else {
        AppError::Validation(message.to_string())
    }
}

async fn read_profile_form(mut multipart: Multipart) -> Result<UpdateProfileForm> {
    let mut form = UpdateProfileForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, "Invalid profile form"))?
    {
        match field.name().unwrap_or("") {
            "name" => {
                let name = field
                    .text()
                    .await
                    .map_err(|e| form_error(e, "Invalid name"))?;
                form.name = Some(name);
            }
            PHOTO_FIELD => form.profile_photo = read_photo(field).await?,
            other => tracing::debug!("Ignoring form field: {}", other),
        }
    }

    Ok(form)
}

/// An empty part without a file name is a file input left blank.
async fn read_photo(field: Field<'_>) -> Result<Option<UploadFile>> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| form_error(e, "Invalid profile photo"))?;

    if bytes.is_empty() && file_name.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadFile {
        file_name: if file_name.is_empty() { PHOTO_FIELD.to_string() } else { file_name },
        content_type,
        bytes,
    }))
}
