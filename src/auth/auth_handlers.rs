use super::auth_dto::{ApiResponse, LoginRequest, RegisterRequest};
use crate::{
    error::{AppError, Result},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::{CookieJar, WithRejection};

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse),
        (status = 400, description = "Missing field or email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "user"
)]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<impl IntoResponse> {
    state
        .auth_service
        .register(&payload)
        .await
        .map_err(|e| e.or_internal("Failed to register"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Account created successfully.")),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = ApiResponse),
        (status = 400, description = "Incorrect email or password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "user"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<impl IntoResponse> {
    let (user, cookie) = state
        .auth_service
        .login(&payload)
        .await
        .map_err(|e| e.or_internal("Failed to login"))?;

    let message = format!("Welcome back {}", user.name);

    Ok((
        StatusCode::OK,
        jar.add(cookie),
        Json(ApiResponse::user_with_message(user, message)),
    ))
}

/// Logout (clear the session cookie)
#[utoipa::path(
    get,
    path = "/api/v1/user/logout",
    responses(
        (status = 200, description = "Logged out successfully", body = ApiResponse),
    ),
    tag = "user"
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (
        StatusCode::OK,
        jar.add(state.auth_service.session().cleared()),
        Json(ApiResponse::message("Logged out successfully")),
    )
}
