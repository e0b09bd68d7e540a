use crate::{
    auth::{self, ApiResponse, LoginRequest, RegisterRequest},
    middleware::auth_middleware,
    state::AppState,
    user::{self, user_dto::UpdateProfileMultipart, Course, UserProfile},
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::auth_handlers::register,
        auth::auth_handlers::login,
        auth::auth_handlers::logout,
        user::user_handlers::get_user_profile,
        user::user_handlers::update_profile,
        user::user_handlers::check_auth,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            ApiResponse,
            UserProfile,
            Course,
            UpdateProfileMultipart,
        )
    ),
    tags(
        (name = "user", description = "Account registration, sessions and profile")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Cookie(
                        utoipa::openapi::security::ApiKeyValue::new(
                            crate::auth::session::SESSION_COOKIE,
                        ),
                    ),
                ),
            )
        }
    }
}

pub fn user_routes(state: AppState) -> Router<AppState> {
    let max_upload_bytes = state.config.max_upload_bytes;

    // Public routes (no auth required)
    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout));

    // Protected routes (auth required)
    let protected = Router::new()
        .route("/profile", get(user::get_user_profile))
        .route(
            "/profile/update",
            put(user::update_profile).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/check-auth", get(user::check_auth))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}

/// Cookies only cross origins when a concrete client origin is configured.
fn cors_layer(client_origin: Option<&str>) -> CorsLayer {
    match client_origin.and_then(|origin| origin.parse::<HeaderValue>().ok()) {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.client_origin.as_deref());

    let api_routes = Router::new().nest("/user", user_routes(state.clone()));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
