pub mod user_dto;
pub mod user_handlers;
pub mod user_models;
pub mod user_repository;
pub mod user_service;

pub use user_handlers::{check_auth, get_user_profile, update_profile};
pub use user_models::{Course, UserProfile};
pub use user_repository::PgUserRepository;
pub use user_service::UserService;
