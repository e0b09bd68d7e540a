pub mod auth_dto;
pub mod auth_handlers;
pub mod auth_service;
pub mod jwt;
pub mod password;
pub mod session;

pub use auth_dto::{ApiResponse, LoginRequest, RegisterRequest};
pub use auth_handlers::{login, logout, register};
pub use auth_service::AuthService;
