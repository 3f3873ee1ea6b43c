pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod models;
pub mod services;

pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
