pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod messages;
pub mod state;
pub mod users;

pub use app::build_app;
pub use error::{AppError, AppResult};
pub use state::AppState;
