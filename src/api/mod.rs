//! JSON REST API over the tracker (actix-web).

mod error;
mod handlers;
mod state;

pub use error::ApiError;
pub use handlers::configure;
pub use state::AppState;
