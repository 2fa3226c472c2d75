//! Web layer for the SNV resolution service.
//!
//! Provides HTTP endpoints for resolving coordinates and reading the
//! dataset version.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
