//! Web layer for the fuel route planner.
//!
//! Provides the JSON planning endpoint and a health check.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
