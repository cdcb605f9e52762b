//! HTTP API module for the receipt engine.
//!
//! This module provides the REST endpoints for processing receipt images or
//! model text and for splitting a reconciled receipt across claims.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{SplitRequest, TextReceiptRequest};
pub use response::ApiError;
pub use state::AppState;
