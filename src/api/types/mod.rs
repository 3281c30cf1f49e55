//! Request and response types shared by the handlers

pub mod error;
pub mod extract;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, UNAUTHENTICATED_MESSAGE};
pub use extract::{Path, Query};
pub use json::Json;
