//! Infrastructure layer - storage, auth and observability implementations

pub mod auth;
pub mod logging;
pub mod observability;
pub mod order;
pub mod storage;
pub mod user;
