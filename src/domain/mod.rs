//! Domain layer - Core business logic and entities

pub mod error;
pub mod order;
pub mod pagination;
pub mod patch;
pub mod status;
pub mod user;

pub use error::DomainError;
pub use order::{NewOrder, Order, OrderId, OrderPatch, OrderRepository};
pub use pagination::{Page, PageRequest};
pub use patch::Patch;
pub use status::RecordStatus;
pub use user::{NewUser, PublicUser, User, UserId, UserPatch, UserRepository};
