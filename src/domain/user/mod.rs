//! User domain
//!
//! Account entity, validation rules and the credential store trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, PublicUser, User, UserId, UserPatch};
pub use repository::UserRepository;
pub use validation::{
    validate_age, validate_email, validate_name, validate_password, UserValidationError, MAX_AGE,
    MIN_AGE,
};

#[cfg(test)]
pub use repository::MockUserRepository;
