//! Repositories translate a caller identity plus public path numbers into
//! authorized access to the entity store.
//!
//! Every scoped lookup goes through [`Ownership`], so a broken link anywhere in
//! the user → project → task chain surfaces as the same [`RepoError::NotFound`].
//!
//! Ownership is resolved before any transaction opens. Every mutating
//! transaction then starts with a conditional write on the target row (a
//! parent before its children), and a write that matches nothing means the
//! row went away in between. SQLite takes its write lock on that first
//! statement, and row-locking stores make competing counter bumps wait for
//! the cascade.

mod locks;
mod ownership;
pub mod project;
pub mod task;
pub mod user;

use sea_orm::DbErr;

use crate::entities::InvalidEnumValue;

pub use locks::{LockKey, OwnerLocks};
pub use ownership::Ownership;
pub use project::{ProjectDraft, ProjectPatch, ProjectRepository};
pub use task::{TaskDraft, TaskPatch, TaskRepository};
pub use user::{UserDraft, UserPatch, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("user already exists")]
    AlreadyExists,

    #[error("invalid credentials")]
    Unauthenticated,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<InvalidEnumValue> for RepoError {
    fn from(err: InvalidEnumValue) -> Self {
        RepoError::InvalidArgument(err.to_string())
    }
}
