//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`AccountNotFound`] thrown when no [`Account`] exists for a user.
//! - [`CategoryNotAllowed`] thrown when a commit names a category outside the
//!   account allow-list.
//!
//!  [`AccountNotFound`]: EngineError::AccountNotFound
//!  [`CategoryNotAllowed`]: EngineError::CategoryNotAllowed
//!  [`Account`]: super::accounts::Account
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),
    #[error("Category not allowed: {0}")]
    CategoryNotAllowed(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),
    #[error("Balance overflow: {0}")]
    Overflow(String),
    #[error("Corrupted record: {0}")]
    Corrupted(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AccountNotFound(a), Self::AccountNotFound(b)) => a == b,
            (Self::AccountAlreadyExists(a), Self::AccountAlreadyExists(b)) => a == b,
            (Self::CategoryNotAllowed(a), Self::CategoryNotAllowed(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::InvalidUserId(a), Self::InvalidUserId(b)) => a == b,
            (Self::Overflow(a), Self::Overflow(b)) => a == b,
            (Self::Corrupted(a), Self::Corrupted(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
