//! The module contains the errors the ledger service can throw.
//!
//! Most variants just surface the engine's or the pipeline's own error
//! untranslated; [`CategoriesNotConfigured`] is the service's one addition,
//! raised before any external call is attempted.
//!
//! [`CategoriesNotConfigured`]: ServiceError::CategoriesNotConfigured

use engine::EngineError;
use thiserror::Error;
use voice::VoiceError;

/// Ledger service custom errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The account has an empty allow-list, so no voice commit can succeed.
    #[error("Categories not configured for: {0}")]
    CategoriesNotConfigured(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Voice(#[from] VoiceError),
}

impl PartialEq for ServiceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::CategoriesNotConfigured(a), Self::CategoriesNotConfigured(b)) => a == b,
            (Self::Engine(a), Self::Engine(b)) => a == b,
            (Self::Voice(a), Self::Voice(b)) => a == b,
            _ => false,
        }
    }
}
