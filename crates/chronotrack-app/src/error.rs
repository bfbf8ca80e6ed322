//! Application-layer error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] chronotrack_store::Error),

    #[error("Core error: {0}")]
    Core(#[from] chronotrack_core::Error),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Admin privileges required")]
    NotAdmin,

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
