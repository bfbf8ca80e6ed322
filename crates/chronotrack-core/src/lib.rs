pub mod error;
pub mod export;
pub mod models;
pub mod report;

pub use error::{Error, Result};
