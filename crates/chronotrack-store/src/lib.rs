//! Chronotrack remote store client
//!
//! HTTP client for the managed backend (hosted database + auth + RPC).
//! The backend exposes a PostgREST-style REST surface; this crate wraps it
//! in typed insert/update/select/delete/rpc calls and the password-grant
//! auth endpoints.

pub mod auth;
pub mod client;
pub mod error;
pub mod query;

pub use auth::{AuthUser, Credentials, Session, TokenCache};
pub use client::StoreClient;
pub use error::{Error, Result};
pub use query::Query;
