//! HTTP request handlers.

pub mod auth;
pub mod common;
pub mod health;
pub mod metadata;

pub use auth::*;
pub use common::*;
pub use health::*;
pub use metadata::*;
