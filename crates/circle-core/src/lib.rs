//! Core types and trait definitions for the Circle social backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the records (identities, profiles, posts), the pure mutations applied to
//! them, the request forms and their validators, and the session token codec.

pub mod entries;
pub mod error;
pub mod form;
pub mod identity;
pub mod post;
pub mod profile;
pub mod store;
pub mod token;

pub use error::{Error, Result};
pub use form::FieldErrors;
