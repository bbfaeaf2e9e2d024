//! # Authentication Module
//!
//! Token issuance, validation, revocation and the middleware that guards the
//! protected endpoints.

pub mod error;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod revocation;
