// # Routes Module
//
// HTTP route handlers, grouped by functionality. Routes are registered in
// `server.rs`.

pub mod auth;

/// Health check endpoint
pub mod health;

/// Hall CRUD endpoints
pub mod hala;

/// Sample weather endpoint
pub mod weather;
