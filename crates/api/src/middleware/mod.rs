//! Middleware for the API layer.

pub mod auth;
