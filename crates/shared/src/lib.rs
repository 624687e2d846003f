//! Shared types and configuration for Tamira.
//!
//! This crate provides common types used across all other crates:
//! - Authentication request/response payloads
//! - Configuration management

pub mod auth;
pub mod config;

pub use config::AppConfig;
