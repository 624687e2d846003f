//! Core business logic for Tamira.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `invoice` - Line item pricing and invoice total calculation
//! - `reporting` - Revenue report periods, filtering, and summation
//! - `repair` - Repair job vocabulary (statuses)
//! - `auth` - Password hashing

pub mod auth;
pub mod invoice;
pub mod repair;
pub mod reporting;
