//! Authentication primitives.
//!
//! This module provides:
//! - Password hashing and verification with Argon2id
//! - The minimum-length password policy applied at registration

mod password;

pub use password::{
    MIN_PASSWORD_LEN, PasswordError, hash_password, validate_password, verify_password,
};
