//! `SeaORM` entity definitions.

pub mod customers;
pub mod repair_items;
pub mod repairs;
pub mod sessions;
pub mod users;
