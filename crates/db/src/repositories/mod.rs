//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod customer;
pub mod repair;
pub mod session;
pub mod stats;
pub mod user;

pub use customer::{CustomerInput, CustomerRepository};
pub use repair::{
    CreateRepairInput, RepairError, RepairRepository, RepairWithCustomer, RepairWithItems,
    UpdateRepairInput,
};
pub use session::SessionRepository;
pub use stats::{StatsOverview, StatsRepository};
pub use user::UserRepository;
