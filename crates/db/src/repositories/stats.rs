//! Stats repository for dashboard overview aggregates.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

use crate::entities::{customers, repairs};

/// Per-user dashboard counters. Revenue counts completed repairs only.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOverview {
    /// Customers owned by the user.
    pub total_customers: u64,
    /// Repairs owned by the user, any status.
    pub total_repairs: u64,
    /// Repairs with status `completed`.
    pub completed_repairs: u64,
    /// Sum of grand totals over completed repairs.
    pub total_revenue: Decimal,
}

/// Stats repository for overview queries.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    db: DatabaseConnection,
}

impl StatsRepository {
    /// Creates a new stats repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the overview counters for one user.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn overview(&self, user_id: i64) -> Result<StatsOverview, DbErr> {
        let total_customers = customers::Entity::find()
            .filter(customers::Column::CreatedBy.eq(user_id))
            .count(&self.db)
            .await?;

        let total_repairs = repairs::Entity::find()
            .filter(repairs::Column::CreatedBy.eq(user_id))
            .count(&self.db)
            .await?;

        let completed = repairs::Entity::find()
            .filter(repairs::Column::CreatedBy.eq(user_id))
            .filter(repairs::Column::Status.eq("completed"))
            .all(&self.db)
            .await?;

        let completed_repairs = completed.len() as u64;
        let total_revenue: Decimal = completed.iter().map(|r| r.grand_total).sum();

        Ok(StatsOverview {
            total_customers,
            total_repairs,
            completed_repairs,
            total_revenue,
        })
    }
}
