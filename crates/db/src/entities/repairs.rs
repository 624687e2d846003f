//! `SeaORM` Entity for the repairs table.
//!
//! The money columns (`subtotal`, `tax_rate`, `tax_amount`, `grand_total`)
//! are derived values. They are only ever written together, recomputed by
//! the invoice calculator from the repair's line items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "repairs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_id: i64,
    pub car_model: Option<String>,
    pub car_year: Option<i32>,
    pub license_plate: Option<String>,
    /// Calendar date of the repair, stored as `YYYY-MM-DD`.
    pub repair_date: String,
    pub description: Option<String>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub grand_total: Decimal,
    pub status: String,
    pub notes: Option<String>,
    pub created_by: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::repair_items::Entity")]
    RepairItems,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::repair_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RepairItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
