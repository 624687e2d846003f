//! Repair repository for database operations.
//!
//! All derived money values flow through `tamira_core::invoice`: create
//! and update recompute line totals, subtotal, tax amount, and grand
//! total together in one place. Totals sent by a client are never
//! persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;

use tamira_core::invoice::{InvoiceCalculator, LineItemInput};
use tamira_core::reporting::RepairRecord;

use crate::entities::{customers, repair_items, repairs};

/// Error types for repair operations.
#[derive(Debug, thiserror::Error)]
pub enum RepairError {
    /// Repair not found (or not owned by the requesting user).
    #[error("Repair not found: {0}")]
    NotFound(i64),

    /// Customer not found (or not owned by the requesting user).
    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    /// The repair date is not a calendar date in `YYYY-MM-DD` form.
    #[error("Invalid repair date: {0}")]
    InvalidRepairDate(String),

    /// An update carried no recognized fields.
    #[error("No fields provided for update")]
    EmptyUpdate,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a repair.
#[derive(Debug, Clone)]
pub struct CreateRepairInput {
    /// Customer the repair belongs to.
    pub customer_id: i64,
    /// Car model.
    pub car_model: Option<String>,
    /// Car year.
    pub car_year: Option<i32>,
    /// License plate.
    pub license_plate: Option<String>,
    /// Calendar date of the repair, `YYYY-MM-DD`.
    pub repair_date: String,
    /// Description of the work.
    pub description: Option<String>,
    /// Tax rate as a percentage.
    pub tax_rate: Decimal,
    /// Status string, `pending` when not supplied.
    pub status: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Line items; totals are recomputed, never taken from the caller.
    pub items: Vec<LineItemInput>,
}

/// Input for a partial repair update.
///
/// `None` leaves a field untouched. For nullable columns the inner
/// option distinguishes "set" from "clear".
#[derive(Debug, Clone, Default)]
pub struct UpdateRepairInput {
    /// New owning customer.
    pub customer_id: Option<i64>,
    /// Car model.
    pub car_model: Option<Option<String>>,
    /// Car year.
    pub car_year: Option<Option<i32>>,
    /// License plate.
    pub license_plate: Option<Option<String>>,
    /// Repair date, `YYYY-MM-DD`.
    pub repair_date: Option<String>,
    /// Description of the work.
    pub description: Option<Option<String>>,
    /// Status string.
    pub status: Option<String>,
    /// Free-form notes.
    pub notes: Option<Option<String>>,
    /// New tax rate; triggers a totals recompute.
    pub tax_rate: Option<Decimal>,
    /// Replacement item set; triggers a totals recompute.
    pub items: Option<Vec<LineItemInput>>,
}

impl UpdateRepairInput {
    /// Returns true when the update carries nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none()
            && self.car_model.is_none()
            && self.car_year.is_none()
            && self.license_plate.is_none()
            && self.repair_date.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.notes.is_none()
            && self.tax_rate.is_none()
            && self.items.is_none()
    }
}

/// A repair row joined with its customer's name and phone.
#[derive(Debug, Clone, Serialize)]
pub struct RepairWithCustomer {
    /// The repair row.
    #[serde(flatten)]
    pub repair: repairs::Model,
    /// Customer display name.
    pub customer_name: String,
    /// Customer phone.
    pub customer_phone: Option<String>,
}

/// A repair with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct RepairWithItems {
    /// The repair row.
    #[serde(flatten)]
    pub repair: repairs::Model,
    /// Customer display name.
    pub customer_name: String,
    /// Line items, insertion order.
    pub items: Vec<repair_items::Model>,
}

/// Repair repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct RepairRepository {
    db: DatabaseConnection,
}

impl RepairRepository {
    /// Creates a new repair repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a repair with its items, totals computed server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is missing or not owned by the
    /// user, the repair date is malformed, or a database operation fails.
    pub async fn create(
        &self,
        input: CreateRepairInput,
        created_by: i64,
    ) -> Result<RepairWithItems, RepairError> {
        let customer = self
            .find_owned_customer(input.customer_id, created_by)
            .await?;
        validate_repair_date(&input.repair_date)?;

        let invoice = InvoiceCalculator::build(input.items, input.tax_rate);
        let now = chrono::Utc::now();

        let txn = self.db.begin().await?;

        let repair = repairs::ActiveModel {
            customer_id: Set(input.customer_id),
            car_model: Set(input.car_model),
            car_year: Set(input.car_year),
            license_plate: Set(input.license_plate),
            repair_date: Set(input.repair_date),
            description: Set(input.description),
            subtotal: Set(invoice.totals.subtotal),
            tax_rate: Set(invoice.tax_rate),
            tax_amount: Set(invoice.totals.tax_amount),
            grand_total: Set(invoice.totals.grand_total),
            status: Set(input.status.unwrap_or_else(|| "pending".to_string())),
            notes: Set(input.notes),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let repair = repair.insert(&txn).await?;

        let items = insert_items(&txn, repair.id, &invoice.items).await?;

        txn.commit().await?;

        Ok(RepairWithItems {
            repair,
            customer_name: customer.name,
            items,
        })
    }

    /// Lists a user's repairs joined with customer name and phone, most
    /// recent repair date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<RepairWithCustomer>, DbErr> {
        let rows = repairs::Entity::find()
            .filter(repairs::Column::CreatedBy.eq(user_id))
            .find_also_related(customers::Entity)
            .order_by_desc(repairs::Column::RepairDate)
            .order_by_desc(repairs::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(with_customer).collect())
    }

    /// Finds a repair owned by the given user, with its items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_items(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<RepairWithItems>, DbErr> {
        let Some((repair, customer)) = repairs::Entity::find_by_id(id)
            .filter(repairs::Column::CreatedBy.eq(user_id))
            .find_also_related(customers::Entity)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let items = repair_items::Entity::find()
            .filter(repair_items::Column::RepairId.eq(repair.id))
            .order_by_asc(repair_items::Column::Id)
            .all(&self.db)
            .await?;

        Ok(Some(RepairWithItems {
            repair,
            customer_name: customer.map(|c| c.name).unwrap_or_default(),
            items,
        }))
    }

    /// Applies a partial update. When items or the tax rate are part of
    /// the update, the item set is replaced and subtotal, tax amount,
    /// and grand total are recomputed together.
    ///
    /// # Errors
    ///
    /// Returns an error if the repair or target customer is missing, the
    /// update is empty, the date is malformed, or a database operation
    /// fails.
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        input: UpdateRepairInput,
    ) -> Result<RepairWithItems, RepairError> {
        if input.is_empty() {
            return Err(RepairError::EmptyUpdate);
        }

        let repair = repairs::Entity::find_by_id(id)
            .filter(repairs::Column::CreatedBy.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(RepairError::NotFound(id))?;

        if let Some(customer_id) = input.customer_id {
            self.find_owned_customer(customer_id, user_id).await?;
        }
        if let Some(ref date) = input.repair_date {
            validate_repair_date(date)?;
        }

        let recompute = input.items.is_some() || input.tax_rate.is_some();
        let tax_rate = input.tax_rate.unwrap_or(repair.tax_rate);
        let item_inputs = match input.items {
            Some(items) => items,
            None if recompute => self.stored_item_inputs(repair.id).await?,
            None => Vec::new(),
        };

        let txn = self.db.begin().await?;

        let mut active: repairs::ActiveModel = repair.clone().into();
        if let Some(customer_id) = input.customer_id {
            active.customer_id = Set(customer_id);
        }
        if let Some(car_model) = input.car_model {
            active.car_model = Set(car_model);
        }
        if let Some(car_year) = input.car_year {
            active.car_year = Set(car_year);
        }
        if let Some(license_plate) = input.license_plate {
            active.license_plate = Set(license_plate);
        }
        if let Some(repair_date) = input.repair_date {
            active.repair_date = Set(repair_date);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }

        if recompute {
            let invoice = InvoiceCalculator::build(item_inputs, tax_rate);
            active.subtotal = Set(invoice.totals.subtotal);
            active.tax_rate = Set(invoice.tax_rate);
            active.tax_amount = Set(invoice.totals.tax_amount);
            active.grand_total = Set(invoice.totals.grand_total);

            repair_items::Entity::delete_many()
                .filter(repair_items::Column::RepairId.eq(repair.id))
                .exec(&txn)
                .await?;
            insert_items(&txn, repair.id, &invoice.items).await?;
        }

        active.updated_at = Set(chrono::Utc::now());
        active.update(&txn).await?;

        txn.commit().await?;

        self.find_with_items(id, user_id)
            .await?
            .ok_or(RepairError::NotFound(id))
    }

    /// Deletes a repair owned by the given user; items cascade. Returns
    /// whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<bool, DbErr> {
        let result = repairs::Entity::delete_many()
            .filter(repairs::Column::Id.eq(id))
            .filter(repairs::Column::CreatedBy.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Searches a user's repairs by customer name, car model, license
    /// plate, or description.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn search(
        &self,
        user_id: i64,
        query: &str,
    ) -> Result<Vec<RepairWithCustomer>, DbErr> {
        let rows = repairs::Entity::find()
            .filter(repairs::Column::CreatedBy.eq(user_id))
            .find_also_related(customers::Entity)
            .filter(
                Condition::any()
                    .add(customers::Column::Name.contains(query))
                    .add(repairs::Column::CarModel.contains(query))
                    .add(repairs::Column::LicensePlate.contains(query))
                    .add(repairs::Column::Description.contains(query)),
            )
            .order_by_desc(repairs::Column::RepairDate)
            .order_by_desc(repairs::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(with_customer).collect())
    }

    /// Loads a user's repairs as reporting records, optionally filtered
    /// by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_records_for_user(
        &self,
        user_id: i64,
        status: Option<&str>,
    ) -> Result<Vec<RepairRecord>, DbErr> {
        let mut query = repairs::Entity::find()
            .filter(repairs::Column::CreatedBy.eq(user_id))
            .find_also_related(customers::Entity)
            .order_by_desc(repairs::Column::RepairDate)
            .order_by_desc(repairs::Column::Id);

        if let Some(status) = status {
            query = query.filter(repairs::Column::Status.eq(status));
        }

        let rows = query.all(&self.db).await?;

        Ok(rows
            .into_iter()
            .map(|(repair, customer)| RepairRecord {
                repair_id: repair.id,
                customer_id: repair.customer_id,
                customer_name: customer.map(|c| c.name).unwrap_or_default(),
                repair_date: repair.repair_date,
                grand_total: Some(repair.grand_total),
                status: repair.status,
            })
            .collect())
    }

    async fn find_owned_customer(
        &self,
        customer_id: i64,
        user_id: i64,
    ) -> Result<customers::Model, RepairError> {
        customers::Entity::find_by_id(customer_id)
            .filter(customers::Column::CreatedBy.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(RepairError::CustomerNotFound(customer_id))
    }

    /// Reads the stored items back as calculator inputs, for recomputes
    /// that change the tax rate without touching the item set.
    async fn stored_item_inputs(&self, repair_id: i64) -> Result<Vec<LineItemInput>, DbErr> {
        let items = repair_items::Entity::find()
            .filter(repair_items::Column::RepairId.eq(repair_id))
            .order_by_asc(repair_items::Column::Id)
            .all(&self.db)
            .await?;

        Ok(items
            .into_iter()
            .map(|item| LineItemInput {
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect())
    }
}

fn with_customer((repair, customer): (repairs::Model, Option<customers::Model>)) -> RepairWithCustomer {
    let (customer_name, customer_phone) = customer
        .map(|c| (c.name, c.phone))
        .unwrap_or_default();
    RepairWithCustomer {
        repair,
        customer_name,
        customer_phone,
    }
}

fn validate_repair_date(date: &str) -> Result<NaiveDate, RepairError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| RepairError::InvalidRepairDate(date.to_string()))
}

async fn insert_items(
    txn: &DatabaseTransaction,
    repair_id: i64,
    items: &[tamira_core::invoice::LineItem],
) -> Result<Vec<repair_items::Model>, DbErr> {
    let now = chrono::Utc::now();
    let mut stored = Vec::with_capacity(items.len());

    for item in items {
        let row = repair_items::ActiveModel {
            repair_id: Set(repair_id),
            description: Set(item.description.clone()),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            total_price: Set(item.total_price),
            created_at: Set(now),
            ..Default::default()
        };
        stored.push(row.insert(txn).await?);
    }

    Ok(stored)
}
