//! Customer repository for database operations.
//!
//! Every query is scoped to the owning user (`created_by`); a customer
//! belonging to someone else behaves exactly like a missing row.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::customers;

/// Fields accepted when creating or updating a customer.
#[derive(Debug, Clone, Default)]
pub struct CustomerInput {
    /// Customer name (required).
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// Status, `active` when not supplied.
    pub status: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Customer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CustomerInput,
        created_by: i64,
    ) -> Result<customers::Model, DbErr> {
        let now = chrono::Utc::now();
        let customer = customers::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            company: Set(input.company),
            status: Set(input.status.unwrap_or_else(|| "active".to_string())),
            notes: Set(input.notes),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        customer.insert(&self.db).await
    }

    /// Lists a user's customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<customers::Model>, DbErr> {
        customers::Entity::find()
            .filter(customers::Column::CreatedBy.eq(user_id))
            .order_by_desc(customers::Column::CreatedAt)
            .order_by_desc(customers::Column::Id)
            .all(&self.db)
            .await
    }

    /// Finds a customer owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_for_user(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find_by_id(id)
            .filter(customers::Column::CreatedBy.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Replaces a customer's fields. Returns `None` when the customer is
    /// missing or owned by someone else.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        input: CustomerInput,
    ) -> Result<Option<customers::Model>, DbErr> {
        let Some(customer) = self.find_for_user(id, user_id).await? else {
            return Ok(None);
        };

        let mut active: customers::ActiveModel = customer.into();
        active.name = Set(input.name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.company = Set(input.company);
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.notes = Set(input.notes);
        active.updated_at = Set(chrono::Utc::now());

        active.update(&self.db).await.map(Some)
    }

    /// Deletes a customer owned by the given user. Returns whether a row
    /// was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<bool, DbErr> {
        let result = customers::Entity::delete_many()
            .filter(customers::Column::Id.eq(id))
            .filter(customers::Column::CreatedBy.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Searches a user's customers by name, email, phone, or company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn search(&self, user_id: i64, query: &str) -> Result<Vec<customers::Model>, DbErr> {
        customers::Entity::find()
            .filter(customers::Column::CreatedBy.eq(user_id))
            .filter(
                Condition::any()
                    .add(customers::Column::Name.contains(query))
                    .add(customers::Column::Email.contains(query))
                    .add(customers::Column::Phone.contains(query))
                    .add(customers::Column::Company.contains(query)),
            )
            .order_by_desc(customers::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}
