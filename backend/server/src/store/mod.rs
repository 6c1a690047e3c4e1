//! Repository interfaces, one per entity, and their backends.
//!
//! | Backend           | Module     | Used by                    |
//! |-------------------|------------|----------------------------|
//! | [`SqliteStore`]   | `sqlite`   | the running service        |
//! | [`MemoryStore`]   | `memory`   | tests                      |
//!
//! Callers only see the traits through [`Store`], so a different database
//! can be dropped in without touching the service layer.

#[cfg(test)]
mod memory;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use nova_core::{CardDesign, CustomTemplate, Event, EventStatus, Guest, PaymentDetails, User};
use sqlx::SqlitePool;

use crate::errors::Result;

#[cfg(test)]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Duplicate` when the email is already registered.
    async fn insert_user(&self, user: &User) -> Result<()>;
    async fn get_user(&self, id: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Overwrites every profile field; `NotFound` for an unknown id.
    async fn update_user(&self, user: &User) -> Result<()>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts the event with its locations, options, templates and initial
    /// guests as one unit; on error nothing is stored.
    async fn insert_event(&self, event: &Event, guests: &[Guest]) -> Result<()>;
    async fn get_event(&self, id: &str) -> Result<Option<Event>>;
    /// Newest event date first.
    async fn list_events_for_owner(&self, owner_id: &str) -> Result<Vec<Event>>;
    /// Replaces the stored design wholesale; `NotFound` for an unknown id.
    async fn save_card_design(&self, id: &str, design: &CardDesign) -> Result<()>;
    async fn save_payment_details(&self, id: &str, details: &PaymentDetails) -> Result<()>;
    /// Upserts one template per type.
    async fn save_templates(&self, id: &str, templates: &[CustomTemplate]) -> Result<()>;
    async fn set_event_status(&self, id: &str, status: EventStatus) -> Result<()>;
    /// Removes the event together with its guests.
    async fn delete_event(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait GuestRepository: Send + Sync {
    /// All-or-nothing bulk insert.
    async fn insert_guests(&self, guests: &[Guest]) -> Result<()>;
    /// Insertion order.
    async fn list_guests(&self, event_id: &str) -> Result<Vec<Guest>>;
    async fn get_guest(&self, id: &str) -> Result<Option<Guest>>;
    async fn get_guest_by_token(&self, token: &str) -> Result<Option<Guest>>;
    /// Overwrites the mutable guest fields; `NotFound` for an unknown id.
    async fn update_guest(&self, guest: &Guest) -> Result<()>;
    async fn delete_guest(&self, id: &str) -> Result<()>;
}

/// The repositories the service layer is wired with.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub events: Arc<dyn EventRepository>,
    pub guests: Arc<dyn GuestRepository>,
}

impl Store {
    pub fn sqlite(pool: SqlitePool) -> Self {
        let backend = Arc::new(SqliteStore::new(pool));
        Self {
            users: backend.clone(),
            events: backend.clone(),
            guests: backend,
        }
    }

    #[cfg(test)]
    pub fn memory() -> Self {
        let backend = Arc::new(MemoryStore::default());
        Self {
            users: backend.clone(),
            events: backend.clone(),
            guests: backend,
        }
    }
}
