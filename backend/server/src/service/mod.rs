//! Service layer: every operation the HTTP API exposes.
//!
//! | Area                                      | Module       |
//! |-------------------------------------------|--------------|
//! | Organizer accounts                        | `users`      |
//! | Events, card design, payments, templates  | `events`     |
//! | Guest lists, CSV import, dashboard        | `guests`     |
//! | Guest-facing contribution page            | `contribute` |
//!
//! [`Registry`] owns the repositories and the change feed. Validation runs
//! before any write, so a rejected request never leaves partial state.

mod contribute;
mod events;
mod guests;
mod users;

pub use contribute::ContributeRequest;
pub use events::NewEvent;
pub use guests::{MappingIndices, NewGuest};
pub use users::{NewUser, ProfileUpdate};

use nova_core::{Event, Guest, User};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::feed::ChangeFeed;
use crate::store::Store;

/// Values the service reads from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub default_pledge: i64,
    /// No trailing slash.
    pub public_base_url: String,
}

#[derive(Clone)]
pub struct Registry {
    store: Store,
    feed: ChangeFeed,
    settings: Settings,
}

impl Registry {
    pub fn new(store: Store, feed: ChangeFeed, settings: Settings) -> Self {
        Self {
            store,
            feed,
            settings,
        }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// The personal link printed on a guest's card.
    pub fn contribution_link(&self, token: &str) -> String {
        format!("{}/contribute/{token}", self.settings.public_base_url)
    }

    async fn require_user(&self, id: &str) -> Result<User> {
        self.store
            .users
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", id))
    }

    async fn require_event(&self, id: &str) -> Result<Event> {
        self.store
            .events
            .get_event(id)
            .await?
            .ok_or_else(|| AppError::not_found("event", id))
    }

    async fn require_guest(&self, id: &str) -> Result<Guest> {
        self.store
            .guests
            .get_guest(id)
            .await?
            .ok_or_else(|| AppError::not_found("guest", id))
    }

    async fn require_guest_by_token(&self, token: &str) -> Result<Guest> {
        self.store
            .guests
            .get_guest_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("contribution link", token))
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// 32 hex characters from a random UUID.
fn new_token() -> String {
    hex::encode(Uuid::new_v4().as_bytes())
}

/// `None` for missing or whitespace-only input, otherwise the trimmed text.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
