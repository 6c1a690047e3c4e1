//! SQLite-backed repositories.
//!
//! The card design and payment details are kept as JSON text in the `events`
//! row, in the same shape the API serves them. Child collections (locations,
//! contribution options, templates) live in their own tables and are loaded
//! alongside the event.

use std::str::FromStr;

use async_trait::async_trait;
use nova_core::{
    CardDesign, ContributionOption, CustomTemplate, Event, EventLocation, EventStatus, Guest,
    PaymentDetails, User,
};
use serde::de::DeserializeOwned;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use super::{EventRepository, GuestRepository, UserRepository};
use crate::errors::{AppError, Result};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// ─────────────────────────────────────────────────────────
// Row shapes
// ─────────────────────────────────────────────────────────

#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    phone: Option<String>,
    provider: String,
    bio: Option<String>,
    avatar_url: Option<String>,
    join_date: i64,
    defaults: Option<String>,
}

#[derive(FromRow)]
struct EventRow {
    id: String,
    owner_id: String,
    name: String,
    event_type: String,
    description: Option<String>,
    event_date: String,
    visibility: String,
    status: String,
    card_design: Option<String>,
    payment_details: Option<String>,
    created_at: i64,
}

#[derive(FromRow)]
struct TemplateRow {
    template_type: String,
    subject: String,
    body: String,
}

#[derive(FromRow)]
struct GuestRow {
    id: String,
    event_id: String,
    name: String,
    phone: String,
    option_id: Option<String>,
    pledge_amount: i64,
    payment_method: Option<String>,
    payment_status: String,
    transaction_id: Option<String>,
    rsvp_status: String,
    checked_in: bool,
    checked_in_at: Option<i64>,
    paid_at: Option<i64>,
    secure_token: String,
    created_at: i64,
}

const GUEST_COLUMNS: &str = "id, event_id, name, phone, option_id, pledge_amount, payment_method, \
     payment_status, transaction_id, rsvp_status, checked_in, checked_in_at, paid_at, \
     secure_token, created_at";

const USER_COLUMNS: &str = "id, name, email, phone, provider, bio, avatar_url, join_date, defaults";

const EVENT_COLUMNS: &str = "id, owner_id, name, event_type, description, event_date, visibility, \
     status, card_design, payment_details, created_at";

fn parse_enum<T: FromStr>(column: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::Corrupt(format!("unexpected {column} value '{raw}'")))
}

fn parse_json<T: DeserializeOwned>(raw: Option<String>) -> Result<Option<T>> {
    raw.map(|s| serde_json::from_str(&s)).transpose().map_err(AppError::from)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            provider: row.provider,
            bio: row.bio,
            avatar_url: row.avatar_url,
            join_date: row.join_date,
            defaults: parse_json(row.defaults)?,
        })
    }
}

impl TryFrom<GuestRow> for Guest {
    type Error = AppError;

    fn try_from(row: GuestRow) -> Result<Self> {
        Ok(Guest {
            id: row.id,
            event_id: row.event_id,
            name: row.name,
            phone: row.phone,
            option_id: row.option_id,
            pledge_amount: row.pledge_amount,
            payment_method: row
                .payment_method
                .as_deref()
                .map(|m| parse_enum("payment_method", m))
                .transpose()?,
            payment_status: parse_enum("payment_status", &row.payment_status)?,
            transaction_id: row.transaction_id,
            rsvp_status: parse_enum("rsvp_status", &row.rsvp_status)?,
            checked_in: row.checked_in,
            checked_in_at: row.checked_in_at,
            paid_at: row.paid_at,
            secure_token: row.secure_token,
            created_at: row.created_at,
        })
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Insert `guests` on an open transaction.
async fn insert_guest_rows(conn: &mut SqliteConnection, guests: &[Guest]) -> Result<()> {
    for g in guests {
        sqlx::query(&format!(
            "INSERT INTO guests ({GUEST_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
        ))
        .bind(&g.id)
        .bind(&g.event_id)
        .bind(&g.name)
        .bind(&g.phone)
        .bind(&g.option_id)
        .bind(g.pledge_amount)
        .bind(g.payment_method.map(|m| m.as_str()))
        .bind(g.payment_status.as_str())
        .bind(&g.transaction_id)
        .bind(g.rsvp_status.as_str())
        .bind(g.checked_in)
        .bind(g.checked_in_at)
        .bind(g.paid_at)
        .bind(&g.secure_token)
        .bind(g.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::not_found("event", g.event_id.as_str())
            } else {
                e.into()
            }
        })?;
    }
    Ok(())
}

impl SqliteStore {
    /// Attach locations, options and templates to a bare event row.
    async fn hydrate(&self, row: EventRow) -> Result<Event> {
        let locations: Vec<(String, String)> = sqlx::query_as(
            "SELECT label, url FROM event_locations WHERE event_id = ?1 ORDER BY display_order",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let options: Vec<(String, String, i64)> = sqlx::query_as(
            "SELECT id, name, amount FROM contribution_options WHERE event_id = ?1 ORDER BY display_order",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let templates = sqlx::query_as::<_, TemplateRow>(
            "SELECT template_type, subject, body FROM custom_templates WHERE event_id = ?1",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let custom_templates = templates
            .into_iter()
            .map(|t| {
                Ok(CustomTemplate {
                    template_type: parse_enum("template_type", &t.template_type)?,
                    subject: t.subject,
                    body: t.body,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Event {
            visibility: parse_enum("visibility", &row.visibility)?,
            status: parse_enum("status", &row.status)?,
            card_design: parse_json::<CardDesign>(row.card_design)?,
            payment_details: parse_json::<PaymentDetails>(row.payment_details)?,
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            event_type: row.event_type,
            description: row.description,
            date: row.event_date,
            locations: locations
                .into_iter()
                .map(|(label, url)| EventLocation { label, url })
                .collect(),
            contribution_options: options
                .into_iter()
                .map(|(id, name, amount)| ContributionOption { id, name, amount })
                .collect(),
            custom_templates,
            created_at: row.created_at,
        })
    }

    async fn require_event(&self, id: &str) -> Result<()> {
        let found: Option<(String,)> = sqlx::query_as("SELECT id FROM events WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        found
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("event", id))
    }
}

// ─────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for SqliteStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let defaults = user.defaults.as_ref().map(to_json).transpose()?;
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, phone, provider, bio, avatar_url, join_date, defaults)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.provider)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(user.join_date)
        .bind(defaults)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::duplicate(format!("email {} is already registered", user.email))
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let defaults = user.defaults.as_ref().map(to_json).transpose()?;
        let affected = sqlx::query(
            r#"
            UPDATE users
            SET    name = ?2, phone = ?3, bio = ?4, avatar_url = ?5, defaults = ?6
            WHERE  id = ?1
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(defaults)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::not_found("user", user.id.as_str()));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────

#[async_trait]
impl EventRepository for SqliteStore {
    async fn insert_event(&self, event: &Event, guests: &[Guest]) -> Result<()> {
        let card_design = event.card_design.as_ref().map(to_json).transpose()?;
        let payment_details = event.payment_details.as_ref().map(to_json).transpose()?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO events
                (id, owner_id, name, event_type, description, event_date, visibility,
                 status, card_design, payment_details, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&event.id)
        .bind(&event.owner_id)
        .bind(&event.name)
        .bind(&event.event_type)
        .bind(&event.description)
        .bind(&event.date)
        .bind(event.visibility.as_str())
        .bind(event.status.as_str())
        .bind(card_design)
        .bind(payment_details)
        .bind(event.created_at)
        .execute(&mut *tx)
        .await?;

        for (order, loc) in event.locations.iter().enumerate() {
            sqlx::query(
                "INSERT INTO event_locations (event_id, label, url, display_order) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&event.id)
            .bind(&loc.label)
            .bind(&loc.url)
            .bind(order as i64)
            .execute(&mut *tx)
            .await?;
        }

        for (order, opt) in event.contribution_options.iter().enumerate() {
            sqlx::query(
                "INSERT INTO contribution_options (id, event_id, name, amount, display_order) VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(&opt.id)
            .bind(&event.id)
            .bind(&opt.name)
            .bind(opt.amount)
            .bind(order as i64)
            .execute(&mut *tx)
            .await?;
        }

        for t in &event.custom_templates {
            sqlx::query(
                "INSERT INTO custom_templates (event_id, template_type, subject, body) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&event.id)
            .bind(t.template_type.as_str())
            .bind(&t.subject)
            .bind(&t.body)
            .execute(&mut *tx)
            .await?;
        }

        insert_guest_rows(&mut tx, guests).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_events_for_owner(&self, owner_id: &str) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE owner_id = ?1 \
             ORDER BY event_date DESC, created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            events.push(self.hydrate(row).await?);
        }
        Ok(events)
    }

    async fn save_card_design(&self, id: &str, design: &CardDesign) -> Result<()> {
        let affected = sqlx::query("UPDATE events SET card_design = ?1 WHERE id = ?2")
            .bind(to_json(design)?)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(AppError::not_found("event", id));
        }
        Ok(())
    }

    async fn save_payment_details(&self, id: &str, details: &PaymentDetails) -> Result<()> {
        let affected = sqlx::query("UPDATE events SET payment_details = ?1 WHERE id = ?2")
            .bind(to_json(details)?)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(AppError::not_found("event", id));
        }
        Ok(())
    }

    async fn save_templates(&self, id: &str, templates: &[CustomTemplate]) -> Result<()> {
        self.require_event(id).await?;

        let mut tx = self.pool.begin().await?;
        for t in templates {
            sqlx::query(
                r#"
                INSERT INTO custom_templates (event_id, template_type, subject, body)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT (event_id, template_type)
                DO UPDATE SET subject = excluded.subject, body = excluded.body
                "#,
            )
            .bind(id)
            .bind(t.template_type.as_str())
            .bind(&t.subject)
            .bind(&t.body)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn set_event_status(&self, id: &str, status: EventStatus) -> Result<()> {
        let affected = sqlx::query("UPDATE events SET status = ?1 WHERE id = ?2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(AppError::not_found("event", id));
        }
        Ok(())
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let affected = sqlx::query("DELETE FROM events WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(AppError::not_found("event", id));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────
// Guests
// ─────────────────────────────────────────────────────────

#[async_trait]
impl GuestRepository for SqliteStore {
    async fn insert_guests(&self, guests: &[Guest]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        insert_guest_rows(&mut tx, guests).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_guests(&self, event_id: &str) -> Result<Vec<Guest>> {
        let rows = sqlx::query_as::<_, GuestRow>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE event_id = ?1 ORDER BY created_at ASC, rowid ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Guest::try_from).collect()
    }

    async fn get_guest(&self, id: &str) -> Result<Option<Guest>> {
        let row = sqlx::query_as::<_, GuestRow>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Guest::try_from).transpose()
    }

    async fn get_guest_by_token(&self, token: &str) -> Result<Option<Guest>> {
        let row = sqlx::query_as::<_, GuestRow>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE secure_token = ?1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Guest::try_from).transpose()
    }

    async fn update_guest(&self, guest: &Guest) -> Result<()> {
        let affected = sqlx::query(
            r#"
            UPDATE guests
            SET    name = ?2, phone = ?3, option_id = ?4, pledge_amount = ?5,
                   payment_method = ?6, payment_status = ?7, transaction_id = ?8,
                   rsvp_status = ?9, checked_in = ?10, checked_in_at = ?11, paid_at = ?12
            WHERE  id = ?1
            "#,
        )
        .bind(&guest.id)
        .bind(&guest.name)
        .bind(&guest.phone)
        .bind(&guest.option_id)
        .bind(guest.pledge_amount)
        .bind(guest.payment_method.map(|m| m.as_str()))
        .bind(guest.payment_status.as_str())
        .bind(&guest.transaction_id)
        .bind(guest.rsvp_status.as_str())
        .bind(guest.checked_in)
        .bind(guest.checked_in_at)
        .bind(guest.paid_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::not_found("guest", guest.id.as_str()));
        }
        Ok(())
    }

    async fn delete_guest(&self, id: &str) -> Result<()> {
        let affected = sqlx::query("DELETE FROM guests WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(AppError::not_found("guest", id));
        }
        Ok(())
    }
}
