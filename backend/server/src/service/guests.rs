//! Guest lists: manual entry, CSV import, the dashboard and per-guest
//! status changes.

use nova_core::csv_import::{self, ColumnMapping, CsvTable, GuestEntry};
use nova_core::dashboard::{self, GuestStats, StatusTab};
use nova_core::{Guest, PaymentStatus, RsvpStatus};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{new_id, new_token, non_blank, now, Registry};
use crate::errors::Result;
use crate::feed::Change;

/// Rows shown back to the organizer while they pick columns.
const PREVIEW_ROWS: usize = 5;

/// A hand-typed guest.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGuest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub pledge_amount: Option<f64>,
}

/// Column picker state; any negative index means "unmapped".
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MappingIndices {
    pub name: i64,
    pub phone: i64,
    #[serde(default = "unmapped")]
    pub pledge: i64,
}

fn unmapped() -> i64 {
    -1
}

impl From<MappingIndices> for ColumnMapping {
    fn from(m: MappingIndices) -> Self {
        ColumnMapping::from_indices(m.name, m.phone, m.pledge)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CsvPreview {
    pub headers: Vec<String>,
    pub row_count: usize,
    pub sample: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub guests: Vec<Guest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: GuestStats,
    pub count: usize,
    pub guests: Vec<Guest>,
}

impl Registry {
    /// Turn validated entries into new guests on the event's first option.
    pub(super) fn build_guests(
        &self,
        event_id: &str,
        option_id: Option<&str>,
        entries: Vec<NewGuest>,
    ) -> Vec<Guest> {
        let default_pledge = self.settings.default_pledge;
        let entries = entries
            .into_iter()
            .filter_map(|g| GuestEntry::new(&g.name, &g.phone, g.pledge_amount, default_pledge))
            .collect();
        self.guests_from_entries(event_id, option_id, entries)
    }

    fn guests_from_entries(
        &self,
        event_id: &str,
        option_id: Option<&str>,
        entries: Vec<GuestEntry>,
    ) -> Vec<Guest> {
        let created_at = now();
        entries
            .into_iter()
            .map(|e| Guest {
                id: new_id(),
                event_id: event_id.to_string(),
                name: e.name,
                phone: e.phone,
                option_id: option_id.map(str::to_string),
                pledge_amount: e.pledge_amount,
                payment_method: None,
                payment_status: PaymentStatus::NotStarted,
                transaction_id: None,
                rsvp_status: RsvpStatus::Pending,
                checked_in: false,
                checked_in_at: None,
                paid_at: None,
                secure_token: new_token(),
                created_at,
            })
            .collect()
    }

    async fn insert_for_event(&self, event_id: &str, guests: &[Guest]) -> Result<()> {
        if guests.is_empty() {
            return Ok(());
        }
        self.store.guests.insert_guests(guests).await?;
        self.feed.publish(Change::GuestsAdded {
            event_id: event_id.to_string(),
            count: guests.len(),
        });
        Ok(())
    }

    /// Add hand-typed guests. Entries without a name or phone are skipped.
    pub async fn add_guests(&self, event_id: &str, entries: Vec<NewGuest>) -> Result<Vec<Guest>> {
        let event = self.require_event(event_id).await?;
        let option_id = event.contribution_options.first().map(|o| o.id.as_str());

        let guests = self.build_guests(event_id, option_id, entries);
        self.insert_for_event(event_id, &guests).await?;

        info!(event_id = %event_id, count = guests.len(), "Added guests");
        Ok(guests)
    }

    /// Parse, map, then insert every mapped row in one batch. Nothing is
    /// written when parsing or mapping fails.
    pub async fn import_guests(
        &self,
        event_id: &str,
        csv_text: &str,
        mapping: ColumnMapping,
    ) -> Result<ImportReport> {
        let event = self.require_event(event_id).await?;
        let table = CsvTable::parse(csv_text)?;
        let entries =
            csv_import::execute_with_default(&table, &mapping, self.settings.default_pledge)?;

        let option_id = event.contribution_options.first().map(|o| o.id.as_str());
        let guests = self.guests_from_entries(event_id, option_id, entries);
        self.insert_for_event(event_id, &guests).await?;

        let skipped = table.rows.len() - guests.len();
        info!(
            event_id = %event_id,
            imported = guests.len(),
            skipped,
            "Imported guests from CSV"
        );
        Ok(ImportReport {
            imported: guests.len(),
            skipped,
            guests,
        })
    }

    /// Headers and a few rows, for building the column mapping.
    pub fn preview_csv(&self, csv_text: &str) -> Result<CsvPreview> {
        let table = CsvTable::parse(csv_text)?;
        Ok(CsvPreview {
            row_count: table.rows.len(),
            sample: table.rows.into_iter().take(PREVIEW_ROWS).collect(),
            headers: table.headers,
        })
    }

    pub async fn dashboard(&self, event_id: &str, tab: StatusTab, query: &str) -> Result<Dashboard> {
        self.require_event(event_id).await?;
        let all = self.store.guests.list_guests(event_id).await?;

        let guests = dashboard::filter(&all, tab, query);
        Ok(Dashboard {
            stats: dashboard::stats(&all),
            count: guests.len(),
            guests,
        })
    }

    pub(super) async fn save_guest(&self, guest: &Guest) -> Result<()> {
        self.store.guests.update_guest(guest).await?;
        self.feed.publish(Change::GuestUpdated {
            event_id: guest.event_id.clone(),
            guest_id: guest.id.clone(),
        });
        Ok(())
    }

    /// Any status may follow any other.
    pub async fn set_payment_status(
        &self,
        guest_id: &str,
        status: PaymentStatus,
        transaction_id: Option<String>,
    ) -> Result<Guest> {
        let mut guest = self.require_guest(guest_id).await?;
        let previous = guest.payment_status;

        guest.set_payment_status(status, now());
        if let Some(tx) = non_blank(transaction_id) {
            guest.transaction_id = Some(tx);
        }
        self.save_guest(&guest).await?;

        info!(guest_id = %guest.id, "Payment status {previous} -> {status}");
        Ok(guest)
    }

    pub async fn set_rsvp(&self, guest_id: &str, rsvp: RsvpStatus) -> Result<Guest> {
        let mut guest = self.require_guest(guest_id).await?;
        guest.rsvp_status = rsvp;
        self.save_guest(&guest).await?;
        Ok(guest)
    }

    /// Idempotent: the first check-in time is kept.
    pub async fn check_in(&self, guest_id: &str) -> Result<Guest> {
        let mut guest = self.require_guest(guest_id).await?;
        if !guest.checked_in {
            guest.check_in(now());
            self.save_guest(&guest).await?;
            info!(guest_id = %guest.id, "Guest checked in");
        }
        Ok(guest)
    }

    pub async fn delete_guest(&self, guest_id: &str) -> Result<()> {
        let guest = self.require_guest(guest_id).await?;
        self.store.guests.delete_guest(guest_id).await?;
        self.feed.publish(Change::GuestDeleted {
            event_id: guest.event_id,
            guest_id: guest.id,
        });
        Ok(())
    }
}
