//! Dashboard views over an event's guest list.
//!
//! Both [`filter`] and [`stats`] classify guests through [`Bucket::of`], so
//! the summary tiles always agree with the list behind each tab.

use serde::{Deserialize, Serialize};

use crate::types::{Guest, PaymentStatus, RsvpStatus};

/// Summary bucket of a payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Contributed,
    Pledged,
    NotPaid,
}

impl Bucket {
    pub fn of(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Paid => Self::Contributed,
            PaymentStatus::Pledged => Self::Pledged,
            PaymentStatus::NotStarted | PaymentStatus::PaymentPending => Self::NotPaid,
        }
    }
}

/// Dashboard tab selecting a subset of guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusTab {
    #[default]
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "PAID", alias = "CONTRIBUTED")]
    Paid,
    #[serde(rename = "PLEDGED")]
    Pledged,
    #[serde(rename = "UNPAID")]
    Unpaid,
}

impl StatusTab {
    pub fn matches(&self, status: PaymentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Paid => Bucket::of(status) == Bucket::Contributed,
            Self::Pledged => Bucket::of(status) == Bucket::Pledged,
            Self::Unpaid => Bucket::of(status) == Bucket::NotPaid,
        }
    }
}

/// Counts shown on the dashboard tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestStats {
    pub total: usize,
    pub contributed: usize,
    pub pledged: usize,
    pub not_paid: usize,
    pub total_pledged: i64,
    pub total_paid: i64,
    pub confirmed: usize,
    pub declined: usize,
    pub checked_in: usize,
}

/// Guests on `tab` whose name or phone contains `query` (case-insensitive).
///
/// The status filter runs first, then the text filter. A blank query matches
/// everyone. The input is never modified.
pub fn filter(guests: &[Guest], tab: StatusTab, query: &str) -> Vec<Guest> {
    let needle = query.trim().to_lowercase();
    guests
        .iter()
        .filter(|g| tab.matches(g.payment_status))
        .filter(|g| {
            needle.is_empty()
                || g.name.to_lowercase().contains(&needle)
                || g.phone.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn stats(guests: &[Guest]) -> GuestStats {
    let mut s = GuestStats::default();
    for g in guests {
        s.total += 1;
        s.total_pledged = s.total_pledged.saturating_add(g.pledge_amount);
        match Bucket::of(g.payment_status) {
            Bucket::Contributed => {
                s.contributed += 1;
                s.total_paid = s.total_paid.saturating_add(g.pledge_amount);
            }
            Bucket::Pledged => s.pledged += 1,
            Bucket::NotPaid => s.not_paid += 1,
        }
        match g.rsvp_status {
            RsvpStatus::Confirmed => s.confirmed += 1,
            RsvpStatus::Declined => s.declined += 1,
            RsvpStatus::Pending => {}
        }
        if g.checked_in {
            s.checked_in += 1;
        }
    }
    s
}
