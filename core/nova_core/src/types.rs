//! # Types
//!
//! Shared data structures for events, guests, organizers and card designs.
//!
//! ## Wire values
//!
//! Every enum here has a fixed storage / JSON spelling:
//!
//! | Enum              | Values                                             |
//! |-------------------|----------------------------------------------------|
//! | [`PaymentStatus`] | `NOT_STARTED`, `PLEDGED`, `PAYMENT_PENDING`, `PAID` |
//! | [`PaymentMethod`] | `AUTO`, `MANUAL`                                   |
//! | [`RsvpStatus`]    | `PENDING`, `CONFIRMED`, `DECLINED`                 |
//! | [`EventVisibility`] | `PRIVATE`, `PUBLIC`, `HYBRID`                    |
//! | [`EventStatus`]   | `DRAFT`, `LIVE`, `COMPLETED`, `CANCELLED`          |
//! | [`TemplateType`]  | `INVITATION`, `REMINDER`, `THANK_YOU`              |
//!
//! ### Payment status is not a state machine
//!
//! Organizers may set any [`PaymentStatus`] on any guest, including moving a
//! `PAID` guest back to `NOT_STARTED`. The only bookkeeping is `paid_at`,
//! which is stamped on entry to `PAID` and cleared on exit.
//!
//! ### Card design coordinates
//!
//! A [`Rect`] is stored in percent of the card's width / height with `(x, y)`
//! being the rectangle's **center**. See [`crate::coords`] for the pixel
//! mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Smallest width / height (in percent) an overlay may shrink to.
pub const MIN_RECT_SIZE: f64 = 2.0;

/// Pledge used when none is supplied or the supplied one is unusable.
pub const DEFAULT_PLEDGE_AMOUNT: i64 = 20_000;

/// Largest pledge or contribution option amount accepted (one trillion).
/// Keeps per-event sums far away from `i64` overflow.
pub const MAX_PLEDGE_AMOUNT: i64 = 1_000_000_000_000;

// ─────────────────────────────────────────────────────────
// Wire enums
// ─────────────────────────────────────────────────────────

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Storage / JSON spelling.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err(Error::Validation(format!(
                        concat!("unknown ", stringify!($name), " value '{}'"),
                        other
                    ))),
                }
            }
        }
    };
}

wire_enum! {
    /// Where a guest stands with their contribution.
    pub enum PaymentStatus {
        NotStarted => "NOT_STARTED",
        Pledged => "PLEDGED",
        PaymentPending => "PAYMENT_PENDING",
        Paid => "PAID",
    }
}

wire_enum! {
    /// How a guest settled: simulated in-app payment or out-of-band transfer.
    pub enum PaymentMethod {
        Auto => "AUTO",
        Manual => "MANUAL",
    }
}

wire_enum! {
    pub enum RsvpStatus {
        Pending => "PENDING",
        Confirmed => "CONFIRMED",
        Declined => "DECLINED",
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum EventVisibility {
        #[default]
        Private => "PRIVATE",
        Public => "PUBLIC",
        Hybrid => "HYBRID",
    }
}

wire_enum! {
    pub enum EventStatus {
        Draft => "DRAFT",
        Live => "LIVE",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

wire_enum! {
    pub enum TemplateType {
        Invitation => "INVITATION",
        Reminder => "REMINDER",
        ThankYou => "THANK_YOU",
    }
}

// ─────────────────────────────────────────────────────────
// Card design
// ─────────────────────────────────────────────────────────

/// Overlay placement in percent of the container, centered on `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// Center clamped to `[0, 100]`, size floored at [`MIN_RECT_SIZE`].
    pub fn normalized(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 100.0),
            y: self.y.clamp(0.0, 100.0),
            w: self.w.max(MIN_RECT_SIZE),
            h: self.h.max(MIN_RECT_SIZE),
        }
    }
}

/// The printable card layout owned by one event.
///
/// Serialized in the persisted shape
/// `{ backgroundImage?, namePosition: {x,y,w,h}, qrPosition: {x,y,w,h} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDesign {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    pub name_position: Rect,
    pub qr_position: Rect,
}

impl Default for CardDesign {
    fn default() -> Self {
        Self {
            background_image: None,
            name_position: Rect::new(50.0, 50.0, 25.0, 8.0),
            qr_position: Rect::new(50.0, 75.0, 15.0, 15.0),
        }
    }
}

impl CardDesign {
    /// Reject non-finite coordinates and normalize both rectangles.
    pub fn validated(self) -> Result<Self> {
        if !self.name_position.is_finite() {
            return Err(Error::validation("namePosition must contain finite numbers"));
        }
        if !self.qr_position.is_finite() {
            return Err(Error::validation("qrPosition must contain finite numbers"));
        }
        let background_image = self
            .background_image
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());
        Ok(Self {
            background_image,
            name_position: self.name_position.normalized(),
            qr_position: self.qr_position.normalized(),
        })
    }
}

// ─────────────────────────────────────────────────────────
// Payment configuration
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileMoney {
    pub number: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub account_no: String,
    pub bank_name: String,
    pub name: String,
}

/// Collection channels an organizer publishes to guests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<MobileMoney>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<BankAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lipa: Option<MobileMoney>,
}

impl PaymentDetails {
    /// Drop channels whose key field (number / account number) is blank.
    pub fn sanitized(self) -> Self {
        Self {
            mobile: self.mobile.filter(|m| !m.number.trim().is_empty()),
            bank: self.bank.filter(|b| !b.account_no.trim().is_empty()),
            lipa: self.lipa.filter(|l| !l.number.trim().is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mobile.is_none() && self.bank.is_none() && self.lipa.is_none()
    }
}

// ─────────────────────────────────────────────────────────
// Entities
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLocation {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionOption {
    pub id: String,
    pub name: String,
    pub amount: i64,
}

/// The options every event gets when the organizer supplies none.
pub fn default_contribution_options() -> Vec<(String, i64)> {
    vec![
        ("Standard".to_string(), DEFAULT_PLEDGE_AMOUNT),
        ("VIP".to_string(), 50_000),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTemplate {
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub subject: String,
    pub body: String,
}

/// An organizer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub provider: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// Unix seconds.
    pub join_date: i64,
    /// Prefill for new events' payment configuration.
    pub defaults: Option<PaymentDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub event_type: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub visibility: EventVisibility,
    pub status: EventStatus,
    pub locations: Vec<EventLocation>,
    pub contribution_options: Vec<ContributionOption>,
    pub card_design: Option<CardDesign>,
    pub payment_details: Option<PaymentDetails>,
    pub custom_templates: Vec<CustomTemplate>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub phone: String,
    pub option_id: Option<String>,
    pub pledge_amount: i64,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub rsvp_status: RsvpStatus,
    pub checked_in: bool,
    pub checked_in_at: Option<i64>,
    pub paid_at: Option<i64>,
    /// Opaque token in the guest's personal contribution link.
    pub secure_token: String,
    pub created_at: i64,
}

impl Guest {
    /// Set any status; keeps `paid_at` in step with the `PAID` state.
    pub fn set_payment_status(&mut self, status: PaymentStatus, now: i64) {
        match (self.payment_status, status) {
            (PaymentStatus::Paid, PaymentStatus::Paid) => {}
            (_, PaymentStatus::Paid) => self.paid_at = Some(now),
            _ => self.paid_at = None,
        }
        self.payment_status = status;
    }

    pub fn check_in(&mut self, now: i64) {
        if !self.checked_in {
            self.checked_in = true;
            self.checked_in_at = Some(now);
        }
    }
}
