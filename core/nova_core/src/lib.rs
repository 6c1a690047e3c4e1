//! # Nova Events core
//!
//! Pure domain logic for the Nova Events service: no I/O, no clocks, no
//! storage. The HTTP service in `backend/server` owns persistence and feeds
//! timestamps and ids in from outside.
//!
//! | Area              | Module            | Entry points                                 |
//! |-------------------|-------------------|----------------------------------------------|
//! | Data model        | [`types`]         | `Event`, `Guest`, `User`, `CardDesign`, `Rect` |
//! | Coordinates       | [`coords`]        | [`coords::to_pixels`], [`coords::from_pointer`] |
//! | Card editor       | [`layout`]        | [`layout::LayoutEditor`]                     |
//! | Dashboard         | [`dashboard`]     | [`dashboard::filter`], [`dashboard::stats`]  |
//! | CSV import        | [`csv_import`]    | [`csv_import::CsvTable`], [`csv_import::execute`] |
//! | Messages          | [`templates`]     | [`templates::effective_templates`], [`templates::render`] |
//!
//! Errors follow one taxonomy, [`Error`]: `NotFound`, `Validation`,
//! `Duplicate`.

pub mod coords;
pub mod csv_import;
pub mod dashboard;
pub mod errors;
pub mod layout;
pub mod templates;
pub mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_csv_import;
#[cfg(test)]
mod test_dashboard;
#[cfg(test)]
mod test_layout;

pub use errors::{Error, Result};
pub use types::{
    BankAccount, CardDesign, ContributionOption, CustomTemplate, Event, EventLocation, EventStatus,
    EventVisibility, Guest, MobileMoney, PaymentDetails, PaymentMethod, PaymentStatus, Rect, RsvpStatus,
    TemplateType, User, DEFAULT_PLEDGE_AMOUNT, MAX_PLEDGE_AMOUNT,
    MIN_RECT_SIZE,
};
