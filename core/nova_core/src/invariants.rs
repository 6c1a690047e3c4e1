#![allow(dead_code)]

use crate::dashboard::{filter, stats, StatusTab};
use crate::types::{Guest, PaymentStatus, Rect, MIN_RECT_SIZE};

/// INV-1: overlays never shrink below the minimum visible size.
pub fn assert_rect_visible(rect: &Rect) {
    assert!(
        rect.w >= MIN_RECT_SIZE && rect.h >= MIN_RECT_SIZE,
        "INV-1 violated: rect {rect:?} smaller than {MIN_RECT_SIZE}%"
    );
}

/// INV-2: a dragged overlay's center stays on the card.
pub fn assert_center_on_card(rect: &Rect) {
    assert!(
        (0.0..=100.0).contains(&rect.x) && (0.0..=100.0).contains(&rect.y),
        "INV-2 violated: center ({}, {}) outside [0, 100]",
        rect.x,
        rect.y
    );
}

/// INV-3: every tab's list length equals its summary tile.
pub fn assert_tiles_match_tabs(guests: &[Guest]) {
    let s = stats(guests);
    assert_eq!(filter(guests, StatusTab::All, "").len(), s.total, "INV-3 violated: ALL");
    assert_eq!(
        filter(guests, StatusTab::Paid, "").len(),
        s.contributed,
        "INV-3 violated: PAID"
    );
    assert_eq!(
        filter(guests, StatusTab::Pledged, "").len(),
        s.pledged,
        "INV-3 violated: PLEDGED"
    );
    assert_eq!(
        filter(guests, StatusTab::Unpaid, "").len(),
        s.not_paid,
        "INV-3 violated: UNPAID"
    );
    assert_eq!(
        s.contributed + s.pledged + s.not_paid,
        s.total,
        "INV-3 violated: buckets do not partition the guest list"
    );
}

/// INV-4: `paid_at` is set exactly when the guest is `PAID`.
pub fn assert_paid_at_consistent(guest: &Guest) {
    assert_eq!(
        guest.paid_at.is_some(),
        guest.payment_status == PaymentStatus::Paid,
        "INV-4 violated: guest {} status {} paid_at {:?}",
        guest.id,
        guest.payment_status,
        guest.paid_at
    );
}
