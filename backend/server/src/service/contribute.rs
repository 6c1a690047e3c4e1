//! The guest-facing side: everything reachable from a personal
//! contribution link. Payment is simulated; a `PAY_NOW` succeeds at once.

use nova_core::{
    CardDesign, ContributionOption, EventLocation, Guest, PaymentDetails, PaymentMethod,
    PaymentStatus,
};
use qrcode::render::svg;
use qrcode::QrCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{new_token, non_blank, now, Registry};
use crate::errors::{AppError, Result};

/// Side length floor of the rendered QR image, in pixels.
const QR_MIN_DIMENSION: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributeAction {
    PayNow,
    Pledge,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributeRequest {
    pub action: ContributeAction,
    /// Switch to another of the event's contribution options first.
    #[serde(default)]
    pub option_id: Option<String>,
    #[serde(default)]
    pub method: Option<PaymentMethod>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub event_type: String,
    pub date: String,
    pub description: Option<String>,
    pub locations: Vec<EventLocation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributionPage {
    pub guest: Guest,
    pub event: EventSummary,
    pub contribution_options: Vec<ContributionOption>,
    pub payment_details: Option<PaymentDetails>,
    pub card_design: Option<CardDesign>,
    pub contribution_link: String,
    /// A paid guest sees a confirmation instead of the pay/pledge choice.
    pub already_paid: bool,
}

impl Registry {
    pub async fn contribution_page(&self, token: &str) -> Result<ContributionPage> {
        let guest = self.require_guest_by_token(token).await?;
        let event = self.require_event(&guest.event_id).await?;

        Ok(ContributionPage {
            already_paid: guest.payment_status == PaymentStatus::Paid,
            contribution_link: self.contribution_link(&guest.secure_token),
            guest,
            event: EventSummary {
                id: event.id,
                name: event.name,
                event_type: event.event_type,
                date: event.date,
                description: event.description,
                locations: event.locations,
            },
            contribution_options: event.contribution_options,
            payment_details: event.payment_details,
            card_design: event.card_design,
        })
    }

    /// Record a guest's choice on their contribution page.
    pub async fn contribute(&self, token: &str, req: ContributeRequest) -> Result<Guest> {
        let mut guest = self.require_guest_by_token(token).await?;

        if let Some(option_id) = non_blank(req.option_id) {
            let event = self.require_event(&guest.event_id).await?;
            let option = event
                .contribution_options
                .iter()
                .find(|o| o.id == option_id)
                .ok_or_else(|| {
                    AppError::validation(format!("unknown contribution option '{option_id}'"))
                })?;
            guest.pledge_amount = option.amount;
            guest.option_id = Some(option.id.clone());
        }

        match req.action {
            ContributeAction::PayNow => {
                guest.set_payment_status(PaymentStatus::Paid, now());
                guest.payment_method = Some(req.method.unwrap_or(PaymentMethod::Auto));
                guest.transaction_id = Some(
                    non_blank(req.transaction_id).unwrap_or_else(simulated_transaction_id),
                );
            }
            ContributeAction::Pledge => {
                if guest.payment_status != PaymentStatus::Paid {
                    guest.set_payment_status(PaymentStatus::Pledged, now());
                }
            }
        }

        self.save_guest(&guest).await?;
        info!(
            guest_id = %guest.id,
            event_id = %guest.event_id,
            amount = guest.pledge_amount,
            "Guest contribution recorded as {}",
            guest.payment_status
        );
        Ok(guest)
    }

    /// SVG QR code of the guest's contribution link.
    pub async fn guest_qr_svg(&self, token: &str) -> Result<String> {
        let guest = self.require_guest_by_token(token).await?;
        let link = self.contribution_link(&guest.secure_token);

        let code = QrCode::new(link.as_bytes()).map_err(|e| AppError::Qr(e.to_string()))?;
        Ok(code
            .render::<svg::Color>()
            .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
            .build())
    }
}

fn simulated_transaction_id() -> String {
    format!("SIM-{}", new_token()[..12].to_uppercase())
}
