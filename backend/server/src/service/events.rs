//! Events and everything an organizer configures on one: the card design,
//! payment channels and message templates.

use chrono::NaiveDate;
use nova_core::coords::{to_pixels, PixelBox};
use nova_core::templates::{self, MessageContext, RenderedMessage};
use nova_core::types::default_contribution_options;
use nova_core::{
    CardDesign, ContributionOption, CustomTemplate, Event, EventLocation, EventStatus,
    EventVisibility, PaymentDetails, TemplateType, MAX_PLEDGE_AMOUNT,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::guests::NewGuest;
use super::{new_id, non_blank, now, required, Registry};
use crate::errors::{AppError, Result};
use crate::feed::Change;

#[derive(Debug, Clone, Deserialize)]
pub struct NewContributionOption {
    pub name: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub owner_id: String,
    pub name: String,
    #[serde(alias = "type")]
    pub event_type: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: EventVisibility,
    #[serde(default)]
    pub locations: Vec<EventLocation>,
    #[serde(default)]
    pub contribution_options: Vec<NewContributionOption>,
    #[serde(default)]
    pub guests: Vec<NewGuest>,
}

/// The stored design laid out on a concrete canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardPreview {
    pub width: f64,
    pub height: f64,
    pub background_image: Option<String>,
    pub name: PixelBox,
    pub qr: PixelBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrefillSource {
    Event,
    ProfileDefaults,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentPrefill {
    pub source: PrefillSource,
    pub details: PaymentDetails,
}

// ─────────────────────────────────────────────────────────
// Event lifecycle
// ─────────────────────────────────────────────────────────

impl Registry {
    /// Create an event, seeding default contribution options and any
    /// initial guests.
    pub async fn create_event(&self, req: NewEvent) -> Result<Event> {
        self.require_user(&req.owner_id).await?;

        let name = required("name", &req.name)?;
        let event_type = required("type", &req.event_type)?;
        let date = req.date.trim();
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            AppError::validation(format!("date '{date}' must be formatted YYYY-MM-DD"))
        })?;

        let locations = req
            .locations
            .into_iter()
            .filter_map(|l| {
                let label = l.label.trim().to_string();
                (!label.is_empty()).then(|| EventLocation {
                    label,
                    url: l.url.trim().to_string(),
                })
            })
            .collect();

        let contribution_options = build_options(req.contribution_options)?;
        let event_id = new_id();
        let default_option = contribution_options.first().map(|o| o.id.clone());

        let event = Event {
            id: event_id.clone(),
            owner_id: req.owner_id,
            name,
            event_type,
            description: non_blank(req.description),
            date: date.to_string(),
            visibility: req.visibility,
            status: EventStatus::Draft,
            locations,
            contribution_options,
            card_design: None,
            payment_details: None,
            custom_templates: Vec::new(),
            created_at: now(),
        };
        let guests = self.build_guests(&event_id, default_option.as_deref(), req.guests);

        self.store.events.insert_event(&event, &guests).await?;
        if !guests.is_empty() {
            self.feed.publish(Change::GuestsAdded {
                event_id: event_id.clone(),
                count: guests.len(),
            });
        }

        info!(
            event_id = %event.id,
            owner_id = %event.owner_id,
            guests = guests.len(),
            "Created event '{}'",
            event.name
        );
        self.feed.publish(Change::EventUpdated { event_id });
        Ok(event)
    }

    pub async fn get_event(&self, id: &str) -> Result<Event> {
        self.require_event(id).await
    }

    /// Newest event date first.
    pub async fn list_events(&self, owner_id: &str) -> Result<Vec<Event>> {
        self.require_user(owner_id).await?;
        self.store.events.list_events_for_owner(owner_id).await
    }

    pub async fn set_event_status(&self, id: &str, status: EventStatus) -> Result<Event> {
        self.store.events.set_event_status(id, status).await?;
        info!(event_id = %id, "Event status set to {status}");
        self.feed.publish(Change::EventUpdated {
            event_id: id.to_string(),
        });
        self.require_event(id).await
    }

    /// Removes the event with its guests and design.
    pub async fn delete_event(&self, id: &str) -> Result<()> {
        self.store.events.delete_event(id).await?;
        info!(event_id = %id, "Deleted event");
        self.feed.publish(Change::EventDeleted {
            event_id: id.to_string(),
        });
        Ok(())
    }
}

fn build_options(requested: Vec<NewContributionOption>) -> Result<Vec<ContributionOption>> {
    let requested: Vec<(String, i64)> = if requested.is_empty() {
        default_contribution_options()
    } else {
        requested
            .into_iter()
            .map(|o| (o.name.trim().to_string(), o.amount))
            .collect()
    };

    requested
        .into_iter()
        .map(|(name, amount)| {
            if name.is_empty() {
                return Err(AppError::validation("contribution option name is required"));
            }
            if amount < 1 {
                return Err(AppError::validation(format!(
                    "contribution option '{name}' must have a positive amount"
                )));
            }
            if amount > MAX_PLEDGE_AMOUNT {
                return Err(AppError::validation(format!(
                    "contribution option '{name}' exceeds the maximum amount {MAX_PLEDGE_AMOUNT}"
                )));
            }
            Ok(ContributionOption {
                id: new_id(),
                name,
                amount,
            })
        })
        .collect()
}

// ─────────────────────────────────────────────────────────
// Card design
// ─────────────────────────────────────────────────────────

impl Registry {
    /// Overwrite the event's design wholesale. An unknown event leaves the
    /// store untouched.
    pub async fn save_card_design(&self, event_id: &str, design: CardDesign) -> Result<CardDesign> {
        let design = design.validated()?;
        self.store.events.save_card_design(event_id, &design).await?;

        info!(
            event_id = %event_id,
            background = design.background_image.is_some(),
            "Saved card design"
        );
        self.feed.publish(Change::DesignSaved {
            event_id: event_id.to_string(),
        });
        Ok(design)
    }

    pub async fn card_preview(&self, event_id: &str, width: f64, height: f64) -> Result<CardPreview> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(AppError::validation(
                "preview width and height must be positive numbers",
            ));
        }
        let design = self
            .require_event(event_id)
            .await?
            .card_design
            .ok_or_else(|| AppError::not_found("card design", event_id))?;

        Ok(CardPreview {
            width,
            height,
            name: to_pixels(&design.name_position, width, height),
            qr: to_pixels(&design.qr_position, width, height),
            background_image: design.background_image,
        })
    }
}

// ─────────────────────────────────────────────────────────
// Payment configuration
// ─────────────────────────────────────────────────────────

impl Registry {
    /// Replace the event's channels; optionally make them the owner's
    /// defaults too.
    pub async fn configure_payments(
        &self,
        event_id: &str,
        details: PaymentDetails,
        save_as_default: bool,
    ) -> Result<PaymentDetails> {
        let event = self.require_event(event_id).await?;
        let details = details.sanitized();

        self.store
            .events
            .save_payment_details(event_id, &details)
            .await?;

        if save_as_default {
            let mut owner = self.require_user(&event.owner_id).await?;
            owner.defaults = (!details.is_empty()).then(|| details.clone());
            self.store.users.update_user(&owner).await?;
            self.feed.publish(Change::UserUpdated { user_id: owner.id });
        }

        info!(event_id = %event_id, save_as_default, "Configured payment channels");
        self.feed.publish(Change::EventUpdated {
            event_id: event_id.to_string(),
        });
        Ok(details)
    }

    /// What the payment form should start with.
    pub async fn payment_prefill(&self, event_id: &str) -> Result<PaymentPrefill> {
        let event = self.require_event(event_id).await?;

        if let Some(details) = event.payment_details.filter(|d| !d.is_empty()) {
            return Ok(PaymentPrefill {
                source: PrefillSource::Event,
                details,
            });
        }

        let owner = self.store.users.get_user(&event.owner_id).await?;
        Ok(match owner.and_then(|u| u.defaults).filter(|d| !d.is_empty()) {
            Some(details) => PaymentPrefill {
                source: PrefillSource::ProfileDefaults,
                details,
            },
            None => PaymentPrefill {
                source: PrefillSource::None,
                details: PaymentDetails::default(),
            },
        })
    }
}

// ─────────────────────────────────────────────────────────
// Message templates
// ─────────────────────────────────────────────────────────

impl Registry {
    /// One template per type: stored ones win over the defaults.
    pub async fn templates(&self, event_id: &str) -> Result<Vec<CustomTemplate>> {
        let event = self.require_event(event_id).await?;
        Ok(templates::effective_templates(&event.custom_templates))
    }

    pub async fn save_templates(
        &self,
        event_id: &str,
        submitted: Vec<CustomTemplate>,
    ) -> Result<Vec<CustomTemplate>> {
        let cleaned = submitted
            .into_iter()
            .map(|t| {
                Ok(CustomTemplate {
                    template_type: t.template_type,
                    subject: required("subject", &t.subject)?,
                    body: required("body", &t.body)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.store.events.save_templates(event_id, &cleaned).await?;
        self.feed.publish(Change::EventUpdated {
            event_id: event_id.to_string(),
        });
        self.templates(event_id).await
    }

    /// Render the event's template of `template_type` for one guest.
    pub async fn render_message(
        &self,
        guest_id: &str,
        template_type: TemplateType,
    ) -> Result<RenderedMessage> {
        let guest = self.require_guest(guest_id).await?;
        let event = self.require_event(&guest.event_id).await?;

        let template = templates::effective_templates(&event.custom_templates)
            .into_iter()
            .find(|t| t.template_type == template_type)
            .unwrap_or_else(|| templates::default_template(template_type));

        let link = self.contribution_link(&guest.secure_token);
        Ok(templates::render(
            &template,
            &MessageContext {
                guest_name: &guest.name,
                event_name: &event.name,
                pledge_amount: guest.pledge_amount,
                contribution_link: &link,
            },
        ))
    }
}
