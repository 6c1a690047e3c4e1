//! Guest message templates (invitation, reminder, thank-you).
//!
//! Placeholders: `{guest_name}`, `{event_name}`, `{pledge_amount}`,
//! `{contribution_link}`. Unknown placeholders are left as written.

use serde::{Deserialize, Serialize};

use crate::types::{CustomTemplate, TemplateType};

pub fn default_template(template_type: TemplateType) -> CustomTemplate {
    let (subject, body) = match template_type {
        TemplateType::Invitation => (
            "Invitation to {event_name}",
            "Hello {guest_name}, you are cordially invited to {event_name}.",
        ),
        TemplateType::Reminder => (
            "Friendly Reminder: {event_name}",
            "Hi {guest_name}, just a quick reminder about your contribution for {event_name}.",
        ),
        TemplateType::ThankYou => (
            "Thank You for Joining {event_name}",
            "Dear {guest_name}, thank you so much for your support and for being part of {event_name}.",
        ),
    };
    CustomTemplate {
        template_type,
        subject: subject.to_string(),
        body: body.to_string(),
    }
}

/// One template per type, stored ones taking precedence over the defaults.
pub fn effective_templates(stored: &[CustomTemplate]) -> Vec<CustomTemplate> {
    TemplateType::ALL
        .iter()
        .map(|t| {
            stored
                .iter()
                .find(|s| s.template_type == *t)
                .cloned()
                .unwrap_or_else(|| default_template(*t))
        })
        .collect()
}

/// Values substituted into a template.
#[derive(Debug, Clone)]
pub struct MessageContext<'a> {
    pub guest_name: &'a str,
    pub event_name: &'a str,
    pub pledge_amount: i64,
    pub contribution_link: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub subject: String,
    pub body: String,
}

pub fn render(template: &CustomTemplate, ctx: &MessageContext<'_>) -> RenderedMessage {
    RenderedMessage {
        template_type: template.template_type,
        subject: substitute(&template.subject, ctx),
        body: substitute(&template.body, ctx),
    }
}

fn substitute(text: &str, ctx: &MessageContext<'_>) -> String {
    text.replace("{guest_name}", ctx.guest_name)
        .replace("{event_name}", ctx.event_name)
        .replace("{pledge_amount}", &ctx.pledge_amount.to_string())
        .replace("{contribution_link}", ctx.contribution_link)
}
