use nova_core::{PaymentDetails, User};
use serde::Deserialize;
use tracing::info;

use super::{new_id, non_blank, now, required, Registry};
use crate::errors::{AppError, Result};
use crate::feed::Change;

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_provider() -> String {
    "email".to_string()
}

/// Fields left `None` keep their current value; a blank string clears an
/// optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl Registry {
    pub async fn register_user(&self, req: NewUser) -> Result<User> {
        let name = required("name", &req.name)?;
        let email = required("email", &req.email)?.to_lowercase();

        if self.store.users.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::duplicate(format!(
                "email {email} is already registered"
            )));
        }

        let user = User {
            id: new_id(),
            name,
            email,
            phone: non_blank(req.phone),
            provider: required("provider", &req.provider)?,
            bio: None,
            avatar_url: None,
            join_date: now(),
            defaults: None,
        };
        self.store.users.insert_user(&user).await?;

        info!(user_id = %user.id, "Registered organizer {}", user.email);
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.require_user(id).await
    }

    pub async fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<User> {
        let mut user = self.require_user(id).await?;

        if let Some(name) = update.name {
            user.name = required("name", &name)?;
        }
        if update.phone.is_some() {
            user.phone = non_blank(update.phone);
        }
        if update.bio.is_some() {
            user.bio = non_blank(update.bio);
        }
        if update.avatar_url.is_some() {
            user.avatar_url = non_blank(update.avatar_url);
        }

        self.store.users.update_user(&user).await?;
        self.feed.publish(Change::UserUpdated {
            user_id: user.id.clone(),
        });
        Ok(user)
    }

    /// Store the organizer's payment prefill. Blank channels are dropped; an
    /// all-blank submission clears the defaults.
    pub async fn set_payment_defaults(&self, id: &str, details: PaymentDetails) -> Result<User> {
        let mut user = self.require_user(id).await?;
        let details = details.sanitized();
        user.defaults = (!details.is_empty()).then_some(details);

        self.store.users.update_user(&user).await?;
        self.feed.publish(Change::UserUpdated {
            user_id: user.id.clone(),
        });
        Ok(user)
    }
}
