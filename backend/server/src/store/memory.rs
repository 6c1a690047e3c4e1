use async_trait::async_trait;
use nova_core::{CardDesign, CustomTemplate, Event, EventStatus, Guest, PaymentDetails, User};
use tokio::sync::Mutex;

use super::{EventRepository, GuestRepository, UserRepository};
use crate::errors::{AppError, Result};

/// In-process store with the same contracts as [`super::SqliteStore`].
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    events: Mutex<Vec<Event>>,
    guests: Mutex<Vec<Guest>>,
}

impl MemoryStore {
    async fn with_event<T>(&self, id: &str, f: impl FnOnce(&mut Event) -> T) -> Result<T> {
        let mut events = self.events.lock().await;
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::not_found("event", id))?;
        Ok(f(event))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::duplicate(format!(
                "email {} is already registered",
                user.email
            )));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.lock().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.lock().await;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::not_found("user", user.id.as_str()))?;
        *slot = user.clone();
        Ok(())
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn insert_event(&self, event: &Event, guests: &[Guest]) -> Result<()> {
        let mut events = self.events.lock().await;
        if let Some(orphan) = guests.iter().find(|g| g.event_id != event.id) {
            return Err(AppError::not_found("event", orphan.event_id.as_str()));
        }
        events.push(event.clone());
        self.guests.lock().await.extend_from_slice(guests);
        Ok(())
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.events.lock().await.iter().find(|e| e.id == id).cloned())
    }

    async fn list_events_for_owner(&self, owner_id: &str) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .lock()
            .await
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(events)
    }

    async fn save_card_design(&self, id: &str, design: &CardDesign) -> Result<()> {
        self.with_event(id, |e| e.card_design = Some(design.clone()))
            .await
    }

    async fn save_payment_details(&self, id: &str, details: &PaymentDetails) -> Result<()> {
        self.with_event(id, |e| e.payment_details = Some(details.clone()))
            .await
    }

    async fn save_templates(&self, id: &str, templates: &[CustomTemplate]) -> Result<()> {
        self.with_event(id, |e| {
            for t in templates {
                match e
                    .custom_templates
                    .iter_mut()
                    .find(|s| s.template_type == t.template_type)
                {
                    Some(slot) => *slot = t.clone(),
                    None => e.custom_templates.push(t.clone()),
                }
            }
        })
        .await
    }

    async fn set_event_status(&self, id: &str, status: EventStatus) -> Result<()> {
        self.with_event(id, |e| e.status = status).await
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let mut events = self.events.lock().await;
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Err(AppError::not_found("event", id));
        }
        self.guests.lock().await.retain(|g| g.event_id != id);
        Ok(())
    }
}

#[async_trait]
impl GuestRepository for MemoryStore {
    async fn insert_guests(&self, guests: &[Guest]) -> Result<()> {
        let events = self.events.lock().await;
        if let Some(orphan) = guests
            .iter()
            .find(|g| !events.iter().any(|e| e.id == g.event_id))
        {
            return Err(AppError::not_found("event", orphan.event_id.as_str()));
        }
        self.guests.lock().await.extend_from_slice(guests);
        Ok(())
    }

    async fn list_guests(&self, event_id: &str) -> Result<Vec<Guest>> {
        Ok(self
            .guests
            .lock()
            .await
            .iter()
            .filter(|g| g.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn get_guest(&self, id: &str) -> Result<Option<Guest>> {
        Ok(self.guests.lock().await.iter().find(|g| g.id == id).cloned())
    }

    async fn get_guest_by_token(&self, token: &str) -> Result<Option<Guest>> {
        Ok(self
            .guests
            .lock()
            .await
            .iter()
            .find(|g| g.secure_token == token)
            .cloned())
    }

    async fn update_guest(&self, guest: &Guest) -> Result<()> {
        let mut guests = self.guests.lock().await;
        let slot = guests
            .iter_mut()
            .find(|g| g.id == guest.id)
            .ok_or_else(|| AppError::not_found("guest", guest.id.as_str()))?;
        *slot = guest.clone();
        Ok(())
    }

    async fn delete_guest(&self, id: &str) -> Result<()> {
        let mut guests = self.guests.lock().await;
        let before = guests.len();
        guests.retain(|g| g.id != id);
        if guests.len() == before {
            return Err(AppError::not_found("guest", id));
        }
        Ok(())
    }
}
