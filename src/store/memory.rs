use std::collections::HashMap;

use chrono::Utc;
use rocket::tokio::sync::RwLock;

use super::GuestStore;
use crate::error::StoreError;
use crate::models::{Guest, GuestId, GuestPatch, InvitationCode, NewGuest};

/// Process-local store used by the `memory` backend and the test suite.
#[derive(Default)]
pub struct MemoryStore {
    guests: RwLock<HashMap<GuestId, Guest>>,
}

#[rocket::async_trait]
impl GuestStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Guest>, StoreError> {
        let guests = self.guests.read().await;
        let mut all: Vec<Guest> = guests.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn create(&self, guest: NewGuest) -> Result<Guest, StoreError> {
        let mut guests = self.guests.write().await;

        if guests
            .values()
            .any(|g| g.invitation_code == guest.invitation_code)
        {
            return Err(StoreError::DuplicateCode(guest.invitation_code));
        }

        let created = guest.into_guest(GuestId::generate(), Utc::now().naive_utc());
        guests.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn update(&self, id: &GuestId, patch: GuestPatch) -> Result<(), StoreError> {
        let mut guests = self.guests.write().await;
        let guest = guests
            .get_mut(id)
            .ok_or_else(|| StoreError::MissingGuest(id.clone()))?;
        patch.apply(guest);
        Ok(())
    }

    async fn delete(&self, id: &GuestId) -> Result<(), StoreError> {
        self.guests
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::MissingGuest(id.clone()))
    }

    async fn find_by_code(&self, code: &InvitationCode) -> Result<Option<Guest>, StoreError> {
        let guests = self.guests.read().await;
        Ok(guests.values().find(|g| &g.invitation_code == code).cloned())
    }
}
