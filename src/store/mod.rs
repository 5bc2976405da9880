//! Guest record persistence.
//!
//! The document store is the single source of truth for the guest list.
//! Handlers never cache records between requests: every page that shows
//! guests reads them again, and every mutation is followed by a redirect
//! that triggers a fresh read.
//!
//! Concurrent writers are not coordinated. An admin edit and a guest's RSVP
//! landing on the same record resolve as last write wins.

use std::sync::Arc;

use crate::error::StoreError;
use crate::models::{Guest, GuestId, GuestPatch, InvitationCode, NewGuest};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::{Db, MysqlStore};

#[rocket::async_trait]
pub trait GuestStore: Send + Sync {
    /// Every guest, oldest first.
    async fn list(&self) -> Result<Vec<Guest>, StoreError>;

    /// Stores a new guest as `pending` with a fresh id and timestamp.
    async fn create(&self, guest: NewGuest) -> Result<Guest, StoreError>;

    async fn update(&self, id: &GuestId, patch: GuestPatch) -> Result<(), StoreError>;

    async fn delete(&self, id: &GuestId) -> Result<(), StoreError>;

    async fn find_by_code(&self, code: &InvitationCode) -> Result<Option<Guest>, StoreError>;
}

pub type SharedStore = Arc<dyn GuestStore>;

pub fn shared<S: GuestStore + 'static>(store: S) -> SharedStore {
    Arc::new(store)
}
