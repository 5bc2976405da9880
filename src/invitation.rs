use tracing::{info, warn};

use crate::error::InvitationError;
use crate::models::{Guest, GuestPatch, InvitationCode, RsvpResponse};
use crate::store::GuestStore;

/// Looks up the guest behind an invitation link.
pub async fn resolve(store: &dyn GuestStore, raw_code: Option<&str>) -> Result<Guest, InvitationError> {
    let code = raw_code
        .and_then(InvitationCode::parse)
        .ok_or(InvitationError::MissingCode)?;

    match store.find_by_code(&code).await? {
        Some(guest) => Ok(guest),
        None => {
            warn!(%code, "no guest for invitation code");
            Err(InvitationError::NotFound)
        }
    }
}

/// Persists a guest's own answer. Only status and the additional-guest
/// count are written; the guest's tier and details stay as the admin set
/// them.
pub async fn record_rsvp(
    store: &dyn GuestStore,
    guest: &Guest,
    response: RsvpResponse,
) -> Result<Guest, InvitationError> {
    store.update(&guest.id, GuestPatch::from(response)).await?;
    info!(
        guest = %guest.id,
        status = response.status().as_str(),
        additional_guests = response.additional_guests(),
        "rsvp recorded"
    );

    let mut updated = guest.clone();
    GuestPatch::from(response).apply(&mut updated);
    Ok(updated)
}
