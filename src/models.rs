use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rand::{distributions::Alphanumeric, Rng};
use rocket::form::FromFormField;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const INVITATION_CODE_LEN: usize = 8;

/// Store-assigned record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(String);

impl GuestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GuestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for GuestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque token behind a guest's personal invitation link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitationCode(String);

impl InvitationCode {
    /// Short random code. Collisions are not checked here, the store's
    /// unique index rejects them.
    pub fn generate() -> Self {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(INVITATION_CODE_LEN)
            .map(char::from)
            .collect();

        Self(code.to_ascii_lowercase())
    }

    /// Accepts any non-empty ASCII alphanumeric token, so codes issued by
    /// older generators still resolve.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvitationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromFormField)]
pub enum AccessLevel {
    #[serde(rename = "ceremony")]
    #[field(value = "ceremony")]
    Ceremony,
    #[serde(rename = "ceremony+reception")]
    #[field(value = "ceremony+reception")]
    CeremonyAndReception,
}

impl AccessLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Ceremony => "ceremony",
            AccessLevel::CeremonyAndReception => "ceremony+reception",
        }
    }

    pub fn includes_reception(self) -> bool {
        self == AccessLevel::CeremonyAndReception
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        AccessLevel::Ceremony
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ceremony" => Ok(AccessLevel::Ceremony),
            "ceremony+reception" => Ok(AccessLevel::CeremonyAndReception),
            other => Err(format!("unknown access level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Pending,
    Confirmed,
    Declined,
}

impl RsvpStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RsvpStatus::Pending => "pending",
            RsvpStatus::Confirmed => "confirmed",
            RsvpStatus::Declined => "declined",
        }
    }
}

impl Default for RsvpStatus {
    fn default() -> Self {
        RsvpStatus::Pending
    }
}

impl FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RsvpStatus::Pending),
            "confirmed" => Ok(RsvpStatus::Confirmed),
            "declined" => Ok(RsvpStatus::Declined),
            other => Err(format!("unknown rsvp status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub access_level: AccessLevel,
    pub additional_guests: u32,
    pub special_requirements: String,
    pub invitation_code: InvitationCode,
    pub rsvp_status: RsvpStatus,
    pub created_at: NaiveDateTime,
}

/// The admin-editable part of a guest record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GuestDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub access_level: AccessLevel,
    pub additional_guests: u32,
    pub special_requirements: String,
}

/// Creation payload. The store fills in id, status and timestamp.
#[derive(Debug, Clone)]
pub struct NewGuest {
    pub details: GuestDetails,
    pub invitation_code: InvitationCode,
}

impl NewGuest {
    pub fn new(details: GuestDetails, invitation_code: InvitationCode) -> Self {
        Self {
            details,
            invitation_code,
        }
    }

    pub fn into_guest(self, id: GuestId, created_at: NaiveDateTime) -> Guest {
        let NewGuest {
            details,
            invitation_code,
        } = self;

        Guest {
            id,
            name: details.name,
            email: details.email,
            phone: details.phone,
            access_level: details.access_level,
            additional_guests: details.additional_guests,
            special_requirements: details.special_requirements,
            invitation_code,
            rsvp_status: RsvpStatus::Pending,
            created_at,
        }
    }
}

/// Partial update: `None` leaves the stored value alone. `phone` is doubly
/// optional so a patch can clear it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub access_level: Option<AccessLevel>,
    pub additional_guests: Option<u32>,
    pub special_requirements: Option<String>,
    pub rsvp_status: Option<RsvpStatus>,
}

impl GuestPatch {
    pub fn is_empty(&self) -> bool {
        *self == GuestPatch::default()
    }

    pub fn apply(self, guest: &mut Guest) {
        if let Some(name) = self.name {
            guest.name = name;
        }
        if let Some(email) = self.email {
            guest.email = email;
        }
        if let Some(phone) = self.phone {
            guest.phone = phone;
        }
        if let Some(level) = self.access_level {
            guest.access_level = level;
        }
        if let Some(count) = self.additional_guests {
            guest.additional_guests = count;
        }
        if let Some(notes) = self.special_requirements {
            guest.special_requirements = notes;
        }
        if let Some(status) = self.rsvp_status {
            guest.rsvp_status = status;
        }
    }
}

impl From<GuestDetails> for GuestPatch {
    fn from(details: GuestDetails) -> Self {
        Self {
            name: Some(details.name),
            email: Some(details.email),
            phone: Some(details.phone),
            access_level: Some(details.access_level),
            additional_guests: Some(details.additional_guests),
            special_requirements: Some(details.special_requirements),
            rsvp_status: None,
        }
    }
}

/// A guest's answer from the invitation page. Only a confirmed answer keeps
/// its additional guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsvpResponse {
    status: RsvpStatus,
    additional_guests: u32,
}

impl RsvpResponse {
    pub fn new(status: RsvpStatus, additional_guests: u32) -> Self {
        let additional_guests = match status {
            RsvpStatus::Confirmed => additional_guests,
            RsvpStatus::Pending | RsvpStatus::Declined => 0,
        };

        Self {
            status,
            additional_guests,
        }
    }

    pub fn status(&self) -> RsvpStatus {
        self.status
    }

    pub fn additional_guests(&self) -> u32 {
        self.additional_guests
    }
}

impl From<RsvpResponse> for GuestPatch {
    fn from(response: RsvpResponse) -> Self {
        Self {
            rsvp_status: Some(response.status),
            additional_guests: Some(response.additional_guests),
            ..GuestPatch::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn alice() -> Guest {
        let details = GuestDetails {
            name: "Alice".into(),
            email: "a@x.com".into(),
            ..GuestDetails::default()
        };
        NewGuest::new(details, InvitationCode::generate())
            .into_guest(GuestId::generate(), Utc::now().naive_utc())
    }

    #[test]
    fn generated_codes_are_short_lowercase_tokens() {
        let code = InvitationCode::generate();
        assert_eq!(code.as_str().len(), INVITATION_CODE_LEN);
        assert!(code
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn parse_rejects_blank_and_path_like_codes() {
        assert!(InvitationCode::parse("").is_none());
        assert!(InvitationCode::parse("   ").is_none());
        assert!(InvitationCode::parse("../etc").is_none());
        assert_eq!(InvitationCode::parse(" abc123 ").unwrap().as_str(), "abc123");
    }

    #[test]
    fn new_guest_starts_pending() {
        let guest = alice();
        assert_eq!(guest.rsvp_status, RsvpStatus::Pending);
        assert_eq!(guest.additional_guests, 0);
        assert_eq!(guest.access_level, AccessLevel::Ceremony);
        assert!(!guest.invitation_code.as_str().is_empty());
    }

    #[test]
    fn declining_drops_additional_guests() {
        let response = RsvpResponse::new(RsvpStatus::Declined, 3);
        assert_eq!(response.additional_guests(), 0);

        let response = RsvpResponse::new(RsvpStatus::Confirmed, 2);
        assert_eq!(response.additional_guests(), 2);
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut guest = alice();
        let before = guest.clone();

        GuestPatch {
            phone: Some(Some("555-0100".into())),
            ..GuestPatch::default()
        }
        .apply(&mut guest);

        assert_eq!(guest.phone.as_deref(), Some("555-0100"));
        assert_eq!(guest.name, before.name);
        assert_eq!(guest.invitation_code, before.invitation_code);
        assert_eq!(guest.rsvp_status, before.rsvp_status);
    }

    #[test]
    fn rsvp_patch_carries_status_and_count_only() {
        let patch = GuestPatch::from(RsvpResponse::new(RsvpStatus::Confirmed, 2));
        assert_eq!(patch.rsvp_status, Some(RsvpStatus::Confirmed));
        assert_eq!(patch.additional_guests, Some(2));
        assert!(patch.access_level.is_none());
        assert!(patch.name.is_none());
    }

    #[test]
    fn wire_shape_uses_camel_case_names() {
        let value = serde_json::to_value(alice()).unwrap();
        assert_eq!(value["accessLevel"], "ceremony");
        assert_eq!(value["rsvpStatus"], "pending");
        assert_eq!(value["additionalGuests"], 0);
        assert!(value["invitationCode"].is_string());
        assert!(value.get("specialRequirements").is_some());

        let both: AccessLevel = serde_json::from_str("\"ceremony+reception\"").unwrap();
        assert!(both.includes_reception());
    }
}
