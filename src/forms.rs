use rocket::form::{self, FromForm, FromFormField};
use rocket::fs::TempFile;

use crate::models::{AccessLevel, GuestDetails, RsvpResponse, RsvpStatus};

pub const MAX_RSVP_ADDITIONAL_GUESTS: u8 = 5;

#[derive(FromForm)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// The add/edit guest form. Only name and email are required; the email
/// check mirrors the browser's email input.
#[derive(Debug, FromForm)]
pub struct GuestDraft {
    #[field(validate = len(1..))]
    pub name: String,
    #[field(validate = email_address())]
    pub email: String,
    pub phone: Option<String>,
    #[field(default = AccessLevel::Ceremony)]
    pub access_level: AccessLevel,
    #[field(default = 0)]
    pub additional_guests: u32,
    #[field(default = String::new())]
    pub special_requirements: String,
}

fn email_address<'v>(email: &str) -> form::Result<'v, ()> {
    if !email.contains('@') {
        return Err(form::Error::validation("please enter an email address").into());
    }
    Ok(())
}

impl GuestDraft {
    pub fn into_details(self) -> GuestDetails {
        let phone = self
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        GuestDetails {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone,
            access_level: self.access_level,
            additional_guests: self.additional_guests,
            special_requirements: self.special_requirements,
        }
    }
}

/// What a guest may answer. Going back to pending is not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromFormField)]
pub enum RsvpChoice {
    #[field(value = "confirmed")]
    Confirmed,
    #[field(value = "declined")]
    Declined,
}

impl From<RsvpChoice> for RsvpStatus {
    fn from(choice: RsvpChoice) -> Self {
        match choice {
            RsvpChoice::Confirmed => RsvpStatus::Confirmed,
            RsvpChoice::Declined => RsvpStatus::Declined,
        }
    }
}

/// The count is read leniently: a blank or unreadable value counts as no
/// additional guests, and the bound only applies to a confirmation.
#[derive(Debug, FromForm)]
pub struct RsvpForm {
    pub status: RsvpChoice,
    pub additional_guests: Option<u32>,
}

impl RsvpForm {
    pub fn response(&self) -> Result<RsvpResponse, form::Error<'static>> {
        let count = self.additional_guests.unwrap_or(0);
        if self.status == RsvpChoice::Confirmed && count > u32::from(MAX_RSVP_ADDITIONAL_GUESTS) {
            return Err(form::Error::validation(format!(
                "at most {MAX_RSVP_ADDITIONAL_GUESTS} additional guests"
            ))
            .with_name("additional_guests"));
        }

        Ok(RsvpResponse::new(self.status.into(), count))
    }
}

#[derive(FromForm)]
pub struct DeleteConfirmation {
    pub confirm: bool,
}

#[derive(FromForm)]
pub struct PhotoForm<'r> {
    pub photo: TempFile<'r>,
}
