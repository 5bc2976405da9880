//! Display state derived from guest records for the templates.

use serde::Serialize;

use crate::config::{EventConfig, Venue};
use crate::forms::MAX_RSVP_ADDITIONAL_GUESTS;
use crate::models::{AccessLevel, Guest, InvitationCode, RsvpStatus};

/// How long the "Copied!" acknowledgement stays on a row.
pub const COPIED_ACK_MS: u64 = 2000;

pub fn invitation_link(origin: &str, code: &InvitationCode) -> String {
    format!("{}/invitation/{}", origin.trim_end_matches('/'), code)
}

pub fn access_badge(level: AccessLevel) -> (&'static str, &'static str) {
    match level {
        AccessLevel::CeremonyAndReception => ("users", "Ceremony & Reception"),
        AccessLevel::Ceremony => ("user", "Ceremony Only"),
    }
}

pub fn rsvp_badge(status: RsvpStatus) -> (&'static str, &'static str) {
    match status {
        RsvpStatus::Confirmed => ("Confirmed", "green"),
        RsvpStatus::Declined => ("Declined", "red"),
        RsvpStatus::Pending => ("Pending", "yellow"),
    }
}

#[derive(Debug, Serialize)]
pub struct GuestRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub access_icon: &'static str,
    pub access_label: &'static str,
    pub rsvp_label: &'static str,
    pub rsvp_color: &'static str,
    pub additional_guests: u32,
    pub invite_link: String,
}

impl GuestRowView {
    pub fn new(guest: &Guest, origin: &str) -> Self {
        let (access_icon, access_label) = access_badge(guest.access_level);
        let (rsvp_label, rsvp_color) = rsvp_badge(guest.rsvp_status);

        Self {
            id: guest.id.to_string(),
            name: guest.name.clone(),
            email: guest.email.clone(),
            phone: guest.phone.clone(),
            access_icon,
            access_label,
            rsvp_label,
            rsvp_color,
            additional_guests: guest.additional_guests,
            invite_link: invitation_link(origin, &guest.invitation_code),
        }
    }
}

pub fn guest_rows(guests: &[Guest], origin: &str) -> Vec<GuestRowView> {
    guests.iter().map(|g| GuestRowView::new(g, origin)).collect()
}

/// Values for the add/edit form, seeded from a guest when editing.
#[derive(Debug, Serialize)]
pub struct GuestFormView {
    pub action: String,
    pub submit_label: &'static str,
    pub cancellable: bool,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub access_level: &'static str,
    pub additional_guests: u32,
    pub special_requirements: String,
}

impl GuestFormView {
    pub fn blank() -> Self {
        Self {
            action: "/admin/guests".into(),
            submit_label: "Add Guest",
            cancellable: false,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            access_level: AccessLevel::Ceremony.as_str(),
            additional_guests: 0,
            special_requirements: String::new(),
        }
    }

    pub fn editing(guest: &Guest) -> Self {
        Self {
            action: format!("/admin/guests/{}", guest.id),
            submit_label: "Update Guest",
            cancellable: true,
            name: guest.name.clone(),
            email: guest.email.clone(),
            phone: guest.phone.clone().unwrap_or_default(),
            access_level: guest.access_level.as_str(),
            additional_guests: guest.additional_guests,
            special_requirements: guest.special_requirements.clone(),
        }
    }
}

/// Everything the invitation page renders for a resolved guest.
#[derive(Debug, Serialize)]
pub struct InvitationView<'a> {
    pub guest_name: &'a str,
    pub code: &'a str,
    pub event: EventView<'a>,
    pub show_reception: bool,
    pub rsvp_status: &'static str,
    pub additional_guests: u32,
    pub max_additional_guests: u8,
    pub submitted: bool,
    pub thank_you: String,
    pub photos_open: bool,
    pub tab: &'static str,
    pub uploaded: bool,
}

#[derive(Debug, Serialize)]
pub struct EventView<'a> {
    pub couple: &'a str,
    pub date: String,
    pub ceremony: &'a Venue,
    pub reception: &'a Venue,
    pub entertainment: &'a str,
    pub notes: &'a [String],
}

impl<'a> EventView<'a> {
    pub fn new(event: &'a EventConfig) -> Self {
        Self {
            couple: &event.couple,
            date: event.date_label(),
            ceremony: &event.ceremony,
            reception: &event.reception,
            entertainment: &event.entertainment,
            notes: &event.notes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Details,
    Photos,
}

impl Tab {
    pub fn from_query(tab: Option<&str>) -> Self {
        match tab {
            Some("photos") => Tab::Photos,
            _ => Tab::Details,
        }
    }
}

pub struct InvitationState {
    pub submitted: bool,
    pub tab: Tab,
    pub uploaded: bool,
    pub event_day: bool,
}

impl<'a> InvitationView<'a> {
    pub fn new(guest: &'a Guest, event: &'a EventConfig, state: InvitationState) -> Self {
        // the photo tab only exists on the day itself
        let tab = match state.tab {
            Tab::Photos if state.event_day => "photos",
            _ => "details",
        };

        Self {
            guest_name: &guest.name,
            code: guest.invitation_code.as_str(),
            event: EventView::new(event),
            show_reception: guest.access_level.includes_reception(),
            rsvp_status: guest.rsvp_status.as_str(),
            // admins may record more than a guest can submit
            additional_guests: guest
                .additional_guests
                .min(u32::from(MAX_RSVP_ADDITIONAL_GUESTS)),
            max_additional_guests: MAX_RSVP_ADDITIONAL_GUESTS,
            submitted: state.submitted && guest.rsvp_status != RsvpStatus::Pending,
            thank_you: thank_you(guest.rsvp_status, guest.additional_guests),
            photos_open: state.event_day,
            tab,
            uploaded: state.uploaded,
        }
    }
}

pub fn thank_you(status: RsvpStatus, additional_guests: u32) -> String {
    match status {
        RsvpStatus::Confirmed => match additional_guests {
            0 => "We look forward to seeing you!".to_string(),
            1 => "We look forward to seeing you and your 1 guest!".to_string(),
            n => format!("We look forward to seeing you and your {n} guests!"),
        },
        RsvpStatus::Declined | RsvpStatus::Pending => {
            "We're sorry you can't make it, but thank you for letting us know.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GuestDetails, GuestId, NewGuest};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn guest(level: AccessLevel) -> Guest {
        let details = GuestDetails {
            name: "Alice".into(),
            email: "a@x.com".into(),
            access_level: level,
            ..GuestDetails::default()
        };
        NewGuest::new(details, InvitationCode::parse("abc123").unwrap())
            .into_guest(GuestId::from("g1"), Utc::now().naive_utc())
    }

    #[test]
    fn link_joins_origin_and_code() {
        let code = InvitationCode::parse("abc123").unwrap();
        assert_eq!(
            invitation_link("https://wedding.example/", &code),
            "https://wedding.example/invitation/abc123"
        );
    }

    #[test]
    fn badges_follow_status_and_tier() {
        assert_eq!(rsvp_badge(RsvpStatus::Confirmed), ("Confirmed", "green"));
        assert_eq!(rsvp_badge(RsvpStatus::Declined), ("Declined", "red"));
        assert_eq!(rsvp_badge(RsvpStatus::Pending), ("Pending", "yellow"));
        assert_eq!(access_badge(AccessLevel::Ceremony).1, "Ceremony Only");
        assert_eq!(access_badge(AccessLevel::CeremonyAndReception).0, "users");
    }

    #[test]
    fn row_view_carries_link_and_badges() {
        let row = GuestRowView::new(&guest(AccessLevel::Ceremony), "http://localhost:8000");
        assert_eq!(row.invite_link, "http://localhost:8000/invitation/abc123");
        assert_eq!(row.rsvp_color, "yellow");
        assert_eq!(row.access_icon, "user");
    }

    #[test]
    fn reception_follows_access_tier() {
        let event = EventConfig::default();
        let state = || InvitationState {
            submitted: false,
            tab: Tab::Details,
            uploaded: false,
            event_day: false,
        };

        let only_ceremony = guest(AccessLevel::Ceremony);
        assert!(!InvitationView::new(&only_ceremony, &event, state()).show_reception);

        let both = guest(AccessLevel::CeremonyAndReception);
        assert!(InvitationView::new(&both, &event, state()).show_reception);
    }

    #[test]
    fn photo_tab_needs_event_day() {
        let event = EventConfig::default();
        let g = guest(AccessLevel::Ceremony);

        let view = InvitationView::new(
            &g,
            &event,
            InvitationState {
                submitted: false,
                tab: Tab::Photos,
                uploaded: false,
                event_day: false,
            },
        );
        assert_eq!(view.tab, "details");
        assert!(!view.photos_open);
    }

    #[test]
    fn prefilled_count_stays_submittable() {
        let event = EventConfig::default();
        let mut g = guest(AccessLevel::Ceremony);
        g.additional_guests = 7;

        let view = InvitationView::new(
            &g,
            &event,
            InvitationState {
                submitted: false,
                tab: Tab::Details,
                uploaded: false,
                event_day: false,
            },
        );
        assert_eq!(view.additional_guests, 5);
        assert_eq!(view.max_additional_guests, 5);
    }

    #[test]
    fn thank_you_pluralises_guests() {
        assert_eq!(
            thank_you(RsvpStatus::Confirmed, 2),
            "We look forward to seeing you and your 2 guests!"
        );
        assert_eq!(
            thank_you(RsvpStatus::Confirmed, 1),
            "We look forward to seeing you and your 1 guest!"
        );
        assert!(thank_you(RsvpStatus::Declined, 0).starts_with("We're sorry"));
    }
}
