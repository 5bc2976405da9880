//! Lets the hosts know when a guest answers their invitation.

use std::env;

use lettre::message::header::ContentType;
use lettre::message::{header, Mailboxes};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, error, info};

use crate::config::NotifyConfig;
use crate::models::{Guest, RsvpStatus};

#[derive(Clone)]
pub struct RsvpNotifier {
    config: Option<NotifyConfig>,
}

impl RsvpNotifier {
    pub fn new(config: Option<NotifyConfig>) -> Self {
        Self { config }
    }

    /// Mails the hosts about a guest's answer. Never fails the caller.
    pub async fn rsvp_received(&self, guest: &Guest) {
        let Some(config) = self.config.clone() else {
            debug!(guest = %guest.id, "rsvp notifications not configured");
            return;
        };

        let (subject, body) = compose(guest);
        let sent = rocket::tokio::task::spawn_blocking(move || send(&config, subject, body)).await;

        match sent {
            Ok(Ok(())) => info!(guest = %guest.id, "rsvp notification sent"),
            Ok(Err(e)) => error!(guest = %guest.id, "could not send rsvp notification: {e}"),
            Err(e) => error!(guest = %guest.id, "rsvp notification task failed: {e}"),
        }
    }
}

pub fn compose(guest: &Guest) -> (String, String) {
    let response = match guest.rsvp_status {
        RsvpStatus::Confirmed => "accepted",
        RsvpStatus::Declined => "declined",
        RsvpStatus::Pending => "not yet answered",
    };

    let notes = if guest.special_requirements.trim().is_empty() {
        "N/A"
    } else {
        guest.special_requirements.trim()
    };

    let subject = format!("{} has {} your invitation.", guest.name, response);
    let body = format!(
        "{} has {} your invitation.\nAdditional guests: {}\nSpecial requirements: {}\n",
        guest.name, response, guest.additional_guests, notes
    );

    (subject, body)
}

fn send(config: &NotifyConfig, subject: String, body: String) -> Result<(), String> {
    let password = env::var("SMTP_PASSWORD").map_err(|_| "SMTP_PASSWORD is not set".to_string())?;
    let creds = Credentials::new(config.username.clone(), password);

    let mailboxes: Mailboxes = config.to.parse().map_err(|e| format!("bad recipients: {e}"))?;
    let to_header: header::To = mailboxes.into();

    let mut builder = Message::builder()
        .mailbox(to_header)
        .from(config.from.parse().map_err(|e| format!("bad sender: {e}"))?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN);
    if let Some(reply_to) = &config.reply_to {
        builder = builder.reply_to(reply_to.parse().map_err(|e| format!("bad reply-to: {e}"))?);
    }
    let email = builder.body(body).map_err(|e| e.to_string())?;

    let mailer = SmtpTransport::starttls_relay(&config.relay)
        .map_err(|e| e.to_string())?
        .credentials(creds)
        .build();

    mailer.send(&email).map(|_| ()).map_err(|e| e.to_string())
}
