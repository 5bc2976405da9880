use std::path::PathBuf;

use chrono::NaiveDate;
use rocket::figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which document store backs the guest list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mysql,
    Memory,
}

/// Application settings, read from the same figment as Rocket's own
/// (`Rocket.toml` and `ROCKET_*` variables).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub admin: AdminConfig,
    pub event: EventConfig,
    /// Origin used in invitation links. Falls back to the request's Host.
    pub public_url: Option<String>,
    pub photo_dir: PathBuf,
    pub notify: Option<NotifyConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin: AdminConfig::default(),
            event: EventConfig::default(),
            public_url: None,
            photo_dir: PathBuf::from("photos"),
            notify: None,
        }
    }
}

impl AppConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    pub email: String,
    pub password_sha256: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    pub relay: String,
    pub username: String,
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub couple: String,
    pub date: NaiveDate,
    pub ceremony: Venue,
    pub reception: Venue,
    pub entertainment: String,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Venue {
    pub time: String,
    pub note: String,
    pub place: String,
    pub address: String,
    pub map_url: String,
}

impl EventConfig {
    pub fn is_event_day(&self, today: NaiveDate) -> bool {
        self.date == today
    }

    pub fn date_label(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            couple: "Jane & John".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap_or_default(),
            ceremony: Venue {
                time: "2:00 PM".into(),
                note: "Please arrive 30 minutes early".into(),
                place: "St. Mary's Church".into(),
                address: "123 Wedding Lane, Cityville".into(),
                map_url: "https://maps.google.com".into(),
            },
            reception: Venue {
                time: "5:00 PM - 11:00 PM".into(),
                note: "Dinner will be served at 6:30 PM".into(),
                place: "Grand Ballroom, Luxury Hotel".into(),
                address: "456 Celebration Avenue, Cityville".into(),
                map_url: "https://maps.google.com".into(),
            },
            entertainment: "Live band and DJ".into(),
            notes: vec![
                "Dress code: Semi-formal".into(),
                "Parking is available at both venues".into(),
                "Please let us know of any dietary restrictions".into(),
                "For any questions, contact our wedding planner at wedding@example.com".into(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::figment::providers::Serialized;

    #[test]
    fn partial_event_table_keeps_defaults() {
        let figment = Figment::new()
            .merge(Serialized::default("event.couple", "Ann & Bo"))
            .merge(Serialized::default("event.date", "2025-09-06"));
        let config = AppConfig::from_figment(&figment).unwrap();

        assert_eq!(config.event.couple, "Ann & Bo");
        assert_eq!(config.event.date_label(), "September 6, 2025");
        assert_eq!(config.event.ceremony.time, "2:00 PM");
        assert_eq!(config.photo_dir, PathBuf::from("photos"));
        assert!(config.notify.is_none());
    }

    #[test]
    fn event_day_matches_calendar_date_only() {
        let event = EventConfig::default();
        assert!(event.is_event_day(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
        assert!(!event.is_event_day(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()));
    }

    #[test]
    fn store_backend_names() {
        let backend: StoreBackend = Figment::new()
            .merge(Serialized::default("guest_store", "memory"))
            .extract_inner("guest_store")
            .unwrap();
        assert_eq!(backend, StoreBackend::Memory);
    }
}
