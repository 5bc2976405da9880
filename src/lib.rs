//! Guest list and invitation site for a single event.
//!
//! Admins sign in to manage the guest list; each guest gets an invitation
//! link where they can RSVP and, on the day itself, share photos.

#[macro_use]
extern crate rocket;

pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod invitation;
pub mod models;
pub mod notify;
pub mod photos;
pub mod routes;
pub mod schema;
pub mod store;
pub mod telemetry;
pub mod views;

use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::{Build, Rocket};
use rocket_db_pools::Database;
use rocket_dyn_templates::Template;
use tracing::{error, info};

use crate::auth::Authenticator;
use crate::config::{AppConfig, StoreBackend};
use crate::notify::RsvpNotifier;
use crate::photos::{DiskStorage, SharedPhotoStorage};
use crate::store::{Db, MemoryStore, MysqlStore};

/// Assembles the application on top of `figment`.
pub fn build(figment: Figment) -> Rocket<Build> {
    let backend = figment
        .extract_inner::<StoreBackend>("guest_store")
        .unwrap_or_default();

    let rocket = assemble(figment);

    info!(?backend, "guest store selected");
    match backend {
        StoreBackend::Mysql => rocket.attach(Db::init()).attach(MysqlStore::fairing()),
        StoreBackend::Memory => rocket.manage(store::shared(MemoryStore::default())),
    }
}

/// Everything but the guest store, which the caller must manage as a
/// [`SharedStore`](store::SharedStore).
pub fn assemble(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .mount("/", routes::all())
        .register("/", catchers![routes::not_found])
        .attach(Template::fairing())
        .attach(AdHoc::try_on_ignite("Guest list services", services))
}

async fn services(rocket: Rocket<Build>) -> Result<Rocket<Build>, Rocket<Build>> {
    let config = match AppConfig::from_figment(rocket.figment()) {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            return Err(rocket);
        }
    };

    let auth = match Authenticator::from_config(&config.admin) {
        Ok(auth) => auth,
        Err(e) => {
            error!("invalid admin configuration: {e}");
            return Err(rocket);
        }
    };

    let photos: SharedPhotoStorage = std::sync::Arc::new(DiskStorage::new(config.photo_dir.clone()));
    let notifier = RsvpNotifier::new(config.notify.clone());

    Ok(rocket
        .manage(auth)
        .manage(photos)
        .manage(notifier)
        .manage(config))
}
