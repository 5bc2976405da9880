#![allow(dead_code)]

use std::path::Path;

use chrono::{Local, NaiveDate};
use guestlist::models::{AccessLevel, Guest, GuestDetails, InvitationCode, NewGuest};
use guestlist::store::SharedStore;
use rocket::figment::Figment;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use sha2::{Digest, Sha256};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "hunter2";
pub const PUBLIC_URL: &str = "http://guests.test";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn far_away() -> NaiveDate {
    NaiveDate::from_ymd_opt(2001, 1, 1).unwrap()
}

pub fn figment(photo_dir: &Path, event_date: NaiveDate) -> Figment {
    let digest = hex::encode(Sha256::digest(ADMIN_PASSWORD.as_bytes()));

    rocket::Config::figment()
        .merge(("guest_store", "memory"))
        .merge(("template_dir", "templates"))
        .merge(("public_url", PUBLIC_URL))
        .merge(("photo_dir", photo_dir.display().to_string()))
        .merge(("admin.email", ADMIN_EMAIL))
        .merge(("admin.password_sha256", digest))
        .merge(("event.couple", "Ann & Bo"))
        .merge(("event.date", event_date.to_string()))
}

pub async fn client(photo_dir: &Path, event_date: NaiveDate) -> Client {
    Client::tracked(guestlist::build(figment(photo_dir, event_date)))
        .await
        .expect("valid rocket instance")
}

pub fn store(client: &Client) -> &SharedStore {
    client.rocket().state::<SharedStore>().expect("guest store is managed")
}

pub async fn sign_in(client: &Client) {
    let response = client
        .post("/login")
        .header(ContentType::Form)
        .body(format!("email={}&password={}", ADMIN_EMAIL, ADMIN_PASSWORD))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/admin"));
}

pub async fn seed(client: &Client, name: &str, code: &str, access_level: AccessLevel) -> Guest {
    let details = GuestDetails {
        name: name.into(),
        email: format!("{}@example.com", name.to_ascii_lowercase()),
        access_level,
        ..GuestDetails::default()
    };
    let code = InvitationCode::parse(code).expect("valid code");

    store(client)
        .create(NewGuest::new(details, code))
        .await
        .expect("guest stored")
}

pub fn location(response: &rocket::local::asynchronous::LocalResponse<'_>) -> Option<String> {
    response.headers().get_one("Location").map(str::to_string)
}
