#[rocket::launch]
fn rocket() -> _ {
    guestlist::telemetry::init();
    guestlist::build(rocket::Config::figment())
}
