use std::convert::Infallible;

use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::response::status::Custom;
use rocket::Route;
use rocket_dyn_templates::{context, Template};

use crate::config::AppConfig;

pub mod admin;
pub mod invitation;

pub fn all() -> Vec<Route> {
    routes![
        admin::home,
        admin::login_page,
        admin::sign_in,
        admin::sign_out,
        admin::dashboard,
        admin::dashboard_login,
        admin::add_guest,
        admin::update_guest,
        admin::confirm_delete,
        admin::delete_guest,
        invitation::missing_code,
        invitation::invitation,
        invitation::rsvp,
        invitation::upload_photo,
    ]
}

/// Scheme and host that invitation links are built on.
pub struct RequestOrigin(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestOrigin {
    type Error = Infallible;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let configured = req
            .rocket()
            .state::<AppConfig>()
            .and_then(|config| config.public_url.clone());

        let origin = configured.unwrap_or_else(|| match req.host() {
            Some(host) => format!("http://{host}"),
            None => "http://localhost:8000".to_string(),
        });

        Outcome::Success(RequestOrigin(origin))
    }
}

/// The "Oops!" page with a way back home.
pub fn oops(status: Status, message: impl Into<String>) -> Custom<Template> {
    let message: String = message.into();
    Custom(status, Template::render("oops", context! { message: message }))
}

#[catch(404)]
pub fn not_found() -> Template {
    Template::render("oops", context! { message: "Page not found" })
}
