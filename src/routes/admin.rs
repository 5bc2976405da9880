use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::Redirect;
use rocket::State;
use rocket_dyn_templates::{context, Template};
use tracing::{error, info, warn};

use super::RequestOrigin;
use crate::auth::{session_token, AdminSession, Authenticator, SESSION_COOKIE};
use crate::forms::{DeleteConfirmation, GuestDraft, LoginForm};
use crate::models::{GuestId, GuestPatch, InvitationCode, NewGuest};
use crate::store::SharedStore;
use crate::views::{guest_rows, GuestFormView, GuestRowView, COPIED_ACK_MS};

const SIGN_IN_FAILED: &str = "Failed to sign in. Please check your credentials.";

fn login_template(error: Option<&str>) -> Template {
    Template::render("login", context! { error: error })
}

fn signed_in_or_login(session: Option<AdminSession>) -> Result<Redirect, Template> {
    match session {
        Some(_) => Ok(Redirect::to(uri!("/admin"))),
        None => Err(login_template(None)),
    }
}

#[get("/")]
pub fn home(session: Option<AdminSession>) -> Result<Redirect, Template> {
    signed_in_or_login(session)
}

#[get("/login")]
pub fn login_page(session: Option<AdminSession>) -> Result<Redirect, Template> {
    signed_in_or_login(session)
}

#[post("/login", data = "<credentials>")]
pub async fn sign_in(
    credentials: Form<LoginForm>,
    cookies: &CookieJar<'_>,
    auth: &State<Authenticator>,
) -> Result<Redirect, Template> {
    match auth.sign_in(&credentials.email, &credentials.password).await {
        Ok(token) => {
            cookies.add_private((SESSION_COOKIE, token));
            Ok(Redirect::to(uri!("/admin")))
        }
        Err(_) => Err(login_template(Some(SIGN_IN_FAILED))),
    }
}

#[post("/logout")]
pub async fn sign_out(cookies: &CookieJar<'_>, auth: &State<Authenticator>) -> Redirect {
    if let Some(token) = session_token(cookies) {
        if let Err(e) = auth.sign_out(&token).await {
            warn!("Failed to log out: {e}");
        }
    }
    cookies.remove_private(SESSION_COOKIE);

    Redirect::to(uri!("/login"))
}

#[get("/admin?<add>&<edit>")]
pub async fn dashboard(
    session: AdminSession,
    add: Option<bool>,
    edit: Option<&str>,
    store: &State<SharedStore>,
    origin: RequestOrigin,
) -> Template {
    let (guests, load_failed) = match store.list().await {
        Ok(guests) => (guests, false),
        Err(e) => {
            error!("Error fetching guests: {e}");
            (Vec::new(), true)
        }
    };

    // an edit request wins over an open add form
    let form = edit
        .and_then(|id| guests.iter().find(|g| g.id.as_str() == id))
        .map(GuestFormView::editing)
        .or_else(|| add.unwrap_or(false).then(GuestFormView::blank));

    Template::render(
        "dashboard",
        context! {
            admin_email: &session.email,
            guests: guest_rows(&guests, &origin.0),
            load_failed: load_failed,
            form: form,
            copied_ack_ms: COPIED_ACK_MS,
        },
    )
}

#[get("/admin", rank = 2)]
pub fn dashboard_login() -> Redirect {
    Redirect::to(uri!("/login"))
}

#[post("/admin/guests", data = "<draft>")]
pub async fn add_guest(
    _session: AdminSession,
    draft: Form<GuestDraft>,
    store: &State<SharedStore>,
) -> Redirect {
    let guest = NewGuest::new(draft.into_inner().into_details(), InvitationCode::generate());

    match store.create(guest).await {
        Ok(created) => {
            info!(guest = %created.id, code = %created.invitation_code, "guest added");
            Redirect::to(uri!("/admin"))
        }
        Err(e) => {
            error!("Error adding guest: {e}");
            Redirect::to("/admin?add=true")
        }
    }
}

#[post("/admin/guests/<id>", data = "<draft>")]
pub async fn update_guest(
    _session: AdminSession,
    id: &str,
    draft: Form<GuestDraft>,
    store: &State<SharedStore>,
) -> Redirect {
    let id = GuestId::from(id);
    let patch = GuestPatch::from(draft.into_inner().into_details());

    match store.update(&id, patch).await {
        Ok(()) => {
            info!(guest = %id, "guest updated");
            Redirect::to(uri!("/admin"))
        }
        Err(e) => {
            error!("Error updating guest: {e}");
            Redirect::to(format!("/admin?edit={id}"))
        }
    }
}

#[get("/admin/guests/<id>/delete")]
pub async fn confirm_delete(
    _session: AdminSession,
    id: &str,
    store: &State<SharedStore>,
    origin: RequestOrigin,
) -> Result<Template, Redirect> {
    let guests = store.list().await.map_err(|e| {
        error!("Error fetching guests: {e}");
        Redirect::to(uri!("/admin"))
    })?;

    match guests.iter().find(|g| g.id.as_str() == id) {
        Some(guest) => Ok(Template::render(
            "confirm_delete",
            context! { guest: GuestRowView::new(guest, &origin.0) },
        )),
        None => Err(Redirect::to(uri!("/admin"))),
    }
}

#[post("/admin/guests/<id>/delete", data = "<confirmation>")]
pub async fn delete_guest(
    _session: AdminSession,
    id: &str,
    confirmation: Form<DeleteConfirmation>,
    store: &State<SharedStore>,
) -> Redirect {
    let id = GuestId::from(id);

    if !confirmation.confirm {
        info!(guest = %id, "delete not confirmed");
        return Redirect::to(uri!("/admin"));
    }

    match store.delete(&id).await {
        Ok(()) => info!(guest = %id, "guest deleted"),
        Err(e) => error!("Error deleting guest: {e}"),
    }

    Redirect::to(uri!("/admin"))
}
