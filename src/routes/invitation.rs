use chrono::{Local, NaiveDate};
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::response::Redirect;
use rocket::State;
use rocket_dyn_templates::Template;
use tracing::{error, info};

use super::oops;
use crate::config::AppConfig;
use crate::error::{InvitationError, StorageError};
use crate::forms::{PhotoForm, RsvpForm, MAX_RSVP_ADDITIONAL_GUESTS};
use crate::invitation::{record_rsvp, resolve};
use crate::notify::RsvpNotifier;
use crate::photos::{PhotoOwner, SharedPhotoStorage};
use crate::store::SharedStore;
use crate::views::{InvitationState, InvitationView, Tab};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn not_shown(err: InvitationError) -> Custom<Template> {
    let status = match &err {
        InvitationError::Store(e) => {
            error!("Error fetching invitation: {e}");
            Status::InternalServerError
        }
        InvitationError::MissingCode | InvitationError::NotFound => Status::NotFound,
    };
    oops(status, err.to_string())
}

#[get("/invitation")]
pub fn missing_code() -> Custom<Template> {
    not_shown(InvitationError::MissingCode)
}

#[get("/invitation/<code>?<submitted>&<tab>&<uploaded>")]
pub async fn invitation(
    code: &str,
    submitted: Option<bool>,
    tab: Option<&str>,
    uploaded: Option<bool>,
    store: &State<SharedStore>,
    config: &State<AppConfig>,
) -> Result<Template, Custom<Template>> {
    let guest = resolve(store.inner().as_ref(), Some(code))
        .await
        .map_err(not_shown)?;

    let state = InvitationState {
        submitted: submitted.unwrap_or(false),
        tab: Tab::from_query(tab),
        uploaded: uploaded.unwrap_or(false),
        event_day: config.event.is_event_day(today()),
    };

    Ok(Template::render(
        "invitation",
        InvitationView::new(&guest, &config.event, state),
    ))
}

#[post("/invitation/<code>/rsvp", data = "<answer>")]
pub async fn rsvp(
    code: &str,
    answer: Form<RsvpForm>,
    store: &State<SharedStore>,
    notifier: &State<RsvpNotifier>,
) -> Result<Redirect, Custom<Template>> {
    let guest = resolve(store.inner().as_ref(), Some(code))
        .await
        .map_err(not_shown)?;

    let response = answer.response().map_err(|e| {
        info!(guest = %guest.id, "rejected rsvp: {e}");
        oops(
            Status::UnprocessableEntity,
            format!("Please bring at most {MAX_RSVP_ADDITIONAL_GUESTS} additional guests."),
        )
    })?;

    match record_rsvp(store.inner().as_ref(), &guest, response).await {
        Ok(updated) => {
            let location = format!("/invitation/{}?submitted=true", updated.invitation_code);
            let notifier = notifier.inner().clone();
            rocket::tokio::spawn(async move { notifier.rsvp_received(&updated).await });
            Ok(Redirect::to(location))
        }
        Err(e) => {
            error!("Error updating RSVP: {e}");
            Ok(Redirect::to(format!("/invitation/{}", guest.invitation_code)))
        }
    }
}

#[post("/invitation/<code>/photos", data = "<upload>")]
pub async fn upload_photo(
    code: &str,
    mut upload: Form<PhotoForm<'_>>,
    store: &State<SharedStore>,
    photos: &State<SharedPhotoStorage>,
    config: &State<AppConfig>,
) -> Result<Redirect, Custom<Template>> {
    let guest = resolve(store.inner().as_ref(), Some(code))
        .await
        .map_err(not_shown)?;

    if !config.event.is_event_day(today()) {
        return Err(oops(
            Status::Forbidden,
            "Photo sharing opens on the day of the wedding.",
        ));
    }

    let owner = PhotoOwner {
        guest_id: &guest.id,
        guest_name: &guest.name,
    };

    match photos.upload(&owner, &mut upload.photo).await {
        Ok(stored) => {
            info!(guest = %guest.id, key = %stored.key, bytes = stored.size, "guest shared a photo");
            Ok(Redirect::to(format!(
                "/invitation/{}?tab=photos&uploaded=true",
                guest.invitation_code
            )))
        }
        Err(StorageError::UnsupportedMedia(kind)) => {
            info!(guest = %guest.id, %kind, "rejected upload");
            Err(oops(
                Status::UnsupportedMediaType,
                "Please share a photo or a video.",
            ))
        }
        Err(e) => {
            error!("Error uploading photo: {e}");
            Ok(Redirect::to(format!(
                "/invitation/{}?tab=photos",
                guest.invitation_code
            )))
        }
    }
}
