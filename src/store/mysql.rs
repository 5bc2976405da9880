use chrono::{NaiveDateTime, Timelike, Utc};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket_db_pools::diesel::dsl::{exists, select};
use rocket_db_pools::diesel::{prelude::*, MysqlPool};
use rocket::fairing::AdHoc;
use rocket_db_pools::Database;
use tracing::error;

use super::{shared, GuestStore};
use crate::error::StoreError;
use crate::models::{Guest, GuestId, GuestPatch, InvitationCode, NewGuest};
use crate::schema::guests;

#[derive(Database)]
#[database("guests")]
pub struct Db(MysqlPool);

#[derive(Insertable, Selectable, Queryable)]
#[diesel(table_name = guests)]
struct GuestRow {
    id: String,
    name: String,
    email: String,
    phone: Option<String>,
    access_level: String,
    additional_guests: i32,
    special_requirements: String,
    invitation_code: String,
    rsvp_status: String,
    created_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = guests)]
struct GuestChanges {
    name: Option<String>,
    email: Option<String>,
    phone: Option<Option<String>>,
    access_level: Option<String>,
    additional_guests: Option<i32>,
    special_requirements: Option<String>,
    rsvp_status: Option<String>,
}

impl From<Guest> for GuestRow {
    fn from(guest: Guest) -> Self {
        Self {
            id: guest.id.to_string(),
            name: guest.name,
            email: guest.email,
            phone: guest.phone,
            access_level: guest.access_level.as_str().to_string(),
            additional_guests: count_to_column(guest.additional_guests),
            special_requirements: guest.special_requirements,
            invitation_code: guest.invitation_code.to_string(),
            rsvp_status: guest.rsvp_status.as_str().to_string(),
            created_at: guest.created_at,
        }
    }
}

impl TryFrom<GuestRow> for Guest {
    type Error = StoreError;

    fn try_from(row: GuestRow) -> Result<Self, Self::Error> {
        let decode_error = |reason: String| StoreError::Decode {
            id: row.id.clone(),
            reason,
        };

        let access_level = row.access_level.parse().map_err(decode_error)?;
        let rsvp_status = row.rsvp_status.parse().map_err(decode_error)?;
        let additional_guests = u32::try_from(row.additional_guests)
            .map_err(|_| decode_error(format!("negative guest count {}", row.additional_guests)))?;
        let invitation_code = InvitationCode::parse(&row.invitation_code)
            .ok_or_else(|| decode_error(format!("bad invitation code '{}'", row.invitation_code)))?;

        Ok(Guest {
            id: GuestId::from(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            access_level,
            additional_guests,
            special_requirements: row.special_requirements,
            invitation_code,
            rsvp_status,
            created_at: row.created_at,
        })
    }
}

impl From<GuestPatch> for GuestChanges {
    fn from(patch: GuestPatch) -> Self {
        Self {
            name: patch.name,
            email: patch.email,
            phone: patch.phone,
            access_level: patch.access_level.map(|l| l.as_str().to_string()),
            additional_guests: patch.additional_guests.map(count_to_column),
            special_requirements: patch.special_requirements,
            rsvp_status: patch.rsvp_status.map(|s| s.as_str().to_string()),
        }
    }
}

fn count_to_column(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Guest store on the `guests` MySQL table.
pub struct MysqlStore {
    pool: MysqlPool,
}

impl MysqlStore {
    pub fn new(pool: MysqlPool) -> Self {
        Self { pool }
    }

    /// Manages a [`SharedStore`](super::SharedStore) over the pool that
    /// [`Db::init`] attached. Must be attached after it.
    pub fn fairing() -> AdHoc {
        AdHoc::try_on_ignite("MySQL guest store", |rocket| async {
            let pool = Db::fetch(&rocket).map(|db| db.0.clone());
            match pool {
                Some(pool) => Ok(rocket.manage(shared(MysqlStore::new(pool)))),
                None => {
                    error!("guests database pool is not initialized");
                    Err(rocket)
                }
            }
        })
    }

    async fn exists(&self, id: &GuestId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(|e| StoreError::Pool(e.to_string()))?;
        let found = select(exists(guests::table.find(id.as_str())))
            .get_result(&mut conn)
            .await?;
        Ok(found)
    }
}

#[rocket::async_trait]
impl GuestStore for MysqlStore {
    async fn list(&self) -> Result<Vec<Guest>, StoreError> {
        let mut conn = self.pool.get().await.map_err(|e| StoreError::Pool(e.to_string()))?;
        let rows: Vec<GuestRow> = guests::table
            .select(GuestRow::as_select())
            .order((guests::created_at.asc(), guests::id.asc()))
            .load(&mut conn)
            .await?;

        rows.into_iter().map(Guest::try_from).collect()
    }

    async fn create(&self, guest: NewGuest) -> Result<Guest, StoreError> {
        let code = guest.invitation_code.clone();
        // TIMESTAMP columns keep whole seconds
        let stamp = Utc::now().naive_utc();
        let created_at = stamp.with_nanosecond(0).unwrap_or(stamp);
        let created = guest.into_guest(GuestId::generate(), created_at);

        let mut conn = self.pool.get().await.map_err(|e| StoreError::Pool(e.to_string()))?;
        let inserted = diesel::insert_into(guests::table)
            .values(GuestRow::from(created.clone()))
            .execute(&mut conn)
            .await;

        match inserted {
            Ok(_) => Ok(created),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(StoreError::DuplicateCode(code))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, id: &GuestId, patch: GuestPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.get().await.map_err(|e| StoreError::Pool(e.to_string()))?;
        let changed = diesel::update(guests::table.find(id.as_str()))
            .set(GuestChanges::from(patch))
            .execute(&mut conn)
            .await?;
        drop(conn);

        // MySQL counts changed rows, so an identical write reports zero
        if changed == 0 && !self.exists(id).await? {
            return Err(StoreError::MissingGuest(id.clone()));
        }
        Ok(())
    }

    async fn delete(&self, id: &GuestId) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(|e| StoreError::Pool(e.to_string()))?;
        let deleted = diesel::delete(guests::table.find(id.as_str()))
            .execute(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(StoreError::MissingGuest(id.clone()));
        }
        Ok(())
    }

    async fn find_by_code(&self, code: &InvitationCode) -> Result<Option<Guest>, StoreError> {
        let mut conn = self.pool.get().await.map_err(|e| StoreError::Pool(e.to_string()))?;
        let row: Option<GuestRow> = guests::table
            .filter(guests::invitation_code.eq(code.as_str()))
            .select(GuestRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        row.map(Guest::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessLevel, RsvpStatus};

    fn row() -> GuestRow {
        GuestRow {
            id: "g1".into(),
            name: "Alice".into(),
            email: "a@x.com".into(),
            phone: None,
            access_level: "ceremony+reception".into(),
            additional_guests: 1,
            special_requirements: String::new(),
            invitation_code: "abc123".into(),
            rsvp_status: "confirmed".into(),
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn rows_decode_into_typed_guests() {
        let guest = Guest::try_from(row()).unwrap();
        assert_eq!(guest.access_level, AccessLevel::CeremonyAndReception);
        assert_eq!(guest.rsvp_status, RsvpStatus::Confirmed);
        assert_eq!(guest.invitation_code.as_str(), "abc123");
    }

    #[test]
    fn unknown_enum_values_fail_decoding() {
        let mut bad = row();
        bad.rsvp_status = "maybe".into();
        assert!(matches!(Guest::try_from(bad), Err(StoreError::Decode { .. })));

        let mut bad = row();
        bad.additional_guests = -1;
        assert!(matches!(Guest::try_from(bad), Err(StoreError::Decode { .. })));
    }

    #[test]
    fn patches_only_set_present_columns() {
        let changes = GuestChanges::from(GuestPatch {
            rsvp_status: Some(RsvpStatus::Declined),
            additional_guests: Some(0),
            ..GuestPatch::default()
        });
        assert_eq!(changes.rsvp_status.as_deref(), Some("declined"));
        assert_eq!(changes.additional_guests, Some(0));
        assert!(changes.name.is_none());
        assert!(changes.phone.is_none());
    }
}
