use thiserror::Error;

use crate::models::{GuestId, InvitationCode};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("guest {0} does not exist")]
    MissingGuest(GuestId),

    #[error("invitation code {0} is already taken")]
    DuplicateCode(InvitationCode),

    #[error("malformed guest record {id}: {reason}")]
    Decode { id: String, reason: String },

    #[error("could not get a database connection: {0}")]
    Pool(String),

    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no active session")]
    NoSession,
}

/// Why an invitation page could not be shown.
#[derive(Error, Debug)]
pub enum InvitationError {
    #[error("Invalid invitation code")]
    MissingCode,

    #[error("Invitation not found")]
    NotFound,

    #[error("Failed to load invitation")]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("unsupported media type {0}")]
    UnsupportedMedia(String),

    #[error("photo storage failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("admin.password_sha256 is not a hex encoded sha256 digest")]
    PasswordDigest,

    #[error(transparent)]
    Figment(#[from] rocket::figment::Error),
}
