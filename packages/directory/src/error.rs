use thiserror::Error;

/// Failures surfaced by registration and credential operations.
///
/// All variants are synchronous and immediate; nothing is retried here.
/// Login failures are deliberately not represented - `Directory::login`
/// collapses "no such user" and "wrong credential" into `None` so callers
/// cannot probe for account existence.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("full name must be a first name with an optional last name")]
    InvalidName,

    #[error("phone number must contain 11 digits with an optional leading +")]
    InvalidPhone,

    #[error("registration requires a phone number, or an email and password")]
    MissingCredential,

    #[error("an account with this login already exists")]
    DuplicateUser,

    #[error("the supplied password does not match the current password")]
    InvalidCredential,

    #[error("access codes are only issued for sms accounts")]
    UnsupportedAuthMethod,
}
