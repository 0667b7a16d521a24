//! Account entity
//!
//! One registered identity with a single authentication method. The factory
//! fully populates an account before it exists: login, salt, and password
//! hash are never in an intermediate state, and construction fails outright
//! on a blank first name, an invalid phone, or a missing credential.
//!
//! Responsibilities:
//! - Name splitting and derived display fields (full name, initials)
//! - Credential hashing (salted SHA-256, per-account salt reused for life)
//! - One-time access-code issuance for sms accounts
//! - The frozen `user_info` snapshot rendered once at construction

pub(crate) mod crypto;
pub mod phone;

use tracing::warn;

use crate::error::DirectoryError;
use crate::notify::Notifier;

/// How an account authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Email login with a caller-chosen password.
    Password,
    /// Phone login with a delivered one-time access code.
    Sms,
}

impl AuthMethod {
    fn marker(self) -> &'static str {
        match self {
            AuthMethod::Password => "password",
            AuthMethod::Sms => "sms",
        }
    }
}

/// One registered identity.
///
/// Identity fields are fixed for the account's lifetime; only the credential
/// material (`password_hash`, `access_code`) changes after construction.
#[derive(Debug, Clone)]
pub struct Account {
    first_name: String,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    login: String,
    auth_method: AuthMethod,
    password_hash: String,
    salt: String,
    access_code: Option<String>,
    user_info: String,
}

impl Account {
    /// Build an account from registration input.
    ///
    /// Dispatch order matches the registration paths: a non-blank phone
    /// produces an sms account (issuing the initial access code through
    /// `notifier`); otherwise a usable email+password pair produces a
    /// password account; anything else is `MissingCredential`.
    pub fn create(
        full_name: &str,
        email: Option<&str>,
        password: Option<&str>,
        phone: Option<&str>,
        notifier: &dyn Notifier,
    ) -> Result<Self, DirectoryError> {
        let (first_name, last_name) = split_full_name(full_name)?;

        match (email, password, phone) {
            (_, _, Some(raw_phone)) if !raw_phone.trim().is_empty() => {
                Self::from_phone(first_name, last_name, raw_phone, notifier)
            }
            (Some(email), Some(password), _)
                if !email.trim().is_empty() && !password.trim().is_empty() =>
            {
                Ok(Self::from_email(first_name, last_name, email, password))
            }
            _ => Err(DirectoryError::MissingCredential),
        }
    }

    fn from_email(
        first_name: String,
        last_name: Option<String>,
        email: &str,
        password: &str,
    ) -> Self {
        let email = email.trim().to_string();
        let login = email.to_lowercase();
        let salt = crypto::generate_salt();
        let password_hash = crypto::hash_credential(&salt, password);
        let user_info = render_user_info(
            &first_name,
            last_name.as_deref(),
            &login,
            Some(&email),
            None,
            AuthMethod::Password,
        );

        Self {
            first_name,
            last_name,
            email: Some(email),
            phone: None,
            login,
            auth_method: AuthMethod::Password,
            password_hash,
            salt,
            access_code: None,
            user_info,
        }
    }

    fn from_phone(
        first_name: String,
        last_name: Option<String>,
        raw_phone: &str,
        notifier: &dyn Notifier,
    ) -> Result<Self, DirectoryError> {
        let normalized = phone::normalize(raw_phone);
        if !phone::is_valid(&normalized) {
            return Err(DirectoryError::InvalidPhone);
        }

        let salt = crypto::generate_salt();
        let code = crypto::generate_access_code();
        let password_hash = crypto::hash_credential(&salt, &code);
        deliver(notifier, &normalized, &code);

        let user_info = render_user_info(
            &first_name,
            last_name.as_deref(),
            &normalized,
            None,
            Some(&normalized),
            AuthMethod::Sms,
        );

        Ok(Self {
            first_name,
            last_name,
            email: None,
            phone: Some(normalized.clone()),
            login: normalized,
            auth_method: AuthMethod::Sms,
            password_hash,
            salt,
            access_code: Some(code),
            user_info,
        })
    }

    /// Issue a fresh access code, replacing the previous one.
    ///
    /// The new code is hashed with the account's existing salt, stored as
    /// the current credential, and handed to `notifier` best-effort. Only
    /// sms accounts carry a phone to deliver to; password accounts fail
    /// with `UnsupportedAuthMethod`.
    pub fn request_access_code(
        &mut self,
        notifier: &dyn Notifier,
    ) -> Result<String, DirectoryError> {
        let Some(destination) = self.phone.clone() else {
            return Err(DirectoryError::UnsupportedAuthMethod);
        };

        let code = crypto::generate_access_code();
        self.password_hash = crypto::hash_credential(&self.salt, &code);
        self.access_code = Some(code.clone());
        deliver(notifier, &destination, &code);

        Ok(code)
    }

    /// Check a candidate credential against the stored hash.
    pub fn check_password(&self, candidate: &str) -> bool {
        crypto::hash_credential(&self.salt, candidate) == self.password_hash
    }

    /// Replace the current credential, keeping the per-account salt.
    ///
    /// On sms accounts the plaintext `access_code` is rewritten too, so the
    /// displayed code stays consistent with the credential that logs in.
    pub fn change_password(&mut self, old: &str, new: &str) -> Result<(), DirectoryError> {
        if !self.check_password(old) {
            return Err(DirectoryError::InvalidCredential);
        }

        self.password_hash = crypto::hash_credential(&self.salt, new);
        if self.access_code.as_deref().is_some_and(|code| !code.is_empty()) {
            self.access_code = Some(new.to_string());
        }

        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    /// Latest issued access code (sms accounts only).
    pub fn access_code(&self) -> Option<&str> {
        self.access_code.as_deref()
    }

    /// The summary snapshot rendered at construction time.
    ///
    /// Frozen: later credential changes do not alter it.
    pub fn user_info(&self) -> &str {
        &self.user_info
    }

    pub fn full_name(&self) -> String {
        display_full_name(&self.first_name, self.last_name.as_deref())
    }

    pub fn initials(&self) -> String {
        display_initials(&self.first_name, self.last_name.as_deref())
    }
}

/// Best-effort delivery; a failed send never fails the issuing operation.
fn deliver(notifier: &dyn Notifier, destination: &str, code: &str) {
    if let Err(error) = notifier.send(destination, code) {
        warn!(destination, %error, "access code delivery failed");
    }
}

fn split_full_name(full_name: &str) -> Result<(String, Option<String>), DirectoryError> {
    let parts: Vec<&str> = full_name.split_whitespace().collect();
    match parts.as_slice() {
        [first] => Ok(((*first).to_string(), None)),
        [first, last] => Ok(((*first).to_string(), Some((*last).to_string()))),
        _ => Err(DirectoryError::InvalidName),
    }
}

/// First and last name joined with a space, first character uppercased.
fn display_full_name(first: &str, last: Option<&str>) -> String {
    let joined = match last {
        Some(last) => format!("{first} {last}"),
        None => first.to_string(),
    };
    let mut chars = joined.chars();
    match chars.next() {
        Some(head) => head.to_uppercase().chain(chars).collect(),
        None => joined,
    }
}

/// Uppercase first letter of each name part, joined with a space.
fn display_initials(first: &str, last: Option<&str>) -> String {
    std::iter::once(first)
        .chain(last)
        .filter_map(|part| part.chars().next())
        .map(|initial| initial.to_uppercase().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_user_info(
    first_name: &str,
    last_name: Option<&str>,
    login: &str,
    email: Option<&str>,
    phone: Option<&str>,
    auth_method: AuthMethod,
) -> String {
    format!(
        "firstName: {first_name}\n\
         lastName: {last_name}\n\
         login: {login}\n\
         fullName: {full_name}\n\
         initials: {initials}\n\
         email: {email}\n\
         phone: {phone}\n\
         meta: {{auth={marker}}}",
        last_name = last_name.unwrap_or("null"),
        full_name = display_full_name(first_name, last_name),
        initials = display_initials(first_name, last_name),
        email = email.unwrap_or("null"),
        phone = phone.unwrap_or("null"),
        marker = auth_method.marker(),
    )
}
