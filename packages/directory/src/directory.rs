//! In-process account registry.
//!
//! The directory owns every account, keyed by normalized login, and mediates
//! all lookups. Read-then-write operations (existence check + insert, lookup
//! + code refresh) run under a single lock scope per instance, so concurrent
//! registration and refresh cannot race each other.
//!
//! Directories are plain values injected where needed; create one per test
//! for isolation instead of sharing a global instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::account::{phone, Account};
use crate::error::DirectoryError;
use crate::notify::Notifier;

/// In-memory account registry keyed by login.
pub struct Directory {
    accounts: Mutex<HashMap<String, Account>>,
    notifier: Arc<dyn Notifier>,
}

impl Directory {
    /// Create an empty directory that delivers access codes through `notifier`.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            notifier,
        }
    }

    /// Register an email+password account.
    ///
    /// The login is the lowercased email. Registering a taken login fails
    /// with `DuplicateUser` and leaves the first registration untouched.
    pub fn register_by_email(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, DirectoryError> {
        let account = Account::create(
            full_name,
            Some(email),
            Some(password),
            None,
            self.notifier.as_ref(),
        )?;
        self.insert(account)
    }

    /// Register a phone account.
    ///
    /// Construction issues the initial access code and hands it to the
    /// notifier as a side effect.
    pub fn register_by_phone(
        &self,
        full_name: &str,
        raw_phone: &str,
    ) -> Result<Account, DirectoryError> {
        let account = Account::create(
            full_name,
            None,
            None,
            Some(raw_phone),
            self.notifier.as_ref(),
        )?;
        self.insert(account)
    }

    /// Verify a credential and return the account's user-info snapshot.
    ///
    /// Phone-shaped identifiers are matched against the stored access code;
    /// everything else is treated as an email login checked against the
    /// password hash. Unknown logins and wrong credentials both return
    /// `None` so callers cannot probe for account existence.
    pub fn login(&self, identifier: &str, credential: &str) -> Option<String> {
        let candidate = phone::normalize(identifier);
        if phone::is_valid(&candidate) {
            return self.login_by_phone(&candidate, credential);
        }
        self.login_by_email(identifier, credential)
    }

    /// Issue a fresh access code for a registered phone login.
    ///
    /// Returns `None`, with no side effects, when the identifier does not
    /// validate as a phone or is not registered.
    pub fn request_access_code(&self, raw_phone: &str) -> Option<String> {
        let normalized = phone::normalize(raw_phone);
        if !phone::is_valid(&normalized) {
            return None;
        }

        let mut accounts = self.lock();
        let account = accounts.get_mut(&normalized)?;
        info!(login = normalized.as_str(), "access code refresh requested");
        account.request_access_code(self.notifier.as_ref()).ok()
    }

    /// Replace a registered account's credential.
    ///
    /// The identifier is resolved like `login` (phone-shaped or email). An
    /// unknown identifier reports `InvalidCredential`, the same as a wrong
    /// old password, to avoid leaking account existence.
    pub fn change_password(
        &self,
        identifier: &str,
        old: &str,
        new: &str,
    ) -> Result<(), DirectoryError> {
        let login = self.resolve_login(identifier);
        let mut accounts = self.lock();
        let account = accounts
            .get_mut(&login)
            .ok_or(DirectoryError::InvalidCredential)?;
        account.change_password(old, new)?;
        info!(login = login.as_str(), "password changed");
        Ok(())
    }

    /// Drop every account. Test-isolation hook, not a production operation.
    pub fn reset(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn insert(&self, account: Account) -> Result<Account, DirectoryError> {
        let mut accounts = self.lock();
        if accounts.contains_key(account.login()) {
            warn!(login = account.login(), "registration rejected: login taken");
            return Err(DirectoryError::DuplicateUser);
        }

        info!(login = account.login(), "account registered");
        accounts.insert(account.login().to_string(), account.clone());
        Ok(account)
    }

    fn login_by_phone(&self, normalized: &str, code: &str) -> Option<String> {
        let accounts = self.lock();
        let account = accounts.get(normalized)?;
        if account.access_code() == Some(code) {
            Some(account.user_info().to_string())
        } else {
            debug!(login = normalized, "phone login rejected");
            None
        }
    }

    fn login_by_email(&self, identifier: &str, password: &str) -> Option<String> {
        let login = identifier.trim().to_lowercase();
        let accounts = self.lock();
        let account = accounts.get(&login)?;
        if account.check_password(password) {
            Some(account.user_info().to_string())
        } else {
            debug!(login = login.as_str(), "email login rejected");
            None
        }
    }

    /// Map a caller-supplied identifier to the stored login key.
    ///
    /// Registration lowercases email logins, so lookups lowercase too rather
    /// than requiring callers to pre-normalize.
    fn resolve_login(&self, identifier: &str) -> String {
        let candidate = phone::normalize(identifier);
        if phone::is_valid(&candidate) {
            candidate
        } else {
            identifier.trim().to_lowercase()
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        // No operation leaves the map half-applied, so a poisoned lock is
        // safe to recover.
        self.accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
