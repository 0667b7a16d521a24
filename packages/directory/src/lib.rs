// Common Room - Member Directory Core
//
// In-memory user directory with two registration paths (email+password and
// phone+one-time code), credential verification, and an access-code refresh
// flow. Accounts enforce their own construction invariants; the Directory
// owns every account and mediates all lookups.
//
// Access-code delivery goes through the Notifier capability in notify.rs.
// No real SMS/email transport lives in this crate.

pub mod account;
pub mod directory;
pub mod error;
pub mod notify;

pub use account::{Account, AuthMethod};
pub use directory::Directory;
pub use error::DirectoryError;
pub use notify::{LogNotifier, Notifier, RecordingNotifier};
