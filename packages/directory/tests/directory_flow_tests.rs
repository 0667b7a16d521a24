//! End-to-end registration, login, and access-code refresh flows.
//!
//! Exercises the public surface the way a caller would:
//! - Email registration then login, round-tripping the user-info snapshot
//! - Phone registration with delivered codes, refresh, and re-login
//! - Duplicate and failure paths across both registration methods

use std::sync::Arc;

use directory_core::{Directory, DirectoryError, RecordingNotifier};

fn test_directory() -> (Directory, RecordingNotifier) {
    let notifier = RecordingNotifier::new();
    let directory = Directory::new(Arc::new(notifier.clone()));
    (directory, notifier)
}

// ============================================================================
// Email flow
// ============================================================================

#[test]
fn email_registration_and_login_round_trip() {
    let (directory, _) = test_directory();

    let account = directory
        .register_by_email("John Doe", "John_Doe@unknown.com", "testPass")
        .unwrap();

    let expected = "firstName: John\n\
                    lastName: Doe\n\
                    login: john_doe@unknown.com\n\
                    fullName: John Doe\n\
                    initials: J D\n\
                    email: John_Doe@unknown.com\n\
                    phone: null\n\
                    meta: {auth=password}";
    assert_eq!(account.user_info(), expected);

    let info = directory
        .login("john_doe@unknown.com", "testPass")
        .expect("correct password must log in");
    assert_eq!(info, expected, "login must return the registration snapshot");

    assert_eq!(directory.login("john_doe@unknown.com", "wrong"), None);
}

#[test]
fn email_registration_never_delivers_codes() {
    let (directory, notifier) = test_directory();
    directory
        .register_by_email("John Doe", "John_Doe@unknown.com", "testPass")
        .unwrap();

    assert_eq!(notifier.delivery_count(), 0);
}

#[test]
fn duplicate_email_keeps_the_first_registration() {
    let (directory, _) = test_directory();
    directory
        .register_by_email("John Doe", "John_Doe@unknown.com", "testPass")
        .unwrap();

    let result = directory.register_by_email("John Doe", "John_Doe@unknown.com", "testPass");
    assert_eq!(result.unwrap_err(), DirectoryError::DuplicateUser);

    assert!(
        directory.login("john_doe@unknown.com", "testPass").is_some(),
        "first account must survive a duplicate attempt"
    );
}

// ============================================================================
// Phone flow
// ============================================================================

#[test]
fn phone_registration_delivers_a_working_code() {
    let (directory, notifier) = test_directory();

    let account = directory
        .register_by_phone("John Doe", "+7 (917) 971 11-11")
        .unwrap();

    let expected = "firstName: John\n\
                    lastName: Doe\n\
                    login: +79179711111\n\
                    fullName: John Doe\n\
                    initials: J D\n\
                    email: null\n\
                    phone: +79179711111\n\
                    meta: {auth=sms}";
    assert_eq!(account.user_info(), expected);

    let code = notifier
        .last_code_for("+79179711111")
        .expect("registration must deliver the initial code");
    assert_eq!(code.len(), 6);
    assert_eq!(code.as_str(), account.access_code().unwrap());

    let info = directory
        .login("+7 (917) 971-11-11", &code)
        .expect("delivered code must log in regardless of phone formatting");
    assert_eq!(info, expected);
}

#[test]
fn refreshed_code_replaces_the_old_one() {
    let (directory, notifier) = test_directory();
    directory
        .register_by_phone("John Doe", "+7 (917) 971-11-11")
        .unwrap();
    let old_code = notifier.last_code_for("+79179711111").unwrap();

    let new_code = directory
        .request_access_code("+7 (917) 971-11-11")
        .expect("registered phone must get a fresh code");

    assert_ne!(new_code, old_code);
    assert_eq!(new_code.len(), 6);
    assert_eq!(
        notifier.last_code_for("+79179711111").as_deref(),
        Some(new_code.as_str())
    );

    assert!(directory.login("+79179711111", &new_code).is_some());
    assert_eq!(
        directory.login("+79179711111", &old_code),
        None,
        "a refreshed code must invalidate its predecessor"
    );
}

#[test]
fn refresh_does_not_change_the_user_info_snapshot() {
    let (directory, _) = test_directory();
    let account = directory
        .register_by_phone("John Doe", "+79179711111")
        .unwrap();
    let snapshot = account.user_info().to_string();

    let code = directory.request_access_code("+79179711111").unwrap();
    let info = directory.login("+79179711111", &code).unwrap();

    assert_eq!(info, snapshot);
}

#[test]
fn invalid_phone_fails_both_registration_and_refresh() {
    let (directory, notifier) = test_directory();

    let result = directory.register_by_phone("John Doe", "+7 (XXX) XX XX-XX");
    assert_eq!(result.unwrap_err(), DirectoryError::InvalidPhone);

    assert_eq!(directory.request_access_code("+7 (XXX) XX XX-XX"), None);
    assert_eq!(notifier.delivery_count(), 0);
}

// ============================================================================
// Isolation
// ============================================================================

#[test]
fn directories_are_isolated_instances() {
    let (first, _) = test_directory();
    let (second, _) = test_directory();

    first
        .register_by_email("John Doe", "John_Doe@unknown.com", "testPass")
        .unwrap();

    assert!(second.is_empty());
    assert_eq!(second.login("john_doe@unknown.com", "testPass"), None);
}

#[test]
fn reset_isolates_consecutive_scenarios() {
    let (directory, _) = test_directory();
    directory
        .register_by_email("John Doe", "John_Doe@unknown.com", "testPass")
        .unwrap();

    directory.reset();

    directory
        .register_by_email("John Doe", "John_Doe@unknown.com", "testPass")
        .expect("the login must be free again after reset");
}
