//! Access-code delivery boundary
//!
//! The directory never talks to a real SMS or email gateway; issued codes are
//! handed to a `Notifier` and delivery is best-effort. The stored code is the
//! source of truth, so a failed send never fails the operation that issued it.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::{debug, info};

/// Out-of-band delivery hook for freshly issued access codes.
pub trait Notifier: Send + Sync {
    /// Deliver `code` to `destination` (a normalized phone number).
    fn send(&self, destination: &str, code: &str) -> Result<()>;
}

/// Development notifier that writes deliveries to the log.
///
/// The code itself only appears at `debug` level, so default log
/// configurations never expose credential material.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, destination: &str, code: &str) -> Result<()> {
        info!(destination, "access code dispatched");
        debug!(destination, code, "access code contents");
        Ok(())
    }
}

/// Capturing notifier for tests.
///
/// Clones share the same delivery log, so a test can keep one handle and
/// hand another to the directory.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    deliveries: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(destination, code)` pairs seen so far, in delivery order.
    pub fn deliveries(&self) -> Vec<(String, String)> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }

    /// The most recent code delivered to `destination`, if any.
    pub fn last_code_for(&self, destination: &str) -> Option<String> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(dest, _)| dest == destination)
            .map(|(_, code)| code.clone())
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, destination: &str, code: &str) -> Result<()> {
        self.deliveries
            .lock()
            .unwrap()
            .push((destination.to_string(), code.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_captures_deliveries_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.send("+79179711111", "AAA111").unwrap();
        notifier.send("+79179712222", "BBB222").unwrap();

        assert_eq!(notifier.delivery_count(), 2);
        assert_eq!(
            notifier.deliveries(),
            vec![
                ("+79179711111".to_string(), "AAA111".to_string()),
                ("+79179712222".to_string(), "BBB222".to_string()),
            ]
        );
    }

    #[test]
    fn last_code_for_returns_the_latest_delivery() {
        let notifier = RecordingNotifier::new();
        notifier.send("+79179711111", "first1").unwrap();
        notifier.send("+79179711111", "second").unwrap();

        assert_eq!(
            notifier.last_code_for("+79179711111").as_deref(),
            Some("second")
        );
        assert_eq!(notifier.last_code_for("+70000000000"), None);
    }

    #[test]
    fn clones_share_the_same_delivery_log() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();
        notifier.send("+79179711111", "shared").unwrap();

        assert_eq!(handle.delivery_count(), 1);
    }
}
