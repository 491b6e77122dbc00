// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! One-shot header interception
//!
//! A watch patches the prototype's `setRequestHeader` so that the first
//! assignment of one named header is reported, then puts the setter it
//! replaced back. Assignments are always forwarded before anything else
//! happens, so the header reaches the request even if the observer misbehaves.
//!
//! Only one watch should own the slot at a time. A second watch installed
//! while the first is still waiting wraps the first one; whichever triggers
//! restores exactly what it captured, which can drop the other watch.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::xhr::{HeaderSetter, XhrPrototype, XmlHttpRequest};
use crate::error::{Error, Result};
use crate::slot::Generation;

/// Callback receiving the intercepted header value
pub type HeaderObserver = Arc<dyn Fn(&str) + Send + Sync>;

/// Lifecycle of a watch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Waiting for the first matching assignment
    Watching,
    /// Matched once; the replacement now only forwards
    Triggered,
    /// Removed explicitly before it matched
    Uninstalled,
}

/// Setter displaced by a watch, with the generation it held in the slot
#[derive(Clone)]
struct Captured {
    setter: HeaderSetter,
    generation: Generation,
}

struct WatchShared {
    target_header: String,
    state: Mutex<WatchState>,
}

impl WatchShared {
    /// Move to `next` if still watching; returns whether the move happened
    fn leave_watching(&self, next: WatchState) -> bool {
        let mut state = self.state.lock();
        if *state != WatchState::Watching {
            return false;
        }
        *state = next;
        true
    }
}

/// Handle to an installed header watch
pub struct HeaderWatch {
    prototype: Weak<XhrPrototype>,
    shared: Arc<WatchShared>,
    original: Captured,
    generation: Generation,
}

impl HeaderWatch {
    /// Header name being watched (case-sensitive)
    pub fn target_header(&self) -> &str {
        &self.shared.target_header
    }

    /// Current state
    pub fn state(&self) -> WatchState {
        *self.shared.state.lock()
    }

    /// Generation of the replacement in the prototype slot
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether the replacement is still the prototype's current setter
    pub fn is_installed(&self) -> bool {
        self.prototype
            .upgrade()
            .map_or(false, |p| p.set_request_header_slot().generation() == self.generation)
    }

    /// Remove the watch before it triggers.
    ///
    /// Restores the captured setter only if nothing was installed on top of
    /// this watch. Otherwise the watch is made inert, the slot is left alone
    /// and [`Error::WatchSuperseded`] is returned. Uninstalling a watch that
    /// already triggered does nothing.
    pub fn uninstall(&self) -> Result<()> {
        if !self.shared.leave_watching(WatchState::Uninstalled) {
            return Ok(());
        }

        let restored = self.prototype.upgrade().map_or(false, |p| {
            p.set_request_header_slot().restore_if_current(
                self.generation,
                self.original.generation,
                self.original.setter.clone(),
            )
        });

        if restored {
            tracing::debug!(header = %self.shared.target_header, "Header watch uninstalled");
            Ok(())
        } else {
            tracing::warn!(
                header = %self.shared.target_header,
                "Header watch superseded, slot left untouched"
            );
            Err(Error::WatchSuperseded {
                header: self.shared.target_header.clone(),
            })
        }
    }
}

impl fmt::Debug for HeaderWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderWatch")
            .field("target_header", &self.shared.target_header)
            .field("state", &self.state())
            .field("generation", &self.generation)
            .finish()
    }
}

/// Watch `prototype` for the first assignment of `target_header`.
///
/// The setter currently in the slot becomes the watch's original. When a
/// request assigns `target_header` (exact, case-sensitive match), the value
/// is forwarded, handed to `observer`, and the original is put back.
pub fn install_header_watch<F>(
    prototype: &Arc<XhrPrototype>,
    target_header: impl Into<String>,
    observer: F,
) -> HeaderWatch
where
    F: Fn(&str) + Send + Sync + 'static,
{
    let observer: HeaderObserver = Arc::new(observer);
    let shared = Arc::new(WatchShared {
        target_header: target_header.into(),
        state: Mutex::new(WatchState::Watching),
    });

    let slot = prototype.set_request_header_slot();
    let (generation, original) = slot.wrap(|setter, generation| {
        let original = Captured { setter, generation };
        let replacement = replacement(
            Arc::downgrade(prototype),
            shared.clone(),
            original.clone(),
            observer,
        );
        (replacement, original)
    });

    tracing::debug!(header = %shared.target_header, generation, "Header watch installed");

    HeaderWatch {
        prototype: Arc::downgrade(prototype),
        shared,
        original,
        generation,
    }
}

fn replacement(
    prototype: Weak<XhrPrototype>,
    shared: Arc<WatchShared>,
    original: Captured,
    observer: HeaderObserver,
) -> HeaderSetter {
    Arc::new(move |request: &XmlHttpRequest, name: &str, value: &str| -> Result<()> {
        (original.setter)(request, name, value)?;

        if name != shared.target_header || !shared.leave_watching(WatchState::Triggered) {
            return Ok(());
        }

        observer(value);

        if let Some(prototype) = prototype.upgrade() {
            prototype
                .set_request_header_slot()
                .restore(original.generation, original.setter.clone());
        }
        tracing::debug!(header = %name, "Header watch triggered, setter restored");
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type Seen = Arc<Mutex<Vec<String>>>;

    fn capture() -> (Seen, impl Fn(&str) + Send + Sync + 'static) {
        let captured: Seen = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        (captured, move |value: &str| sink.lock().push(value.to_string()))
    }

    fn opened(prototype: &Arc<XhrPrototype>) -> XmlHttpRequest {
        let request = XmlHttpRequest::with_prototype(prototype.clone());
        request.open("GET", "https://api.example.com/data").unwrap();
        request
    }

    #[test]
    fn test_first_match_triggers_once() {
        let prototype = Arc::new(XhrPrototype::new());
        let before = prototype.set_request_header_slot().generation();
        let (captured, observer) = capture();
        let watch = install_header_watch(&prototype, "X-Api-Key", observer);
        assert_eq!(watch.state(), WatchState::Watching);

        let request = opened(&prototype);
        request.set_request_header("X-Api-Key", "abc123").unwrap();
        assert_eq!(*captured.lock(), vec!["abc123".to_string()]);
        assert_eq!(watch.state(), WatchState::Triggered);
        assert!(!watch.is_installed());
        // The native setter is back under its own generation
        assert_eq!(prototype.set_request_header_slot().generation(), before);

        request.set_request_header("X-Api-Key", "def456").unwrap();
        assert_eq!(captured.lock().len(), 1);
        assert_eq!(
            request.request_header("x-api-key").as_deref(),
            Some("abc123, def456")
        );
    }

    #[test]
    fn test_non_matching_headers_forwarded() {
        let prototype = Arc::new(XhrPrototype::new());
        let (captured, observer) = capture();
        let watch = install_header_watch(&prototype, "Authorization", observer);

        let request = opened(&prototype);
        request.set_request_header("Accept", "application/json").unwrap();
        // Case-sensitive match: a lowercase name is not the watched header
        request.set_request_header("authorization", "Bearer lower").unwrap();

        assert!(captured.lock().is_empty());
        assert_eq!(watch.state(), WatchState::Watching);
        assert!(watch.is_installed());
        assert_eq!(
            request.request_header("accept").as_deref(),
            Some("application/json")
        );

        request.set_request_header("Authorization", "Bearer token").unwrap();
        assert_eq!(*captured.lock(), vec!["Bearer token".to_string()]);
    }

    #[test]
    fn test_forward_failure_keeps_watching() {
        let prototype = Arc::new(XhrPrototype::new());
        let (captured, observer) = capture();
        let watch = install_header_watch(&prototype, "Authorization", observer);

        // Not opened: the native setter rejects the assignment
        let request = XmlHttpRequest::with_prototype(prototype.clone());
        assert!(request.set_request_header("Authorization", "Bearer t").is_err());

        assert!(captured.lock().is_empty());
        assert_eq!(watch.state(), WatchState::Watching);
    }

    #[test]
    fn test_watch_spans_requests() {
        let prototype = Arc::new(XhrPrototype::new());
        let first = opened(&prototype);
        let (captured, observer) = capture();
        install_header_watch(&prototype, "Authorization", observer);
        let second = opened(&prototype);

        second.set_request_header("Authorization", "Bearer second").unwrap();
        first.set_request_header("Authorization", "Bearer first").unwrap();

        assert_eq!(*captured.lock(), vec!["Bearer second".to_string()]);
        assert_eq!(
            first.request_header("authorization").as_deref(),
            Some("Bearer first")
        );
    }

    #[test]
    fn test_uninstall_restores_original() {
        let prototype = Arc::new(XhrPrototype::new());
        let (captured, observer) = capture();
        let watch = install_header_watch(&prototype, "Authorization", observer);

        watch.uninstall().unwrap();
        assert_eq!(watch.state(), WatchState::Uninstalled);
        assert!(!watch.is_installed());

        let request = opened(&prototype);
        request.set_request_header("Authorization", "Bearer t").unwrap();
        assert!(captured.lock().is_empty());
        assert_eq!(
            request.request_header("authorization").as_deref(),
            Some("Bearer t")
        );
    }

    #[test]
    fn test_uninstall_after_trigger_is_noop() {
        let prototype = Arc::new(XhrPrototype::new());
        let (_captured, observer) = capture();
        let watch = install_header_watch(&prototype, "X-Api-Key", observer);
        opened(&prototype).set_request_header("X-Api-Key", "k").unwrap();

        let generation = prototype.set_request_header_slot().generation();
        watch.uninstall().unwrap();
        assert_eq!(watch.state(), WatchState::Triggered);
        assert_eq!(prototype.set_request_header_slot().generation(), generation);
    }

    #[test]
    fn test_superseded_uninstall_fails_and_newer_watch_survives() {
        let prototype = Arc::new(XhrPrototype::new());
        let (first_seen, first) = capture();
        let (second_seen, second) = capture();
        let older = install_header_watch(&prototype, "X-Old", first);
        let newer = install_header_watch(&prototype, "X-New", second);

        let err = older.uninstall().unwrap_err();
        assert!(matches!(err, Error::WatchSuperseded { .. }));
        assert_eq!(older.state(), WatchState::Uninstalled);
        assert!(newer.is_installed());

        let request = opened(&prototype);
        request.set_request_header("X-Old", "1").unwrap();
        request.set_request_header("X-New", "2").unwrap();

        assert!(first_seen.lock().is_empty());
        assert_eq!(*second_seen.lock(), vec!["2".to_string()]);
    }

    #[test]
    fn test_stacked_watches_on_same_header_both_fire() {
        let prototype = Arc::new(XhrPrototype::new());
        let (inner_seen, inner) = capture();
        let (outer_seen, outer) = capture();
        let inner_watch = install_header_watch(&prototype, "Authorization", inner);
        let outer_watch = install_header_watch(&prototype, "Authorization", outer);

        let request = opened(&prototype);
        request.set_request_header("Authorization", "v1").unwrap();
        request.set_request_header("Authorization", "v2").unwrap();

        assert_eq!(*inner_seen.lock(), vec!["v1".to_string()]);
        assert_eq!(*outer_seen.lock(), vec!["v1".to_string()]);
        assert_eq!(inner_watch.state(), WatchState::Triggered);
        assert_eq!(outer_watch.state(), WatchState::Triggered);
        assert_eq!(
            request.request_header("authorization").as_deref(),
            Some("v1, v2")
        );
    }

    #[test]
    fn test_inner_trigger_drops_outer_watch() {
        // Known hazard: the inner watch restores the native setter and with
        // it removes the outer watch from the slot.
        let prototype = Arc::new(XhrPrototype::new());
        let (inner_seen, inner) = capture();
        let (outer_seen, outer) = capture();
        install_header_watch(&prototype, "Authorization", inner);
        let outer_watch = install_header_watch(&prototype, "X-Csrf", outer);

        let request = opened(&prototype);
        request.set_request_header("Authorization", "Bearer t").unwrap();
        request.set_request_header("X-Csrf", "token").unwrap();

        assert_eq!(*inner_seen.lock(), vec!["Bearer t".to_string()]);
        assert!(outer_seen.lock().is_empty());
        assert_eq!(outer_watch.state(), WatchState::Watching);
        assert!(!outer_watch.is_installed());
    }

    #[test]
    fn test_watch_put_back_by_newer_trigger_is_installed_again() {
        let prototype = Arc::new(XhrPrototype::new());
        let (a_seen, a) = capture();
        let (b_seen, b) = capture();
        let older = install_header_watch(&prototype, "X-A", a);
        let newer = install_header_watch(&prototype, "X-B", b);
        assert!(!older.is_installed());

        let request = opened(&prototype);
        request.set_request_header("X-B", "1").unwrap();
        assert_eq!(*b_seen.lock(), vec!["1".to_string()]);
        assert!(!newer.is_installed());

        // The newer watch restored the older one, which owns the slot again
        assert!(older.is_installed());
        assert_eq!(prototype.set_request_header_slot().generation(), older.generation());

        older.uninstall().unwrap();
        assert_eq!(older.state(), WatchState::Uninstalled);
        assert_eq!(prototype.set_request_header_slot().generation(), 0);

        request.set_request_header("X-A", "2").unwrap();
        assert!(a_seen.lock().is_empty());
        assert_eq!(request.request_header("x-a").as_deref(), Some("2"));
    }
}
