//! Request/response event hooks.
//!
//! The executor publishes a [`RequestEvent`] before the first attempt of
//! every logical call and a [`ResponseEvent`] once a terminal response has
//! been received. Subscriptions are typed: the payload type chosen at the
//! call to [`EventHooks::on`] determines which events the callback sees.
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use telephony_api::clients::{EventHooks, EventKind, RequestEvent, ResponseEvent};
//!
//! let hooks = EventHooks::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&seen);
//! let id = hooks.on::<RequestEvent>(move |event| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     println!("{} {}", event.method, event.path);
//! });
//! hooks.on::<ResponseEvent>(|event| println!("{} in {}ms", event.status, event.elapsed_ms()));
//!
//! assert_eq!(hooks.listener_count(EventKind::Request), 1);
//! assert!(hooks.off(id));
//! assert_eq!(hooks.listener_count(EventKind::Request), 0);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clients::http_request::HttpMethod;

/// Discriminant of the events the executor publishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Published before the first network attempt.
    Request,
    /// Published after a terminal response.
    Response,
}

/// Snapshot of a call about to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestEvent {
    /// HTTP method of the call.
    pub method: HttpMethod,
    /// Request path as supplied by the caller.
    pub path: String,
    /// Sub-account the call acts on, if any.
    pub account_id: Option<String>,
    /// Idempotency key sent with the call, if any.
    pub idempotency_key: Option<String>,
    /// When the call started.
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of a call's terminal response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseEvent {
    /// HTTP method of the call.
    pub method: HttpMethod,
    /// Request path as supplied by the caller.
    pub path: String,
    /// Sub-account the call acted on, if any.
    pub account_id: Option<String>,
    /// Idempotency key sent with the call, if any.
    pub idempotency_key: Option<String>,
    /// When the call started.
    pub timestamp: DateTime<Utc>,
    /// HTTP status of the terminal response.
    pub status: u16,
    /// Request id from the `X-Request-Id` header.
    pub request_id: Option<String>,
    /// Wall-clock time from the request event to the terminal response,
    /// including retries and backoff sleeps.
    pub elapsed: Duration,
}

impl ResponseEvent {
    /// Returns the elapsed time in whole milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Any event published by the executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A call is about to be sent.
    Request(RequestEvent),
    /// A call received its terminal response.
    Response(ResponseEvent),
}

impl Event {
    /// Returns the kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Request(_) => EventKind::Request,
            Self::Response(_) => EventKind::Response,
        }
    }
}

/// Ties an event payload type to its [`EventKind`].
///
/// Implemented for [`RequestEvent`] and [`ResponseEvent`], so a subscription
/// can only receive the payload it was registered for.
pub trait HookEvent: Sized + 'static {
    /// The kind of event carrying this payload.
    const KIND: EventKind;

    /// Extracts this payload from an event, if the kinds match.
    fn from_event(event: &Event) -> Option<&Self>;
}

impl HookEvent for RequestEvent {
    const KIND: EventKind = EventKind::Request;

    fn from_event(event: &Event) -> Option<&Self> {
        match event {
            Event::Request(e) => Some(e),
            Event::Response(_) => None,
        }
    }
}

impl HookEvent for ResponseEvent {
    const KIND: EventKind = EventKind::Response;

    fn from_event(event: &Event) -> Option<&Self> {
        match event {
            Event::Response(e) => Some(e),
            Event::Request(_) => None,
        }
    }
}

/// Handle returned by [`EventHooks::on`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    kind: EventKind,
    id: u64,
}

impl SubscriptionId {
    /// Returns the kind of event this subscription listens to.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }
}

type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Per-client subscriber registry.
///
/// Mutated only by [`on`](Self::on) and [`off`](Self::off). Emission
/// iterates a snapshot taken under the read lock, so callbacks may
/// subscribe or unsubscribe while an event is being delivered.
pub struct EventHooks {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<EventKind, Vec<(u64, Callback)>>>,
}

impl EventHooks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribes `callback` to events carrying payload `E`.
    pub fn on<E: HookEvent>(
        &self,
        callback: impl Fn(&E) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let wrapped: Callback = Arc::new(move |event: &Event| {
            if let Some(payload) = E::from_event(event) {
                callback(payload);
            }
        });

        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(E::KIND)
            .or_default()
            .push((id, wrapped));

        SubscriptionId { kind: E::KIND, id }
    }

    /// Removes a subscription. Returns `false` if it was already removed.
    pub fn off(&self, subscription: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(list) = subscribers.get_mut(&subscription.kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != subscription.id);
        before != list.len()
    }

    /// Returns the number of subscribers for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Delivers `event` to every subscriber of its kind.
    ///
    /// A panicking subscriber is logged and skipped; it never unwinds into
    /// the caller.
    pub(crate) fn emit(&self, event: &Event) {
        let snapshot: Vec<Callback> = {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            match subscribers.get(&event.kind()) {
                Some(list) => list.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
                None => return,
            }
        };

        for callback in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                tracing::warn!(kind = ?event.kind(), "event subscriber panicked; continuing");
            }
        }
    }
}

impl Default for EventHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHooks")
            .field("request_listeners", &self.listener_count(EventKind::Request))
            .field("response_listeners", &self.listener_count(EventKind::Response))
            .finish()
    }
}

// Verify EventHooks is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EventHooks>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    fn request_event() -> Event {
        Event::Request(RequestEvent {
            method: HttpMethod::Get,
            path: "/v1/users".to_string(),
            account_id: None,
            idempotency_key: None,
            timestamp: Utc::now(),
        })
    }

    fn response_event() -> Event {
        Event::Response(ResponseEvent {
            method: HttpMethod::Get,
            path: "/v1/users".to_string(),
            account_id: Some("acct_1".to_string()),
            idempotency_key: None,
            timestamp: Utc::now(),
            status: 200,
            request_id: Some("req_1".to_string()),
            elapsed: Duration::from_millis(42),
        })
    }

    #[test]
    fn test_subscriber_only_receives_its_kind() {
        let hooks = EventHooks::new();
        let requests = Arc::new(AtomicUsize::new(0));
        let responses = Arc::new(AtomicUsize::new(0));

        let r = Arc::clone(&requests);
        hooks.on::<RequestEvent>(move |_| {
            r.fetch_add(1, Ordering::SeqCst);
        });
        let s = Arc::clone(&responses);
        hooks.on::<ResponseEvent>(move |event| {
            assert_eq!(event.elapsed_ms(), 42);
            s.fetch_add(1, Ordering::SeqCst);
        });

        hooks.emit(&request_event());
        hooks.emit(&response_event());
        hooks.emit(&response_event());

        assert_eq!(requests.load(Ordering::SeqCst), 1);
        assert_eq!(responses.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_off_removes_subscription_once() {
        let hooks = EventHooks::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let id = hooks.on::<RequestEvent>(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(id.kind(), EventKind::Request);
        assert!(hooks.off(id));
        assert!(!hooks.off(id));

        hooks.emit(&request_event());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panicking_subscriber_does_not_stop_others() {
        let hooks = EventHooks::new();
        let calls = Arc::new(AtomicUsize::new(0));

        hooks.on::<RequestEvent>(|_| panic!("subscriber bug"));
        let c = Arc::clone(&calls);
        hooks.on::<RequestEvent>(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        hooks.emit(&request_event());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscriber_may_unsubscribe_during_emit() {
        let hooks = Arc::new(EventHooks::new());
        let own_id: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));

        let hooks_inner = Arc::clone(&hooks);
        let id_inner = Arc::clone(&own_id);
        let c = Arc::clone(&calls);
        let id = hooks.on::<RequestEvent>(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = id_inner.lock().unwrap().take() {
                hooks_inner.off(id);
            }
        });
        *own_id.lock().unwrap() = Some(id);

        hooks.emit(&request_event());
        hooks.emit(&request_event());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(hooks.listener_count(EventKind::Request), 0);
    }

    #[test]
    fn test_debug_reports_listener_counts() {
        let hooks = EventHooks::new();
        hooks.on::<ResponseEvent>(|_| {});
        let debug = format!("{hooks:?}");
        assert!(debug.contains("response_listeners: 1"));
    }
}
