//! Authentication watcher
//!
//! Watches browser storage for a bearer token written by another tab or by
//! the external login overlay. When the token shows up the watcher:
//!
//! 1. hides the overlay (`Prompting` → `Idle`)
//! 2. calls the status endpoint once with `Authorization: Bearer <token>`
//! 3. schedules a full page reload after the configured delay
//!
//! Browser facilities are reached through the capability traits below so
//! the state machine runs unchanged against in-memory fakes. Everything the
//! watcher schedules is owned by it: dropping the watcher unsubscribes from
//! storage events and cancels pending reloads.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use futures::task::{LocalSpawn, LocalSpawnExt};
use tracing::{debug, info, warn};

use crate::config::{AuthWatchSettings, ReloadPolicy};

/// Errors raised by watcher capabilities
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthWatchError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Status request returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Capabilities
// ============================================================================

/// Runs a cleanup action exactly once, at the latest when dropped.
///
/// Used for storage subscriptions and scheduled timers.
#[must_use = "dropping the handle cancels what it guards"]
pub struct Disposer {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl Disposer {
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// A handle with nothing to clean up
    pub fn noop() -> Self {
        Self { cleanup: None }
    }

    pub fn dispose(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("pending", &self.cleanup.is_some())
            .finish()
    }
}

/// Handle for a storage-change subscription
pub type Subscription = Disposer;

/// Handle for a scheduled task
pub type TimerHandle = Disposer;

/// A change to browser storage, as delivered by the `storage` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    /// Changed key; `None` when the whole storage was cleared
    pub key: Option<String>,
    pub new_value: Option<String>,
}

pub type StorageListener = Rc<dyn Fn(&StorageChange)>;

/// Key-value storage with change notifications
pub trait TokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthWatchError>;

    fn set(&self, key: &str, value: &str) -> Result<(), AuthWatchError>;

    /// Deliver storage changes to `listener` until the subscription drops
    fn subscribe(&self, listener: StorageListener) -> Result<Subscription, AuthWatchError>;
}

/// Header carrying the stored token on the status request
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// `Authorization` header value for a stored token
pub fn bearer_authorization(token: &str) -> String {
    format!("Bearer {token}")
}

/// Queries the session status with a bearer token
#[async_trait(?Send)]
pub trait StatusClient {
    async fn fetch_status(&self, token: &str) -> Result<serde_json::Value, AuthWatchError>;
}

/// Runs a task once after a delay, unless the handle is dropped first
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle;
}

/// Reloads the current page
pub trait PageReloader {
    fn reload(&self);
}

/// Everything the watcher needs from its environment
#[derive(Clone)]
pub struct Capabilities {
    pub store: Rc<dyn TokenStore>,
    pub client: Rc<dyn StatusClient>,
    pub scheduler: Rc<dyn Scheduler>,
    pub reloader: Rc<dyn PageReloader>,
    pub spawner: Rc<dyn LocalSpawn>,
}

// ============================================================================
// State machine
// ============================================================================

/// Visibility of the external login overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlayState {
    /// Overlay hidden
    #[default]
    Idle,
    /// Overlay shown with the external login frame
    Prompting,
}

type OverlayCallback = Box<dyn Fn(OverlayState)>;

/// A scheduled reload; `fired` is set once its task has run
struct PendingReload {
    fired: Rc<Cell<bool>>,
    _handle: TimerHandle,
}

struct WatcherInner {
    settings: AuthWatchSettings,
    caps: Capabilities,
    overlay: Cell<OverlayState>,
    on_overlay: OverlayCallback,
    pending_reloads: RefCell<Vec<PendingReload>>,
    subscription: RefCell<Option<Subscription>>,
    disposed: Cell<bool>,
}

impl WatcherInner {
    fn set_overlay(&self, state: OverlayState) {
        if self.overlay.replace(state) != state {
            debug!(?state, "overlay state changed");
        }
        (self.on_overlay)(state);
    }

    fn handle_change(self: &Rc<Self>, change: &StorageChange) {
        if change.key.as_deref() == Some(self.settings.storage_key.as_str()) {
            self.check();
        }
    }

    /// Look for a token and, if one is stored, start the status call
    fn check(self: &Rc<Self>) {
        if self.disposed.get() {
            return;
        }

        let token = match self.caps.store.get(&self.settings.storage_key) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return,
            Err(e) => {
                warn!(error = %e, "could not read auth token");
                return;
            }
        };

        debug!(key = %self.settings.storage_key, "auth token found, checking status");

        let weak = Rc::downgrade(self);
        let client = self.caps.client.clone();
        let spawned = self.caps.spawner.spawn_local(async move {
            let result = client.fetch_status(&token).await;
            match weak.upgrade() {
                Some(inner) => inner.finish(result),
                None => debug!("watcher dropped before status response"),
            }
        });
        if let Err(e) = spawned {
            warn!(error = %e, "could not spawn status request");
        }

        self.set_overlay(OverlayState::Idle);
    }

    fn finish(&self, result: Result<serde_json::Value, AuthWatchError>) {
        if self.disposed.get() {
            return;
        }

        let reload = match result {
            Ok(body) => {
                info!(%body, "auth status response");
                true
            }
            Err(e) => {
                warn!(error = %e, "auth status request failed");
                self.settings.reload_policy == ReloadPolicy::Always
            }
        };

        if reload {
            self.schedule_reload();
        } else {
            debug!("reload skipped after failed status request");
        }
    }

    fn schedule_reload(&self) {
        let delay = self.settings.reload_delay();
        let reloader = self.caps.reloader.clone();
        let fired = Rc::new(Cell::new(false));
        let marker = fired.clone();
        let handle = self.caps.scheduler.schedule(
            delay,
            Box::new(move || {
                marker.set(true);
                reloader.reload();
            }),
        );

        // Fired timers are released here, outside their own callback
        let mut pending = self.pending_reloads.borrow_mut();
        pending.retain(|p| !p.fired.get());
        pending.push(PendingReload {
            fired,
            _handle: handle,
        });
        info!(delay_ms = delay.as_millis() as u64, "page reload scheduled");
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.subscription.borrow_mut().take();
        let cancelled = self
            .pending_reloads
            .borrow_mut()
            .drain(..)
            .filter(|p| !p.fired.get())
            .count();
        debug!(cancelled, "auth watcher disposed");
    }
}

/// Mounted authentication watcher. Dropping it tears everything down.
pub struct AuthWatcher {
    inner: Rc<WatcherInner>,
}

impl AuthWatcher {
    /// Subscribe to storage changes and run the first check.
    ///
    /// `on_overlay` is called with the overlay state whenever the watcher
    /// or the operator changes it.
    pub fn mount(
        settings: AuthWatchSettings,
        caps: Capabilities,
        on_overlay: impl Fn(OverlayState) + 'static,
    ) -> Result<Self, AuthWatchError> {
        let inner = Rc::new(WatcherInner {
            settings,
            caps,
            overlay: Cell::new(OverlayState::Idle),
            on_overlay: Box::new(on_overlay),
            pending_reloads: RefCell::new(Vec::new()),
            subscription: RefCell::new(None),
            disposed: Cell::new(false),
        });

        let weak: Weak<WatcherInner> = Rc::downgrade(&inner);
        let listener: StorageListener = Rc::new(move |change: &StorageChange| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_change(change);
            }
        });
        let subscription = inner.caps.store.subscribe(listener)?;
        *inner.subscription.borrow_mut() = Some(subscription);

        inner.check();

        Ok(Self { inner })
    }

    pub fn state(&self) -> OverlayState {
        self.inner.overlay.get()
    }

    /// Operator opened the external login overlay
    pub fn open_prompt(&self) {
        self.inner.set_overlay(OverlayState::Prompting);
    }

    /// Operator closed the external login overlay
    pub fn close_prompt(&self) {
        self.inner.set_overlay(OverlayState::Idle);
    }

    /// Number of reloads scheduled that have neither fired nor been cancelled
    pub fn pending_reloads(&self) -> usize {
        self.inner
            .pending_reloads
            .borrow()
            .iter()
            .filter(|p| !p.fired.get())
            .count()
    }

    /// Unsubscribe and cancel pending reloads. Also runs on drop.
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}

impl Drop for AuthWatcher {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::LocalPool;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        values: RefCell<HashMap<String, String>>,
        listeners: Rc<RefCell<Vec<(usize, StorageListener)>>>,
        next_id: Cell<usize>,
    }

    impl MemoryStore {
        /// Simulate a write made by another tab
        fn external_write(&self, key: &str, value: &str) {
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            let listeners: Vec<_> = self.listeners.borrow().iter().map(|(_, l)| l.clone()).collect();
            let change = StorageChange {
                key: Some(key.to_string()),
                new_value: Some(value.to_string()),
            };
            for listener in listeners {
                listener(&change);
            }
        }

        fn listener_count(&self) -> usize {
            self.listeners.borrow().len()
        }
    }

    impl TokenStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, AuthWatchError> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), AuthWatchError> {
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn subscribe(&self, listener: StorageListener) -> Result<Subscription, AuthWatchError> {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            self.listeners.borrow_mut().push((id, listener));
            let listeners = self.listeners.clone();
            Ok(Disposer::new(move || {
                listeners.borrow_mut().retain(|(existing, _)| *existing != id);
            }))
        }
    }

    struct RecordingClient {
        tokens: RefCell<Vec<String>>,
        fail: bool,
    }

    #[async_trait(?Send)]
    impl StatusClient for RecordingClient {
        async fn fetch_status(&self, token: &str) -> Result<serde_json::Value, AuthWatchError> {
            self.tokens.borrow_mut().push(bearer_authorization(token));
            if self.fail {
                Err(AuthWatchError::RequestFailed("connection refused".to_string()))
            } else {
                Ok(serde_json::json!({ "email": "jane@example.com" }))
            }
        }
    }

    struct ScheduledTask {
        delay: Duration,
        task: Option<Box<dyn FnOnce()>>,
        cancelled: Rc<Cell<bool>>,
    }

    #[derive(Default)]
    struct ManualScheduler {
        tasks: RefCell<Vec<ScheduledTask>>,
    }

    impl ManualScheduler {
        fn delays(&self) -> Vec<Duration> {
            self.tasks.borrow().iter().map(|t| t.delay).collect()
        }

        fn live(&self) -> usize {
            self.tasks.borrow().iter().filter(|t| !t.cancelled.get()).count()
        }

        /// Fire every task that has not been cancelled
        fn fire_all(&self) {
            let ready: Vec<_> = self
                .tasks
                .borrow_mut()
                .iter_mut()
                .filter(|t| !t.cancelled.get())
                .filter_map(|t| t.task.take())
                .collect();
            for task in ready {
                task();
            }
        }
    }

    impl Scheduler for ManualScheduler {
        fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle {
            let cancelled = Rc::new(Cell::new(false));
            self.tasks.borrow_mut().push(ScheduledTask {
                delay,
                task: Some(task),
                cancelled: cancelled.clone(),
            });
            Disposer::new(move || cancelled.set(true))
        }
    }

    #[derive(Default)]
    struct CountingReloader {
        reloads: Cell<usize>,
    }

    impl PageReloader for CountingReloader {
        fn reload(&self) {
            self.reloads.set(self.reloads.get() + 1);
        }
    }

    struct Harness {
        pool: LocalPool,
        store: Rc<MemoryStore>,
        client: Rc<RecordingClient>,
        scheduler: Rc<ManualScheduler>,
        reloader: Rc<CountingReloader>,
        overlay_log: Rc<RefCell<Vec<OverlayState>>>,
    }

    impl Harness {
        fn new(fail: bool) -> Self {
            Self {
                pool: LocalPool::new(),
                store: Rc::new(MemoryStore::default()),
                client: Rc::new(RecordingClient {
                    tokens: RefCell::new(Vec::new()),
                    fail,
                }),
                scheduler: Rc::new(ManualScheduler::default()),
                reloader: Rc::new(CountingReloader::default()),
                overlay_log: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn mount(&self, settings: AuthWatchSettings) -> AuthWatcher {
            let caps = Capabilities {
                store: self.store.clone(),
                client: self.client.clone(),
                scheduler: self.scheduler.clone(),
                reloader: self.reloader.clone(),
                spawner: Rc::new(self.pool.spawner()),
            };
            let log = self.overlay_log.clone();
            AuthWatcher::mount(settings, caps, move |state| log.borrow_mut().push(state)).unwrap()
        }
    }

    #[test]
    fn test_bearer_authorization() {
        assert_eq!(AUTHORIZATION_HEADER, "Authorization");
        assert_eq!(bearer_authorization("tok-123"), "Bearer tok-123");
    }

    #[test]
    fn test_fired_reloads_are_released() {
        let mut h = Harness::new(false);
        let watcher = h.mount(AuthWatchSettings::default());

        h.store.external_write("user", "first");
        h.pool.run_until_stalled();
        h.scheduler.fire_all();
        assert_eq!(watcher.pending_reloads(), 0);

        h.store.external_write("user", "second");
        h.pool.run_until_stalled();
        assert_eq!(watcher.pending_reloads(), 1);
        assert_eq!(watcher.inner.pending_reloads.borrow().len(), 1);
        assert_eq!(h.reloader.reloads.get(), 1);
    }

    #[test]
    fn test_no_token_on_mount_does_nothing() {
        let mut h = Harness::new(false);
        let watcher = h.mount(AuthWatchSettings::default());
        h.pool.run_until_stalled();

        assert!(h.client.tokens.borrow().is_empty());
        assert_eq!(h.scheduler.live(), 0);
        assert_eq!(watcher.state(), OverlayState::Idle);
        assert_eq!(h.store.listener_count(), 1);
    }

    #[test]
    fn test_token_on_mount_checks_immediately() {
        let mut h = Harness::new(false);
        h.store.set("user", "abc").unwrap();

        let watcher = h.mount(AuthWatchSettings::default());
        h.pool.run_until_stalled();

        assert_eq!(*h.client.tokens.borrow(), vec!["Bearer abc"]);
        assert_eq!(watcher.pending_reloads(), 1);
    }

    #[test]
    fn test_external_write_triggers_one_call_and_one_reload() {
        let mut h = Harness::new(false);
        let watcher = h.mount(AuthWatchSettings::default());
        watcher.open_prompt();
        assert_eq!(watcher.state(), OverlayState::Prompting);

        h.store.external_write("user", "tok-123");
        // Overlay hides before the response arrives
        assert_eq!(watcher.state(), OverlayState::Idle);
        h.pool.run_until_stalled();

        assert_eq!(*h.client.tokens.borrow(), vec!["Bearer tok-123"]);
        assert_eq!(h.scheduler.delays(), vec![Duration::from_millis(5000)]);
        assert_eq!(h.reloader.reloads.get(), 0);

        assert_eq!(watcher.pending_reloads(), 1);
        h.scheduler.fire_all();
        assert_eq!(h.reloader.reloads.get(), 1);
        assert_eq!(watcher.pending_reloads(), 0);
        assert_eq!(
            *h.overlay_log.borrow(),
            vec![OverlayState::Prompting, OverlayState::Idle]
        );
    }

    #[test]
    fn test_other_keys_and_empty_tokens_ignored() {
        let mut h = Harness::new(false);
        let watcher = h.mount(AuthWatchSettings::default());
        watcher.open_prompt();

        h.store.external_write("users", "tok");
        h.store.external_write("user", "");
        h.pool.run_until_stalled();

        assert!(h.client.tokens.borrow().is_empty());
        assert_eq!(watcher.state(), OverlayState::Prompting);
    }

    #[test]
    fn test_failed_request_still_reloads_by_default() {
        let mut h = Harness::new(true);
        let _watcher = h.mount(AuthWatchSettings::default());

        h.store.external_write("user", "tok");
        h.pool.run_until_stalled();

        assert_eq!(h.scheduler.live(), 1);
    }

    #[test]
    fn test_on_success_policy_skips_reload_after_failure() {
        let mut h = Harness::new(true);
        let settings = AuthWatchSettings {
            reload_policy: ReloadPolicy::OnSuccess,
            ..AuthWatchSettings::default()
        };
        let watcher = h.mount(settings);

        h.store.external_write("user", "tok");
        h.pool.run_until_stalled();

        assert_eq!(h.client.tokens.borrow().len(), 1);
        assert_eq!(h.scheduler.live(), 0);
        assert_eq!(watcher.pending_reloads(), 0);
    }

    #[test]
    fn test_drop_cancels_reload_and_unsubscribes() {
        let mut h = Harness::new(false);
        let watcher = h.mount(AuthWatchSettings::default());

        h.store.external_write("user", "tok");
        h.pool.run_until_stalled();
        assert_eq!(h.scheduler.live(), 1);

        drop(watcher);
        assert_eq!(h.scheduler.live(), 0);
        assert_eq!(h.store.listener_count(), 0);

        h.scheduler.fire_all();
        h.store.external_write("user", "again");
        h.pool.run_until_stalled();
        assert_eq!(h.reloader.reloads.get(), 0);
        assert_eq!(h.client.tokens.borrow().len(), 1);
    }

    #[test]
    fn test_response_after_unmount_schedules_nothing() {
        let mut h = Harness::new(false);
        let watcher = h.mount(AuthWatchSettings::default());

        h.store.external_write("user", "tok");
        // Unmount while the request is still in flight
        drop(watcher);
        h.pool.run_until_stalled();

        assert_eq!(h.client.tokens.borrow().len(), 1);
        assert!(h.scheduler.delays().is_empty());
    }

    #[test]
    fn test_custom_key_and_delay() {
        let mut h = Harness::new(false);
        let settings = AuthWatchSettings {
            storage_key: "session".to_string(),
            reload_delay_ms: 250,
            ..AuthWatchSettings::default()
        };
        let _watcher = h.mount(settings);

        h.store.external_write("user", "ignored");
        h.store.external_write("session", "tok");
        h.pool.run_until_stalled();

        assert_eq!(*h.client.tokens.borrow(), vec!["Bearer tok"]);
        assert_eq!(h.scheduler.delays(), vec![Duration::from_millis(250)]);
    }
}
