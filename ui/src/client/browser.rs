//! Browser capabilities for the authentication watcher

use std::rc::Rc;
use std::time::Duration;

use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::StorageEvent;

use gatehouse_shared::{
    AuthWatchError, Capabilities, Disposer, PageReloader, Scheduler, StatusClient,
    StorageChange, StorageListener, Subscription, TimerHandle, TokenStore,
};

/// Raw string access to `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTokenStore;

impl LocalTokenStore {
    fn storage() -> Result<web_sys::Storage, AuthWatchError> {
        web_sys::window()
            .ok_or_else(|| AuthWatchError::StorageUnavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| AuthWatchError::StorageUnavailable(format!("{e:?}")))?
            .ok_or_else(|| AuthWatchError::StorageUnavailable("localStorage disabled".to_string()))
    }
}

impl TokenStore for LocalTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthWatchError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| AuthWatchError::StorageUnavailable(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthWatchError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| AuthWatchError::StorageUnavailable(format!("{e:?}")))
    }

    fn subscribe(&self, listener: StorageListener) -> Result<Subscription, AuthWatchError> {
        let window = web_sys::window()
            .ok_or_else(|| AuthWatchError::StorageUnavailable("no window".to_string()))?;

        let callback = Closure::<dyn Fn(StorageEvent)>::new(move |event: StorageEvent| {
            listener(&StorageChange {
                key: event.key(),
                new_value: event.new_value(),
            });
        });

        window
            .add_event_listener_with_callback("storage", callback.as_ref().unchecked_ref())
            .map_err(|e| AuthWatchError::StorageUnavailable(format!("{e:?}")))?;

        // The closure lives until the subscription is disposed
        Ok(Disposer::new(move || {
            if let Err(e) = window
                .remove_event_listener_with_callback("storage", callback.as_ref().unchecked_ref())
            {
                tracing::warn!(error = ?e, "failed to remove storage listener");
            }
        }))
    }
}

/// One-shot timers backed by `setTimeout`
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, task);
        // Dropping a gloo Timeout clears it
        Disposer::new(move || drop(timeout))
    }
}

/// Reloads the page through `window.location`
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowReloader;

impl PageReloader for WindowReloader {
    fn reload(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().reload() {
            tracing::warn!(error = ?e, "page reload failed");
        }
    }
}

/// Spawns futures on the browser's microtask queue
#[derive(Debug, Clone, Copy, Default)]
pub struct WasmSpawner;

impl LocalSpawn for WasmSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

/// Watcher capabilities wired to the real browser
pub fn browser_capabilities(client: Rc<dyn StatusClient>) -> Capabilities {
    Capabilities {
        store: Rc::new(LocalTokenStore),
        client,
        scheduler: Rc::new(TimeoutScheduler),
        reloader: Rc::new(WindowReloader),
        spawner: Rc::new(WasmSpawner),
    }
}
