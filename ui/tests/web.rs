//! Browser tests for the storage and timer adapters
//!
//! Run with `wasm-pack test --headless --firefox ui`.

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen_test::*;

use gatehouse_shared::{Scheduler, StorageChange, TokenStore};
use gatehouse_ui::client::{LocalTokenStore, TimeoutScheduler};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_local_token_store_round_trip() {
    let store = LocalTokenStore;
    store.set("gatehouse-test-token", "abc123").unwrap();

    assert_eq!(
        store.get("gatehouse-test-token").unwrap().as_deref(),
        Some("abc123")
    );
    assert_eq!(store.get("gatehouse-test-missing").unwrap(), None);
}

#[wasm_bindgen_test]
fn test_subscription_can_be_disposed() {
    let store = LocalTokenStore;
    let seen = Rc::new(Cell::new(0));
    let counter = seen.clone();

    let mut subscription = store
        .subscribe(Rc::new(move |_: &StorageChange| counter.set(counter.get() + 1)))
        .unwrap();
    subscription.dispose();

    // Same-tab writes never raise `storage`; nothing may have been delivered
    store.set("user", "token").unwrap();
    assert_eq!(seen.get(), 0);
}

#[wasm_bindgen_test]
async fn test_cancelled_timer_does_not_fire() {
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();

    let handle = TimeoutScheduler.schedule(Duration::from_millis(10), Box::new(move || flag.set(true)));
    drop(handle);

    gloo_timers::future::TimeoutFuture::new(50).await;
    assert!(!fired.get());
}
