//! External Login Overlay
//!
//! Hosts the authentication watcher for the lifetime of the login page.
//! The overlay frames an external sign-in page; once that page (or another
//! tab) stores a token, the watcher hides the overlay and reloads.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::*;
use tracing::warn;

use gatehouse_shared::{AuthWatcher, OverlayState};

use crate::client::browser_capabilities;
use crate::components::common::CloseIcon;
use crate::state::AppState;

#[component]
pub fn ExternalLogin() -> impl IntoView {
    let state = expect_context::<AppState>();
    let settings = state.config.with_value(|c| c.auth_watch.clone());
    let frame_url = settings.external_login_url.clone();

    let (overlay, set_overlay) = create_signal(OverlayState::Idle);

    // Store the watcher so it can be disposed on unmount
    let watcher: Rc<RefCell<Option<AuthWatcher>>> = Rc::new(RefCell::new(None));
    let caps = browser_capabilities(state.status_client());
    match AuthWatcher::mount(settings, caps, move |next| set_overlay.set(next)) {
        Ok(mounted) => *watcher.borrow_mut() = Some(mounted),
        Err(e) => warn!(error = %e, "authentication watcher not started"),
    }

    let open_prompt = Callback::new({
        let watcher = watcher.clone();
        move |_: ()| match watcher.borrow().as_ref() {
            Some(w) => w.open_prompt(),
            None => set_overlay.set(OverlayState::Prompting),
        }
    });

    let close_prompt = Callback::new({
        let watcher = watcher.clone();
        move |_: ()| match watcher.borrow().as_ref() {
            Some(w) => w.close_prompt(),
            None => set_overlay.set(OverlayState::Idle),
        }
    });

    // Unsubscribe and cancel pending reloads on unmount
    let watcher_cleanup = watcher.clone();
    on_cleanup(move || {
        if let Some(w) = watcher_cleanup.borrow_mut().take() {
            w.dispose();
        }
    });

    view! {
        <button
            type="button"
            class="w-full mt-4 py-2 text-sm text-slate-400 hover:text-white transition-colors"
            on:click=move |_| open_prompt.call(())
        >
            "Sign in with an external account"
        </button>

        <Show when=move || overlay.get() == OverlayState::Prompting>
            <div class="fixed inset-0 z-50 flex items-center justify-center">
                <div
                    class="absolute inset-0 bg-black/60 backdrop-blur-sm"
                    on:click=move |_| close_prompt.call(())
                />
                <div class="relative bg-slate-800 rounded-xl border border-slate-700 shadow-2xl w-full max-w-xl h-[70vh] mx-4 flex flex-col">
                    <div class="flex justify-end px-4 py-2 border-b border-slate-700">
                        <button
                            class="p-1 text-slate-400 hover:text-white rounded transition-colors"
                            on:click=move |_| close_prompt.call(())
                        >
                            <CloseIcon class="w-5 h-5" />
                        </button>
                    </div>
                    <iframe class="flex-1 w-full rounded-b-xl bg-white" src=frame_url.clone() />
                </div>
            </div>
        </Show>
    }
}
