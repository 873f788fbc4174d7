//! Root Application Component
//!
//! This module contains the main App component that sets up:
//! - Routing for the login and access screens
//! - Global state and meta context providers
//! - The session load on startup

use leptos::*;
use leptos_meta::provide_meta_context;
use leptos_router::*;
use tracing::warn;

use crate::components::access::RoleAssignment;
use crate::components::common::{ShieldIcon, UsersIcon};
use crate::components::login::LoginPage;
use crate::state::AppState;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Initialize global state
    let app_state = AppState::new();
    provide_context(app_state.clone());

    // Load tenant config and session once
    {
        let app_state = app_state.clone();
        create_effect(move |prev_run: Option<bool>| {
            // Only run once
            if prev_run.is_some() {
                return true;
            }

            let app_state = app_state.clone();
            spawn_local(async move {
                if let Err(e) = app_state.refresh_session().await {
                    warn!(error = %e, "could not load session");
                    app_state.error.set(Some(format!("Could not load sign-in settings: {}", e)));
                }
            });

            true
        });
    }

    view! {
        <Router>
            <Routes>
                // Login page - no shell
                <Route path="/user/login" view=LoginPage />

                <Route path="/" view=|| view! { <Redirect path="/settings/access" /> } />
                <Route path="/settings/access" view=|| view! { <MainLayout><RoleAssignment /></MainLayout> } />

                // Catch-all for 404
                <Route path="/*" view=|| view! { <MainLayout><NotFoundPage /></MainLayout> } />
            </Routes>
        </Router>
    }
}

/// Top bar and content area for the admin screens
#[component]
fn MainLayout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen flex flex-col bg-slate-900">
            <header class="flex items-center justify-between px-6 h-14 border-b border-slate-700 bg-slate-800">
                <div class="flex items-center gap-2 text-white font-semibold">
                    <ShieldIcon class="w-5 h-5 text-blue-400" />
                    "Gatehouse"
                </div>
                <nav class="flex items-center gap-4 text-sm">
                    <A href="/settings/access" class="flex items-center gap-1 text-slate-300 hover:text-white">
                        <UsersIcon class="w-4 h-4" />
                        "Access"
                    </A>
                    <A href="/user/login" class="text-slate-300 hover:text-white">"Sign in"</A>
                </nav>
            </header>
            <main class="flex-1 flex flex-col">
                {children()}
            </main>
        </div>
    }
}

/// 404 page
#[component]
fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex-1 flex items-center justify-center p-6">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-slate-600 mb-4">"404"</h1>
                <p class="text-xl text-slate-400 mb-6">"Page not found"</p>
                <a href="/settings/access" class="px-4 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded-lg">
                    "Go to Access Management"
                </a>
            </div>
        </div>
    }
}
