//! Login Page
//!
//! Composes the login screen:
//! - Error notice from the `error`/`message` query parameters
//! - Third-party sign-in buttons for the tenant's providers
//! - The credential form and sign-up footer, when form login is enabled
//! - The external login overlay and its authentication watcher
//!
//! The `redirectUrl` query parameter is forwarded only when the page's
//! redirect policy accepts it.

mod external;
mod form;
mod providers;

use leptos::*;
use leptos_meta::Title;
use leptos_router::{use_location, Redirect};

use gatehouse_shared::{
    page_title, provider_links, LoginNotice, LoginQuery, LoginUrls, RedirectPolicy,
};

use crate::components::common::AlertIcon;
use crate::state::AppState;

use external::ExternalLogin;
use form::CredentialForm;
use providers::ThirdPartyAuth;

#[component]
pub fn LoginPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let config = state.config;
    let tenant = state.tenant;
    let current_user = state.current_user;
    let load_error = state.error;

    let location = use_location();
    let query = create_memo(move |_| location.search.with(|s| LoginQuery::parse(s)));

    let policy = state.redirect_policy();
    let urls = create_memo(move |_| {
        let redirect = query.with(|q| q.redirect_url.clone());
        config.with_value(|c| {
            let policy = policy.as_ref().map(|p| p as &dyn RedirectPolicy);
            LoginUrls::build_or_drop(&c.login, redirect.as_deref(), policy)
        })
    });

    let title = move || tenant.with(|t| config.with_value(|c| page_title(&c.login, t)));

    let needs_setup = move || current_user.with(|u| u.as_ref().is_some_and(|u| u.empty_instance));
    let setup_url = config.with_value(|c| c.login.setup_url.clone());
    let forgot_url = config.with_value(|c| c.login.forgot_password_url.clone());

    let providers = Signal::derive(move || {
        tenant.with(|t| urls.with(|u| config.with_value(|c| provider_links(&c.login, t, u))))
    });
    let form_enabled = move || tenant.with(|t| t.form_login_enabled);
    let login_action = Signal::derive(move || urls.with(|u| u.login.clone()));
    let signup_href = move || urls.with(|u| u.signup.clone());

    view! {
        <Title text=title />

        <Show when=needs_setup>
            <Redirect path=setup_url.clone() />
        </Show>

        <div class="min-h-screen flex items-center justify-center bg-slate-900 p-4">
            <div class="w-full max-w-md">
                <div class="text-center mb-8">
                    <h1 class="text-2xl font-bold text-white">{title}</h1>
                    <p class="text-slate-400 mt-2">"Sign in to your account"</p>
                </div>

                <div class="bg-slate-800 rounded-xl border border-slate-700 p-6">
                    {move || query.with(LoginQuery::notice).map(|notice| view! {
                        <NoticeCallout notice=notice forgot_url=forgot_url.clone() />
                    })}

                    {move || load_error.get().map(|err| view! {
                        <p class="text-xs text-amber-400 mb-4">{err}</p>
                    })}

                    <ThirdPartyAuth links=providers />

                    <Show when=form_enabled>
                        <CredentialForm action=login_action />
                    </Show>

                    <ExternalLogin />
                </div>

                <Show when=form_enabled>
                    <p class="text-center text-sm text-slate-400 mt-6">
                        "Don't have an account? "
                        <a href=signup_href class="text-blue-400 hover:text-blue-300">"Sign up"</a>
                    </p>
                </Show>
            </div>
        </div>
    }
}

/// Error callout. The text comes from the query string and is only ever
/// rendered as text.
#[component]
fn NoticeCallout(notice: LoginNotice, forgot_url: String) -> impl IntoView {
    view! {
        <div class="flex gap-3 bg-red-500/10 border border-red-500/30 rounded-lg p-4 mb-6">
            <AlertIcon class="w-5 h-5 text-red-400 flex-shrink-0" />
            <div class="space-y-2">
                <p class="text-sm text-red-400">{notice.text}</p>
                {notice.show_forgot_password.then(|| view! {
                    <a href=forgot_url class="text-xs text-blue-400 hover:text-blue-300">
                        "Reset password"
                    </a>
                })}
            </div>
        </div>
    }
}
