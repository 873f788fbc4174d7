//! Credential Form
//!
//! Email and password form posted natively to the login endpoint.
//! Validation only decides which messages are shown and whether the
//! submit button is enabled.

use std::collections::BTreeSet;

use leptos::*;
use tracing::{debug, info};

use gatehouse_shared::{
    can_submit, forgot_password_url, validate_login, LoginField, LoginFormValues, Validation,
};

use crate::state::AppState;

#[component]
pub fn CredentialForm(
    /// Login URL, including the accepted redirect
    #[prop(into)]
    action: Signal<String>,
) -> impl IntoView {
    let config = expect_context::<AppState>().config;

    let (values, set_values) = create_signal(LoginFormValues::default());
    let (password_dirty, set_password_dirty) = create_signal(false);
    let (touched, set_touched) = create_signal(BTreeSet::<LoginField>::new());

    let validation = create_memo(move |_| {
        let dirty = password_dirty.get();
        values.with(|v| validate_login(v, dirty))
    });

    // Fields flagged by validation stay touched
    create_effect(move |_| {
        let forced = validation.with(|v| v.touched.clone());
        if !forced.is_empty() {
            set_touched.update(|t| t.extend(forced));
        }
    });

    let field_error = move |field: LoginField| -> Option<String> {
        if !touched.with(|t| t.contains(&field)) {
            return None;
        }
        validation.with(|v| v.error(field).map(str::to_string))
    };

    let submit_enabled = Signal::derive(move || {
        let valid = validation.with(Validation::is_valid);
        values.with(|v| can_submit(valid, Some(&v.email)))
    });

    let forgot_href = move || {
        values.with(|v| config.with_value(|c| forgot_password_url(&c.login, &v.email)))
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        if submit_enabled.get_untracked() {
            info!("submitting login form");
        } else {
            ev.prevent_default();
            debug!("login form not ready, submit blocked");
        }
    };

    view! {
        <form
            class="space-y-4"
            method="POST"
            action=move || action.get()
            on:submit=on_submit
        >
            <div class="space-y-1">
                <label class="block text-sm font-medium text-slate-300">"Email"</label>
                <input
                    type="email"
                    name=LoginField::Email.form_name()
                    autocomplete="username"
                    class="w-full px-3 py-2 rounded-lg bg-slate-900 border border-slate-700 text-white text-sm \
                           placeholder-slate-500 focus:outline-none focus:ring-2 focus:ring-blue-500"
                    placeholder="Enter your email"
                    prop:value=move || values.with(|v| v.email.clone())
                    on:input=move |e| set_values.update(|v| v.email = event_target_value(&e))
                />
                {move || field_error(LoginField::Email).map(|err| view! {
                    <p class="text-xs text-red-400 mt-1">{err}</p>
                })}
            </div>

            <div class="space-y-1">
                <div class="flex items-center justify-between">
                    <label class="block text-sm font-medium text-slate-300">"Password"</label>
                    <a href=forgot_href class="text-xs text-blue-400 hover:text-blue-300">
                        "Forgot password?"
                    </a>
                </div>
                <input
                    type="password"
                    name=LoginField::Password.form_name()
                    autocomplete="current-password"
                    class="w-full px-3 py-2 rounded-lg bg-slate-900 border border-slate-700 text-white text-sm \
                           placeholder-slate-500 focus:outline-none focus:ring-2 focus:ring-blue-500"
                    placeholder="Enter your password"
                    prop:value=move || values.with(|v| v.password.clone())
                    on:input=move |e| {
                        let password = event_target_value(&e);
                        set_password_dirty.set(!password.is_empty());
                        set_values.update(|v| v.password = password);
                    }
                />
                {move || field_error(LoginField::Password).map(|err| view! {
                    <p class="text-xs text-red-400 mt-1">{err}</p>
                })}
            </div>

            <button
                type="submit"
                class="w-full py-2.5 bg-blue-500 hover:bg-blue-600 text-white font-medium rounded-lg \
                       transition-colors disabled:opacity-50 disabled:cursor-not-allowed"
                disabled=move || !submit_enabled.get()
            >
                "Login"
            </button>
        </form>
    }
}
