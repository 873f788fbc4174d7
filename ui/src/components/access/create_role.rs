//! Create Role Panel

use leptos::*;
use tracing::info;

use gatehouse_shared::{Directory, NewRoleForm};

use crate::components::common::PlusIcon;

/// Name input that appends a new role with no permissions
#[component]
pub fn CreateRolePanel(directory: RwSignal<Directory>) -> impl IntoView {
    let (form, set_form) = create_signal(NewRoleForm::default());
    let (error, set_error) = create_signal(Option::<String>::None);
    let (created, set_created) = create_signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let mut current = form.get_untracked();
        let name = current.name.trim().to_string();

        match directory.try_update(|d| current.submit(d)) {
            Some(Ok(id)) => {
                info!(id, name = %name, "role created");
                set_form.set(current);
                set_error.set(None);
                set_created.set(Some(name));
            }
            Some(Err(e)) => {
                set_error.set(Some(e.to_string()));
                set_created.set(None);
            }
            None => {}
        }
    };

    view! {
        <form on:submit=on_submit class="max-w-md space-y-3">
            <label class="block text-sm font-medium text-slate-300">"Role Name"</label>
            <div class="flex gap-2">
                <input
                    type="text"
                    class=move || {
                        let base = "flex-1 px-3 py-2 rounded-lg bg-slate-900 border text-white text-sm \
                                    placeholder-slate-500 focus:outline-none focus:ring-2 focus:ring-blue-500";
                        if error.get().is_some() {
                            format!("{} border-red-500", base)
                        } else {
                            format!("{} border-slate-700", base)
                        }
                    }
                    placeholder="Enter role name"
                    prop:value=move || form.with(|f| f.name.clone())
                    on:input=move |e| {
                        set_form.update(|f| f.name = event_target_value(&e));
                        set_error.set(None);
                    }
                />
                <button
                    type="submit"
                    class="flex items-center gap-2 px-4 py-2 bg-blue-500 hover:bg-blue-600 \
                           text-white text-sm font-medium rounded-lg transition-colors"
                >
                    <PlusIcon class="w-4 h-4" />
                    "Create"
                </button>
            </div>

            {move || {
                if let Some(err) = error.get() {
                    view! { <p class="text-xs text-red-400">{err}</p> }.into_view()
                } else if let Some(name) = created.get() {
                    view! {
                        <p class="text-xs text-green-400">{format!("Role \"{}\" created", name)}</p>
                    }.into_view()
                } else {
                    view! {}.into_view()
                }
            }}
        </form>
    }
}
