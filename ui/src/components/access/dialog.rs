//! Association editor dialog

use leptos::*;

use gatehouse_shared::{EntityId, Tag};

use crate::components::common::{CloseIcon, TagInput};

/// Modal editing one owner's associations (a user's roles or a role's
/// permissions). Edits are applied by the caller as they happen.
#[component]
pub fn AssociationDialog(
    #[prop(into)] title: Signal<String>,
    #[prop(into)] tags: Signal<Vec<Tag>>,
    #[prop(into)] options: Signal<Vec<Tag>>,
    picker_placeholder: &'static str,
    #[prop(into)] on_add: Callback<EntityId>,
    #[prop(into)] on_remove: Callback<usize>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="fixed inset-0 z-50 flex items-center justify-center">
            // Backdrop
            <div
                class="absolute inset-0 bg-black/60 backdrop-blur-sm"
                on:click=move |_| on_close.call(())
            />

            // Modal
            <div class="relative bg-slate-800 rounded-xl border border-slate-700 shadow-2xl w-full max-w-lg mx-4">
                <div class="flex items-center justify-between px-6 py-4 border-b border-slate-700">
                    <h2 class="text-lg font-semibold text-white">{move || title.get()}</h2>
                    <button
                        class="p-1 text-slate-400 hover:text-white rounded transition-colors"
                        on:click=move |_| on_close.call(())
                    >
                        <CloseIcon class="w-5 h-5" />
                    </button>
                </div>

                <div class="p-6">
                    <TagInput
                        tags=tags
                        options=options
                        placeholder=picker_placeholder
                        on_add=on_add
                        on_remove=on_remove
                    />
                </div>

                <div class="flex justify-end px-6 py-4 border-t border-slate-700">
                    <button
                        class="px-4 py-2 text-sm font-medium bg-blue-500 hover:bg-blue-600 \
                               text-white rounded-lg transition-colors"
                        on:click=move |_| on_close.call(())
                    >
                        "Done"
                    </button>
                </div>
            </div>
        </div>
    }
}
