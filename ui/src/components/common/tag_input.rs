//! Multi-select tag input

use leptos::*;

use gatehouse_shared::{EntityId, Tag};

use super::icons::CloseIcon;
use super::picker::EntityPicker;

/// Assigned items shown as removable tags, plus a picker to add more.
///
/// `on_remove` receives the display index of the tag, not its id.
#[component]
pub fn TagInput(
    #[prop(into)] tags: Signal<Vec<Tag>>,
    #[prop(into)] options: Signal<Vec<Tag>>,
    placeholder: &'static str,
    #[prop(into)] on_add: Callback<EntityId>,
    #[prop(into)] on_remove: Callback<usize>,
) -> impl IntoView {
    let selected_ids = Signal::derive(move || tags.with(|t| t.iter().map(|tag| tag.id).collect::<Vec<_>>()));

    view! {
        <div class="space-y-2">
            <div class="flex flex-wrap gap-2 min-h-[2.5rem] p-2 rounded-lg bg-slate-900 border border-slate-700">
                {move || {
                    let current = tags.get();
                    if current.is_empty() {
                        view! {
                            <span class="text-sm text-slate-500">"None assigned"</span>
                        }.into_view()
                    } else {
                        current.into_iter().enumerate().map(|(index, tag)| {
                            view! {
                                <span class="inline-flex items-center gap-1 px-2 py-0.5 rounded-full \
                                             bg-blue-500/20 text-blue-300 text-xs">
                                    {tag.label}
                                    <button
                                        type="button"
                                        class="text-blue-300 hover:text-white"
                                        on:click=move |_| on_remove.call(index)
                                    >
                                        <CloseIcon class="w-3 h-3" />
                                    </button>
                                </span>
                            }
                        }).collect_view()
                    }
                }}
            </div>
            <EntityPicker
                options=options
                selected=selected_ids
                placeholder=placeholder
                on_select=on_add
            />
        </div>
    }
}
