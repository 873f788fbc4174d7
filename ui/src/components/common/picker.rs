//! Searchable item picker
//!
//! Dropdown listing users, roles or permissions with a name filter.

use leptos::*;

use gatehouse_shared::{filter_by_name, EntityId, Tag};

use super::icons::{CheckIcon, ChevronDownIcon};

/// Dropdown of selectable items with a case-insensitive name filter.
///
/// Items in `selected` are marked; picking one again is harmless since
/// association lists ignore duplicates.
#[component]
pub fn EntityPicker(
    #[prop(into)] options: Signal<Vec<Tag>>,
    #[prop(into)] selected: Signal<Vec<EntityId>>,
    placeholder: &'static str,
    #[prop(into)] on_select: Callback<EntityId>,
) -> impl IntoView {
    let (open, set_open) = create_signal(false);
    let (query, set_query) = create_signal(String::new());

    let matches = create_memo(move |_| {
        options.with(|items| {
            query.with(|q| filter_by_name(items, q).into_iter().cloned().collect::<Vec<_>>())
        })
    });

    let pick = move |id: EntityId| {
        on_select.call(id);
        set_open.set(false);
        set_query.set(String::new());
    };

    view! {
        <div class="relative">
            <button
                type="button"
                class="w-full flex items-center justify-between px-3 py-2 rounded-lg bg-slate-900 \
                       border border-slate-700 text-sm text-slate-300 hover:border-slate-600 transition-colors"
                on:click=move |_| set_open.update(|o| *o = !*o)
            >
                <span>{placeholder}</span>
                <ChevronDownIcon />
            </button>

            <Show when=move || open.get()>
                <div class="absolute z-10 mt-1 w-full bg-slate-800 border border-slate-700 rounded-lg shadow-xl">
                    <input
                        type="text"
                        class="w-full px-3 py-2 bg-transparent border-b border-slate-700 text-sm text-white \
                               placeholder-slate-500 focus:outline-none"
                        placeholder="Search..."
                        prop:value=move || query.get()
                        on:input=move |e| set_query.set(event_target_value(&e))
                    />
                    <div class="max-h-48 overflow-y-auto py-1">
                        {move || {
                            let items = matches.get();
                            if items.is_empty() {
                                view! {
                                    <p class="px-3 py-2 text-sm text-slate-500">"No results."</p>
                                }.into_view()
                            } else {
                                items.into_iter().map(|tag| {
                                    let id = tag.id;
                                    let is_selected = move || selected.with(|s| s.contains(&id));
                                    view! {
                                        <button
                                            type="button"
                                            class="w-full flex items-center justify-between px-3 py-1.5 \
                                                   text-left text-sm text-slate-200 hover:bg-slate-700"
                                            on:click=move |_| pick(id)
                                        >
                                            <span>{tag.label}</span>
                                            <Show when=is_selected>
                                                <CheckIcon class="w-4 h-4 text-blue-400" />
                                            </Show>
                                        </button>
                                    }
                                }).collect_view()
                            }
                        }}
                    </div>
                </div>
            </Show>
        </div>
    }
}
