//! Third-party sign-in buttons

use leptos::*;

use gatehouse_shared::ProviderLink;

use crate::components::common::ExternalLinkIcon;

#[component]
pub fn ThirdPartyAuth(#[prop(into)] links: Signal<Vec<ProviderLink>>) -> impl IntoView {
    view! {
        <Show when=move || links.with(|l| !l.is_empty())>
            <div class="space-y-2">
                {move || links.get().into_iter().map(|link| view! {
                    <a
                        href=link.href
                        data-provider=link.provider
                        class="w-full flex items-center justify-center gap-2 px-4 py-2.5 rounded-lg \
                               bg-slate-700 hover:bg-slate-600 text-white text-sm font-medium transition-colors"
                    >
                        <ExternalLinkIcon class="w-4 h-4" />
                        {link.label}
                    </a>
                }).collect_view()}
            </div>
            <div class="flex items-center gap-3 my-6">
                <div class="flex-1 h-px bg-slate-700" />
                <span class="text-xs text-slate-500 uppercase">"or"</span>
                <div class="flex-1 h-px bg-slate-700" />
            </div>
        </Show>
    }
}
