//! ヘッダーコンポーネント

use leptos::prelude::*;
use soil_search_common::Page;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Soil Search"</h1>
            <nav class="nav">
                {Page::ALL
                    .iter()
                    .map(|page| {
                        view! {
                            <a class="nav-link" href=format!("#{}", page.id())>
                                {page.label()}
                            </a>
                        }
                    })
                    .collect_view()}
            </nav>
        </header>
    }
}
