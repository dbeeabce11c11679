//! メインアプリケーションコンポーネント

use leptos::prelude::*;

use crate::components::header::Header;
use crate::shell::CONTAINER_ID;

/// 静的なシェル。ページ本体はルーターが `#app-content` に差し込む
#[component]
pub fn App() -> impl IntoView {
    view! {
        <div class="container">
            <Header />
            <main id=CONTAINER_ID class="app-content"></main>
        </div>
    }
}
