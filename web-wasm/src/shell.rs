//! シェルの起動
//!
//! ヘッダーのリンクは `#page-id` 形式。`hashchange` を拾ってルーターに渡す。

use std::rc::Rc;

use soil_search_common::{Error, Navigation, Result, Router};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Event;

use crate::api::{js_error, FetchPageLoader};
use crate::dom::{self, ShellHost};

pub const CONTAINER_ID: &str = "app-content";

type ShellRouter = Router<FetchPageLoader, ShellHost>;

pub fn start() -> Result<()> {
    let window = web_sys::window().ok_or_else(|| Error::Config("window is not available".into()))?;
    let document = dom::document()?;
    let container = document
        .get_element_by_id(CONTAINER_ID)
        .ok_or_else(|| Error::Config(format!("#{} not found", CONTAINER_ID)))?;

    let router = Rc::new(Router::new(
        FetchPageLoader,
        ShellHost::new(document, container),
    ));

    let on_hash = {
        let router = router.clone();
        Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            if let Some(hash) = current_hash() {
                navigate(&router, hash);
            }
        })
    };
    window
        .add_event_listener_with_callback("hashchange", on_hash.as_ref().unchecked_ref())
        .map_err(js_error)?;
    // シェルはページと同じ寿命
    on_hash.forget();

    let initial = current_hash().unwrap_or_default();
    navigate(&router, initial);
    Ok(())
}

fn current_hash() -> Option<String> {
    web_sys::window()?.location().hash().ok()
}

fn navigate(router: &Rc<ShellRouter>, hash: String) {
    let router = router.clone();
    spawn_local(async move {
        // 空のハッシュはホーム
        match router.navigate(&hash).await {
            Navigation::Mounted(_) | Navigation::Superseded(_) => {}
            Navigation::NotFound => gloo::console::warn!("Unknown page:", hash),
            Navigation::LoadFailed(page) => {
                gloo::console::error!("Failed to load page:", page.source())
            }
        }
    });
}
