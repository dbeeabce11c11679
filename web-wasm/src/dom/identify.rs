//! 植物判定ページのDOMバインディング
//!
//! マウントのたびに要素を一度だけ解決して `IdentifyContext` にまとめ、
//! リスナーを登録する。アンマウント時（drop）にリスナーは解除される。

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use soil_search_common::render::RESET_ACTION;
use soil_search_common::workflow::BUSY_LABEL;
use soil_search_common::{
    submit, Error, FileCandidate, IdentifyWorkflow, Result, ResultView, WorkflowView,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, DragEvent, Element, Event, EventTarget, File, FileReader, HtmlButtonElement,
    HtmlElement, HtmlInputElement, ProgressEvent,
};

use super::by_id;
use super::listener::Listener;
use crate::api::{js_error, ProxyClient};

pub const UPLOAD_AREA_ID: &str = "uploadArea";
pub const FILE_INPUT_ID: &str = "plantImageInput";
pub const SUBMIT_BUTTON_ID: &str = "identifyPlantBtn";
pub const RESULTS_WRAP_ID: &str = "plantResults";
pub const RESULTS_CONTENT_ID: &str = "resultsContent";
pub const PLACEHOLDER_SELECTOR: &str = ".upload-placeholder";

const DRAGOVER_BACKGROUND: &str = "rgba(76, 175, 80, 0.15)";

/// ユーザー向けメッセージの出力先
pub type Notifier = Rc<dyn Fn(&str)>;

fn alert_notifier() -> Notifier {
    Rc::new(|message: &str| gloo::dialogs::alert(message))
}

/// ワークフローが操作する要素一式
#[derive(Clone)]
pub struct IdentifyContext {
    upload_area: HtmlElement,
    placeholder: Element,
    input: HtmlInputElement,
    submit: HtmlButtonElement,
    results_wrap: HtmlElement,
    results: Element,
    idle_label: String,
    notify: Notifier,
}

impl IdentifyContext {
    pub fn resolve(document: &Document, notify: Notifier) -> Result<Self> {
        let upload_area: HtmlElement = by_id(document, UPLOAD_AREA_ID)?;
        let placeholder = upload_area
            .query_selector(PLACEHOLDER_SELECTOR)
            .map_err(js_error)?
            .ok_or_else(|| Error::Config(format!("{} not found", PLACEHOLDER_SELECTOR)))?;
        let submit: HtmlButtonElement = by_id(document, SUBMIT_BUTTON_ID)?;
        let idle_label = submit.text_content().unwrap_or_default();

        Ok(Self {
            upload_area,
            placeholder,
            input: by_id(document, FILE_INPUT_ID)?,
            submit,
            results_wrap: by_id(document, RESULTS_WRAP_ID)?,
            results: by_id(document, RESULTS_CONTENT_ID)?,
            idle_label,
            notify,
        })
    }

    fn set_drag_highlight(&self, on: bool) {
        let style = self.upload_area.style();
        let _ = if on {
            style.set_property("background-color", DRAGOVER_BACKGROUND)
        } else {
            style.remove_property("background-color").map(|_| ())
        };
    }
}

impl WorkflowView for IdentifyContext {
    fn show_message(&self, message: &str) {
        (self.notify)(message);
    }

    fn set_upload_html(&self, html: &str) {
        self.placeholder.set_inner_html(html);
    }

    fn set_submit_visible(&self, visible: bool) {
        set_display(&self.submit, visible, "inline-block");
    }

    fn set_submit_busy(&self, busy: bool) {
        self.submit.set_disabled(busy);
        let label = if busy { BUSY_LABEL } else { self.idle_label.as_str() };
        self.submit.set_text_content(Some(label));
    }

    fn set_results_visible(&self, visible: bool) {
        set_display(&self.results_wrap, visible, "block");
    }

    fn set_results_html(&self, html: &str) {
        self.results.set_inner_html(html);
    }

    fn clear_file_input(&self) {
        self.input.set_value("");
    }
}

fn set_display(element: &HtmlElement, visible: bool, shown: &str) {
    let _ = element
        .style()
        .set_property("display", if visible { shown } else { "none" });
}

/// マウント中のページに登録したリスナーとワークフロー
pub struct IdentifyBinding {
    workflow: Rc<RefCell<IdentifyWorkflow>>,
    _listeners: Vec<Listener>,
}

impl IdentifyBinding {
    pub fn bind(document: &Document) -> Result<Self> {
        Self::bind_with(document, alert_notifier())
    }

    pub(crate) fn bind_with(document: &Document, notify: Notifier) -> Result<Self> {
        let context = IdentifyContext::resolve(document, notify)?;
        let workflow = Rc::new(RefCell::new(IdentifyWorkflow::new()));
        let client = Rc::new(ProxyClient::default());

        workflow.borrow_mut().reset(&context);

        let mut listeners = Vec::new();

        // アップロード枠クリック → ファイル選択
        {
            let input = context.input.clone();
            listeners.push(Listener::new(&context.upload_area, "click", move |event: Event| {
                let input_target: &EventTarget = input.as_ref();
                if event.target().as_ref() != Some(input_target) {
                    input.click();
                }
            })?);
        }

        // ファイル選択
        {
            let workflow = workflow.clone();
            let context_for_change = context.clone();
            listeners.push(Listener::new(&context.input, "change", move |_| {
                on_file_chosen(&workflow, &context_for_change);
            })?);
        }

        // ドラッグ&ドロップ
        {
            let ctx = context.clone();
            listeners.push(Listener::new(&context.upload_area, "dragover", move |event: Event| {
                event.prevent_default();
                ctx.set_drag_highlight(true);
            })?);
        }
        {
            let ctx = context.clone();
            listeners.push(Listener::new(&context.upload_area, "dragleave", move |event: Event| {
                event.prevent_default();
                ctx.set_drag_highlight(false);
            })?);
        }
        {
            let ctx = context.clone();
            listeners.push(Listener::new(&context.upload_area, "drop", move |event: Event| {
                event.prevent_default();
                ctx.set_drag_highlight(false);
                if let Err(e) = forward_drop(&event, &ctx.input) {
                    gloo::console::error!(e.to_string());
                }
            })?);
        }

        // 判定ボタン
        {
            let workflow = workflow.clone();
            let ctx = context.clone();
            listeners.push(Listener::new(&context.submit, "click", move |_| {
                let workflow = workflow.clone();
                let ctx = ctx.clone();
                let client = client.clone();
                spawn_local(async move {
                    if let Some(ResultView::Failed { message }) =
                        submit(&workflow, &ctx, client.as_ref()).await
                    {
                        gloo::console::error!("Identification failed:", message);
                    }
                });
            })?);
        }

        // 結果エリア内の「Try another image」（innerHTML差し替え後も効くよう委譲）
        {
            let workflow = workflow.clone();
            let ctx = context.clone();
            let selector = format!("[data-action=\"{}\"]", RESET_ACTION);
            listeners.push(Listener::new(&context.results, "click", move |event: Event| {
                let is_reset = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest(&selector).ok().flatten())
                    .is_some();
                if is_reset {
                    workflow.borrow_mut().reset(&ctx);
                }
            })?);
        }

        Ok(Self {
            workflow,
            _listeners: listeners,
        })
    }

    #[cfg(test)]
    pub fn workflow(&self) -> &Rc<RefCell<IdentifyWorkflow>> {
        &self.workflow
    }
}

/// ドロップされたファイルをinputに入れ、changeを発火して通常の選択処理に乗せる
fn forward_drop(event: &Event, input: &HtmlInputElement) -> Result<()> {
    let files = event
        .dyn_ref::<DragEvent>()
        .and_then(|e| e.data_transfer())
        .and_then(|dt| dt.files());
    let Some(files) = files.filter(|f| f.length() > 0) else {
        return Ok(());
    };
    input.set_files(Some(&files));
    let change = Event::new("change").map_err(js_error)?;
    input.dispatch_event(&change).map_err(js_error)?;
    Ok(())
}

fn on_file_chosen(workflow: &Rc<RefCell<IdentifyWorkflow>>, context: &IdentifyContext) {
    let Some(file) = context.input.files().and_then(|files| files.get(0)) else {
        return;
    };

    let candidate = FileCandidate {
        mime: file.type_(),
        size: file.size() as u64,
    };
    let checked = workflow.borrow().check_file(&candidate);
    if let Err(e) = checked {
        context.show_message(&e.to_string());
        return;
    }

    let ticket = workflow.borrow_mut().begin_read();
    let workflow = workflow.clone();
    let context = context.clone();
    spawn_local(async move {
        match read_as_data_url(&file).await {
            Ok(data_url) => {
                // 読み込み中にリセットされた場合は何もしない
                let selected = workflow.borrow_mut().select_loaded(ticket, data_url, &context);
                if let Err(e) = selected {
                    context.show_message(&e.to_string());
                }
            }
            Err(e) => {
                gloo::console::error!("Failed to read file:", e.to_string());
                context.show_message("Could not read the selected file.");
            }
        }
    });
}

/// FileReaderでData URLに変換
async fn read_as_data_url(file: &File) -> Result<String> {
    let reader = FileReader::new().map_err(js_error)?;
    let (tx, rx) = oneshot::channel::<Result<String>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let onload = {
        let reader = reader.clone();
        let tx = tx.clone();
        Closure::<dyn FnMut(ProgressEvent)>::new(move |_: ProgressEvent| {
            let result = reader
                .result()
                .ok()
                .and_then(|v| v.as_string())
                .ok_or_else(|| Error::Transport("file could not be read".into()));
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(result);
            }
        })
    };
    let onerror = {
        let tx = tx.clone();
        Closure::<dyn FnMut(ProgressEvent)>::new(move |_: ProgressEvent| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(Error::Transport("file could not be read".into())));
            }
        })
    };

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    reader.read_as_data_url(file).map_err(js_error)?;

    let result = rx
        .await
        .unwrap_or_else(|_| Err(Error::Transport("file read was cancelled".into())));

    // 読み込み完了までクロージャを保持する
    reader.set_onload(None);
    reader.set_onerror(None);
    drop((onload, onerror));
    result
}
