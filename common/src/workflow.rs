//! 植物判定ワークフロー（状態機械）
//!
//! Idle → Selected → Submitting → (Rendered | Failed)、Rendered/Failed → Idle（リセット）
//!
//! 選択中の画像はインスタンスが所有する。DOM操作は `WorkflowView`、
//! 通信は `IdentifyClient` 経由で行うため、ブラウザ外でも状態遷移を検証できる。

use std::cell::RefCell;

use async_trait::async_trait;
use thiserror::Error;

use crate::data_url::strip_data_url_prefix;
use crate::error::Result;
use crate::identify::{Classification, IdentifyRequest};
use crate::render::{preview_html, ResultView, LOADING_HTML};

/// 選択できる画像の最大サイズ（10 MiB）
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

pub const BUSY_LABEL: &str = "Identifying...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Selected,
    Submitting,
    Rendered,
    Failed,
}

/// 読み込み前のファイル情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub mime: String,
    pub size: u64,
}

/// 入力検証エラー（状態は変化しない）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please select an image file.")]
    NotAnImage,

    #[error("Image is too large. Please pick one under 10 MB.")]
    TooLarge,

    #[error("Please select an image first.")]
    NoSelection,

    #[error("Please wait for the current identification to finish.")]
    Busy,
}

/// マウント済みページへの描画操作
pub trait WorkflowView {
    /// ユーザー向けメッセージ（ブラウザではalert）
    fn show_message(&self, message: &str);
    fn set_upload_html(&self, html: &str);
    fn set_submit_visible(&self, visible: bool);
    /// 無効化＋ラベル差し替え / 元に戻す
    fn set_submit_busy(&self, busy: bool);
    fn set_results_visible(&self, visible: bool);
    fn set_results_html(&self, html: &str);
    fn clear_file_input(&self);
}

/// プロキシ呼び出し。成功時はレスポンスボディを返す
#[async_trait(?Send)]
pub trait IdentifyClient {
    async fn identify(&self, request: &IdentifyRequest) -> Result<String>;
}

#[derive(Debug)]
pub struct IdentifyWorkflow {
    state: WorkflowState,
    pending: Option<String>,
    /// 最後に開始したファイル読み込み
    read_ticket: u64,
}

impl Default for IdentifyWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifyWorkflow {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
            pending: None,
            read_ticket: 0,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// 選択中の画像（Data URL）
    pub fn pending_selection(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// ファイル読み込み前の検証
    ///
    /// サイズ上限はMIMEタイプより先に判定する
    pub fn check_file(&self, file: &FileCandidate) -> std::result::Result<(), SelectionError> {
        if self.state == WorkflowState::Submitting {
            return Err(SelectionError::Busy);
        }
        if file.size > MAX_IMAGE_BYTES {
            return Err(SelectionError::TooLarge);
        }
        if !file.mime.starts_with("image/") {
            return Err(SelectionError::NotAnImage);
        }
        Ok(())
    }

    /// 読み込み済み画像を選択状態にする（前の選択は上書き）
    pub fn select(
        &mut self,
        data_url: String,
        view: &impl WorkflowView,
    ) -> std::result::Result<(), SelectionError> {
        if self.state == WorkflowState::Submitting {
            return Err(SelectionError::Busy);
        }
        view.set_upload_html(&preview_html(&data_url));
        view.set_submit_visible(true);
        self.pending = Some(data_url);
        self.state = WorkflowState::Selected;
        Ok(())
    }

    /// ファイル読み込みの開始。返したチケットを `select_loaded` に渡す
    pub fn begin_read(&mut self) -> u64 {
        self.read_ticket += 1;
        self.read_ticket
    }

    /// 読み込み完了後の選択
    ///
    /// 読み込み中にリセットや別ファイルの読み込みが始まっていれば破棄し `Ok(false)`
    pub fn select_loaded(
        &mut self,
        ticket: u64,
        data_url: String,
        view: &impl WorkflowView,
    ) -> std::result::Result<bool, SelectionError> {
        if ticket != self.read_ticket {
            return Ok(false);
        }
        self.select(data_url, view)?;
        Ok(true)
    }

    /// 送信開始。選択が無ければ拒否
    pub fn begin_submit(&mut self) -> std::result::Result<IdentifyRequest, SelectionError> {
        if self.state == WorkflowState::Submitting {
            return Err(SelectionError::Busy);
        }
        let data_url = self.pending.as_deref().ok_or(SelectionError::NoSelection)?;
        let request = IdentifyRequest::new(strip_data_url_prefix(data_url));
        self.state = WorkflowState::Submitting;
        Ok(request)
    }

    /// 送信完了。結果またはエラーを描画する
    pub fn complete(&mut self, outcome: Result<String>, view: &impl WorkflowView) -> ResultView {
        let parsed = outcome.and_then(|body| Ok(Classification::from_json(&body)?));

        let result = match parsed {
            Ok(classification) => {
                self.state = WorkflowState::Rendered;
                ResultView::from_classification(&classification)
            }
            Err(e) => {
                self.state = WorkflowState::Failed;
                ResultView::Failed { message: e.to_string() }
            }
        };

        view.set_results_visible(true);
        view.set_results_html(&result.to_html());
        result
    }

    /// 初期状態に戻す
    pub fn reset(&mut self, view: &impl WorkflowView) {
        self.pending = None;
        self.state = WorkflowState::Idle;
        self.read_ticket += 1;
        view.set_upload_html(crate::render::PLACEHOLDER_HTML);
        view.set_submit_visible(false);
        view.set_results_visible(false);
        view.clear_file_input();
    }
}

/// 送信中フラグの解除をスコープ終了時に保証する
struct BusyGuard<'a, V: WorkflowView> {
    view: &'a V,
}

impl<'a, V: WorkflowView> BusyGuard<'a, V> {
    fn engage(view: &'a V) -> Self {
        view.set_submit_busy(true);
        Self { view }
    }
}

impl<V: WorkflowView> Drop for BusyGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_submit_busy(false);
    }
}

/// 判定の送信から描画まで
///
/// `RefCell` の借用はawaitをまたがない。
/// 選択が無い場合はメッセージを出してリクエストを発行せずに `None` を返す。
pub async fn submit<V, C>(
    workflow: &RefCell<IdentifyWorkflow>,
    view: &V,
    client: &C,
) -> Option<ResultView>
where
    V: WorkflowView,
    C: IdentifyClient,
{
    let begun = workflow.borrow_mut().begin_submit();
    let request = match begun {
        Ok(request) => request,
        Err(e) => {
            view.show_message(&e.to_string());
            return None;
        }
    };

    let _busy = BusyGuard::engage(view);
    view.set_results_visible(true);
    view.set_results_html(LOADING_HTML);

    let outcome = client.identify(&request).await;
    let result = workflow.borrow_mut().complete(outcome, view);
    Some(result)
}
