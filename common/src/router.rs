//! クライアントサイドルーター
//!
//! ページ名を解決 → HTML断片を取得 → コンテナに差し込み → ライフサイクルフック呼び出し。
//! ワークフローの初期化は必ず差し込み後に行う（差し替え前のリスナーは残らない）。

use std::cell::Cell;

use async_trait::async_trait;

use crate::error::Result;
use crate::pages::{extract_fragment, Page, LOAD_ERROR_HTML, NOT_FOUND_HTML};

/// HTML断片の取得（ブラウザではfetch）
#[async_trait(?Send)]
pub trait PageLoader {
    async fn load(&self, path: &str) -> Result<String>;
}

/// コンテナ側の操作とライフサイクルフック
pub trait PageHost {
    /// コンテナの中身を置き換える
    fn replace_content(&self, html: &str);

    /// 差し込み直後に呼ばれる
    fn mount(&self, page: Page);

    /// 中身が置き換えられる直前に呼ばれる
    fn unmount(&self, page: Page);
}

/// ナビゲーション結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Mounted(Page),
    NotFound,
    LoadFailed(Page),
    /// 取得完了前に新しいナビゲーションが始まったため破棄
    Superseded(Page),
}

pub struct Router<L, H> {
    loader: L,
    host: H,
    current: Cell<Option<Page>>,
    sequence: Cell<u64>,
}

impl<L: PageLoader, H: PageHost> Router<L, H> {
    pub fn new(loader: L, host: H) -> Self {
        Self {
            loader,
            host,
            current: Cell::new(None),
            sequence: Cell::new(0),
        }
    }

    pub fn current(&self) -> Option<Page> {
        self.current.get()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// ページ遷移
    ///
    /// `&self` で呼べるので、同時に複数の遷移が進行し得る。
    /// 最後に開始した遷移だけが反映される。
    pub async fn navigate(&self, page_id: &str) -> Navigation {
        let ticket = self.next_ticket();

        let Some(page) = Page::from_id(page_id) else {
            self.swap(NOT_FOUND_HTML, None);
            return Navigation::NotFound;
        };

        let loaded = self.loader.load(page.source()).await;

        if self.sequence.get() != ticket {
            return Navigation::Superseded(page);
        }

        match loaded {
            Ok(document) => {
                self.swap(extract_fragment(&document), Some(page));
                Navigation::Mounted(page)
            }
            Err(_) => {
                self.swap(LOAD_ERROR_HTML, None);
                Navigation::LoadFailed(page)
            }
        }
    }

    fn next_ticket(&self) -> u64 {
        let ticket = self.sequence.get().wrapping_add(1);
        self.sequence.set(ticket);
        ticket
    }

    // unmount → 置き換え → mount の順序を守る
    fn swap(&self, html: &str, next: Option<Page>) {
        if let Some(previous) = self.current.take() {
            self.host.unmount(previous);
        }
        self.host.replace_content(html);
        if let Some(page) = next {
            self.current.set(Some(page));
            self.host.mount(page);
        }
    }
}
