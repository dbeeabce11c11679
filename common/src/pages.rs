//! ページルート定義
//!
//! 論理ページ名 → HTML断片のパス。未知のページ名は `None`（not found扱い）。

use lazy_static::lazy_static;
use regex::Regex;

/// ルーティング可能なページ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    AboutUs,
    SoilAi,
    CommonPlants,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::AboutUs, Page::SoilAi, Page::CommonPlants];

    /// ページIDから解決
    pub fn from_id(id: &str) -> Option<Page> {
        let id = id.trim().trim_start_matches('#').trim_start_matches('/');
        match id {
            "" | "home" => Some(Page::Home),
            "about-us" => Some(Page::AboutUs),
            "soil-ai" => Some(Page::SoilAi),
            "common-plants" => Some(Page::CommonPlants),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::AboutUs => "about-us",
            Page::SoilAi => "soil-ai",
            Page::CommonPlants => "common-plants",
        }
    }

    /// 表示ラベル（ナビゲーション用）
    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::AboutUs => "About Us",
            Page::SoilAi => "Soil AI",
            Page::CommonPlants => "Common Plants",
        }
    }

    /// HTML断片の取得元
    pub fn source(&self) -> &'static str {
        match self {
            Page::Home => "/pages/home.html",
            Page::AboutUs => "/pages/about-us.html",
            Page::SoilAi => "/pages/soil-ai.html",
            Page::CommonPlants => "/pages/common-plants.html",
        }
    }

    /// マウント後に植物判定ワークフローの初期化が必要か
    pub fn requires_identify(&self) -> bool {
        matches!(self, Page::SoilAi)
    }
}

/// 未知のページ
pub const NOT_FOUND_HTML: &str =
    r#"<section class="page-status"><h2>Page not found</h2><p>The page you requested does not exist.</p></section>"#;

/// ページ取得失敗
pub const LOAD_ERROR_HTML: &str =
    r#"<section class="page-status"><h2>Error loading page</h2><p>Please check your connection and try again.</p></section>"#;

lazy_static! {
    static ref MAIN_REGION: Regex = Regex::new(r"(?is)<main\b[^>]*>(.*)</main\s*>").unwrap();
    static ref BODY_REGION: Regex = Regex::new(r"(?is)<body\b[^>]*>(.*)</body\s*>").unwrap();
}

/// 取得したHTMLから差し込む領域を抽出
///
/// 優先順位:
/// 1. `<main>` の中身
/// 2. `<body>` の中身
/// 3. ドキュメント全体
pub fn extract_fragment(document: &str) -> &str {
    MAIN_REGION
        .captures(document)
        .or_else(|| BODY_REGION.captures(document))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(document)
}
