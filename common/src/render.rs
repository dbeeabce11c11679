//! 結果表示用HTML生成
//!
//! 外部API由来の文字列はすべてエスケープしてから埋め込む。

use crate::identify::{Classification, SuggestionView};

/// 結果エリア内のリセットボタンに付ける `data-action`
pub const RESET_ACTION: &str = "reset-identification";

pub const LOADING_HTML: &str = "<p>Analyzing your plant image…</p>";

pub const NOT_A_PLANT_HTML: &str = "<p>It looks like the image may not contain a plant. Try a clearer photo showing leaves, flowers, or the whole plant.</p>";

pub const NO_MATCHES_HTML: &str = "<p>No plant matches found. Try a clearer, closer photo.</p>";

pub const PLACEHOLDER_HTML: &str = concat!(
    r#"<p class="upload-title">Click here or drag &amp; drop a plant image</p>"#,
    "<small>JPG, PNG, or WebP • Max 10 MB</small>",
);

/// 描画内容
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    NotAPlant,
    NoMatches,
    Suggestions(Vec<SuggestionView>),
    Failed { message: String },
}

impl ResultView {
    pub fn from_classification(classification: &Classification) -> Self {
        if classification.is_plant == Some(false) {
            return ResultView::NotAPlant;
        }
        let views = classification.top_views();
        if views.is_empty() {
            ResultView::NoMatches
        } else {
            ResultView::Suggestions(views)
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            ResultView::NotAPlant => NOT_A_PLANT_HTML.to_string(),
            ResultView::NoMatches => NO_MATCHES_HTML.to_string(),
            ResultView::Suggestions(views) => {
                let mut html: Vec<String> = views.iter().map(suggestion_block).collect();
                html.push(format!(
                    r#"<div class="result-actions"><button type="button" class="btn" data-action="{}">Try another image</button></div>"#,
                    RESET_ACTION
                ));
                html.join("\n")
            }
            ResultView::Failed { message } => error_block(message),
        }
    }
}

/// 選択画像のプレビュー
pub fn preview_html(data_url: &str) -> String {
    format!(
        r#"<img class="upload-preview" src="{}" alt="Selected plant" /><small>Looks good? Now click Identify Plant.</small>"#,
        escape_html(data_url)
    )
}

fn suggestion_block(view: &SuggestionView) -> String {
    let mut block = String::new();
    block.push_str(r#"<div class="result-card">"#);
    block.push_str(&format!(
        r#"<div class="result-header"><strong>{}. {}</strong><span class="result-badge">{}% match</span></div>"#,
        view.rank,
        escape_html(&view.name),
        view.confidence
    ));
    if !view.common_names.is_empty() {
        let names: Vec<String> = view.common_names.iter().map(|n| escape_html(n)).collect();
        block.push_str(&format!(
            r#"<div class="result-common"><em>Common names:</em> {}</div>"#,
            names.join(", ")
        ));
    }
    block.push_str(&format!(
        r#"<div class="result-description">{}</div>"#,
        escape_html(&view.description)
    ));
    if let Some(url) = view.url.as_deref().filter(|u| is_web_url(u)) {
        block.push_str(&format!(
            r#"<div class="result-link"><a href="{}" target="_blank" rel="noopener noreferrer">Learn more</a></div>"#,
            escape_html(url)
        ));
    }
    block.push_str("</div>");
    block
}

fn error_block(message: &str) -> String {
    format!(
        r#"<div class="result-error"><strong>Error identifying plant.</strong><br/><small>{}</small><br/><small>Tip: try a clearer image and try again.</small></div>"#,
        escape_html(message)
    )
}

// javascript: 等のスキームは出さない
fn is_web_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
