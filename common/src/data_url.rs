//! Data URL ユーティリティ
//!
//! 選択画像は `data:image/jpeg;base64,/9j/4AAQ...` 形式で保持される。

/// Data URLからBase64データ部分を抽出
///
/// # Arguments
/// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL
///
/// # Returns
/// Base64エンコードされたデータ部分、カンマが無い場合はNone
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// プレフィックスを除去した生のBase64を返す
///
/// カンマを含まない入力は既に生データとみなしてそのまま返す
pub fn strip_data_url_prefix(input: &str) -> &str {
    if input.contains(',') {
        extract_base64_from_data_url(input).unwrap_or_default()
    } else {
        input
    }
}
