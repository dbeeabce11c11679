//! 植物判定リクエスト/レスポンスの型定義
//!
//! - IdentifyRequest: ブラウザ → プロキシ
//! - Classification: プロキシ経由で返る判定結果（外部API由来なので全フィールドを寛容に読む）

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 既定で要求する詳細フィールド
pub const DEFAULT_DETAILS: [&str; 4] = ["common_names", "url", "description", "taxonomy"];

pub const DEFAULT_LANGUAGE: &str = "en";

/// 表示する候補の最大数
pub const MAX_SUGGESTIONS: usize = 3;

/// 候補ごとに表示する一般名の最大数
pub const MAX_COMMON_NAMES: usize = 3;

pub const UNKNOWN_NAME: &str = "Unknown";

pub const NO_DESCRIPTION: &str = "No description available.";

/// `details` は文字列（カンマ区切り）でも配列でも受け付ける
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Details {
    Joined(String),
    List(Vec<String>),
}

impl Details {
    /// 既定の詳細フィールド（カンマ区切り）
    pub fn default_joined() -> Self {
        Details::Joined(DEFAULT_DETAILS.join(","))
    }
}

/// プロキシへのリクエストボディ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifyRequest {
    #[serde(rename = "imageBase64")]
    pub image_base64: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_images: Option<bool>,
}

impl IdentifyRequest {
    /// 既定オプション付きのリクエストを生成
    pub fn new(image_base64: impl Into<String>) -> Self {
        Self {
            image_base64: image_base64.into(),
            details: Some(Details::default_joined()),
            language: Some(DEFAULT_LANGUAGE.to_string()),
            similar_images: Some(true),
        }
    }
}

/// 判定結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// `result.is_plant.binary`。欠落時はNone（植物として扱う）
    pub is_plant: Option<bool>,
    pub suggestions: Vec<Suggestion>,
}

/// 候補1件（外部APIの生データ）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestion {
    pub name: Option<String>,
    pub probability: f64,
    pub common_names: Vec<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

/// 表示用レコード
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionView {
    pub rank: usize,
    pub name: String,
    pub confidence: u32,
    pub common_names: Vec<String>,
    pub description: String,
    pub url: Option<String>,
}

impl Classification {
    /// レスポンスボディをパース
    ///
    /// JSONとして読めない場合のみエラー。構造が想定と違う部分は既定値で埋める。
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let result = value.get("result");

        let is_plant = result
            .and_then(|r| r.get("is_plant"))
            .and_then(|p| p.get("binary"))
            .and_then(Value::as_bool);

        let suggestions = result
            .and_then(|r| r.get("classification"))
            .and_then(|c| c.get("suggestions"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(Suggestion::from_map)
                    .collect()
            })
            .unwrap_or_default();

        Self { is_plant, suggestions }
    }

    /// 上位候補の表示レコード（受信順のまま、並べ替えない）
    pub fn top_views(&self) -> Vec<SuggestionView> {
        self.suggestions
            .iter()
            .take(MAX_SUGGESTIONS)
            .enumerate()
            .map(|(i, s)| s.to_view(i + 1))
            .collect()
    }
}

impl Suggestion {
    fn from_map(map: &Map<String, Value>) -> Self {
        let details = map
            .get("details")
            .or_else(|| map.get("plant_details"))
            .and_then(Value::as_object);

        let common_names = details
            .and_then(|d| d.get("common_names"))
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        // wiki_description.value → description
        let description = details.and_then(|d| {
            d.get("wiki_description")
                .and_then(|w| w.get("value"))
                .and_then(non_empty_str)
                .or_else(|| d.get("description").and_then(description_text))
        });

        Self {
            name: get_string(map, "name").or_else(|| get_string(map, "plant_name")),
            probability: map.get("probability").and_then(Value::as_f64).unwrap_or(0.0),
            common_names,
            description,
            url: details.and_then(|d| d.get("url")).and_then(non_empty_str),
        }
    }

    pub fn to_view(&self, rank: usize) -> SuggestionView {
        SuggestionView {
            rank,
            name: self.name.clone().unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            confidence: confidence_percent(self.probability),
            common_names: self.common_names.iter().take(MAX_COMMON_NAMES).cloned().collect(),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            url: self.url.clone(),
        }
    }
}

/// 確率(0..1) → パーセント（四捨五入）
pub fn confidence_percent(probability: f64) -> u32 {
    if !probability.is_finite() {
        return 0;
    }
    (probability.clamp(0.0, 1.0) * 100.0).round() as u32
}

fn get_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(non_empty_str)
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// v3の description は {"value": "..."} 形式のことがある
fn description_text(value: &Value) -> Option<String> {
    non_empty_str(value).or_else(|| value.get("value").and_then(non_empty_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn suggestion(name: &str, probability: f64) -> Value {
        json!({
            "name": name,
            "probability": probability,
            "details": {
                "common_names": ["a", "b", "c", "d"],
                "description": { "value": format!("{} description", name) },
                "url": format!("https://en.wikipedia.org/wiki/{}", name)
            }
        })
    }

    // =============================================
    // IdentifyRequest テスト
    // =============================================

    #[test]
    fn test_identify_request_serialize_defaults() {
        let request = IdentifyRequest::new("data:image/png;base64,iVBOR");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["imageBase64"], "data:image/png;base64,iVBOR");
        assert_eq!(json["details"], "common_names,url,description,taxonomy");
        assert_eq!(json["language"], "en");
        assert_eq!(json["similar_images"], true);
    }

    #[test]
    fn test_identify_request_deserialize_details_list() {
        let json = r#"{"imageBase64": "abc", "details": ["url", "taxonomy"]}"#;
        let request: IdentifyRequest = serde_json::from_str(json).unwrap();

        assert_eq!(
            request.details,
            Some(Details::List(vec!["url".into(), "taxonomy".into()]))
        );
        assert_eq!(request.language, None);
        assert_eq!(request.similar_images, None);
    }

    // =============================================
    // Classification テスト
    // =============================================

    #[test]
    fn test_classification_not_plant() {
        let body = r#"{"result": {"is_plant": {"binary": false, "probability": 0.02}}}"#;
        let classification = Classification::from_json(body).unwrap();

        assert_eq!(classification.is_plant, Some(false));
        assert!(classification.suggestions.is_empty());
    }

    #[test]
    fn test_top_views_keeps_order_and_caps_at_three() {
        let body = json!({
            "result": {
                "is_plant": { "binary": true },
                "classification": {
                    "suggestions": [
                        suggestion("Monstera", 0.8734),
                        suggestion("Philodendron", 0.06),
                        suggestion("Epipremnum", 0.04),
                        suggestion("Syngonium", 0.01),
                        suggestion("Alocasia", 0.005)
                    ]
                }
            }
        })
        .to_string();

        let views = Classification::from_json(&body).unwrap().top_views();

        assert_eq!(views.len(), 3);
        let names: Vec<&str> = views.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Monstera", "Philodendron", "Epipremnum"]);
        assert_eq!(views[0].confidence, 87);
        assert_eq!(views[0].rank, 1);
        assert_eq!(views[0].common_names, vec!["a", "b", "c"]);
        assert_eq!(views[0].description, "Monstera description");
        assert_eq!(views[1].confidence, 6);
    }

    #[test]
    fn test_suggestion_missing_details_uses_fallbacks() {
        let body = r#"{"result": {"classification": {"suggestions": [{"probability": 0.5}]}}}"#;
        let views = Classification::from_json(body).unwrap().top_views();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, UNKNOWN_NAME);
        assert_eq!(views[0].description, NO_DESCRIPTION);
        assert!(views[0].common_names.is_empty());
        assert_eq!(views[0].url, None);
        assert_eq!(views[0].confidence, 50);
    }

    #[test]
    fn test_suggestion_legacy_fields() {
        let value = json!({
            "plant_name": "Ficus lyrata",
            "plant_details": {
                "wiki_description": { "value": "Fiddle-leaf fig." },
                "description": "ignored"
            }
        });
        let suggestion = Suggestion::from_map(value.as_object().unwrap());

        assert_eq!(suggestion.name.as_deref(), Some("Ficus lyrata"));
        assert_eq!(suggestion.description.as_deref(), Some("Fiddle-leaf fig."));
        assert_eq!(suggestion.probability, 0.0);
    }

    #[test]
    fn test_wrong_types_are_defaulted() {
        let body = r#"{"result": {"is_plant": "yes", "classification": {"suggestions": [
            {"name": 42, "probability": "high", "details": {"common_names": "rose", "url": 7}},
            "not an object"
        ]}}}"#;
        let classification = Classification::from_json(body).unwrap();

        assert_eq!(classification.is_plant, None);
        assert_eq!(classification.suggestions.len(), 1);
        let view = classification.top_views().remove(0);
        assert_eq!(view.name, UNKNOWN_NAME);
        assert_eq!(view.confidence, 0);
        assert!(view.common_names.is_empty());
        assert_eq!(view.url, None);
    }

    #[test]
    fn test_from_json_rejects_invalid_json() {
        assert!(Classification::from_json("<html>502</html>").is_err());
    }

    #[test]
    fn test_confidence_percent_rounding() {
        assert_eq!(confidence_percent(0.8734), 87);
        assert_eq!(confidence_percent(0.875), 88);
        assert_eq!(confidence_percent(1.0), 100);
        assert_eq!(confidence_percent(-0.2), 0);
        assert_eq!(confidence_percent(f64::NAN), 0);
    }
}
