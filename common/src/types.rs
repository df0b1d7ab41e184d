//! 分類結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ModelChoice: 推論に使うモデル（ResNet152 / ViT）
//! - PredictionItem: 1件の予測（クラス名 + 確信度）
//! - PredictionResult: 推論サービスのレスポンス全体

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 推論モデルの選択肢
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    #[default]
    Resnet152,
    Vit,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 2] = [ModelChoice::Resnet152, ModelChoice::Vit];

    /// URLパスに埋め込む名前
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelChoice::Resnet152 => "resnet152",
            ModelChoice::Vit => "vit",
        }
    }

    /// 画面表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            ModelChoice::Resnet152 => "ResNet152",
            ModelChoice::Vit => "Vision Transformer (ViT)",
        }
    }
}

impl std::str::FromStr for ModelChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "resnet152" | "resnet" => Ok(ModelChoice::Resnet152),
            "vit" => Ok(ModelChoice::Vit),
            _ => Err(Error::UnknownModel(s.to_string())),
        }
    }
}

impl std::fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 単一の予測結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionItem {
    pub class_name: String,
    /// 0.0-1.0（範囲チェックはサーバー側の責務）
    pub confidence: f64,
}

impl PredictionItem {
    /// 確信度をパーセント値に変換（クランプしない）
    pub fn percent(&self) -> f64 {
        self.confidence * 100.0
    }

    /// "91.00%" 形式
    pub fn percent_label(&self) -> String {
        format!("{:.2}%", self.percent())
    }
}

/// 予測APIのレスポンス
///
/// `predictions` はサーバーが返した順位順のまま保持し、並べ替えない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub model_type: String,
    pub predictions: Vec<PredictionItem>,
}

impl PredictionResult {
    /// 最上位の予測
    pub fn top(&self) -> Option<&PredictionItem> {
        self.predictions.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_choice_default_is_resnet() {
        assert_eq!(ModelChoice::default(), ModelChoice::Resnet152);
    }

    #[test]
    fn test_model_choice_wire_names() {
        assert_eq!(ModelChoice::Resnet152.as_str(), "resnet152");
        assert_eq!(ModelChoice::Vit.as_str(), "vit");
        assert_eq!(ModelChoice::Vit.to_string(), "vit");
    }

    #[test]
    fn test_model_choice_from_str() {
        assert_eq!("resnet152".parse::<ModelChoice>().unwrap(), ModelChoice::Resnet152);
        assert_eq!("ViT".parse::<ModelChoice>().unwrap(), ModelChoice::Vit);
        assert_eq!(" vit ".parse::<ModelChoice>().unwrap(), ModelChoice::Vit);

        let err = "efficientnet".parse::<ModelChoice>().unwrap_err();
        assert!(matches!(err, Error::UnknownModel(name) if name == "efficientnet"));
    }

    #[test]
    fn test_model_choice_serde() {
        let json = serde_json::to_string(&ModelChoice::Resnet152).unwrap();
        assert_eq!(json, "\"resnet152\"");
        let model: ModelChoice = serde_json::from_str("\"vit\"").unwrap();
        assert_eq!(model, ModelChoice::Vit);
    }

    #[test]
    fn test_prediction_result_deserialize_keeps_order() {
        let json = r#"{
            "model_type": "resnet152",
            "predictions": [
                {"class_name": "cat", "confidence": 0.91},
                {"class_name": "dog", "confidence": 0.05}
            ]
        }"#;
        let result: PredictionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.model_type, "resnet152");
        assert_eq!(result.predictions.len(), 2);
        assert_eq!(result.predictions[0].class_name, "cat");
        assert_eq!(result.predictions[1].class_name, "dog");
        assert_eq!(result.top().unwrap().class_name, "cat");
    }

    #[test]
    fn test_prediction_result_missing_field_fails() {
        let json = r#"{"model_type": "vit"}"#;
        assert!(serde_json::from_str::<PredictionResult>(json).is_err());
    }

    #[test]
    fn test_percent_label() {
        let item = PredictionItem { class_name: "cat".into(), confidence: 0.91 };
        assert_eq!(item.percent_label(), "91.00%");

        let item = PredictionItem { class_name: "dog".into(), confidence: 0.05 };
        assert_eq!(item.percent_label(), "5.00%");
    }

    #[test]
    fn test_percent_is_not_clamped() {
        let item = PredictionItem { class_name: "odd".into(), confidence: 1.5 };
        assert_eq!(item.percent_label(), "150.00%");
    }
}
