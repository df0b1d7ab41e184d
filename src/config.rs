use crate::error::{ClassifyError, Result};
use image_classify_common::{ModelChoice, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// ベースURLを上書きする環境変数
pub const API_URL_ENV: &str = "CLASSIFY_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    /// 未設定ならHTTPクライアントの既定に任せる
    pub timeout_seconds: Option<u64>,
    pub default_model: ModelChoice,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ClassifyError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("image-classify").join("config.json"))
    }

    /// ベースURLを決定（引数 > 環境変数 > 設定ファイル > 既定値）
    pub fn api_url(&self, flag: Option<&str>) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        self.resolve_api_url(flag, env.as_deref())
    }

    pub fn resolve_api_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        [flag, env, self.api_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClassifyError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.api_url = Some(url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_model, ModelChoice::Resnet152);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_api_url("http://inference.local:9000".into()).unwrap();
        config.timeout_seconds = Some(30);
        config.default_model = ModelChoice::Vit;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_model": "vit"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_model, ModelChoice::Vit);
        assert!(config.api_url.is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_load_broken_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ClassifyError::JsonParse(_)));
    }

    #[test]
    fn test_api_url_precedence() {
        let config = Config {
            api_url: Some("http://from-file:8000".into()),
            ..Config::default()
        };

        assert_eq!(
            config.resolve_api_url(Some("http://from-flag"), Some("http://from-env")),
            "http://from-flag"
        );
        assert_eq!(config.resolve_api_url(None, Some("http://from-env")), "http://from-env");
        assert_eq!(config.resolve_api_url(None, Some("  ")), "http://from-file:8000");
        assert_eq!(Config::default().resolve_api_url(None, None), DEFAULT_API_URL);
    }

    #[test]
    fn test_set_api_url_rejects_non_http() {
        let mut config = Config::default();
        let err = config.set_api_url("localhost:8000".into()).unwrap_err();
        assert!(matches!(err, ClassifyError::Config(_)));
        assert!(config.api_url.is_none());
    }
}
