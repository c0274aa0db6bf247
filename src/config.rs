//! Runtime settings
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `WEEKLYBOT__*` environment variables (e.g. `WEEKLYBOT__DATA_DIR`).

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::SignalConfig;
use crate::sentiment::SentimentConfig;

const DEFAULT_CONFIG_FILE: &str = "weeklybot";
const ENV_PREFIX: &str = "WEEKLYBOT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// JSON instrument list
    pub catalog_path: PathBuf,
    /// Directory of `<code>.json` daily bar files
    pub data_dir: PathBuf,
    /// Default analysis window when no start date is given
    pub lookback_days: i64,
    /// Names listed first when presenting the catalog
    pub popular: Vec<String>,
    /// Fallback tracing filter when RUST_LOG is unset
    pub log_filter: String,
    pub signals: SignalConfig,
    pub sentiment: SentimentConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/instruments.json"),
            data_dir: PathBuf::from("data/prices"),
            lookback_days: 3 * 365,
            popular: [
                "삼성전자",
                "SK하이닉스",
                "LG에너지솔루션",
                "현대차",
                "NAVER",
                "카카오",
                "삼성바이오로직스",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            log_filter: "weeklybot=info".to_string(),
            signals: SignalConfig::default(),
            sentiment: SentimentConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (required) or `./weeklybot.toml` (optional),
    /// with environment overrides on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("popular"),
            )
            .build()?
            .try_deserialize()?;

        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_indicator_windows() {
        let settings = Settings::default();
        assert_eq!(settings.lookback_days, 1095);
        assert_eq!(settings.signals.ma_period, 10);
        assert_eq!(settings.signals.cmf_period, 4);
        assert_eq!(settings.sentiment.range_window, 52);
        assert_eq!(settings.popular.len(), 7);
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
data_dir = "/tmp/bars"
lookback_days = 365

[signals]
ma_period = 20
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/bars"));
        assert_eq!(settings.lookback_days, 365);
        assert_eq!(settings.signals.ma_period, 20);
        // untouched keys fall back to defaults
        assert_eq!(settings.signals.cmf_period, 4);
        assert_eq!(settings.sentiment, SentimentConfig::default());
        assert_eq!(settings.log_filter, "weeklybot=info");
    }

    #[test]
    fn test_load_missing_required_file() {
        let result = Settings::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }
}
