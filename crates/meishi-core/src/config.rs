//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. meishi.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::{Error, Result};

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "meishi.toml";

/// Card app backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardsConfig {
    /// Path to the SQLite database holding cards, collections and accounts
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Directory the photo blob store writes into
    #[serde(default = "default_photo_dir")]
    pub photo_dir: String,

    /// Public origin used for share links and photo URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for CardsConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            photo_dir: default_photo_dir(),
            public_base_url: default_public_base_url(),
        }
    }
}

/// Stock app backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StocksConfig {
    /// Base URL of the stock analysis API. Unset, empty or `demo` selects demo mode.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Artificial latency applied by the demo data source
    #[serde(default = "default_demo_latency_ms")]
    pub demo_latency_ms: u64,
}

impl Default for StocksConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_secs: default_timeout_secs(),
            demo_latency_ms: default_demo_latency_ms(),
        }
    }
}

impl StocksConfig {
    /// Whether no live backend is configured
    pub fn is_demo(&self) -> bool {
        match self.api_url.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(url) => url.eq_ignore_ascii_case("demo"),
        }
    }
}

/// Client-side application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where theme and language preferences are persisted
    #[serde(default = "default_preferences_path")]
    pub preferences_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preferences_path: default_preferences_path(),
        }
    }
}

/// Main configuration for meishi
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cards: CardsConfig,

    #[serde(default)]
    pub stocks: StocksConfig,

    #[serde(default)]
    pub app: AppConfig,
}

fn default_db_path() -> String {
    "data/meishi.db".to_string()
}

fn default_photo_dir() -> String {
    "data/photos".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_demo_latency_ms() -> u64 {
    500
}

fn default_preferences_path() -> String {
    "data/preferences.toml".to_string()
}

impl Config {
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::with_capacity(value.len());
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // '{' を消費

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Parse a TOML document without consulting the environment
    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// 設定ファイル内の `${VAR_NAME}` は環境変数の値に置換され、
    /// その後に環境変数による上書きが適用されます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let expanded = Self::expand_env_vars(&toml_content);
        let mut cfg = Self::parse_toml(&expanded)?;
        cfg.apply_env_overrides();

        debug!("Loaded configuration from {}", path.display());
        Ok(cfg)
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./meishi.toml` が無い場合は環境変数とデフォルト値のみを使います。
    pub fn load() -> Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Self::from_env()
    }

    /// Load configuration from environment variables over defaults
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// 環境変数で設定を上書きする
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("MEISHI_DB_PATH") {
            self.cards.db_path = path;
        }
        if let Ok(dir) = std::env::var("MEISHI_PHOTO_DIR") {
            self.cards.photo_dir = dir;
        }
        if let Ok(url) = std::env::var("MEISHI_PUBLIC_URL") {
            if !url.is_empty() {
                self.cards.public_base_url = url;
            }
        }

        if let Ok(url) = std::env::var("STOCK_API_URL") {
            self.stocks.api_url = Some(url);
        }
        if let Ok(secs) = std::env::var("STOCK_API_TIMEOUT") {
            if let Ok(s) = secs.parse() {
                self.stocks.timeout_secs = s;
            }
        }
        if let Ok(ms) = std::env::var("STOCK_DEMO_LATENCY_MS") {
            if let Ok(ms) = ms.parse() {
                self.stocks.demo_latency_ms = ms;
            }
        }

        if let Ok(path) = std::env::var("MEISHI_PREFERENCES") {
            self.app.preferences_path = path;
        }
    }
}
