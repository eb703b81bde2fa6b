//! # クライアント設定
//!
//! 環境変数から学校管理 API クライアントの設定を読み込む。
//!
//! | 変数 | 既定値 |
//! |------|--------|
//! | `SCHOOL_API_URL` | `http://localhost:8000/api` |
//! | `SCHOOL_AUTH_SCHEME` | `Token` |
//! | `SCHOOL_MAX_PAGES` | `1000`（`0` で無制限） |
//! | `EDUDESK_TOKEN_PATH` | `.edudesk/session.json` |

use std::{env, path::PathBuf};

use thiserror::Error;

use crate::{
    http::DEFAULT_AUTH_SCHEME,
    pagination::{DEFAULT_MAX_PAGES, PaginationPolicy},
};

/// 既定の API ベース URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// 既定のトークンファイル
pub const DEFAULT_TOKEN_PATH: &str = ".edudesk/session.json";

/// 設定エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} は 0 以上の整数である必要があります: {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// クライアント設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API のベース URL
    pub base_url:    String,
    /// 認証ヘッダーのスキーム
    pub auth_scheme: String,
    /// ページ集約の方針
    pub pagination:  PaginationPolicy,
    /// トークンの保存先
    pub token_path:  PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url:    DEFAULT_API_URL.to_string(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            pagination:  PaginationPolicy::default(),
            token_path:  PathBuf::from(DEFAULT_TOKEN_PATH),
        }
    }
}

impl ClientConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の取得関数から設定を読み込む
    ///
    /// 空文字列の値は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let max_pages = match get("SCHOOL_MAX_PAGES") {
            Some(value) => parse_max_pages(&value)?,
            None => Some(DEFAULT_MAX_PAGES),
        };

        Ok(Self {
            base_url:    get("SCHOOL_API_URL").unwrap_or(defaults.base_url),
            auth_scheme: get("SCHOOL_AUTH_SCHEME").unwrap_or(defaults.auth_scheme),
            pagination:  defaults.pagination.with_max_pages(max_pages),
            token_path:  get("EDUDESK_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_path),
        })
    }
}

/// `SCHOOL_MAX_PAGES` をパースする（`0` は無制限）
fn parse_max_pages(value: &str) -> Result<Option<u32>, ConfigError> {
    let pages: u32 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            name:  "SCHOOL_MAX_PAGES",
            value: value.to_string(),
        })?;
    Ok((pages > 0).then_some(pages))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_未設定なら既定値を使う() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.pagination.max_pages, Some(1000));
        assert_eq!(config.pagination.page_size, 100);
    }

    #[test]
    fn test_環境変数で上書きできる() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SCHOOL_API_URL", "https://school.example.com/api"),
            ("SCHOOL_AUTH_SCHEME", "Bearer"),
            ("SCHOOL_MAX_PAGES", "20"),
            ("EDUDESK_TOKEN_PATH", "/tmp/edudesk.json"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://school.example.com/api");
        assert_eq!(config.auth_scheme, "Bearer");
        assert_eq!(config.pagination.max_pages, Some(20));
        assert_eq!(config.token_path, PathBuf::from("/tmp/edudesk.json"));
    }

    #[test]
    fn test_max_pagesが0なら無制限() {
        let config = ClientConfig::from_lookup(lookup(&[("SCHOOL_MAX_PAGES", "0")])).unwrap();

        assert_eq!(config.pagination.max_pages, None);
    }

    #[test]
    fn test_max_pagesが数値でなければエラー() {
        let result = ClientConfig::from_lookup(lookup(&[("SCHOOL_MAX_PAGES", "many")]));

        assert_eq!(
            result,
            Err(ConfigError::InvalidNumber {
                name:  "SCHOOL_MAX_PAGES",
                value: "many".to_string(),
            })
        );
    }

    #[test]
    fn test_空文字列は未設定として扱う() {
        let config = ClientConfig::from_lookup(lookup(&[("SCHOOL_API_URL", "  ")])).unwrap();

        assert_eq!(config.base_url, DEFAULT_API_URL);
    }
}
