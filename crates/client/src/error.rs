//! 学校管理 API クライアントのエラー型

use thiserror::Error;

use crate::resource::{Operation, Resource};

/// 学校管理 API クライアントエラー
///
/// 401 だけは呼び出し元に返る前にセッションのリセットとログイン画面への
/// 遷移が済んでいる。それ以外はそのまま呼び出し元に返し、表示方法は呼び出し元が決める。
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 認証エラー（401）
    #[error("認証の有効期限が切れています。再度ログインしてください")]
    Unauthorized,

    /// ログイン失敗（ユーザー名またはパスワードの誤り）
    #[error("ユーザー名またはパスワードが正しくありません")]
    InvalidCredentials,

    /// 権限不足（403）
    #[error("権限がありません: {0}")]
    Forbidden(String),

    /// リソースが見つからない（404）
    #[error("リソースが見つかりません")]
    NotFound,

    /// バリデーションエラー（400）
    #[error("バリデーションエラー: {0}")]
    ValidationError(String),

    /// 競合（409）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// リソースが提供しない操作
    #[error("{resource} は {operation} をサポートしていません")]
    UnsupportedOperation {
        resource:  Resource,
        operation: Operation,
    },

    /// ページ集約の上限超過
    #[error("{endpoint} のページ数が上限 {max_pages} を超えました")]
    PageLimitExceeded { endpoint: String, max_pages: u32 },

    /// URL の組み立てに失敗した
    #[error("URL が不正です: {0}")]
    InvalidUrl(String),

    /// レスポンスボディの解析に失敗した
    #[error("レスポンスの解析に失敗しました: {0}")]
    Decode(String),

    /// ネットワークエラー
    #[error("ネットワークエラー: {0}")]
    Network(String),

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// セッションを失った結果のエラーか
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}
