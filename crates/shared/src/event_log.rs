//! # 認証イベントログとエラーコンテキストの構造化ヘルパー
//!
//! `jq` で調査しやすいよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## 認証イベント
//!
//! [`log_auth_event!`] マクロで出力する。`event.kind = "auth_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "auth_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::warn!` / `tracing::error!` に `error.category` + `error.kind`
//! フィールドを直接追加する。定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.action`、`error.kind`）を使用する。JSON 出力でフラットなキーになる。

/// 認証イベントを構造化ログとして出力する。
///
/// `event.kind = "auth_event"` マーカーを自動付与し、`tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
#[macro_export]
macro_rules! log_auth_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "auth_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントアクション
    pub mod action {
        pub const LOGIN_SUCCESS: &str = "auth.login_success";
        pub const LOGIN_FAILURE: &str = "auth.login_failure";
        pub const LOGOUT: &str = "auth.logout";
        /// 401 受信による強制ログアウト
        pub const SESSION_REJECTED: &str = "auth.session_rejected";
        pub const SESSION_RESTORED: &str = "auth.session_restored";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 学校管理 API との通信
        pub const EXTERNAL_SERVICE: &str = "external_service";
        /// トークンストア（ローカルファイル）
        pub const LOCAL_STORAGE: &str = "local_storage";
    }

    /// エラー種別
    pub mod kind {
        pub const SERVICE_COMMUNICATION: &str = "service_communication";
        pub const PAGINATION: &str = "pagination";
        pub const TOKEN_STORE: &str = "token_store";
        pub const DASHBOARD_BRANCH: &str = "dashboard_branch";
    }
}
