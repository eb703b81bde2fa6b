//! # edudesk 学校管理 API クライアント
//!
//! 学校管理システムの REST API を型付きで扱うクライアントライブラリ。
//!
//! ## モジュール構成
//!
//! - `api`: リソース CRUD と固有アクションのクライアントトレイト、その実装
//! - `http`: トークンの付与と 401 の共通処理を行う HTTP ラッパー
//! - `pagination`: ページ分割されたリストの全件集約
//! - `resource`: リソースと操作からエンドポイントを引く対応表
//! - `session` / `token_store`: ログイン状態とトークンの永続化
//! - `guard` / `navigation`: 画面ルートの認可判定とロール別メニュー
//! - `dashboard`: ダッシュボード集計と生徒概要の複合取得
//!
//! ## 使用例
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use edudesk_client::{
//!     AuthClient, ClientConfig, EntityClient, Filters, MemoryTokenStore, SchoolApiClient,
//!     Session, TracingRedirect, types::Student,
//! };
//!
//! # async fn run() -> Result<(), edudesk_client::ApiError> {
//! let session = Arc::new(Session::new(Arc::new(MemoryTokenStore::new())));
//! let api = SchoolApiClient::new(
//!     &ClientConfig::default(),
//!     session,
//!     Arc::new(TracingRedirect),
//! )?;
//!
//! api.login("admin", "secret").await?;
//! let students: Vec<Student> = api.all_of(&Filters::new().with("gender", "F")).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod http;
pub mod navigation;
pub mod pagination;
pub mod query;
pub mod resource;
mod response;
pub mod session;
pub mod token_store;
pub mod types;

pub use api::{
    AcademicClient,
    AuthClient,
    EntityClient,
    FeeClient,
    NotificationClient,
    RecordClient,
    SchoolApi,
    SchoolApiClient,
    StudentClient,
};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use guard::{Route, RouteDecision, authorize};
pub use http::{HttpClient, LoginRedirect, TracingRedirect};
pub use navigation::{MenuItem, Role, menu_for};
pub use pagination::{PageSource, PaginationPolicy, fetch_all};
pub use query::Filters;
pub use resource::{Operation, Resource, ResourceAction};
pub use session::{Session, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
