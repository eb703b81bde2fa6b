//! # 学校管理 API クライアント
//!
//! 汎用 CRUD（[`RecordClient`] / [`EntityClient`]）と、リソース固有アクションの
//! サブトレイトを [`SchoolApi`] スーパートレイトで束ねる。
//!
//! ## 構成
//!
//! - `client_impl`: [`SchoolApi`] スーパートレイトと [`SchoolApiClient`] 構造体
//! - `record_client`: リソース共通の CRUD
//! - `auth_client`: ログイン・ログアウト・セッション復元
//! - `student_client`: 生徒の出欠・学費明細
//! - `academic_client`: 学年度・出欠一括登録・試験結果公開・点数一括登録
//! - `fee_client`: 期限切れの学費
//! - `notification_client`: 未読のお知らせ

mod academic_client;
mod auth_client;
mod client_impl;
mod fee_client;
mod notification_client;
mod record_client;
mod student_client;

pub use academic_client::AcademicClient;
pub use auth_client::{AuthClient, TOKEN_PATH};
pub use client_impl::{SchoolApi, SchoolApiClient};
pub use fee_client::FeeClient;
pub use notification_client::NotificationClient;
pub use record_client::{EntityClient, RecordClient};
pub use student_client::StudentClient;
