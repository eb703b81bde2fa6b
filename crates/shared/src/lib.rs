//! # edudesk 共有ユーティリティ
//!
//! クライアントクレートとコンソールの両方から使われる共通部品を提供する。
//!
//! ## 設計方針
//!
//! - 学校管理 API のワイヤ形式（ページエンベロープ）と、ログ初期化のみを置く
//! - HTTP クライアントやセッションの知識は持たない
//! - 外部クレートへの依存は最小限に抑える

pub mod event_log;
pub mod observability;
pub mod page_response;

pub use page_response::{ListBody, PageResponse};
