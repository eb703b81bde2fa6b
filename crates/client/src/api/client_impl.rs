//! SchoolApi スーパートレイトとクライアント実装の構造体

use std::sync::Arc;

use super::{
    academic_client::AcademicClient,
    auth_client::AuthClient,
    fee_client::FeeClient,
    notification_client::NotificationClient,
    record_client::RecordClient,
    student_client::StudentClient,
};
use crate::{
    config::ClientConfig,
    error::ApiError,
    http::{HttpClient, LoginRedirect},
    pagination::PaginationPolicy,
    resource::{Endpoint, Operation, Resource},
    session::Session,
};

/// 学校管理 API クライアントトレイト（スーパートレイト）
///
/// 汎用 CRUD と各リソース固有アクションのサブトレイトを束ねる。
/// テスト時にはサブトレイト単位でスタブを使用できる。
///
/// `dyn SchoolApi` はオブジェクトセーフであり、
/// `Arc<dyn SchoolApi>` として使用可能。
pub trait SchoolApi:
    RecordClient + AuthClient + StudentClient + AcademicClient + FeeClient + NotificationClient
{
}

/// ブランケット impl: すべてのサブトレイトを実装する型は
/// 自動的に `SchoolApi` を実装する。
impl<T> SchoolApi for T where
    T: RecordClient
        + AuthClient
        + StudentClient
        + AcademicClient
        + FeeClient
        + NotificationClient
{
}

/// 学校管理 API クライアント実装
#[derive(Debug, Clone)]
pub struct SchoolApiClient {
    pub(super) http:   HttpClient,
    pub(super) policy: PaginationPolicy,
}

impl SchoolApiClient {
    /// 新しい SchoolApiClient を作成する
    ///
    /// # 引数
    ///
    /// - `config`: ベース URL・認証スキーム・ページ集約の方針
    /// - `session`: 共有セッション
    /// - `redirect`: 401 受信時の遷移先
    pub fn new(
        config: &ClientConfig,
        session: Arc<Session>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::new(&config.base_url, session, redirect)?
            .with_auth_scheme(config.auth_scheme.clone());
        Ok(Self::from_http(http, config.pagination))
    }

    pub fn from_http(http: HttpClient, policy: PaginationPolicy) -> Self {
        Self { http, policy }
    }

    pub fn session(&self) -> &Arc<Session> {
        self.http.session()
    }
}

/// リソースが提供する操作のエンドポイントを引く
///
/// 提供していない操作は通信せずに `UnsupportedOperation` を返す。
pub(super) fn resolve(resource: Resource, operation: Operation) -> Result<Endpoint, ApiError> {
    resource
        .endpoint(operation)
        .ok_or(ApiError::UnsupportedOperation {
            resource,
            operation,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_提供していない操作はunsupported_operation() {
        let result = resolve(Resource::Vehicles, Operation::Delete);

        assert!(matches!(
            result,
            Err(ApiError::UnsupportedOperation {
                resource:  Resource::Vehicles,
                operation: Operation::Delete,
            })
        ));
    }

    #[test]
    fn test_提供している操作はエンドポイントを返す() {
        let endpoint = resolve(Resource::Users, Operation::Delete).unwrap();

        assert_eq!(endpoint.method, reqwest::Method::DELETE);
        assert_eq!(endpoint.template, "users/{id}/");
    }
}
