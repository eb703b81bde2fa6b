//! 学費関連のクライアント

use async_trait::async_trait;
use edudesk_shared::ListBody;

use super::client_impl::SchoolApiClient;
use crate::{error::ApiError, query::Filters, resource::ResourceAction, types::FeePayment};

/// 学費関連のクライアントトレイト
#[async_trait]
pub trait FeeClient: Send + Sync {
    /// 支払期限を過ぎた未納・一部納付の学費を取得する
    ///
    /// `GET fee-payments/overdue/` を呼び出す。レスポンスは素の配列だが、
    /// ページエンベロープで返っても受け付ける。
    async fn overdue_payments(&self) -> Result<Vec<FeePayment>, ApiError>;
}

#[async_trait]
impl FeeClient for SchoolApiClient {
    async fn overdue_payments(&self) -> Result<Vec<FeePayment>, ApiError> {
        let endpoint = ResourceAction::OverduePayments.endpoint();
        let body: ListBody<FeePayment> = self
            .http
            .call(&endpoint, None, &Filters::new(), None)
            .await?;
        Ok(body.into_items())
    }
}
