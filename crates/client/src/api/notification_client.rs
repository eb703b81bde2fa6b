//! お知らせ関連のクライアント

use async_trait::async_trait;
use edudesk_shared::ListBody;

use super::client_impl::SchoolApiClient;
use crate::{error::ApiError, query::Filters, resource::ResourceAction, types::Notification};

/// お知らせ関連のクライアントトレイト
#[async_trait]
pub trait NotificationClient: Send + Sync {
    /// ログイン中ユーザー宛ての未読のお知らせを取得する
    ///
    /// `GET notifications/unread/` を呼び出す。
    async fn unread_notifications(&self) -> Result<Vec<Notification>, ApiError>;
}

#[async_trait]
impl NotificationClient for SchoolApiClient {
    async fn unread_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let endpoint = ResourceAction::UnreadNotifications.endpoint();
        let body: ListBody<Notification> = self
            .http
            .call(&endpoint, None, &Filters::new(), None)
            .await?;
        Ok(body.into_items())
    }
}
