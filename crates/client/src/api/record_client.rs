//! リソース共通の CRUD クライアント
//!
//! [`RecordClient`] は型を持たないレコード（JSON）でリソースを扱い、
//! [`EntityClient`] はその上に [`Entity`] 型での読み書きを載せる。

use async_trait::async_trait;
use edudesk_shared::PageResponse;
use uuid::Uuid;

use super::client_impl::{SchoolApiClient, resolve};
use crate::{
    error::ApiError,
    pagination,
    query::Filters,
    resource::{Operation, Resource},
    types::{Entity, Record},
};

/// リソース共通の CRUD クライアントトレイト
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// 1 ページ分を取得する
    ///
    /// `GET {collection}` を呼び出し、ページエンベロープをそのまま返す。
    async fn list_page(
        &self,
        resource: Resource,
        filters: &Filters,
    ) -> Result<PageResponse<Record>, ApiError>;

    /// 全ページを集約して取得する
    async fn list_all(&self, resource: Resource, filters: &Filters)
    -> Result<Vec<Record>, ApiError>;

    /// `GET {collection}{id}/`
    async fn get(&self, resource: Resource, id: &str) -> Result<Record, ApiError>;

    /// `POST {collection}`
    async fn create(&self, resource: Resource, body: &Record) -> Result<Record, ApiError>;

    /// `PUT {collection}{id}/`
    async fn update(&self, resource: Resource, id: &str, body: &Record)
    -> Result<Record, ApiError>;

    /// `DELETE {collection}{id}/`
    ///
    /// `users` と `students` 以外は通信せずに `UnsupportedOperation` を返す。
    async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl RecordClient for SchoolApiClient {
    async fn list_page(
        &self,
        resource: Resource,
        filters: &Filters,
    ) -> Result<PageResponse<Record>, ApiError> {
        let endpoint = resolve(resource, Operation::ListPage)?;
        self.http.call(&endpoint, None, filters, None).await
    }

    async fn list_all(
        &self,
        resource: Resource,
        filters: &Filters,
    ) -> Result<Vec<Record>, ApiError> {
        let endpoint = resolve(resource, Operation::ListAll)?;
        pagination::fetch_all(&self.http, &endpoint.template, filters, self.policy).await
    }

    async fn get(&self, resource: Resource, id: &str) -> Result<Record, ApiError> {
        let endpoint = resolve(resource, Operation::Get)?;
        self.http.call(&endpoint, Some(id), &Filters::new(), None).await
    }

    async fn create(&self, resource: Resource, body: &Record) -> Result<Record, ApiError> {
        let endpoint = resolve(resource, Operation::Create)?;
        self.http
            .call(&endpoint, None, &Filters::new(), Some(body))
            .await
    }

    async fn update(
        &self,
        resource: Resource,
        id: &str,
        body: &Record,
    ) -> Result<Record, ApiError> {
        let endpoint = resolve(resource, Operation::Update)?;
        self.http
            .call(&endpoint, Some(id), &Filters::new(), Some(body))
            .await
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError> {
        let endpoint = resolve(resource, Operation::Delete)?;
        self.http.call_empty(&endpoint, Some(id)).await
    }
}

/// 型付きの CRUD
///
/// [`RecordClient`] を実装する型（`dyn` を含む）は自動的に実装する。
#[async_trait]
pub trait EntityClient: RecordClient {
    async fn page_of<T: Entity>(&self, filters: &Filters) -> Result<PageResponse<T>, ApiError> {
        let page = self.list_page(T::RESOURCE, filters).await?;
        Ok(PageResponse {
            count:    page.count,
            next:     page.next,
            previous: page.previous,
            results:  decode_all(page.results)?,
        })
    }

    async fn all_of<T: Entity>(&self, filters: &Filters) -> Result<Vec<T>, ApiError> {
        decode_all(self.list_all(T::RESOURCE, filters).await?)
    }

    async fn one_of<T: Entity>(&self, id: Uuid) -> Result<T, ApiError> {
        let record = self.get(T::RESOURCE, &id.to_string()).await?;
        Ok(serde_json::from_value(record)?)
    }

    async fn create_one<T: Entity>(&self, entity: &T) -> Result<T, ApiError> {
        let body = serde_json::to_value(entity)?;
        let record = self.create(T::RESOURCE, &body).await?;
        Ok(serde_json::from_value(record)?)
    }

    async fn update_one<T: Entity>(&self, id: Uuid, entity: &T) -> Result<T, ApiError> {
        let body = serde_json::to_value(entity)?;
        let record = self.update(T::RESOURCE, &id.to_string(), &body).await?;
        Ok(serde_json::from_value(record)?)
    }

    async fn delete_one<T: Entity>(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(T::RESOURCE, &id.to_string()).await
    }
}

impl<C: RecordClient + ?Sized> EntityClient for C {}

fn decode_all<T: Entity>(records: Vec<Record>) -> Result<Vec<T>, ApiError> {
    records
        .into_iter()
        .map(|record| serde_json::from_value(record).map_err(ApiError::from))
        .collect()
}
