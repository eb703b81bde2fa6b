//! 生徒関連のクライアント

use async_trait::async_trait;
use edudesk_shared::ListBody;
use uuid::Uuid;

use super::client_impl::SchoolApiClient;
use crate::{
    error::ApiError,
    query::Filters,
    resource::ResourceAction,
    types::{AttendanceRecord, FeePayment},
};

/// 生徒関連のクライアントトレイト
#[async_trait]
pub trait StudentClient: Send + Sync {
    /// 生徒の出欠記録を取得する
    ///
    /// `GET students/{id}/attendance/` を呼び出す。
    async fn student_attendance(&self, student_id: Uuid)
    -> Result<Vec<AttendanceRecord>, ApiError>;

    /// 生徒の学費明細を取得する
    ///
    /// `GET students/{id}/fee_details/` を呼び出す。
    async fn student_fee_details(&self, student_id: Uuid) -> Result<Vec<FeePayment>, ApiError>;
}

#[async_trait]
impl StudentClient for SchoolApiClient {
    async fn student_attendance(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        let endpoint = ResourceAction::StudentAttendance.endpoint();
        let id = student_id.to_string();
        let body: ListBody<AttendanceRecord> = self
            .http
            .call(&endpoint, Some(&id), &Filters::new(), None)
            .await?;
        Ok(body.into_items())
    }

    async fn student_fee_details(&self, student_id: Uuid) -> Result<Vec<FeePayment>, ApiError> {
        let endpoint = ResourceAction::StudentFeeDetails.endpoint();
        let id = student_id.to_string();
        let body: ListBody<FeePayment> = self
            .http
            .call(&endpoint, Some(&id), &Filters::new(), None)
            .await?;
        Ok(body.into_items())
    }
}
