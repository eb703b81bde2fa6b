//! 学年度・出欠・試験・点数のクライアント

use async_trait::async_trait;
use edudesk_shared::ListBody;
use uuid::Uuid;

use super::client_impl::SchoolApiClient;
use crate::{
    error::ApiError,
    query::Filters,
    resource::ResourceAction,
    types::{
        AcademicYear,
        AttendanceRecord,
        BulkAttendanceRequest,
        BulkMarksRequest,
        Mark,
        PublishResultsResponse,
    },
};

/// 学年度・出欠・試験・点数のクライアントトレイト
#[async_trait]
pub trait AcademicClient: Send + Sync {
    /// 現在の学年度を取得する
    ///
    /// `GET academic-years/active_year/` を呼び出す。
    /// 有効な学年度が無い場合は `NotFound`。
    async fn active_academic_year(&self) -> Result<AcademicYear, ApiError>;

    /// 出欠を一括登録する
    ///
    /// `POST attendance/bulk_mark/` に `{records: [...]}` を送り、登録されたレコードを返す。
    async fn bulk_mark_attendance(
        &self,
        records: &[AttendanceRecord],
    ) -> Result<Vec<AttendanceRecord>, ApiError>;

    /// 試験結果を公開する
    ///
    /// `POST exams/{id}/publish_results/` を呼び出す。
    async fn publish_exam_results(
        &self,
        exam_id: Uuid,
    ) -> Result<PublishResultsResponse, ApiError>;

    /// 点数を一括登録する
    ///
    /// `POST marks/bulk_upload/` に `{marks: [...]}` を送り、登録されたレコードを返す。
    async fn bulk_upload_marks(&self, marks: &[Mark]) -> Result<Vec<Mark>, ApiError>;
}

#[async_trait]
impl AcademicClient for SchoolApiClient {
    async fn active_academic_year(&self) -> Result<AcademicYear, ApiError> {
        let endpoint = ResourceAction::ActiveAcademicYear.endpoint();
        self.http.call(&endpoint, None, &Filters::new(), None).await
    }

    async fn bulk_mark_attendance(
        &self,
        records: &[AttendanceRecord],
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        let endpoint = ResourceAction::BulkMarkAttendance.endpoint();
        let body = serde_json::to_value(BulkAttendanceRequest { records })?;
        let created: ListBody<AttendanceRecord> = self
            .http
            .call(&endpoint, None, &Filters::new(), Some(&body))
            .await?;
        Ok(created.into_items())
    }

    async fn publish_exam_results(
        &self,
        exam_id: Uuid,
    ) -> Result<PublishResultsResponse, ApiError> {
        let endpoint = ResourceAction::PublishExamResults.endpoint();
        let id = exam_id.to_string();
        self.http
            .call(&endpoint, Some(&id), &Filters::new(), None)
            .await
    }

    async fn bulk_upload_marks(&self, marks: &[Mark]) -> Result<Vec<Mark>, ApiError> {
        let endpoint = ResourceAction::BulkUploadMarks.endpoint();
        let body = serde_json::to_value(BulkMarksRequest { marks })?;
        let created: ListBody<Mark> = self
            .http
            .call(&endpoint, None, &Filters::new(), Some(&body))
            .await?;
        Ok(created.into_items())
    }
}
