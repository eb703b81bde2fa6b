//! # リソースとエンドポイントの対応表
//!
//! 論理リソース名（`students` など）と操作から、REST のパステンプレートと
//! HTTP メソッドを引く固定の対応表。
//!
//! ## 基本エンドポイント
//!
//! | 操作 | メソッド | パス |
//! |------|---------|------|
//! | list-page / list-all | `GET` | `{collection}` |
//! | get-one | `GET` | `{collection}{id}/` |
//! | create | `POST` | `{collection}` |
//! | update | `PUT` | `{collection}{id}/` |
//! | delete | `DELETE` | `{collection}{id}/`（`users` と `students` のみ） |
//!
//! パスはベース URL からの相対パスで、末尾の `/` はサーバーが要求するため省略しない。
//! `{id}` はパスセグメント単位でエンコードして埋め込む。

use reqwest::Method;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use url::Url;

use crate::error::ApiError;

/// ID の置換位置
pub const ID_PLACEHOLDER: &str = "{id}";

/// 論理リソース
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Resource {
    Users,
    AcademicYears,
    Schools,
    Classes,
    Subjects,
    Students,
    Parents,
    Staff,
    Attendance,
    FeeStructures,
    FeePayments,
    Exams,
    Marks,
    Results,
    TransportRoutes,
    Vehicles,
    Homework,
    Notifications,
    LibraryBooks,
    Complaints,
    Certificates,
}

/// リソースに対する基本操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    ListPage,
    ListAll,
    Get,
    Create,
    Update,
    Delete,
}

/// HTTP メソッドとパステンプレートの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method:   Method,
    pub template: String,
}

impl Endpoint {
    fn new(method: Method, template: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
        }
    }

    /// ベース URL にパスを積み、ID を埋め込んだ URL を返す
    ///
    /// ID は 1 つのパスセグメントとしてパーセントエンコードされるため、
    /// `/` `?` `#` を含んでもコレクションの外には出ない。
    /// 空・`.`・`..` の ID とテンプレートが要求する ID の欠落は `InvalidUrl`。
    pub fn url(&self, base: &Url, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(format!("パスを持てない URL です: {base}")))?;
            segments.pop_if_empty();
            for part in self.template.split('/') {
                if part == ID_PLACEHOLDER {
                    segments.push(checked_id(id)?);
                } else {
                    segments.push(part);
                }
            }
        }
        Ok(url)
    }
}

fn checked_id(id: Option<&str>) -> Result<&str, ApiError> {
    match id {
        None => Err(ApiError::InvalidUrl("ID が指定されていません".to_string())),
        Some(id) if matches!(id, "" | "." | "..") => {
            Err(ApiError::InvalidUrl(format!("ID として使えない値です: {id:?}")))
        }
        Some(id) => Ok(id),
    }
}

impl Resource {
    /// コレクションのパス
    pub fn collection_path(self) -> &'static str {
        match self {
            Resource::Users => "users/",
            Resource::AcademicYears => "academic-years/",
            Resource::Schools => "schools/",
            Resource::Classes => "classes/",
            Resource::Subjects => "subjects/",
            Resource::Students => "students/",
            Resource::Parents => "parents/",
            Resource::Staff => "staff/",
            Resource::Attendance => "attendance/",
            Resource::FeeStructures => "fee-structures/",
            Resource::FeePayments => "fee-payments/",
            Resource::Exams => "exams/",
            Resource::Marks => "marks/",
            Resource::Results => "results/",
            Resource::TransportRoutes => "transport-routes/",
            Resource::Vehicles => "vehicles/",
            Resource::Homework => "homework/",
            Resource::Notifications => "notifications/",
            Resource::LibraryBooks => "library-books/",
            Resource::Complaints => "complaints/",
            Resource::Certificates => "certificates/",
        }
    }

    /// 操作を提供しているか
    pub fn supports(self, operation: Operation) -> bool {
        match operation {
            Operation::ListPage | Operation::ListAll | Operation::Get => true,
            // 成績はサーバー側で算出されるため読み取り専用
            Operation::Create | Operation::Update => self != Resource::Results,
            Operation::Delete => matches!(self, Resource::Users | Resource::Students),
        }
    }

    /// 操作に対応するエンドポイント
    ///
    /// 提供していない操作は `None`。
    pub fn endpoint(self, operation: Operation) -> Option<Endpoint> {
        if !self.supports(operation) {
            return None;
        }

        let collection = self.collection_path();
        let member = format!("{collection}{ID_PLACEHOLDER}/");

        let endpoint = match operation {
            Operation::ListPage | Operation::ListAll => Endpoint::new(Method::GET, collection),
            Operation::Get => Endpoint::new(Method::GET, member),
            Operation::Create => Endpoint::new(Method::POST, collection),
            Operation::Update => Endpoint::new(Method::PUT, member),
            Operation::Delete => Endpoint::new(Method::DELETE, member),
        };
        Some(endpoint)
    }
}

/// リソース固有のアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceAction {
    /// ログイン中ユーザーのプロフィール
    UserProfile,
    /// 生徒の出欠記録
    StudentAttendance,
    /// 生徒の学費明細
    StudentFeeDetails,
    /// 出欠の一括登録
    BulkMarkAttendance,
    /// 現在の学年度
    ActiveAcademicYear,
    /// 支払期限切れの学費
    OverduePayments,
    /// 試験結果の公開
    PublishExamResults,
    /// 点数の一括登録
    BulkUploadMarks,
    /// 未読のお知らせ
    UnreadNotifications,
}

impl ResourceAction {
    /// アクションが属するリソース
    pub fn resource(self) -> Resource {
        match self {
            ResourceAction::UserProfile => Resource::Users,
            ResourceAction::StudentAttendance | ResourceAction::StudentFeeDetails => {
                Resource::Students
            }
            ResourceAction::BulkMarkAttendance => Resource::Attendance,
            ResourceAction::ActiveAcademicYear => Resource::AcademicYears,
            ResourceAction::OverduePayments => Resource::FeePayments,
            ResourceAction::PublishExamResults => Resource::Exams,
            ResourceAction::BulkUploadMarks => Resource::Marks,
            ResourceAction::UnreadNotifications => Resource::Notifications,
        }
    }

    pub fn endpoint(self) -> Endpoint {
        let collection = self.resource().collection_path();
        let (method, suffix) = match self {
            ResourceAction::UserProfile => (Method::GET, "profile/"),
            ResourceAction::StudentAttendance => (Method::GET, "{id}/attendance/"),
            ResourceAction::StudentFeeDetails => (Method::GET, "{id}/fee_details/"),
            ResourceAction::BulkMarkAttendance => (Method::POST, "bulk_mark/"),
            ResourceAction::ActiveAcademicYear => (Method::GET, "active_year/"),
            ResourceAction::OverduePayments => (Method::GET, "overdue/"),
            ResourceAction::PublishExamResults => (Method::POST, "{id}/publish_results/"),
            ResourceAction::BulkUploadMarks => (Method::POST, "bulk_upload/"),
            ResourceAction::UnreadNotifications => (Method::GET, "unread/"),
        };
        Endpoint::new(method, format!("{collection}{suffix}"))
    }
}
