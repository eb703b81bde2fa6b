//! # ダッシュボードと複合取得
//!
//! - [`load_dashboard`]: 生徒・職員・クラスの全件と期限切れの学費を並行に取得する。
//!   各取得は失敗しても空の値に置き換わり、全体としては失敗しない。
//! - [`load_student_overview`]: 生徒、その出欠、その学費明細を順に取得する。
//!   最初の失敗で中断する。

use edudesk_shared::event_log::error::{category, kind};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{EntityClient, FeeClient, RecordClient, StudentClient},
    error::ApiError,
    query::Filters,
    resource::Resource,
    types::{AttendanceRecord, FeePayment, Student},
};

/// 失敗時に既定値へ置き換えた取得結果
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback<T> {
    pub value: T,
    /// 置き換えの原因（成功時は `None`）
    pub error: Option<String>,
}

impl<T: Default> Fallback<T> {
    /// 結果を受け取り、失敗なら既定値に置き換える
    pub fn from_result(branch: &'static str, result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Self { value, error: None },
            Err(e) => {
                tracing::warn!(
                    error.category = category::EXTERNAL_SERVICE,
                    error.kind = kind::DASHBOARD_BRANCH,
                    branch,
                    "ダッシュボードの取得に失敗したため空の値で続行: {}",
                    e
                );
                Self {
                    value: T::default(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

impl<T> Fallback<T> {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// ダッシュボードの集計値
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub students:      usize,
    pub staff:         usize,
    pub classes:       usize,
    /// 期限切れ学費の未納額合計
    pub overdue_total: f64,
    /// 空の値で置き換えた取得（取得名とエラー）
    pub failures:      Vec<(&'static str, String)>,
}

/// ダッシュボードの集計値を取得する
///
/// 4 つの取得を並行に発行し、すべての完了を待つ。
pub async fn load_dashboard<A>(api: &A) -> DashboardStats
where
    A: RecordClient + FeeClient + ?Sized,
{
    let all = Filters::new();
    let (students, staff, classes, overdue) = tokio::join!(
        api.list_all(Resource::Students, &all),
        api.list_all(Resource::Staff, &all),
        api.list_all(Resource::Classes, &all),
        api.overdue_payments(),
    );

    let students = Fallback::from_result("students", students);
    let staff = Fallback::from_result("staff", staff);
    let classes = Fallback::from_result("classes", classes);
    let overdue = Fallback::from_result("overdue_payments", overdue);

    let failures = [
        ("students", &students.error),
        ("staff", &staff.error),
        ("classes", &classes.error),
        ("overdue_payments", &overdue.error),
    ]
    .into_iter()
    .filter_map(|(branch, error)| error.clone().map(|e| (branch, e)))
    .collect();

    DashboardStats {
        students: students.value.len(),
        staff: staff.value.len(),
        classes: classes.value.len(),
        overdue_total: overdue_total(&overdue.value),
        failures,
    }
}

/// 未納額の合計（解析できない金額は 0 とみなす）
pub fn overdue_total(payments: &[FeePayment]) -> f64 {
    payments
        .iter()
        .filter_map(|p| p.amount_due.to_f64())
        .sum()
}

/// 生徒の概要
#[derive(Debug, Clone, PartialEq)]
pub struct StudentOverview {
    pub student:    Student,
    pub attendance: Vec<AttendanceRecord>,
    pub fees:       Vec<FeePayment>,
}

/// 生徒の概要を取得する
///
/// 生徒 → 出欠 → 学費明細の順に 1 つずつ取得し、最初の失敗で中断する。
pub async fn load_student_overview<A>(api: &A, student_id: Uuid) -> Result<StudentOverview, ApiError>
where
    A: RecordClient + StudentClient + ?Sized,
{
    let student: Student = api.one_of(student_id).await?;
    let attendance = api.student_attendance(student_id).await?;
    let fees = api.student_fee_details(student_id).await?;

    Ok(StudentOverview {
        student,
        attendance,
        fees,
    })
}
