//! # 学校管理 API のレコード型
//!
//! 各リソースのシリアライザのフィールドに合わせた DTO。
//!
//! - ID はすべて UUID
//! - サーバーが計算する読み取り専用フィールド（`student_name` など）は受け取るが送らない
//! - 金額などの小数は文字列（`"1500.00"`）で届くため [`Decimal`] で受ける

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned};
use uuid::Uuid;

use crate::{navigation::Role, resource::Resource};

/// 型を持たないレコード
pub type Record = serde_json::Value;

/// リソースと結びついたレコード型
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const RESOURCE: Resource;
}

macro_rules! entity {
    ($($ty:ty => $resource:ident),+ $(,)?) => {
        $(
            impl Entity for $ty {
                const RESOURCE: Resource = Resource::$resource;
            }
        )+
    };
}

entity! {
    User => Users,
    AcademicYear => AcademicYears,
    School => Schools,
    SchoolClass => Classes,
    Subject => Subjects,
    Student => Students,
    Parent => Parents,
    Staff => Staff,
    AttendanceRecord => Attendance,
    FeeStructure => FeeStructures,
    FeePayment => FeePayments,
    Exam => Exams,
    Mark => Marks,
    ExamResult => Results,
    TransportRoute => TransportRoutes,
    Vehicle => Vehicles,
    Homework => Homework,
    Notification => Notifications,
    LibraryBook => LibraryBooks,
    Complaint => Complaints,
    Certificate => Certificates,
}

// --- 小数 ---

/// 10 進小数
///
/// サーバーは小数を文字列で返すため、受け取った表記をそのまま保持し、
/// 送信時も同じ表記で返す。数値で届いた場合も受け付ける。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal(String);

impl Decimal {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 集計用の浮動小数点値（解析できなければ `None`）
    pub fn to_f64(&self) -> Option<f64> {
        self.0.trim().parse().ok()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Decimal(text),
            Raw::Number(number) => Decimal(number.to_string()),
        })
    }
}

// --- ユーザー・学校 ---

/// ユーザー（プロフィールを含む）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:         Option<Uuid>,
    pub username:   String,
    #[serde(default)]
    pub email:      String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name:  String,
    #[serde(default)]
    pub role:       Option<String>,
    #[serde(default)]
    pub phone:      Option<String>,
    #[serde(default = "default_true")]
    pub is_active:  bool,
}

impl User {
    /// ロール（不明な値は `None`）
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    /// 表示名（姓名が無ければユーザー名）
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicYear {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:         Option<Uuid>,
    pub name:       String,
    pub start_date: NaiveDate,
    pub end_date:   NaiveDate,
    #[serde(default)]
    pub is_active:  bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct School {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:          Option<Uuid>,
    pub name:        String,
    pub code:        String,
    #[serde(default)]
    pub address:     Option<String>,
    #[serde(default)]
    pub city:        Option<String>,
    #[serde(default)]
    pub state:       Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub phone:       Option<String>,
    #[serde(default)]
    pub email:       Option<String>,
    #[serde(default)]
    pub website:     Option<String>,
}

/// クラス（`class` は予約語のため `SchoolClass`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolClass {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:                 Option<Uuid>,
    pub name:               String,
    pub class_number:       i32,
    #[serde(default)]
    pub section:            Option<String>,
    pub academic_year:      Uuid,
    #[serde(default, skip_serializing)]
    pub academic_year_name: Option<String>,
    #[serde(default)]
    pub class_teacher:      Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub class_teacher_name: Option<String>,
    #[serde(default)]
    pub capacity:           Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:          Option<Uuid>,
    pub name:        String,
    pub code:        String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub max_marks:   Option<i32>,
    #[serde(default)]
    pub pass_marks:  Option<i32>,
}

// --- 生徒・保護者・職員 ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:               Option<Uuid>,
    pub user:             Uuid,
    #[serde(default, skip_serializing)]
    pub user_info:        Option<User>,
    pub roll_number:      String,
    pub admission_number: String,
    pub admission_date:   NaiveDate,
    #[serde(default)]
    pub current_class:    Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub class_name:       Option<String>,
    pub date_of_birth:    NaiveDate,
    pub gender:           String,
    #[serde(default)]
    pub father_name:      Option<String>,
    #[serde(default)]
    pub mother_name:      Option<String>,
}

impl Student {
    /// 表示名（ユーザー情報が無ければ学籍番号）
    pub fn display_name(&self) -> String {
        self.user_info
            .as_ref()
            .map(User::display_name)
            .unwrap_or_else(|| self.admission_number.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:           Option<Uuid>,
    pub user:         Uuid,
    #[serde(default, skip_serializing)]
    pub user_info:    Option<User>,
    #[serde(default)]
    pub occupation:   Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub address:      Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:              Option<Uuid>,
    pub user:            Uuid,
    #[serde(default, skip_serializing)]
    pub user_info:       Option<User>,
    pub employee_id:     String,
    pub designation:     String,
    #[serde(default)]
    pub department:      Option<String>,
    #[serde(default)]
    pub qualification:   Option<String>,
    pub date_of_joining: NaiveDate,
    #[serde(default)]
    pub salary:          Option<Decimal>,
}

// --- 出欠・学費 ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:           Option<Uuid>,
    pub student:      Uuid,
    #[serde(default, skip_serializing)]
    pub student_name: Option<String>,
    pub date:         NaiveDate,
    pub status:       String,
    #[serde(default)]
    pub subject:      Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub subject_name: Option<String>,
    #[serde(default)]
    pub remarks:      Option<String>,
}

/// 出欠一括登録のリクエストボディ
#[derive(Debug, Serialize)]
pub struct BulkAttendanceRequest<'a> {
    pub records: &'a [AttendanceRecord],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeStructure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:            Option<Uuid>,
    pub academic_year: Uuid,
    pub class_obj:     Uuid,
    #[serde(default, skip_serializing)]
    pub class_name:    Option<String>,
    pub fee_type:      String,
    pub amount:        Decimal,
    pub frequency:     String,
    pub due_date:      NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeePayment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:             Option<Uuid>,
    pub student:        Uuid,
    #[serde(default, skip_serializing)]
    pub student_name:   Option<String>,
    pub amount_due:     Decimal,
    pub amount_paid:    Decimal,
    pub status:         String,
    pub due_date:       NaiveDate,
    #[serde(default)]
    pub payment_date:   Option<NaiveDate>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

// --- 試験 ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:                    Option<Uuid>,
    pub name:                  String,
    #[serde(default)]
    pub description:           Option<String>,
    pub exam_type:             String,
    pub academic_year:         Uuid,
    pub start_date:            NaiveDate,
    pub end_date:              NaiveDate,
    #[serde(default)]
    pub result_published_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_published:          bool,
}

/// 試験結果公開のレスポンス
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublishResultsResponse {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:             Option<Uuid>,
    pub exam_schedule:  Uuid,
    pub student:        Uuid,
    #[serde(default, skip_serializing)]
    pub student_name:   Option<String>,
    #[serde(default)]
    pub marks_obtained: Option<Decimal>,
    #[serde(default)]
    pub is_absent:      bool,
    #[serde(default, skip_serializing)]
    pub subject_name:   Option<String>,
}

/// 点数一括登録のリクエストボディ
#[derive(Debug, Serialize)]
pub struct BulkMarksRequest<'a> {
    pub marks: &'a [Mark],
}

/// 試験の成績（サーバー側で算出、読み取り専用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:                   Option<Uuid>,
    pub exam:                 Uuid,
    pub student:              Uuid,
    #[serde(default, skip_serializing)]
    pub student_name:         Option<String>,
    pub total_marks_obtained: Decimal,
    pub total_marks:          i32,
    pub percentage:           Decimal,
    #[serde(default)]
    pub grade:                Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub grade_name:           Option<String>,
    #[serde(default)]
    pub is_passed:            bool,
    #[serde(default)]
    pub rank:                 Option<i32>,
}

// --- 通学 ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportRoute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:             Option<Uuid>,
    pub route_number:   String,
    pub name:           String,
    pub starting_point: String,
    pub ending_point:   String,
    pub distance:       Decimal,
    pub route_fee:      Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:                  Option<Uuid>,
    pub registration_number: String,
    pub vehicle_type:        String,
    #[serde(default)]
    pub model:               Option<String>,
    pub capacity:            i32,
    #[serde(default)]
    pub route:               Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub route_name:          Option<String>,
    #[serde(default = "default_true")]
    pub is_active:           bool,
}

// --- 連絡・図書 ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Homework {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:           Option<Uuid>,
    pub subject:      Uuid,
    #[serde(default, skip_serializing)]
    pub subject_name: Option<String>,
    pub class_obj:    Uuid,
    #[serde(default, skip_serializing)]
    pub class_name:   Option<String>,
    #[serde(default)]
    pub teacher:      Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub teacher_name: Option<String>,
    pub title:        String,
    #[serde(default)]
    pub description:  Option<String>,
    pub due_date:     NaiveDate,
    #[serde(default)]
    pub marks:        i32,
    #[serde(default = "default_true")]
    pub is_active:    bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:                Option<Uuid>,
    pub title:             String,
    pub message:           String,
    pub notification_type: String,
    #[serde(default)]
    pub sender:            Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub sender_name:       Option<String>,
    #[serde(default, skip_serializing)]
    pub sent_date:         Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_read:           bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:               Option<Uuid>,
    pub title:            String,
    pub isbn:             String,
    pub author:           String,
    #[serde(default)]
    pub publisher:        Option<String>,
    #[serde(default)]
    pub category:         Option<String>,
    pub total_copies:     i32,
    pub available_copies: i32,
    pub publication_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:               Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub complaint_id:     Option<String>,
    #[serde(default)]
    pub complainant:      Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub complainant_name: Option<String>,
    pub complaint_type:   String,
    pub title:            String,
    #[serde(default)]
    pub status:           Option<String>,
    #[serde(default)]
    pub priority:         Option<String>,
    #[serde(default, skip_serializing)]
    pub filed_date:       Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_date:    Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:                 Option<Uuid>,
    pub student:            Uuid,
    #[serde(default, skip_serializing)]
    pub student_name:       Option<String>,
    pub certificate_type:   String,
    pub certificate_number: String,
    pub issue_date:         NaiveDate,
    #[serde(default)]
    pub valid_until:        Option<NaiveDate>,
}

// --- 認証 ---

/// トークン発行リクエスト
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// トークン発行レスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token:   String,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decimalは文字列と数値の両方を受け付ける() {
        let text: Decimal = serde_json::from_value(json!("1500.50")).unwrap();
        let number: Decimal = serde_json::from_value(json!(42)).unwrap();

        assert_eq!(text.as_str(), "1500.50");
        assert_eq!(text.to_f64(), Some(1500.5));
        assert_eq!(number.to_f64(), Some(42.0));
    }

    #[test]
    fn test_decimalは受け取った表記のまま送る() {
        let value = serde_json::to_value(Decimal::new("10.00")).unwrap();

        assert_eq!(value, json!("10.00"));
    }

    #[test]
    fn test_生徒の読み取り専用フィールドは送信しない() {
        let student: Student = serde_json::from_value(json!({
            "id": "6f1c2d1e-8a4b-4c55-9d3f-0c2a7b9e1f10",
            "user": "0b6e1a52-3a57-4e1c-8f64-1b0b8f3b7a11",
            "user_info": { "username": "asha", "first_name": "Asha", "last_name": "Rao" },
            "roll_number": "12",
            "admission_number": "ADM-001",
            "admission_date": "2024-04-01",
            "current_class": null,
            "class_name": "7B",
            "date_of_birth": "2012-05-17",
            "gender": "F",
            "father_name": null,
            "mother_name": null
        }))
        .unwrap();

        assert_eq!(student.display_name(), "Asha Rao");
        assert_eq!(student.class_name.as_deref(), Some("7B"));

        let body = serde_json::to_value(&student).unwrap();
        assert!(body.get("user_info").is_none());
        assert!(body.get("class_name").is_none());
        assert_eq!(body["admission_number"], json!("ADM-001"));
    }

    #[test]
    fn test_未保存のレコードはidを送らない() {
        let subject = Subject {
            name: "Mathematics".to_string(),
            code: "MATH".to_string(),
            ..Default::default()
        };

        let body = serde_json::to_value(&subject).unwrap();

        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_ユーザーのロールを解釈する() {
        let user: User = serde_json::from_value(json!({
            "id": "0b6e1a52-3a57-4e1c-8f64-1b0b8f3b7a11",
            "username": "accounts",
            "email": "accounts@example.com",
            "first_name": "",
            "last_name": "",
            "role": "ACCOUNTANT",
            "phone": null,
            "is_active": true
        }))
        .unwrap();

        assert_eq!(user.role(), Some(Role::Accountant));
        assert_eq!(user.display_name(), "accounts");
    }

    #[test]
    fn test_未知のロールはnoneになる() {
        let user = User {
            username: "x".to_string(),
            role: Some("JANITOR".to_string()),
            ..Default::default()
        };

        assert_eq!(user.role(), None);
    }

    #[test]
    fn test_学費支払いをデシリアライズする() {
        let payment: FeePayment = serde_json::from_value(json!({
            "id": "3c1b4f8e-2b7d-4a6e-9a51-7d5e2c1f0a22",
            "student": "6f1c2d1e-8a4b-4c55-9d3f-0c2a7b9e1f10",
            "student_name": "Asha Rao",
            "amount_due": "2500.00",
            "amount_paid": "0.00",
            "status": "PENDING",
            "due_date": "2024-06-30",
            "payment_date": null,
            "payment_method": null,
            "transaction_id": null
        }))
        .unwrap();

        assert_eq!(payment.amount_due.to_f64(), Some(2500.0));
        assert_eq!(payment.due_date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }
}
