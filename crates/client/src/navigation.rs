//! # ロール別メニュー
//!
//! ロールごとに固定のサイドメニューを持つ。ロールが不明または未設定のときは
//! 生徒のメニューを使う。

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// ユーザーのロール
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Teacher,
    Student,
    Parent,
    Accountant,
    TransportManager,
}

/// メニュー項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path:  &'static str,
}

const fn item(label: &'static str, path: &'static str) -> MenuItem {
    MenuItem { label, path }
}

const SUPER_ADMIN_MENU: &[MenuItem] = &[
    item("Dashboard", "/dashboard"),
    item("Users", "/users"),
    item("Schools", "/schools"),
    item("Academic Years", "/academic-years"),
    item("Audit Logs", "/audit-logs"),
];

const ADMIN_MENU: &[MenuItem] = &[
    item("Dashboard", "/dashboard"),
    item("Classes", "/classes"),
    item("Students", "/students"),
    item("Staff", "/staff"),
    item("Fees", "/fees"),
    item("Exams", "/exams"),
    item("Transport", "/transport"),
    item("Reports", "/reports"),
];

const TEACHER_MENU: &[MenuItem] = &[
    item("Dashboard", "/dashboard"),
    item("My Classes", "/my-classes"),
    item("Attendance", "/attendance"),
    item("Marks", "/marks"),
    item("Homework", "/homework"),
    item("Class Diary", "/class-diary"),
];

const STUDENT_MENU: &[MenuItem] = &[
    item("Dashboard", "/dashboard"),
    item("My Profile", "/profile"),
    item("Attendance", "/attendance"),
    item("Results", "/results"),
    item("Homework", "/homework"),
    item("Library", "/library"),
];

const PARENT_MENU: &[MenuItem] = &[
    item("Dashboard", "/dashboard"),
    item("My Children", "/my-children"),
    item("Fees", "/fees"),
    item("Attendance", "/attendance"),
    item("Results", "/results"),
];

const ACCOUNTANT_MENU: &[MenuItem] = &[
    item("Dashboard", "/dashboard"),
    item("Fees", "/fees"),
    item("Invoices", "/invoices"),
    item("Payroll", "/payroll"),
    item("Reports", "/reports"),
];

const TRANSPORT_MANAGER_MENU: &[MenuItem] = &[
    item("Dashboard", "/dashboard"),
    item("Routes", "/routes"),
    item("Vehicles", "/vehicles"),
    item("Drivers", "/drivers"),
    item("Attendance", "/transport-attendance"),
];

/// ロールのメニューを返す
pub fn menu_for(role: Option<Role>) -> &'static [MenuItem] {
    match role {
        Some(Role::SuperAdmin) => SUPER_ADMIN_MENU,
        Some(Role::Admin) => ADMIN_MENU,
        Some(Role::Teacher) => TEACHER_MENU,
        Some(Role::Parent) => PARENT_MENU,
        Some(Role::Accountant) => ACCOUNTANT_MENU,
        Some(Role::TransportManager) => TRANSPORT_MANAGER_MENU,
        Some(Role::Student) | None => STUDENT_MENU,
    }
}
