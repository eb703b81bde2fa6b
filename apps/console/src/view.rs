//! # 表示
//!
//! 取得結果を標準出力向けのテキスト表に整形する。
//! ログは標準エラー出力に出るため、ここで作る文字列だけが標準出力に載る。

use std::fmt::Write as _;

use edudesk_client::{
    MenuItem,
    dashboard::{DashboardStats, StudentOverview},
    types::{FeePayment, Record, Student, User},
};
use serde_json::Value;

/// 表の 1 列に出す最大文字数
const MAX_CELL_WIDTH: usize = 40;

/// 見出しと行から表を作る
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| display_width(cell))
                .chain(std::iter::once(display_width(header)))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let mut out = String::new();
    push_row(&mut out, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| pad(&truncate(cell, *width), *width))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

fn truncate(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(fill))
}

/// JSON 値を表のセルにする
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => format!("[{}]", items.len()),
        Value::Object(_) => "{…}".to_string(),
    }
}

/// 型を持たないレコードの表
///
/// 列は最初のレコードのキー順。ネストした値は要約して出す。
pub fn records(records: &[Record]) -> String {
    let Some(Value::Object(first)) = records.first() else {
        return "(0 件)\n".to_string();
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|key| record.get(*key).map(cell).unwrap_or_else(|| "-".to_string()))
                .collect()
        })
        .collect();

    let mut out = table(&headers, &rows);
    let _ = writeln!(out, "({} 件)", records.len());
    out
}

/// 1 件のレコードを `key: value` で出す
pub fn record(record: &Record) -> String {
    match record {
        Value::Object(map) => {
            let width = map.keys().map(|k| display_width(k)).max().unwrap_or(0);
            map.iter()
                .map(|(key, value)| format!("{}: {}\n", pad(key, width), cell(value)))
                .collect()
        }
        other => format!("{}\n", cell(other)),
    }
}

/// 生徒一覧
pub fn students(students: &[Student]) -> String {
    let rows: Vec<Vec<String>> = students
        .iter()
        .map(|s| {
            vec![
                s.display_name(),
                s.roll_number.clone(),
                s.admission_number.clone(),
                s.class_name.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    let mut out = table(&["Name", "Roll Number", "Admission Number", "Class"], &rows);
    let _ = writeln!(out, "({} 件)", students.len());
    out
}

/// 学費の一覧
pub fn payments(payments: &[FeePayment]) -> String {
    let rows: Vec<Vec<String>> = payments
        .iter()
        .map(|p| {
            vec![
                p.student_name.clone().unwrap_or_else(|| p.student.to_string()),
                p.amount_due.to_string(),
                p.amount_paid.to_string(),
                p.status.clone(),
                p.due_date.to_string(),
            ]
        })
        .collect();

    table(&["Student", "Due", "Paid", "Status", "Due Date"], &rows)
}

/// ダッシュボード
pub fn dashboard(user: Option<&User>, stats: &DashboardStats) -> String {
    let mut out = String::new();
    let name = user
        .map(|u| {
            if u.first_name.is_empty() {
                "User".to_string()
            } else {
                u.first_name.clone()
            }
        })
        .unwrap_or_else(|| "User".to_string());
    let _ = writeln!(out, "Welcome, {name}");
    let _ = writeln!(out);
    out.push_str(&table(
        &["Total Students", "Total Staff", "Total Classes", "Overdue Payments"],
        &[vec![
            stats.students.to_string(),
            stats.staff.to_string(),
            stats.classes.to_string(),
            format!("{:.2}", stats.overdue_total),
        ]],
    ));
    for (branch, error) in &stats.failures {
        let _ = writeln!(out, "! {branch} を取得できませんでした: {error}");
    }
    out
}

/// 生徒の概要
pub fn student_overview(overview: &StudentOverview) -> String {
    let student = &overview.student;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", student.display_name(), student.admission_number);
    let _ = writeln!(
        out,
        "Roll Number: {}  Class: {}",
        student.roll_number,
        student.class_name.as_deref().unwrap_or("-")
    );

    let present = overview
        .attendance
        .iter()
        .filter(|a| a.status == "PRESENT")
        .count();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Attendance: {present}/{} present",
        overview.attendance.len()
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Fees:");
    out.push_str(&payments(&overview.fees));
    out
}

/// メニュー
pub fn menu(items: &[MenuItem]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| vec![item.label.to_string(), item.path.to_string()])
        .collect();
    table(&["Menu", "Path"], &rows)
}

/// ユーザー情報
pub fn user(user: &User) -> String {
    format!(
        "{} ({})\nrole: {}\nemail: {}\n",
        user.display_name(),
        user.username,
        user.role.as_deref().unwrap_or("-"),
        if user.email.is_empty() { "-" } else { &user.email }
    )
}

#[cfg(test)]
mod tests {
    use edudesk_client::{Role, menu_for};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_表の列幅をそろえる() {
        let out = table(
            &["Name", "Class"],
            &[
                vec!["Asha Rao".to_string(), "7B".to_string()],
                vec!["Li".to_string(), "10A".to_string()],
            ],
        );

        assert_eq!(
            out,
            "Name      Class\n--------  -----\nAsha Rao  7B\nLi        10A\n"
        );
    }

    #[test]
    fn test_長いセルは省略する() {
        let long = "x".repeat(60);

        let out = table(&["Remarks"], &[vec![long]]);

        let last = out.lines().last().unwrap();
        assert_eq!(last.chars().count(), MAX_CELL_WIDTH);
        assert!(last.ends_with('…'));
    }

    #[test]
    fn test_レコードの表は最初のキー順で列を作る() {
        let out = records(&[
            json!({ "name": "Bus 1", "capacity": 40, "route": null }),
            json!({ "name": "Bus 2", "capacity": 32, "route": "r1" }),
        ]);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0].split_whitespace().collect::<Vec<_>>(),
            vec!["capacity", "name", "route"]
        );
        assert!(lines[2].contains("40"));
        assert!(lines[2].contains('-'));
        assert_eq!(lines.last().copied(), Some("(2 件)"));
    }

    #[test]
    fn test_空のレコードは0件と出す() {
        assert_eq!(records(&[]), "(0 件)\n");
    }

    #[test]
    fn test_ネストした値は要約する() {
        assert_eq!(cell(&json!([1, 2, 3])), "[3]");
        assert_eq!(cell(&json!({ "a": 1 })), "{…}");
        assert_eq!(cell(&json!(null)), "-");
    }

    #[test]
    fn test_メニューはラベルとパスを出す() {
        let out = menu(menu_for(Some(Role::Accountant)));

        assert!(out.contains("Payroll"));
        assert!(out.contains("/invoices"));
    }

    #[test]
    fn test_ダッシュボードは失敗した取得を知らせる() {
        let stats = DashboardStats {
            students:      3,
            staff:         0,
            classes:       1,
            overdue_total: 1750.5,
            failures:      vec![("staff", "権限がありません: no".to_string())],
        };

        let out = dashboard(None, &stats);

        assert!(out.starts_with("Welcome, User"));
        assert!(out.contains("1750.50"));
        assert!(out.contains("! staff を取得できませんでした"));
    }
}
