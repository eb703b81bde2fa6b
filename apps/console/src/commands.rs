//! サブコマンドの実行

use std::{fs, io::IsTerminal as _, path::Path};

use anyhow::{Context as _, bail};
use edudesk_client::{
    AcademicClient,
    AuthClient,
    EntityClient,
    FeeClient,
    NotificationClient,
    RecordClient,
    SchoolApiClient,
    menu_for,
    dashboard::{load_dashboard, load_student_overview},
    types::{AttendanceRecord, Mark, Record, Student},
};
use serde_json::Value;

use crate::{
    cli::{Command, ListArgs},
    view,
};

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

impl Output {
    fn emit<T: serde::Serialize + ?Sized>(
        self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> anyhow::Result<()> {
        match self {
            Output::Json => println!("{}", serde_json::to_string_pretty(value)?),
            Output::Text => print!("{}", text()),
        }
        Ok(())
    }
}

/// コマンドを実行する
pub async fn run(api: &SchoolApiClient, command: Command, output: Output) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            let user = api.login(&username, &password).await?;
            output.emit(&user, || view::user(&user))
        }
        Command::Logout => {
            api.logout();
            output.emit(&Value::Null, || "ログアウトしました\n".to_string())
        }
        Command::Whoami => match api.session().user() {
            Some(user) => output.emit(&user, || view::user(&user)),
            None => output.emit(&Value::Null, || "未ログイン\n".to_string()),
        },
        Command::Menu => {
            let items = menu_for(api.session().role());
            output.emit(items, || view::menu(items))
        }
        Command::Dashboard => {
            let stats = load_dashboard(api).await;
            let user = api.session().user();
            output.emit(&stats, || view::dashboard(user.as_ref(), &stats))
        }
        Command::Students { list } => {
            let students: Vec<Student> = if list.all {
                api.all_of(&list.filters()).await?
            } else {
                api.page_of(&list.filters()).await?.results
            };
            output.emit(&students, || view::students(&students))
        }
        Command::Student { id } => {
            let overview = load_student_overview(api, id).await?;
            let summary = serde_json::json!({
                "student": overview.student,
                "attendance": overview.attendance,
                "fees": overview.fees,
            });
            output.emit(&summary, || view::student_overview(&overview))
        }
        Command::List { resource, list } => {
            let records = list_records(api, resource, &list).await?;
            output.emit(&records, || view::records(&records))
        }
        Command::Get { resource, id } => {
            let record = api.get(resource, &id).await?;
            output.emit(&record, || view::record(&record))
        }
        Command::Create { resource, data } => {
            let body = parse_body(&data)?;
            let record = api.create(resource, &body).await?;
            output.emit(&record, || view::record(&record))
        }
        Command::Update { resource, id, data } => {
            let body = parse_body(&data)?;
            let record = api.update(resource, &id, &body).await?;
            output.emit(&record, || view::record(&record))
        }
        Command::Delete { resource, id } => {
            api.delete(resource, &id).await?;
            output.emit(&Value::Null, || format!("{resource} {id} を削除しました\n"))
        }
        Command::Overdue => {
            let payments = api.overdue_payments().await?;
            output.emit(&payments, || view::payments(&payments))
        }
        Command::Notifications => {
            let notifications = api.unread_notifications().await?;
            let records: Vec<Record> = notifications
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<_, _>>()?;
            output.emit(&notifications, || view::records(&records))
        }
        Command::ActiveYear => {
            let year = api.active_academic_year().await?;
            let record = serde_json::to_value(&year)?;
            output.emit(&year, || view::record(&record))
        }
        Command::PublishResults { exam_id } => {
            let response = api.publish_exam_results(exam_id).await?;
            output.emit(&Value::String(response.status.clone()), || {
                format!("{}\n", response.status)
            })
        }
        Command::BulkAttendance { file } => {
            let records: Vec<AttendanceRecord> = read_json_file(&file)?;
            let created = api.bulk_mark_attendance(&records).await?;
            output.emit(&created, || format!("{} 件の出欠を登録しました\n", created.len()))
        }
        Command::BulkMarks { file } => {
            let marks: Vec<Mark> = read_json_file(&file)?;
            let created = api.bulk_upload_marks(&marks).await?;
            output.emit(&created, || format!("{} 件の点数を登録しました\n", created.len()))
        }
    }
}

async fn list_records(
    api: &SchoolApiClient,
    resource: edudesk_client::Resource,
    list: &ListArgs,
) -> anyhow::Result<Vec<Record>> {
    let filters = list.filters();
    let records = if list.all {
        api.list_all(resource, &filters).await?
    } else {
        api.list_page(resource, &filters).await?.results
    };
    Ok(records)
}

fn parse_body(data: &str) -> anyhow::Result<Record> {
    let body: Record = serde_json::from_str(data).context("--data は JSON で指定してください")?;
    if !body.is_object() {
        bail!("--data は JSON オブジェクトで指定してください");
    }
    Ok(body)
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("{} を読み込めません", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} の形式が不正です", path.display()))
}

/// 端末から読むときは入力が表示されることを知らせる
fn password_prompt(interactive: bool) -> &'static str {
    if interactive {
        "Password (入力は表示されます。非表示にするには EDUDESK_PASSWORD を使ってください): "
    } else {
        "Password: "
    }
}

fn read_password() -> anyhow::Result<String> {
    eprint!("{}", password_prompt(std::io::stdin().is_terminal()));
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("パスワードを読み込めません")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("パスワードが空です");
    }
    Ok(password)
}
