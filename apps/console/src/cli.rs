//! コマンドライン引数の定義

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use edudesk_client::{Filters, Resource, Route};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "edudesk")]
#[command(about = "学校管理システムのコンソールクライアント")]
#[command(
    after_help = "Environment:\n  SCHOOL_API_URL      API のベース URL\n  SCHOOL_AUTH_SCHEME  認証スキーム（Token / Bearer）\n  SCHOOL_MAX_PAGES    全件取得のページ数上限（0 で無制限）\n  EDUDESK_TOKEN_PATH  トークンの保存先\n  EDUDESK_PASSWORD    login のパスワード（端末に表示せずに渡す）\n  LOG_FORMAT          json / pretty"
)]
pub struct Cli {
    /// 結果を JSON で出力する
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// ログを詳細にする
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// ログインする
    Login {
        #[arg(short, long)]
        username: String,
        /// 省略時は標準入力から 1 行読む（入力は端末に表示される）。
        /// 表示させずに渡すには環境変数 EDUDESK_PASSWORD を使う
        #[arg(short, long, env = "EDUDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// ログアウトする
    Logout,
    /// ログイン中のユーザーを表示する
    Whoami,
    /// ロールのメニューを表示する
    Menu,
    /// ダッシュボードの集計を表示する
    Dashboard,
    /// 生徒の一覧を表示する
    Students {
        #[command(flatten)]
        list: ListArgs,
    },
    /// 生徒の概要（出欠・学費明細）を表示する
    Student { id: Uuid },
    /// リソースの一覧を表示する
    List {
        resource: Resource,
        #[command(flatten)]
        list: ListArgs,
    },
    /// レコードを 1 件表示する
    Get { resource: Resource, id: String },
    /// レコードを作成する
    Create {
        resource: Resource,
        /// JSON のボディ
        #[arg(long)]
        data: String,
    },
    /// レコードを更新する
    Update {
        resource: Resource,
        id:       String,
        /// JSON のボディ
        #[arg(long)]
        data:     String,
    },
    /// レコードを削除する（users と students のみ）
    Delete { resource: Resource, id: String },
    /// 支払期限を過ぎた学費を表示する
    Overdue,
    /// 未読のお知らせを表示する
    Notifications,
    /// 現在の学年度を表示する
    ActiveYear,
    /// 試験結果を公開する
    PublishResults { exam_id: Uuid },
    /// 出欠を一括登録する（JSON 配列のファイル）
    BulkAttendance { file: PathBuf },
    /// 点数を一括登録する（JSON 配列のファイル）
    BulkMarks { file: PathBuf },
}

/// 一覧系コマンドの共通引数
#[derive(Debug, Clone, clap::Args)]
pub struct ListArgs {
    /// 全ページを取得する
    #[arg(long, default_value_t = false, conflicts_with = "page")]
    pub all: bool,

    /// 取得するページ番号
    #[arg(long)]
    pub page: Option<u32>,

    /// `key=value` 形式のフィルタ（複数指定可）
    #[arg(short, long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,
}

impl ListArgs {
    pub fn filters(&self) -> Filters {
        self.filters
            .iter()
            .cloned()
            .collect::<Filters>()
            .with_opt("page", self.page)
    }
}

impl Command {
    /// コマンドが表示する画面ルート
    ///
    /// 認証が要らないコマンドは `None`。
    pub fn route(&self) -> Option<Route> {
        match self {
            Command::Login { .. } | Command::Logout | Command::Whoami | Command::Menu => None,
            Command::Students { .. } | Command::Student { .. } => Some(Route::Students),
            _ => Some(Route::Dashboard),
        }
    }
}

fn parse_filter(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, val)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), val.trim().to_string()))
        }
        _ => Err(format!("`key=value` 形式で指定してください: {value}")),
    }
}
