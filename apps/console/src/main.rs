//! # edudesk コンソール
//!
//! 学校管理システムの REST API を操作するコマンドラインクライアント。
//!
//! ## 役割
//!
//! - **ログイン状態**: トークンをファイルに保存し、起動時に復元する
//! - **画面の認可**: ログインが必要なコマンドは未認証ならログインを促す
//! - **表示**: 取得結果を表または JSON で標準出力に出す
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `SCHOOL_API_URL` | No | API のベース URL（デフォルト: `http://localhost:8000/api`） |
//! | `SCHOOL_AUTH_SCHEME` | No | 認証スキーム（デフォルト: `Token`） |
//! | `SCHOOL_MAX_PAGES` | No | 全件取得のページ数上限（`0` で無制限） |
//! | `EDUDESK_TOKEN_PATH` | No | トークンの保存先 |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! edudesk login -u admin
//! edudesk dashboard
//! edudesk list fee-payments -f status=PENDING --all
//! ```

mod cli;
mod commands;
mod view;

use std::{process::ExitCode, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use cli::{Cli, Command};
use commands::Output;
use edudesk_client::{
    ApiError,
    AuthClient,
    ClientConfig,
    FileTokenStore,
    LoginRedirect,
    Route,
    RouteDecision,
    SchoolApiClient,
    Session,
    authorize,
};
use edudesk_shared::observability::TracingConfig;

/// ログイン画面への遷移を標準エラー出力で知らせる
struct ConsoleRedirect;

impl LoginRedirect for ConsoleRedirect {
    fn redirect(&self, to: Route) {
        eprintln!("セッションが無効になりました。`edudesk login` で再ログインしてください ({to})");
    }
}

/// コンソールのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. クライアント設定の読み込みとセッションの復元
/// 4. コマンドの認可と実行
#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let tracing_config = TracingConfig::from_env("edudesk").with_verbose(cli.verbose > 0);
    edudesk_shared::observability::init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "edudesk").entered();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("エラー: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::debug!(base_url = %config.base_url, "クライアントを初期化します");

    let store = Arc::new(FileTokenStore::new(config.token_path.clone()));
    let session = Arc::new(Session::restore(store));
    let api = SchoolApiClient::new(&config, session, Arc::new(ConsoleRedirect))
        .context("クライアントの初期化に失敗しました")?;

    if needs_profile(&cli.command) {
        match api.resume().await {
            Ok(_) => {}
            Err(e) if e.is_unauthorized() => {}
            Err(e) => return Err(anyhow::Error::from(e).context("ログイン状態を確認できません")),
        }
    }

    if let Some(route) = cli.command.route()
        && let RouteDecision::Redirect(to) = authorize(api.session(), route)
    {
        anyhow::bail!("ログインが必要です。`edudesk login` を実行してください ({to})");
    }

    let output = if cli.json { Output::Json } else { Output::Text };
    commands::run(&api, cli.command, output).await
}

/// 保存済みトークンからユーザー情報を取り直すコマンドか
fn needs_profile(command: &Command) -> bool {
    !matches!(command, Command::Login { .. } | Command::Logout)
}
