//! # Observability 基盤
//!
//! トレーシング初期化とログ出力形式の設定を提供する。
//! コンソールは標準出力に表を描画するため、ログは常に標準エラー出力に書く。
//! 環境変数 `LOG_FORMAT` による JSON / Pretty 出力の切り替えに対応する。

/// 既定のログフィルタ（`RUST_LOG` 未設定時）
pub const DEFAULT_LOG_FILTER: &str = "warn,edudesk=info";

/// ログ出力形式
///
/// 値が未設定または不正な場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（ログ収集向け）
    Json,
    /// 人間が読みやすい形式
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式をパースする
    ///
    /// 大文字小文字は区別しない。不正な値は [`Pretty`](LogFormat::Pretty) になる。
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" | "" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|val| Self::parse(&val))
            .unwrap_or_default()
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// アプリケーション名（ルートスパンの `app` フィールド）
    pub app_name:   String,
    /// ログ出力形式
    pub log_format: LogFormat,
    /// `-v` 指定などで既定フィルタを `debug` に引き上げる
    pub verbose:    bool,
}

impl TracingConfig {
    pub fn new(app_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            app_name: app_name.into(),
            log_format,
            verbose: false,
        }
    }

    /// 環境変数から設定を読み取る
    pub fn from_env(app_name: impl Into<String>) -> Self {
        Self::new(app_name, LogFormat::from_env())
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// `RUST_LOG` が無いときに使うフィルタ
    pub fn default_filter(&self) -> &'static str {
        if self.verbose {
            "info,edudesk=debug"
        } else {
            DEFAULT_LOG_FILTER
        }
    }
}

/// トレーシングを初期化する
///
/// `RUST_LOG` 環境変数でログレベルを制御可能。未設定の場合は
/// [`TracingConfig::default_filter`] を使う。
///
/// JSON モードでは `timestamp`, `level`, `target`, `message` と
/// 現在のスパンがトップレベルに出力される。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_filter().into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
