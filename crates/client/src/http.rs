//! # HTTP クライアントラッパー
//!
//! 学校管理 API へのすべてのリクエストはここを通る。
//!
//! - 送信直前にセッションのトークンを読み、あれば `Authorization: <scheme> <token>` を付ける
//! - 401 を受けたらエンドポイントに関係なくセッションを破棄し、ログイン画面へ遷移させる
//! - それ以外のステータスは [`ApiError`] として呼び出し元に返す

use std::sync::Arc;

use async_trait::async_trait;
use edudesk_shared::{
    PageResponse,
    event_log::{
        error::{category, kind},
        event,
    },
    log_auth_event,
};
use reqwest::{Method, RequestBuilder, StatusCode, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::ApiError,
    guard::Route,
    pagination::PageSource,
    query::Filters,
    resource::Endpoint,
    response::{handle_empty, handle_response},
    session::Session,
    types::Record,
};

/// 既定の認証スキーム
pub const DEFAULT_AUTH_SCHEME: &str = "Token";

/// ログイン画面への遷移
///
/// 401 でセッションを破棄したあとに呼ばれる。
pub trait LoginRedirect: Send + Sync {
    fn redirect(&self, to: Route);
}

/// 遷移をログに残すだけの実装
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRedirect;

impl LoginRedirect for TracingRedirect {
    fn redirect(&self, to: Route) {
        tracing::info!(route = %to, "ログイン画面へ遷移");
    }
}

/// 学校管理 API の HTTP クライアント
#[derive(Clone)]
pub struct HttpClient {
    base_url:    Url,
    client:      reqwest::Client,
    session:     Arc<Session>,
    redirect:    Arc<dyn LoginRedirect>,
    auth_scheme: String,
}

impl HttpClient {
    /// 新しい HttpClient を作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: API のベース URL（例: `http://localhost:8000/api`）
    /// - `session`: トークンを読み書きする共有セッション
    /// - `redirect`: 401 受信時の遷移先
    pub fn new(
        base_url: &str,
        session: Arc<Session>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            client: reqwest::Client::new(),
            session,
            redirect,
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
        })
    }

    /// 認証スキーム（`Token` / `Bearer` など）を変更する
    pub fn with_auth_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.auth_scheme = scheme.into();
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// ベース URL からの相対パスを解決する
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// リクエストを組み立てる（認証ヘッダーは送信時に付ける）
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.request(method, self.url(path)?))
    }

    /// セッションのトークンを付けて送信する
    ///
    /// 401 の場合はセッションを破棄してログイン画面へ遷移させ、
    /// [`ApiError::Unauthorized`] を返す。
    pub async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = match self.session.token() {
            Some(token) => self.authorize(request, &token),
            None => request,
        };

        let response = self.execute(request).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.reject_session(response.url().path());
            return Err(ApiError::Unauthorized);
        }

        Ok(response)
    }

    /// 指定したトークンを付けて送信する
    ///
    /// ログイン途中でセッションに保存する前のトークンを使うときに用いる。
    /// 401 を受けてもセッションには触れない。
    pub async fn send_with_token(
        &self,
        request: RequestBuilder,
        token: &str,
    ) -> Result<reqwest::Response, ApiError> {
        self.execute(self.authorize(request, token)).await
    }

    /// トークンを付けずに送信する（トークン発行用）
    ///
    /// 401 を受けてもセッションには触れない。
    pub async fn send_anonymous(
        &self,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        self.execute(request).await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Filters,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path)?.query(query);
        handle_response(self.send(request).await?).await
    }

    /// 対応表のエンドポイントを呼び出す
    ///
    /// 空のフィルタはクエリ文字列を付けない。ボディがあれば JSON で送る。
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        id: Option<&str>,
        query: &Filters,
        body: Option<&Record>,
    ) -> Result<T, ApiError> {
        let request = self.endpoint_request(endpoint, id, query, body)?;
        handle_response(self.send(request).await?).await
    }

    /// ボディを返さないエンドポイントを呼び出す（削除など）
    pub async fn call_empty(
        &self,
        endpoint: &Endpoint,
        id: Option<&str>,
    ) -> Result<(), ApiError> {
        let request = self.endpoint_request(endpoint, id, &Filters::new(), None)?;
        handle_empty(self.send(request).await?).await
    }

    fn endpoint_request(
        &self,
        endpoint: &Endpoint,
        id: Option<&str>,
        query: &Filters,
        body: Option<&Record>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = endpoint.url(&self.base_url, id)?;
        let mut request = self.client.request(endpoint.method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request)
    }

    fn authorize(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("{} {}", self.auth_scheme, token))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(
                error.category = category::EXTERNAL_SERVICE,
                error.kind = kind::SERVICE_COMMUNICATION,
                "学校管理 API への接続に失敗: {}",
                e
            );
            ApiError::from(e)
        })?;

        tracing::debug!(
            path = %response.url().path(),
            status = response.status().as_u16(),
            "API レスポンス受信"
        );
        Ok(response)
    }

    fn reject_session(&self, path: &str) {
        self.session.reject();
        log_auth_event!(
            event.action = event::action::SESSION_REJECTED,
            event.result = event::result::FAILURE,
            endpoint = path,
            "サーバーがトークンを拒否したためセッションを破棄"
        );
        self.redirect.redirect(Route::Login);
    }
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch_page(
        &self,
        endpoint: &str,
        query: &Filters,
    ) -> Result<PageResponse<Record>, ApiError> {
        self.get_json(endpoint, query).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth_scheme", &self.auth_scheme)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// ベース URL の末尾を `/` にそろえる
///
/// `Url::join` は末尾が `/` でないと最後のセグメントを置き換えてしまう。
fn normalize_base_url(base_url: &str) -> Result<Url, ApiError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    Ok(Url::parse(&format!("{trimmed}/"))?)
}
