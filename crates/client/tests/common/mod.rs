//! 統合テスト共通のヘルパー
//!
//! wiremock のモックサーバーに向けたクライアントを組み立てる。

#![allow(dead_code)]

use std::sync::Arc;

use edudesk_client::{
    ClientConfig,
    LoginRedirect,
    MemoryTokenStore,
    Route,
    SchoolApiClient,
    Session,
    TokenStore,
    types::User,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use wiremock::MockServer;

/// 遷移先を記録する LoginRedirect
#[derive(Default)]
pub struct RecordingRedirect {
    routes: Mutex<Vec<Route>>,
}

impl RecordingRedirect {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl LoginRedirect for RecordingRedirect {
    fn redirect(&self, to: Route) {
        self.routes.lock().push(to);
    }
}

pub struct TestContext {
    pub server:   MockServer,
    pub api:      SchoolApiClient,
    pub session:  Arc<Session>,
    pub store:    Arc<MemoryTokenStore>,
    pub redirect: Arc<RecordingRedirect>,
}

impl TestContext {
    /// 未認証のクライアントを作成する
    pub async fn new() -> Self {
        Self::with_store(MemoryTokenStore::new()).await
    }

    /// 保存済みトークンを持つクライアントを作成する
    pub async fn with_token(token: &str) -> Self {
        Self::with_store(MemoryTokenStore::with_token(token)).await
    }

    async fn with_store(store: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(store);
        let session = Arc::new(Session::restore(store.clone()));
        let redirect = Arc::new(RecordingRedirect::default());
        let config = ClientConfig {
            base_url: format!("{}/api", server.uri()),
            ..ClientConfig::default()
        };
        let api = SchoolApiClient::new(&config, session.clone(), redirect.clone())
            .expect("クライアントの作成に失敗");

        Self {
            server,
            api,
            session,
            store,
            redirect,
        }
    }

    /// ログイン済みにする（サーバーとの通信なし）
    pub fn sign_in(&self, token: &str) {
        self.session.login(token.to_string(), admin_user());
    }

    pub fn stored_token(&self) -> Option<String> {
        self.store.load().expect("トークンの読み込みに失敗")
    }

    /// 受信したリクエスト数
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

pub fn admin_user() -> User {
    User {
        username: "admin".to_string(),
        first_name: "Site".to_string(),
        last_name: "Admin".to_string(),
        role: Some("ADMIN".to_string()),
        ..User::default()
    }
}

pub fn profile_json(role: &str) -> Value {
    json!({
        "id": "0b6e1a52-3a57-4e1c-8f64-1b0b8f3b7a11",
        "username": "asha",
        "email": "asha@example.com",
        "first_name": "Asha",
        "last_name": "Rao",
        "role": role,
        "phone": null,
        "is_active": true
    })
}

/// `from..to` の番号を持つレコードのページ
pub fn page_json(from: usize, to: usize, next: Option<&str>, count: usize) -> Value {
    let results: Vec<Value> = (from..to).map(|n| json!({ "n": n })).collect();
    json!({
        "count": count,
        "next": next,
        "previous": null,
        "results": results
    })
}
