//! # セッション状態
//!
//! 状態は「未認証」と「認証済み」の 2 つだけ。
//!
//! | 遷移 | 契機 |
//! |------|------|
//! | 未認証 → 認証済み | ログイン成功（トークン発行とプロフィール取得の両方） |
//! | 認証済み → 未認証 | ログアウト、または任意の 401 レスポンス |
//!
//! トークンは [`TokenStore`] に永続化し、ユーザー情報はメモリ上にのみ持つ。
//! トークンストアの失敗はログに残すだけで、セッションの遷移は止めない。

use std::sync::Arc;

use edudesk_shared::event_log::error::{category, kind};
use parking_lot::RwLock;

use crate::{navigation::Role, token_store::TokenStore, types::User};

/// セッションの状態
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated { token: String, user: User },
}

#[derive(Debug, Default)]
struct Inner {
    token: Option<String>,
    user:  Option<User>,
}

/// 共有セッション
///
/// HTTP クライアントとコンソールが `Arc<Session>` で共有する。
/// 書き込みはログイン・ログアウト・401 処理だけで、競合時は後勝ち。
pub struct Session {
    store: Arc<dyn TokenStore>,
    inner: RwLock<Inner>,
}

impl Session {
    /// 未認証のセッションを作成する
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// 永続化されたトークンを読み込んだセッションを作成する
    ///
    /// ユーザー情報はまだ無いため、[`is_authenticated`](Self::is_authenticated) は
    /// プロフィールを取得して [`login`](Self::login) するまで `false` のまま。
    pub fn restore(store: Arc<dyn TokenStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(
                    error.category = category::LOCAL_STORAGE,
                    error.kind = kind::TOKEN_STORE,
                    "保存済みトークンの読み込みに失敗: {}",
                    e
                );
                None
            }
        };

        Self {
            store,
            inner: RwLock::new(Inner { token, user: None }),
        }
    }

    /// 現在のトークン
    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    /// ログイン中のユーザー
    pub fn user(&self) -> Option<User> {
        self.inner.read().user.clone()
    }

    /// ログイン中ユーザーのロール
    pub fn role(&self) -> Option<Role> {
        self.inner.read().user.as_ref().and_then(User::role)
    }

    /// トークンとユーザーの両方が揃っているか
    pub fn is_authenticated(&self) -> bool {
        let inner = self.inner.read();
        inner.token.is_some() && inner.user.is_some()
    }

    pub fn state(&self) -> SessionState {
        let inner = self.inner.read();
        match (&inner.token, &inner.user) {
            (Some(token), Some(user)) => SessionState::Authenticated {
                token: token.clone(),
                user:  user.clone(),
            },
            _ => SessionState::Anonymous,
        }
    }

    /// 認証済みにする
    pub fn login(&self, token: String, user: User) {
        if let Err(e) = self.store.save(&token) {
            tracing::warn!(
                error.category = category::LOCAL_STORAGE,
                error.kind = kind::TOKEN_STORE,
                "トークンの保存に失敗: {}",
                e
            );
        }

        let mut inner = self.inner.write();
        inner.token = Some(token);
        inner.user = Some(user);
    }

    /// 未認証に戻す（明示的なログアウト）
    pub fn logout(&self) {
        self.reset();
    }

    /// サーバーに拒否されたセッションを破棄する（401 受信時）
    ///
    /// メモリ上にトークンが無くても、永続化されたトークンは必ず削除する。
    pub fn reject(&self) {
        self.reset();
    }

    fn reset(&self) {
        {
            let mut inner = self.inner.write();
            inner.token = None;
            inner.user = None;
        }

        if let Err(e) = self.store.clear() {
            tracing::warn!(
                error.category = category::LOCAL_STORAGE,
                error.kind = kind::TOKEN_STORE,
                "トークンの削除に失敗: {}",
                e
            );
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Session")
            .field("has_token", &inner.token.is_some())
            .field("user", &inner.user.as_ref().map(|u| u.username.as_str()))
            .finish()
    }
}
