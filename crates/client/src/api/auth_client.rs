//! 認証関連のクライアント
//!
//! ## ログインの流れ
//!
//! 1. `POST auth/token/` に `{username, password}` を送りトークンを得る
//! 2. そのトークンで `GET users/profile/` を呼びプロフィールを得る
//! 3. 両方成功したときだけセッションを認証済みにする
//!
//! ログイン中の 401 / 400 は資格情報の誤りとして扱い、セッションのリセットは行わない。

use async_trait::async_trait;
use edudesk_shared::{event_log::event, log_auth_event};
use reqwest::Method;

use super::client_impl::SchoolApiClient;
use crate::{
    error::ApiError,
    query::Filters,
    resource::ResourceAction,
    response::handle_response,
    types::{TokenRequest, TokenResponse, User},
};

/// トークン発行エンドポイント
pub const TOKEN_PATH: &str = "auth/token/";

/// 認証関連のクライアントトレイト
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// ログインする
    ///
    /// 成功するとトークンを永続化し、ユーザー情報をセッションに保持する。
    /// 失敗した場合セッションは変更しない。
    async fn login(&self, username: &str, password: &str) -> Result<User, ApiError>;

    /// ログアウトする
    ///
    /// サーバーには通知せず、ローカルのセッションだけを破棄する。
    fn logout(&self);

    /// 保存済みトークンからセッションを復元する
    ///
    /// トークンが無ければ `None`。トークンが拒否された場合は 401 の共通処理で
    /// セッションが破棄され、`Unauthorized` が返る。
    async fn resume(&self) -> Result<Option<User>, ApiError>;

    /// ログイン中ユーザーのプロフィールを取得する
    ///
    /// `GET users/profile/` を呼び出す。
    async fn profile(&self) -> Result<User, ApiError>;
}

#[async_trait]
impl AuthClient for SchoolApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        match self.exchange_credentials(username, password).await {
            Ok((token, user)) => {
                self.session().login(token, user.clone());
                log_auth_event!(
                    event.action = event::action::LOGIN_SUCCESS,
                    event.result = event::result::SUCCESS,
                    user.username = %user.username,
                    user.role = user.role.as_deref().unwrap_or("-"),
                    "ログイン成功"
                );
                Ok(user)
            }
            Err(e) => {
                log_auth_event!(
                    event.action = event::action::LOGIN_FAILURE,
                    event.result = event::result::FAILURE,
                    user.username = %username,
                    reason = %e,
                    "ログイン失敗"
                );
                Err(e)
            }
        }
    }

    fn logout(&self) {
        let username = self.session().user().map(|u| u.username);
        self.session().logout();
        log_auth_event!(
            event.action = event::action::LOGOUT,
            event.result = event::result::SUCCESS,
            user.username = username.as_deref().unwrap_or("-"),
            "ログアウト"
        );
    }

    async fn resume(&self) -> Result<Option<User>, ApiError> {
        let Some(token) = self.session().token() else {
            return Ok(None);
        };

        let user = self.profile().await?;
        self.session().login(token, user.clone());
        log_auth_event!(
            event.action = event::action::SESSION_RESTORED,
            event.result = event::result::SUCCESS,
            user.username = %user.username,
            "保存済みトークンでセッションを復元"
        );
        Ok(Some(user))
    }

    async fn profile(&self) -> Result<User, ApiError> {
        let endpoint = ResourceAction::UserProfile.endpoint();
        self.http.call(&endpoint, None, &Filters::new(), None).await
    }
}

impl SchoolApiClient {
    /// 資格情報をトークンとプロフィールに交換する（セッションは変更しない）
    async fn exchange_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(String, User), ApiError> {
        let request = self
            .http
            .request(Method::POST, TOKEN_PATH)?
            .json(&TokenRequest { username, password });
        let response = self.http.send_anonymous(request).await?;
        let token: TokenResponse = handle_response(response)
            .await
            .map_err(credentials_error)?;

        let endpoint = ResourceAction::UserProfile.endpoint();
        let request = self
            .http
            .request(endpoint.method.clone(), &endpoint.template)?;
        let response = self.http.send_with_token(request, &token.token).await?;
        let user: User = handle_response(response)
            .await
            .map_err(credentials_error)?;

        Ok((token.token, user))
    }
}

/// ログイン中の拒否を資格情報エラーに読み替える
fn credentials_error(err: ApiError) -> ApiError {
    match err {
        ApiError::Unauthorized | ApiError::ValidationError(_) => ApiError::InvalidCredentials,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401と400は資格情報エラーになる() {
        assert!(matches!(
            credentials_error(ApiError::Unauthorized),
            ApiError::InvalidCredentials
        ));
        assert!(matches!(
            credentials_error(ApiError::ValidationError("bad".to_string())),
            ApiError::InvalidCredentials
        ));
    }

    #[test]
    fn test_その他のエラーはそのまま返す() {
        assert!(matches!(
            credentials_error(ApiError::Network("down".to_string())),
            ApiError::Network(_)
        ));
        assert!(matches!(
            credentials_error(ApiError::Forbidden("inactive".to_string())),
            ApiError::Forbidden(_)
        ));
    }
}
