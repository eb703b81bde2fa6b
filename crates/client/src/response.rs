//! 学校管理 API レスポンスの共通ハンドリング

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// レスポンスをデシリアライズする
///
/// 成功時はボディを `T` にデシリアライズし、
/// エラー時はステータスコードに応じた `ApiError` を返す。
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();

    if status.is_success() {
        let body = response.json::<T>().await?;
        return Ok(body);
    }

    Err(status_error(response).await)
}

/// ボディを読み捨てるレスポンスを処理する（削除など）
pub(crate) async fn handle_empty(response: reqwest::Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        return Ok(());
    }

    Err(status_error(response).await)
}

/// エラーステータスを `ApiError` に変換する
pub(crate) async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::BAD_REQUEST => ApiError::ValidationError(body),
        StatusCode::FORBIDDEN => ApiError::Forbidden(body),
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::CONFLICT => ApiError::Conflict(body),
        _ => ApiError::Unexpected(format!("予期しないステータス {}: {}", status, body)),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    /// テスト用のレスポンスデータ型
    #[derive(Debug, Deserialize, PartialEq)]
    struct TestData {
        value: String,
    }

    /// テスト用の HTTP レスポンスを構築する
    fn make_response(status: u16, body: &str) -> reqwest::Response {
        let http_resp = http::Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(body.to_string())
            .unwrap();
        reqwest::Response::from(http_resp)
    }

    #[tokio::test]
    async fn test_成功レスポンスをデシリアライズする() {
        let response = make_response(200, r#"{"value": "hello"}"#);

        let result: Result<TestData, _> = handle_response(response).await;

        assert_eq!(
            result.unwrap(),
            TestData {
                value: "hello".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_401でunauthorizedを返す() {
        let response = make_response(401, r#"{"detail": "Invalid token."}"#);

        let result: Result<TestData, _> = handle_response(response).await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_400でvalidation_errorを返す() {
        let response = make_response(400, r#"{"roll_number": ["This field is required."]}"#);

        let result: Result<TestData, _> = handle_response(response).await;

        assert!(matches!(
            result,
            Err(ApiError::ValidationError(body)) if body.contains("roll_number")
        ));
    }

    #[tokio::test]
    async fn test_403でforbiddenを返す() {
        let response = make_response(403, "access denied");

        let result: Result<TestData, _> = handle_response(response).await;

        assert!(matches!(
            result,
            Err(ApiError::Forbidden(body)) if body == "access denied"
        ));
    }

    #[tokio::test]
    async fn test_404でnot_foundを返す() {
        let response = make_response(404, r#"{"detail": "Not found."}"#);

        let result: Result<TestData, _> = handle_response(response).await;

        assert!(matches!(result, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn test_409でconflictを返す() {
        let response = make_response(409, "conflict occurred");

        let result: Result<TestData, _> = handle_response(response).await;

        assert!(matches!(
            result,
            Err(ApiError::Conflict(body)) if body == "conflict occurred"
        ));
    }

    #[tokio::test]
    async fn test_500でunexpectedを返す() {
        let response = make_response(500, "server error");

        let result: Result<TestData, _> = handle_response(response).await;

        match result {
            Err(ApiError::Unexpected(msg)) => {
                assert!(
                    msg.contains("500"),
                    "メッセージにステータスコードが含まれること: {msg}"
                );
                assert!(
                    msg.contains("server error"),
                    "メッセージにボディが含まれること: {msg}"
                );
            }
            other => panic!("Unexpected を期待したが {other:?} を受け取った"),
        }
    }

    #[tokio::test]
    async fn test_成功だが不正なjsonでdecodeエラーを返す() {
        let response = make_response(200, "not json");

        let result: Result<TestData, _> = handle_response(response).await;

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_204はボディなしで成功する() {
        let response = make_response(204, "");

        assert!(handle_empty(response).await.is_ok());
    }
}
