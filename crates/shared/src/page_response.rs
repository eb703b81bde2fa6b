//! # ページ付きリストレスポンス
//!
//! 学校管理 API のリストエンドポイントが返すページエンベロープ。

use serde::{Deserialize, Serialize};

/// ページ付きリストレスポンス
///
/// ## JSON 形式
///
/// ```json
/// {
///   "count": 250,
///   "next": "http://localhost:8000/api/students/?page=2&page_size=100",
///   "previous": null,
///   "results": [...]
/// }
/// ```
///
/// `next` が `null`（または空文字列）の場合は最後のページを意味する。
/// `results` の並び順はサーバーが決め、クライアントは並べ替えない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    #[serde(default)]
    pub count:    u64,
    #[serde(default)]
    pub next:     Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results:  Vec<T>,
}

impl<T> PageResponse<T> {
    /// 続きのページがあるか
    ///
    /// ```
    /// use edudesk_shared::PageResponse;
    ///
    /// let page: PageResponse<u32> = PageResponse {
    ///     count:    1,
    ///     next:     None,
    ///     previous: None,
    ///     results:  vec![1],
    /// };
    /// assert!(!page.has_next());
    /// ```
    pub fn has_next(&self) -> bool {
        self.next.as_deref().is_some_and(|next| !next.is_empty())
    }
}

/// コレクションを返すアクションエンドポイントのレスポンス
///
/// `fee-payments/overdue/` などのアクションは素の配列を返すが、
/// サーバー設定によってはページエンベロープで返ることもあるため両方を受け付ける。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Items(Vec<T>),
    Page(PageResponse<T>),
}

impl<T> ListBody<T> {
    /// 要素を取り出す（ページエンベロープの場合は `results`）
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListBody::Items(items) => items,
            ListBody::Page(page) => page.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_ページエンベロープをデシリアライズする() {
        let json = r#"{
            "count": 3,
            "next": "http://localhost:8000/api/students/?page=2",
            "previous": null,
            "results": [1, 2]
        }"#;

        let page: PageResponse<u32> = serde_json::from_str(json).unwrap();

        assert_eq!(page.count, 3);
        assert_eq!(page.results, vec![1, 2]);
        assert!(page.has_next());
    }

    #[test]
    fn test_nextがnullなら最後のページ() {
        let json = r#"{"count": 1, "next": null, "results": [7]}"#;

        let page: PageResponse<u32> = serde_json::from_str(json).unwrap();

        assert!(!page.has_next());
        assert_eq!(page.previous, None);
    }

    #[test]
    fn test_nextが空文字列なら最後のページ() {
        let json = r#"{"count": 1, "next": "", "results": [7]}"#;

        let page: PageResponse<u32> = serde_json::from_str(json).unwrap();

        assert!(!page.has_next());
    }

    #[test]
    fn test_countとnextが欠けていても受け付ける() {
        let page: PageResponse<u32> = serde_json::from_str(r#"{"results": []}"#).unwrap();

        assert_eq!(page.count, 0);
        assert!(!page.has_next());
    }

    #[test]
    fn test_list_bodyは素の配列を受け付ける() {
        let body: ListBody<u32> = serde_json::from_str("[1, 2, 3]").unwrap();

        assert_eq!(body.into_items(), vec![1, 2, 3]);
    }

    #[test]
    fn test_list_bodyはページエンベロープも受け付ける() {
        let body: ListBody<u32> =
            serde_json::from_str(r#"{"count": 2, "next": null, "results": [4, 5]}"#).unwrap();

        assert_eq!(body.into_items(), vec![4, 5]);
    }
}
