//! # ページ集約
//!
//! ページ分割されたリストエンドポイントを 1 ページ目から順に取得し、
//! 全レコードをページ順に連結して返す。
//!
//! - 毎回 `page` と `page_size` をフィルタに加える（呼び出し元の指定より優先）
//! - `next` が無くなった時点で終了する
//! - 途中のページが失敗したらその時点で中断し、部分結果は返さない（リトライもしない）
//! - `next` を返し続けるサーバーに備えてページ数の上限を持つ

use async_trait::async_trait;
use edudesk_shared::{
    PageResponse,
    event_log::error::{category, kind},
};
use serde::de::DeserializeOwned;

use crate::{error::ApiError, query::Filters, types::Record};

/// 1 リクエストあたりのページサイズ
pub const PAGE_SIZE: u32 = 100;

/// 既定のページ数上限
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// ページ集約の方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub page_size: u32,
    /// ページ数の上限（`None` なら無制限）
    pub max_pages: Option<u32>,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            max_pages: Some(DEFAULT_MAX_PAGES),
        }
    }
}

impl PaginationPolicy {
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// 1 ページを取得する手段
///
/// 実 HTTP クライアントとテスト用スタブの両方が実装する。
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        endpoint: &str,
        query: &Filters,
    ) -> Result<PageResponse<Record>, ApiError>;
}

/// 全ページのレコードを取得する
pub async fn fetch_all<T, S>(
    source: &S,
    endpoint: &str,
    filters: &Filters,
    policy: PaginationPolicy,
) -> Result<Vec<T>, ApiError>
where
    T: DeserializeOwned,
    S: PageSource + ?Sized,
{
    let mut records = Vec::new();
    let mut page: u32 = 1;

    loop {
        if let Some(max_pages) = policy.max_pages
            && page > max_pages
        {
            tracing::warn!(
                error.category = category::EXTERNAL_SERVICE,
                error.kind = kind::PAGINATION,
                endpoint,
                max_pages,
                "ページ数が上限を超えたため集約を中断"
            );
            return Err(ApiError::PageLimitExceeded {
                endpoint: endpoint.to_string(),
                max_pages,
            });
        }

        let query = filters.with_page(page, policy.page_size);
        tracing::debug!(endpoint, page, "ページを取得");

        let response = source.fetch_page(endpoint, &query).await?;
        let has_next = response.has_next();
        for record in response.results {
            records.push(serde_json::from_value(record)?);
        }

        if !has_next {
            break;
        }
        page += 1;
    }

    tracing::debug!(endpoint, pages = page, count = records.len(), "全ページの取得完了");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    /// 決められたページを順に返すスタブ
    struct StubPages {
        pages:   Mutex<VecDeque<Result<PageResponse<Record>, ApiError>>>,
        queries: Mutex<Vec<Filters>>,
    }

    impl StubPages {
        fn new(pages: Vec<Result<PageResponse<Record>, ApiError>>) -> Self {
            Self {
                pages:   Mutex::new(pages.into()),
                queries: Mutex::new(Vec::new()),
            }
        }

        /// `total` 件を `size` 件ずつに分けたページ列
        fn split(total: usize, size: usize) -> Self {
            let ids: Vec<usize> = (0..total).collect();
            let chunks: Vec<&[usize]> = ids.chunks(size).collect();
            let count = chunks.len();
            let pages = chunks
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| Ok(page(chunk, i + 1 < count)))
                .collect();
            Self::new(pages)
        }

        fn request_count(&self) -> usize {
            self.queries.lock().len()
        }
    }

    #[async_trait]
    impl PageSource for StubPages {
        async fn fetch_page(
            &self,
            _endpoint: &str,
            query: &Filters,
        ) -> Result<PageResponse<Record>, ApiError> {
            self.queries.lock().push(query.clone());
            self.pages
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Unexpected("ページ切れ".to_string())))
        }
    }

    fn page(ids: &[usize], has_next: bool) -> PageResponse<Record> {
        PageResponse {
            count:    0,
            next:     has_next.then(|| "http://api/next".to_string()),
            previous: None,
            results:  ids.iter().map(|id| json!({ "n": id })).collect(),
        }
    }

    fn numbers(records: &[Record]) -> Vec<u64> {
        records.iter().filter_map(|r| r["n"].as_u64()).collect()
    }

    #[rstest]
    #[case(1, 3)]
    #[case(3, 2)]
    #[case(5, 1)]
    #[tokio::test]
    async fn test_nページ分のレコードをページ順に連結する(#[case] n: usize, #[case] k: usize) {
        let stub = StubPages::split(n * k, k);

        let records: Vec<Record> =
            fetch_all(&stub, "students/", &Filters::new(), PaginationPolicy::default())
                .await
                .unwrap();

        assert_eq!(records.len(), n * k);
        assert_eq!(numbers(&records), (0..(n * k) as u64).collect::<Vec<_>>());
        assert_eq!(stub.request_count(), n);
    }

    #[tokio::test]
    async fn test_250件は100_100_50の3リクエストで取得する() {
        let stub = StubPages::split(250, 100);

        let records: Vec<Record> =
            fetch_all(&stub, "students/", &Filters::new(), PaginationPolicy::default())
                .await
                .unwrap();

        assert_eq!(records.len(), 250);
        assert_eq!(stub.request_count(), 3);
        let pages: Vec<Option<String>> = stub
            .queries
            .lock()
            .iter()
            .map(|q| q.get("page").map(str::to_string))
            .collect();
        assert_eq!(
            pages,
            vec![
                Some("1".to_string()),
                Some("2".to_string()),
                Some("3".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_nextがnullなら1リクエストで終わる() {
        let stub = StubPages::new(vec![Ok(page(&[1, 2], false))]);

        let records: Vec<Record> =
            fetch_all(&stub, "staff/", &Filters::new(), PaginationPolicy::default())
                .await
                .unwrap();

        assert_eq!(numbers(&records), vec![1, 2]);
        assert_eq!(stub.request_count(), 1);
    }

    #[tokio::test]
    async fn test_空文字のnextは最終ページとして扱う() {
        let mut last = page(&[7], false);
        last.next = Some(String::new());
        let stub = StubPages::new(vec![Ok(last)]);

        let records: Vec<Record> =
            fetch_all(&stub, "staff/", &Filters::new(), PaginationPolicy::default())
                .await
                .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(stub.request_count(), 1);
    }

    #[tokio::test]
    async fn test_途中のページが失敗したらそこで中断する() {
        let stub = StubPages::new(vec![
            Ok(page(&[1], true)),
            Err(ApiError::Forbidden("no".to_string())),
            Ok(page(&[3], false)),
        ]);

        let result: Result<Vec<Record>, _> =
            fetch_all(&stub, "marks/", &Filters::new(), PaginationPolicy::default()).await;

        assert!(matches!(result, Err(ApiError::Forbidden(body)) if body == "no"));
        assert_eq!(stub.request_count(), 2);
    }

    #[tokio::test]
    async fn test_フィルタを毎回送り呼び出し元のページ指定は上書きする() {
        let stub = StubPages::split(3, 2);
        let filters = Filters::new()
            .with("current_class", "c1")
            .with("page", 9)
            .with("page_size", 5);

        let _: Vec<Record> = fetch_all(&stub, "students/", &filters, PaginationPolicy::default())
            .await
            .unwrap();

        let queries = stub.queries.lock();
        for (i, query) in queries.iter().enumerate() {
            assert_eq!(query.get("current_class"), Some("c1"));
            assert_eq!(query.get("page"), Some((i + 1).to_string().as_str()));
            assert_eq!(query.get("page_size"), Some("100"));
        }
    }

    #[tokio::test]
    async fn test_上限を超えるとpage_limit_exceededを返す() {
        let stub = StubPages::split(10, 1);
        let policy = PaginationPolicy::default().with_max_pages(Some(3));

        let result: Result<Vec<Record>, _> =
            fetch_all(&stub, "attendance/", &Filters::new(), policy).await;

        assert!(matches!(
            result,
            Err(ApiError::PageLimitExceeded { max_pages: 3, .. })
        ));
        assert_eq!(stub.request_count(), 3);
    }

    #[tokio::test]
    async fn test_上限ちょうどで終わるなら成功する() {
        let stub = StubPages::split(3, 1);
        let policy = PaginationPolicy::default().with_max_pages(Some(3));

        let records: Vec<Record> = fetch_all(&stub, "attendance/", &Filters::new(), policy)
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_レコードを型付きでデシリアライズできないとdecodeエラー() {
        #[derive(Debug, serde::Deserialize)]
        struct Named {
            #[allow(dead_code)]
            name: String,
        }
        let stub = StubPages::new(vec![Ok(page(&[1], false))]);

        let result: Result<Vec<Named>, _> =
            fetch_all(&stub, "subjects/", &Filters::new(), PaginationPolicy::default()).await;

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
