//! クエリフィルタ
//!
//! リストエンドポイントに渡す `key=value` の組。キーは一意で、値が無いものは送らない。

use std::collections::BTreeMap;

use serde::Serialize;

/// ページ番号のクエリキー
pub const PAGE_KEY: &str = "page";
/// ページサイズのクエリキー
pub const PAGE_SIZE_KEY: &str = "page_size";

/// クエリフィルタ
///
/// ```
/// use edudesk_client::Filters;
///
/// let filters = Filters::new()
///     .with("current_class", "7b")
///     .with_opt("gender", None::<&str>);
///
/// assert_eq!(filters.get("current_class"), Some("7b"));
/// assert_eq!(filters.get("gender"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// フィルタを追加する（同じキーは上書き）
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// 値があるときだけフィルタを追加する
    pub fn with_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// ページ指定を加えたフィルタを返す
    ///
    /// 呼び出し元が `page` / `page_size` を渡していても、こちらが優先される。
    pub fn with_page(&self, page: u32, page_size: u32) -> Self {
        self.clone()
            .with(PAGE_KEY, page)
            .with(PAGE_SIZE_KEY, page_size)
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (key, value) in iter {
            filters.insert(key, value);
        }
        filters
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_同じキーは後勝ちで上書きされる() {
        let filters = Filters::new().with("status", "PENDING").with("status", "PAID");

        assert_eq!(filters.get("status"), Some("PAID"));
        assert_eq!(serde_json::to_value(&filters).unwrap(), serde_json::json!({ "status": "PAID" }));
    }

    #[test]
    fn test_with_pageは呼び出し元のページ指定を上書きする() {
        let filters = Filters::new().with("page", 9).with("page_size", 5).with("gender", "F");

        let paged = filters.with_page(2, 100);

        assert_eq!(paged.get("page"), Some("2"));
        assert_eq!(paged.get("page_size"), Some("100"));
        assert_eq!(paged.get("gender"), Some("F"));
        // 元のフィルタは変更しない
        assert_eq!(filters.get("page"), Some("9"));
    }

    #[test]
    fn test_from_iterで組み立てられる() {
        let filters: Filters = [("exam", "e1"), ("student", "s1")].into_iter().collect();

        assert_eq!(filters.get("exam"), Some("e1"));
        assert_eq!(filters.get("student"), Some("s1"));
    }

    #[test]
    fn test_クエリ文字列としてシリアライズできる() {
        let filters = Filters::new().with("b", 2).with("a", "x y");

        let json = serde_json::to_value(&filters).unwrap();

        assert_eq!(json, serde_json::json!({ "a": "x y", "b": "2" }));
    }
}
