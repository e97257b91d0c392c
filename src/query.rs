//! Solr request construction.
//!
//! A search is either free text or a structured set of Solr parameters. Both
//! resolve to a [`SearchRequest`] that always carries `q`, `wt`, `fq` and
//! `api_key` before being serialized onto the search endpoint.

use crate::config::Config;

/// Match-all query used when the caller gives no `q`
pub const MATCH_ALL: &str = "*:*";

/// Restricts results to full articles, excluding issue images
pub const FIXED_FILTER: &str = r#"doc_type:full AND !article_type_facet:"Issue Image""#;

/// Response format sent with every request
pub const RESPONSE_FORMAT: &str = "json";

/// Ordered Solr parameters. Setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    params: Vec<(String, String)>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`; last write wins, first insertion fixes the position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((key, value)),
        }
        self
    }

    /// Builder form of [`SearchRequest::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Solr `q`
    pub fn query(self, q: impl Into<String>) -> Self {
        self.with("q", q)
    }

    /// Solr `fl`, comma-joined
    pub fn fields(self, fields: &[&str]) -> Self {
        self.with("fl", fields.join(","))
    }

    /// Solr `rows`
    pub fn rows(self, rows: u64) -> Self {
        self.with("rows", rows.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Requested field list, if any.
    pub fn requested_fields(&self) -> Option<Vec<&str>> {
        self.get("fl").map(|fl| {
            fl.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .collect()
        })
    }
}

/// Loosely-typed search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    /// Plain search terms, used as `q`
    FreeText(String),
    /// Explicit Solr parameters
    Structured(SearchRequest),
}

impl QueryInput {
    /// Resolve to a request with `q`, `wt`, `fq` and `api_key` set.
    ///
    /// `wt`, `fq` and `api_key` are forced after the caller's parameters, so
    /// the caller cannot override them.
    pub fn resolve(self, api_key: &str) -> SearchRequest {
        let mut request = match self {
            QueryInput::FreeText(text) => SearchRequest::new().query(text),
            QueryInput::Structured(request) => request,
        };
        if request.get("q").is_none() {
            request.set("q", MATCH_ALL);
        }
        request
            .set("wt", RESPONSE_FORMAT)
            .set("fq", FIXED_FILTER)
            .set("api_key", api_key);
        request
    }
}

impl From<&str> for QueryInput {
    fn from(text: &str) -> Self {
        QueryInput::FreeText(text.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(text: String) -> Self {
        QueryInput::FreeText(text)
    }
}

impl From<SearchRequest> for QueryInput {
    fn from(request: SearchRequest) -> Self {
        QueryInput::Structured(request)
    }
}

/// Serialize a resolved request onto the search endpoint.
pub fn request_url(search_url: &str, request: &SearchRequest) -> String {
    let query = request
        .params()
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", search_url.trim_end_matches('?'), query)
}

/// Build the fully qualified request URL for `input`.
pub fn build_url(input: impl Into<QueryInput>, config: &Config) -> String {
    let request = input.into().resolve(&config.api_key);
    request_url(&config.search_url, &request)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENCODED_FILTER: &str =
        "fq=doc_type%3Afull%20AND%20%21article_type_facet%3A%22Issue%20Image%22";

    fn test_config() -> Config {
        Config::new("test-key").expect("valid config")
    }

    #[test]
    fn test_free_text_becomes_q() {
        let url = build_url("malaria", &test_config());
        assert_eq!(
            url,
            format!(
                "http://api.plos.org/search?q=malaria&wt=json&{}&api_key=test-key",
                ENCODED_FILTER
            )
        );
    }

    #[test]
    fn test_structured_without_q_defaults_to_match_all() {
        let request = SearchRequest::new().rows(5);
        let resolved = QueryInput::from(request).resolve("k");
        assert_eq!(resolved.get("q"), Some(MATCH_ALL));
        assert_eq!(resolved.get("rows"), Some("5"));

        let url = build_url(SearchRequest::new().rows(5), &test_config());
        assert!(url.starts_with("http://api.plos.org/search?rows=5&q=%2A%3A%2A&wt=json"));
    }

    #[test]
    fn test_forced_parameters_cannot_be_overridden() {
        let request = SearchRequest::new()
            .with("wt", "xml")
            .with("fq", "doc_type:abstract")
            .with("api_key", "stolen")
            .query("title:cancer");
        let url = build_url(request, &test_config());

        assert_eq!(url.matches("wt=").count(), 1);
        assert_eq!(url.matches("wt=json").count(), 1);
        assert_eq!(url.matches("fq=").count(), 1);
        assert_eq!(url.matches(ENCODED_FILTER).count(), 1);
        assert_eq!(url.matches("api_key=").count(), 1);
        assert_eq!(url.matches("api_key=test-key").count(), 1);
        assert!(!url.contains("stolen"));
    }

    #[test]
    fn test_insertion_order_and_last_write_wins() {
        let request = SearchRequest::new()
            .query("a")
            .rows(10)
            .fields(&["id", "title"])
            .query("b");
        let keys: Vec<&str> = request.params().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["q", "rows", "fl"]);
        assert_eq!(request.get("q"), Some("b"));
        assert_eq!(request.requested_fields(), Some(vec!["id", "title"]));
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let request = SearchRequest::new().query(r#"author:"Michael B Eisen""#);
        let url = build_url(request, &test_config());
        assert!(url.contains("q=author%3A%22Michael%20B%20Eisen%22"));
    }
}
