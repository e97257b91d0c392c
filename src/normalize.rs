//! Search response normalization.
//!
//! The search endpoint answers either with a JSON envelope
//! (`{"response": {"docs": [...]}}`) or, on older deployments, with Solr XML
//! markup (`<result><doc><str name="id">...</str></doc></result>`). Both are
//! reduced to an ordered list of [`ArticleRecord`]s.

use crate::error::{OptionExt, PlosError, Result};
use crate::journals::JournalDirectory;
use scraper::{ElementRef, Html, Selector};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// One search hit. Only the fields the request asked for are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// DOI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Journal display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    /// ISO-8601 publication timestamp
    #[serde(default, alias = "publication_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// All-time views
    #[serde(
        default,
        deserialize_with = "de_view_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub counter_total_all: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_display: Option<Vec<String>>,
    /// Any other returned field, untouched
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl ArticleRecord {
    pub fn require_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .ok_or_malformed("document has no 'id' field")
    }

    pub fn require_journal(&self) -> Result<&str> {
        self.journal
            .as_deref()
            .ok_or_malformed("document has no 'journal' field")
    }

    /// View count, with a missing count read as zero.
    pub fn views(&self) -> u64 {
        self.counter_total_all.unwrap_or(0)
    }

    /// Public landing page of the article.
    pub fn article_url(&self, journals: &JournalDirectory) -> Result<String> {
        journals.format_article_url(self.require_id()?, self.require_journal()?)
    }
}

/// View counts arrive as integers or, from markup and some proxies, as strings.
fn de_view_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
            de::Error::custom(format!("view count is not a non-negative integer: {}", n))
        }),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("view count '{}' is not an integer: {}", s, e))),
        Some(other) => Err(de::Error::custom(format!(
            "view count has unexpected type: {}",
            other
        ))),
    }
}

fn record_from_value(index: usize, doc: Value) -> Result<ArticleRecord> {
    serde_json::from_value(doc)
        .map_err(|e| PlosError::MalformedResponse(format!("document {}: {}", index, e)))
}

/// Extract records from a decoded JSON envelope.
///
/// # Errors
///
/// Returns `MalformedResponse` if `response.docs` is missing or a document
/// cannot be read.
pub fn normalize_json(response: &Value) -> Result<Vec<ArticleRecord>> {
    let docs = response
        .get("response")
        .and_then(|r| r.get("docs"))
        .and_then(Value::as_array)
        .ok_or_malformed("response has no 'response.docs' list")?;

    debug!(count = docs.len(), "Normalizing JSON documents");

    docs.iter()
        .cloned()
        .enumerate()
        .map(|(i, doc)| record_from_value(i, doc))
        .collect()
}

/// Extract records from Solr XML/HTML markup.
pub fn normalize_markup(markup: &str) -> Result<Vec<ArticleRecord>> {
    let document = Html::parse_document(markup);

    let result_selector =
        Selector::parse("result").map_err(|e| PlosError::MalformedResponse(e.to_string()))?;
    let doc_selector =
        Selector::parse("doc").map_err(|e| PlosError::MalformedResponse(e.to_string()))?;

    let result = document
        .select(&result_selector)
        .next()
        .ok_or_malformed("markup response has no <result> element")?;

    let records = result
        .select(&doc_selector)
        .enumerate()
        .map(|(i, doc)| record_from_value(i, markup_fields(doc)))
        .collect::<Result<Vec<_>>>()?;

    debug!(count = records.len(), "Normalized markup documents");
    Ok(records)
}

/// Decode a raw body, choosing the variant by its first character.
pub fn normalize_body(body: &str) -> Result<Vec<ArticleRecord>> {
    if body.trim_start().starts_with('<') {
        return normalize_markup(body);
    }
    let response: Value = serde_json::from_str(body)
        .map_err(|e| PlosError::MalformedResponse(format!("Failed to parse search response: {}", e)))?;
    normalize_json(&response)
}

/// `<str name="x">..</str>` -> `"x": ".."`, `<arr name="y">` -> `"y": [..]`
fn markup_fields(doc: ElementRef) -> Value {
    let mut fields = Map::new();
    for child in doc.children().filter_map(ElementRef::wrap) {
        let Some(name) = child.value().attr("name") else {
            continue;
        };
        let value = match child.value().name() {
            "arr" => Value::Array(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .map(markup_scalar)
                    .collect(),
            ),
            _ => markup_scalar(child),
        };
        fields.insert(name.to_string(), value);
    }
    Value::Object(fields)
}

fn markup_scalar(element: ElementRef) -> Value {
    let text = element.text().collect::<String>().trim().to_string();
    match element.value().name() {
        "int" | "long" => text.parse::<i64>().map(Value::from).unwrap_or(Value::String(text)),
        "float" | "double" => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::String(text)),
        "bool" => match text.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(text),
        },
        _ => Value::String(text),
    }
}
