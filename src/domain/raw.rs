//! Records as they arrive from the content API.
//!
//! The API is loosely typed: ids show up as strings or numbers, captions as a
//! string or a list, positions are sometimes missing. Everything here accepts
//! those variations and drops what it cannot read instead of failing the
//! whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::app::{PortalError, Result};

/// The `articles/summary` payload.
#[derive(Debug, Clone, Default)]
pub struct SummaryDocument {
    pub highlighted: Vec<RawArticle>,
    pub monthly: Vec<RawArticle>,
    /// `latest_per_category`, in document order.
    pub categories: Vec<(String, Vec<RawArticle>)>,
}

impl SummaryDocument {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// Build from parsed JSON, unwrapping up to two `data` envelopes.
    pub fn from_value(value: Value) -> Result<Self> {
        let root = unwrap_envelope(&value);
        let Some(root) = root.as_object() else {
            return Err(PortalError::InvalidDocument(
                "summary is not a JSON object".into(),
            ));
        };

        let highlighted = root.get("highlighted").map(article_list).unwrap_or_default();

        let monthly = root
            .get("hot_news")
            .and_then(|h| h.get("monthly"))
            .map(article_list)
            .unwrap_or_default();

        let categories = root
            .get("latest_per_category")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .map(|(label, entry)| {
                        let list = entry.get("new_list").map(article_list).unwrap_or_default();
                        (label.clone(), list)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            highlighted,
            monthly,
            categories,
        })
    }

    /// Latest articles for one category label, empty when absent.
    pub fn category(&self, label: &str) -> &[RawArticle] {
        self.categories
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// Every article in lookup order: highlighted, monthly, then categories.
    pub fn all_articles(&self) -> impl Iterator<Item = &RawArticle> {
        self.highlighted
            .iter()
            .chain(self.monthly.iter())
            .chain(self.categories.iter().flat_map(|(_, list)| list.iter()))
    }

    pub fn find_article(&self, id: &str) -> Option<&RawArticle> {
        self.all_articles().find(|a| a.id.as_deref() == Some(id))
    }
}

fn unwrap_envelope(value: &Value) -> &Value {
    let mut current = value;
    for _ in 0..2 {
        if current.get("highlighted").is_some() {
            break;
        }
        match current.get("data") {
            Some(inner) if inner.is_object() => current = inner,
            _ => break,
        }
    }
    current
}

fn article_list(value: &Value) -> Vec<RawArticle> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match RawArticle::deserialize(item) {
            Ok(article) => Some(article),
            Err(e) => {
                tracing::debug!("Skipping unreadable article record: {}", e);
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawArticle {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// HTML.
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub category_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub publish_time: Option<String>,
    #[serde(deserialize_with = "lenient_details")]
    pub details: Vec<DetailItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    Text,
    Quotes,
    Image,
    Unknown,
}

impl DetailKind {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => DetailKind::Text,
            "quotes" => DetailKind::Quotes,
            "image" => DetailKind::Image,
            _ => DetailKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailItem {
    #[serde(rename = "type", deserialize_with = "detail_kind")]
    pub kind: DetailKind,
    #[serde(default, deserialize_with = "lenient_position")]
    pub position: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub data: Option<String>,
    #[serde(default, deserialize_with = "lenient_captions")]
    pub caption: Vec<String>,
}

impl DetailItem {
    pub fn is_textual(&self) -> bool {
        matches!(self.kind, DetailKind::Text | DetailKind::Quotes)
    }

    pub fn data(&self) -> &str {
        self.data.as_deref().unwrap_or("")
    }
}

fn detail_kind<'de, D>(deserializer: D) -> std::result::Result<DetailKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .map(DetailKind::from_tag)
        .unwrap_or(DetailKind::Unknown))
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_position<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn lenient_captions<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.is_empty() => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_details<'de, D>(deserializer: D) -> std::result::Result<Vec<DetailItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(|item| match DetailItem::deserialize(item) {
            Ok(detail) => Some(detail),
            Err(e) => {
                tracing::debug!("Dropping malformed detail item: {}", e);
                None
            }
        })
        .collect())
}
