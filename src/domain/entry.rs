// src/domain/entry.rs
//
// Entry
//
// One content item inside a partition, as stored by the catalog exporter.
// Field names follow the exporter's PascalCase layout.
//
// Decoding is lenient: a field of the wrong JSON type reads as absent instead
// of failing the whole entry, so one malformed attribute never hides the rest
// of the page.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Provider tag of the external ids this index is keyed by.
pub const TMDB_PROVIDER: &str = "tmdb";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalId {
    #[serde(rename = "Provider", default, deserialize_with = "string_or_empty")]
    pub provider: String,

    #[serde(rename = "ID", default, deserialize_with = "string_or_empty")]
    pub id: String,
}

impl ExternalId {
    /// A usable TMDB id: right provider and a non-empty id.
    pub fn tmdb_id(&self) -> Option<&str> {
        if self.provider == TMDB_PROVIDER && !self.id.is_empty() {
            Some(&self.id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// `None` when the list is missing; the entry is then skipped entirely.
    #[serde(
        rename = "ExternalIds",
        default,
        deserialize_with = "external_id_list"
    )]
    pub external_ids: Option<Vec<ExternalId>>,

    #[serde(rename = "Deeplinks", default, deserialize_with = "object_or_empty")]
    pub deeplinks: Map<String, Value>,

    #[serde(rename = "Title", default, deserialize_with = "string_or_none")]
    pub title: Option<String>,

    #[serde(rename = "Year", default, deserialize_with = "year_or_none")]
    pub year: Option<i64>,

    #[serde(rename = "PlatformCode", default, deserialize_with = "string_or_none")]
    pub platform_code: Option<String>,

    #[serde(
        rename = "PlatformCountry",
        default,
        deserialize_with = "string_or_none"
    )]
    pub platform_country: Option<String>,
}

impl Entry {
    /// Decode a raw store value. Non-object values (null, scalars, lists)
    /// are not entries and yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Every usable TMDB id carried by this entry, in list order.
    pub fn tmdb_ids(&self) -> impl Iterator<Item = &str> {
        self.external_ids
            .iter()
            .flatten()
            .filter_map(ExternalId::tmdb_id)
    }
}

// ============================================================================
// LENIENT FIELD DECODERS
// ============================================================================

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Ids are usually strings but older exports wrote bare numbers. A numeric
/// zero is a placeholder, not an id.
fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn object_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

/// Zero is treated as "no year", like a missing value.
fn year_or_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let year = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(year.filter(|y| *y != 0))
}

/// The store hands back sparse lists as objects keyed by index, and holes
/// as nulls. Both shapes decode to the same ordered list.
fn external_id_list<'de, D>(deserializer: D) -> Result<Option<Vec<ExternalId>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<Value> = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Object(map) => {
            let mut indexed: Vec<(String, Value)> = map.into_iter().collect();
            indexed.sort_by(|(a, _), (b, _)| match (a.parse::<u64>(), b.parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => a.cmp(b),
            });
            indexed.into_iter().map(|(_, v)| v).collect()
        }
        _ => return Ok(None),
    };

    Ok(Some(
        items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}
