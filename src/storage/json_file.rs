//! A single-file JSON store for the inventory collection.
//!
//! The whole collection is rewritten on every save. Loading is deliberately
//! lenient: a missing or unreadable file yields an empty collection, and
//! malformed numeric fields inside a record are coerced to safe defaults
//! (quantity `0`, price `0.0`, threshold `1`) rather than rejecting the
//! file. Records whose id cannot be parsed are skipped with a warning.

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{
    Item, ItemId,
    item::round_price,
};

/// The persistence adapter: a path to a JSON file holding the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    path: PathBuf,
}

/// The collection could not be written to storage.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The collection could not be serialized.
    #[error("failed to serialize inventory: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The file could not be written or replaced.
    #[error("failed to write {path}: {source}")]
    Io {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl DataFile {
    /// A data file at the given path. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the storage file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection from the file.
    ///
    /// Returns an empty collection if the file is absent, unreadable, or
    /// not a JSON array. Individual records are coerced per the fallback
    /// table in the module docs; records with unusable ids, duplicate ids,
    /// or empty names are skipped. Every fallback is logged as a warning.
    #[must_use]
    pub fn load(&self) -> Vec<Item> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read {}: {e}. Starting empty.", self.path.display());
                return Vec::new();
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&text) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Could not parse {}: {e}. Starting empty.", self.path.display());
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(values.len());

        for value in values {
            let Some(item) = try_load_record(value) else {
                continue;
            };
            if !seen.insert(item.id()) {
                tracing::warn!("Skipping record with duplicate id {}", item.id());
                continue;
            }
            items.push(item);
        }

        items
    }

    /// Write the full collection to the file, replacing prior contents.
    ///
    /// The data is written to a sibling temporary file and renamed into
    /// place, so the replacement is atomic from the caller's perspective.
    ///
    /// # Errors
    ///
    /// Returns a [`SaveError`] if the collection cannot be serialized or
    /// the file cannot be written.
    pub fn save(&self, items: &[Item]) -> Result<(), SaveError> {
        let records: Vec<ItemRecord> = items.iter().map(ItemRecord::from).collect();
        let mut json = serde_json::to_string_pretty(&records)?;
        json.push('\n');

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(|source| SaveError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| SaveError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// The on-disk representation of an item.
///
/// The id is written as a JSON string for compatibility with existing data
/// files; numeric fields accept string-encoded forms and fall back to
/// defaults when malformed.
#[derive(Debug, Serialize, Deserialize)]
struct ItemRecord {
    #[serde(deserialize_with = "lenient_id")]
    id: String,
    name: String,
    #[serde(default, deserialize_with = "quantity_or_zero")]
    quantity: i64,
    #[serde(default, deserialize_with = "price_or_zero")]
    price: f64,
    #[serde(default = "default_threshold", deserialize_with = "threshold_or_one")]
    threshold: i64,
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().to_string(),
            quantity: item.quantity(),
            price: item.price(),
            threshold: item.threshold(),
        }
    }
}

fn try_load_record(value: serde_json::Value) -> Option<Item> {
    let record: ItemRecord = match serde_json::from_value(value) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Skipping unreadable inventory record: {e}");
            return None;
        }
    };

    let Ok(id @ ItemId(1..)) = record.id.parse() else {
        tracing::warn!("Skipping record with unusable id {:?}", record.id);
        return None;
    };

    let name = record.name.trim();
    if name.is_empty() {
        tracing::warn!("Skipping record {id} with an empty name");
        return None;
    }

    Some(Item {
        id,
        name: name.to_string(),
        quantity: record.quantity,
        price: record.price,
        threshold: record.threshold,
    })
}

/// JSON value shapes a numeric field may arrive in.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawNumber {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Other(_) => None,
        }
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawNumber::deserialize(deserializer)? {
        RawNumber::Int(i) => i.to_string(),
        RawNumber::Float(f) => f.to_string(),
        RawNumber::Text(s) => s,
        RawNumber::Other(value) => value.to_string(),
    })
}

fn quantity_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(RawNumber::deserialize(deserializer)
        .ok()
        .and_then(|raw| raw.as_i64())
        .filter(|quantity| *quantity >= 0)
        .unwrap_or(0))
}

fn price_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(RawNumber::deserialize(deserializer)
        .ok()
        .and_then(|raw| raw.as_f64())
        .filter(|price| price.is_finite() && *price >= 0.0)
        .map(round_price)
        .unwrap_or(0.0))
}

fn threshold_or_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(RawNumber::deserialize(deserializer)
        .ok()
        .and_then(|raw| raw.as_i64())
        .filter(|threshold| *threshold >= 1)
        .unwrap_or(1))
}

const fn default_threshold() -> i64 {
    1
}
