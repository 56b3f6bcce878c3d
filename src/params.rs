//! Transform parameter maps.
//!
//! Parameters arrive from the templating layer as loosely-typed key/value
//! pairs, so [`Params`] wraps a JSON object and offers typed accessors with
//! template-friendly semantics:
//!
//! - **Presence**: a key whose value is `null` is treated as absent.
//! - **Truthiness**: `false`, `0`, `0.0`, `""`, `"0"`, `null`, and empty
//!   arrays/objects are falsy; everything else is truthy.
//! - **Numbers**: numeric options accept JSON numbers or numeric strings.
//!
//! ## Alias keys
//!
//! A few options have historically been accepted under several spellings.
//! [`Params::normalized`] folds every alias onto one canonical key before any
//! translation rule looks at the map:
//!
//! | Canonical | Aliases |
//! |---|---|
//! | `autoRotate` | `auto-rotate`, `auto_rotate`, `autorotate` |
//! | `cacheBuster` | `cachebuster` |
//! | `resizingAlgorithm` | `resizing_algorithm` |

use crate::error::{Error, Result};
use crate::ratio::Ratio;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const ALIASES: &[(&str, &[&str])] = &[
    ("autoRotate", &["auto-rotate", "auto_rotate", "autorotate"]),
    ("cacheBuster", &["cachebuster"]),
    ("resizingAlgorithm", &["resizing_algorithm"]),
];

/// An ordered parameter map, e.g. `{"width": 800, "ratio": "16:9"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Raw value for `key`, with `null` treated as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    /// Key-for-key overlay: entries in `overrides` win.
    pub fn merged(&self, overrides: &Params) -> Params {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        Params(merged)
    }

    /// Fold alias spellings onto their canonical key.
    ///
    /// The canonical key keeps its value when it is truthy; otherwise the
    /// first truthy alias (in table order) takes its place. Alias keys are
    /// removed either way.
    pub fn normalized(&self) -> Params {
        let mut map = self.0.clone();
        for (canonical, aliases) in ALIASES {
            let mut candidates = Vec::with_capacity(aliases.len() + 1);
            candidates.extend(map.remove(*canonical));
            for alias in *aliases {
                candidates.extend(map.remove(*alias));
            }
            let chosen = candidates
                .iter()
                .find(|v| is_truthy(v))
                .or_else(|| candidates.first())
                .cloned();
            if let Some(value) = chosen {
                map.insert(canonical.to_string(), value);
            }
        }
        Params(map)
    }

    /// String value. Numbers and booleans are rendered as text.
    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).map(value_to_string)
    }

    /// Numeric value, or `None` when absent.
    pub fn number(&self, key: &str) -> Result<Option<f64>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        value_to_f64(value)
            .map(Some)
            .ok_or_else(|| Error::validation(format!("Option `{key}` expects a number, got `{}`", value_to_string(value))))
    }

    /// Integer value. Fractional input is rounded.
    pub fn integer(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.number(key)?.map(|n| n.round() as i64))
    }

    /// Pixel dimension: a non-negative integer.
    pub fn dimension(&self, key: &str) -> Result<Option<u32>> {
        match self.number(key)? {
            None => Ok(None),
            Some(n) if n >= 0.0 && n <= u32::MAX as f64 => Ok(Some(n.round() as u32)),
            Some(n) => Err(Error::validation(format!(
                "Option `{key}` must be a non-negative pixel size, got `{n}`"
            ))),
        }
    }

    /// Parsed `ratio`-style value, or `None` when absent.
    pub fn ratio(&self, key: &str) -> Result<Option<Ratio>> {
        self.string(key).map(|s| s.parse()).transpose()
    }

    /// Array of numbers (used for `padding`).
    pub fn numbers(&self, key: &str) -> Result<Option<Vec<f64>>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let invalid = || Error::validation(format!("Option `{key}` expects a list of numbers"));
        let items = value.as_array().ok_or_else(invalid)?;
        items
            .iter()
            .map(|v| value_to_f64(v).ok_or_else(invalid))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
