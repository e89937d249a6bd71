//! Cell coercion shared by every CSV loader.
//!
//! The rules are fixed: surrounding whitespace is ignored, an empty cell is
//! NULL, and a numeric column that does not parse to a finite number is NULL.

use std::collections::HashMap;

use csv::StringRecord;

/// Trimmed text, `None` when empty.
pub fn text(raw: Option<&str>) -> Option<String> {
    let v = raw?.trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// Finite number, `None` when empty or unparseable.
pub fn number(raw: Option<&str>) -> Option<f64> {
    let v = raw?.trim();
    if v.is_empty() {
        return None;
    }
    v.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Column lookup by header name (case-insensitive, BOM and whitespace stripped).
#[derive(Debug, Clone)]
pub struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    /// Index a header row; on duplicate names the first occurrence wins.
    pub fn new(headers: &StringRecord) -> Self {
        let mut index = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            let key = h.trim_start_matches('\u{feff}').trim().to_lowercase();
            index.entry(key).or_insert(i);
        }
        Self { index }
    }

    /// True if the header row carries `name`.
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Raw cell for `name`; `None` when the column or the cell is absent.
    pub fn get<'r>(&self, rec: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.index.get(name).and_then(|&i| rec.get(i))
    }

    /// [`text`] of the cell for `name`.
    pub fn text(&self, rec: &StringRecord, name: &str) -> Option<String> {
        text(self.get(rec, name))
    }

    /// [`number`] of the cell for `name`.
    pub fn number(&self, rec: &StringRecord, name: &str) -> Option<f64> {
        number(self.get(rec, name))
    }
}
