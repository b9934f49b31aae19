//! Glyph placement table: where each glyph index lands on the template.
//!
//! The table is configuration data, not logic. It maps a glyph index to the
//! target *center* on the template canvas. The default table for the stock
//! 88-slot font template ships in `assets/placements.json` and is compiled
//! into the binary; callers with another template load their own JSON.
//!
//! ## JSON format
//!
//! ```json
//! { "0": [335, 675], "1": [820, 675], "letter_2": [1300, 670] }
//! ```
//!
//! Keys are glyph indices; a `letter_` prefix (the artifact file stem) is
//! accepted and ignored. Values are `[x, y]` pixel coordinates.

use crate::error::GlyphGridError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

static BUNDLED_JSON: &str = include_str!("../assets/placements.json");

static BUNDLED: Lazy<PlacementTable> = Lazy::new(|| {
    PlacementTable::from_json_str(BUNDLED_JSON).expect("bundled placement table is valid")
});

/// Glyph index → target center on the template canvas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementTable {
    centers: BTreeMap<usize, (i32, i32)>,
}

impl PlacementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for the stock 88-slot template.
    pub fn bundled() -> &'static PlacementTable {
        &BUNDLED
    }

    pub fn from_json_str(json: &str) -> Result<Self, GlyphGridError> {
        serde_json::from_str(json).map_err(|e| GlyphGridError::InvalidPlacementTable(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GlyphGridError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            GlyphGridError::PlacementTableUnreadable {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> String {
        // A map of integer keys to integer pairs always serialises.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Set or replace the target center for `index`.
    pub fn insert(&mut self, index: usize, center: (i32, i32)) -> Option<(i32, i32)> {
        self.centers.insert(index, center)
    }

    pub fn get(&self, index: usize) -> Option<(i32, i32)> {
        self.centers.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Entries in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, (i32, i32))> + '_ {
        self.centers.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(usize, (i32, i32))> for PlacementTable {
    fn from_iter<T: IntoIterator<Item = (usize, (i32, i32))>>(iter: T) -> Self {
        Self {
            centers: iter.into_iter().collect(),
        }
    }
}

fn parse_key(key: &str) -> Result<usize, String> {
    let digits = key.strip_prefix("letter_").unwrap_or(key);
    digits
        .trim()
        .parse()
        .map_err(|_| format!("placement key '{key}' is not a glyph index"))
}

impl<'de> Deserialize<'de> for PlacementTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<String, [i32; 2]> = BTreeMap::deserialize(deserializer)?;
        let mut centers = BTreeMap::new();
        for (key, [x, y]) in raw {
            let index = parse_key(&key).map_err(serde::de::Error::custom)?;
            if centers.insert(index, (x, y)).is_some() {
                return Err(serde::de::Error::custom(format!(
                    "duplicate placement for glyph {index}"
                )));
            }
        }
        Ok(Self { centers })
    }
}

impl Serialize for PlacementTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw: BTreeMap<String, [i32; 2]> = self
            .centers
            .iter()
            .map(|(k, (x, y))| (k.to_string(), [*x, *y]))
            .collect();
        raw.serialize(serializer)
    }
}
