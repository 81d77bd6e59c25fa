use std::{fs::read_to_string, path::Path};

use anyhow::Result;
use serde::Deserialize;

/// One vocabulary row: the lowercase token to match and the display
/// text to emit for it.
#[derive(Clone, Debug, Deserialize)]
pub struct BrandEntry {
    pub key: String,
    pub canonical: String,
}

/// Ordered brand vocabulary. List order encodes priority: the first
/// entry whose key equals any input token wins, regardless of where
/// that token sits in the input.
pub struct BrandVocabulary {
    entries: Vec<BrandEntry>,
}

impl BrandVocabulary {
    pub fn new(entries: Vec<BrandEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|mut x| {
                    x.key = x.key.to_lowercase();
                    x
                })
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(ron::from_str(&read_to_string(path)?)?))
    }

    /// The gas-station vocabulary shipped with the binary, ordered by
    /// station count in Germany.
    pub fn builtin() -> Self {
        Self::new(ron::from_str(include_str!("../config/brands.ron")).expect("hardcoded"))
    }

    /// Maps free text onto the vocabulary: lowercase, strip
    /// parentheses, split on whitespace and hyphens, walk the entries
    /// in order. `None` means no canonical brand; the caller decides
    /// whether that drops the record.
    pub fn normalize(&self, raw: &str) -> Option<&str> {
        let text = raw.to_lowercase().replace(['(', ')'], " ");
        let tokens: Vec<&str> = text
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|x| !x.is_empty())
            .collect();

        for entry in &self.entries {
            if tokens.iter().any(|x| *x == entry.key) {
                return Some(&entry.canonical);
            }
        }
        None
    }

    /// An explicit brand field is more trustworthy than a display name.
    pub fn normalize_place(&self, brand: Option<&str>, name: Option<&str>) -> Option<&str> {
        brand
            .and_then(|x| self.normalize(x))
            .or_else(|| name.and_then(|x| self.normalize(x)))
    }
}
