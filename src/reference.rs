use crate::errors::ReferenceError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const EMBEDDED_REFERENCE: &str = include_str!("../data/reference.json");

/// Nutritional values per 100g or 100ml. Each value is kept exactly as it
/// was authored, magnitude and unit together.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NutritionFacts {
    pub energy: String,
    pub fat: String,
    pub saturates: String,
    pub carbohydrates: String,
    pub sugars: String,
    pub protein: String,
    pub salt: String,
}

/// Verified attributes for one product, maintained by hand outside of the
/// pipeline.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReferenceRecord {
    pub display_name: String,
    pub ingredients: String,
    pub allergens: String,
    pub nutrition: NutritionFacts,
    pub packaging: String,
    pub shelf_life: String,
    pub storage: String,
    pub origin: String,
    pub category: String,
    pub sku: String,
    pub image: String,
}

/// Read-only lookup from product identifier to its verified record. Keys
/// are matched exactly, including case.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct ReferenceTable {
    records: BTreeMap<String, ReferenceRecord>,
}

impl ReferenceTable {
    /// The table compiled into the binary from `data/reference.json`.
    pub fn embedded() -> Result<Self, ReferenceError> {
        Self::from_json_str(EMBEDDED_REFERENCE)
    }

    pub fn from_path(path: &Path) -> Result<Self, ReferenceError> {
        let json = fs::read_to_string(path)
            .map_err(|err| ReferenceError::Unreadable(path.to_path_buf(), err))?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ReferenceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, product_id: &str) -> Option<&ReferenceRecord> {
        self.records.get(product_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(String, ReferenceRecord)> for ReferenceTable {
    fn from_iter<I: IntoIterator<Item = (String, ReferenceRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
