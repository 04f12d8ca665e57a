use crate::encoding::{decode_with_fallback, repair_double_encoding, TextEncoding};
use crate::errors::{LoadError, ProfileError};
use csv::{StringRecord, Trim};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A single product occurrence in the source catalog. Columns other than
/// these three are ignored.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct InputRow {
    #[serde(rename = "Product ID")]
    pub product_id: String,

    #[serde(rename = "Supplier")]
    pub supplier: String,

    #[serde(rename = "Product Description")]
    pub description: String,
}

/// A parsed catalog row, or the reason that row could not be parsed.
pub type CatalogRow = Result<InputRow, ProfileError>;

/// The decoded rows of a catalog file, in source order.
#[derive(Debug)]
pub struct Catalog {
    encoding: TextEncoding,
    rows: Vec<CatalogRow>,
}

impl Catalog {
    /// Reads the catalog at `path`, decoding it with the first of
    /// `encodings` that accepts every byte in the file.
    pub fn load(path: &Path, encodings: &[TextEncoding]) -> Result<Self, LoadError> {
        let bytes = fs::read(path).map_err(|err| LoadError::Unreadable(path.to_path_buf(), err))?;
        Self::from_bytes(&bytes, encodings)
    }

    /// Decodes and parses an in-memory catalog.
    ///
    /// Only decoding and the header row can fail the whole load. A row that
    /// does not fit the header is kept as a `ProfileError::MalformedRow` in
    /// its place.
    pub fn from_bytes(bytes: &[u8], encodings: &[TextEncoding]) -> Result<Self, LoadError> {
        let (encoding, text) = decode_with_fallback(bytes, encodings)
            .ok_or_else(|| LoadError::UnsupportedEncoding(encodings.to_vec()))?;
        tracing::debug!(encoding = %encoding, bytes = bytes.len(), "decoded catalog");

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());
        let headers = reader.headers()?.clone();

        let mut rows: Vec<CatalogRow> = Vec::new();
        for (index, record) in reader.records().enumerate() {
            // Header names are left alone; only cell values are repaired.
            let parsed = record.and_then(|record| {
                let repaired: StringRecord = record.iter().map(repair_double_encoding).collect();
                repaired.deserialize::<InputRow>(Some(&headers))
            });
            rows.push(parsed.map_err(|err| ProfileError::MalformedRow(index + 1, err)));
        }

        Ok(Self { encoding, rows })
    }

    /// The encoding that successfully decoded the file.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// The rows that parsed, skipping malformed ones.
    pub fn valid_rows(&self) -> impl Iterator<Item = &InputRow> {
        self.rows.iter().filter_map(|row| row.as_ref().ok())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TryFrom<PathBuf> for Catalog {
    type Error = LoadError;

    /// Loads the catalog using the default encoding priority order.
    fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
        Self::load(&path, &TextEncoding::DEFAULT_ORDER)
    }
}
