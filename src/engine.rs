use crate::catalog::{CatalogRow, InputRow};
use crate::errors::{ProfileError, SetupError};
use crate::reference::{ReferenceRecord, ReferenceTable};
use crate::render::{
    profile_file_name, render_profile, write_profile, DEFAULT_MIN_DOCUMENT_BYTES,
};
use crate::rules;
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A catalog row joined with its verified reference record.
///
/// Every derived field is computed when the product is enriched, so a value
/// of this type always carries everything the renderer needs.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedProduct<'a> {
    /// The trimmed identifier used to find `record`.
    pub product_id: String,

    /// Carried over verbatim from the catalog row.
    pub supplier: String,

    /// Carried over verbatim from the catalog row. The size and pallet rules
    /// read this field.
    pub raw_description: String,

    pub record: &'a ReferenceRecord,

    /// Standard naming framework code, e.g.
    /// `ACME_FOODS_CHEWY_SWEETS_STRAWBERRY_130G`.
    pub naming_code: String,

    pub cases_per_pallet: &'static str,
}

/// Joins a catalog row against the reference table and derives the computed
/// fields.
///
/// The row's own fields (supplier and description) never collide with
/// reference fields; the record is kept whole and is the only source for
/// every other field.
pub fn enrich<'a>(
    row: &InputRow,
    table: &'a ReferenceTable,
) -> Result<EnrichedProduct<'a>, ProfileError> {
    let product_id = rules::canonical_identifier(&row.product_id);
    let record = table
        .get(product_id)
        .ok_or_else(|| ProfileError::MissingReferenceData(product_id.to_string()))?;

    let naming_code = rules::naming_code(
        &row.supplier,
        &record.category,
        &record.display_name,
        &row.description,
    )?;

    Ok(EnrichedProduct {
        product_id: product_id.to_string(),
        supplier: row.supplier.clone(),
        raw_description: row.description.clone(),
        record,
        naming_code,
        cases_per_pallet: rules::cases_per_pallet(&row.description),
    })
}

/// Counts of the rows processed by a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }
}

/// Drives enrichment and rendering for every row of a catalog, writing one
/// document per resolvable row into `output_dir`.
pub struct ProfileGenerator<'a> {
    reference: &'a ReferenceTable,
    output_dir: PathBuf,
    min_document_bytes: u64,
    generated_at: NaiveDateTime,
}

impl<'a> ProfileGenerator<'a> {
    /// Creates a generator stamping documents with the current local time.
    pub fn new(reference: &'a ReferenceTable, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            reference,
            output_dir: output_dir.into(),
            min_document_bytes: DEFAULT_MIN_DOCUMENT_BYTES,
            generated_at: Local::now().naive_local(),
        }
    }

    pub fn with_min_document_bytes(mut self, min_document_bytes: u64) -> Self {
        self.min_document_bytes = min_document_bytes;
        self
    }

    /// Overrides the timestamp printed in each document footer.
    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Creates the output directory if it does not already exist.
    pub fn prepare(&self) -> Result<(), SetupError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|err| SetupError::OutputDirectory(self.output_dir.clone(), err))
    }

    /// Returns the path the document for `product` is written to.
    pub fn document_path(&self, product: &EnrichedProduct<'_>) -> PathBuf {
        self.output_dir
            .join(profile_file_name(&product.product_id, &product.record.display_name))
    }

    /// Enriches, renders, and writes the document for a single row.
    pub fn generate(&self, row: &InputRow) -> Result<PathBuf, ProfileError> {
        let product = enrich(row, self.reference)?;
        let path = self.document_path(&product);

        let document = render_profile(&product, self.generated_at)?;
        let written = write_profile(&path, &document, self.min_document_bytes)?;
        tracing::debug!(
            product_id = %product.product_id,
            path = %path.display(),
            bytes = written,
            "wrote profile"
        );

        Ok(path)
    }

    /// Processes every row in order, reporting progress to `out`.
    ///
    /// A failing row, including one the loader could not parse, is reported
    /// and counted but never stops the run. Only errors writing to `out` are
    /// returned.
    pub fn run<W: Write>(&self, rows: &[CatalogRow], out: &mut W) -> io::Result<RunSummary> {
        let mut summary = RunSummary {
            total: rows.len(),
            succeeded: 0,
        };

        for (index, row) in rows.iter().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    tracing::error!(row = index + 1, "{}", err);
                    writeln!(out, "Processing row {}... \u{2717} {}", index + 1, err)?;
                    continue;
                }
            };

            let product_id = rules::canonical_identifier(&row.product_id);
            write!(out, "Processing {}... ", product_id)?;

            match self.generate(row) {
                Ok(path) => {
                    summary.succeeded += 1;
                    writeln!(out, "\u{2713} Saved to {}", path.display())?;
                }
                Err(err) => {
                    tracing::error!(row = index + 1, product_id = %product_id, "{}", err);
                    writeln!(out, "\u{2717} {}", err)?;
                }
            }
        }

        let rule = "=".repeat(50);
        writeln!(out, "{}", rule)?;
        writeln!(
            out,
            "Successfully generated {}/{} profiles",
            summary.succeeded, summary.total
        )?;
        writeln!(out, "Output directory: {}", self.output_dir.display())?;
        writeln!(
            out,
            "Failed to generate profiles for {} products",
            summary.failed()
        )?;
        writeln!(out, "{}", rule)?;

        Ok(summary)
    }
}
