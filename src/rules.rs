//! Domain heuristics for the fields that are not stored in the reference
//! table.

use crate::errors::ProfileError;

/// Marker for the 130g pouch format.
const POUCH_MARKER: &str = "130g";

/// Marker for the 500ml bottle format.
const BOTTLE_MARKER: &str = "500ml";

/// Normalizes a raw identifier cell into a reference table key.
pub fn canonical_identifier(raw: &str) -> &str {
    raw.trim()
}

/// Uppercases a name and replaces spaces with underscores.
pub fn code_segment(value: &str) -> String {
    value.to_uppercase().replace(' ', "_")
}

/// The flavour is the second word of the display name, e.g. `STRAWBERRY`
/// for "SPK Strawberry Chews 130g".
pub fn flavour_code(display_name: &str) -> Result<String, ProfileError> {
    display_name
        .split_whitespace()
        .nth(1)
        .map(str::to_uppercase)
        .ok_or_else(|| ProfileError::DisplayNameTooShort(display_name.to_string()))
}

/// Classifies the pack size from the free text description. The markers are
/// matched case-sensitively and the pouch marker wins when both appear.
pub fn size_code(raw_description: &str) -> &'static str {
    if raw_description.contains(POUCH_MARKER) {
        "130G"
    } else if raw_description.contains(BOTTLE_MARKER) {
        "500ML"
    } else {
        "STD"
    }
}

/// Builds the standard naming framework code:
/// `SUPPLIER_CATEGORY_FLAVOUR_SIZE`.
pub fn naming_code(
    supplier: &str,
    category: &str,
    display_name: &str,
    raw_description: &str,
) -> Result<String, ProfileError> {
    Ok(format!(
        "{}_{}_{}_{}",
        code_segment(supplier),
        code_segment(category),
        flavour_code(display_name)?,
        size_code(raw_description)
    ))
}

/// Cases per pallet is a two value lookup keyed on the pouch marker alone.
pub fn cases_per_pallet(raw_description: &str) -> &'static str {
    if raw_description.contains(POUCH_MARKER) {
        "120"
    } else {
        "80"
    }
}
