use crate::engine::EnrichedProduct;
use crate::errors::RenderError;
use chrono::NaiveDateTime;
use encoding_rs::WINDOWS_1252;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// Extension used for every generated document.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Documents smaller than this are assumed to be empty or corrupt.
pub const DEFAULT_MIN_DOCUMENT_BYTES: u64 = 1024;

const FILE_NAME_CHARS: usize = 20;
const TITLE: &str = "PRODUCT PROFILE PORTFOLIO";

// Page geometry is in millimetres, A4 portrait.
const MM: f32 = 72.0 / 25.4;
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const CELL_PADDING: f32 = 1.0;
const PAGE_BREAK_Y: f32 = PAGE_HEIGHT - 20.0;
const FOOTER_Y: f32 = PAGE_HEIGHT - 20.0;

/// Width of a glyph as a fraction of the font size, used to estimate line
/// lengths for wrapping.
const WRAP_GLYPH_WIDTH: f32 = 0.6;

const BLACK: Rgb = Rgb(0, 0, 0);
const SECTION_FILL: Rgb = Rgb(230, 230, 250);
const ALLERGEN_RED: Rgb = Rgb(220, 50, 50);

#[derive(Clone, Copy, Debug, PartialEq)]
struct Rgb(u8, u8, u8);

impl Rgb {
    fn operands(self) -> Vec<Object> {
        [self.0, self.1, self.2]
            .iter()
            .map(|channel| Object::from(*channel as f32 / 255.0))
            .collect()
    }
}

/// The built-in Type1 fonts a profile uses.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Italic];

    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Italic => "Helvetica-Oblique",
        }
    }
}

/// One element of a profile page, top to bottom. Heights are in
/// millimetres.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Bold, centered document title.
    Title(String),

    /// Numbered section heading drawn on a filled bar.
    Section(String),

    /// A label with its value aligned at `column` from the left margin.
    Field {
        label: &'static str,
        value: String,
        column: f32,
    },

    /// Free text, wrapped to the page width.
    Text {
        text: String,
        size: f32,
        line_height: f32,
    },

    /// Wrapped text drawn in the allergen warning colour.
    Warning(String),

    Gap(f32),

    /// Centered italic line at the bottom of the last page.
    Footer(String),
}

/// Returns the file name for a product's document:
/// `{id}_{first 20 chars of the display name, spaces as underscores}.pdf`.
pub fn profile_file_name(product_id: &str, display_name: &str) -> String {
    let clean_name: String = display_name
        .replace(' ', "_")
        .chars()
        .take(FILE_NAME_CHARS)
        .collect();
    format!("{}_{}.{}", product_id, clean_name, DOCUMENT_EXTENSION)
}

/// Renders the full profile document for one product as PDF bytes.
///
/// The output depends only on the product and `generated_at`, so rendering
/// the same product twice with the same timestamp is byte-identical.
pub fn render_profile(
    product: &EnrichedProduct<'_>,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, RenderError> {
    render_pdf(&layout_profile(product, generated_at))
}

/// Lays out the sections of a profile in reading order.
pub fn layout_profile(product: &EnrichedProduct<'_>, generated_at: NaiveDateTime) -> Vec<Block> {
    let record = product.record;
    let nutrition = &record.nutrition;
    let mut blocks = vec![Block::Title(String::from(TITLE)), Block::Gap(8.0)];

    blocks.push(Block::Section(String::from("1. Core Identification")));
    fields(
        &mut blocks,
        50.0,
        &[
            ("Commercial Name:", record.display_name.as_str()),
            ("Brand:", product.supplier.as_str()),
            ("Product ID:", product.product_id.as_str()),
            ("SKU:", record.sku.as_str()),
            ("Category:", record.category.as_str()),
            ("Origin:", record.origin.as_str()),
        ],
    );
    blocks.push(Block::Gap(5.0));

    blocks.push(Block::Section(String::from("2. Composition")));
    blocks.push(text("Ingredients:", 12.0, 8.0));
    blocks.push(text(&record.ingredients, 11.0, 6.0));
    blocks.push(Block::Gap(3.0));
    blocks.push(Block::Warning(format!("Allergens: {}", record.allergens)));
    blocks.push(Block::Gap(5.0));

    blocks.push(Block::Section(String::from(
        "3. Nutritional Values (per 100g/ml)",
    )));
    fields(
        &mut blocks,
        65.0,
        &[
            ("Energy:", nutrition.energy.as_str()),
            ("Fat:", nutrition.fat.as_str()),
            ("of which saturates:", nutrition.saturates.as_str()),
            ("Carbohydrates:", nutrition.carbohydrates.as_str()),
            ("of which sugars:", nutrition.sugars.as_str()),
            ("Protein:", nutrition.protein.as_str()),
            ("Salt:", nutrition.salt.as_str()),
        ],
    );
    blocks.push(Block::Gap(5.0));

    blocks.push(Block::Section(String::from("4. Packaging & Logistics")));
    fields(
        &mut blocks,
        65.0,
        &[
            ("Primary Packaging:", record.packaging.as_str()),
            ("Shelf Life:", record.shelf_life.as_str()),
            ("Storage Conditions:", record.storage.as_str()),
            ("Cases per Pallet:", product.cases_per_pallet),
        ],
    );
    blocks.push(Block::Gap(5.0));

    blocks.push(Block::Section(String::from("5. Product Identification")));
    blocks.push(text("Standard Naming Framework:", 12.0, 8.0));
    blocks.push(text(&product.naming_code, 12.0, 8.0));
    blocks.push(Block::Gap(3.0));
    blocks.push(text("Product Image Reference:", 12.0, 8.0));
    blocks.push(text(&record.image, 12.0, 8.0));
    blocks.push(Block::Gap(5.0));

    blocks.push(Block::Footer(format!(
        "Generated on {} | Confidential",
        generated_at.format("%d %b %Y at %H:%M")
    )));

    blocks
}

fn fields(blocks: &mut Vec<Block>, column: f32, rows: &[(&'static str, &str)]) {
    for &(label, value) in rows {
        blocks.push(Block::Field {
            label,
            value: value.to_string(),
            column,
        });
    }
}

fn text(text: &str, size: f32, line_height: f32) -> Block {
    Block::Text {
        text: text.to_string(),
        size,
        line_height,
    }
}

/// Draws `blocks` onto as many A4 pages as they need and serializes the
/// result.
pub fn render_pdf(blocks: &[Block]) -> Result<Vec<u8>, RenderError> {
    let mut canvas = Canvas::new();

    for block in blocks {
        match block {
            Block::Title(title) => {
                canvas.ensure_room(10.0);
                canvas.centered_line(Font::Bold, 16.0, 10.0, title);
            }
            Block::Section(title) => {
                canvas.ensure_room(10.0);
                canvas.fill_bar(10.0, SECTION_FILL);
                canvas.line(Font::Bold, 14.0, 0.0, 10.0, title);
            }
            Block::Field {
                label,
                value,
                column,
            } => {
                canvas.ensure_room(8.0);
                canvas.draw_text(Font::Regular, 12.0, *column, 8.0, value);
                canvas.line(Font::Regular, 12.0, 0.0, 8.0, label);
            }
            Block::Text {
                text,
                size,
                line_height,
            } => canvas.paragraph(*size, *line_height, text),
            Block::Warning(text) => {
                canvas.set_color(ALLERGEN_RED);
                canvas.paragraph(12.0, 8.0, text);
                canvas.set_color(BLACK);
            }
            Block::Gap(height) => canvas.advance(*height),
            Block::Footer(text) => canvas.footer(text),
        }
    }

    write_document(canvas.finish())
}

/// Accumulates content stream operations page by page, tracking the
/// vertical cursor from the top of the current page.
struct Canvas {
    finished: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl Canvas {
    fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: Vec::new(),
            y: MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.y = MARGIN;
    }

    /// Starts a new page if a cell of `height` would cross the bottom margin.
    fn ensure_room(&mut self, height: f32) {
        if self.y + height > PAGE_BREAK_Y && !self.current.is_empty() {
            self.new_page();
        }
    }

    fn advance(&mut self, height: f32) {
        self.y += height;
    }

    fn set_color(&mut self, color: Rgb) {
        self.current.push(Operation::new("rg", color.operands()));
    }

    /// Fills a full-width bar of `height` at the cursor without moving it.
    fn fill_bar(&mut self, height: f32, color: Rgb) {
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        self.current.push(Operation::new("q", vec![]));
        self.set_color(color);
        self.current.push(Operation::new(
            "re",
            vec![
                (MARGIN * MM).into(),
                ((PAGE_HEIGHT - self.y - height) * MM).into(),
                (width * MM).into(),
                (height * MM).into(),
            ],
        ));
        self.current.push(Operation::new("f", vec![]));
        self.current.push(Operation::new("Q", vec![]));
    }

    /// Draws `text` vertically centered in a cell of `height` starting
    /// `offset` millimetres right of the margin. The cursor does not move.
    fn draw_text(&mut self, font: Font, size: f32, offset: f32, height: f32, text: &str) {
        let x = (MARGIN + CELL_PADDING + offset) * MM;
        let baseline = (PAGE_HEIGHT - self.y - height / 2.0) * MM - 0.3 * size;
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource_name().into(), size.into()]),
            Operation::new("Td", vec![x.into(), baseline.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_text(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn line(&mut self, font: Font, size: f32, offset: f32, height: f32, text: &str) {
        self.draw_text(font, size, offset, height, text);
        self.advance(height);
    }

    fn centered_line(&mut self, font: Font, size: f32, height: f32, text: &str) {
        let usable = PAGE_WIDTH - 2.0 * MARGIN - 2.0 * CELL_PADDING;
        let offset = ((usable - text_width(text, size)) / 2.0).max(0.0);
        self.line(font, size, offset, height, text);
    }

    fn paragraph(&mut self, size: f32, line_height: f32, text: &str) {
        for line in wrap(text, chars_per_line(size)) {
            self.ensure_room(line_height);
            self.line(Font::Regular, size, 0.0, line_height, &line);
        }
    }

    /// Places `text` centered at the bottom of the current page, or of a new
    /// page when the cursor has already passed the footer line.
    fn footer(&mut self, text: &str) {
        if self.y > FOOTER_Y {
            self.new_page();
        }
        self.y = FOOTER_Y;
        self.centered_line(Font::Italic, 8.0, 5.0, text);
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.finished.is_empty() {
            self.finished.push(self.current);
        }
        self.finished
    }
}

fn chars_per_line(size: f32) -> usize {
    let usable = (PAGE_WIDTH - 2.0 * MARGIN - 2.0 * CELL_PADDING) * MM;
    (usable / (size * WRAP_GLYPH_WIDTH)) as usize
}

/// Estimated width in millimetres of `text` set in Helvetica at `size`.
fn text_width(text: &str, size: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            ' ' => 0.278,
            'A'..='Z' => 0.667,
            _ => 0.556,
        })
        .sum();
    em * size / MM
}

/// The base fonts use WinAnsiEncoding. Characters outside it are written as
/// numeric character references.
fn encode_text(text: &str) -> Vec<u8> {
    WINDOWS_1252.encode(text).0.into_owned()
}

fn write_document(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in Font::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        (PAGE_WIDTH * MM).into(),
        (PAGE_HEIGHT * MM).into(),
    ];
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Greedy word wrap on whitespace. Words longer than `width` get a line of
/// their own rather than being split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let line_len = line.chars().count();
        if line_len > 0 && line_len + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Writes `contents` to `path` through a sibling `.tmp` file that is renamed
/// into place only after its size has been checked against `min_bytes`.
///
/// On failure the temp file is removed and `path` is left as it was.
/// Returns the number of bytes written.
pub fn write_profile(path: &Path, contents: &[u8], min_bytes: u64) -> Result<u64, RenderError> {
    let tmp_path = temp_path_for(path);

    let result = write_verified(&tmp_path, contents, min_bytes).and_then(|written| {
        fs::rename(&tmp_path, path)
            .map(|_| written)
            .map_err(RenderError::from)
    });

    if result.is_err() && tmp_path.exists() {
        if let Err(err) = fs::remove_file(&tmp_path) {
            tracing::warn!(path = %tmp_path.display(), "failed to remove temp file: {}", err);
        }
    }

    result
}

fn write_verified(tmp_path: &Path, contents: &[u8], min_bytes: u64) -> Result<u64, RenderError> {
    let mut file = fs::File::create(tmp_path)?;
    file.write_all(contents)?;
    file.sync_all()?;

    let written = fs::metadata(tmp_path)?.len();
    if written < min_bytes {
        return Err(RenderError::Undersized(written, min_bytes));
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InputRow;
    use crate::engine::enrich;
    use crate::reference::ReferenceTable;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|date| date.and_hms_opt(9, 5, 0))
            .unwrap()
    }

    fn strawberry_row() -> InputRow {
        InputRow {
            product_id: String::from("4315281"),
            supplier: String::from("Acme Foods"),
            description: String::from("SPK Strawberry Chews 130g PMP 10CA"),
        }
    }

    fn strawberry_layout() -> Vec<Block> {
        let table = ReferenceTable::embedded().unwrap();
        let product = enrich(&strawberry_row(), &table).unwrap();
        layout_profile(&product, timestamp())
    }

    fn strawberry_pdf() -> Vec<u8> {
        let table = ReferenceTable::embedded().unwrap();
        let product = enrich(&strawberry_row(), &table).unwrap();
        render_profile(&product, timestamp()).unwrap()
    }

    fn field<'a>(blocks: &'a [Block], wanted: &str) -> Option<&'a str> {
        blocks.iter().find_map(|block| match block {
            Block::Field { label, value, .. } if *label == wanted => Some(value.as_str()),
            _ => None,
        })
    }

    /// Every content stream operation of every page, in page order.
    fn operations(bytes: &[u8]) -> Vec<Operation> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .flat_map(|page_id| {
                let content = doc.get_page_content(*page_id).unwrap();
                Content::decode(&content).unwrap().operations
            })
            .collect()
    }

    fn shown_text(operation: &Operation) -> Option<String> {
        match (operation.operator.as_str(), operation.operands.first()) {
            ("Tj", Some(Object::String(bytes, _))) => {
                Some(WINDOWS_1252.decode(bytes).0.into_owned())
            }
            _ => None,
        }
    }

    #[test]
    fn should_name_files_from_identifier_and_display_name() {
        assert_eq!(
            profile_file_name("4315281", "SPK Strawberry Chews 130g"),
            "4315281_SPK_Strawberry_Chews.pdf"
        );
        assert_eq!(profile_file_name("X1", "Tiny"), "X1_Tiny.pdf");
    }

    #[test]
    fn should_lay_out_sections_in_order() {
        let blocks = strawberry_layout();

        let sections: Vec<&str> = blocks
            .iter()
            .filter_map(|block| match block {
                Block::Section(title) => Some(title.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            sections,
            vec![
                "1. Core Identification",
                "2. Composition",
                "3. Nutritional Values (per 100g/ml)",
                "4. Packaging & Logistics",
                "5. Product Identification",
            ]
        );

        assert_eq!(blocks.first(), Some(&Block::Title(String::from(TITLE))));
        assert_eq!(
            blocks.last(),
            Some(&Block::Footer(String::from(
                "Generated on 07 Mar 2024 at 09:05 | Confidential"
            )))
        );
    }

    #[test]
    fn should_lay_out_merged_and_derived_fields() {
        let blocks = strawberry_layout();

        assert_eq!(field(&blocks, "Commercial Name:"), Some("SPK Strawberry Chews 130g"));
        assert_eq!(field(&blocks, "Brand:"), Some("Acme Foods"));
        assert_eq!(field(&blocks, "Product ID:"), Some("4315281"));
        assert_eq!(field(&blocks, "of which sugars:"), Some("71g"));
        assert_eq!(field(&blocks, "Cases per Pallet:"), Some("120"));
        assert!(blocks.contains(&text("ACME_FOODS_CHEWY_SWEETS_STRAWBERRY_130G", 12.0, 8.0)));
        assert!(blocks.contains(&text("spk_strawberry.jpg", 12.0, 8.0)));
        assert!(blocks.iter().any(|block| matches!(
            block,
            Block::Warning(text) if text.starts_with("Allergens: May contain milk")
        )));
    }

    #[test]
    fn should_render_a_loadable_pdf() {
        let bytes = strawberry_pdf();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(bytes.len() as u64 > DEFAULT_MIN_DOCUMENT_BYTES);

        let doc = Document::load_mem(&bytes).unwrap();
        assert!(!doc.get_pages().is_empty());

        let shown: Vec<String> = operations(&bytes).iter().filter_map(shown_text).collect();
        for expected in [
            TITLE,
            "1. Core Identification",
            "3. Nutritional Values (per 100g/ml)",
            "5. Product Identification",
            "ACME_FOODS_CHEWY_SWEETS_STRAWBERRY_130G",
            "Generated on 07 Mar 2024 at 09:05 | Confidential",
        ] {
            assert!(shown.iter().any(|text| text == expected), "missing {}", expected);
        }
    }

    #[test]
    fn should_draw_a_filled_bar_behind_each_section() {
        let ops = operations(&strawberry_pdf());

        assert_eq!(ops.iter().filter(|op| op.operator == "re").count(), 5);
        assert_eq!(ops.iter().filter(|op| op.operator == "f").count(), 5);
    }

    #[test]
    fn should_render_allergens_in_red() {
        let is_red = |operands: &[Object]| {
            let expected = [220.0 / 255.0, 50.0 / 255.0, 50.0 / 255.0];
            operands.len() == 3
                && operands
                    .iter()
                    .zip(expected)
                    .all(|(value, want)| (value.as_float().unwrap() - want).abs() < 0.01)
        };

        // Track the fill colour in effect at each text operation.
        let mut red = false;
        let mut allergen_lines = 0;
        for op in operations(&strawberry_pdf()) {
            if op.operator == "rg" {
                red = is_red(op.operands.as_slice());
            }
            if let Some(text) = shown_text(&op) {
                if text.starts_with("Allergens:") {
                    assert!(red, "allergen text not drawn in red");
                    allergen_lines += 1;
                } else if text == "3. Nutritional Values (per 100g/ml)" {
                    assert!(!red, "section title drawn in red");
                }
            }
        }
        assert_eq!(allergen_lines, 1);
    }

    #[test]
    fn should_render_identical_bytes_for_same_timestamp() {
        assert_eq!(strawberry_pdf(), strawberry_pdf());
    }

    #[test]
    fn should_break_long_content_onto_further_pages() {
        let mut blocks = vec![Block::Title(String::from(TITLE))];
        blocks.extend((0..60).map(|n| text(&format!("line {}", n), 12.0, 8.0)));
        blocks.push(Block::Footer(String::from("footer")));

        let bytes = render_pdf(&blocks).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn should_wrap_long_text() {
        let lines = wrap("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);

        assert_eq!(wrap("supercalifragilistic", 5), vec!["supercalifragilistic"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn should_write_profile_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.pdf");

        let written = write_profile(&path, b"contents", 4).unwrap();
        assert_eq!(written, 8);
        assert_eq!(fs::read(&path).unwrap(), b"contents");
        assert!(!temp_path_for(&path).exists());

        // Writing again replaces the previous document.
        write_profile(&path, b"replaced", 4).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"replaced");
    }

    #[test]
    fn should_discard_undersized_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.pdf");

        let err = write_profile(&path, b"tiny", 1024).unwrap_err();
        assert_eq!(err.to_string(), RenderError::Undersized(4, 1024).to_string());

        // Neither the final document nor the temp file may be left behind.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn should_keep_previous_document_when_rewrite_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.pdf");
        write_profile(&path, b"original contents", 4).unwrap();

        assert!(write_profile(&path, b"x", 4).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"original contents");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn should_remove_temp_file_when_rename_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.pdf");

        // A directory at the final path lets the temp write succeed and
        // makes the rename fail.
        fs::create_dir(&path).unwrap();

        assert!(matches!(
            write_profile(&path, b"contents", 1).unwrap_err(),
            RenderError::Io(_)
        ));
        assert!(!temp_path_for(&path).exists());
        assert!(path.is_dir());
    }

    #[test]
    fn should_fail_when_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("profile.pdf");

        assert!(matches!(
            write_profile(&path, b"contents", 1).unwrap_err(),
            RenderError::Io(_)
        ));
        assert!(!path.exists());
    }
}
