use std::borrow::Cow;
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The text encodings a catalog may be written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict UTF-8. A leading byte order mark is discarded.
    Utf8,

    /// The Windows Western European code page. Every byte value maps to a
    /// character, so decoding never fails.
    Windows1252,

    /// ISO-8859-1, where every byte maps to the code point of the same
    /// value.
    Latin1,
}

impl TextEncoding {
    /// Priority order used when no other order is configured.
    pub const DEFAULT_ORDER: [TextEncoding; 3] = [
        TextEncoding::Utf8,
        TextEncoding::Windows1252,
        TextEncoding::Latin1,
    ];

    /// Every spelling `from_str` accepts, in lowercase.
    pub const ACCEPTED_NAMES: [&str; 7] = [
        "utf-8",
        "utf8",
        "windows-1252",
        "cp1252",
        "latin1",
        "latin-1",
        "iso-8859-1",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1252 => "windows-1252",
            TextEncoding::Latin1 => "latin1",
        }
    }

    /// Decodes the full buffer, returning `None` if any byte sequence is
    /// invalid in this encoding.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::Windows1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes),
            TextEncoding::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes)),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "windows-1252" | "cp1252" => Ok(TextEncoding::Windows1252),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            other => Err(format!("unsupported encoding: {}", other)),
        }
    }
}

/// Tries each encoding in order and returns the first one that decodes the
/// whole buffer, along with the decoded text.
pub fn decode_with_fallback<'a>(
    bytes: &'a [u8],
    encodings: &[TextEncoding],
) -> Option<(TextEncoding, Cow<'a, str>)> {
    encodings
        .iter()
        .find_map(|encoding| encoding.decode(bytes).map(|text| (*encoding, text)))
}

/// Undoes text that was UTF-8 on disk but was read back one byte per
/// character, e.g. `CafÃ©` becomes `Café`.
///
/// The value is only rewritten when every character fits in a single
/// Latin-1 byte and those bytes form valid UTF-8. Anything else is
/// returned untouched.
pub fn repair_double_encoding(value: &str) -> Cow<'_, str> {
    if value.is_ascii() || !encoding_rs::mem::is_str_latin1(value) {
        return Cow::Borrowed(value);
    }

    let bytes = encoding_rs::mem::encode_latin1_lossy(value);
    match std::str::from_utf8(&bytes) {
        Ok(repaired) => Cow::Owned(repaired.to_owned()),
        Err(_) => Cow::Borrowed(value),
    }
}
