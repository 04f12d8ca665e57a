use crate::encoding::TextEncoding;
use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use std::io;
use std::path::PathBuf;

/// Errors raised while loading the product catalog. Every variant is fatal
/// to the run.
#[derive(Debug)]
pub enum LoadError {
    Unreadable(PathBuf, io::Error),
    UnsupportedEncoding(Vec<TextEncoding>),
    Malformed(csv::Error),
}

/// Errors raised while loading the reference table.
#[derive(Debug)]
pub enum ReferenceError {
    Unreadable(PathBuf, io::Error),
    Malformed(serde_json::Error),
}

/// Errors raised while preparing the output location.
#[derive(Debug)]
pub enum SetupError {
    OutputDirectory(PathBuf, io::Error),
}

/// Errors raised while writing a single document to disk.
#[derive(Debug)]
pub enum RenderError {
    Pdf(lopdf::Error),
    Io(io::Error),
    Undersized(u64, u64),
}

/// Errors scoped to a single catalog row. These are reported and counted,
/// and never stop the run.
#[derive(Debug)]
pub enum ProfileError {
    MalformedRow(usize, csv::Error),
    MissingReferenceData(String),
    DisplayNameTooShort(String),
    Render(RenderError),
}

fn join_encodings(encodings: &[TextEncoding]) -> String {
    encodings
        .iter()
        .map(|encoding| encoding.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Unreadable(path, err) => {
                write!(f, "unable to read catalog {}: {}", path.display(), err)
            }
            LoadError::UnsupportedEncoding(tried) if tried.is_empty() => {
                write!(f, "unable to decode catalog, no encodings were configured")
            }
            LoadError::UnsupportedEncoding(tried) => write!(
                f,
                "unable to decode catalog with any supported encoding (tried {})",
                join_encodings(tried)
            ),
            LoadError::Malformed(err) => write!(f, "malformed catalog: {}", err),
        }
    }
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceError::Unreadable(path, err) => write!(
                f,
                "unable to read reference table {}: {}",
                path.display(),
                err
            ),
            ReferenceError::Malformed(err) => write!(f, "malformed reference table: {}", err),
        }
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::OutputDirectory(path, err) => write!(
                f,
                "unable to create output directory {}: {}",
                path.display(),
                err
            ),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Pdf(err) => write!(f, "failed to encode PDF document: {}", err),
            RenderError::Io(err) => write!(f, "failed to write document: {}", err),
            RenderError::Undersized(written, minimum) => write!(
                f,
                "generated document is too small, likely empty written={} minimum={}",
                written, minimum
            ),
        }
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::MalformedRow(row, err) => {
                write!(f, "malformed catalog row {}: {}", row, err)
            }
            ProfileError::MissingReferenceData(id) => {
                write!(f, "no verified data for product ID: {}", id)
            }
            ProfileError::DisplayNameTooShort(name) => write!(
                f,
                "display name {:?} MUST contain at least two words to derive a naming code",
                name
            ),
            ProfileError::Render(err) => write!(f, "document generation failed: {}", err),
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Malformed(err)
    }
}

impl From<serde_json::Error> for ReferenceError {
    fn from(err: serde_json::Error) -> Self {
        ReferenceError::Malformed(err)
    }
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err)
    }
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}

impl From<RenderError> for ProfileError {
    fn from(err: RenderError) -> Self {
        ProfileError::Render(err)
    }
}

impl Error for LoadError {}
impl Error for ReferenceError {}
impl Error for SetupError {}
impl Error for RenderError {}
impl Error for ProfileError {}
