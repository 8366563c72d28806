use camino::Utf8PathBuf;
use thiserror::Error;

/// All error conditions surfaced by the crate.
///
/// The variants are deliberately distinguishable by failure kind so that a
/// caller can treat "no correction available" ([`PreatmoError::NoMatchingFit`])
/// differently from corrupt reference data ([`PreatmoError::FitTableParsing`]).
#[derive(Error, Debug)]
pub enum PreatmoError {
    #[error("system_type = {0} not found, try using 'intensified', 'moderate' or 'allsky'")]
    InvalidSystemType(String),

    #[error("meteoroid_type = {0} not found, try using 'cometary', 'asteroidal' or 'iron-rich'")]
    InvalidMeteoroidType(String),

    #[error("fit table not found at: {0}")]
    FitTableNotFound(Utf8PathBuf),

    #[error("unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("error during the fit table parsing: {0}")]
    FitTableParsing(#[from] csv::Error),

    #[error("invalid fit record: expected {expected} fields, found {found}")]
    InvalidFieldCount { expected: usize, found: usize },

    #[error("no matching fit record: {0}")]
    NoMatchingFit(String),
}
