//! Row mapping between `UserStats` records and the two exchange formats.
//!
//! Encoding produces a header row followed by one row per record, in the
//! column order of [`COLUMNS`](crate::models::COLUMNS). Decoding returns every
//! row as raw text, header included; interpreting the values is left to the
//! record store.

pub mod csv_codec;
pub mod format;
pub mod xlsx_codec;

pub use csv_codec::{decode_csv, encode_csv, write_csv};
pub use format::ExchangeFormat;
pub use xlsx_codec::{decode_xlsx, encode_xlsx, SHEET_NAME};

/// One decoded row, each field as it appeared in the source file.
pub type RawRow = Vec<String>;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unreadable workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),
    #[error("Workbook has no sheet named {0}")]
    MissingSheet(String),
    #[error("Failed to write workbook: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),
    #[error("Too many records for a single sheet: {0}")]
    TooManyRows(usize),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;
