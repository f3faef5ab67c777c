use std::fmt;
use std::str::FromStr;

use super::{decode_csv, decode_xlsx, encode_csv, encode_xlsx, CodecResult, RawRow};
use crate::models::UserStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeFormat {
    Csv,
    Xlsx,
}

impl ExchangeFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExchangeFormat::Csv => "text/csv",
            ExchangeFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// File name offered to browsers for downloads.
    pub fn file_name(self) -> &'static str {
        match self {
            ExchangeFormat::Csv => "user_stats.csv",
            ExchangeFormat::Xlsx => "user_stats.xlsx",
        }
    }

    pub fn encode(self, records: &[UserStats]) -> CodecResult<Vec<u8>> {
        match self {
            ExchangeFormat::Csv => encode_csv(records),
            ExchangeFormat::Xlsx => encode_xlsx(records),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> CodecResult<Vec<RawRow>> {
        match self {
            ExchangeFormat::Csv => decode_csv(bytes),
            ExchangeFormat::Xlsx => decode_xlsx(bytes),
        }
    }
}

impl fmt::Display for ExchangeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeFormat::Csv => write!(f, "csv"),
            ExchangeFormat::Xlsx => write!(f, "xlsx"),
        }
    }
}

impl FromStr for ExchangeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExchangeFormat::Csv),
            "xlsx" | "excel" => Ok(ExchangeFormat::Xlsx),
            other => Err(format!("unknown format '{}' (expected csv or xlsx)", other)),
        }
    }
}
