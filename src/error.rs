use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::codec::{CodecError, ExchangeFormat};
use crate::repositories::StoreError;
use crate::services::ReportServiceError;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Which part of an upload could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// The multipart body or its `file` field.
    File,
    Csv,
    Workbook,
    Sheet,
}

impl ParseFailure {
    /// Body sent to the client.
    pub fn message(self) -> &'static str {
        match self {
            ParseFailure::File => "Unable to read file",
            ParseFailure::Csv => "Unable to parse CSV",
            ParseFailure::Workbook => "Unable to parse Excel file",
            ParseFailure::Sheet => "Unable to read sheet",
        }
    }
}

/// Request-terminating failures of the report routes.
///
/// Every variant is logged when converted into a response. Malformed uploads
/// map to 400; everything else is a server-side failure.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unable to render template: {0}")]
    Template(#[from] askama::Error),

    #[error("{}: {}", .kind.message(), .detail)]
    Parse { kind: ParseFailure, detail: String },

    #[error("Failed to add rows: {0}")]
    Store(#[from] StoreError),

    #[error("Unable to write file: {0}")]
    Export(String),
}

impl From<ReportServiceError> for AppError {
    fn from(err: ReportServiceError) -> Self {
        match err {
            ReportServiceError::Parse { format, ref source } => {
                let kind = match (format, source) {
                    (ExchangeFormat::Csv, _) => ParseFailure::Csv,
                    (ExchangeFormat::Xlsx, CodecError::MissingSheet(_)) => ParseFailure::Sheet,
                    (ExchangeFormat::Xlsx, _) => ParseFailure::Workbook,
                };
                AppError::Parse {
                    kind,
                    detail: err.to_string(),
                }
            }
            ReportServiceError::Export { .. } => AppError::Export(err.to_string()),
            ReportServiceError::Store(e) => AppError::Store(e),
        }
    }
}

impl AppError {
    /// The upload could not be read at all.
    pub fn unreadable_file(detail: impl Into<String>) -> Self {
        AppError::Parse {
            kind: ParseFailure::File,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Parse { .. } => StatusCode::BAD_REQUEST,
            AppError::Template(_) | AppError::Store(_) | AppError::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Template(_) => "Unable to render template",
            AppError::Parse { kind, .. } => kind.message(),
            AppError::Store(_) => "Failed to add rows",
            AppError::Export(_) => "Unable to write file",
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        (status, message).into_response()
    }
}
