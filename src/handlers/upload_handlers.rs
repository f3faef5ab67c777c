use crate::codec::ExchangeFormat;
use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    response::Redirect,
};

/// Name of the multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// POST /upload/csv - Import a CSV file
pub async fn upload_csv(State(state): State<AppState>, multipart: Multipart) -> Result<Redirect> {
    upload(&state, multipart, ExchangeFormat::Csv).await
}

/// POST /upload/excel - Import an XLSX workbook
pub async fn upload_excel(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect> {
    upload(&state, multipart, ExchangeFormat::Xlsx).await
}

async fn upload(state: &AppState, multipart: Multipart, format: ExchangeFormat) -> Result<Redirect> {
    let bytes = read_file_field(multipart).await?;

    state.report_service.import(format, &bytes).await?;

    Ok(Redirect::to("/report"))
}

async fn read_file_field(mut multipart: Multipart) -> Result<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::unreadable_file(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::unreadable_file(e.to_string()))?;
        return Ok(bytes.to_vec());
    }

    Err(AppError::unreadable_file(format!(
        "missing '{}' field",
        FILE_FIELD
    )))
}
