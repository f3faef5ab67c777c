use crate::codec::ExchangeFormat;
use crate::error::Result;
use crate::models::UserStats;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
};

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate {
    title: String,
    users: Vec<UserStats>,
}

/// GET /report - Show the user stats table
pub async fn report_page(State(state): State<AppState>) -> Result<Html<String>> {
    let users = state.report_service.list().await?;

    let template = ReportTemplate {
        title: "Report".to_string(),
        users,
    };

    Ok(Html(template.render()?))
}

/// GET /report/csv - Download the report as CSV
pub async fn download_csv(State(state): State<AppState>) -> Result<Response> {
    download(&state, ExchangeFormat::Csv).await
}

/// GET /report/excel - Download the report as an XLSX workbook
pub async fn download_excel(State(state): State<AppState>) -> Result<Response> {
    download(&state, ExchangeFormat::Xlsx).await
}

async fn download(state: &AppState, format: ExchangeFormat) -> Result<Response> {
    let bytes = state.report_service.export(format).await?;

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment;filename={}", format.file_name()),
        ),
    ];

    Ok((headers, bytes).into_response())
}
