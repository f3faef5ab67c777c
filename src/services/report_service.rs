use crate::codec::{CodecError, ExchangeFormat};
use crate::models::UserStats;
use crate::repositories::{StoreError, UserStatsRepository};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error("Unable to parse {format} upload: {source}")]
    Parse {
        format: ExchangeFormat,
        source: CodecError,
    },
    #[error("Unable to build {format} export: {source}")]
    Export {
        format: ExchangeFormat,
        source: CodecError,
    },
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),
}

/// Moves user stats between the record store and the exchange formats.
pub struct ReportService {
    repository: Arc<dyn UserStatsRepository>,
}

impl ReportService {
    pub fn new(repository: Arc<dyn UserStatsRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<UserStats>, ReportServiceError> {
        Ok(self.repository.get_all().await?)
    }

    pub async fn export(&self, format: ExchangeFormat) -> Result<Vec<u8>, ReportServiceError> {
        let records = self.repository.get_all().await?;

        let bytes = format
            .encode(&records)
            .map_err(|source| ReportServiceError::Export { format, source })?;

        tracing::info!(
            "Exported {} user stats records as {} ({} bytes)",
            records.len(),
            format,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Decode an upload and hand every row, header included, to the store.
    ///
    /// Returns the number of rows handed over. Nothing reaches the store when
    /// the upload does not parse.
    pub async fn import(
        &self,
        format: ExchangeFormat,
        bytes: &[u8],
    ) -> Result<usize, ReportServiceError> {
        let rows = match format.decode(bytes) {
            Ok(rows) => rows,
            Err(source) => {
                tracing::warn!("Rejected {} upload of {} bytes: {}", format, bytes.len(), source);
                return Err(ReportServiceError::Parse { format, source });
            }
        };

        if let Err(e) = self.repository.append_rows(&rows).await {
            tracing::error!("Failed to add {} rows from {} upload: {}", rows.len(), format, e);
            return Err(e.into());
        }

        tracing::info!("Imported {} rows from {} upload", rows.len(), format);
        Ok(rows.len())
    }
}
