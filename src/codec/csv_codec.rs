use std::io::Write;

use super::{CodecResult, RawRow};
use crate::models::{UserStats, COLUMNS};

/// Encode records as CSV text with a mandatory header line.
pub fn encode_csv(records: &[UserStats]) -> CodecResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(buffer)
}

/// Write records as CSV to any writer.
pub fn write_csv<W: Write>(records: &[UserStats], writer: W) -> CodecResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(COLUMNS)?;

    for record in records {
        csv_writer.write_record(record_to_row(record))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Read every CSV record, header included, as raw text.
///
/// Records must all have the same number of fields and be valid UTF-8.
/// Empty input yields no rows.
pub fn decode_csv(bytes: &[u8]) -> CodecResult<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

fn record_to_row(record: &UserStats) -> [String; 5] {
    [
        record.user_id.to_string(),
        record.user_name.clone(),
        record.login_count.to_string(),
        record.last_login_rfc3339(),
        record.active.to_string(),
    ]
}
