use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, DataType, Reader, Xlsx};
use chrono::{Duration, DurationRound};
use rust_xlsxwriter::{Workbook, Worksheet};

use super::{CodecError, CodecResult, RawRow};
use crate::models::{UserStats, COLUMNS, SHEET_TIMESTAMP_FORMAT};

/// The only worksheet read on import and written on export.
pub const SHEET_NAME: &str = "Sheet1";

/// Largest magnitude an f64 number cell holds without rounding (2^53).
const MAX_EXACT_NUMBER: i64 = 1 << 53;

/// Encode records as a single-sheet XLSX workbook.
///
/// Row 1 holds the header. `UserID` and `LoginCount` are numeric cells,
/// `UserName` and `LastLogin` are text cells and `Active` is a boolean cell.
/// A `UserID` beyond 2^53 does not fit a spreadsheet number exactly and is
/// written as its decimal text instead.
pub fn encode_xlsx(records: &[UserStats]) -> CodecResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = u32::try_from(index + 1).map_err(|_| CodecError::TooManyRows(records.len()))?;

        write_user_id(worksheet, row, record.user_id)?;
        worksheet.write_string(row, 1, &record.user_name)?;
        worksheet.write_number(row, 2, f64::from(record.login_count))?;
        worksheet.write_string(row, 3, record.last_login_sheet())?;
        worksheet.write_boolean(row, 4, record.active)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_user_id(worksheet: &mut Worksheet, row: u32, user_id: i64) -> CodecResult<()> {
    if (-MAX_EXACT_NUMBER..=MAX_EXACT_NUMBER).contains(&user_id) {
        worksheet.write_number(row, 0, user_id as f64)?;
    } else {
        worksheet.write_string(row, 0, user_id.to_string())?;
    }
    Ok(())
}

/// Read every row of `Sheet1`, header included, as raw text.
///
/// Rows and columns keep their sheet positions: empty rows above the first
/// used cell and empty columns left of it come back as empty strings, so
/// column A is always field 0.
pub fn decode_xlsx(bytes: &[u8]) -> CodecResult<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;

    if !workbook.sheet_names().iter().any(|name| name == SHEET_NAME) {
        return Err(CodecError::MissingSheet(SHEET_NAME.to_string()));
    }

    let range = workbook.worksheet_range(SHEET_NAME)?;

    // The range starts at the first used cell, not at A1.
    let Some((first_row, first_col)) = range.start() else {
        return Ok(Vec::new());
    };
    let leading_cols = first_col as usize;
    let width = leading_cols + range.width();

    let mut rows: Vec<RawRow> = Vec::with_capacity(first_row as usize + range.height());
    rows.extend((0..first_row).map(|_| vec![String::new(); width]));

    for cells in range.rows() {
        let mut row = vec![String::new(); leading_cols];
        row.extend(cells.iter().map(cell_text));
        rows.push(row);
    }

    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        // Numeric cells come back as floats; whole numbers read as integers.
        Data::Float(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_NUMBER as f64 => {
            (*f as i64).to_string()
        }
        // Date cells hold a day serial; render them the way the sheet export does.
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(naive) => naive
                .duration_round(Duration::seconds(1))
                .unwrap_or(naive)
                .format(SHEET_TIMESTAMP_FORMAT)
                .to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_records(count: usize) -> Vec<UserStats> {
        (0..count)
            .map(|i| UserStats {
                user_id: i as i64 + 1,
                user_name: format!("user{}", i + 1),
                login_count: (i * 10) as u32,
                last_login: Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 45).unwrap(),
                active: i % 2 == 0,
            })
            .collect()
    }

    fn open_sheet(bytes: &[u8]) -> calamine::Range<Data> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        workbook.worksheet_range(SHEET_NAME).unwrap()
    }

    #[test]
    fn test_export_has_one_row_per_record_plus_header() {
        for count in [0usize, 1, 2, 7] {
            let bytes = encode_xlsx(&make_records(count)).unwrap();
            let rows = decode_xlsx(&bytes).unwrap();
            assert_eq!(rows.len(), count + 1);
        }
    }

    #[test]
    fn test_export_sheet_name_and_header() {
        let bytes = encode_xlsx(&[]).unwrap();
        let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.as_slice())).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        let rows = decode_xlsx(&bytes).unwrap();
        assert_eq!(rows, vec![COLUMNS.map(str::to_string).to_vec()]);
    }

    #[test]
    fn test_export_cell_types() {
        let bytes = encode_xlsx(&make_records(1)).unwrap();
        let range = open_sheet(&bytes);

        assert!(matches!(
            range.get_value((1, 0)),
            Some(Data::Float(f)) if *f == 1.0
        ) || matches!(range.get_value((1, 0)), Some(Data::Int(1))));
        assert_eq!(
            range.get_value((1, 1)),
            Some(&Data::String("user1".to_string()))
        );
        assert!(matches!(
            range.get_value((1, 2)),
            Some(Data::Float(f)) if *f == 0.0
        ) || matches!(range.get_value((1, 2)), Some(Data::Int(0))));
        assert_eq!(
            range.get_value((1, 3)),
            Some(&Data::String("2024-01-01 12:30:45".to_string()))
        );
        assert_eq!(range.get_value((1, 4)), Some(&Data::Bool(true)));
    }

    #[test]
    fn test_decode_renders_cells_as_text() {
        let bytes = encode_xlsx(&make_records(2)).unwrap();
        let rows = decode_xlsx(&bytes).unwrap();

        assert_eq!(rows[1], vec!["1", "user1", "0", "2024-01-01 12:30:45", "true"]);
        assert_eq!(rows[2], vec!["2", "user2", "10", "2024-01-01 12:30:45", "false"]);
    }

    #[test]
    fn test_decode_requires_sheet1() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Report").unwrap();
        worksheet.write_string(0, 0, "UserID").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let result = decode_xlsx(&bytes);
        assert!(matches!(result, Err(CodecError::MissingSheet(name)) if name == SHEET_NAME));
    }

    #[test]
    fn test_decode_rejects_non_workbook_bytes() {
        let result = decode_xlsx(b"UserID,UserName\n1,alice\n");
        assert!(matches!(result, Err(CodecError::Workbook(_))));
    }

    fn single_column_sheet(cells: &[(u32, u16, &str)]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME).unwrap();
        for (row, col, text) in cells {
            worksheet.write_string(*row, *col, *text).unwrap();
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_user_ids_beyond_2_pow_53_survive_round_trip() {
        let big = MAX_EXACT_NUMBER + 1;
        let mut records = make_records(3);
        records[0].user_id = big;
        records[1].user_id = -big;
        records[2].user_id = MAX_EXACT_NUMBER;

        let rows = decode_xlsx(&encode_xlsx(&records).unwrap()).unwrap();

        assert_eq!(rows[1][0], "9007199254740993");
        assert_eq!(rows[2][0], "-9007199254740993");
        assert_eq!(rows[3][0], "9007199254740992");
    }

    #[test]
    fn test_decode_renders_date_cells_as_sheet_timestamps() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME).unwrap();
        for (col, header) in COLUMNS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        let login = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 1, 1)
            .unwrap()
            .and_hms(8, 15, 30)
            .unwrap();
        let date_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        worksheet.write_number(1, 0, 1).unwrap();
        worksheet.write_string(1, 1, "alice").unwrap();
        worksheet.write_number(1, 2, 3).unwrap();
        worksheet
            .write_datetime_with_format(1, 3, &login, &date_format)
            .unwrap();
        worksheet.write_boolean(1, 4, true).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = decode_xlsx(&bytes).unwrap();
        assert_eq!(rows[1], vec!["1", "alice", "3", "2024-01-01 08:15:30", "true"]);

        let records = crate::repositories::user_stats_repository::parse_rows(&rows).unwrap();
        assert_eq!(records[0].last_login_rfc3339(), "2024-01-01T08:15:30Z");
    }

    #[test]
    fn test_decode_keeps_cell_positions() {
        let bytes = single_column_sheet(&[(1, 1, "UserName"), (2, 1, "alice")]);

        let rows = decode_xlsx(&bytes).unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["".to_string(), "".to_string()],
                vec!["".to_string(), "UserName".to_string()],
                vec!["".to_string(), "alice".to_string()],
            ]
        );
    }

    #[test]
    fn test_decode_empty_sheet_has_no_rows() {
        let bytes = single_column_sheet(&[]);
        assert!(decode_xlsx(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_cell_text_float_handling() {
        assert_eq!(cell_text(&Data::Float(42.0)), "42");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Bool(false)), "false");
    }
}
