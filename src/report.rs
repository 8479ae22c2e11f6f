use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

use crate::pairing::GameRecord;

pub const SHEET_NAME: &str = "Список игр";

pub const HEADERS: [&str; 4] = [
    "Название",
    "Высокая цена",
    "Цена покупки",
    "Цена продажи с комиссией",
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to create reports directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write workbook: {0}")]
    Workbook(#[from] XlsxError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(u64),
}

/// Header row plus one row per record, in record order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub headers: [&'static str; 4],
    pub rows: Vec<[Cell; 4]>,
}

impl ReportTable {
    pub fn from_records(records: &[GameRecord]) -> Self {
        let rows = records
            .iter()
            .map(|game| {
                [
                    Cell::Text(game.name.clone()),
                    Cell::Number(game.high_price),
                    Cell::Number(game.low_price),
                    Cell::Number(game.sell_price),
                ]
            })
            .collect();

        Self {
            headers: HEADERS,
            rows,
        }
    }

    fn to_workbook(&self) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, header) in (0u16..).zip(self.headers) {
            worksheet.write_string(0, col, header)?;
        }

        for (row, cells) in (1u32..).zip(&self.rows) {
            for (col, cell) in (0u16..).zip(cells) {
                match cell {
                    Cell::Text(text) => worksheet.write_string(row, col, text)?,
                    Cell::Number(n) => worksheet.write_number(row, col, *n as f64)?,
                };
            }
        }

        Ok(workbook)
    }
}

/// `games_DD_MM_YYYY.xlsx`
pub fn report_file_name(date: NaiveDate) -> String {
    format!(
        "games_{:02}_{:02}_{}.xlsx",
        date.day(),
        date.month(),
        date.year()
    )
}

/// Write the records to `<dir>/games_DD_MM_YYYY.xlsx`, overwriting a report
/// from earlier the same day.
pub fn write_report(
    records: &[GameRecord],
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(report_file_name(date));
    ReportTable::from_records(records).to_workbook()?.save(&path)?;

    tracing::info!(path = %path.display(), rows = records.len(), "✅ Report saved");
    Ok(path)
}
