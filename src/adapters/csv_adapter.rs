//! CSV file bar feed.
//!
//! Columns are located by header name (case-insensitive). Rows where any
//! used field reads `null` are skipped, as Yahoo writes them for suspended
//! days. When `adjclose` is on and the file has an `Adj Close` column,
//! prices and volume are rescaled by `adj close / close` and rounded to
//! cents. Files stored newest-first are flipped with `reverse`.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];
const ADJ_CLOSE: &str = "adj close";

pub struct CsvAdapter {
    base_path: PathBuf,
    reverse: bool,
    adjclose: bool,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            reverse: false,
            adjclose: false,
        }
    }

    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn adjusted(mut self, adjclose: bool) -> Self {
        self.adjclose = adjclose;
        self
    }

    /// `source` is a path relative to the base path, or absolute.
    fn csv_path(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

fn column_indices(headers: &csv::StringRecord) -> Result<[usize; 6], SigtraderError> {
    let mut indices = [0usize; 6];
    for (slot, name) in indices.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| SigtraderError::Data {
                reason: format!("missing {} column", name),
            })?;
    }
    Ok(indices)
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'r str, SigtraderError> {
    record.get(index).ok_or_else(|| SigtraderError::Data {
        reason: format!("line {}: missing {} value", line, name),
    })
}

fn number(record: &csv::StringRecord, index: usize, name: &str, line: u64) -> Result<f64, SigtraderError> {
    field(record, index, name, line)?
        .trim()
        .parse()
        .map_err(|e| SigtraderError::Data {
            reason: format!("line {}: invalid {} value: {}", line, name, e),
        })
}

fn is_null(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("null")
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rescale a bar so its close equals the adjusted close.
fn adjust(bar: &mut Bar, adj_close: f64) {
    if bar.close == 0.0 || adj_close == 0.0 {
        return;
    }
    let factor = bar.close / adj_close;
    bar.open = round_cents(bar.open / factor);
    bar.high = round_cents(bar.high / factor);
    bar.low = round_cents(bar.low / factor);
    bar.close = round_cents(adj_close);
    bar.volume = round_cents(bar.volume / factor);
}

/// Parse CSV text into bars in file order. With `adjclose`, an `Adj Close`
/// column, if present, rescales each bar.
pub fn parse_bars(content: &str, adjclose: bool) -> Result<Vec<Bar>, SigtraderError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr.headers().map_err(|e| SigtraderError::Data {
        reason: format!("CSV header error: {}", e),
    })?;
    let [date, open, high, low, close, volume] = column_indices(headers)?;
    let adj = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(ADJ_CLOSE));
    let used: Vec<usize> = [date, open, high, low, close, volume]
        .into_iter()
        .chain(adj)
        .collect();

    let mut bars = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i as u64 + 2;
        let record = result.map_err(|e| SigtraderError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;

        if used.iter().any(|&col| record.get(col).is_some_and(is_null)) {
            debug!(line, "Skipping null row");
            continue;
        }

        let date_str = field(&record, date, "date", line)?;
        let timestamp = parse_timestamp(date_str).ok_or_else(|| SigtraderError::Data {
            reason: format!("line {}: invalid date '{}'", line, date_str),
        })?;

        let mut bar = Bar {
            timestamp,
            open: number(&record, open, "open", line)?,
            high: number(&record, high, "high", line)?,
            low: number(&record, low, "low", line)?,
            close: number(&record, close, "close", line)?,
            volume: number(&record, volume, "volume", line)?,
        };
        if let Some(idx) = adj.filter(|_| adjclose) {
            adjust(&mut bar, number(&record, idx, ADJ_CLOSE, line)?);
        }
        bars.push(bar);
    }
    Ok(bars)
}

/// Every bar must be strictly later than the one before it.
pub fn check_ascending(bars: &[Bar]) -> Result<(), SigtraderError> {
    match bars.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
        Some(w) => Err(SigtraderError::FeedIntegrity {
            previous: w[0].timestamp,
            current: w[1].timestamp,
        }),
        None => Ok(()),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        source: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, SigtraderError> {
        let path = self.csv_path(source);
        let content = fs::read_to_string(&path).map_err(|e| SigtraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut bars = parse_bars(&content, self.adjclose)?;
        if self.reverse {
            bars.reverse();
        }
        bars.retain(|b| {
            start_date.is_none_or(|s| b.date() >= s) && end_date.is_none_or(|e| b.date() <= e)
        });
        check_ascending(&bars)?;

        if bars.is_empty() {
            return Err(SigtraderError::NoData {
                source_name: path.display().to_string(),
            });
        }
        Ok(bars)
    }
}
