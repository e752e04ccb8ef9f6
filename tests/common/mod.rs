#![allow(dead_code)]

use chrono::NaiveDate;
use sigtrader::domain::error::SigtraderError;
pub use sigtrader::domain::ohlcv::Bar;
use sigtrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, source: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(source.to_string(), bars);
        self
    }

    pub fn with_error(mut self, source: &str, reason: &str) -> Self {
        self.errors.insert(source.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        source: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, SigtraderError> {
        if let Some(reason) = self.errors.get(source) {
            return Err(SigtraderError::Data {
                reason: reason.clone(),
            });
        }
        let bars: Vec<Bar> = self
            .data
            .get(source)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| {
                start_date.is_none_or(|s| b.date() >= s) && end_date.is_none_or(|e| b.date() <= e)
            })
            .collect();
        if bars.is_empty() {
            return Err(SigtraderError::NoData {
                source_name: source.to_string(),
            });
        }
        Ok(bars)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> Bar {
    Bar::daily(
        date(date_str),
        close,
        close + 1.0,
        close - 1.0,
        close,
        10_000.0,
    )
}

/// One daily bar per close, starting 2024-01-01. Open equals close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let start = date("2024-01-01");
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            Bar::daily(
                start + chrono::Duration::days(i as i64),
                c,
                c,
                c,
                c,
                1_000.0,
            )
        })
        .collect()
}

/// Deterministic wave with drift; exercises every rule's buy and sell sides.
pub fn generate_bars(count: usize) -> Vec<Bar> {
    let start = date("2023-01-02");
    (0..count)
        .map(|i| {
            let t = i as f64;
            let close = 50.0 + 10.0 * (t / 7.0).sin() + 4.0 * (t / 2.5).cos() + t * 0.05;
            let open = close - 0.3 * (t / 3.0).sin();
            Bar::daily(
                start + chrono::Duration::days(i as i64),
                open,
                open.max(close) + 0.8,
                open.min(close) - 0.8,
                close,
                5_000.0 + 1_000.0 * (t / 5.0).sin().abs(),
            )
        })
        .collect()
}

pub const YAHOO_HEADER: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n";

/// Render bars as a newest-first Yahoo CSV.
pub fn yahoo_csv_newest_first(bars: &[Bar]) -> String {
    let mut out = String::from(YAHOO_HEADER);
    for b in bars.iter().rev() {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            b.date(),
            b.open,
            b.high,
            b.low,
            b.close,
            b.close,
            b.volume
        ));
    }
    out
}
