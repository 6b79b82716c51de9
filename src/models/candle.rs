//! OHLCV candle model and Binance kline row parsing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_time: Option<DateTime<Utc>>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        open_time: DateTime<Utc>,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
            close_time: None,
        }
    }

    pub fn with_close_time(mut self, close_time: DateTime<Utc>) -> Self {
        self.close_time = Some(close_time);
        self
    }

    /// Parse one kline row: `[openTime, open, high, low, close, volume, closeTime, ...]`.
    ///
    /// Binance sends prices as strings; plain numbers are accepted too. Rows with
    /// fewer than six fields or unparsable values yield `None`.
    pub fn from_kline_row(row: &Value) -> Option<Self> {
        let fields = row.as_array()?;
        if fields.len() < 6 {
            return None;
        }

        let open_time = DateTime::from_timestamp_millis(fields[0].as_i64()?)?;
        let mut candle = Candle::new(
            number(&fields[1])?,
            number(&fields[2])?,
            number(&fields[3])?,
            number(&fields[4])?,
            number(&fields[5])?,
            open_time,
        );

        if let Some(close_time) = fields
            .get(6)
            .and_then(Value::as_i64)
            .and_then(DateTime::from_timestamp_millis)
        {
            candle = candle.with_close_time(close_time);
        }

        Some(candle)
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Closing prices, oldest first.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
