//! The signal list produced by one refresh pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::market::Timeframe;
use crate::models::signal::Signal;
use crate::signals::filter::SignalFilter;

/// Where a board's signals come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalMode {
    /// Crossover detector over real candles
    Live,
    /// Synthetic generator, no network access
    Demo,
}

impl fmt::Display for SignalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalMode::Live => f.write_str("live"),
            SignalMode::Demo => f.write_str("demo"),
        }
    }
}

impl FromStr for SignalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(SignalMode::Live),
            "demo" => Ok(SignalMode::Demo),
            other => Err(format!("unknown signal mode '{}'", other)),
        }
    }
}

/// Signals of one refresh pass, newest first. A refresh replaces the whole
/// board; nothing carries over between passes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalBoard {
    pub mode: SignalMode,
    pub timeframe: Timeframe,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Symbols examined in the last pass
    pub scanned: usize,
    /// Symbols whose candle fetch failed in the last pass
    pub failed: Vec<String>,
    signals: Vec<Signal>,
}

impl SignalBoard {
    pub fn new(mode: SignalMode, timeframe: Timeframe) -> Self {
        Self {
            mode,
            timeframe,
            refreshed_at: None,
            scanned: 0,
            failed: Vec::new(),
            signals: Vec::new(),
        }
    }

    /// Replace the board contents with the outcome of a pass.
    pub fn replace(
        &mut self,
        mode: SignalMode,
        timeframe: Timeframe,
        scanned: usize,
        failed: Vec<String>,
        signals: impl IntoIterator<Item = Signal>,
    ) {
        self.mode = mode;
        self.timeframe = timeframe;
        self.scanned = scanned;
        self.failed = failed;
        self.signals.clear();
        self.signals.extend(signals);
        // stable: equal timestamps keep scan order
        self.signals.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.refreshed_at = Some(Utc::now());
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Copy of this board keeping only the signals the filter accepts.
    pub fn filtered(&self, filter: &SignalFilter) -> SignalBoard {
        SignalBoard {
            mode: self.mode,
            timeframe: self.timeframe,
            refreshed_at: self.refreshed_at,
            scanned: self.scanned,
            failed: self.failed.clone(),
            signals: filter.apply(&self.signals),
        }
    }
}
