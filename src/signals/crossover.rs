//! SMA crossover signal detector.
//!
//! Compares the short and long simple moving averages on the latest bar with
//! the same pair on the bar before it. A short SMA moving from at-or-below the
//! long SMA to strictly above it is a buy; the mirror move is a sell.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::common::math::round_to;
use crate::indicators::trend::sma::{calculate_previous_sma, calculate_sma};
use crate::models::candle::Candle;
use crate::models::indicators::CrossoverSnapshot;
use crate::models::signal::{Signal, SignalSource, SignalType};

pub const SHORT_PERIOD: usize = 20;
pub const LONG_PERIOD: usize = 50;
/// Series shorter than this are rejected before any SMA is computed.
pub const MIN_CANDLES: usize = SHORT_PERIOD;

pub const BUY_TAKE_PROFIT: f64 = 1.02;
pub const BUY_STOP_LOSS: f64 = 0.99;
pub const SELL_TAKE_PROFIT: f64 = 0.98;
pub const SELL_STOP_LOSS: f64 = 1.01;

const PRICE_DECIMALS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossoverDetector {
    short_period: usize,
    long_period: usize,
}

impl Default for CrossoverDetector {
    fn default() -> Self {
        Self {
            short_period: SHORT_PERIOD,
            long_period: LONG_PERIOD,
        }
    }
}

impl CrossoverDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn short_period(&self) -> usize {
        self.short_period
    }

    pub fn long_period(&self) -> usize {
        self.long_period
    }

    /// Detect a crossover on the latest candle, stamped with the current time.
    pub fn detect(&self, symbol: &str, candles: &[Candle]) -> Option<Signal> {
        self.detect_at(symbol, candles, Utc::now())
    }

    pub fn detect_at(
        &self,
        symbol: &str,
        candles: &[Candle],
        timestamp: DateTime<Utc>,
    ) -> Option<Signal> {
        if candles.len() < MIN_CANDLES {
            debug!(
                symbol = %symbol,
                count = candles.len(),
                min = MIN_CANDLES,
                "not enough candles for crossover detection"
            );
            return None;
        }

        let Some(snapshot) = self.snapshot(candles) else {
            debug!(
                symbol = %symbol,
                count = candles.len(),
                long_period = self.long_period,
                "insufficient data for long SMA"
            );
            return None;
        };

        let signal_type = classify(&snapshot)?;
        let entry = candles.last()?.close;
        if !entry.is_finite() || entry <= 0.0 {
            debug!(symbol = %symbol, entry, "ignoring crossover with non-positive entry price");
            return None;
        }

        let (take_profit, stop_loss, direction) = match signal_type {
            SignalType::Buy => (BUY_TAKE_PROFIT, BUY_STOP_LOSS, "above"),
            SignalType::Sell => (SELL_TAKE_PROFIT, SELL_STOP_LOSS, "below"),
        };

        debug!(
            symbol = %symbol,
            signal_type = %signal_type,
            short = snapshot.current_short,
            long = snapshot.current_long,
            "crossover detected"
        );

        let signal = Signal {
            asset: symbol.to_string(),
            signal_type,
            entry,
            take_profit: round_to(entry * take_profit, PRICE_DECIMALS),
            stop_loss: round_to(entry * stop_loss, PRICE_DECIMALS),
            reason: format!(
                "SMA{} crossed {} SMA{}",
                self.short_period, direction, self.long_period
            ),
            timestamp,
            source: SignalSource::Crossover,
        };

        // 8-decimal rounding can collapse TP/SL onto the entry for tiny prices
        if !signal.is_well_ordered() {
            debug!(
                symbol = %symbol,
                entry,
                take_profit = signal.take_profit,
                stop_loss = signal.stop_loss,
                "dropping crossover with degenerate take-profit/stop-loss"
            );
            return None;
        }

        Some(signal)
    }

    /// Current and previous short/long SMAs, or `None` if any of the four
    /// lacks data.
    pub fn snapshot(&self, candles: &[Candle]) -> Option<CrossoverSnapshot> {
        let short = self.short_period as u32;
        let long = self.long_period as u32;
        Some(CrossoverSnapshot {
            short_period: short,
            long_period: long,
            current_short: calculate_sma(candles, short)?.value,
            current_long: calculate_sma(candles, long)?.value,
            previous_short: calculate_previous_sma(candles, short)?.value,
            previous_long: calculate_previous_sma(candles, long)?.value,
        })
    }
}

/// Buy is checked first: `prev_short <= prev_long && short > long`.
/// Sell: `prev_short >= prev_long && short < long`.
pub fn classify(snapshot: &CrossoverSnapshot) -> Option<SignalType> {
    if snapshot.previous_short <= snapshot.previous_long
        && snapshot.current_short > snapshot.current_long
    {
        Some(SignalType::Buy)
    } else if snapshot.previous_short >= snapshot.previous_long
        && snapshot.current_short < snapshot.current_long
    {
        Some(SignalType::Sell)
    } else {
        None
    }
}
