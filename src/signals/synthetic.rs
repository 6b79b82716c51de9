//! Synthetic signal generator for demo mode.
//!
//! Produces plausible-looking random signals so the dashboard can run without
//! network access. The output carries no market information and is always
//! tagged [`SignalSource::Synthetic`].

use chrono::Utc;
use rand::Rng;

use crate::models::market::Timeframe;
use crate::models::signal::{Signal, SignalSource, SignalType};

/// Share of invocations that yield a signal.
pub const EMIT_PROBABILITY: f64 = 0.6;

/// Take-profit distance band as a fraction of the base price.
pub const TAKE_PROFIT_BAND: (f64, f64) = (0.01, 0.04);
/// Stop-loss distance band as a fraction of the base price.
pub const STOP_LOSS_BAND: (f64, f64) = (0.005, 0.02);

/// Base price ranges per asset family as (marker, center, jitter). Checked in
/// order; the first marker contained in the symbol wins.
const PRICE_FAMILIES: [(&str, f64, f64); 6] = [
    ("BTC", 60_000.0, 5_000.0),
    ("ETH", 3_000.0, 300.0),
    ("BNB", 500.0, 50.0),
    ("SOL", 120.0, 12.0),
    ("DOGE", 0.12, 0.012),
    ("XRP", 0.5, 0.05),
];
const FALLBACK_PRICE_RANGE: (f64, f64) = (10.0, 100.0);

const BUY_REASONS: [&str; 6] = [
    "Bullish engulfing pattern on {tf} chart",
    "Price broke above key resistance level",
    "RSI oversold with bullish divergence",
    "Golden cross (50 MA crossed above 200 MA)",
    "Double bottom pattern confirmed",
    "Support level held with increasing volume",
];

const SELL_REASONS: [&str; 6] = [
    "Bearish engulfing pattern on {tf} chart",
    "Price broke below key support level",
    "RSI overbought with bearish divergence",
    "Death cross (50 MA crossed below 200 MA)",
    "Double top pattern confirmed",
    "Resistance level held with increasing volume",
];

#[derive(Debug, Clone, Copy)]
pub struct SyntheticSignalGenerator {
    emit_probability: f64,
}

impl Default for SyntheticSignalGenerator {
    fn default() -> Self {
        Self {
            emit_probability: EMIT_PROBABILITY,
        }
    }
}

impl SyntheticSignalGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the emit probability, clamped to `[0, 1]`.
    pub fn with_emit_probability(mut self, probability: f64) -> Self {
        self.emit_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn emit_probability(&self) -> f64 {
        self.emit_probability
    }

    /// Roll a signal for `symbol`. Returns `None` for roughly
    /// `1 - emit_probability` of calls.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Option<Signal> {
        if rng.random::<f64>() >= self.emit_probability {
            return None;
        }

        let signal_type = if rng.random_bool(0.5) {
            SignalType::Buy
        } else {
            SignalType::Sell
        };
        let entry = base_price(rng, symbol);

        let reward = rng.random_range(TAKE_PROFIT_BAND.0..TAKE_PROFIT_BAND.1);
        let risk = rng.random_range(STOP_LOSS_BAND.0..STOP_LOSS_BAND.1);
        let (take_profit, stop_loss, reasons) = match signal_type {
            SignalType::Buy => (entry * (1.0 + reward), entry * (1.0 - risk), &BUY_REASONS),
            SignalType::Sell => (entry * (1.0 - reward), entry * (1.0 + risk), &SELL_REASONS),
        };
        let template = reasons[rng.random_range(0..reasons.len())];

        Some(Signal {
            asset: symbol.to_string(),
            signal_type,
            entry,
            take_profit,
            stop_loss,
            reason: template.replace("{tf}", timeframe.as_str()),
            timestamp: Utc::now(),
            source: SignalSource::Synthetic,
        })
    }
}

/// Plausible price for the asset family the symbol belongs to.
pub fn base_price<R: Rng + ?Sized>(rng: &mut R, symbol: &str) -> f64 {
    let (low, high) = price_range(symbol);
    rng.random_range(low..high)
}

/// `[low, high)` range [`base_price`] draws from.
pub fn price_range(symbol: &str) -> (f64, f64) {
    PRICE_FAMILIES
        .iter()
        .find(|(marker, _, _)| symbol.contains(marker))
        .map(|&(_, center, jitter)| (center - jitter, center + jitter))
        .unwrap_or(FALLBACK_PRICE_RANGE)
}
