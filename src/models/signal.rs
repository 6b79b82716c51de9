//! Trading signal model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Buy,
    Sell,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Buy => "buy",
            SignalType::Sell => "sell",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which generator produced a signal. Synthetic signals carry no market
/// information and only exist to drive the dashboard without network access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    Crossover,
    Synthetic,
}

impl SignalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalSource::Crossover => "crossover",
            SignalSource::Synthetic => "synthetic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub asset: String,
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub entry: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub reason: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub source: SignalSource,
}

impl Signal {
    /// Reward-to-risk ratio: distance to take-profit over distance to stop-loss.
    pub fn risk_reward(&self) -> f64 {
        let reward = (self.take_profit - self.entry).abs();
        let risk = (self.entry - self.stop_loss).abs();
        reward / risk
    }

    /// `"1:2.00"` style label used on signal cards.
    pub fn risk_reward_label(&self) -> String {
        format!("1:{:.2}", self.risk_reward())
    }

    /// Take-profit and stop-loss bracket the entry on the side the signal
    /// type implies.
    pub fn is_well_ordered(&self) -> bool {
        match self.signal_type {
            SignalType::Buy => self.stop_loss < self.entry && self.entry < self.take_profit,
            SignalType::Sell => self.take_profit < self.entry && self.entry < self.stop_loss,
        }
    }
}

/// Format a price with more decimals for lower magnitudes.
pub fn format_price(price: f64) -> String {
    if price < 0.1 {
        format!("{:.8}", price)
    } else if price < 1.0 {
        format!("{:.6}", price)
    } else if price < 100.0 {
        format!("{:.4}", price)
    } else if price < 10_000.0 {
        format!("{:.2}", price)
    } else {
        format!("{:.0}", price)
    }
}
