//! Asset and signal-type filters applied to a board.

use serde::Deserialize;

use crate::models::signal::{Signal, SignalType};

/// Keep signals whose symbol ends with a quote-asset suffix, or everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AssetFilter {
    #[default]
    All,
    Quote(String),
}

impl From<String> for AssetFilter {
    fn from(value: String) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            AssetFilter::All
        } else {
            AssetFilter::Quote(value.to_uppercase())
        }
    }
}

impl From<&str> for AssetFilter {
    fn from(value: &str) -> Self {
        AssetFilter::from(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Buy,
    Sell,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SignalFilter {
    #[serde(default)]
    pub asset: AssetFilter,
    #[serde(default, rename = "type")]
    pub signal_type: TypeFilter,
}

impl SignalFilter {
    pub fn new(asset: AssetFilter, signal_type: TypeFilter) -> Self {
        Self { asset, signal_type }
    }

    pub fn matches(&self, signal: &Signal) -> bool {
        let asset_ok = match &self.asset {
            AssetFilter::All => true,
            AssetFilter::Quote(suffix) => signal.asset.ends_with(suffix.as_str()),
        };
        let type_ok = match self.signal_type {
            TypeFilter::All => true,
            TypeFilter::Buy => signal.signal_type == SignalType::Buy,
            TypeFilter::Sell => signal.signal_type == SignalType::Sell,
        };
        asset_ok && type_ok
    }

    pub fn apply(&self, signals: &[Signal]) -> Vec<Signal> {
        signals
            .iter()
            .filter(|signal| self.matches(signal))
            .cloned()
            .collect()
    }
}
