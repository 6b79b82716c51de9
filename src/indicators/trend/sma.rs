//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::models::candle::{closes, Candle};
use crate::models::indicators::SmaIndicator;

/// Calculate the SMA of closing prices for a specific period
pub fn calculate_sma(candles: &[Candle], period: u32) -> Option<SmaIndicator> {
    if candles.len() < period as usize {
        return None;
    }

    let value = math::sma(&closes(candles), period as usize)?;

    Some(SmaIndicator { value, period })
}

/// SMA on the bar before the latest one (latest close dropped)
pub fn calculate_previous_sma(candles: &[Candle], period: u32) -> Option<SmaIndicator> {
    let (_, previous) = candles.split_last()?;
    calculate_sma(previous, period)
}
