//! Unit tests for SMA crossover detection

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use cryptosignals::models::candle::Candle;
use cryptosignals::models::indicators::CrossoverSnapshot;
use cryptosignals::models::signal::{SignalSource, SignalType};
use cryptosignals::signals::crossover::{classify, CrossoverDetector, LONG_PERIOD, MIN_CANDLES};

fn create_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open_time = DateTime::from_timestamp_millis(i as i64 * 3_600_000).unwrap();
            Candle::new(close, close, close, close, 1000.0, open_time)
        })
        .collect()
}

/// Flat at 100 for 50 bars, then a final close of `last`.
fn flat_then(last: f64) -> Vec<Candle> {
    let mut closes = vec![100.0; LONG_PERIOD];
    closes.push(last);
    create_candles(&closes)
}

fn snapshot(prev_short: f64, prev_long: f64, short: f64, long: f64) -> CrossoverSnapshot {
    CrossoverSnapshot {
        short_period: 20,
        long_period: 50,
        current_short: short,
        current_long: long,
        previous_short: prev_short,
        previous_long: prev_long,
    }
}

#[test]
fn test_detects_bullish_crossover() {
    let detector = CrossoverDetector::new();
    let signal = detector.detect("BTCUSDT", &flat_then(200.0)).unwrap();

    assert_eq!(signal.asset, "BTCUSDT");
    assert_eq!(signal.signal_type, SignalType::Buy);
    assert_eq!(signal.entry, 200.0);
    assert!((signal.take_profit - 204.0).abs() < 1e-8);
    assert!((signal.stop_loss - 198.0).abs() < 1e-8);
    assert_eq!(signal.reason, "SMA20 crossed above SMA50");
    assert_eq!(signal.source, SignalSource::Crossover);
    assert!(signal.is_well_ordered());
}

#[test]
fn test_detects_bearish_crossover() {
    let detector = CrossoverDetector::new();
    let signal = detector.detect("ETHBTC", &flat_then(50.0)).unwrap();

    assert_eq!(signal.signal_type, SignalType::Sell);
    assert_eq!(signal.entry, 50.0);
    assert!((signal.take_profit - 49.0).abs() < 1e-8);
    assert!((signal.stop_loss - 50.5).abs() < 1e-8);
    assert_eq!(signal.reason, "SMA20 crossed below SMA50");
    assert!(signal.is_well_ordered());
}

#[test]
fn test_no_signal_on_flat_series() {
    let detector = CrossoverDetector::new();
    assert!(detector.detect("BTCUSDT", &flat_then(100.0)).is_none());
}

#[test]
fn test_no_signal_when_trend_already_established() {
    let closes: Vec<f64> = (1..=80).map(f64::from).collect();
    let detector = CrossoverDetector::new();
    assert!(detector.detect("BTCUSDT", &create_candles(&closes)).is_none());
}

#[test]
fn test_rejects_short_series() {
    let detector = CrossoverDetector::new();
    let closes = vec![100.0; MIN_CANDLES - 1];
    assert!(detector.detect("BTCUSDT", &create_candles(&closes)).is_none());
}

#[test]
fn test_twenty_one_candles_lack_long_sma() {
    // Enough for the short SMA but not the long one.
    let mut closes = vec![100.0; 20];
    closes.push(500.0);
    let detector = CrossoverDetector::new();
    assert!(detector.detect("BTCUSDT", &create_candles(&closes)).is_none());
}

#[test]
fn test_needs_long_period_plus_one_candles() {
    let detector = CrossoverDetector::new();
    let candles = create_candles(&vec![100.0; LONG_PERIOD]);
    assert!(detector.snapshot(&candles).is_none());

    let candles = create_candles(&vec![100.0; LONG_PERIOD + 1]);
    let snapshot = detector.snapshot(&candles).unwrap();
    assert_eq!(snapshot.spread(), 0.0);
    assert_eq!(snapshot.previous_spread(), 0.0);
}

#[test]
fn test_detect_at_uses_given_timestamp() {
    let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let signal = CrossoverDetector::new()
        .detect_at("BTCUSDT", &flat_then(200.0), at)
        .unwrap();
    assert_eq!(signal.timestamp, at);
}

#[test]
fn test_non_positive_entry_is_ignored() {
    let mut closes = vec![0.0; LONG_PERIOD];
    closes.push(-1.0);
    let detector = CrossoverDetector::new();
    assert!(detector.detect("BADUSDT", &create_candles(&closes)).is_none());
}

#[test]
fn test_classify_boundaries() {
    // touching then crossing up
    assert_eq!(classify(&snapshot(1.0, 1.0, 2.0, 1.5)), Some(SignalType::Buy));
    // touching then crossing down
    assert_eq!(classify(&snapshot(1.0, 1.0, 1.0, 1.5)), Some(SignalType::Sell));
    // already above
    assert_eq!(classify(&snapshot(2.0, 1.0, 3.0, 1.0)), None);
    // already below
    assert_eq!(classify(&snapshot(1.0, 2.0, 1.0, 3.0)), None);
    // equal on both bars
    assert_eq!(classify(&snapshot(1.0, 1.0, 1.0, 1.0)), None);
}

#[test]
fn test_tiny_prices_do_not_emit_inverted_levels() {
    // TP and SL round onto the same 8-decimal step as the entry
    let tiny = 2f64.powi(-23);
    let mut closes = vec![tiny; LONG_PERIOD];
    closes.push(tiny * 2.0);

    let detector = CrossoverDetector::new();
    assert!(detector.detect("SHIBBTC", &create_candles(&closes)).is_none());
}

#[test]
fn test_random_walks_only_emit_well_ordered_signals() {
    let detector = CrossoverDetector::new();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut emitted = 0;

    for trial in 0..2_000 {
        // spans prices from sub-satoshi to five figures
        let mut price = 10f64.powf(rng.random_range(-8.0..5.0));
        let len = rng.random_range(1..150);
        let closes: Vec<f64> = (0..len)
            .map(|_| {
                price *= 1.0 + rng.random_range(-0.05..0.05);
                price
            })
            .collect();

        if let Some(signal) = detector.detect(&format!("SYM{}", trial), &create_candles(&closes)) {
            assert!(closes.len() > LONG_PERIOD);
            assert!(signal.is_well_ordered(), "{:?}", signal);
            emitted += 1;
        }
    }

    assert!(emitted > 0);
}
