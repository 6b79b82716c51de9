//! Unit tests for SMA indicator

use chrono::Utc;
use cryptosignals::indicators::trend::sma::{calculate_previous_sma, calculate_sma};
use cryptosignals::models::candle::Candle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn create_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .map(|&close| Candle::new(close, close + 1.0, close - 1.0, close, 1000.0, Utc::now()))
        .collect()
}

#[test]
fn test_sma_uses_latest_closes() {
    let candles = create_candles(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let sma = calculate_sma(&candles, 3).unwrap();
    assert_eq!(sma.period, 3);
    assert!((sma.value - 4.0).abs() < 1e-12);
}

#[test]
fn test_sma_insufficient_data() {
    let candles = create_candles(&[1.0, 2.0]);
    assert!(calculate_sma(&candles, 3).is_none());
    assert!(calculate_sma(&candles, 0).is_none());
}

#[test]
fn test_sma_exact_period() {
    let candles = create_candles(&[2.0, 4.0, 6.0]);
    let sma = calculate_sma(&candles, 3).unwrap();
    assert!((sma.value - 4.0).abs() < 1e-12);
}

#[test]
fn test_previous_sma_drops_latest_close() {
    let candles = create_candles(&[1.0, 2.0, 3.0, 4.0, 100.0]);
    let previous = calculate_previous_sma(&candles, 4).unwrap();
    assert!((previous.value - 2.5).abs() < 1e-12);
    assert!(calculate_previous_sma(&candles, 5).is_none());
}

#[test]
fn test_sma_matches_naive_mean_on_random_series() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..500 {
        let len = rng.random_range(0..120);
        let closes: Vec<f64> = (0..len).map(|_| rng.random_range(0.001..100_000.0)).collect();
        let candles = create_candles(&closes);
        let period = rng.random_range(1..80u32);

        match calculate_sma(&candles, period) {
            Some(sma) => {
                assert!(len >= period as usize);
                let window = &closes[len - period as usize..];
                let naive = window.iter().sum::<f64>() / period as f64;
                assert!((sma.value - naive).abs() <= naive.abs() * 1e-12);
            }
            None => assert!(len < period as usize, "len {} period {}", len, period),
        }
    }
}
