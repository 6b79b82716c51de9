//! Unit tests for the synthetic demo signal generator

use cryptosignals::models::market::Timeframe;
use cryptosignals::models::signal::{SignalSource, SignalType};
use cryptosignals::signals::synthetic::{
    base_price, price_range, SyntheticSignalGenerator, STOP_LOSS_BAND, TAKE_PROFIT_BAND,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const TRIALS: usize = 10_000;

#[test]
fn test_emits_about_sixty_percent_of_the_time() {
    let generator = SyntheticSignalGenerator::new();
    let mut rng = StdRng::seed_from_u64(7);

    let emitted = (0..TRIALS)
        .filter(|_| {
            generator
                .generate(&mut rng, "BTCUSDT", Timeframe::OneHour)
                .is_some()
        })
        .count();
    let rate = emitted as f64 / TRIALS as f64;
    assert!((0.57..0.63).contains(&rate), "emit rate {}", rate);
}

#[test]
fn test_generated_signals_are_well_ordered() {
    let generator = SyntheticSignalGenerator::new().with_emit_probability(1.0);
    let mut rng = StdRng::seed_from_u64(42);
    let symbols = ["BTCUSDT", "ETHUSDT", "DOGEUSDT", "XRPUSDT", "LINKUSDT"];

    let mut buys = 0;
    for i in 0..TRIALS {
        let symbol = symbols[i % symbols.len()];
        let signal = generator
            .generate(&mut rng, symbol, Timeframe::FifteenMinutes)
            .expect("emit probability is 1");

        assert!(signal.is_well_ordered(), "{:?}", signal);
        assert_eq!(signal.source, SignalSource::Synthetic);
        assert_eq!(signal.asset, symbol);

        let (low, high) = price_range(symbol);
        assert!(signal.entry >= low && signal.entry <= high);

        let reward = (signal.take_profit - signal.entry).abs() / signal.entry;
        let risk = (signal.stop_loss - signal.entry).abs() / signal.entry;
        assert!(reward >= TAKE_PROFIT_BAND.0 - 1e-9 && reward <= TAKE_PROFIT_BAND.1 + 1e-9);
        assert!(risk >= STOP_LOSS_BAND.0 - 1e-9 && risk <= STOP_LOSS_BAND.1 + 1e-9);

        if signal.signal_type == SignalType::Buy {
            buys += 1;
        }
    }

    let buy_rate = buys as f64 / TRIALS as f64;
    assert!((0.47..0.53).contains(&buy_rate), "buy rate {}", buy_rate);
}

#[test]
fn test_zero_probability_never_emits() {
    let generator = SyntheticSignalGenerator::new().with_emit_probability(0.0);
    let mut rng = StdRng::seed_from_u64(1);
    assert!((0..1000).all(|_| generator.generate(&mut rng, "ETHUSDT", Timeframe::OneDay).is_none()));
}

#[test]
fn test_emit_probability_is_clamped() {
    assert_eq!(SyntheticSignalGenerator::new().with_emit_probability(3.0).emit_probability(), 1.0);
    assert_eq!(SyntheticSignalGenerator::new().with_emit_probability(-1.0).emit_probability(), 0.0);
}

#[test]
fn test_reason_mentions_timeframe_when_templated() {
    let generator = SyntheticSignalGenerator::new().with_emit_probability(1.0);
    let mut rng = StdRng::seed_from_u64(3);

    let templated: Vec<String> = (0..500)
        .filter_map(|_| generator.generate(&mut rng, "SOLUSDT", Timeframe::FourHours))
        .map(|signal| signal.reason)
        .filter(|reason| reason.contains("engulfing"))
        .collect();

    assert!(!templated.is_empty());
    assert!(templated.iter().all(|reason| reason.ends_with("on 4h chart")));
}

#[test]
fn test_price_families() {
    assert_eq!(price_range("BTCUSDT"), (55_000.0, 65_000.0));
    assert_eq!(price_range("ETHUSDT"), (2_700.0, 3_300.0));
    assert_eq!(price_range("LINKUSDT"), (10.0, 100.0));
    // first marker wins
    assert_eq!(price_range("ETHBTC"), price_range("BTCUSDT"));

    let mut rng = StdRng::seed_from_u64(9);
    let price = base_price(&mut rng, "DOGEUSDT");
    assert!((0.107..0.133).contains(&price));
}
