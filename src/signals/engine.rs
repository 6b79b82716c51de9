//! Refresh engine: turns a symbol universe into a signal board.
//!
//! Live passes run the crossover detector over fetched candles; demo passes
//! use the synthetic generator and never touch the network. The two are
//! separate entry points and never mix on one board.

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::models::market::Timeframe;
use crate::models::signal::Signal;
use crate::services::market_data::{MarketDataError, MarketDataProvider};
use crate::signals::board::{SignalBoard, SignalMode};
use crate::signals::crossover::CrossoverDetector;
use crate::signals::synthetic::SyntheticSignalGenerator;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to load trading pairs: {0}")]
    SymbolUniverse(#[source] MarketDataError),
}

pub struct SignalEngine {
    provider: Arc<dyn MarketDataProvider>,
    detector: CrossoverDetector,
    synthetic: SyntheticSignalGenerator,
    config: EngineConfig,
}

impl SignalEngine {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: EngineConfig) -> Self {
        Self {
            provider,
            detector: CrossoverDetector::default(),
            synthetic: SyntheticSignalGenerator::default(),
            config,
        }
    }

    pub fn with_synthetic(mut self, synthetic: SyntheticSignalGenerator) -> Self {
        self.synthetic = synthetic;
        self
    }

    pub fn mode(&self) -> SignalMode {
        self.config.mode
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one pass in the configured mode, replacing the board contents.
    /// On error the board is left untouched.
    pub async fn refresh(
        &self,
        board: &mut SignalBoard,
        timeframe: Timeframe,
    ) -> Result<(), EngineError> {
        match self.config.mode {
            SignalMode::Live => self.refresh_live(board, timeframe).await,
            SignalMode::Demo => {
                self.refresh_demo(board, timeframe).await;
                Ok(())
            }
        }
    }

    /// Crossover signals for the configured symbol universe.
    ///
    /// A failed candle fetch only drops that symbol. Failing to load the
    /// trading pairs aborts the pass.
    pub async fn refresh_live(
        &self,
        board: &mut SignalBoard,
        timeframe: Timeframe,
    ) -> Result<(), EngineError> {
        let symbols = self.live_symbols().await?;
        info!(
            count = symbols.len(),
            timeframe = %timeframe,
            "starting live signal pass"
        );

        let in_flight = self.config.max_in_flight.max(1);
        let outcomes: Vec<(String, Result<Option<Signal>, MarketDataError>)> =
            stream::iter(symbols.clone())
                .map(|symbol| async move {
                    let outcome = self.live_signal(&symbol, timeframe).await;
                    (symbol, outcome)
                })
                .buffered(in_flight)
                .collect()
                .await;

        let mut signals = Vec::new();
        let mut failed = Vec::new();
        for (symbol, outcome) in outcomes {
            match outcome {
                Ok(Some(signal)) => signals.push(signal),
                Ok(None) => {}
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "error fetching candles, skipping symbol");
                    failed.push(symbol);
                }
            }
        }

        info!(
            scanned = symbols.len(),
            signals = signals.len(),
            failed = failed.len(),
            "live signal pass complete"
        );
        board.replace(SignalMode::Live, timeframe, symbols.len(), failed, signals);
        Ok(())
    }

    /// Synthetic signals for the sample pairs. Never fails. Each symbol is
    /// delayed by the request pacing to mimic a network round trip.
    pub async fn refresh_demo(&self, board: &mut SignalBoard, timeframe: Timeframe) {
        let mut signals = Vec::new();
        for symbol in &self.config.sample_pairs {
            self.pace().await;
            let signal = self.synthetic.generate(&mut rand::rng(), symbol, timeframe);
            signals.extend(signal);
        }

        info!(
            scanned = self.config.sample_pairs.len(),
            signals = signals.len(),
            "demo signal pass complete"
        );
        board.replace(
            SignalMode::Demo,
            timeframe,
            self.config.sample_pairs.len(),
            Vec::new(),
            signals,
        );
    }

    /// Crossover signal for a single symbol, if its latest bar crosses.
    pub async fn live_signal(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Option<Signal>, MarketDataError> {
        let candles = self
            .provider
            .get_candles(symbol, timeframe, self.config.candle_limit)
            .await?;
        debug!(symbol = %symbol, count = candles.len(), "evaluating crossover");
        Ok(self.detector.detect(symbol, &candles))
    }

    /// Pairs quoted in one of the configured quote assets, capped at the pair limit.
    pub async fn live_symbols(&self) -> Result<Vec<String>, EngineError> {
        let pairs = self
            .provider
            .get_trading_pairs()
            .await
            .map_err(EngineError::SymbolUniverse)?;

        Ok(pairs
            .into_iter()
            .filter(|pair| {
                self.config
                    .quote_assets
                    .iter()
                    .any(|quote| quote == &pair.quote_asset)
            })
            .take(self.config.pair_limit)
            .map(|pair| pair.symbol)
            .collect())
    }

    async fn pace(&self) {
        if !self.config.request_pacing.is_zero() {
            tokio::time::sleep(self.config.request_pacing).await;
        }
    }
}
