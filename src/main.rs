use std::env;
use std::sync::Arc;

use cryptosignals::config::AppConfig;
use cryptosignals::logging;
use cryptosignals::models::market::Timeframe;
use cryptosignals::models::pair::format_pair;
use cryptosignals::models::signal::{format_price, Signal};
use cryptosignals::services::binance::BinanceClient;
use cryptosignals::signals::{SignalBoard, SignalEngine};

/// One refresh pass, printed as signal cards. Usage: `cryptosignals [timeframe]`
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let config = AppConfig::from_env()?;
    let timeframe = match env::args().nth(1) {
        Some(arg) => arg.parse::<Timeframe>()?,
        None => config.engine.default_timeframe,
    };

    let client = Arc::new(BinanceClient::new(&config.binance));
    let engine = SignalEngine::new(client, config.engine.clone());
    let mut board = SignalBoard::new(engine.mode(), timeframe);
    engine.refresh(&mut board, timeframe).await?;

    println!(
        "{} signals on {} ({} mode, {} pairs scanned)",
        board.len(),
        timeframe,
        board.mode,
        board.scanned
    );
    if !board.failed.is_empty() {
        println!("Skipped: {}", board.failed.join(", "));
    }
    println!();

    for signal in board.signals() {
        print_signal(signal);
        println!();
    }

    Ok(())
}

fn print_signal(signal: &Signal) {
    println!(
        "  {} {}",
        format_pair(&signal.asset),
        signal.signal_type.as_str().to_uppercase()
    );
    println!("  Entry:       {}", format_price(signal.entry));
    println!("  Take Profit: {}", format_price(signal.take_profit));
    println!("  Stop Loss:   {}", format_price(signal.stop_loss));
    println!("  Risk/Reward: {}", signal.risk_reward_label());
    println!("  Reason:      {}", signal.reason);
    println!(
        "  Time:        {}",
        signal.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
}
