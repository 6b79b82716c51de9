//! Canned payloads for authenticated endpoints, served in demo mode when no
//! credentials are configured.

use chrono::{Duration, Utc};
use serde_json::{json, Value};

pub fn mock_response(endpoint: &str, params: &[(String, String)]) -> Value {
    match endpoint {
        "/account" => account(),
        "/myTrades" => {
            let symbol = params
                .iter()
                .find(|(key, _)| key == "symbol")
                .map(|(_, value)| value.as_str())
                .unwrap_or("BTCUSDT");
            my_trades(symbol)
        }
        _ => json!({ "message": "Mock data not available for this endpoint" }),
    }
}

fn account() -> Value {
    json!({
        "makerCommission": 10,
        "takerCommission": 10,
        "buyerCommission": 0,
        "sellerCommission": 0,
        "canTrade": true,
        "canWithdraw": true,
        "canDeposit": true,
        "updateTime": Utc::now().timestamp_millis(),
        "balances": [
            { "asset": "BTC", "free": "0.00231456", "locked": "0.00000000" },
            { "asset": "ETH", "free": "0.05218461", "locked": "0.00000000" },
            { "asset": "USDT", "free": "124.52", "locked": "0.00000000" }
        ]
    })
}

fn my_trades(symbol: &str) -> Value {
    let yesterday = Utc::now() - Duration::days(1);
    json!([{
        "symbol": symbol,
        "id": 28457,
        "orderId": 100234,
        "price": "59325.12",
        "qty": "0.00231",
        "quoteQty": "137.04",
        "commission": "0.00000231",
        "commissionAsset": "BTC",
        "time": yesterday.timestamp_millis(),
        "isBuyer": true,
        "isMaker": false,
        "isBestMatch": true
    }])
}
