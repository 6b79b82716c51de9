//! Symbol to display-pair formatting

/// Known quote assets, in match priority order.
pub const QUOTE_ASSETS: [&str; 5] = ["USDT", "BTC", "ETH", "BNB", "BUSD"];

/// Split a concatenated symbol into `(base, quote)` using the first quote
/// suffix in [`QUOTE_ASSETS`] order that the symbol ends with.
pub fn split_pair(symbol: &str) -> Option<(&str, &str)> {
    QUOTE_ASSETS.iter().find_map(|quote| {
        symbol
            .strip_suffix(quote)
            .map(|base| (base, &symbol[base.len()..]))
    })
}

/// `"BTCUSDT"` -> `"BTC/USDT"`. Symbols with no known quote suffix are
/// returned unchanged.
pub fn format_pair(symbol: &str) -> String {
    match split_pair(symbol) {
        Some((base, quote)) => format!("{}/{}", base, quote),
        None => symbol.to_string(),
    }
}
