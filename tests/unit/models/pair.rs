//! Unit tests for pair formatting

use cryptosignals::models::pair::{format_pair, split_pair};

#[test]
fn test_format_usdt_pair() {
    assert_eq!(format_pair("BTCUSDT"), "BTC/USDT");
    assert_eq!(format_pair("DOGEUSDT"), "DOGE/USDT");
}

#[test]
fn test_format_btc_quoted_pair() {
    assert_eq!(format_pair("ETHBTC"), "ETH/BTC");
}

#[test]
fn test_unknown_quote_is_unchanged() {
    assert_eq!(format_pair("UNKNOWNX"), "UNKNOWNX");
}

#[test]
fn test_usdt_checked_before_other_quotes() {
    assert_eq!(split_pair("ETHUSDT"), Some(("ETH", "USDT")));
    assert_eq!(split_pair("BNBBUSD"), Some(("BNB", "BUSD")));
    assert_eq!(split_pair("LINKETH"), Some(("LINK", "ETH")));
    assert_eq!(split_pair("XRPEUR"), None);
}
