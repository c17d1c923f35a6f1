// crates/common/src/assets.rs

/// Decimals assumed for any symbol missing from [`ASSET_DECIMALS`]
pub const DEFAULT_DECIMALS: i32 = 18;

/// On-chain decimals per reserve symbol. Raw amounts are integer base units.
pub static ASSET_DECIMALS: &[(&str, i32)] = &[
    ("USDC", 6),
    ("USDT", 6),
    ("DAI", 18),
    ("WETH", 18),
    ("WMATIC", 18),
    ("LINK", 18),
    ("AAVE", 18),
    ("WBTC", 8),
    ("ETH", 18),
];

/// Decimals for a reserve symbol, exact match, unknown or absent -> 18
pub fn decimals(symbol: Option<&str>) -> i32 {
    symbol
        .and_then(|s| ASSET_DECIMALS.iter().find(|(name, _)| *name == s))
        .map(|(_, d)| *d)
        .unwrap_or(DEFAULT_DECIMALS)
}

/// Scale a raw base-unit amount into whole tokens
pub fn scale_amount(raw: f64, symbol: Option<&str>) -> f64 {
    raw / 10f64.powi(decimals(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_symbols() {
        assert_eq!(decimals(Some("USDC")), 6);
        assert_eq!(decimals(Some("WBTC")), 8);
        assert_eq!(decimals(Some("WETH")), 18);
        assert_eq!(decimals(Some("SHIB")), DEFAULT_DECIMALS);
        assert_eq!(decimals(Some("usdc")), DEFAULT_DECIMALS);
        assert_eq!(decimals(None), DEFAULT_DECIMALS);
    }

    #[test]
    fn test_scale_amount() {
        assert_eq!(scale_amount(1_000_000.0, Some("USDC")), 1.0);
        assert_eq!(scale_amount(2e18, Some("WETH")), 2.0);
        assert_eq!(scale_amount(150_000_000.0, Some("WBTC")), 1.5);
    }
}
