/// Component tickers of a fixture market.
///
/// The three-ticker test market uses real-looking codes; every other market
/// gets five synthetic tickers derived from its label.
pub fn tickers(market: &str) -> Vec<String> {
    if market == "3 ticker test" {
        return ["PETR4.SA", "VALE3.SA", "ITUB4.SA"]
            .map(String::from)
            .to_vec();
    }
    let stem: String = market
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(4)
        .collect::<String>()
        .to_ascii_uppercase();
    (1..=5).map(|n| format!("{stem}{n}")).collect()
}

/// Ticker `slot` has no bar on every 17th session, offset by its slot, so
/// panels always carry some gaps but never an empty row.
pub const fn has_gap(slot: usize, session: usize) -> bool {
    (session + slot) % 17 == 0
}
