//! End-to-end checks of the scan pipeline's pure stages: payload parsing,
//! growth filtering, formatting, and alert assembly, wired together the way
//! the request handler wires them.

use contract_monitor::services::notify::LarkNotifier;
use contract_monitor::services::scanner::{growth_ratio, qualify, to_display_time};
use contract_monitor::types::models::{MarkPrice, OpenInterestSample, QualifyingToken};

const THRESHOLD: f64 = 0.4;

fn mark(symbol: &str, price: &str, funding: &str) -> MarkPrice {
    MarkPrice {
        symbol: symbol.to_string(),
        mark_price: price.to_string(),
        last_funding_rate: funding.to_string(),
    }
}

/// A full-size window (289 points, 5m apart) ramping linearly between the two
/// endpoint notional values.
fn window(symbol: &str, first_value: f64, last_value: f64) -> Vec<OpenInterestSample> {
    let points = 289;
    (0..points)
        .map(|i| {
            let frac = i as f64 / (points - 1) as f64;
            OpenInterestSample {
                symbol: symbol.to_string(),
                sum_open_interest: "2.5".to_string(),
                sum_open_interest_value: format!("{:.2}", first_value + (last_value - first_value) * frac),
                timestamp: 1_698_300_000_000 + i as i64 * 300_000,
            }
        })
        .collect()
}

#[test]
fn fifty_percent_growth_qualifies_with_expected_formatting() {
    let btc = mark("BTCUSDT", "50000.1234", "0.0001");
    let token = qualify(&btc, &window("BTCUSDT", 1000.0, 1500.0), THRESHOLD)
        .expect("50% growth must qualify at a 40% threshold");

    assert_eq!(token.symbol, "BTCUSDT");
    assert_eq!(token.mark_price, "50000.1234");
    assert_eq!(token.last_funding_rate, "0.0100%");
    assert_eq!(token.contract_position_growth, "50.00%");
    assert_eq!(token.sum_open_interest_value, "1500.00");
}

#[test]
fn growth_below_threshold_is_filtered_out() {
    let eth = mark("ETHUSDT", "3000.55", "0.0002");
    assert!(qualify(&eth, &window("ETHUSDT", 1000.0, 1399.0), THRESHOLD).is_none());
}

#[test]
fn ratio_comes_from_window_endpoints() {
    let w = window("BTCUSDT", 1000.0, 1500.0);
    let ratio = growth_ratio(&w).unwrap();
    assert!((ratio - 0.5).abs() < 1e-9);

    // Same endpoints, wildly different interior: same ratio.
    let mut spiked = w.clone();
    spiked[100].sum_open_interest_value = "9999999.00".to_string();
    assert_eq!(growth_ratio(&spiked), growth_ratio(&w));
}

#[test]
fn mixed_batch_keeps_only_qualifiers() {
    let batch = vec![
        (mark("AUSDT", "1.0", "0.0001"), window("AUSDT", 1000.0, 1400.0)),
        (mark("BUSDT", "2.0", "0.0001"), window("BUSDT", 1000.0, 1399.0)),
        (mark("CUSDT", "3.0", "0.0001"), window("CUSDT", 1000.0, 2000.0)),
    ];

    let qualifying: Vec<QualifyingToken> = batch
        .iter()
        .filter_map(|(m, w)| qualify(m, w, THRESHOLD))
        .collect();

    let symbols: Vec<&str> = qualifying.iter().map(|t| t.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AUSDT", "CUSDT"]);
}

#[test]
fn alert_covers_every_qualifier() {
    let tokens: Vec<QualifyingToken> = [
        ("AUSDT", 1400.0),
        ("CUSDT", 2000.0),
    ]
    .iter()
    .filter_map(|(symbol, last)| {
        qualify(
            &mark(symbol, "1.0", "0.0001"),
            &window(symbol, 1000.0, *last),
            THRESHOLD,
        )
    })
    .collect();

    let text = LarkNotifier::build_alert_text(&tokens);
    assert!(text.starts_with("Market Alert:"));
    assert!(text.contains("Symbol: AUSDT"));
    assert!(text.contains("Symbol: CUSDT"));
    assert!(text.contains("24h Open Interest Growth: 40.00%"));
    assert!(text.contains("24h Open Interest Growth: 100.00%"));
}

#[test]
fn timestamps_render_in_utc_plus_eight() {
    // 2023-10-26 06:00:00 UTC -> 14:00 in UTC+8.
    assert_eq!(to_display_time(1_698_300_000_000), "2023/10/26 14:00:00");
}
