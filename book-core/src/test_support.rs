#![cfg(any(test, feature = "test-support"))]

//! Shared fixtures for tests and the demo scenario runner. Gated behind
//! `#[cfg(test)]` or the `test-support` feature so non-test builds never
//! pull in `rust_decimal`'s `FromStr` parsing path for literals.

use crate::types::{Asset, Instrument, Price, Quantity};
use crate::OrderBook;
use rust_decimal::Decimal;
use std::str::FromStr;

/// BTC/USDT with BTC at 6 decimals and USDT at 2, matching a typical spot
/// venue's tick/lot sizes.
pub fn std_instrument() -> Instrument {
    let usdt = Asset::new("USDT", 2);
    let btc = Asset::new("BTC", 6);
    Instrument::new(btc, usdt)
}

pub fn new_book() -> OrderBook {
    OrderBook::new(std_instrument())
}

/// Parses a decimal literal into quote-asset minor units, e.g. `price("100.00")`.
pub fn price(p: &str) -> Price {
    let d = Decimal::from_str(p).unwrap();
    let q_decimals = std_instrument().quote.decimals;
    crate::units::to_minor_units(d, q_decimals).unwrap()
}

/// Parses a decimal literal into base-asset minor units, e.g. `quantity("0.01")`.
pub fn quantity(q: &str) -> Quantity {
    let d = Decimal::from_str(q).unwrap();
    let b_decimals = std_instrument().base.decimals;
    crate::units::to_minor_units(d, b_decimals).unwrap()
}
