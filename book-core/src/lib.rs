//! # book-core
//!
//! A single-instrument limit order book with price-time priority matching.
//!
//! This crate owns the matching algorithm and nothing else: there is no
//! I/O, no printing, no REPL. Every side effect — a trade, a placement, a
//! rejection — is handed to an injected [`EventSink`](events::EventSink),
//! so the engine is equally usable headless (tests, simulations) or behind
//! a terminal front-end.
//!
//! ## Example
//!
//! ```rust
//! use book_core::{Event, EventSink, NullSink, OrderBook, Side};
//! use book_core::types::{Asset, Instrument};
//!
//! let usdt = Asset::new("USDT", 2);
//! let btc = Asset::new("BTC", 6);
//! let instrument = Instrument::new(btc, usdt);
//! let mut book = OrderBook::new(instrument);
//!
//! let mut sink = NullSink;
//! // Prices/quantities are in minor units (cents, satoshis, ...).
//! book.place_limit(Side::Buy, 10_000, 10_000, &mut sink).unwrap();
//! book.place_limit(Side::Sell, 10_000, 5_000, &mut sink).unwrap();
//! assert_eq!(book.best_buy(), Some((10_000, 5_000)));
//! ```

pub mod events;
pub mod order_book;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod types;
mod units;

pub use events::{Event, EventSink, NullSink, RecordingSink};
pub use order_book::{OrderBook, ResidentOrder, Snapshot, SideView};
pub use types::{Order, OrderBookError, OrderKind, Side};
pub use units::{
    format_price, format_quantity, price_from_minor_units, price_to_minor_units,
    quantity_from_minor_units, quantity_to_minor_units,
};
