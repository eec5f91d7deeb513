//! # book-core demo
//!
//! Walks through the six end-to-end scenarios the matching engine is
//! expected to handle: an exact cross, a partial fill, a market sweep
//! across levels, a peg tracking a new best, a peg rejected on an empty
//! side, and an edit that loses time priority.

use book_core::test_support::std_instrument;
use book_core::{format_price, format_quantity, Event, OrderBook, RecordingSink, Side};
use rust_decimal::Decimal;
use std::str::FromStr;

fn main() {
    println!("=== book-core demo ===\n");

    let instrument = std_instrument();
    println!("Instrument: {}\n", instrument);

    demo_basic_cross(&mut OrderBook::new(instrument.clone()));
    demo_partial_fill(&mut OrderBook::new(instrument.clone()));
    demo_market_sweep(&mut OrderBook::new(instrument.clone()));
    demo_peg_tracks_new_best(&mut OrderBook::new(instrument.clone()));
    demo_peg_rejected_on_empty_side(&mut OrderBook::new(instrument.clone()));
    demo_edit_loses_time_priority(&mut OrderBook::new(instrument));
}

/// Scenario 1: a resting Limit sell is fully consumed by a Limit buy at
/// the same price.
fn demo_basic_cross(book: &mut OrderBook) {
    section("1. Basic cross (Limit/Limit exact)");

    place_limit(book, Side::Sell, "100.00", "0.010000");
    place_limit(book, Side::Buy, "100.00", "0.010000");

    print_book_state(book);
}

/// Scenario 2: a resting Limit sell is only partially filled, leaving a
/// smaller residual resting at the same price.
fn demo_partial_fill(book: &mut OrderBook) {
    section("2. Partial fill with residual rest");

    place_limit(book, Side::Sell, "100.00", "0.010000");
    place_limit(book, Side::Buy, "100.00", "0.004000");

    print_book_state(book);
}

/// Scenario 3: a Market buy sweeps two ask levels and drops its residual.
fn demo_market_sweep(book: &mut OrderBook) {
    section("3. Market sweeps multiple levels");

    place_limit(book, Side::Sell, "100.00", "0.003000");
    place_limit(book, Side::Sell, "101.00", "0.002000");
    place_market(book, Side::Buy, "0.004000");

    print_book_state(book);
}

/// Scenario 4: a Peg buy rests at the current best bid, then a new,
/// better Limit buy arrives and the pegged-refresh protocol re-pegs it.
fn demo_peg_tracks_new_best(book: &mut OrderBook) {
    section("4. Peg buy tracks a new best");

    place_limit(book, Side::Buy, "99.00", "0.005000");
    place_peg(book, Side::Buy, "0.002000");
    place_limit(book, Side::Buy, "100.00", "0.001000");

    print_book_state(book);
}

/// Scenario 5: a Peg buy is rejected outright because the buy side is
/// empty, with no change to the book.
fn demo_peg_rejected_on_empty_side(book: &mut OrderBook) {
    section("5. Peg rejected on empty side");

    place_peg(book, Side::Buy, "0.005000");

    print_book_state(book);
}

/// Scenario 6: editing the first of two same-price resting buys sends it
/// to the tail of its level, so the second buy now trades first.
fn demo_edit_loses_time_priority(book: &mut OrderBook) {
    section("6. Edit loses time priority");

    let id0 = place_limit(book, Side::Buy, "100.00", "0.005000");
    place_limit(book, Side::Buy, "100.00", "0.005000");

    println!("--Editing order {} in place (same price, same quantity):", id0);
    let mut sink = RecordingSink::new();
    book.edit(id0, Some(price(book, "100.00")), quantity(book, "0.005000"), &mut sink)
        .expect("edit should succeed");
    print_events(&sink.events, book);

    println!("--Incoming sell now trades against the other resting order first:");
    place_limit(book, Side::Sell, "100.00", "0.005000");

    print_book_state(book);
}

fn section(title: &str) {
    println!("{}", "-".repeat(title.len()));
    println!("{}", title);
    println!("{}", "-".repeat(title.len()));
}

fn place_limit(book: &mut OrderBook, side: Side, price_decimal: &str, quantity_decimal: &str) -> u64 {
    println!(
        "--Placing limit {} order: price={}, qty={}",
        side, price_decimal, quantity_decimal
    );
    let mut sink = RecordingSink::new();
    let p = price(book, price_decimal);
    let q = quantity(book, quantity_decimal);
    let id = book
        .place_limit(side, p, q, &mut sink)
        .expect("valid demo inputs never fail admission");
    print_events(&sink.events, book);
    id
}

fn place_market(book: &mut OrderBook, side: Side, quantity_decimal: &str) -> u64 {
    println!("--Placing market {} order: qty={}", side, quantity_decimal);
    let mut sink = RecordingSink::new();
    let q = quantity(book, quantity_decimal);
    let id = book
        .place_market(side, q, &mut sink)
        .expect("valid demo inputs never fail admission");
    print_events(&sink.events, book);
    id
}

fn place_peg(book: &mut OrderBook, side: Side, quantity_decimal: &str) {
    println!("--Placing peg {} order: qty={}", side, quantity_decimal);
    let mut sink = RecordingSink::new();
    let q = quantity(book, quantity_decimal);
    let _ = book.place_peg(side, q, &mut sink);
    print_events(&sink.events, book);
}

fn print_events(events: &[Event], book: &OrderBook) {
    if events.is_empty() {
        println!("----(no events)");
        return;
    }
    for event in events {
        match event {
            Event::Trade { price: p, quantity: q } => println!(
                "----Trade: {} @ {}",
                format_quantity(*q, &book.instrument.base),
                format_price(*p, &book.instrument.quote)
            ),
            Event::Placed {
                id,
                kind,
                side,
                price: p,
                quantity: q,
            } => println!(
                "----Placed: {} {} order {} @ {} for {}",
                kind,
                side,
                id,
                format_price(*p, &book.instrument.quote),
                format_quantity(*q, &book.instrument.base)
            ),
            Event::Executed { id } => println!("----Executed: order {}", id),
            Event::UnfilledMarket { id, residual_qty } => println!(
                "----Unfilled market order {}: {} dropped",
                id,
                format_quantity(*residual_qty, &book.instrument.base)
            ),
            Event::Cancelled { id } => println!("----Cancelled: order {}", id),
            Event::Rejected { reason } => println!("----Rejected: {}", reason),
        }
    }
}

fn print_book_state(book: &OrderBook) {
    println!("--Book state:");
    match book.best_buy() {
        Some((p, q)) => println!(
            "----Best BUY:  {} @ {}",
            format_quantity(q, &book.instrument.base),
            format_price(p, &book.instrument.quote)
        ),
        None => println!("----Best BUY:  None"),
    }
    match book.best_sell() {
        Some((p, q)) => println!(
            "----Best SELL: {} @ {}",
            format_quantity(q, &book.instrument.base),
            format_price(p, &book.instrument.quote)
        ),
        None => println!("----Best SELL: None"),
    }
    println!();
}

fn price(book: &OrderBook, decimal: &str) -> u128 {
    let d = Decimal::from_str(decimal).unwrap();
    book_core::price_to_minor_units(d, &book.instrument.quote).unwrap()
}

fn quantity(book: &OrderBook, decimal: &str) -> u128 {
    let d = Decimal::from_str(decimal).unwrap();
    book_core::quantity_to_minor_units(d, &book.instrument.base).unwrap()
}
