//! # book-cli
//!
//! The terminal front-end for [`book_core`]. This binary owns everything
//! the engine deliberately does not: the banner, the interactive REPL that
//! tokenizes command lines, the textual book printer, and a single-shot
//! clap entry point for non-interactive use. The engine itself never
//! prints — every notification reaches this binary through an
//! [`EventSink`] implementation, [`ConsoleSink`].

use book_core::types::{Asset, Instrument};
use book_core::{
    format_price, format_quantity, price_to_minor_units, quantity_to_minor_units, Event,
    EventSink, OrderBook, OrderKind, Side,
};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "book-cli")]
#[command(about = "A limit order book CLI", long_about = None)]
struct Cli {
    /// Base asset symbol (e.g., BTC)
    #[arg(long, default_value = "BTC")]
    base_asset: String,

    /// Base asset decimals (e.g., 6 for micro-BTC)
    #[arg(long, default_value = "6")]
    base_decimals: u8,

    /// Quote asset symbol (e.g., USDT)
    #[arg(long, default_value = "USDT")]
    quote_asset: String,

    /// Quote asset decimals (e.g., 2 for USDT cents)
    #[arg(long, default_value = "2")]
    quote_decimals: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a limit order
    #[command(name = "limit")]
    Limit {
        side: Side,
        price: String,
        quantity: String,
    },
    /// Place a market order
    #[command(name = "market")]
    Market { side: Side, quantity: String },
    /// Place a peg order
    #[command(name = "peg")]
    Peg { side: Side, quantity: String },
    /// Cancel a resting order
    #[command(name = "cancel")]
    Cancel { id: u64 },
    /// Edit a resting order: `edit <id> <qty>` or `edit <id> <price> <qty>`
    #[command(name = "edit")]
    Edit {
        id: u64,
        a: String,
        b: Option<String>,
    },
    /// Print the current book state
    #[command(name = "print", aliases = ["book", "p"])]
    Print,
    /// Exit interactive mode
    #[command(name = "quit", aliases = ["exit", "q"])]
    Quit,
    /// Start interactive mode
    #[command(name = "interactive")]
    Interactive,
}

fn main() {
    let cli = Cli::parse();

    let base_asset = Asset {
        symbol: cli.base_asset.into(),
        decimals: cli.base_decimals,
    };
    let quote_asset = Asset {
        symbol: cli.quote_asset.into(),
        decimals: cli.quote_decimals,
    };
    let instrument = Instrument::new(base_asset, quote_asset);

    match cli.command {
        None | Some(Commands::Interactive) => {
            run_interactive_mode(instrument);
        }
        Some(command) => {
            let mut book = OrderBook::new(instrument);
            let mut sink = ConsoleSink;
            if let Err(msg) = dispatch(&mut book, command, &mut sink) {
                eprintln!("Error: {}", msg);
                std::process::exit(1);
            }
        }
    }
}

/// Applies one already-parsed `Commands` value to `book`, reporting
/// parse/conversion failures as a short string (the engine's own
/// `Rejected` events come through `sink`, not this `Result`).
fn dispatch(book: &mut OrderBook, command: Commands, sink: &mut dyn EventSink) -> Result<(), String> {
    match command {
        Commands::Limit {
            side,
            price,
            quantity,
        } => {
            let (p, q) = parse_price_and_quantity(book, &price, &quantity)?;
            book.place_limit(side, p, q, sink).map_err(|e| e.to_string())?;
            Ok(())
        }
        Commands::Market { side, quantity } => {
            let q = parse_quantity(book, &quantity)?;
            book.place_market(side, q, sink).map_err(|e| e.to_string())?;
            Ok(())
        }
        Commands::Peg { side, quantity } => {
            let q = parse_quantity(book, &quantity)?;
            book.place_peg(side, q, sink).map_err(|e| e.to_string())?;
            Ok(())
        }
        Commands::Cancel { id } => {
            book.cancel(id, sink).map_err(|e| e.to_string())?;
            Ok(())
        }
        Commands::Edit { id, a, b } => {
            let (new_price, quantity_str) = match b {
                Some(qty) => (Some(a), qty),
                None => (None, a),
            };
            let new_price = new_price
                .map(|p| {
                    let d = Decimal::from_str(&p).map_err(|_| format!("invalid price: {}", p))?;
                    price_to_minor_units(d, &book.instrument.quote)
                        .ok_or_else(|| "price too large to convert to minor units".to_string())
                })
                .transpose()?;
            let new_quantity = parse_quantity(book, &quantity_str)?;
            book.edit(id, new_price, new_quantity, sink)
                .map_err(|e| e.to_string())?;
            Ok(())
        }
        Commands::Print => {
            print_snapshot(book);
            Ok(())
        }
        Commands::Quit | Commands::Interactive => Ok(()),
    }
}

fn parse_price_and_quantity(
    book: &OrderBook,
    price_str: &str,
    quantity_str: &str,
) -> Result<(u128, u128), String> {
    let price_decimal =
        Decimal::from_str(price_str).map_err(|_| format!("invalid price: {}", price_str))?;
    let price = price_to_minor_units(price_decimal, &book.instrument.quote)
        .ok_or("price too large to convert to minor units")?;
    let quantity = parse_quantity(book, quantity_str)?;
    Ok((price, quantity))
}

fn parse_quantity(book: &OrderBook, quantity_str: &str) -> Result<u128, String> {
    let quantity_decimal =
        Decimal::from_str(quantity_str).map_err(|_| format!("invalid quantity: {}", quantity_str))?;
    quantity_to_minor_units(quantity_decimal, &book.instrument.base)
        .ok_or_else(|| "quantity too large to convert to minor units".to_string())
}

/// Tokenizes one REPL line into a `Commands`, reusing the non-interactive
/// parser so both entry points agree on syntax and error text.
fn parse_interactive_command(input: &str) -> Result<Commands, String> {
    let args = shlex::split(input).ok_or("invalid command syntax")?;
    if args.is_empty() {
        return Err("empty command".to_string());
    }

    let mut full_args = vec!["book-cli".to_string()];
    full_args.extend(args);

    match Cli::try_parse_from(full_args) {
        Ok(cli) => cli
            .command
            .ok_or_else(|| "interactive mode not available within interactive mode".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn run_interactive_mode(instrument: Instrument) {
    println!("=== book-cli: interactive order book ===");
    println!("Type 'help' for available commands, 'quit' to exit\n");

    let mut book = OrderBook::new(instrument);
    let mut sink = ConsoleSink;

    println!("Instrument: {}\n", book.instrument);

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => {
                println!("Goodbye!");
                break;
            }
            Ok(_) => {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "help" || trimmed == "h" {
                    show_help();
                    continue;
                }

                match parse_interactive_command(trimmed) {
                    Ok(Commands::Quit) => {
                        println!("Goodbye!");
                        break;
                    }
                    Ok(command) => {
                        if let Err(msg) = dispatch(&mut book, command, &mut sink) {
                            println!("❌ {}", msg);
                        }
                    }
                    Err(e) => {
                        if e.contains("unexpected argument") || e.contains("invalid value") {
                            println!("❌ Invalid command. Type 'help' for available commands.");
                        } else if e.contains("required arguments") {
                            println!("❌ Missing required arguments. Type 'help' for usage.");
                        } else {
                            println!("❌ {}", e.lines().next().unwrap_or("invalid command"));
                        }
                    }
                }
            }
            Err(error) => {
                println!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn show_help() {
    println!("📚 Available Commands:");
    println!("  limit <buy|sell> <price> <qty>  - Place a limit order (e.g., limit buy 100.50 0.001)");
    println!("  market <buy|sell> <qty>         - Place a market order (e.g., market sell 0.002)");
    println!("  peg <buy|sell> <qty>            - Place a peg order tracking the same-side best");
    println!("  cancel <id>                     - Cancel a resting order");
    println!("  edit <id> <qty>                 - Edit a peg order's quantity");
    println!("  edit <id> <price> <qty>         - Edit a limit order's price and quantity");
    println!("  print | book | p                - Show current order book state");
    println!("  help | h                        - Show this help message");
    println!("  quit | exit | q                 - Exit the CLI");
    println!();
    println!("💡 Prices and quantities use decimal format (e.g., 100.50, 0.001).");
    println!();
}

fn print_snapshot(book: &OrderBook) {
    let snapshot = book.snapshot();
    println!("\n📊 Order Book State: {}", book.instrument);

    println!("  🔴 Asks (best first):");
    for (price, total, orders) in snapshot.ask.levels.iter().rev() {
        print_level(book, *price, *total, orders);
    }
    println!("    ─────────────────");
    println!("  🟢 Bids (best first):");
    for (price, total, orders) in &snapshot.bid.levels {
        print_level(book, *price, *total, orders);
    }

    match (book.best_buy(), book.best_sell()) {
        (Some((buy_price, _)), Some((sell_price, _))) => {
            let spread = sell_price - buy_price;
            println!("  📏 Spread: {}", format_price(spread, &book.instrument.quote));
        }
        _ => println!("  📏 Spread: n/a"),
    }
    println!();
}

fn print_level(book: &OrderBook, price: u128, total: u128, orders: &[book_core::ResidentOrder]) {
    let price_str = format_price(price, &book.instrument.quote);
    let total_str = format_quantity(total, &book.instrument.base);
    let ids: Vec<String> = orders
        .iter()
        .map(|o| match o.kind {
            OrderKind::Peg => format!("{}*", o.id),
            _ => o.id.to_string(),
        })
        .collect();
    println!("    {} @ {}  [{}]", total_str, price_str, ids.join(", "));
}

/// Renders engine events as human-readable lines. This is the only place
/// in the binary that formats prices/quantities for trade/placement
/// notifications; `print_snapshot` handles the book-state view separately.
struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&mut self, event: Event) {
        match event {
            Event::Trade { price, quantity } => {
                println!("  💰 Trade: {} @ {}", quantity, price);
            }
            Event::Placed {
                id,
                kind,
                side,
                price,
                quantity,
            } => {
                println!(
                    "✅ Placed: {} {} order {} @ {} for {}",
                    kind, side, id, price, quantity
                );
            }
            Event::Executed { id } => {
                println!("🎯 Executed: order {}", id);
            }
            Event::UnfilledMarket { id, residual_qty } => {
                println!(
                    "⚠️  Market order {} only partially filled, {} dropped",
                    id, residual_qty
                );
            }
            Event::Cancelled { id } => {
                println!("🗑️  Cancelled: order {}", id);
            }
            Event::Rejected { reason } => {
                println!("❌ Rejected: {}", reason);
            }
        }
    }
}
