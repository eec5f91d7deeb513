use derive_more::Display;
use std::borrow::Cow;
use std::collections::VecDeque;
use validator::Validate;

pub type Price = u128;
pub type Quantity = u128;
pub type Id = u64;
pub type Timestamp = u64;

#[derive(Display, Debug, Clone, PartialEq, Eq, Hash)]
#[display("{}", symbol)]
pub struct Asset {
    /// Symbol string
    pub symbol: Cow<'static, str>,
    /// Minor units for display/serde (e.g., USD=2, BTC=8)
    pub decimals: u8,
}

impl Asset {
    pub const fn new(symbol: &'static str, decimals: u8) -> Self {
        Self {
            symbol: Cow::Borrowed(symbol),
            decimals,
        }
    }
}

#[derive(Display, Validate, Debug, Clone, PartialEq, Eq, Hash)]
#[display("{}/{}", base, quote)]
pub struct Instrument {
    /// Base asset (e.g., BTC)
    pub base: Asset,
    /// Quote asset (e.g., USDT)
    pub quote: Asset,
}

impl Instrument {
    pub fn new(base: Asset, quote: Asset) -> Self {
        Self { base, quote }
    }
}

/// Which side of the book an order sits on.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "cli", value(rename_all = "lower"))]
pub enum Side {
    /// Buy order (bid) - willing to buy at specified price or lower
    Buy,
    /// Sell order (ask) - willing to sell at specified price or higher
    Sell,
}

impl Side {
    /// True if `opposite_price` satisfies a limit order of this side priced at `limit_price`.
    pub(crate) fn crosses(self, limit_price: Price, opposite_price: Price) -> bool {
        match self {
            Side::Buy => opposite_price <= limit_price,
            Side::Sell => opposite_price >= limit_price,
        }
    }

    /// The other side of the book.
    pub(crate) fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// The three order types the engine understands.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderKind {
    /// Rests at a caller-supplied price if not fully matched.
    Limit,
    /// Matches at any opposite price; never rests.
    Market,
    /// Always priced at the current same-side best; never initiates a trade.
    Peg,
}

/// Represents an order in the order book.
///
/// An order contains all the information needed to match and execute trades,
/// including the order ID, kind, side, price, quantity, and arrival sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Unique identifier for the order, assigned by the engine
    pub id: Id,
    /// Limit, Market, or Peg
    pub kind: OrderKind,
    /// Whether this is a buy or sell order
    pub side: Side,
    /// Price per unit in the smallest denomination. `None` only for Market orders.
    pub price: Option<Price>,
    /// Number of units to buy or sell
    pub quantity: Quantity,
    /// Arrival sequence number, used for FIFO ordering within a price level
    pub timestamp: Timestamp,
}

impl Order {
    pub(crate) fn new(
        id: Id,
        kind: OrderKind,
        side: Side,
        price: Option<Price>,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        Order {
            id,
            kind,
            side,
            price,
            quantity,
            timestamp,
        }
    }
}

/// Represents a price level in the order book.
///
/// A price level contains all orders at the same price, maintaining
/// first-in-first-out (FIFO) ordering for time priority.
#[derive(Debug)]
pub(crate) struct PriceLevel {
    /// The price for this level
    pub(crate) price: Price,
    /// Queue of orders at this price level (FIFO ordering)
    pub(crate) orders: VecDeque<Order>,
    /// Total quantity available at this price level
    pub(crate) total_quantity: Quantity,
}

impl PriceLevel {
    /// Creates a new empty price level at the specified price.
    pub(crate) fn new(price: Price) -> Self {
        PriceLevel {
            price,
            orders: VecDeque::new(),
            total_quantity: 0,
        }
    }

    /// Adds an order to the back of the queue at this price level.
    pub(crate) fn add_order(&mut self, order: Order) {
        self.total_quantity += order.quantity;
        self.orders.push_back(order);
    }

    /// Removes and returns the order at the front of the queue.
    /// Returns None if the level is empty.
    pub(crate) fn remove_order(&mut self) -> Option<Order> {
        let order = self.orders.pop_front()?;
        self.total_quantity -= order.quantity;
        Some(order)
    }

    /// Updates the quantity of the order at the front of the queue.
    /// Used when an order is partially filled.
    pub(crate) fn update_front_order_quantity(&mut self, new_quantity: Quantity) {
        if let Some(order) = self.orders.front_mut() {
            let old_quantity = order.quantity;
            order.quantity = new_quantity;
            self.total_quantity = self.total_quantity - old_quantity + new_quantity;
        }
    }

    /// Removes the order with the given id from an arbitrary position in the
    /// queue. Used by cancel, edit, and the pegged-refresh protocol, none of
    /// which are restricted to the FIFO head.
    pub(crate) fn take_order(&mut self, id: Id) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id == id)?;
        let order = self.orders.remove(pos)?;
        self.total_quantity -= order.quantity;
        Some(order)
    }

    /// Returns true if this price level has no orders.
    pub(crate) fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Error type for order book operations.
///
/// Every variant is reported to the caller via `Result` and leaves book
/// state unchanged, with one documented exception on `OrderBook::edit`.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBookError {
    /// A limit order's price was zero.
    #[display("price must be positive, got {price}")]
    NonPositivePrice { price: Price },
    /// An order's quantity was zero.
    #[display("quantity must be positive, got {quantity}")]
    NonPositiveQuantity { quantity: Quantity },
    /// Cancel/edit referenced an id that isn't resting in the book.
    #[display("order {id} not found")]
    NotFound { id: Id },
    /// A peg order was placed, or re-pegged, while its own side was empty.
    #[display("no same-side reference price to peg against")]
    NoReference,
    /// An edit of a Limit order omitted the required new price.
    #[display("a new price is required to edit a limit order")]
    MissingPrice,
}
