//! The engine's notification contract.
//!
//! The engine never prints: every trade, placement, or rejection is handed
//! to an injected [`EventSink`] so the core stays usable without any I/O.
//! Human-readable rendering (the REPL's console output, say) is an external
//! collaborator that implements this trait.

use derive_more::Display;

use crate::types::{Id, OrderBookError, OrderKind, Price, Quantity, Side};

/// A notification emitted by the engine as a side effect of a command.
///
/// Events for a single command are emitted in the order they occur: Trades
/// in price-first-touched order, then the terminal event (`Placed`,
/// `Executed`, `UnfilledMarket`, `Cancelled`, or `Rejected`).
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One per distinct price touched by a single incoming order.
    #[display("Trade: {quantity} @ {price}")]
    Trade { price: Price, quantity: Quantity },
    /// Emitted after resting a Limit/Peg order with residual quantity.
    #[display("Placed: {kind} {side} order {id} @ {price} for {quantity}")]
    Placed {
        id: Id,
        kind: OrderKind,
        side: Side,
        price: Price,
        quantity: Quantity,
    },
    /// Emitted after full fill of a Limit or Market order.
    #[display("Executed: order {id}")]
    Executed { id: Id },
    /// Emitted when a Market order could not fully fill.
    #[display("Unfilled market order {id}, residual {residual_qty}")]
    UnfilledMarket { id: Id, residual_qty: Quantity },
    /// Emitted on cancel, or on the cancel half of an edit.
    #[display("Cancelled: order {id}")]
    Cancelled { id: Id },
    /// Emitted when a command is rejected without mutating state.
    #[display("Rejected: {reason}")]
    Rejected { reason: OrderBookError },
}

/// Receives notifications emitted by the engine.
///
/// Implementations must not call back into the `OrderBook` that is emitting
/// to them — event emission is synchronous and the engine is non-reentrant.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// A sink that discards every event, for callers that only care about the
/// `Result` returned from each operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: Event) {}
}

/// Blanket impl so call sites can pass `&mut Vec<Event>` directly, which is
/// exactly what [`RecordingSink`] wraps.
impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// Records every emitted event in arrival order, for tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<Event>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trades only, in emission order.
    pub fn trades(&self) -> Vec<Event> {
        self.events
            .iter()
            .copied()
            .filter(|e| matches!(e, Event::Trade { .. }))
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}
