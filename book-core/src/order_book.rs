use crate::events::{Event, EventSink};
use crate::types::{
    Id, Instrument, Order, OrderBookError, OrderKind, Price, PriceLevel, Quantity, Side,
    Timestamp,
};
use std::collections::{BTreeMap, HashMap};

/// One side of the book: an ordered price -> level map plus the direction
/// that makes "best" mean something ("rank 0").
///
/// Buy levels are read back-to-front (highest key first); Sell levels
/// front-to-back (lowest key first). `BTreeMap` gives O(log n) access to
/// either end, so no separate best-price cache is needed.
struct BookSide {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
}

impl BookSide {
    fn new(side: Side) -> Self {
        BookSide {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// The best (rank 0) price level, if any.
    fn best(&self) -> Option<(Price, &PriceLevel)> {
        match self.side {
            Side::Buy => self.levels.iter().next_back().map(|(p, l)| (*p, l)),
            Side::Sell => self.levels.iter().next().map(|(p, l)| (*p, l)),
        }
    }

    /// The price level at rank `k` (0 = best), if any.
    fn nth(&self, k: usize) -> Option<(Price, &PriceLevel)> {
        match self.side {
            Side::Buy => self.levels.iter().rev().nth(k).map(|(p, l)| (*p, l)),
            Side::Sell => self.levels.iter().nth(k).map(|(p, l)| (*p, l)),
        }
    }

    fn get_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    fn insert_empty(&mut self, price: Price) -> &mut PriceLevel {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
    }

    fn remove(&mut self, price: Price) {
        self.levels.remove(&price);
    }

    fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Total quantity resting at each price, best first.
    fn depth(&self) -> Vec<(Price, Quantity)> {
        match self.side {
            Side::Buy => self
                .levels
                .iter()
                .rev()
                .map(|(p, l)| (*p, l.total_quantity))
                .collect(),
            Side::Sell => self
                .levels
                .iter()
                .map(|(p, l)| (*p, l.total_quantity))
                .collect(),
        }
    }
}

/// One resident order as seen by [`OrderBook::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidentOrder {
    pub id: Id,
    pub kind: OrderKind,
    pub price: Price,
    pub quantity: Quantity,
}

/// A read-only view of one side of the book, best price first.
#[derive(Debug, Clone)]
pub struct SideView {
    pub levels: Vec<(Price, Quantity, Vec<ResidentOrder>)>,
}

/// A read-only, point-in-time view of both sides of the book.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub bid: SideView,
    pub ask: SideView,
}

/// A single trade, aggregated across contiguous fills at one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fill {
    price: Price,
    quantity: Quantity,
}

/// A limit order book: two [`BookSide`]s, an order locator, and the id
/// counter, driving price-time-priority matching for Limit, Market, and
/// Peg orders.
pub struct OrderBook {
    /// Instrument being traded (used for display/formatting only; matching
    /// operates entirely on raw minor-unit integers).
    pub instrument: Instrument,
    bid: BookSide,
    ask: BookSide,
    /// id -> (side, price), sufficient to locate the owning PriceLevel.
    locator: HashMap<Id, (Side, Price)>,
    next_id: Id,
    next_timestamp: Timestamp,
}

impl OrderBook {
    pub fn new(instrument: Instrument) -> Self {
        OrderBook {
            instrument,
            bid: BookSide::new(Side::Buy),
            ask: BookSide::new(Side::Sell),
            locator: HashMap::new(),
            next_id: 0,
            next_timestamp: 0,
        }
    }

    fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bid,
            Side::Sell => &self.ask,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bid,
            Side::Sell => &mut self.ask,
        }
    }

    fn mint_id(&mut self) -> Id {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn mint_timestamp(&mut self) -> Timestamp {
        let ts = self.next_timestamp;
        self.next_timestamp += 1;
        ts
    }

    /// Best buy price and total quantity resting there, if any.
    pub fn best_buy(&self) -> Option<(Price, Quantity)> {
        self.bid.best().map(|(p, l)| (p, l.total_quantity))
    }

    /// Best sell price and total quantity resting there, if any.
    pub fn best_sell(&self) -> Option<(Price, Quantity)> {
        self.ask.best().map(|(p, l)| (p, l.total_quantity))
    }

    /// Market depth for one side, best price first, up to `levels` entries.
    pub fn depth(&self, side: Side, levels: usize) -> Vec<(Price, Quantity)> {
        self.side(side).depth().into_iter().take(levels).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bid.is_empty() && self.ask.is_empty()
    }

    /// Places a Limit order: matches against the opposite side while it
    /// crosses, then rests any residual.
    pub fn place_limit(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        sink: &mut dyn EventSink,
    ) -> Result<Id, OrderBookError> {
        if price == 0 {
            return self.reject(OrderBookError::NonPositivePrice { price }, sink);
        }
        if quantity == 0 {
            return self.reject(OrderBookError::NonPositiveQuantity { quantity }, sink);
        }

        let id = self.mint_id();
        let timestamp = self.mint_timestamp();
        let mut order = Order::new(id, OrderKind::Limit, side, Some(price), quantity, timestamp);

        let fills = self.match_incoming(&mut order);
        self.emit_fills(&fills, sink);

        if order.quantity > 0 {
            let residual_quantity = order.quantity;
            let became_best = self.rest(order);
            sink.emit(Event::Placed {
                id,
                kind: OrderKind::Limit,
                side,
                price,
                quantity: residual_quantity,
            });
            if became_best {
                self.refresh_pegs(side, sink);
            }
        } else {
            sink.emit(Event::Executed { id });
        }

        Ok(id)
    }

    /// Places a Market order: matches at any opposite price until either the
    /// opposite side empties or the incoming quantity is exhausted. Any
    /// residual is dropped, never rested.
    pub fn place_market(
        &mut self,
        side: Side,
        quantity: Quantity,
        sink: &mut dyn EventSink,
    ) -> Result<Id, OrderBookError> {
        if quantity == 0 {
            return self.reject(OrderBookError::NonPositiveQuantity { quantity }, sink);
        }

        let id = self.mint_id();
        let timestamp = self.mint_timestamp();
        let mut order = Order::new(id, OrderKind::Market, side, None, quantity, timestamp);

        let fills = self.match_incoming(&mut order);
        self.emit_fills(&fills, sink);

        if order.quantity > 0 {
            sink.emit(Event::UnfilledMarket {
                id,
                residual_qty: order.quantity,
            });
        } else {
            sink.emit(Event::Executed { id });
        }

        Ok(id)
    }

    /// Places a Peg order at the current same-side best price. Never
    /// matches: joining the best level of its own side cannot cross the
    /// opposite side. Rejected if that side is empty.
    pub fn place_peg(
        &mut self,
        side: Side,
        quantity: Quantity,
        sink: &mut dyn EventSink,
    ) -> Result<Id, OrderBookError> {
        if quantity == 0 {
            return self.reject(OrderBookError::NonPositiveQuantity { quantity }, sink);
        }

        let Some((price, _)) = self.side(side).best() else {
            return self.reject(OrderBookError::NoReference, sink);
        };

        let id = self.mint_id();
        let timestamp = self.mint_timestamp();
        let order = Order::new(id, OrderKind::Peg, side, Some(price), quantity, timestamp);
        self.rest(order);

        sink.emit(Event::Placed {
            id,
            kind: OrderKind::Peg,
            side,
            price,
            quantity,
        });
        Ok(id)
    }

    /// Cancels a resting order. O(level size).
    pub fn cancel(&mut self, id: Id, sink: &mut dyn EventSink) -> Result<(), OrderBookError> {
        if self.remove_resting(id).is_none() {
            return Err(OrderBookError::NotFound { id });
        }
        sink.emit(Event::Cancelled { id });
        Ok(())
    }

    /// Edits a resting order: semantically cancel-then-reinsert of a fresh
    /// order of the same kind, reusing `id`. The reinserted order joins the
    /// tail of its new price level, losing time priority.
    ///
    /// For a Limit order, `new_price` is required. For a Peg order,
    /// `new_price` is ignored and the order re-pegs to the current same-side
    /// best, which may differ from where it rested before; if that side has
    /// no other resting order to supply a reference once this one is
    /// removed, the edit fails with `NoReference` *after* the cancel has
    /// already taken effect (a `Cancelled` event fires) — this is the one
    /// case in this API where a failure does not leave state untouched,
    /// matching a cancel-then-place-again reading of "edit" literally.
    pub fn edit(
        &mut self,
        id: Id,
        new_price: Option<Price>,
        new_quantity: Quantity,
        sink: &mut dyn EventSink,
    ) -> Result<(), OrderBookError> {
        if new_quantity == 0 {
            self.reject(
                OrderBookError::NonPositiveQuantity {
                    quantity: new_quantity,
                },
                sink,
            )?;
            unreachable!("reject always returns Err");
        }

        let &(side, price) = self
            .locator
            .get(&id)
            .ok_or(OrderBookError::NotFound { id })?;
        let kind = self
            .side(side)
            .levels
            .get(&price)
            .and_then(|level| level.orders.iter().find(|o| o.id == id))
            .map(|o| o.kind)
            .ok_or(OrderBookError::NotFound { id })?;

        if kind == OrderKind::Limit && new_price.is_none() {
            self.reject(OrderBookError::MissingPrice, sink)?;
            unreachable!("reject always returns Err");
        }
        if let Some(p) = new_price {
            if kind == OrderKind::Limit && p == 0 {
                self.reject(OrderBookError::NonPositivePrice { price: p }, sink)?;
                unreachable!("reject always returns Err");
            }
        }

        self.remove_resting(id).expect("located above");
        sink.emit(Event::Cancelled { id });

        match kind {
            OrderKind::Limit => {
                let price = new_price.expect("checked above");
                self.readmit_limit(id, side, price, new_quantity, sink);
                Ok(())
            }
            OrderKind::Peg => match self.side(side).best() {
                Some((price, _)) => {
                    self.readmit_peg(id, side, price, new_quantity, sink);
                    Ok(())
                }
                None => {
                    sink.emit(Event::Rejected {
                        reason: OrderBookError::NoReference,
                    });
                    Err(OrderBookError::NoReference)
                }
            },
            OrderKind::Market => {
                unreachable!("market orders never rest, so never appear in the locator")
            }
        }
    }

    /// A read-only traversal of both sides, best-to-worst, for display.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bid: self.side_view(Side::Buy),
            ask: self.side_view(Side::Sell),
        }
    }

    fn side_view(&self, side: Side) -> SideView {
        let book = self.side(side);
        let mut levels = Vec::new();
        let mut rank = 0;
        while let Some((price, level)) = book.nth(rank) {
            let orders = level
                .orders
                .iter()
                .map(|o| ResidentOrder {
                    id: o.id,
                    kind: o.kind,
                    price: o.price.expect("resting orders always have a price"),
                    quantity: o.quantity,
                })
                .collect();
            levels.push((price, level.total_quantity, orders));
            rank += 1;
        }
        SideView { levels }
    }

    fn reject(
        &mut self,
        reason: OrderBookError,
        sink: &mut dyn EventSink,
    ) -> Result<Id, OrderBookError> {
        sink.emit(Event::Rejected { reason });
        Err(reason)
    }

    /// Re-admits a Limit order for an edit, keeping the id. Rests it, emits
    /// `Placed`, and triggers the pegged-refresh protocol if it became the
    /// new best of its side — identical to what `place_limit` does for the
    /// residual of a freshly admitted order.
    fn readmit_limit(
        &mut self,
        id: Id,
        side: Side,
        price: Price,
        quantity: Quantity,
        sink: &mut dyn EventSink,
    ) {
        let timestamp = self.mint_timestamp();
        let order = Order::new(id, OrderKind::Limit, side, Some(price), quantity, timestamp);
        let became_best = self.rest(order);
        sink.emit(Event::Placed {
            id,
            kind: OrderKind::Limit,
            side,
            price,
            quantity,
        });
        if became_best {
            self.refresh_pegs(side, sink);
        }
    }

    /// Re-admits a Peg order (for an edit or the pegged-refresh protocol)
    /// at `price`, keeping the id. Never triggers a further refresh: a peg
    /// always joins the side's current best level, so it cannot itself
    /// improve the top of book.
    fn readmit_peg(
        &mut self,
        id: Id,
        side: Side,
        price: Price,
        quantity: Quantity,
        sink: &mut dyn EventSink,
    ) {
        let timestamp = self.mint_timestamp();
        let order = Order::new(id, OrderKind::Peg, side, Some(price), quantity, timestamp);
        self.rest(order);
        sink.emit(Event::Placed {
            id,
            kind: OrderKind::Peg,
            side,
            price,
            quantity,
        });
    }

    /// Rests an order at its own price, indexing it. Returns true if the
    /// order's price becomes the side's new rank-0, i.e. top-of-book
    /// actually improved (not merely "this price is new to the side" —
    /// resting at a fresh but non-best level must not trigger a refresh).
    fn rest(&mut self, order: Order) -> bool {
        let side = order.side;
        let price = order.price.expect("only Limit/Peg orders rest");
        let id = order.id;

        let book = self.side_mut(side);
        let prev_best = book.best().map(|(p, _)| p);
        book.insert_empty(price).add_order(order);
        self.locator.insert(id, (side, price));

        let new_best = self.side(side).best().map(|(p, _)| p);
        new_best == Some(price) && prev_best != Some(price)
    }

    /// Removes a resting order by id from its level and the locator,
    /// dropping the level if it becomes empty.
    fn remove_resting(&mut self, id: Id) -> Option<Order> {
        let (side, price) = self.locator.remove(&id)?;
        let book = self.side_mut(side);
        let level = book.get_mut(price)?;
        let removed = level.take_order(id);
        if removed.is_some() && level.is_empty() {
            book.remove(price);
        }
        removed
    }

    /// Matches an incoming order against the opposite side, price level by
    /// price level, FIFO within each level. Returns the fills in
    /// first-touched-price order, aggregated per price.
    fn match_incoming(&mut self, incoming: &mut Order) -> Vec<Fill> {
        let opposite_side = incoming.side.opposite();
        let mut fills: Vec<Fill> = Vec::new();

        while incoming.quantity > 0 {
            let Some(price) = self.side(opposite_side).best().map(|(p, _)| p) else {
                break;
            };
            if let Some(limit_price) = incoming.price {
                if !incoming.side.crosses(limit_price, price) {
                    break;
                }
            }

            // Drain fills against this level first, stashing the ids of any
            // fully-consumed resting orders. `level` borrows through
            // `side_mut`, which ties its lifetime to the whole of `self` (the
            // borrow checker can't see it only touches one field) — so the
            // locator can't be touched until this borrow ends.
            let mut drained_ids: Vec<Id> = Vec::new();
            let level = self
                .side_mut(opposite_side)
                .get_mut(price)
                .expect("best() just returned this price");

            while incoming.quantity > 0 && !level.is_empty() {
                let resting_quantity = level.orders.front().expect("not empty").quantity;
                let filled = incoming.quantity.min(resting_quantity);

                match fills.last_mut() {
                    Some(last) if last.price == price => last.quantity += filled,
                    _ => fills.push(Fill {
                        price,
                        quantity: filled,
                    }),
                }
                incoming.quantity -= filled;

                if filled == resting_quantity {
                    let removed = level.remove_order().expect("front existed");
                    drained_ids.push(removed.id);
                } else {
                    level.update_front_order_quantity(resting_quantity - filled);
                }
            }

            for id in drained_ids {
                self.locator.remove(&id);
            }

            if self
                .side(opposite_side)
                .levels
                .get(&price)
                .is_some_and(PriceLevel::is_empty)
            {
                self.side_mut(opposite_side).remove(price);
            }
        }

        fills
    }

    fn emit_fills(&self, fills: &[Fill], sink: &mut dyn EventSink) {
        for fill in fills {
            sink.emit(Event::Trade {
                price: fill.price,
                quantity: fill.quantity,
            });
        }
    }

    /// Pegged-refresh protocol: triggered right after a Limit order rests
    /// and becomes the new rank-0 of its side. Inspects the *previous* best
    /// level (now rank 1) and re-pegs every Peg order resting there to the
    /// new best, preserving their FIFO order as they join the tail of the
    /// new best level. Does not cascade: re-pegged orders join the level
    /// that is already best, so they cannot themselves trigger a further
    /// improvement.
    fn refresh_pegs(&mut self, side: Side, sink: &mut dyn EventSink) {
        let Some((new_best_price, _)) = self.side(side).best() else {
            return;
        };
        let Some((_, prev_level)) = self.side(side).nth(1) else {
            return;
        };
        let pegs: Vec<Order> = prev_level
            .orders
            .iter()
            .filter(|o| o.kind == OrderKind::Peg)
            .cloned()
            .collect();

        for peg in pegs {
            self.remove_resting(peg.id);
            sink.emit(Event::Cancelled { id: peg.id });
            self.readmit_peg(peg.id, side, new_best_price, peg.quantity, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::test_support::*;

    #[test]
    fn basic_full_fill_resting_ask_hit_by_buy() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();

        let ask_id = book
            .place_limit(Side::Sell, price("100.00"), quantity("0.010000"), &mut sink)
            .unwrap();
        let bid_id = book
            .place_limit(Side::Buy, price("100.00"), quantity("0.010000"), &mut sink)
            .unwrap();

        assert!(book.best_buy().is_none());
        assert!(book.best_sell().is_none());
        assert!(sink.events.contains(&Event::Trade {
            price: price("100.00"),
            quantity: quantity("0.010000")
        }));
        assert!(sink.events.contains(&Event::Executed { id: ask_id }));
        assert!(sink.events.contains(&Event::Executed { id: bid_id }));
    }

    #[test]
    fn partial_fill_and_remainder_resting_on_same_side() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();

        book.place_limit(Side::Sell, price("100.00"), quantity("0.005000"), &mut sink)
            .unwrap();
        book.place_limit(Side::Buy, price("100.00"), quantity("0.008000"), &mut sink)
            .unwrap();

        let (bb_price, bb_quantity) = book.best_buy().expect("has bid");
        assert_eq!(bb_price, price("100.00"));
        assert_eq!(bb_quantity, quantity("0.003000"));
        assert!(book.best_sell().is_none());
    }

    #[test]
    fn price_time_priority_within_level_and_across_levels() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();

        let id10 = book
            .place_limit(Side::Sell, price("99.99"), quantity("0.002"), &mut sink)
            .unwrap();
        let id11 = book
            .place_limit(Side::Sell, price("100.00"), quantity("0.003"), &mut sink)
            .unwrap();
        let id12 = book
            .place_limit(Side::Sell, price("100.00"), quantity("0.004"), &mut sink)
            .unwrap();

        sink.events.clear();
        book.place_limit(Side::Buy, price("150.00"), quantity("0.007"), &mut sink)
            .unwrap();

        let trades = sink.trades();
        assert_eq!(
            trades,
            vec![
                Event::Trade {
                    price: price("99.99"),
                    quantity: quantity("0.002")
                },
                Event::Trade {
                    price: price("100.00"),
                    quantity: quantity("0.005")
                },
            ]
        );
        assert!(sink.events.contains(&Event::Executed { id: id10 }));
        assert!(sink.events.contains(&Event::Executed { id: id11 }));

        let (ask_p, ask_q) = book.best_sell().expect("remaining ask");
        assert_eq!(ask_p, price("100.00"));
        assert_eq!(ask_q, quantity("0.002"));
        let _ = id12;
    }

    #[test]
    fn market_sweeps_multiple_levels_and_drops_residual() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();

        book.place_limit(Side::Sell, price("100.00"), quantity("0.003"), &mut sink)
            .unwrap();
        book.place_limit(Side::Sell, price("101.00"), quantity("0.002"), &mut sink)
            .unwrap();
        sink.events.clear();

        let id = book
            .place_market(Side::Buy, quantity("0.006"), &mut sink)
            .unwrap();

        assert_eq!(
            sink.trades(),
            vec![
                Event::Trade {
                    price: price("100.00"),
                    quantity: quantity("0.003")
                },
                Event::Trade {
                    price: price("101.00"),
                    quantity: quantity("0.002")
                },
            ]
        );
        assert!(sink.events.contains(&Event::UnfilledMarket {
            id,
            residual_qty: quantity("0.001")
        }));
        assert!(book.best_sell().is_none());
    }

    #[test]
    fn peg_tracks_a_new_best_via_pegged_refresh() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();

        let id0 = book
            .place_limit(Side::Buy, price("99.00"), quantity("0.005"), &mut sink)
            .unwrap();
        let id1 = book.place_peg(Side::Buy, quantity("0.002"), &mut sink).unwrap();
        sink.events.clear();

        let id2 = book
            .place_limit(Side::Buy, price("100.00"), quantity("0.001"), &mut sink)
            .unwrap();

        assert!(sink.events.contains(&Event::Cancelled { id: id1 }));
        assert!(sink.events.contains(&Event::Placed {
            id: id1,
            kind: OrderKind::Peg,
            side: Side::Buy,
            price: price("100.00"),
            quantity: quantity("0.002"),
        }));

        let snap = book.snapshot();
        let top = &snap.bid.levels[0];
        assert_eq!(top.0, price("100.00"));
        assert_eq!(top.2.iter().map(|o| o.id).collect::<Vec<_>>(), vec![id2, id1]);
        let second = &snap.bid.levels[1];
        assert_eq!(second.0, price("99.00"));
        assert_eq!(second.2[0].id, id0);
    }

    #[test]
    fn peg_rejected_on_empty_side_leaves_book_unchanged() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();

        let err = book.place_peg(Side::Buy, quantity("0.005"), &mut sink).unwrap_err();
        assert_eq!(err, OrderBookError::NoReference);
        assert!(sink.events.contains(&Event::Rejected {
            reason: OrderBookError::NoReference
        }));
        assert!(book.is_empty());
    }

    #[test]
    fn edit_loses_time_priority() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();

        let id0 = book
            .place_limit(Side::Buy, price("100.00"), quantity("0.005"), &mut sink)
            .unwrap();
        let id1 = book
            .place_limit(Side::Buy, price("100.00"), quantity("0.005"), &mut sink)
            .unwrap();

        book.edit(id0, Some(price("100.00")), quantity("0.005"), &mut sink)
            .unwrap();

        sink.events.clear();
        book.place_limit(Side::Sell, price("100.00"), quantity("0.005"), &mut sink)
            .unwrap();

        assert_eq!(
            sink.trades(),
            vec![Event::Trade {
                price: price("100.00"),
                quantity: quantity("0.005")
            }]
        );
        assert!(sink.events.contains(&Event::Executed { id: id1 }));
        let (_, bb_qty) = book.best_buy().expect("id0 still resting");
        assert_eq!(bb_qty, quantity("0.005"));
    }

    #[test]
    fn cancel_is_not_idempotent_second_call_is_not_found() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();

        let id = book
            .place_limit(Side::Buy, price("100.00"), quantity("0.005"), &mut sink)
            .unwrap();
        book.cancel(id, &mut sink).unwrap();
        assert_eq!(
            book.cancel(id, &mut sink).unwrap_err(),
            OrderBookError::NotFound { id }
        );
        assert!(book.is_empty());
    }

    #[test]
    fn edit_of_limit_without_new_price_is_missing_price_and_does_not_mutate() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();

        let id = book
            .place_limit(Side::Buy, price("100.00"), quantity("0.005"), &mut sink)
            .unwrap();
        let err = book.edit(id, None, quantity("0.003"), &mut sink).unwrap_err();
        assert_eq!(err, OrderBookError::MissingPrice);

        let (bb_price, bb_qty) = book.best_buy().expect("edit should not have removed it");
        assert_eq!(bb_price, price("100.00"));
        assert_eq!(bb_qty, quantity("0.005"));
    }

    #[test]
    fn edit_nonexistent_id_is_not_found() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();
        let err = book
            .edit(999, Some(price("1.00")), quantity("1"), &mut sink)
            .unwrap_err();
        assert_eq!(err, OrderBookError::NotFound { id: 999 });
    }

    #[test]
    fn zero_quantity_is_rejected_at_admission() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();
        let err = book
            .place_limit(Side::Buy, price("100.00"), 0, &mut sink)
            .unwrap_err();
        assert_eq!(err, OrderBookError::NonPositiveQuantity { quantity: 0 });
        assert!(book.is_empty());
    }

    #[test]
    fn zero_price_is_rejected_at_admission() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();
        let err = book
            .place_limit(Side::Buy, 0, quantity("0.01"), &mut sink)
            .unwrap_err();
        assert_eq!(err, OrderBookError::NonPositivePrice { price: 0 });
    }

    #[test]
    fn no_match_when_prices_dont_cross() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();

        book.place_limit(Side::Buy, price("90.00"), quantity("1"), &mut sink)
            .unwrap();
        sink.events.clear();
        book.place_limit(Side::Sell, price("100.00"), quantity("0.5"), &mut sink)
            .unwrap();

        assert!(sink.trades().is_empty());
        assert_eq!(book.best_buy().unwrap().0, price("90.00"));
        assert_eq!(book.best_sell().unwrap().0, price("100.00"));
    }

    #[test]
    fn trade_price_is_always_the_resting_makers_price() {
        let mut book = new_book();
        let mut sink = RecordingSink::new();

        book.place_limit(Side::Buy, price("100.00"), quantity("0.010"), &mut sink)
            .unwrap();
        sink.events.clear();
        book.place_limit(Side::Sell, price("95.00"), quantity("0.010"), &mut sink)
            .unwrap();
        assert_eq!(
            sink.trades(),
            vec![Event::Trade {
                price: price("100.00"),
                quantity: quantity("0.010")
            }]
        );
    }
}
