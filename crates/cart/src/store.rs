use std::sync::Arc;

use indexmap::IndexMap;

use storefront_catalog::Product;
use storefront_core::{Money, ProductId};
use storefront_events::{Event, ListenerId, Listeners, Subscription};

use crate::change::CartChange;
use crate::line::CartLine;
use crate::snapshot::CartSnapshot;

/// The cart aggregate: product id → line.
///
/// - at most one line per product id;
/// - every line has `quantity >= 1`;
/// - `total_items` / `total_price` are computed from the lines on each call.
///
/// Lines keep insertion order; removing a line does not reorder the others.
///
/// Listeners are called synchronously, in subscription order, after each
/// mutation that actually changed something (and after every `clear`). They
/// receive the store itself as a read-only context.
#[derive(Debug, Default)]
pub struct CartStore {
    lines: IndexMap<ProductId, CartLine>,
    listeners: Listeners<CartChange, CartStore>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`, creating the line if needed.
    pub fn add(&mut self, product: &Arc<Product>) {
        let product_id = product.id_typed().clone();
        let line = self
            .lines
            .entry(product_id.clone())
            .and_modify(CartLine::increment)
            .or_insert_with(|| CartLine::new(Arc::clone(product)));
        let quantity = line.quantity();

        self.publish(CartChange::Added {
            product_id,
            quantity,
        });
    }

    /// Take one unit of `product` off the cart.
    ///
    /// Removes the line when its last unit goes. Returns `false` (and notifies
    /// nobody) when the product is not in the cart.
    pub fn remove_single(&mut self, product: &Product) -> bool {
        let product_id = product.id_typed();
        let Some(line) = self.lines.get_mut(product_id) else {
            return false;
        };

        let change = if line.quantity() > 1 {
            line.decrement();
            CartChange::Decremented {
                product_id: product_id.clone(),
                quantity: line.quantity(),
            }
        } else {
            self.lines.shift_remove(product_id);
            CartChange::Removed {
                product_id: product_id.clone(),
            }
        };

        self.publish(change);
        true
    }

    /// Drop the whole line for `product`. Returns `false` when there was none.
    pub fn remove_all(&mut self, product: &Product) -> bool {
        let product_id = product.id_typed();
        if self.lines.shift_remove(product_id).is_none() {
            return false;
        }

        self.publish(CartChange::Removed {
            product_id: product_id.clone(),
        });
        true
    }

    /// Empty the cart. Always notifies, even if the cart was already empty.
    pub fn clear(&mut self) {
        let lines_removed = self.lines.len();
        self.lines.clear();
        self.publish(CartChange::Cleared { lines_removed });
    }

    /// Quantity held for `product`, or 0.
    pub fn qty_of(&self, product: &Product) -> u32 {
        self.lines
            .get(product.id_typed())
            .map_or(0, CartLine::quantity)
    }

    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.get(product_id)
    }

    /// Borrowing iterator over the lines, in cart order.
    pub fn lines(&self) -> impl ExactSizeIterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Owned copy of the lines, in cart order.
    pub fn items(&self) -> Vec<CartLine> {
        self.lines.values().cloned().collect()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.lines.values().map(|l| u64::from(l.quantity())).sum()
    }

    /// Sum of `price * quantity` over all lines. Not rounded.
    pub fn total_price(&self) -> Money {
        self.lines.values().map(CartLine::line_total).sum()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::of(self)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&CartChange, &CartStore) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Subscribe through a channel instead of a callback.
    pub fn subscribe_channel(&mut self) -> (ListenerId, Subscription<CartChange>) {
        self.listeners.subscribe_channel()
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn publish(&self, change: CartChange) {
        tracing::debug!(
            event = change.event_type(),
            product_id = change.product_id().map(ProductId::as_str),
            total_items = self.total_items(),
            "cart changed"
        );
        self.listeners.notify(&change, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;

    fn product(id: &str, price: &str) -> Arc<Product> {
        Arc::new(
            Product::new(
                ProductId::new(id).unwrap(),
                format!("Product {id}"),
                "",
                Money::parse(price).unwrap(),
                "",
            )
            .unwrap(),
        )
    }

    /// Store plus a log of every change it published.
    fn recording_store() -> (CartStore, Rc<RefCell<Vec<CartChange>>>) {
        let mut store = CartStore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        store.subscribe(move |change, _| sink.borrow_mut().push(change.clone()));
        (store, log)
    }

    fn state(store: &CartStore) -> Vec<(String, u32)> {
        store
            .lines()
            .map(|l| (l.product_id().to_string(), l.quantity()))
            .collect()
    }

    #[test]
    fn adding_aggregates_by_product_id() {
        let a = product("a", "2.50");
        let b = product("b", "10");
        let mut store = CartStore::new();

        store.add(&a);
        store.add(&a);
        store.add(&b);

        assert_eq!(store.items().len(), 2);
        assert_eq!(store.qty_of(&a), 2);
        assert_eq!(store.qty_of(&b), 1);
        assert_eq!(store.total_items(), 3);
        assert_eq!(
            store.total_price(),
            a.price().times(2) + b.price()
        );
        assert_eq!(store.total_price().display(), "15.00");
    }

    #[test]
    fn lines_match_on_id_only() {
        let original = product("a", "1");
        let lookalike = product("a", "999");
        let mut store = CartStore::new();

        store.add(&original);
        store.add(&lookalike);

        assert_eq!(store.line_count(), 1);
        assert_eq!(store.qty_of(&original), 2);
        // The first product reference added is the one the line keeps.
        assert!(Arc::ptr_eq(store.items()[0].product(), &original));
    }

    #[test]
    fn remove_single_decrements_then_removes() {
        let a = product("a", "1");
        let (mut store, log) = recording_store();
        store.add(&a);
        store.add(&a);

        assert!(store.remove_single(&a));
        assert_eq!(store.qty_of(&a), 1);
        assert_eq!(store.line_count(), 1);

        assert!(store.remove_single(&a));
        assert_eq!(store.qty_of(&a), 0);
        assert!(store.is_empty());

        let id = a.id_typed().clone();
        assert_eq!(
            log.borrow()[2..],
            [
                CartChange::Decremented {
                    product_id: id.clone(),
                    quantity: 1
                },
                CartChange::Removed { product_id: id },
            ]
        );
    }

    #[test]
    fn removing_absent_product_is_silent() {
        let a = product("a", "1");
        let c = product("c", "1");
        let (mut store, log) = recording_store();
        store.add(&a);
        let before = state(&store);
        let notified = log.borrow().len();

        assert!(!store.remove_single(&c));
        assert!(!store.remove_all(&c));

        assert_eq!(state(&store), before);
        assert_eq!(log.borrow().len(), notified);
    }

    #[test]
    fn qty_of_never_added_is_zero() {
        let store = CartStore::new();
        assert_eq!(store.qty_of(&product("zzz", "1")), 0);
    }

    #[test]
    fn remove_all_is_idempotent() {
        let a = product("a", "1");
        let b = product("b", "1");
        let (mut store, log) = recording_store();
        store.add(&a);
        store.add(&a);
        store.add(&b);

        assert!(store.remove_all(&a));
        let after_once = state(&store);
        let notified = log.borrow().len();

        assert!(!store.remove_all(&a));
        assert_eq!(state(&store), after_once);
        assert_eq!(log.borrow().len(), notified);
        assert_eq!(after_once, vec![("b".to_string(), 1)]);
    }

    #[test]
    fn clear_empties_and_always_notifies() {
        let a = product("a", "3.10");
        let b = product("b", "1");
        let (mut store, log) = recording_store();
        for _ in 0..3 {
            store.add(&a);
        }
        store.add(&b);

        store.clear();
        assert!(store.items().is_empty());
        assert_eq!(store.total_items(), 0);
        assert!(store.total_price().is_zero());
        assert_eq!(
            log.borrow().last(),
            Some(&CartChange::Cleared { lines_removed: 2 })
        );

        // Already empty: still notifies.
        store.clear();
        assert_eq!(
            log.borrow().last(),
            Some(&CartChange::Cleared { lines_removed: 0 })
        );
        assert_eq!(log.borrow().len(), 6);
    }

    #[test]
    fn removal_keeps_order_of_remaining_lines() {
        let (a, b, c) = (product("a", "1"), product("b", "1"), product("c", "1"));
        let mut store = CartStore::new();
        store.add(&a);
        store.add(&b);
        store.add(&c);

        store.remove_all(&a);
        store.add(&a);

        let order: Vec<_> = state(&store).into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn listeners_see_state_after_mutation() {
        let a = product("a", "4");
        let mut store = CartStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |_, cart| {
            sink.borrow_mut()
                .push((cart.total_items(), cart.total_price().display()))
        });

        store.add(&a);
        store.add(&a);
        store.remove_single(&a);

        assert_eq!(
            *seen.borrow(),
            vec![
                (1, "4.00".to_string()),
                (2, "8.00".to_string()),
                (1, "4.00".to_string()),
            ]
        );
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let a = product("a", "1");
        let mut store = CartStore::new();
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let id = store.subscribe(move |_, _| *h.borrow_mut() += 1);

        store.add(&a);
        assert!(store.unsubscribe(id));
        store.add(&a);

        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn channel_subscription_receives_changes() {
        let a = product("a", "1");
        let mut store = CartStore::new();
        let (_, changes) = store.subscribe_channel();

        store.add(&a);
        store.remove_all(&a);

        let types: Vec<_> = changes.drain().iter().map(|c| c.event_type()).collect();
        assert_eq!(types, vec!["cart.line.added", "cart.line.removed"]);
    }

    #[test]
    fn total_price_is_not_rounded_until_display() {
        let a = product("a", "0.333");
        let mut store = CartStore::new();
        for _ in 0..3 {
            store.add(&a);
        }
        assert_eq!(store.total_price(), Money::parse("0.999").unwrap());
        assert_eq!(store.total_price().display(), "1.00");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        RemoveSingle(usize),
        RemoveAll(usize),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0..4usize).prop_map(Op::Add),
            3 => (0..4usize).prop_map(Op::RemoveSingle),
            1 => (0..4usize).prop_map(Op::RemoveAll),
            1 => Just(Op::Clear),
        ]
    }

    fn catalog() -> Vec<Arc<Product>> {
        vec![
            product("p1", "29.99"),
            product("p2", "59.99"),
            product("p3", "19.99"),
            product("p4", "0.01"),
        ]
    }

    fn run(store: &mut CartStore, products: &[Arc<Product>], op: &Op) {
        match op {
            Op::Add(i) => store.add(&products[*i]),
            Op::RemoveSingle(i) => {
                store.remove_single(&products[*i]);
            }
            Op::RemoveAll(i) => {
                store.remove_all(&products[*i]);
            }
            Op::Clear => store.clear(),
        }
    }

    mod proptest_tests {
        use super::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: totals always agree with the lines, and no line ever holds 0.
            #[test]
            fn invariants_hold_for_any_sequence(ops in prop::collection::vec(op_strategy(), 0..60)) {
                let products = catalog();
                let mut store = CartStore::new();

                for op in &ops {
                    run(&mut store, &products, op);

                    let sum: u64 = store.lines().map(|l| u64::from(l.quantity())).sum();
                    prop_assert_eq!(store.total_items(), sum);
                    prop_assert!(store.lines().all(|l| l.quantity() >= 1));

                    let price: Money = store
                        .lines()
                        .map(|l| l.product().price().times(l.quantity()))
                        .sum();
                    prop_assert_eq!(store.total_price(), price);

                    for p in &products {
                        let held = store.line(p.id_typed()).map_or(0, |l| l.quantity());
                        prop_assert_eq!(store.qty_of(p), held);
                    }
                }
            }

            /// Property: one notification per effective mutation, none for no-ops,
            /// and exactly one for every clear.
            #[test]
            fn notifies_exactly_on_change(ops in prop::collection::vec(op_strategy(), 0..60)) {
                let products = catalog();
                let (mut store, log) = recording_store();

                for op in &ops {
                    let before = state(&store);
                    let count_before = log.borrow().len();
                    run(&mut store, &products, op);
                    let changed = state(&store) != before;
                    let expected = usize::from(changed || matches!(op, Op::Clear));
                    prop_assert_eq!(log.borrow().len() - count_before, expected);
                }
            }

            /// Property: add followed by remove_single restores the previous state.
            #[test]
            fn add_then_remove_single_round_trips(
                ops in prop::collection::vec(op_strategy(), 0..40),
                pick in 0..4usize,
            ) {
                let products = catalog();
                let mut store = CartStore::new();
                for op in &ops {
                    run(&mut store, &products, op);
                }

                let before = state(&store);
                store.add(&products[pick]);
                prop_assert!(store.remove_single(&products[pick]));
                prop_assert_eq!(state(&store), before);
            }
        }
    }
}
