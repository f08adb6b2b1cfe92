//! Order lifecycle engine
//!
//! The state machine governing order creation and closure. Checkout turns
//! the buyer's whole cart into orders (one per item, one OTP each) and the
//! close path verifies an OTP and performs the single lawful status
//! transition.
//!
//! Both operations compose their reads and writes inside one redb write
//! transaction and never await while holding it. That one decision carries
//! most of the guarantees:
//!
//! - checkout is all-or-nothing: the order batch and the cart clear commit
//!   together, so no partial checkout is ever observable and a failed or
//!   cancelled attempt leaves nothing behind to deduplicate on retry;
//! - closure is race-free: write transactions are serialized, so of two
//!   concurrent closers exactly one sees `pending` — the other re-reads the
//!   committed `completed` status and fails with `AlreadyCompleted`.

use tracing::info;
use uuid::Uuid;

use crate::store::MarketStore;
use crate::store::models::{Order, OrderStatus};
use crate::utils::now_millis;

use super::{MarketError, MarketResult, otp};

/// Convert the buyer's entire cart into one pending order per item
///
/// Returns the created orders, including each plaintext OTP. This is the
/// only point the engine hands back plaintext; everything persisted for
/// verification is the salted hash.
pub fn place_order(store: &MarketStore, buyer_id: &str) -> MarketResult<Vec<Order>> {
    let txn = store.begin_write()?;

    let cart = store.cart_in_txn(&txn, buyer_id)?;
    if cart.is_empty() {
        return Err(MarketError::EmptyCart);
    }

    let mut created = Vec::with_capacity(cart.len());
    for item_id in &cart {
        let item = store
            .item_in_txn(&txn, item_id)?
            .ok_or_else(|| MarketError::ItemNotFound(item_id.clone()))?;

        let code = otp::generate();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            buyer_id: buyer_id.to_string(),
            seller_id: item.seller_id.clone(),
            item_id: item.id.clone(),
            // Price snapshot: later catalog edits must not touch the amount
            amount: item.price.round_dp(2),
            hashed_otp: otp::hash(&code),
            otp: code,
            status: OrderStatus::Pending,
            created_at: now_millis(),
        };
        store.put_order_in_txn(&txn, &order)?;
        created.push(order);
    }

    store.clear_cart_in_txn(&txn, buyer_id)?;
    txn.commit().map_err(crate::store::StorageError::from)?;

    info!(buyer_id, orders = created.len(), "checkout completed");
    Ok(created)
}

/// Verify an OTP and close the order (seller-side handover confirmation)
///
/// Deliberately not idempotent: a second close of the same order fails with
/// [`MarketError::AlreadyCompleted`] regardless of the candidate OTP, so a
/// stale code can neither succeed twice nor leak whether it was once
/// correct. A mismatching OTP leaves the order untouched; there is no
/// attempt counter and no lockout.
pub fn close_transaction(store: &MarketStore, order_id: &str, candidate: &str) -> MarketResult<Order> {
    let txn = store.begin_write()?;

    let mut order = store
        .order_in_txn(&txn, order_id)?
        .ok_or_else(|| MarketError::OrderNotFound(order_id.to_string()))?;

    if order.status == OrderStatus::Completed {
        return Err(MarketError::AlreadyCompleted);
    }

    if !otp::verify(candidate, &order.hashed_otp) {
        return Err(MarketError::InvalidOtp);
    }

    order.status = OrderStatus::Completed;
    store.put_order_in_txn(&txn, &order)?;
    // A commit failure here means this writer lost to a concurrent one;
    // surface it as retryable, never as a credential problem.
    txn.commit()
        .map_err(|e| MarketError::Conflict(e.to_string()))?;

    info!(order_id, seller_id = %order.seller_id, "order closed");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::cart;
    use crate::store::models::{Category, Item};
    use rust_decimal::Decimal;

    fn seed_item(store: &MarketStore, id: &str, seller: &str, cents: i64) -> Item {
        let item = Item {
            id: id.to_string(),
            name: format!("Item {id}"),
            description: "desc".into(),
            price: Decimal::new(cents, 2),
            category: Category::Furniture,
            seller_id: seller.to_string(),
            created_at: now_millis(),
        };
        store.put_item(&item).unwrap();
        item
    }

    #[test]
    fn checkout_creates_one_order_per_item_and_empties_cart() {
        let store = MarketStore::open_in_memory().unwrap();
        seed_item(&store, "x", "seller-1", 1000);
        seed_item(&store, "y", "seller-2", 2000);
        cart::add_item(&store, "buyer", "x").unwrap();
        cart::add_item(&store, "buyer", "y").unwrap();

        let orders = place_order(&store, "buyer").unwrap();
        assert_eq!(orders.len(), 2);
        assert_ne!(orders[0].otp, orders[1].otp);
        assert!(orders.iter().all(|o| o.status == OrderStatus::Pending));
        assert!(store.get_cart("buyer").unwrap().is_empty());

        // One order maps to one item, no merging across sellers
        let mut item_ids: Vec<_> = orders.iter().map(|o| o.item_id.as_str()).collect();
        item_ids.sort_unstable();
        assert_eq!(item_ids, vec!["x", "y"]);
    }

    #[test]
    fn empty_cart_checkout_fails_and_creates_nothing() {
        let store = MarketStore::open_in_memory().unwrap();
        let err = place_order(&store, "buyer").unwrap_err();
        assert!(matches!(err, MarketError::EmptyCart));
        assert!(store.orders_for_buyer("buyer", OrderStatus::Pending).unwrap().is_empty());
    }

    #[test]
    fn amount_is_a_snapshot_of_the_creation_time_price() {
        let store = MarketStore::open_in_memory().unwrap();
        let mut item = seed_item(&store, "x", "seller", 1000);
        cart::add_item(&store, "buyer", "x").unwrap();
        let orders = place_order(&store, "buyer").unwrap();
        assert_eq!(orders[0].amount, Decimal::new(1000, 2));

        // Catalog price change after checkout
        item.price = Decimal::new(9999, 2);
        store.put_item(&item).unwrap();

        let stored = store.get_order(&orders[0].id).unwrap().unwrap();
        assert_eq!(stored.amount, Decimal::new(1000, 2));
    }

    #[test]
    fn close_succeeds_exactly_once() {
        let store = MarketStore::open_in_memory().unwrap();
        seed_item(&store, "x", "seller", 1000);
        cart::add_item(&store, "buyer", "x").unwrap();
        let orders = place_order(&store, "buyer").unwrap();
        let order = &orders[0];

        let closed = close_transaction(&store, &order.id, &order.otp).unwrap();
        assert_eq!(closed.status, OrderStatus::Completed);

        // Same OTP again: InvalidState, never InvalidCredential
        let err = close_transaction(&store, &order.id, &order.otp).unwrap_err();
        assert!(matches!(err, MarketError::AlreadyCompleted));
        // Different OTP on a completed order: still InvalidState
        let err = close_transaction(&store, &order.id, "00000000").unwrap_err();
        assert!(matches!(err, MarketError::AlreadyCompleted));
    }

    #[test]
    fn wrong_otp_never_mutates_status() {
        let store = MarketStore::open_in_memory().unwrap();
        seed_item(&store, "x", "seller", 1000);
        cart::add_item(&store, "buyer", "x").unwrap();
        let orders = place_order(&store, "buyer").unwrap();
        let order = &orders[0];

        for _ in 0..3 {
            let err = close_transaction(&store, &order.id, "ffffffff").unwrap_err();
            assert!(matches!(err, MarketError::InvalidOtp));
        }
        let stored = store.get_order(&order.id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);

        // Correct OTP still works after failed attempts (no lockout)
        close_transaction(&store, &order.id, &order.otp).unwrap();
    }

    #[test]
    fn closing_an_unknown_order_is_not_found() {
        let store = MarketStore::open_in_memory().unwrap();
        let err = close_transaction(&store, "ghost", "a1b2c3d4").unwrap_err();
        assert!(matches!(err, MarketError::OrderNotFound(_)));
    }
}
