//! Cart store operations
//!
//! Tracks, per member, the set of items intended for purchase. Adding is
//! idempotent (set semantics), removal of an absent item is a no-op, and a
//! member can never stage their own listing.

use tracing::{debug, warn};

use crate::store::MarketStore;
use crate::store::models::Item;

use super::{MarketError, MarketResult};

/// Add an item to a member's cart
///
/// Fails with [`MarketError::ItemNotFound`] if the item does not resolve and
/// [`MarketError::SelfPurchase`] if the member owns it. Re-adding an item
/// already in the cart changes nothing. Returns the resolved cart contents.
pub fn add_item(store: &MarketStore, member_id: &str, item_id: &str) -> MarketResult<Vec<Item>> {
    let txn = store.begin_write()?;
    let item = store
        .item_in_txn(&txn, item_id)?
        .ok_or_else(|| MarketError::ItemNotFound(item_id.to_string()))?;
    if item.seller_id == member_id {
        return Err(MarketError::SelfPurchase);
    }

    let mut cart = store.cart_in_txn(&txn, member_id)?;
    if cart.insert(item_id.to_string()) {
        store.put_cart_in_txn(&txn, member_id, &cart)?;
        txn.commit().map_err(crate::store::StorageError::from)?;
        debug!(member_id, item_id, "item added to cart");
    }
    // Already present: drop the transaction unchanged

    list_items(store, member_id)
}

/// Remove an item from a member's cart; absent is a no-op, not an error
pub fn remove_item(store: &MarketStore, member_id: &str, item_id: &str) -> MarketResult<Vec<Item>> {
    let txn = store.begin_write()?;
    let mut cart = store.cart_in_txn(&txn, member_id)?;
    if cart.remove(item_id) {
        store.put_cart_in_txn(&txn, member_id, &cart)?;
        txn.commit().map_err(crate::store::StorageError::from)?;
        debug!(member_id, item_id, "item removed from cart");
    }

    list_items(store, member_id)
}

/// Resolve a member's cart to item details (pure read)
pub fn list_items(store: &MarketStore, member_id: &str) -> MarketResult<Vec<Item>> {
    let cart = store.get_cart(member_id)?;
    let mut items = Vec::with_capacity(cart.len());
    for item_id in &cart {
        match store.get_item(item_id)? {
            Some(item) => items.push(item),
            // Items are never deleted today, so this indicates a bug or
            // manual intervention; surface it in the log, not to the user.
            None => warn!(member_id, item_id, "cart references missing item"),
        }
    }
    Ok(items)
}
