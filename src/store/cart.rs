//! Per-member cart storage
//!
//! A cart is a `BTreeSet<String>` of item ids, persisted as one JSON value
//! keyed by the owning member. The set container is what makes duplicate
//! adds a no-op at the model level. A member's cart is only ever mutated by
//! that member's own requests; there is no cross-member write path.

use std::collections::BTreeSet;

use redb::{ReadableTable, WriteTransaction};

use super::{CARTS_TABLE, MarketStore, StorageResult};

impl MarketStore {
    /// Read a member's cart set (missing key = empty cart)
    pub fn get_cart(&self, user_id: &str) -> StorageResult<BTreeSet<String>> {
        let txn = self.begin_read()?;
        let table = txn.open_table(CARTS_TABLE)?;
        match table.get(user_id)? {
            Some(guard) => Ok(serde_json::from_slice(guard.value())?),
            None => Ok(BTreeSet::new()),
        }
    }

    /// Read a member's cart within an open write transaction
    pub(crate) fn cart_in_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
    ) -> StorageResult<BTreeSet<String>> {
        let table = txn.open_table(CARTS_TABLE)?;
        match table.get(user_id)? {
            Some(guard) => Ok(serde_json::from_slice(guard.value())?),
            None => Ok(BTreeSet::new()),
        }
    }

    /// Persist a member's cart set within an open write transaction
    pub(crate) fn put_cart_in_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        cart: &BTreeSet<String>,
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(cart)?;
        let mut table = txn.open_table(CARTS_TABLE)?;
        table.insert(user_id, bytes.as_slice())?;
        Ok(())
    }

    /// Empty a member's cart within an open write transaction
    pub(crate) fn clear_cart_in_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(CARTS_TABLE)?;
        table.remove(user_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cart_reads_as_empty() {
        let store = MarketStore::open_in_memory().unwrap();
        assert!(store.get_cart("nobody").unwrap().is_empty());
    }

    #[test]
    fn cart_round_trips_as_a_set() {
        let store = MarketStore::open_in_memory().unwrap();
        let txn = store.begin_write().unwrap();
        let mut cart = BTreeSet::new();
        cart.insert("i1".to_string());
        cart.insert("i2".to_string());
        cart.insert("i1".to_string()); // duplicate collapses
        store.put_cart_in_txn(&txn, "u1", &cart).unwrap();
        txn.commit().unwrap();

        let read = store.get_cart("u1").unwrap();
        assert_eq!(read.len(), 2);

        let txn = store.begin_write().unwrap();
        store.clear_cart_in_txn(&txn, "u1").unwrap();
        txn.commit().unwrap();
        assert!(store.get_cart("u1").unwrap().is_empty());
    }
}
