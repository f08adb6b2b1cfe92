//! Order ledger storage
//!
//! Orders are appended at checkout and mutated in exactly one way: the
//! `pending -> completed` status transition. Both happen inside write
//! transactions, which redb serializes (single writer). Records are never
//! deleted; completed orders are the purchase history.

use redb::{ReadableTable, WriteTransaction};

use super::models::{Order, OrderStatus};
use super::{MarketStore, ORDERS_TABLE, StorageResult};

impl MarketStore {
    /// Insert (or overwrite) an order within an open write transaction
    ///
    /// Checkout calls this once per cart item inside a single transaction,
    /// which is what gives the batch its all-or-nothing guarantee.
    pub(crate) fn put_order_in_txn(
        &self,
        txn: &WriteTransaction,
        order: &Order,
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(order)?;
        let mut table = txn.open_table(ORDERS_TABLE)?;
        table.insert(order.id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    /// Look up an order within an open write transaction
    ///
    /// Used by the close path: the status check, OTP verification and the
    /// status write all happen against the same transaction, so a racing
    /// closer can never observe the same `pending` state.
    pub(crate) fn order_in_txn(
        &self,
        txn: &WriteTransaction,
        id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Look up an order by id
    pub fn get_order(&self, id: &str) -> StorageResult<Option<Order>> {
        let txn = self.begin_read()?;
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Orders where the member is the buyer, filtered by status, newest first
    pub fn orders_for_buyer(&self, buyer_id: &str, status: OrderStatus) -> StorageResult<Vec<Order>> {
        self.scan_orders(|o| o.buyer_id == buyer_id && o.status == status)
    }

    /// Orders where the member is the seller, filtered by status, newest first
    pub fn orders_for_seller(
        &self,
        seller_id: &str,
        status: OrderStatus,
    ) -> StorageResult<Vec<Order>> {
        self.scan_orders(|o| o.seller_id == seller_id && o.status == status)
    }

    /// Full-table scan with a predicate
    ///
    /// The ledger is small enough per deployment that a scan beats
    /// maintaining secondary indexes; revisit if order volume grows.
    fn scan_orders(&self, pred: impl Fn(&Order) -> bool) -> StorageResult<Vec<Order>> {
        let txn = self.begin_read()?;
        let table = txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let order: Order = serde_json::from_slice(value.value())?;
            if pred(&order) {
                orders.push(order);
            }
        }
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample_order(id: &str, buyer: &str, seller: &str, status: OrderStatus) -> Order {
        Order {
            id: id.to_string(),
            buyer_id: buyer.to_string(),
            seller_id: seller.to_string(),
            item_id: format!("item-{id}"),
            amount: Decimal::new(999, 2),
            otp: "deadbeef".into(),
            hashed_otp: "aa:bb".into(),
            status,
            created_at: crate::utils::now_millis(),
        }
    }

    #[test]
    fn ledger_filters_by_participant_and_status() {
        let store = MarketStore::open_in_memory().unwrap();
        let txn = store.begin_write().unwrap();
        store
            .put_order_in_txn(&txn, &sample_order("o1", "b1", "s1", OrderStatus::Pending))
            .unwrap();
        store
            .put_order_in_txn(&txn, &sample_order("o2", "b1", "s2", OrderStatus::Completed))
            .unwrap();
        store
            .put_order_in_txn(&txn, &sample_order("o3", "b2", "s1", OrderStatus::Pending))
            .unwrap();
        txn.commit().unwrap();

        assert_eq!(store.orders_for_buyer("b1", OrderStatus::Pending).unwrap().len(), 1);
        assert_eq!(store.orders_for_buyer("b1", OrderStatus::Completed).unwrap().len(), 1);
        assert_eq!(store.orders_for_seller("s1", OrderStatus::Pending).unwrap().len(), 2);
        assert!(store.get_order("o2").unwrap().is_some());
        assert!(store.get_order("nope").unwrap().is_none());
    }
}
