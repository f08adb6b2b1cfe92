//! Item catalog storage operations

use redb::ReadableTable;

use super::models::Item;
use super::{ITEMS_TABLE, MarketStore, StorageResult};

impl MarketStore {
    /// Insert or overwrite an item
    pub fn put_item(&self, item: &Item) -> StorageResult<()> {
        let bytes = serde_json::to_vec(item)?;
        let txn = self.begin_write()?;
        {
            let mut table = txn.open_table(ITEMS_TABLE)?;
            table.insert(item.id.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Look up an item by id
    pub fn get_item(&self, id: &str) -> StorageResult<Option<Item>> {
        let txn = self.begin_read()?;
        let table = txn.open_table(ITEMS_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Look up an item within an open write transaction
    ///
    /// Used by checkout so that existence checks and the price snapshot see
    /// the same state the batch insert commits against.
    pub(crate) fn item_in_txn(
        &self,
        txn: &redb::WriteTransaction,
        id: &str,
    ) -> StorageResult<Option<Item>> {
        let table = txn.open_table(ITEMS_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All items, newest first
    pub fn list_all_items(&self) -> StorageResult<Vec<Item>> {
        let txn = self.begin_read()?;
        let table = txn.open_table(ITEMS_TABLE)?;
        let mut items = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            items.push(serde_json::from_slice::<Item>(value.value())?);
        }
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::Category;
    use crate::utils::now_millis;
    use rust_decimal::Decimal;

    fn sample_item(id: &str, seller: &str, price: Decimal) -> Item {
        Item {
            id: id.to_string(),
            name: format!("Item {id}"),
            description: "A fine specimen".into(),
            price,
            category: Category::Other,
            seller_id: seller.to_string(),
            created_at: now_millis(),
        }
    }

    #[test]
    fn put_get_and_list() {
        let store = MarketStore::open_in_memory().unwrap();
        store
            .put_item(&sample_item("i1", "s1", Decimal::new(1000, 2)))
            .unwrap();
        store
            .put_item(&sample_item("i2", "s2", Decimal::new(2000, 2)))
            .unwrap();

        let fetched = store.get_item("i1").unwrap().unwrap();
        assert_eq!(fetched.price, Decimal::new(1000, 2));
        assert!(store.get_item("nope").unwrap().is_none());
        assert_eq!(store.list_all_items().unwrap().len(), 2);
    }
}
